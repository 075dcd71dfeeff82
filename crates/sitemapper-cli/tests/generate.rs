#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use anyhow::Result;
use common::sitemapper_cmd;
use flate2::read::GzDecoder;
use predicates::prelude::*;
use std::fs;
use std::io::Read;
use tempfile::TempDir;

#[test]
fn generates_plain_sitemap_from_stdin() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let base = temp_dir.path().join("sitemap");

    sitemapper_cmd()
        .args(["generate", "--site", "https://example.com", "--no-compress", "--output"])
        .arg(&base)
        .write_stdin("# pages\n/about\n\n/über uns\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 URLs to 1 file"));

    let xml = fs::read_to_string(temp_dir.path().join("sitemap.xml"))?;
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains("<loc>https://example.com/about</loc>"));
    assert!(xml.contains("<loc>https://example.com/%C3%BCber%20uns</loc>"));
    Ok(())
}

#[test]
fn site_address_from_environment() -> Result<()> {
    let temp_dir = TempDir::new()?;

    sitemapper_cmd()
        .env("SITEMAPPER_SITE", "http://env.example.com")
        .args(["generate", "--no-compress", "--output"])
        .arg(temp_dir.path().join("sitemap"))
        .write_stdin("/a\n")
        .assert()
        .success();

    let xml = fs::read_to_string(temp_dir.path().join("sitemap.xml"))?;
    assert!(xml.contains("<loc>http://env.example.com/a</loc>"));
    Ok(())
}

#[test]
fn rollover_writes_numbered_gzip_files_and_index() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("urls.txt");
    fs::write(&input, "/a\n/b\n/c\n")?;

    let output = sitemapper_cmd()
        .args(["generate", "--site", "https://example.com", "--rollover", "--per-file", "2"])
        .args(["--format", "json", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(temp_dir.path().join("sitemap"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary: serde_json::Value = serde_json::from_slice(&output)?;
    assert_eq!(summary["total_entries"], 3);
    assert_eq!(summary["files"].as_array().unwrap().len(), 2);

    let index_path = temp_dir.path().join("sitemap.xml.gz");
    assert_eq!(summary["index"].as_str().unwrap(), index_path.to_str().unwrap());

    let bytes = fs::read(&index_path)?;
    assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
    let mut index = String::new();
    GzDecoder::new(bytes.as_slice()).read_to_string(&mut index)?;
    assert!(index.contains("<loc>https://example.com/sitemap1.xml.gz</loc>"));
    assert!(index.contains("<loc>https://example.com/sitemap2.xml.gz</loc>"));
    Ok(())
}

#[test]
fn json_lines_with_images_and_video() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = concat!(
        r#"{"loc": "/gallery", "changefreq": "weekly", "priority": 0.8, "images": ["/a.jpg", {"loc": "/b.jpg", "caption": "B & C"}]}"#,
        "\n",
        r#"{"loc": "/watch", "video": [["thumbnail_loc", "/t.jpg"], ["title", "Grilling"], ["description", "Steaks"], ["content_loc", "/v.mp4"]]}"#,
        "\n",
    );

    sitemapper_cmd()
        .args(["generate", "--site", "https://example.com", "--no-compress", "--output"])
        .arg(temp_dir.path().join("sitemap"))
        .write_stdin(input)
        .assert()
        .success();

    let xml = fs::read_to_string(temp_dir.path().join("sitemap.xml"))?;
    assert!(xml.contains("<changefreq>weekly</changefreq>"));
    assert!(xml.contains("<priority>0.8</priority>"));
    assert!(xml.contains("<image:loc>https://example.com/b.jpg</image:loc>"));
    assert!(xml.contains("<image:caption>B &amp; C</image:caption>"));
    assert!(xml.contains("<video:content_loc>https://example.com/v.mp4</video:content_loc>"));
    Ok(())
}

#[test]
fn legacy_video_prefix_flag() -> Result<()> {
    let temp_dir = TempDir::new()?;

    sitemapper_cmd()
        .args(["generate", "--site", "https://example.com", "--no-compress"])
        .arg("--legacy-video-prefix")
        .arg("--output")
        .arg(temp_dir.path().join("sitemap"))
        .write_stdin(r#"{"loc": "/watch", "video": {"title": "Grilling"}}"#)
        .assert()
        .success();

    let xml = fs::read_to_string(temp_dir.path().join("sitemap.xml"))?;
    assert!(xml.contains("<image:title>Grilling</image:title>"));
    Ok(())
}

#[test]
fn settings_file_with_flag_override() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let settings = temp_dir.path().join("sitemapper.toml");
    fs::write(
        &settings,
        format!(
            "[site]\naddress = \"https://settings.example.com\"\n\n[output]\npath = {:?}\ncompress = true\n",
            temp_dir.path().join("from-settings").display().to_string()
        ),
    )?;

    sitemapper_cmd()
        .args(["generate", "--no-compress", "--config"])
        .arg(&settings)
        .write_stdin("/a\n")
        .assert()
        .success();

    let xml = fs::read_to_string(temp_dir.path().join("from-settings.xml"))?;
    assert!(xml.contains("<loc>https://settings.example.com/a</loc>"));
    Ok(())
}

#[test]
fn relative_location_without_site_exits_with_usage_code() -> Result<()> {
    let temp_dir = TempDir::new()?;

    sitemapper_cmd()
        .args(["generate", "--output"])
        .arg(temp_dir.path().join("sitemap"))
        .write_stdin("https://example.com/ok\n/relative\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("line 2"))
        .stderr(predicate::str::contains("Site address not set"));
    Ok(())
}

#[test]
fn unknown_image_key_exits_with_usage_code() -> Result<()> {
    let temp_dir = TempDir::new()?;

    sitemapper_cmd()
        .args(["generate", "--site", "https://example.com", "--output"])
        .arg(temp_dir.path().join("sitemap"))
        .write_stdin(r#"{"loc": "/p", "images": [{"loc": "/a.jpg", "bogus": "x"}]}"#)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid image field: bogus"));
    Ok(())
}

#[test]
fn invalid_site_address_exits_with_usage_code() {
    sitemapper_cmd()
        .args(["generate", "--site", "example.com"])
        .write_stdin("/a\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid site address"));
}

#[test]
fn missing_input_file_exits_with_internal_code() -> Result<()> {
    let temp_dir = TempDir::new()?;

    sitemapper_cmd()
        .args(["generate", "--site", "https://example.com", "--input"])
        .arg(temp_dir.path().join("missing.txt"))
        .arg("--output")
        .arg(temp_dir.path().join("sitemap"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to open input"));
    Ok(())
}
