#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::time::Duration;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// Create a `sitemapper` command isolated from the caller's environment.
#[allow(dead_code)]
pub fn sitemapper_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sitemapper"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env_remove("SITEMAPPER_SITE");
    cmd.env("NO_COLOR", "1");
    cmd
}
