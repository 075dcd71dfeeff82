//! Command implementations for the sitemapper CLI

mod generate;

pub use generate::execute as generate;
