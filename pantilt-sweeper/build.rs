//! Build script for pantilt-sweeper
//!
//! Validates the embedded default pantilt.toml at compile time, so a
//! broken default never ships.

use std::fs;
use std::path::Path;

/// Sections the sweeper understands
const KNOWN_SECTIONS: &[&str] = &["pan", "tilt", "servo", "sweep"];

fn main() {
    println!("cargo:rerun-if-changed=pantilt.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("pantilt.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read pantilt.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Table = match toml::from_str(&config_content) {
        Ok(table) => table,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in pantilt.toml                      ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n\
                \n{}\n",
                e
            );
        }
    };

    for (key, value) in &config {
        if !KNOWN_SECTIONS.contains(&key.as_str()) {
            panic!("pantilt.toml: unknown section [{}]", key);
        }
        if !value.is_table() {
            panic!("pantilt.toml: `{}` must be a table", key);
        }
    }

    let step = config
        .get("sweep")
        .and_then(|s| s.get("step_deg"))
        .and_then(|v| v.as_integer());
    if let Some(step) = step {
        if !(1..=180).contains(&step) {
            panic!("pantilt.toml: sweep.step_deg must be 1-180, got {}", step);
        }
    }
}
