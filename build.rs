//! Build script for the Google Ads CLI.
//!
//! Copies the `.env.example` template into the per-user configuration
//! directory, next to the `.env` file the binary loads at startup.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to:
/// - Linux: `~/.config/gads/.env.example`
/// - macOS: `~/Library/Application Support/gads/.env.example`
/// - Windows: `%APPDATA%/gads/.env.example`
///
/// A missing template only produces a cargo warning.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    let Some(mut out_dir) = dirs::config_dir() else {
        println!("cargo:warning=no configuration directory on this platform, template not installed");
        return Ok(());
    };
    out_dir.push("gads");

    // Sandboxed builds may not be allowed to write there.
    if let Err(e) = fs::create_dir_all(&out_dir)
        .and_then(|_| fs::copy(&env_example_path, out_dir.join(".env.example")))
    {
        println!(
            "cargo:warning=could not install .env.example into {}: {}",
            out_dir.display(),
            e
        );
    }

    Ok(())
}
