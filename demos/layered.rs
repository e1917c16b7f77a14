//! Layered configuration example.
//!
//! Demonstrates:
//! - Defaults as the last-resort tier
//! - Mount-order precedence between a JSON file, the environment and flags
//! - Local overrides and how `reset` clears them
//! - Saving a JSON source and loading it back
//!
//! Run with: `cargo run --example layered -- --port 9000`

use clap::{Arg, Command};
use tiered_config::prelude::*;
use tiered_config::sources::{ArgvSource, EnvSource, JsonFileSource};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tiered_config=debug".into()),
        )
        .init();

    let matches = Command::new("layered")
        .arg(Arg::new("port").long("port"))
        .get_matches();

    let path = std::env::temp_dir().join("tiered-config-demo.json");

    let mut config = Hierarchy::builder()
        .with_defaults([
            ("PATH", "/some/configured/path"),
            ("port", "8080"),
            ("workers", "4"),
        ])
        // Flags beat the file, the file beats the environment.
        .mount("argv", ArgvSource::from_matches(&matches, ""))
        .mount("json", JsonFileSource::new(&path))
        // SETTINGS_DB=xyz is visible as "DB".
        .mount("env", EnvSource::new("SETTINGS_"))
        .build();

    println!("Mounted sources: {:?}", config.mount_names());
    println!("port: {:?}", config.get("port"));
    println!("workers: {:?}", config.get("workers"));

    // The real PATH from the environment shadows the default.
    println!("PATH in config: {:?}", config.get("PATH"));
    println!("PATH in defaults: {:?}", config.defaults().get("PATH"));

    config.set("PATH", Value::from("/new/path"));
    println!("PATH after override: {:?}", config.get("PATH"));
    println!("PATH in defaults is unchanged: {:?}", config.defaults().get("PATH"));

    config.reset(None);
    println!("PATH after reset: {:?}", config.get("PATH"));

    if let Some(json) = config.mounted_mut("json") {
        json.set("abcd", Value::from("1234"));
        json.save()?;
        json.reset(None);
        json.load()?;
        println!("abcd from reloaded JSON file: {:?}", json.get("abcd"));
    }

    println!("Merged keys: {}", config.all().len());

    std::fs::remove_file(&path)
        .map_err(|e| ConfigError::Other(format!("failed to remove demo file: {}", e)))?;
    Ok(())
}
