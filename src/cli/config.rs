use crate::config::generate::generate_starter_config;
use crate::config::{load_config, user_config_path};
use std::fs;
use std::path::PathBuf;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Write the starter config to stdout or `~/.config/logshare/config.yml`.
/// An existing file is never overwritten.
pub fn init(stdout: bool) -> CliResult {
    let sample = generate_starter_config();
    if stdout {
        print!("{sample}");
        return Ok(());
    }

    let target = user_config_path().ok_or("cannot locate a home directory; use --stdout")?;
    if target.exists() {
        return Err(format!("{} already exists; use --stdout to print the sample", target.display()).into());
    }

    if let Some(dir) = target.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(&target, sample)?;
    println!("Wrote starter config to {}", target.display());
    Ok(())
}

pub fn validate(config_path: Option<PathBuf>) -> CliResult {
    let Some(path) = config_path else {
        return Err("no config file to validate; pass --config <path>".into());
    };

    let config = load_config(&path)?;
    let mappings = config.mappings.as_ref().map_or(0, Vec::len);
    println!(
        "{} is valid ({} custom mappings, serving {})",
        path.display(),
        mappings,
        if config.publish.is_some() && config.auth.is_some() { "enabled" } else { "disabled" }
    );
    Ok(())
}
