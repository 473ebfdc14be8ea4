//! Show or write the configuration.

use std::path::Path;

use touchfabric_common::config::AppConfig;

use crate::ConfigAction;

pub fn run(config: &AppConfig, path: &Path, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("# {}", path.display());
            println!("{}", serde_json::to_string_pretty(config)?);
            if let Err(e) = config.validate() {
                eprintln!("warning: {e}");
            }
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            AppConfig::default().save_to(path)?;
            println!("Wrote default config to {}", path.display());
        }
    }
    Ok(())
}
