use std::path::{Path, PathBuf};

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Layered config loading: an optional file named by `{PREFIX}_CONFIG_FILE`,
/// then `{PREFIX}_`-prefixed environment variables on top of it
/// (`APP_DATABASE__URL` populates `database.url`).
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";

    fn load_dotenv() {
        // Load .env from crate root (falls back to current dir if missing)
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
    }

    fn config_file() -> Option<PathBuf> {
        std::env::var(format!("{}_CONFIG_FILE", Self::PREFIX))
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env() -> Result<Self> {
        Self::load_dotenv();

        let mut builder = config_rs::Config::builder();
        if let Some(path) = Self::config_file() {
            builder = builder.add_source(config_rs::File::from(path.as_path()).required(true));
        }

        let settings = builder
            .add_source(
                config_rs::Environment::with_prefix(Self::PREFIX)
                    .prefix_separator("_")
                    .separator(Self::SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .context("failed to read config sources")?;

        let cfg = settings
            .try_deserialize::<Self>()
            .context("failed to deserialize config")?;

        cfg.validate()?;
        Ok(cfg)
    }
}
