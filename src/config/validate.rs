use anyhow::{Result, bail};

use super::AppConfig;

const MAX_PAGE_SIZE: u64 = 100;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg.general.page_size == 0 || cfg.general.page_size > MAX_PAGE_SIZE {
        errors.push(format!(
            "general.page_size ({}) must be between 1 and {MAX_PAGE_SIZE}",
            cfg.general.page_size
        ));
    }

    if cfg.database.url.trim().is_empty() {
        errors.push("database.url must not be empty".to_string());
    }

    if cfg.database.max_connections == 0 {
        errors.push("database.max_connections must be > 0".to_string());
    }

    if cfg.database.min_idle > cfg.database.max_connections {
        errors.push(format!(
            "database.min_idle ({}) must be <= database.max_connections ({})",
            cfg.database.min_idle, cfg.database.max_connections
        ));
    }

    if cfg.auth.jwt_secret.trim().is_empty() {
        errors.push("auth.jwt_secret must not be empty".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::config::AppConfig;

    #[test]
    fn default_config_is_valid_in_debug_builds() {
        let cfg = AppConfig::default();
        validate(&cfg).expect("defaults should validate");
    }

    #[test]
    fn collects_every_violation() {
        let mut cfg = AppConfig::default();
        cfg.general.host = " ".to_string();
        cfg.database.min_idle = cfg.database.max_connections + 1;
        cfg.auth.jwt_secret = String::new();

        let err = validate(&cfg).expect_err("config should be rejected");
        let message = err.to_string();

        assert!(message.contains("general.host"));
        assert!(message.contains("database.min_idle"));
        assert!(message.contains("auth.jwt_secret"));
    }

    #[test]
    fn rejects_page_size_outside_bounds() {
        let mut cfg = AppConfig::default();
        cfg.general.page_size = 0;

        let err = validate(&cfg).expect_err("page size 0 should be rejected");
        assert!(err.to_string().contains("general.page_size"));
    }
}
