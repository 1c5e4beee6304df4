//! Settings file loader for Zeny.
//!
//! Reads an optional TOML file and deserializes it into [`Settings`]. Falls
//! back to defaults when no file is given, the file is missing, or it is
//! malformed. Required values (store, signing secret, admin) never come from
//! this file.

use std::path::Path;

use zeny_types::config::Settings;

/// Load settings from `path`.
///
/// - If `path` is `None` or the file does not exist, returns [`Settings::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed settings.
pub async fn load_settings(path: Option<&Path>) -> Settings {
    let Some(config_path) = path else {
        return Settings::default();
    };

    let content = match tokio::fs::read_to_string(config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No settings file at {}, using defaults", config_path.display());
            return Settings::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return Settings::default();
        }
    };

    match toml::from_str::<Settings>(&content) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use zeny_types::config::LogFormat;

    #[tokio::test]
    async fn load_settings_without_path_returns_default() {
        let settings = load_settings(None).await;
        assert_eq!(settings.server.port, 8001);
        assert_eq!(settings.auth.token_ttl_hours, 24);
    }

    #[tokio::test]
    async fn load_settings_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let settings = load_settings(Some(&tmp.path().join("config.toml"))).await;
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.logging.format, LogFormat::Pretty);
    }

    #[tokio::test]
    async fn load_settings_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(
            &config_path,
            r#"
[server]
port = 9000

[auth]
token_ttl_hours = 2

[logging]
format = "json"
"#,
        )
        .await
        .unwrap();

        let settings = load_settings(Some(&config_path)).await;
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.auth.token_ttl_hours, 2);
        assert_eq!(settings.logging.format, LogFormat::Json);
    }

    #[tokio::test]
    async fn load_settings_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let settings = load_settings(Some(&config_path)).await;
        assert_eq!(settings.server.port, 8001);
        assert_eq!(settings.auth.token_ttl_hours, 24);
    }
}
