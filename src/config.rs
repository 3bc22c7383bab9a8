//! Configuration module
//!
//! Settings are read from a TOML file, by default
//! `~/.config/audioshare/config.toml`:
//!
//! ```toml
//! [database]
//! url = "sqlite://./audioshare.db?mode=rwc"
//!
//! [logging]
//! level = "info"
//!
//! [playlists]
//! favourites_default_name = "Favourites"
//!
//! [security]
//! bcrypt_cost = 12
//!
//! [storage]
//! audio_dir = "./audio"
//!
//! [admin]
//! username = "admin"
//! email = "admin@example.com"
//! password = "change-me"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::database::DatabaseConfig;

pub const CONFIG_ENV_VAR: &str = "AUDIOSHARE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub playlists: PlaylistsSection,
    pub security: SecuritySection,
    pub storage: StorageSection,
    pub admin: Option<AdminSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: DatabaseConfig::default().url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// The name has no serde default: once the section is written, the key
/// must be too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistsSection {
    pub favourites_default_name: String,
}

impl Default for PlaylistsSection {
    fn default() -> Self {
        Self {
            favourites_default_name: "Favourites".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub bcrypt_cost: u32,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub audio_dir: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            audio_dir: PathBuf::from("./audio"),
        }
    }
}

/// Bootstrap administrator created on startup if missing.
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminSection {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSection")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AppConfig {
    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url is empty".into()));
        }
        if self.playlists.favourites_default_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "playlists.favourites_default_name is empty".into(),
            ));
        }
        if !(4..=31).contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::Invalid(format!(
                "security.bcrypt_cost must be within 4..=31, got {}",
                self.security.bcrypt_cost
            )));
        }
        if let Some(admin) = &self.admin {
            if admin.email.trim().is_empty() || admin.password.is_empty() {
                return Err(ConfigError::Invalid(
                    "admin.email and admin.password are required".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
        }
    }
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// No file at the path; built-in defaults apply.
    Defaults,
}

/// Load `path`, falling back to defaults only when the file does not exist.
/// A file that exists but cannot be read, parsed or validated is an error.
pub fn resolve_config(path: &Path) -> Result<(AppConfig, ConfigSource), ConfigError> {
    match AppConfig::load(path) {
        Ok(config) => Ok((config, ConfigSource::File)),
        Err(ConfigError::Read { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            Ok((AppConfig::default(), ConfigSource::Defaults))
        }
        Err(e) => Err(e),
    }
}

/// `$AUDIOSHARE_CONFIG` if set, else `<config dir>/audioshare/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("audioshare")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_yields_defaults() {
        let file = write_config("");
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.playlists.favourites_default_name, "Favourites");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.security.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(config.admin.is_none());
    }

    #[test]
    fn full_file_round_trips_fields() {
        let file = write_config(
            r#"
            [database]
            url = "sqlite::memory:"

            [logging]
            level = "debug"

            [playlists]
            favourites_default_name = "Liked"

            [security]
            bcrypt_cost = 4

            [storage]
            audio_dir = "/var/lib/audioshare"

            [admin]
            username = "root"
            email = "root@example.com"
            password = "pw"
            "#,
        );
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.database_config().url, "sqlite::memory:");
        assert_eq!(config.playlists.favourites_default_name, "Liked");
        assert_eq!(config.security.bcrypt_cost, 4);
        assert_eq!(config.storage.audio_dir, PathBuf::from("/var/lib/audioshare"));
        assert_eq!(config.admin.unwrap().email, "root@example.com");
    }

    #[test]
    fn playlists_section_requires_name() {
        let file = write_config("[playlists]\n");
        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));

        let file = write_config("[playlists]\nfavourites_default_name = \"\"\n");
        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn bcrypt_cost_is_bounded() {
        let mut config = AppConfig::default();
        config.security.bcrypt_cost = 3;
        assert!(config.validate().is_err());
        config.security.bcrypt_cost = 31;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppConfig::load(&dir.path().join("absent.toml")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn admin_password_is_redacted() {
        let admin = AdminSection {
            username: "root".into(),
            email: "root@example.com".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{:?}", admin).contains("hunter2"));
    }

    #[test]
    fn only_a_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, source) = resolve_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(config.playlists.favourites_default_name, "Favourites");

        let file = write_config("[playlists]\nfavourites_default_name = \"Liked\"\n");
        let (config, source) = resolve_config(file.path()).unwrap();
        assert_eq!(source, ConfigSource::File);
        assert_eq!(config.playlists.favourites_default_name, "Liked");
    }

    #[test]
    fn broken_file_is_not_replaced_by_defaults() {
        let empty_name = write_config("[playlists]\nfavourites_default_name = \"\"\n");
        assert!(matches!(
            resolve_config(empty_name.path()),
            Err(ConfigError::Invalid(_))
        ));

        let garbage = write_config("[database\nurl = ");
        assert!(matches!(
            resolve_config(garbage.path()),
            Err(ConfigError::Parse { .. })
        ));

        // a directory exists but cannot be read as a file
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            resolve_config(dir.path()),
            Err(ConfigError::Read { .. })
        ));
    }
}
