//! Server settings: TOML file plus environment overrides.

use coindrop_room::RoomConfig;
use serde::Deserialize;

use crate::ServerError;

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_query_addr() -> String {
    "127.0.0.1:8081".to_string()
}

fn default_coin_ttl_secs() -> u64 {
    3600
}

/// Static server configuration, loaded once at startup.
///
/// ```toml
/// listen_addr = "127.0.0.1:8080"
/// query_addr = "127.0.0.1:8081"
/// coin_ttl_secs = 3600
///
/// [[rooms]]
/// id = "room1"
/// coin_count = 10
/// area = { x_min = 0, x_max = 10, y_min = 0, y_max = 10, z_min = 0, z_max = 10 }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// WebSocket gateway listen address.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// HTTP query endpoint listen address.
    #[serde(default = "default_query_addr")]
    pub query_addr: String,

    /// Delay between a generation and its wholesale expiration.
    #[serde(default = "default_coin_ttl_secs")]
    pub coin_ttl_secs: u64,

    /// The ordered room list. Ids must be unique and bounding volumes
    /// well-formed; `RoomDirectory::new` enforces both.
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
}

impl Settings {
    /// Reads and validates settings from a TOML file.
    pub fn load(path: &str) -> Result<Self, ServerError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Settings(format!("cannot read {path}: {e}")))?;
        let settings: Settings = toml::from_str(&content)
            .map_err(|e| ServerError::Settings(format!("cannot parse {path}: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Applies `COINDROP_LISTEN_ADDR` / `COINDROP_QUERY_ADDR` overrides.
    pub fn override_from_env(&mut self) {
        self.apply_overrides(
            std::env::var("COINDROP_LISTEN_ADDR").ok(),
            std::env::var("COINDROP_QUERY_ADDR").ok(),
        );
    }

    fn apply_overrides(&mut self, listen_addr: Option<String>, query_addr: Option<String>) {
        if let Some(addr) = listen_addr {
            self.listen_addr = addr;
        }
        if let Some(addr) = query_addr {
            self.query_addr = addr;
        }
    }

    fn validate(&self) -> Result<(), ServerError> {
        if self.coin_ttl_secs == 0 {
            return Err(ServerError::Settings("coin_ttl_secs must be > 0".into()));
        }
        if self
            .rooms
            .iter()
            .any(|room| room.id.as_str().is_empty())
        {
            return Err(ServerError::Settings("room ids must be non-empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Result<Settings, ServerError> {
        let settings: Settings =
            toml::from_str(toml_str).map_err(|e| ServerError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    const FULL: &str = r#"
        listen_addr = "0.0.0.0:9000"
        query_addr = "0.0.0.0:9001"
        coin_ttl_secs = 60

        [[rooms]]
        id = "room1"
        coin_count = 10
        area = { x_min = 0, x_max = 10, y_min = 0, y_max = 10, z_min = 0, z_max = 10 }

        [[rooms]]
        id = "room2"
        coin_count = 5
        area = { x_min = -5, x_max = 5, y_min = 0, y_max = 3, z_min = 0, z_max = 3 }
    "#;

    #[test]
    fn test_parse_full_settings() {
        let settings = parse(FULL).unwrap();
        assert_eq!(settings.listen_addr, "0.0.0.0:9000");
        assert_eq!(settings.coin_ttl_secs, 60);
        assert_eq!(settings.rooms.len(), 2);
        assert_eq!(settings.rooms[0].id.as_str(), "room1");
        assert_eq!(settings.rooms[1].coin_count, 5);
        assert_eq!(settings.rooms[1].area.x_min, -5);
    }

    #[test]
    fn test_defaults_apply_when_fields_omitted() {
        let settings = parse("").unwrap();
        assert_eq!(settings.listen_addr, "127.0.0.1:8080");
        assert_eq!(settings.query_addr, "127.0.0.1:8081");
        assert_eq!(settings.coin_ttl_secs, 3600);
        assert!(settings.rooms.is_empty());
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        let result = parse("coin_ttl_secs = 0");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_room_id_is_rejected() {
        let result = parse(
            r#"
            [[rooms]]
            id = ""
            coin_count = 1
            area = { x_min = 0, x_max = 1, y_min = 0, y_max = 1, z_min = 0, z_max = 1 }
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_replace_addresses() {
        let mut settings = parse(FULL).unwrap();
        settings.apply_overrides(Some("10.0.0.1:1234".into()), None);
        assert_eq!(settings.listen_addr, "10.0.0.1:1234");
        assert_eq!(settings.query_addr, "0.0.0.0:9001");
    }

    #[test]
    fn test_load_missing_file_is_a_settings_error() {
        let err = Settings::load("/does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ServerError::Settings(_)));
    }
}
