use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub opencast: FileOpencastConfig,
    #[serde(default)]
    pub activities: FileActivitiesConfig,
    #[serde(default)]
    pub lms: FileLmsConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileOpencastConfig {
    #[serde(default)]
    pub instances: Vec<FileOpencastInstance>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileOpencastInstance {
    pub id: i64,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileActivitiesConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileLmsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Values read from the process environment.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub database_url: Option<String>,
    pub database_max_connections: Option<u32>,
    pub lms_base_url: Option<String>,
    pub activities_enabled: Option<bool>,
    /// Single-instance shortcut used when no `[[opencast.instances]]` exist.
    pub opencast_url: Option<String>,
    pub opencast_username: Option<String>,
    pub opencast_password: Option<String>,
    /// Variables that were set but did not parse, as `(name, raw value)`.
    pub rejected: Vec<(&'static str, String)>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rejected = Vec::new();
        let server_port =
            typed_var(&lookup, "SERVER_PORT", |s| s.parse().ok(), &mut rejected);
        let database_max_connections = typed_var(
            &lookup,
            "DB_MAX_CONNECTIONS",
            |s| s.parse().ok(),
            &mut rejected,
        );
        let activities_enabled =
            typed_var(&lookup, "ACTIVITIES_ENABLED", parse_bool, &mut rejected);

        Self {
            config_path: lookup("CASTVIEW_CONFIG").map(PathBuf::from),
            server_host: lookup("SERVER_HOST"),
            server_port,
            database_url: lookup("DATABASE_URL"),
            database_max_connections,
            lms_base_url: lookup("LMS_BASE_URL"),
            activities_enabled,
            opencast_url: lookup("OPENCAST_URL"),
            opencast_username: lookup("OPENCAST_USERNAME"),
            opencast_password: lookup("OPENCAST_PASSWORD"),
            rejected,
        }
    }
}

fn typed_var<F, T>(
    lookup: &F,
    key: &'static str,
    parse: impl Fn(&str) -> Option<T>,
    rejected: &mut Vec<(&'static str, String)>,
) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        rejected.push((key, raw));
    }
    parsed
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn from_lookup_parses_typed_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SERVER_PORT", "8081"),
            ("ACTIVITIES_ENABLED", "off"),
            ("DB_MAX_CONNECTIONS", "not-a-number"),
        ]);
        let env = EnvConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(env.server_port, Some(8081));
        assert_eq!(env.activities_enabled, Some(false));
        assert_eq!(env.database_max_connections, None);
        assert_eq!(
            env.rejected,
            vec![("DB_MAX_CONNECTIONS", "not-a-number".to_string())]
        );
        assert!(env.database_url.is_none());
    }
}
