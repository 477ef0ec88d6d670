use std::{fmt, path::PathBuf, time::Duration};

use castview_model::{InstanceDescriptor, InstanceId};
use url::Url;

pub const DEFAULT_OPENCAST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub opencast: OpencastConfig,
    pub activities: ActivitiesConfig,
    pub lms: LmsConfig,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct OpencastConfig {
    /// Validated to be non-empty with exactly one default entry.
    pub instances: Vec<OpencastInstanceConfig>,
}

impl OpencastConfig {
    pub fn default_instance(&self) -> Option<&OpencastInstanceConfig> {
        self.instances
            .iter()
            .find(|instance| instance.is_default)
            .or_else(|| self.instances.first())
    }

    pub fn get(&self, id: InstanceId) -> Option<&OpencastInstanceConfig> {
        self.instances.iter().find(|instance| instance.id == id)
    }
}

#[derive(Clone)]
pub struct OpencastInstanceConfig {
    pub id: InstanceId,
    pub name: String,
    pub base_url: Url,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
    pub is_default: bool,
}

impl OpencastInstanceConfig {
    pub fn descriptor(&self) -> InstanceDescriptor {
        InstanceDescriptor {
            id: self.id,
            name: self.name.clone(),
            is_default: self.is_default,
        }
    }
}

impl fmt::Debug for OpencastInstanceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpencastInstanceConfig")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("is_default", &self.is_default)
            .finish()
    }
}

/// Whether the LMS activity plugin is installed. When disabled, the report
/// never consults the activity tables.
#[derive(Debug, Clone, Copy)]
pub struct ActivitiesConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct LmsConfig {
    /// Base the activity view links are built on.
    pub base_url: Url,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
