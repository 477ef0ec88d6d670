use once_cell::sync::Lazy;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use url::Url;

use castview_model::InstanceId;

use super::{
    models::{
        ActivitiesConfig, Config, ConfigMetadata, DEFAULT_DB_MAX_CONNECTIONS,
        DEFAULT_OPENCAST_TIMEOUT, DatabaseConfig, LmsConfig, OpencastConfig,
        OpencastInstanceConfig, ServerConfig,
    },
    sources::{EnvConfig, FileConfig, FileOpencastInstance},
    validation::{ConfigGuardRailError, ConfigWarnings},
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("castview.toml"),
        PathBuf::from("config/castview.toml"),
    ]
});

const DEFAULT_LMS_BASE_URL: &str = "http://localhost";
const ENV_INSTANCE_ID: i64 = 1;

#[derive(Debug, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    pub load_env_file: bool,
    /// Replaces the process environment, mostly for tests.
    pub env: Option<EnvConfig>,
}

impl Default for ConfigLoaderOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            env_file: None,
            load_env_file: true,
            env: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_env(mut self, env: EnvConfig) -> Self {
        self.options.env = Some(env);
        self
    }

    pub fn without_env_file(mut self) -> Self {
        self.options.load_env_file = false;
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = if !self.options.load_env_file {
            false
        } else {
            match &self.options.env_file {
                Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                    |err| match err {
                        dotenvy::Error::Io(_) => Ok(false),
                        _ => Err(err),
                    },
                )?,
                None => {
                    dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                        dotenvy::Error::Io(_) => Ok(false),
                        _ => Err(err),
                    })?
                }
            }
        };

        let env_config = match &self.options.env {
            Some(env) => env.clone(),
            None => EnvConfig::gather(),
        };

        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let (config, warnings) = compose_config(
            file_config,
            env_config,
            config_path,
            env_file_loaded,
        )?;

        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let (path, explicit) = if let Some(explicit) = &self.options.config_path
        {
            (Some(explicit.clone()), true)
        } else if let Some(from_env) = &env_config.config_path {
            (Some(from_env.clone()), true)
        } else {
            (
                DEFAULT_CONFIG_LOCATIONS
                    .iter()
                    .find(|candidate| candidate.exists())
                    .cloned(),
                false,
            )
        };

        let Some(path) = path else {
            return Ok((None, None));
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|err| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
    toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source: err,
    })
}

fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
    env_file_loaded: bool,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if file_config.is_none() {
        warnings.push_with_hint(
            "No castview.toml detected; falling back to environment variables",
            "Create castview.toml or point CASTVIEW_CONFIG at one",
        );
    }

    for (key, raw) in &env.rejected {
        warnings.push_with_hint(
            format!("Ignoring {key}={raw:?}: value does not parse"),
            format!("Fix or unset {key}; the file value or default applies"),
        );
    }

    let FileConfig {
        server: file_server,
        database: file_database,
        opencast: file_opencast,
        activities: file_activities,
        lms: file_lms,
    } = file_config.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| "0.0.0.0".to_string()),
        port: env.server_port.or(file_server.port).unwrap_or(3000),
    };

    let database = DatabaseConfig {
        url: env.database_url.clone().or(file_database.url),
        max_connections: env
            .database_max_connections
            .or(file_database.max_connections)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
    };
    if database.url.is_none() {
        warnings.push_with_hint(
            "No database url configured",
            "Set DATABASE_URL or [database].url before serving",
        );
    }

    let opencast =
        compose_opencast(file_opencast.instances, &env, &mut warnings)?;

    let activities = ActivitiesConfig {
        enabled: env
            .activities_enabled
            .or(file_activities.enabled)
            .unwrap_or(true),
    };

    let raw_lms = env.lms_base_url.clone().or(file_lms.base_url);
    if raw_lms.is_none() {
        warnings.push_with_hint(
            format!("No LMS base url configured; using {DEFAULT_LMS_BASE_URL}"),
            "Set LMS_BASE_URL so activity links point at the right host",
        );
    }
    let raw_lms = raw_lms.unwrap_or_else(|| DEFAULT_LMS_BASE_URL.to_string());
    let lms = LmsConfig {
        base_url: Url::parse(&raw_lms)
            .map_err(|_| ConfigGuardRailError::InvalidLmsUrl { url: raw_lms })?,
    };

    let config = Config {
        server,
        database,
        opencast,
        activities,
        lms,
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded,
        },
    };

    Ok((config, warnings))
}

fn compose_opencast(
    file_instances: Vec<FileOpencastInstance>,
    env: &EnvConfig,
    warnings: &mut ConfigWarnings,
) -> Result<OpencastConfig, ConfigGuardRailError> {
    let raw_instances = if file_instances.is_empty() {
        match &env.opencast_url {
            Some(url) => vec![FileOpencastInstance {
                id: ENV_INSTANCE_ID,
                name: "Opencast".to_string(),
                url: url.clone(),
                username: env.opencast_username.clone().unwrap_or_default(),
                password: env.opencast_password.clone().unwrap_or_default(),
                timeout_secs: None,
                default: true,
            }],
            None => Vec::new(),
        }
    } else {
        if env.opencast_url.is_some() {
            warnings.push(
                "OPENCAST_URL is ignored because [[opencast.instances]] are configured",
            );
        }
        file_instances
    };

    if raw_instances.is_empty() {
        return Err(ConfigGuardRailError::NoOpencastInstances);
    }

    let mut seen = HashSet::new();
    for raw in &raw_instances {
        if !seen.insert(raw.id) {
            return Err(ConfigGuardRailError::DuplicateInstance { id: raw.id });
        }
    }

    let defaults: Vec<i64> = raw_instances
        .iter()
        .filter(|raw| raw.default)
        .map(|raw| raw.id)
        .collect();
    if defaults.len() > 1 {
        return Err(ConfigGuardRailError::MultipleDefaults { ids: defaults });
    }
    let default_id = match defaults.first() {
        Some(id) => *id,
        None => {
            let first = raw_instances[0].id;
            warnings.push(format!(
                "No Opencast instance marked as default; using instance {first}"
            ));
            first
        }
    };

    let instances = raw_instances
        .into_iter()
        .map(|raw| {
            let base_url = Url::parse(&raw.url).map_err(|_| {
                ConfigGuardRailError::InvalidInstanceUrl {
                    id: raw.id,
                    url: raw.url.clone(),
                }
            })?;
            if raw.username.is_empty() || raw.password.is_empty() {
                warnings.push(format!(
                    "Opencast instance {} has no API credentials; requests will be anonymous",
                    raw.id
                ));
            }
            Ok(OpencastInstanceConfig {
                id: InstanceId(raw.id),
                name: raw.name,
                base_url,
                username: raw.username,
                password: raw.password,
                timeout: raw
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_OPENCAST_TIMEOUT),
                is_default: raw.id == default_id,
            })
        })
        .collect::<Result<Vec<_>, ConfigGuardRailError>>()?;

    Ok(OpencastConfig { instances })
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}
