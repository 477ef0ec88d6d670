use std::{fs, time::Duration};

use castview_config::{
    ConfigGuardRailError, ConfigLoadError, ConfigLoader, sources::EnvConfig,
};
use castview_model::InstanceId;
use tempfile::tempdir;

const TWO_INSTANCES: &str = r#"
[server]
host = "127.0.0.1"
port = 8080

[database]
url = "postgres://castview@localhost/castview"

[lms]
base_url = "https://lms.example.edu/moodle"

[[opencast.instances]]
id = 1
name = "Main"
url = "https://opencast.example.edu"
username = "admin"
password = "secret"

[[opencast.instances]]
id = 2
name = "Archive"
url = "https://archive.example.edu"
username = "admin"
password = "secret"
timeout_secs = 30
default = true
"#;

fn loader_for(path: &std::path::Path, env: EnvConfig) -> ConfigLoader {
    ConfigLoader::new()
        .with_config_path(path)
        .with_env(env)
        .without_env_file()
}

#[test]
fn file_values_are_loaded_and_flagged_default_wins() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("castview.toml");
    fs::write(&path, TWO_INSTANCES).expect("write config");

    let load = loader_for(&path, EnvConfig::default())
        .load()
        .expect("config loads");
    let config = load.config;

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(
        config.database.url.as_deref(),
        Some("postgres://castview@localhost/castview")
    );
    assert!(config.activities.enabled);
    assert_eq!(config.opencast.instances.len(), 2);

    let default = config.opencast.default_instance().expect("default");
    assert_eq!(default.id, InstanceId(2));
    assert_eq!(default.timeout, Duration::from_secs(30));
    assert!(!config.opencast.get(InstanceId(1)).unwrap().is_default);
    assert_eq!(config.metadata.config_path.as_deref(), Some(path.as_path()));
    assert!(load.warnings.is_empty(), "{:?}", load.warnings);
}

#[test]
fn env_overrides_file_values() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("castview.toml");
    fs::write(&path, TWO_INSTANCES).expect("write config");

    let env = EnvConfig {
        server_port: Some(9999),
        database_url: Some("postgres://override@db/castview".into()),
        activities_enabled: Some(false),
        lms_base_url: Some("https://other-lms.example.edu".into()),
        ..EnvConfig::default()
    };
    let config = loader_for(&path, env).load().expect("config loads").config;

    assert_eq!(config.server.port, 9999);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(
        config.database.url.as_deref(),
        Some("postgres://override@db/castview")
    );
    assert!(!config.activities.enabled);
    assert_eq!(config.lms.base_url.host_str(), Some("other-lms.example.edu"));
}

#[test]
fn env_only_setup_builds_single_default_instance() {
    let env = EnvConfig {
        opencast_url: Some("https://opencast.example.edu".into()),
        opencast_username: Some("api".into()),
        opencast_password: Some("pw".into()),
        database_url: Some("postgres://localhost/castview".into()),
        lms_base_url: Some("https://lms.example.edu".into()),
        ..EnvConfig::default()
    };
    let load = ConfigLoader::new()
        .with_env(env)
        .without_env_file()
        .load()
        .expect("config loads");

    let instances = &load.config.opencast.instances;
    assert_eq!(instances.len(), 1);
    assert!(instances[0].is_default);
    assert_eq!(instances[0].username, "api");
    assert!(
        load.warnings
            .items
            .iter()
            .any(|w| w.message.contains("No castview.toml"))
    );
}

#[test]
fn missing_default_flag_falls_back_to_first_instance_with_warning() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("castview.toml");
    fs::write(
        &path,
        r#"
[[opencast.instances]]
id = 7
name = "Only"
url = "https://opencast.example.edu"
"#,
    )
    .expect("write config");

    let load = loader_for(&path, EnvConfig::default())
        .load()
        .expect("config loads");

    let default = load.config.opencast.default_instance().unwrap();
    assert_eq!(default.id, InstanceId(7));
    assert!(default.is_default);
    let messages: Vec<_> =
        load.warnings.items.iter().map(|w| w.message.as_str()).collect();
    assert!(messages.iter().any(|m| m.contains("marked as default")));
    assert!(messages.iter().any(|m| m.contains("no API credentials")));
    assert!(messages.iter().any(|m| m.contains("No database url")));
}

#[test]
fn guard_rails_reject_unservable_configs() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("castview.toml");

    fs::write(&path, "[server]\nport = 3000\n").expect("write config");
    let err = loader_for(&path, EnvConfig::default()).load().unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::NoOpencastInstances)
    ));

    fs::write(
        &path,
        r#"
[[opencast.instances]]
id = 1
name = "A"
url = "https://a.example.edu"
default = true

[[opencast.instances]]
id = 2
name = "B"
url = "https://b.example.edu"
default = true
"#,
    )
    .expect("write config");
    let err = loader_for(&path, EnvConfig::default()).load().unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::MultipleDefaults { .. })
    ));

    fs::write(
        &path,
        r#"
[[opencast.instances]]
id = 1
name = "A"
url = "https://a.example.edu"

[[opencast.instances]]
id = 1
name = "B"
url = "https://b.example.edu"
"#,
    )
    .expect("write config");
    let err = loader_for(&path, EnvConfig::default()).load().unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::DuplicateInstance {
            id: 1
        })
    ));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let err = loader_for(&dir.path().join("nope.toml"), EnvConfig::default())
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
}

#[test]
fn malformed_toml_reports_parse_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("castview.toml");
    fs::write(&path, "[server\nport = ").expect("write config");
    let err = loader_for(&path, EnvConfig::default()).load().unwrap_err();
    assert!(matches!(err, ConfigLoadError::Parse { .. }));
}

#[test]
fn unparsable_env_values_warn_and_fall_back() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("castview.toml");
    fs::write(&path, TWO_INSTANCES).expect("write config");

    let vars = [("SERVER_PORT", "80a"), ("DB_MAX_CONNECTIONS", "lots")];
    let env = EnvConfig::from_lookup(|key| {
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.to_string())
    });
    let load = loader_for(&path, env).load().expect("config loads");

    assert_eq!(load.config.server.port, 8080);
    assert_eq!(load.config.database.max_connections, 8);
    let messages: Vec<_> =
        load.warnings.items.iter().map(|w| w.message.as_str()).collect();
    assert!(
        messages.iter().any(|m| m.contains("SERVER_PORT=\"80a\"")),
        "{messages:?}"
    );
    assert!(
        messages.iter().any(|m| m.contains("DB_MAX_CONNECTIONS=\"lots\"")),
        "{messages:?}"
    );
}
