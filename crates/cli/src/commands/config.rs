use std::env;
use std::fs;
use std::path::Path;

use catalog_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            )
        }
    };

    CommandResult { exit_code: 0, output: render(&config, resolve_config_path(None).as_deref()) }
}

pub fn render(config: &AppConfig, config_file_path: Option<&Path>) -> String {
    let config_file_doc = load_config_file_doc(config_file_path);

    let fields: [(&str, String, &[&str]); 9] = [
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            &["CATALOG_SERVER_BIND_ADDRESS"],
        ),
        ("server.port", config.server.port.to_string(), &["CATALOG_SERVER_PORT"]),
        (
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            &["CATALOG_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        ),
        (
            "server.cors_allowed_origins",
            render_list(&config.server.cors_allowed_origins),
            &["CATALOG_SERVER_CORS_ALLOWED_ORIGINS"],
        ),
        (
            "catalog.id_strategy",
            format!("{:?}", config.catalog.id_strategy),
            &["CATALOG_CATALOG_ID_STRATEGY"],
        ),
        ("catalog.id_length", config.catalog.id_length.to_string(), &["CATALOG_CATALOG_ID_LENGTH"]),
        ("catalog.seed_demo", config.catalog.seed_demo.to_string(), &["CATALOG_CATALOG_SEED_DEMO"]),
        (
            "logging.level",
            config.logging.level.clone(),
            &["CATALOG_LOGGING_LEVEL", "CATALOG_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            &["CATALOG_LOGGING_FORMAT", "CATALOG_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_keys) in fields {
        let source = field_source(key, env_keys, config_file_doc.as_ref(), config_file_path);
        lines.push(render_line(key, &value, source));
    }

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env_value_set(key)) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn env_value_set(key: &str) -> bool {
    env::var(key).is_ok_and(|value| !value.trim().is_empty())
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_list(values: &[String]) -> String {
    if values.is_empty() {
        return "<none>".to_string();
    }
    values.join(",")
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
