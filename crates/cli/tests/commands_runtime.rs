use std::env;
use std::sync::{Mutex, OnceLock};

use catalog_cli::commands::{config, smoke};
use serde_json::Value;

#[test]
fn smoke_returns_success_report_with_default_env() {
    with_env(&[], || {
        let result = smoke::run();
        assert_eq!(result.exit_code, 0, "expected successful smoke report");

        let payload = parse_payload(last_line(&result.output));
        assert_eq!(payload["command"], "smoke");
        assert_eq!(payload["status"], "pass");

        let names: Vec<_> = payload["checks"]
            .as_array()
            .expect("checks array")
            .iter()
            .map(|check| check["name"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "config_validation",
                "catalog_create",
                "catalog_update",
                "catalog_delete",
                "catalog_empty_after_delete",
            ]
        );
        assert!(result.output.starts_with("smoke: 5/5 checks passed"));
    });
}

#[test]
fn smoke_returns_failure_when_config_invalid() {
    with_env(&[("CATALOG_SERVER_PORT", "0")], || {
        let result = smoke::run();
        assert_eq!(result.exit_code, 6, "expected smoke failure code");

        let payload = parse_payload(last_line(&result.output));
        assert_eq!(payload["command"], "smoke");
        assert_eq!(payload["status"], "fail");
        assert_eq!(payload["checks"][0]["status"], "fail");
        assert_eq!(payload["checks"][1]["status"], "skipped");
    });
}

#[test]
fn config_reports_env_sources() {
    with_env(&[("CATALOG_SERVER_PORT", "4321"), ("CATALOG_LOG_LEVEL", "debug")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0, "expected config inspection success");

        assert!(result
            .output
            .contains("- server.port = 4321 (source: env (CATALOG_SERVER_PORT))"));
        assert!(result
            .output
            .contains("- logging.level = debug (source: env (CATALOG_LOG_LEVEL))"));
        assert!(result.output.contains("- catalog.id_length = 6 (source: default)"));
    });
}

#[test]
fn config_ignores_blank_env_values_in_sources() {
    with_env(&[("CATALOG_SERVER_PORT", "   "), ("CATALOG_LOG_LEVEL", "")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0, "blank env values should fall back");

        assert!(result.output.contains("- server.port = 3000 (source: default)"));
        assert!(result.output.contains("- logging.level = info (source: default)"));
    });
}

#[test]
fn config_returns_validation_failure_payload() {
    with_env(&[("CATALOG_CATALOG_ID_STRATEGY", "snowflake")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn last_line(output: &str) -> &str {
    output.lines().last().unwrap_or_default()
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "CATALOG_SERVER_BIND_ADDRESS",
        "CATALOG_SERVER_PORT",
        "CATALOG_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "CATALOG_SERVER_CORS_ALLOWED_ORIGINS",
        "CATALOG_CATALOG_ID_STRATEGY",
        "CATALOG_CATALOG_ID_LENGTH",
        "CATALOG_CATALOG_SEED_DEMO",
        "CATALOG_LOGGING_LEVEL",
        "CATALOG_LOGGING_FORMAT",
        "CATALOG_LOG_LEVEL",
        "CATALOG_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
