use std::sync::Arc;
use std::time::Instant;

use crate::commands::CommandResult;
use catalog_core::config::{AppConfig, LoadOptions};
use catalog_core::{CatalogService, ProductId, ProductInput, SequentialIdGenerator};
use serde::Serialize;
use serde_json::json;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SmokeStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: SmokeStatus,
    elapsed_ms: u64,
    message: String,
}

#[derive(Debug, Serialize)]
struct SmokeReport {
    command: &'static str,
    status: SmokeStatus,
    summary: String,
    total_elapsed_ms: u64,
    checks: Vec<SmokeCheck>,
}

const LIFECYCLE_CHECKS: [&str; 4] =
    ["catalog_create", "catalog_update", "catalog_delete", "catalog_empty_after_delete"];

pub fn run() -> CommandResult {
    let started = Instant::now();
    let mut checks = Vec::new();

    match timed_check(|| AppConfig::load(LoadOptions::default())) {
        Ok((elapsed_ms, _config)) => checks.push(SmokeCheck {
            name: "config_validation",
            status: SmokeStatus::Pass,
            elapsed_ms,
            message: "configuration loaded and validated".to_string(),
        }),
        Err((elapsed_ms, error)) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Fail,
                elapsed_ms,
                message: error.to_string(),
            });
            checks.extend(LIFECYCLE_CHECKS.into_iter().map(skipped));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            checks.push(SmokeCheck {
                name: "catalog_create",
                status: SmokeStatus::Fail,
                elapsed_ms: 0,
                message: format!("failed to initialize async runtime: {error}"),
            });
            checks.extend(LIFECYCLE_CHECKS.into_iter().skip(1).map(skipped));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    runtime.block_on(run_lifecycle(&mut checks));
    finalize_report(checks, started.elapsed().as_millis() as u64)
}

/// Create → update → delete against a throwaway service. Stops at the first
/// failing step and marks the rest skipped.
async fn run_lifecycle(checks: &mut Vec<SmokeCheck>) {
    let service = CatalogService::new(Arc::new(SequentialIdGenerator::new("smoke")));

    let create_started = Instant::now();
    let payload = json!({
        "name": "Pen",
        "category": "Office",
        "description": "Blue ink",
        "price": 50,
        "stock": 100
    });
    let created = match ProductInput::from_json(payload) {
        Ok(input) => service.create(input).await,
        Err(error) => Err(error),
    };
    let product_id: ProductId = match created {
        Ok(product) if service.len().await == 1 => {
            let message = format!("created `{}`", product.id);
            checks.push(pass("catalog_create", create_started, message));
            product.id
        }
        Ok(_) => {
            let message = "catalog size is not 1 after create";
            checks.push(fail("catalog_create", create_started, message));
            checks.extend(LIFECYCLE_CHECKS.into_iter().skip(1).map(skipped));
            return;
        }
        Err(error) => {
            checks.push(fail("catalog_create", create_started, error.to_string()));
            checks.extend(LIFECYCLE_CHECKS.into_iter().skip(1).map(skipped));
            return;
        }
    };

    let update_started = Instant::now();
    let updated = match ProductInput::from_json(json!({ "stock": 90 })) {
        Ok(input) => service.update(&product_id, input).await,
        Err(error) => Err(error),
    };
    match updated {
        Ok(product) if product.stock == 90 && product.name == "Pen" => {
            checks.push(pass("catalog_update", update_started, "stock updated, name unchanged"));
        }
        Ok(product) => {
            checks.push(fail(
                "catalog_update",
                update_started,
                format!("unexpected product after update: {product:?}"),
            ));
            checks.extend(LIFECYCLE_CHECKS.into_iter().skip(2).map(skipped));
            return;
        }
        Err(error) => {
            checks.push(fail("catalog_update", update_started, error.to_string()));
            checks.extend(LIFECYCLE_CHECKS.into_iter().skip(2).map(skipped));
            return;
        }
    }

    let delete_started = Instant::now();
    if let Err(error) = service.delete(&product_id).await {
        checks.push(fail("catalog_delete", delete_started, error.to_string()));
        checks.push(skipped("catalog_empty_after_delete"));
        return;
    }
    checks.push(pass("catalog_delete", delete_started, format!("deleted `{product_id}`")));

    let empty_started = Instant::now();
    let remaining = service.list().await.len();
    if remaining == 0 {
        checks.push(pass("catalog_empty_after_delete", empty_started, "catalog is empty"));
    } else {
        checks.push(fail(
            "catalog_empty_after_delete",
            empty_started,
            format!("{remaining} products remain after delete"),
        ));
    }
}

fn timed_check<T, E>(check: impl FnOnce() -> Result<T, E>) -> Result<(u64, T), (u64, E)> {
    let started = Instant::now();
    match check() {
        Ok(value) => Ok((started.elapsed().as_millis() as u64, value)),
        Err(error) => Err((started.elapsed().as_millis() as u64, error)),
    }
}

fn pass(name: &'static str, started: Instant, message: impl Into<String>) -> SmokeCheck {
    SmokeCheck {
        name,
        status: SmokeStatus::Pass,
        elapsed_ms: started.elapsed().as_millis() as u64,
        message: message.into(),
    }
}

fn fail(name: &'static str, started: Instant, message: impl Into<String>) -> SmokeCheck {
    SmokeCheck {
        name,
        status: SmokeStatus::Fail,
        elapsed_ms: started.elapsed().as_millis() as u64,
        message: message.into(),
    }
}

fn skipped(name: &'static str) -> SmokeCheck {
    SmokeCheck {
        name,
        status: SmokeStatus::Skipped,
        elapsed_ms: 0,
        message: "skipped due previous failure".to_string(),
    }
}

fn finalize_report(checks: Vec<SmokeCheck>, total_elapsed_ms: u64) -> CommandResult {
    let passed = checks.iter().filter(|check| check.status == SmokeStatus::Pass).count();
    let total = checks.len();
    let failed = checks.iter().any(|check| check.status == SmokeStatus::Fail);

    let report = SmokeReport {
        command: "smoke",
        status: if failed { SmokeStatus::Fail } else { SmokeStatus::Pass },
        summary: format!("smoke: {passed}/{total} checks passed in {total_elapsed_ms}ms"),
        total_elapsed_ms,
        checks,
    };

    let human = report.summary.clone();
    let machine = serde_json::to_string(&report).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"smoke\",\"status\":\"fail\",\"summary\":\"serialization failed\",\"error\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    });

    CommandResult { exit_code: if failed { 6 } else { 0 }, output: format!("{human}\n{machine}") }
}
