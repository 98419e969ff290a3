//! Joint adapter execution and aggregate reporting.

use std::panic::AssertUnwindSafe;

use futures::future::join_all;
use futures::FutureExt;

use crate::adapters::{FormatAdapter, FormatContext};

/// Aggregate outcome of one adapter, as the orchestrator consumes it.
#[derive(Debug, Clone)]
pub struct FormatOutcome {
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct AdapterReport {
    pub name: &'static str,
    pub outcome: FormatOutcome,
}

/// Runs every adapter to completion and reports in declared order.
///
/// All adapters are launched together and awaited jointly; one failing never
/// halts the others. A panic inside an adapter is caught at its own boundary
/// and rendered as a named failure, so a single faulty adapter cannot crash
/// the whole run.
pub async fn run_all(
    adapters: &[Box<dyn FormatAdapter>],
    ctx: &FormatContext,
) -> Vec<AdapterReport> {
    let runs = adapters
        .iter()
        .map(|adapter| AssertUnwindSafe(adapter.format(ctx)).catch_unwind());
    let settled = join_all(runs).await;

    adapters
        .iter()
        .zip(settled)
        .map(|(adapter, result)| {
            let outcome = match result {
                Ok(Ok(())) => FormatOutcome {
                    success: true,
                    error: None,
                },
                Ok(Err(err)) => FormatOutcome {
                    success: false,
                    error: Some(err.to_string()),
                },
                Err(_) => FormatOutcome {
                    success: false,
                    error: Some("formatter crashed unexpectedly".to_string()),
                },
            };
            AdapterReport {
                name: adapter.name(),
                outcome,
            }
        })
        .collect()
}

/// `"<adapter name>: <message>"` lines for every failed adapter, in the
/// declared roster order.
pub fn failure_lines(reports: &[AdapterReport]) -> Vec<String> {
    reports
        .iter()
        .filter(|report| !report.outcome.success)
        .map(|report| {
            let message = report.outcome.error.as_deref().unwrap_or("failed");
            format!("{}: {message}", report.name)
        })
        .collect()
}
