// ============================================================================
// Handlers - one workflow per public method
// ============================================================================
//
// Each call opens its own store scope, performs every read before it
// stages a write, commits at most once and drops the scope on return.
//
// ============================================================================

mod customers;
mod orders;
mod products;

pub use customers::CustomerHandler;
pub use orders::OrderHandler;
pub use products::ProductHandler;

use std::future::Future;
use std::time::Instant;

use crate::metrics::Metrics;
use crate::store::StoreScope;
use super::errors::HandlerError;

/// Run one workflow: log failures by severity and record its outcome
async fn observe<T, Fut>(
    metrics: Option<&Metrics>,
    workflow: &'static str,
    fut: Fut,
) -> Result<T, HandlerError>
where
    Fut: Future<Output = Result<T, HandlerError>>,
{
    let started = Instant::now();
    let result = fut.await;

    let outcome = match &result {
        Ok(_) => "ok",
        Err(HandlerError::Unexpected(message)) => {
            tracing::error!(workflow, error = %message, "❌ Workflow failed");
            "unexpected"
        }
        Err(error) => {
            tracing::debug!(workflow, error = %error, "Workflow rejected");
            error.outcome()
        }
    };

    if let Some(metrics) = metrics {
        metrics.record_workflow(workflow, outcome, started.elapsed().as_secs_f64());
    }

    result
}

/// Commit the scope's staged changes once
async fn commit(scope: &StoreScope, metrics: Option<&Metrics>) -> Result<(), HandlerError> {
    let result = scope.unit_of_work.commit().await;

    if let Some(metrics) = metrics {
        metrics.record_commit(result.is_ok());
    }

    result.map_err(HandlerError::from)
}
