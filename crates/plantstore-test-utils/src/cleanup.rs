//! Post-scenario deletion of everything a scenario created.
//!
//! Cleanup never fails a scenario. Each delete is attempted once, in ledger
//! drain order, and whatever goes wrong is logged and recorded in the
//! returned [`CleanupReport`].

use reqwest::{Method, StatusCode};
use tracing::{debug, info, warn};

use crate::auth::{Role, TokenCache};
use crate::client::{ApiContext, RequestOptions};
use crate::ledger::{CreatedResources, ResourceKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupFailure {
    pub kind: ResourceKind,
    pub id: i64,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted: Vec<(ResourceKind, i64)>,
    /// 404 on delete: removed by the scenario itself or by someone else
    pub already_gone: Vec<(ResourceKind, i64)>,
    pub failed: Vec<CleanupFailure>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.already_gone.len() + self.failed.len()
    }
}

/// Delete every tracked id as admin, sales first, then plants, then
/// categories. The ledger is empty afterwards regardless of outcome.
pub async fn run_cleanup(
    api: &ApiContext,
    tokens: &TokenCache,
    ledger: &mut CreatedResources,
) -> CleanupReport {
    let mut report = CleanupReport::default();
    if ledger.is_empty() {
        return report;
    }

    let auth = match tokens.get_token(Role::Admin).await {
        Ok(token) => Some(token),
        Err(err) => {
            warn!(error = %err, "admin login failed before cleanup; deleting without a token");
            None
        }
    };

    for (kind, id) in ledger.drain_for_cleanup() {
        let options = match &auth {
            Some(token) => RequestOptions::new().bearer(token.clone()),
            None => RequestOptions::new().anonymous(),
        };
        match api.request(Method::DELETE, &kind.resource_path(id), options).await {
            Ok(response) if response.is_success() => {
                debug!(%kind, id, "deleted");
                report.deleted.push((kind, id));
            }
            Ok(response) if response.status == StatusCode::NOT_FOUND => {
                debug!(%kind, id, "already gone");
                report.already_gone.push((kind, id));
            }
            Ok(response) => {
                warn!(%kind, id, status = response.status_code(), "cleanup delete rejected");
                report.failed.push(CleanupFailure {
                    kind,
                    id,
                    reason: format!("status {}: {}", response.status_code(), response.message()),
                });
            }
            Err(err) => {
                warn!(%kind, id, error = %err, "cleanup delete failed");
                report.failed.push(CleanupFailure {
                    kind,
                    id,
                    reason: err.to_string(),
                });
            }
        }
    }

    info!(
        deleted = report.deleted.len(),
        already_gone = report.already_gone.len(),
        failed = report.failed.len(),
        "cleanup finished"
    );
    report
}
