use std::sync::Arc;

use async_trait::async_trait;
use cadenza_core::{HandlerFailure, Redactor, ToolHandler, ValidatedArguments};
use serde_json::{Map, Value, json};

use super::json_to_map;
use crate::automation::Automation;
use crate::catalog::{CatalogApi, SearchQuery};
use crate::scripts;

const PROBE_TERM: &str = "health check";

/// Probes both collaborators. Probe failures are data in the report, not a
/// failure of the tool itself.
pub struct HealthCheck {
    catalog: Arc<dyn CatalogApi>,
    automation: Arc<dyn Automation>,
    redactor: Redactor,
}

impl HealthCheck {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        automation: Arc<dyn Automation>,
        redactor: Redactor,
    ) -> Self {
        Self {
            catalog,
            automation,
            redactor,
        }
    }

    async fn probe_automation(&self) -> Value {
        match self.automation.run(&scripts::player_state()).await {
            Ok(state) => json!({ "status": "ok", "player_state": state.trim() }),
            Err(failure) => self.failed_check(&failure),
        }
    }

    async fn probe_catalog(&self) -> Value {
        let query = SearchQuery {
            term: PROBE_TERM.to_string(),
            types: vec!["songs".to_string()],
            limit: 1,
            offset: 0,
        };
        match self.catalog.search(&query).await {
            Ok(items) => json!({ "status": "ok", "hits": items.len() }),
            Err(failure) => self.failed_check(&failure),
        }
    }

    fn failed_check(&self, failure: &HandlerFailure) -> Value {
        let mut check = json!({
            "status": "error",
            "code": failure.code(),
            "message": self.redactor.redact(&failure.message),
        });
        if let Some(hint) = &failure.hint {
            check["hint"] = json!(self.redactor.redact(hint));
        }
        check
    }
}

#[async_trait]
impl ToolHandler for HealthCheck {
    async fn execute(
        &self,
        _arguments: ValidatedArguments,
    ) -> Result<Map<String, Value>, HandlerFailure> {
        let (local_automation, catalog) =
            tokio::join!(self.probe_automation(), self.probe_catalog());

        let healthy = [&local_automation, &catalog]
            .iter()
            .all(|check| check["status"] == "ok");
        if !healthy {
            tracing::warn!(
                automation = %local_automation["status"],
                catalog = %catalog["status"],
                "health check degraded"
            );
        }

        Ok(json_to_map(json!({
            "status": if healthy { "ok" } else { "degraded" },
            "checks": {
                "local_automation": local_automation,
                "catalog": catalog,
            },
        })))
    }
}
