use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::Instrument;
use uuid::Uuid;

use crate::envelope::{Redactor, ResponseEnvelope};
use crate::error::{ErrorCode, HandlerFailure};
use crate::schema::{RegistryError, SchemaRegistry};
use crate::validate::{ValidatedArguments, validate};

/// One tool's capability. Implementations may block on network or OS
/// automation; the dispatcher treats whatever they return as final.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn execute(
        &self,
        arguments: ValidatedArguments,
    ) -> Result<Map<String, Value>, HandlerFailure>;
}

/// Incoming tool call. `name` is accepted as an alias of `tool` so MCP
/// `tools/call` params deserialize directly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "name")]
    pub tool: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub arguments: Map<String, Value>,
}

impl RequestEnvelope {
    pub fn new(tool: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            id: None,
            tool: tool.into(),
            arguments,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Routes tool calls: lookup, validation, handler invocation, normalization.
///
/// Holds only immutable state after [`DispatcherBuilder::build`], so a single
/// instance can serve concurrent calls behind an `Arc`.
pub struct Dispatcher {
    registry: SchemaRegistry,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
    redactor: Redactor,
}

impl Dispatcher {
    pub fn builder(registry: SchemaRegistry) -> DispatcherBuilder {
        DispatcherBuilder {
            registry,
            handlers: Vec::new(),
            redactor: Redactor::default(),
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Convenience entry point used by the host boundary.
    pub async fn dispatch(&self, tool: &str, arguments: Map<String, Value>) -> ResponseEnvelope {
        self.handle(RequestEnvelope::new(tool, arguments)).await
    }

    /// Dispatch a raw JSON request. Shape errors become envelopes too.
    pub async fn handle_value(&self, raw: Value) -> ResponseEnvelope {
        let Some(obj) = raw.as_object() else {
            return ResponseEnvelope::failure(
                ErrorCode::InvalidArguments,
                "Request must be a JSON object.",
                Some("Send {\"tool\": \"<name>\", \"arguments\": {...}}.".to_string()),
            );
        };
        if !obj.contains_key("tool") && !obj.contains_key("name") {
            return ResponseEnvelope::failure(
                ErrorCode::UnknownTool,
                "Request does not name a tool.",
                Some(self.available_tools_hint()),
            );
        }
        match serde_json::from_value::<RequestEnvelope>(raw) {
            Ok(request) => self.handle(request).await,
            Err(err) => self.redactor.sanitize(ResponseEnvelope::failure(
                ErrorCode::InvalidArguments,
                "Request validation failed.",
                Some(err.to_string()),
            )),
        }
    }

    pub async fn handle(&self, request: RequestEnvelope) -> ResponseEnvelope {
        let request_id = request
            .id
            .clone()
            .unwrap_or_else(|| Uuid::now_v7().to_string());
        let span = tracing::info_span!("dispatch", request_id = %request_id, tool = %request.tool);

        async move {
            let started = Instant::now();
            tracing::debug!("received tool call");
            let envelope = self.redactor.sanitize(self.route(request).await);
            let elapsed_ms = started.elapsed().as_millis() as u64;
            match envelope.code() {
                None => tracing::info!(elapsed_ms, "tool call completed"),
                Some(ErrorCode::InternalError) => {
                    tracing::error!(elapsed_ms, code = %ErrorCode::InternalError, "tool call failed")
                }
                Some(code) => tracing::warn!(elapsed_ms, code = %code, "tool call failed"),
            }
            envelope
        }
        .instrument(span)
        .await
    }

    async fn route(&self, request: RequestEnvelope) -> ResponseEnvelope {
        let Some(schema) = self.registry.lookup(&request.tool) else {
            return ResponseEnvelope::failure(
                ErrorCode::UnknownTool,
                format!("Tool '{}' is not registered.", request.tool),
                Some(self.available_tools_hint()),
            );
        };

        let validated = match validate(schema, &request.arguments) {
            Ok(validated) => validated,
            Err(failure) => {
                return ResponseEnvelope::failure(
                    ErrorCode::InvalidArguments,
                    failure.message,
                    Some(failure.hint),
                );
            }
        };

        let Some(handler) = self.handlers.get(&request.tool).cloned() else {
            tracing::error!("registered tool has no handler");
            return internal_failure();
        };

        // Own task: a panicking handler must not take the caller down with it.
        let outcome = tokio::spawn(async move { handler.execute(validated).await }).await;
        match outcome {
            Ok(Ok(data)) => ResponseEnvelope::success(data),
            Ok(Err(failure)) => {
                tracing::debug!(kind = %failure.kind, "handler reported failure");
                self.redactor.failure_envelope(&failure)
            }
            Err(err) => {
                tracing::error!(panicked = err.is_panic(), "handler task aborted");
                internal_failure()
            }
        }
    }

    fn available_tools_hint(&self) -> String {
        format!("Available tools: {}.", self.registry.names().join(", "))
    }
}

fn internal_failure() -> ResponseEnvelope {
    ResponseEnvelope::failure(
        ErrorCode::InternalError,
        "An unexpected error occurred.",
        Some("Check server logs for details.".to_string()),
    )
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("tools", &self.registry.names())
            .finish_non_exhaustive()
    }
}

pub struct DispatcherBuilder {
    registry: SchemaRegistry,
    handlers: Vec<(String, Arc<dyn ToolHandler>)>,
    redactor: Redactor,
}

impl DispatcherBuilder {
    pub fn handler(mut self, tool: impl Into<String>, handler: impl ToolHandler + 'static) -> Self {
        self.handlers.push((tool.into(), Arc::new(handler)));
        self
    }

    pub fn shared_handler(mut self, tool: impl Into<String>, handler: Arc<dyn ToolHandler>) -> Self {
        self.handlers.push((tool.into(), handler));
        self
    }

    pub fn redactor(mut self, redactor: Redactor) -> Self {
        self.redactor = redactor;
        self
    }

    /// Every registered schema needs exactly one handler and vice versa.
    pub fn build(self) -> Result<Dispatcher, RegistryError> {
        let mut handlers = HashMap::with_capacity(self.handlers.len());
        for (tool, handler) in self.handlers {
            if !self.registry.contains(&tool) {
                return Err(RegistryError::MissingSchema(tool));
            }
            if handlers.insert(tool.clone(), handler).is_some() {
                return Err(RegistryError::Duplicate(tool));
            }
        }
        if let Some(missing) = self
            .registry
            .names()
            .into_iter()
            .find(|name| !handlers.contains_key(*name))
        {
            return Err(RegistryError::MissingHandler(missing.to_string()));
        }

        Ok(Dispatcher {
            registry: self.registry,
            handlers,
            redactor: self.redactor,
        })
    }
}
