//! Shared core for Cadenza: the tool manifest, strict argument validation,
//! the response envelope, and the dispatcher that ties them together.

pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod schema;
pub mod tools;
pub mod validate;

pub use dispatch::{Dispatcher, DispatcherBuilder, RequestEnvelope, ToolHandler};
pub use envelope::{Redactor, ResponseEnvelope};
pub use error::{ErrorCode, FailureKind, HandlerFailure};
pub use schema::{FieldSpec, FieldType, RegistryError, SchemaRegistry, ToolSchema};
pub use validate::{ArgValue, ValidatedArguments, ValidationFailure, ValidationReason, validate};
