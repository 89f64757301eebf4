use std::sync::Arc;

use cadenza_core::Dispatcher;
use serde_json::{Map, Value, json};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::util::to_pretty_json;

pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
pub const MCP_SERVER_NAME: &str = "cadenza-mcp";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to read MCP message: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to write MCP response: {0}")]
    Write(#[source] std::io::Error),
}

/// How a message was framed on the wire. Replies mirror the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// `Content-Length` headers followed by the JSON body.
    Headers,
    /// One JSON document per line.
    Lines,
}

#[derive(Debug)]
pub struct IncomingMessage {
    pub framing: Framing,
    /// `Err` carries the parse error for a body that is not valid JSON.
    pub payload: Result<Value, String>,
}

pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
}

impl McpServer {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub async fn serve_stdio(&self) -> Result<(), ServerError> {
        tracing::info!(
            server = MCP_SERVER_NAME,
            version = env!("CARGO_PKG_VERSION"),
            tools = self.dispatcher.registry().len(),
            "MCP server listening on stdio"
        );
        self.serve(BufReader::new(io::stdin()), io::stdout()).await
    }

    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            let incoming = read_message(&mut reader).await.map_err(ServerError::Read)?;
            let Some(incoming) = incoming else {
                tracing::info!("stdin closed, shutting down");
                break;
            };

            let reply = match incoming.payload {
                Ok(message) => self.handle_incoming_message(message).await,
                Err(detail) => {
                    tracing::warn!(%detail, "discarding unparseable MCP message");
                    Some(error_response(Value::Null, RpcError::parse_error(detail)))
                }
            };
            if let Some(reply) = reply {
                write_message(&mut writer, &reply, incoming.framing)
                    .await
                    .map_err(ServerError::Write)?;
            }
        }
        Ok(())
    }

    /// A batch yields one array reply; a lone notification yields nothing.
    pub async fn handle_incoming_message(&self, incoming: Value) -> Option<Value> {
        let batch = match incoming {
            Value::Array(batch) => batch,
            single => return self.handle_single_message(single).await,
        };
        if batch.is_empty() {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("Batch request must not be empty"),
            ));
        }

        let mut responses = Vec::new();
        for item in batch {
            if let Some(response) = self.handle_single_message(item).await {
                responses.push(response);
            }
        }
        (!responses.is_empty()).then_some(Value::Array(responses))
    }

    async fn handle_single_message(&self, incoming: Value) -> Option<Value> {
        let Some(obj) = incoming.as_object() else {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("Request must be a JSON object"),
            ));
        };

        if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
            let id = obj.get("id").cloned().unwrap_or(Value::Null);
            return Some(error_response(
                id,
                RpcError::invalid_request("jsonrpc must be '2.0'"),
            ));
        }

        // Without a method this is a client response; the server never sends requests.
        let method = obj.get("method").and_then(Value::as_str)?;

        let params = obj.get("params").cloned().unwrap_or(Value::Null);
        let Some(id) = obj.get("id").cloned() else {
            tracing::debug!(method, "ignoring notification");
            return None;
        };
        Some(match self.handle_request(method, params).await {
            Ok(payload) => success_response(id, payload),
            Err(err) => error_response(id, err),
        })
    }

    async fn handle_request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(self.initialize_payload()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.tools_list_payload()),
            "tools/call" => self.handle_tools_call(params).await,
            "resources/list" => Ok(json!({ "resources": [] })),
            "prompts/list" => Ok(json!({ "prompts": [] })),
            _ => Err(RpcError::method_not_found(method)),
        }
    }

    fn initialize_payload(&self) -> Value {
        json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "listChanged": false },
                "prompts": { "listChanged": false }
            },
            "serverInfo": {
                "name": MCP_SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            },
            "instructions": "Search the Apple Music catalog with search_music, then pass a result id to play_song, manage_queue or add_to_library. Call mcp.health_check first when playback or catalog calls fail."
        })
    }

    fn tools_list_payload(&self) -> Value {
        json!({ "tools": self.dispatcher.registry().manifest() })
    }

    async fn handle_tools_call(&self, params: Value) -> Result<Value, RpcError> {
        let params = params
            .as_object()
            .ok_or_else(|| RpcError::invalid_params("tools/call params must be an object"))?;

        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::invalid_params("tools/call requires string field 'name'"))?;

        let arguments = match params.get("arguments") {
            Some(Value::Object(map)) => map.clone(),
            None | Some(Value::Null) => Map::new(),
            Some(_) => {
                return Err(RpcError::invalid_params(
                    "tools/call field 'arguments' must be an object",
                ));
            }
        };

        let envelope = self.dispatcher.dispatch(name, arguments).await;
        Ok(build_tool_call_response(
            envelope.to_value(),
            !envelope.is_success(),
        ))
    }
}

fn build_tool_call_response(envelope: Value, is_error: bool) -> Value {
    let text = to_pretty_json(&envelope);
    let mut response = json!({
        "content": [{ "type": "text", "text": text }],
        "structuredContent": envelope
    });
    if is_error {
        response["isError"] = json!(true);
    }
    response
}

#[derive(Debug)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn parse_error(detail: impl Into<String>) -> Self {
        Self {
            code: -32700,
            message: format!("Parse error: {}", detail.into()),
        }
    }

    fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: -32600,
            message: message.into(),
        }
    }

    fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {method}"),
        }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: -32602,
            message: message.into(),
        }
    }
}

fn success_response(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

fn error_response(id: Value, error: RpcError) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": error.code,
            "message": error.message
        }
    })
}

/// Reads the next message, detecting its framing from the first non-blank
/// line. `Ok(None)` means a clean end of input. Malformed input never ends
/// the stream: it comes back as an `Err` payload to answer with a parse error.
pub async fn read_message<R>(reader: &mut R) -> std::io::Result<Option<IncomingMessage>>
where
    R: AsyncBufRead + Unpin,
{
    let mut raw = Vec::new();
    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw).await? == 0 {
            return Ok(None);
        }
        if !raw.trim_ascii().is_empty() {
            break;
        }
    }

    let first = match std::str::from_utf8(raw.trim_ascii()) {
        Ok(first) => first,
        Err(err) => {
            return Ok(Some(IncomingMessage {
                framing: Framing::Lines,
                payload: Err(format!("message is not valid UTF-8: {err}")),
            }));
        }
    };
    if !is_header_line(first) {
        return Ok(Some(IncomingMessage {
            framing: Framing::Lines,
            payload: serde_json::from_str(first).map_err(|e| e.to_string()),
        }));
    }

    let mut content_length = parse_content_length(first);
    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw).await? == 0 {
            tracing::warn!("input ended inside MCP headers");
            return Ok(None);
        }
        let header = String::from_utf8_lossy(raw.trim_ascii());
        if header.is_empty() {
            break;
        }
        if let Some(parsed) = parse_content_length(&header) {
            content_length = Some(parsed);
        }
    }

    let content_length = match content_length {
        Some(Ok(length)) => length,
        Some(Err(detail)) => return Ok(Some(header_failure(detail))),
        None => return Ok(Some(header_failure("Missing Content-Length header".to_string()))),
    };
    let mut body = vec![0_u8; content_length];
    reader.read_exact(&mut body).await?;

    Ok(Some(IncomingMessage {
        framing: Framing::Headers,
        payload: serde_json::from_slice(&body).map_err(|e| e.to_string()),
    }))
}

fn header_failure(detail: String) -> IncomingMessage {
    IncomingMessage {
        framing: Framing::Headers,
        payload: Err(detail),
    }
}

/// `Name: value` with an RFC 7230 token as the name.
fn is_header_line(line: &str) -> bool {
    let Some((name, _)) = line.split_once(':') else {
        return false;
    };
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// `None` for other headers; `Some(Err)` for an unusable length.
fn parse_content_length(header: &str) -> Option<Result<usize, String>> {
    let (name, value) = header.split_once(':')?;
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    Some(
        value
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("Invalid Content-Length header '{}'", value.trim())),
    )
}

pub async fn write_message<W>(writer: &mut W, value: &Value, framing: Framing) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let body = serde_json::to_vec(value)?;
    match framing {
        Framing::Headers => {
            let header = format!(
                "Content-Length: {}\r\nContent-Type: application/json\r\n\r\n",
                body.len()
            );
            writer.write_all(header.as_bytes()).await?;
            writer.write_all(&body).await?;
        }
        Framing::Lines => {
            writer.write_all(&body).await?;
            writer.write_all(b"\n").await?;
        }
    }
    writer.flush().await
}
