use cadenza_core::Dispatcher;
use serde_json::{Map, Value};

use crate::util::{exit_error, parse_json, print_envelope, read_json_from_file};

/// `cadenza dispatch`: one request envelope in, one response envelope out.
pub async fn dispatch(dispatcher: &Dispatcher, request_path: &str) -> i32 {
    let request = read_json_from_file(request_path).unwrap_or_else(|e| {
        exit_error(
            &e,
            Some("Pass {\"tool\": \"<name>\", \"arguments\": {...}} on stdin or via --request."),
        )
    });
    print_envelope(&dispatcher.handle_value(request).await)
}

/// `cadenza call <tool> --args '{...}'`.
pub async fn call(dispatcher: &Dispatcher, tool: &str, raw_args: Option<&str>) -> i32 {
    let arguments = match raw_args {
        None => Map::new(),
        Some(raw) => match parse_json(raw, "--args") {
            Ok(Value::Object(map)) => map,
            Ok(_) => exit_error("--args must be a JSON object", None),
            Err(e) => exit_error(&e, None),
        },
    };
    print_envelope(&dispatcher.dispatch(tool, arguments).await)
}
