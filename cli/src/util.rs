use std::io::Read;

use cadenza_core::{Dispatcher, ResponseEnvelope};
use cadenza_mcp_runtime::{Settings, build_runtime_dispatcher};
use serde_json::{Value, json};

pub fn exit_error(message: &str, hint: Option<&str>) -> ! {
    let mut err = json!({
        "error": "cli_error",
        "message": message
    });
    if let Some(hint) = hint {
        err["hint"] = json!(hint);
    }
    eprintln!("{}", to_pretty_json(&err));
    std::process::exit(1);
}

pub fn to_pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

pub fn print_json(value: &Value) {
    println!("{}", to_pretty_json(value));
}

/// Prints the envelope and maps it to the process exit code.
pub fn print_envelope(envelope: &ResponseEnvelope) -> i32 {
    print_json(&envelope.to_value());
    envelope_exit_code(envelope)
}

pub fn envelope_exit_code(envelope: &ResponseEnvelope) -> i32 {
    if envelope.is_success() { 0 } else { 2 }
}

/// Reads JSON from a file path, or from stdin when `path` is `-`.
pub fn read_json_from_file(path: &str) -> Result<Value, String> {
    let raw = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("Failed to read stdin: {e}"))?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read file '{path}': {e}"))?
    };
    parse_json(&raw, path)
}

pub fn parse_json(raw: &str, source: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("Invalid JSON in '{source}': {e}"))
}

pub fn dispatcher(settings: &Settings) -> Dispatcher {
    build_runtime_dispatcher(settings).unwrap_or_else(|err| {
        let hint = match &err {
            cadenza_mcp_runtime::RuntimeError::Settings(settings_err) => Some(settings_err.hint()),
            _ => None,
        };
        exit_error(&err.to_string(), hint.as_deref())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadenza_core::FailureKind;
    use serde_json::Map;

    #[test]
    fn exit_code_follows_envelope_status() {
        assert_eq!(envelope_exit_code(&ResponseEnvelope::success(Map::new())), 0);
        assert_eq!(
            envelope_exit_code(&ResponseEnvelope::failure(
                FailureKind::NotFound.error_code(),
                "missing",
                None
            )),
            2
        );
    }

    #[test]
    fn parse_json_names_its_source() {
        let err = parse_json("{oops", "request.json").unwrap_err();
        assert!(err.starts_with("Invalid JSON in 'request.json'"));
    }

    #[test]
    fn reads_request_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, br#"{"tool": "search_music"}"#).unwrap();
        let value = read_json_from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(value["tool"], "search_music");
    }
}
