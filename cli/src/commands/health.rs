use cadenza_core::{Dispatcher, tools};
use serde_json::Map;

use crate::util::print_json;

/// Exit 0 only when every check passed; a degraded report exits 3.
pub async fn run(dispatcher: &Dispatcher) -> i32 {
    let envelope = dispatcher.dispatch(tools::HEALTH_CHECK, Map::new()).await;
    print_json(&envelope.to_value());
    match envelope.data() {
        Some(report) if report.get("status").and_then(|s| s.as_str()) == Some("ok") => 0,
        Some(_) => 3,
        None => 2,
    }
}
