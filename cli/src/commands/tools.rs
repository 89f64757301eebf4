use cadenza_core::SchemaRegistry;
use serde_json::json;

use crate::util::print_json;

pub fn run(registry: &SchemaRegistry, names_only: bool) -> i32 {
    if names_only {
        print_json(&json!(registry.names()));
    } else {
        print_json(&json!({ "tools": registry.manifest() }));
    }
    0
}
