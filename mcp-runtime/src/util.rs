use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;

pub fn client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("cadenza/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Expand a leading `~` to the user's home directory. Paths without one, or
/// environments without a home directory, come back unchanged.
pub fn expand_home(raw: &str) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(raw);
    };
    if raw == "~" {
        return home;
    }
    match raw.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(raw),
    }
}

pub fn to_pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_home_only_touches_leading_tilde() {
        assert_eq!(expand_home("/etc/key.p8"), PathBuf::from("/etc/key.p8"));
        assert_eq!(expand_home("keys/~/x.p8"), PathBuf::from("keys/~/x.p8"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/keys/AuthKey.p8"), home.join("keys/AuthKey.p8"));
            assert_eq!(expand_home("~"), home);
        }
    }
}
