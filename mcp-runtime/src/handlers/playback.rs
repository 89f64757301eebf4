use std::sync::Arc;

use async_trait::async_trait;
use cadenza_core::{HandlerFailure, ToolHandler, ValidatedArguments};
use serde_json::{Map, Value, json};

use super::{json_to_map, required_str};
use crate::automation::Automation;
use crate::scripts;

pub struct ControlPlayback {
    automation: Arc<dyn Automation>,
}

impl ControlPlayback {
    pub fn new(automation: Arc<dyn Automation>) -> Self {
        Self { automation }
    }
}

#[async_trait]
impl ToolHandler for ControlPlayback {
    async fn execute(
        &self,
        arguments: ValidatedArguments,
    ) -> Result<Map<String, Value>, HandlerFailure> {
        let action = required_str(&arguments, "action")?;

        if action == "now_playing" {
            let output = self.automation.run(&scripts::now_playing()).await?;
            let now_playing = scripts::parse_now_playing(&output)?;
            return Ok(json_to_map(
                serde_json::to_value(now_playing)
                    .map_err(|err| HandlerFailure::internal(err.to_string()))?,
            ));
        }

        let script = scripts::playback_command(action).ok_or_else(|| {
            HandlerFailure::internal(format!("no automation script for action '{action}'"))
        })?;
        let state = self.automation.run(&script).await?;
        Ok(json_to_map(json!({
            "action": action,
            "state": state.trim(),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::fakes::FakeAutomation;
    use cadenza_core::tools::control_playback;
    use cadenza_core::validate;

    fn arguments(action: &str) -> ValidatedArguments {
        validate(
            &control_playback(),
            json!({ "action": action }).as_object().unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn simple_actions_report_player_state() {
        let automation = Arc::new(FakeAutomation::replying(vec![Ok("playing".to_string())]));
        let payload = ControlPlayback::new(automation.clone())
            .execute(arguments("next"))
            .await
            .unwrap();
        assert_eq!(payload, json_to_map(json!({"action": "next", "state": "playing"})));
        assert!(automation.scripts()[0].contains("next track"));
    }

    #[tokio::test]
    async fn now_playing_returns_structured_track() {
        let automation = Arc::new(FakeAutomation::replying(vec![Ok(
            "paused\u{1f}true\u{1f}one\u{1f}Hey Jude\u{1f}The Beatles\u{1f}1\u{1f}431.0\u{1f}10.5"
                .to_string(),
        )]));
        let payload = ControlPlayback::new(automation)
            .execute(arguments("now_playing"))
            .await
            .unwrap();
        assert_eq!(
            Value::Object(payload),
            json!({
                "state": "paused",
                "shuffle_enabled": true,
                "repeat_mode": "one",
                "track": {
                    "name": "Hey Jude",
                    "artist": "The Beatles",
                    "album": "1",
                    "duration_seconds": 431.0,
                    "position_seconds": 10.5
                }
            })
        );
    }

    #[tokio::test]
    async fn stopped_player_has_no_track() {
        let automation = Arc::new(FakeAutomation::replying(vec![Ok(
            "stopped\u{1f}false\u{1f}off".to_string(),
        )]));
        let payload = ControlPlayback::new(automation)
            .execute(arguments("now_playing"))
            .await
            .unwrap();
        assert_eq!(payload["track"], Value::Null);
        assert_eq!(payload["state"], "stopped");
    }
}
