//! TOML test file parsing

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::modes::ModeRules;

/// Complete test definition from TOML file
#[derive(Debug, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub setup: TestSetup,
    #[serde(default)]
    pub input: Vec<FrameInput>,
    #[serde(default)]
    pub expect: TestExpectations,
}

/// Test setup configuration
#[derive(Debug, Default, Deserialize)]
pub struct TestSetup {
    /// Mode to start before frame 0 (display name or identifier)
    pub mode: Option<String>,
    /// Resting ball spot as [x, z]
    pub ball: Option<[f32; 2]>,
    /// Initial pitch in radians
    pub pitch: Option<f32>,
    #[serde(default)]
    pub rules: Option<ModeRules>,
    /// Frames to run when no state assertion asks for more
    pub frames: Option<u64>,
}

/// Input changes applied at the start of a frame.
///
/// Held buttons persist until changed. One-shot actions fire on this frame only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameInput {
    pub frame: u64,
    // Held
    pub move_forward: Option<bool>,
    pub move_back: Option<bool>,
    pub move_left: Option<bool>,
    pub move_right: Option<bool>,
    pub increase_power: Option<bool>,
    pub decrease_power: Option<bool>,
    // One-shot
    #[serde(default)]
    pub launch: bool,
    #[serde(default)]
    pub reset: bool,
    /// Select and start a mode
    pub start_mode: Option<String>,
    #[serde(default)]
    pub restart: bool,
    #[serde(default)]
    pub show_selector: bool,
    /// Set the pitch directly (radians)
    pub pitch: Option<f32>,
}

/// Expected test outcomes
#[derive(Debug, Default, Deserialize)]
pub struct TestExpectations {
    #[serde(default)]
    pub sequence: Vec<ExpectedEvent>,
    /// Events that must not occur at all
    #[serde(default)]
    pub absent: Vec<String>,
    /// Multiple state assertions at different frames (uses [[expect.state]] TOML syntax)
    #[serde(default)]
    pub state: Vec<StateAssertion>,
}

/// Expected event in sequence
#[derive(Debug, Deserialize)]
pub struct ExpectedEvent {
    pub event: String,
    /// Matches `GameEvent::detail` (feedback verdict, hoop part, player number, mode)
    pub detail: Option<String>,
    pub frame_min: Option<u64>,
    pub frame_max: Option<u64>,
}

/// State assertion after simulation
#[derive(Debug, Clone, Deserialize)]
pub struct StateAssertion {
    pub after_frame: u64,
    #[serde(default)]
    pub checks: Vec<String>,
}

/// Parse a test file from path
pub fn parse_test_file(path: &Path) -> Result<TestDefinition, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let toml = r#"
name = "Test"
[setup]
mode = "shot_limit"
ball = [30.0, 0.0]
pitch = 0.9

[[input]]
frame = 0
launch = true

[[input]]
frame = 20
move_forward = true

[expect]
absent = ["BasketMade"]

[[expect.sequence]]
event = "Feedback"
detail = "TooWeak"

[[expect.state]]
after_frame = 300
checks = ["stats.attempts = 1"]
"#;
        let def: TestDefinition = toml::from_str(toml).unwrap();
        assert_eq!(def.name, "Test");
        assert_eq!(def.setup.mode.as_deref(), Some("shot_limit"));
        assert_eq!(def.setup.ball, Some([30.0, 0.0]));
        assert_eq!(def.input.len(), 2);
        assert!(def.input[0].launch);
        assert_eq!(def.input[1].move_forward, Some(true));
        assert_eq!(def.input[1].move_back, None);
        assert_eq!(def.expect.sequence[0].detail.as_deref(), Some("TooWeak"));
        assert_eq!(def.expect.state[0].after_frame, 300);
    }

    #[test]
    fn test_rules_override_keeps_defaults() {
        let toml = r#"
name = "Rules"
[setup.rules]
shot_limit = 2
"#;
        let def: TestDefinition = toml::from_str(toml).unwrap();
        let rules = def.setup.rules.unwrap();
        assert_eq!(rules.shot_limit, 2);
        assert_eq!(rules, ModeRules { shot_limit: 2, ..ModeRules::default() });
    }
}
