//! Assertion checking for test expectations

use std::collections::BTreeMap;

use super::parser::{ExpectedEvent, StateAssertion};
use crate::events::GameEvent;

/// Error when an assertion fails
#[derive(Debug, Clone)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n    Expected: {}\n    Actual: {}", self.message, self.expected, self.actual)
    }
}

/// Captured event with timing info
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub frame: u64,
    pub event_type: String,
    pub detail: Option<String>,
}

impl CapturedEvent {
    pub fn from_game_event(frame: u64, event: &GameEvent) -> Self {
        Self {
            frame,
            event_type: event.name().to_string(),
            detail: event.detail(),
        }
    }

    fn describe(&self) -> String {
        match &self.detail {
            Some(d) => format!("{}({})@{}", self.event_type, d, self.frame),
            None => format!("{}@{}", self.event_type, self.frame),
        }
    }
}

/// Check if captured events match expected sequence (in order, gaps allowed)
pub fn check_sequence(expected: &[ExpectedEvent], captured: &[CapturedEvent]) -> Result<(), AssertionError> {
    let mut captured_idx = 0;

    for (i, exp) in expected.iter().enumerate() {
        let found = captured[captured_idx..].iter().enumerate().find(|(_, cap)| {
            cap.event_type == exp.event
                && exp.detail.as_ref().is_none_or(|d| cap.detail.as_ref() == Some(d))
        });

        let Some((offset, cap)) = found else {
            let detail_str = exp.detail.as_ref().map(|d| format!(" ({})", d)).unwrap_or_default();
            return Err(AssertionError {
                message: format!("Event #{} '{}'{} not found", i + 1, exp.event, detail_str),
                expected: format!("'{}' event in sequence", exp.event),
                actual: format!(
                    "events after position {}: {:?}",
                    captured_idx,
                    captured[captured_idx..].iter().map(CapturedEvent::describe).collect::<Vec<_>>()
                ),
            });
        };

        if let Some(min) = exp.frame_min
            && cap.frame < min
        {
            return Err(AssertionError {
                message: format!("Event #{} '{}' occurred too early", i + 1, exp.event),
                expected: format!("frame >= {}", min),
                actual: format!("frame {}", cap.frame),
            });
        }
        if let Some(max) = exp.frame_max
            && cap.frame > max
        {
            return Err(AssertionError {
                message: format!("Event #{} '{}' occurred too late", i + 1, exp.event),
                expected: format!("frame <= {}", max),
                actual: format!("frame {}", cap.frame),
            });
        }
        captured_idx += offset + 1;
    }

    Ok(())
}

/// Fail if any of the named events was captured
pub fn check_absent(absent: &[String], captured: &[CapturedEvent]) -> Result<(), AssertionError> {
    for name in absent {
        if let Some(cap) = captured.iter().find(|c| &c.event_type == name) {
            return Err(AssertionError {
                message: format!("Unexpected '{}' event", name),
                expected: "no such event".to_string(),
                actual: cap.describe(),
            });
        }
    }
    Ok(())
}

/// A readable value in the world snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    Num(f32),
    Text(String),
}

impl std::fmt::Display for StateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateValue::Num(n) => write!(f, "{:.2}", n),
            StateValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f32> for StateValue {
    fn from(value: f32) -> Self {
        StateValue::Num(value)
    }
}

impl From<u32> for StateValue {
    fn from(value: u32) -> Self {
        StateValue::Num(value as f32)
    }
}

impl From<bool> for StateValue {
    fn from(value: bool) -> Self {
        StateValue::Text(value.to_string())
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        StateValue::Text(value)
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        StateValue::Text(value.to_string())
    }
}

/// World state for assertions, keyed by dotted path (`ball.x`, `stats.score`, ...)
#[derive(Debug, Default)]
pub struct WorldState {
    pub values: BTreeMap<String, StateValue>,
}

impl WorldState {
    pub fn set(&mut self, path: &str, value: impl Into<StateValue>) {
        self.values.insert(path.to_string(), value.into());
    }
}

/// Parse a check string into (path, operator, value)
fn parse_check(check: &str) -> Option<(&str, &str, &str)> {
    // Try operators in order of specificity (>= before >, etc.)
    for op in &[">=", "<=", "!=", "=", ">", "<"] {
        if let Some(idx) = check.find(op) {
            let path = check[..idx].trim();
            let value = check[idx + op.len()..].trim();
            return Some((path, op, value));
        }
    }
    None
}

/// Check state assertions against world state
pub fn check_state(assertion: &StateAssertion, state: &WorldState) -> Result<(), AssertionError> {
    for check in &assertion.checks {
        let (path, operator, expected_value) = parse_check(check).ok_or_else(|| AssertionError {
            message: format!("Invalid check syntax: {}", check),
            expected: "format: 'path = value' or 'path > value'".to_string(),
            actual: check.clone(),
        })?;

        let actual = state.values.get(path).ok_or_else(|| AssertionError {
            message: format!("Unknown state path '{}' (after frame {})", path, assertion.after_frame),
            expected: format!("one of {:?}", state.values.keys().collect::<Vec<_>>()),
            actual: path.to_string(),
        })?;

        match actual {
            StateValue::Num(n) => check_float_comparison(path, *n, operator, expected_value)?,
            StateValue::Text(text) => {
                let expected = expected_value.trim_matches('"');
                let pass = match operator {
                    "=" => text == expected,
                    "!=" => text != expected,
                    _ => false,
                };
                if !pass {
                    return Err(AssertionError {
                        message: format!("Check failed: {} (after frame {})", check, assertion.after_frame),
                        expected: format!("{} {} {}", path, operator, expected),
                        actual: text.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

/// Check float comparison with operator
fn check_float_comparison(path: &str, actual: f32, operator: &str, expected_str: &str) -> Result<(), AssertionError> {
    let value: f32 = expected_str.trim().parse().map_err(|_| AssertionError {
        message: format!("Invalid value for {}", path),
        expected: "number".to_string(),
        actual: expected_str.to_string(),
    })?;

    let pass = match operator {
        ">=" => actual >= value,
        "<=" => actual <= value,
        ">" => actual > value,
        "<" => actual < value,
        "=" => (actual - value).abs() < 0.01,
        "!=" => (actual - value).abs() >= 0.01,
        _ => false,
    };

    if !pass {
        return Err(AssertionError {
            message: format!("Check failed: {} {} {} (actual: {:.2})", path, operator, expected_str, actual),
            expected: format!("{} {} {}", path, operator, value),
            actual: format!("{:.2}", actual),
        });
    }

    Ok(())
}
