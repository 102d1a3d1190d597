//! Scripted input injection for tests

use std::collections::HashMap;

use super::parser::FrameInput;
use crate::input::{BallCommands, ControlIntent, ModeCommand};
use crate::modes::GameModeKind;

/// Inputs resolved for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameActions {
    pub intent: ControlIntent,
    pub commands: BallCommands,
    pub mode_command: Option<ModeCommand>,
    pub pitch: Option<f32>,
}

/// Scripted inputs for a test. Held buttons persist between frames.
#[derive(Debug, Default)]
pub struct ScriptedInputs {
    frames: HashMap<u64, FrameInput>,
    held: ControlIntent,
    /// Current frame number
    pub current_frame: u64,
    /// Last frame with scripted input
    pub max_frame: u64,
}

impl ScriptedInputs {
    /// Create from parsed frame inputs. Later entries for the same frame win.
    pub fn from_inputs(inputs: &[FrameInput]) -> Result<Self, String> {
        let mut frames = HashMap::new();
        let mut max_frame = 0u64;

        for fi in inputs {
            if let Some(name) = &fi.start_mode
                && GameModeKind::from_name(name).is_none()
            {
                return Err(format!("Unknown mode '{}' at frame {}", name, fi.frame));
            }
            max_frame = max_frame.max(fi.frame);
            frames.insert(fi.frame, fi.clone());
        }

        Ok(Self {
            frames,
            held: ControlIntent::default(),
            current_frame: 0,
            max_frame,
        })
    }

    /// Resolve this frame's inputs and advance
    pub fn advance_frame(&mut self) -> FrameActions {
        let mut actions = FrameActions::default();

        if let Some(fi) = self.frames.get(&self.current_frame) {
            let held = &mut self.held;
            let apply = |slot: &mut bool, value: Option<bool>| {
                if let Some(v) = value {
                    *slot = v;
                }
            };
            apply(&mut held.move_forward, fi.move_forward);
            apply(&mut held.move_back, fi.move_back);
            apply(&mut held.move_left, fi.move_left);
            apply(&mut held.move_right, fi.move_right);
            apply(&mut held.increase_power, fi.increase_power);
            apply(&mut held.decrease_power, fi.decrease_power);

            actions.commands.launch = fi.launch;
            actions.commands.reset = fi.reset;
            actions.pitch = fi.pitch;
            actions.mode_command = if let Some(kind) = fi.start_mode.as_deref().and_then(GameModeKind::from_name) {
                Some(ModeCommand::Start(kind))
            } else if fi.restart {
                Some(ModeCommand::Restart)
            } else if fi.show_selector {
                Some(ModeCommand::ShowSelector)
            } else {
                None
            };
        }

        actions.intent = self.held;
        self.current_frame += 1;
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_buttons_persist_and_one_shots_do_not() {
        let inputs = vec![
            FrameInput { frame: 0, move_forward: Some(true), launch: true, ..Default::default() },
            FrameInput { frame: 3, move_forward: Some(false), ..Default::default() },
        ];
        let mut scripted = ScriptedInputs::from_inputs(&inputs).unwrap();

        let f0 = scripted.advance_frame();
        assert!(f0.intent.move_forward);
        assert!(f0.commands.launch);

        let f1 = scripted.advance_frame();
        assert!(f1.intent.move_forward);
        assert!(!f1.commands.launch);

        scripted.advance_frame();
        let f3 = scripted.advance_frame();
        assert!(!f3.intent.move_forward);
        assert_eq!(scripted.max_frame, 3);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let inputs = vec![FrameInput {
            frame: 1,
            start_mode: Some("bogus".to_string()),
            ..Default::default()
        }];
        assert!(ScriptedInputs::from_inputs(&inputs).is_err());
    }
}
