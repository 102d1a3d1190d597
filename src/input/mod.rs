//! Input module - control intent resources and capture_input system

use bevy::prelude::*;

use crate::constants::*;
use crate::modes::GameModeKind;

/// Held-button state for the grounded ball. Overwritten every frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlIntent {
    pub move_forward: bool,
    pub move_back: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub increase_power: bool,
    pub decrease_power: bool,
}

impl ControlIntent {
    /// Unnormalized movement on the court plane (forward is +x, right is +z)
    pub fn move_axis(&self) -> Vec3 {
        let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;
        Vec3::new(
            axis(self.move_forward, self.move_back),
            0.0,
            axis(self.move_right, self.move_left),
        )
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One-shot ball commands, accumulated until the fixed tick consumes them
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BallCommands {
    pub launch: bool,
    /// Player-requested reset (subject to mode gating)
    pub reset: bool,
    /// Reset requested by the mode controller (game start, turn switch). Never gated.
    pub forced_reset: bool,
}

/// Mode menu actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeCommand {
    /// Select a mode and start it immediately
    Start(GameModeKind),
    /// Open the mode selector (deactivates the running game)
    ShowSelector,
    /// Restart the current mode
    Restart,
}

/// Pending mode command, consumed at the start of the next tick
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeCommands(pub Option<ModeCommand>);

/// Runs in Update to capture input state before it's cleared.
pub fn capture_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    mut intent: ResMut<ControlIntent>,
    mut commands: ResMut<BallCommands>,
    mut mode_commands: ResMut<ModeCommands>,
) {
    let mut stick = Vec2::ZERO;
    for gamepad in &gamepads {
        let x = gamepad.get(GamepadAxis::LeftStickX).unwrap_or(0.0);
        let y = gamepad.get(GamepadAxis::LeftStickY).unwrap_or(0.0);
        if x.abs() > STICK_DEADZONE {
            stick.x += x;
        }
        if y.abs() > STICK_DEADZONE {
            stick.y += y;
        }
    }

    intent.move_forward = keyboard.pressed(KeyCode::ArrowUp) || stick.y > 0.0;
    intent.move_back = keyboard.pressed(KeyCode::ArrowDown) || stick.y < 0.0;
    intent.move_left = keyboard.pressed(KeyCode::ArrowLeft) || stick.x < 0.0;
    intent.move_right = keyboard.pressed(KeyCode::ArrowRight) || stick.x > 0.0;
    intent.increase_power = keyboard.pressed(KeyCode::KeyW)
        || gamepads.iter().any(|gp| gp.pressed(GamepadButton::DPadUp));
    intent.decrease_power = keyboard.pressed(KeyCode::KeyS)
        || gamepads.iter().any(|gp| gp.pressed(GamepadButton::DPadDown));

    // Launch / reset - accumulate until consumed
    if keyboard.just_pressed(KeyCode::Space)
        || gamepads.iter().any(|gp| gp.just_pressed(GamepadButton::South))
    {
        commands.launch = true;
    }
    if keyboard.just_pressed(KeyCode::KeyR)
        || gamepads.iter().any(|gp| gp.just_pressed(GamepadButton::West))
    {
        commands.reset = true;
    }

    let mode_keys = [
        (KeyCode::Digit1, GameModeKind::FreeShoot),
        (KeyCode::Digit2, GameModeKind::TimedChallenge),
        (KeyCode::Digit3, GameModeKind::ShotLimit),
        (KeyCode::Digit4, GameModeKind::TwoPlayer),
    ];
    for (key, kind) in mode_keys {
        if keyboard.just_pressed(key) {
            mode_commands.0 = Some(ModeCommand::Start(kind));
        }
    }
    if keyboard.just_pressed(KeyCode::KeyM) {
        mode_commands.0 = Some(ModeCommand::ShowSelector);
    }
    if keyboard.just_pressed(KeyCode::Enter) {
        mode_commands.0 = Some(ModeCommand::Restart);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_axis_cancels_opposites() {
        let intent = ControlIntent {
            move_forward: true,
            move_back: true,
            move_left: true,
            ..default()
        };
        assert_eq!(intent.move_axis(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(ControlIntent::default().move_axis(), Vec3::ZERO);
    }
}
