//! Global gameplay tuning settings (decoupled from UI)

use bevy::log::warn;
use bevy::prelude::{ResMut, Resource};
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Path to global gameplay tuning config
pub const GAMEPLAY_TUNING_FILE: &str = "config/gameplay_tuning.json";

/// Runtime-adjustable physics values for tweaking gameplay feel.
///
/// Missing fields in the config file fall back to the compiled-in constants.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTweaks {
    pub gravity: f32,
    pub air_friction: f32,
    pub restitution: f32,
    pub min_bounce_speed: f32,
    pub roll_damp: f32,
    pub sleep_speed: f32,
    pub settle_speed_sq: f32,
    pub near_floor_band: f32,
    pub max_bounces: u32,
    pub move_speed: f32,
    pub pitch_rate: f32,
    pub throw_force: f32,
    pub throw_pitch_bonus: f32,
}

impl Default for PhysicsTweaks {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            air_friction: AIR_FRICTION,
            restitution: RESTITUTION,
            min_bounce_speed: MIN_BOUNCE_SPEED,
            roll_damp: ROLL_DAMP,
            sleep_speed: SLEEP_SPEED,
            settle_speed_sq: SETTLE_SPEED_SQ,
            near_floor_band: NEAR_FLOOR_BAND,
            max_bounces: MAX_BOUNCES,
            move_speed: MOVE_SPEED,
            pitch_rate: PITCH_RATE,
            throw_force: THROW_FORCE,
            throw_pitch_bonus: THROW_PITCH_BONUS,
        }
    }
}

impl PhysicsTweaks {
    /// Reject values that would corrupt ball state (NaN, zero restitution range, etc.)
    pub fn validate(&self) -> Result<(), String> {
        let finite = [
            ("gravity", self.gravity),
            ("air_friction", self.air_friction),
            ("restitution", self.restitution),
            ("min_bounce_speed", self.min_bounce_speed),
            ("roll_damp", self.roll_damp),
            ("sleep_speed", self.sleep_speed),
            ("settle_speed_sq", self.settle_speed_sq),
            ("near_floor_band", self.near_floor_band),
            ("move_speed", self.move_speed),
            ("pitch_rate", self.pitch_rate),
            ("throw_force", self.throw_force),
            ("throw_pitch_bonus", self.throw_pitch_bonus),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(format!("{} must be finite, got {}", name, value));
            }
        }
        for (name, value) in [
            ("air_friction", self.air_friction),
            ("restitution", self.restitution),
            ("roll_damp", self.roll_damp),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be within [0, 1], got {}", name, value));
            }
        }
        if self.max_bounces == 0 {
            return Err("max_bounces must be at least 1".to_string());
        }
        Ok(())
    }
}

pub fn load_gameplay_tuning_from_file(path: &str) -> Result<PhysicsTweaks, String> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    let tweaks: PhysicsTweaks =
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))?;
    tweaks
        .validate()
        .map_err(|e| format!("Invalid tuning in {}: {}", path, e))?;
    Ok(tweaks)
}

pub fn apply_global_tuning(tweaks: &mut PhysicsTweaks) -> Result<(), String> {
    match load_gameplay_tuning_from_file(GAMEPLAY_TUNING_FILE) {
        Ok(tuning) => {
            *tweaks = tuning;
            Ok(())
        }
        Err(err) => {
            *tweaks = PhysicsTweaks::default();
            Err(err)
        }
    }
}

pub fn load_global_tuning_system(mut tweaks: ResMut<PhysicsTweaks>) {
    if let Err(err) = apply_global_tuning(&mut tweaks) {
        warn!("{}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let tweaks: PhysicsTweaks = serde_json::from_str(r#"{ "gravity": -9.8 }"#).unwrap();
        assert_eq!(tweaks.gravity, -9.8);
        assert_eq!(tweaks.throw_force, THROW_FORCE);
        assert_eq!(tweaks.max_bounces, MAX_BOUNCES);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(PhysicsTweaks::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_finite_and_out_of_range() {
        let mut tweaks = PhysicsTweaks::default();
        tweaks.gravity = f32::NAN;
        assert!(tweaks.validate().is_err());

        let mut tweaks = PhysicsTweaks::default();
        tweaks.restitution = 1.5;
        assert!(tweaks.validate().is_err());

        let mut tweaks = PhysicsTweaks::default();
        tweaks.max_bounces = 0;
        assert!(tweaks.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_gameplay_tuning_from_file("config/does_not_exist.json").is_err());
    }
}
