//! Per-throw shot outcome classification

use bevy::prelude::*;

use crate::ball::HoopContact;
use crate::constants::*;
use crate::helpers::horizontal_distance;

/// Verdict shown to the player, one per throw
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ShotFeedback {
    Made,
    TooStrong,
    TooWeak,
    Close,
}

impl ShotFeedback {
    pub fn message(self) -> &'static str {
        match self {
            ShotFeedback::Made => "VERY GOOD!",
            ShotFeedback::TooStrong => "TOO STRONG!",
            ShotFeedback::TooWeak => "TOO WEAK!",
            ShotFeedback::Close => "CLOSE! Try again!",
        }
    }

    pub fn category(self) -> FeedbackCategory {
        match self {
            ShotFeedback::Made => FeedbackCategory::Success,
            ShotFeedback::TooStrong => FeedbackCategory::Overshot,
            ShotFeedback::TooWeak => FeedbackCategory::Undershot,
            ShotFeedback::Close => FeedbackCategory::Near,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace(['_', '-', ' '], "").as_str() {
            "made" => Some(ShotFeedback::Made),
            "toostrong" => Some(ShotFeedback::TooStrong),
            "tooweak" => Some(ShotFeedback::TooWeak),
            "close" => Some(ShotFeedback::Close),
            _ => None,
        }
    }
}

/// Styling hint for the feedback sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackCategory {
    Success,
    Overshot,
    Undershot,
    Near,
    /// Mode notices (turn switches, game over)
    Notice,
}

/// Throw-scoped classification flags
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ShotTracker {
    pub reached_hoop_area: bool,
    pub passed_over_hoop: bool,
    pub hit_backboard: bool,
    /// Rose into the rim opening from underneath
    pub rim_from_below: bool,
    /// Latched verdict; first writer wins
    pub feedback: Option<ShotFeedback>,
}

impl ShotTracker {
    pub fn begin_throw(&mut self) {
        *self = Self::default();
    }

    /// Latch a verdict. Returns it only if this is the first one for the throw.
    pub fn give(&mut self, feedback: ShotFeedback) -> Option<ShotFeedback> {
        if self.feedback.is_some() {
            return None;
        }
        self.feedback = Some(feedback);
        Some(feedback)
    }

    /// Track proximity to the rim during flight
    pub fn observe_flight(&mut self, position: Vec3, rim: Vec3) {
        if self.feedback.is_some() {
            return;
        }
        if position.distance(rim) < HOOP_AREA_RADIUS {
            self.reached_hoop_area = true;
        }
        if horizontal_distance(position, rim) < OVERSHOT_HORIZONTAL
            && position.y > rim.y + OVERSHOT_HEIGHT
        {
            self.passed_over_hoop = true;
        }
    }

    /// Immediate verdicts from hoop contact
    pub fn on_contact(&mut self, contact: &HoopContact) -> Option<ShotFeedback> {
        match *contact {
            HoopContact::Made { .. } => self.give(ShotFeedback::Made),
            HoopContact::Backboard { .. } => {
                self.hit_backboard = true;
                self.give(ShotFeedback::TooStrong)
            }
            HoopContact::Structure { above_rim: true, .. } => self.give(ShotFeedback::TooStrong),
            HoopContact::Structure { above_rim: false, .. } => self.give(ShotFeedback::TooWeak),
            HoopContact::RimGraze { below_rim, .. } => {
                self.reached_hoop_area = true;
                self.rim_from_below |= below_rim;
                None
            }
            HoopContact::RimDeflect { .. } => {
                self.reached_hoop_area = true;
                None
            }
        }
    }

    /// Verdict for a throw that came to rest without an immediate one
    pub fn on_settle(&mut self) -> Option<ShotFeedback> {
        if self.feedback.is_some() {
            return None;
        }
        let verdict = if self.passed_over_hoop {
            ShotFeedback::TooStrong
        } else if !self.reached_hoop_area || self.rim_from_below {
            ShotFeedback::TooWeak
        } else {
            ShotFeedback::Close
        };
        self.give(verdict)
    }

    /// Ball dropped out of the world or stalled on the hoop structure
    pub fn on_forced_reset(&mut self) -> Option<ShotFeedback> {
        self.give(ShotFeedback::TooStrong)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::court::{HoopSide, PartRole};

    const RIM: Vec3 = Vec3::new(HOOP_RIM_X, RIM_HEIGHT, 0.0);

    #[test]
    fn test_feedback_latches_first_writer() {
        let mut tracker = ShotTracker::default();
        assert_eq!(tracker.give(ShotFeedback::TooStrong), Some(ShotFeedback::TooStrong));
        assert_eq!(tracker.give(ShotFeedback::Made), None);
        assert_eq!(tracker.on_settle(), None);
        assert_eq!(tracker.feedback, Some(ShotFeedback::TooStrong));

        tracker.begin_throw();
        assert_eq!(tracker.feedback, None);
    }

    #[test]
    fn test_settle_classification() {
        let mut tracker = ShotTracker::default();
        assert_eq!(tracker.on_settle(), Some(ShotFeedback::TooWeak));

        let mut tracker = ShotTracker::default();
        tracker.observe_flight(RIM + Vec3::new(-2.0, 1.0, 0.0), RIM);
        assert!(tracker.reached_hoop_area);
        assert_eq!(tracker.on_settle(), Some(ShotFeedback::Close));

        let mut tracker = ShotTracker::default();
        tracker.observe_flight(RIM + Vec3::new(1.0, OVERSHOT_HEIGHT + 1.0, 0.0), RIM);
        assert!(tracker.passed_over_hoop);
        assert_eq!(tracker.on_settle(), Some(ShotFeedback::TooStrong));
    }

    #[test]
    fn test_contact_verdicts() {
        let side = HoopSide::Right;
        let mut tracker = ShotTracker::default();
        assert_eq!(
            tracker.on_contact(&HoopContact::Backboard { side }),
            Some(ShotFeedback::TooStrong)
        );
        assert!(tracker.hit_backboard);

        let mut tracker = ShotTracker::default();
        let low_pole = HoopContact::Structure { side, role: PartRole::Pole, above_rim: false };
        assert_eq!(tracker.on_contact(&low_pole), Some(ShotFeedback::TooWeak));

        let mut tracker = ShotTracker::default();
        let high_arm = HoopContact::Structure { side, role: PartRole::SupportArm, above_rim: true };
        assert_eq!(tracker.on_contact(&high_arm), Some(ShotFeedback::TooStrong));

        let mut tracker = ShotTracker::default();
        assert_eq!(tracker.on_contact(&HoopContact::RimDeflect { side }), None);
        assert_eq!(tracker.on_contact(&HoopContact::Made { side }), Some(ShotFeedback::Made));
    }

    #[test]
    fn test_observation_stops_after_verdict() {
        let mut tracker = ShotTracker::default();
        tracker.give(ShotFeedback::TooWeak);
        tracker.observe_flight(RIM, RIM);
        assert!(!tracker.reached_hoop_area);
    }

    #[test]
    fn test_feedback_names() {
        assert_eq!(ShotFeedback::from_name("too_strong"), Some(ShotFeedback::TooStrong));
        assert_eq!(ShotFeedback::from_name("Close"), Some(ShotFeedback::Close));
        assert_eq!(ShotFeedback::from_name("swish"), None);
        assert_eq!(ShotFeedback::TooWeak.message(), "TOO WEAK!");
    }
}
