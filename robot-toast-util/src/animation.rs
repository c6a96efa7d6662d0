//! Named animation catalog shared with the stylesheet.
//!
//! Each variant maps to one animation class. Durations mirror the keyframe
//! declarations so a host without a real compositor can report completion
//! on time.

use crate::kind::{Side, Transition};
use std::time::Duration;

/// The node of the toast visual tree an animation runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Character,
    Message,
    Progress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Animation {
    CharacterEnter(Side, Transition),
    CharacterExit(Side, Transition),
    /// Breathing loop while the toast rests.
    CharacterIdle,
    CharacterSnap(Side),
    MessageEnter(Transition),
    MessageExit,
    /// Countdown bar; its duration is set per toast.
    ProgressCountdown,
}

impl Animation {
    pub fn part(self) -> Part {
        match self {
            Animation::CharacterEnter(..)
            | Animation::CharacterExit(..)
            | Animation::CharacterIdle
            | Animation::CharacterSnap(_) => Part::Character,
            Animation::MessageEnter(_) | Animation::MessageExit => Part::Message,
            Animation::ProgressCountdown => Part::Progress,
        }
    }

    pub fn class_name(self) -> String {
        match self {
            Animation::CharacterEnter(side, t) => {
                format!("robot-enter-{}{}", side.as_str(), t.suffix())
            }
            Animation::CharacterExit(side, t) => {
                format!("robot-exit-{}{}", side.as_str(), t.suffix())
            }
            Animation::CharacterIdle => "robot-idle".to_string(),
            Animation::CharacterSnap(side) => format!("robot-snap-{}", side.as_str()),
            Animation::MessageEnter(Transition::Bounce) => "message-enter".to_string(),
            Animation::MessageEnter(t) => format!("message-enter{}", t.suffix()),
            Animation::MessageExit => "message-exit".to_string(),
            Animation::ProgressCountdown => "robot-toast-progress-auto".to_string(),
        }
    }

    /// Length of one run, `None` for loops and externally timed animations.
    pub fn duration(self) -> Option<Duration> {
        let ms = match self {
            Animation::CharacterEnter(_, Transition::Bounce) => 700,
            Animation::CharacterEnter(_, Transition::Slide) => 500,
            Animation::CharacterEnter(_, Transition::Zoom | Transition::Flip) => 600,
            Animation::CharacterExit(_, Transition::Bounce) => 500,
            Animation::CharacterExit(..) => 400,
            Animation::CharacterSnap(_) => 400,
            Animation::MessageEnter(Transition::Bounce) => 500,
            Animation::MessageEnter(Transition::Slide) => 350,
            Animation::MessageEnter(_) => 400,
            Animation::MessageExit => 300,
            Animation::CharacterIdle | Animation::ProgressCountdown => return None,
        };
        Some(Duration::from_millis(ms))
    }

    /// Whether the host will report an end event for this animation.
    pub fn reports_end(self) -> bool {
        self.duration().is_some()
    }
}
