//! What the session reports to its host.
//!
//! The core never sleeps or animates. Feedback events carry the pulse
//! schedule and the masks involved so the host can render them on its own
//! clock.

use crate::rules::Rule;
use crate::snapshot::{SelectionMask, Stage};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Colour of a feedback pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Red,
    Green,
}

/// One step of a pulse: all indicators lit (or dark) for `duration`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseStep {
    pub lit: bool,
    pub duration: Duration,
}

const fn step(lit: bool, millis: u64) -> PulseStep {
    PulseStep {
        lit,
        duration: Duration::from_millis(millis),
    }
}

/// Blink, blink, hold
pub const PULSE_PATTERN: [PulseStep; 5] = [
    step(true, 100),
    step(false, 100),
    step(true, 100),
    step(false, 100),
    step(true, 600),
];

/// Data a host needs to replay pass/fail feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub tone: Tone,
    /// Stage the submission (or premature press) happened in
    pub stage: Stage,
    pub expected: SelectionMask,
    pub selected: SelectionMask,
    pub pattern: Vec<PulseStep>,
}

impl Feedback {
    pub fn new(tone: Tone, stage: Stage, expected: SelectionMask, selected: SelectionMask) -> Self {
        Self {
            tone,
            stage,
            expected,
            selected,
            pattern: PULSE_PATTERN.to_vec(),
        }
    }

    /// Total time the pulse takes to play
    pub fn total_duration(&self) -> Duration {
        self.pattern.iter().map(|s| s.duration).sum()
    }
}

/// Why a strike was reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrikeReason {
    WrongSubmission {
        submitted: SelectionMask,
        expected: SelectionMask,
    },
    /// A button was pressed before the session was activated
    PrematureInput { position: usize },
}

/// Events queued by the session for its host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Strike {
        reason: StrikeReason,
        feedback: Feedback,
    },
    /// The fourth stage was submitted correctly
    Pass { feedback: Feedback },
    StageAdvance {
        stage: Stage,
        expected: SelectionMask,
        feedback: Feedback,
    },
    ExpectedComputed {
        stage: Stage,
        mask: SelectionMask,
        rule: Rule,
    },
}

impl SessionEvent {
    /// Feedback to play for this event, if any
    pub fn feedback(&self) -> Option<&Feedback> {
        match self {
            SessionEvent::Strike { feedback, .. }
            | SessionEvent::Pass { feedback }
            | SessionEvent::StageAdvance { feedback, .. } => Some(feedback),
            SessionEvent::ExpectedComputed { .. } => None,
        }
    }
}

/// State of the light above one button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    Off,
    /// Toggled on in the current stage
    Selected,
    /// Position number is below the current stage (progress marker)
    Cleared,
}
