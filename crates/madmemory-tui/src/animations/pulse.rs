use madmemory_core::{Feedback, PulseStep, Tone};
use std::time::{Duration, Instant};

/// Plays a feedback pulse against the wall clock
#[derive(Debug, Clone)]
pub struct Pulse {
    tone: Tone,
    steps: Vec<PulseStep>,
    started: Instant,
}

impl Pulse {
    pub fn new(feedback: &Feedback) -> Self {
        Self::starting_at(feedback, Instant::now())
    }

    pub fn starting_at(feedback: &Feedback, started: Instant) -> Self {
        Self {
            tone: feedback.tone,
            steps: feedback.pattern.clone(),
            started,
        }
    }

    fn total(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn is_finished_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.total()
    }

    pub fn is_finished(&self) -> bool {
        self.is_finished_at(Instant::now())
    }

    /// Whether the lights are on at `now`
    pub fn lit_at(&self, now: Instant) -> bool {
        let mut elapsed = now.saturating_duration_since(self.started);
        for step in &self.steps {
            if elapsed < step.duration {
                return step.lit;
            }
            elapsed -= step.duration;
        }
        false
    }

    /// Pulse colour to show right now, if the lights are on
    pub fn lit_tone(&self) -> Option<Tone> {
        self.lit_at(Instant::now()).then_some(self.tone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use madmemory_core::{SelectionMask, Stage};

    #[test]
    fn test_pulse_schedule() {
        let feedback = Feedback::new(
            Tone::Red,
            Stage::First,
            SelectionMask::EMPTY,
            SelectionMask::EMPTY,
        );
        let start = Instant::now();
        let pulse = Pulse::starting_at(&feedback, start);
        let at = |ms| start + Duration::from_millis(ms);

        assert!(pulse.lit_at(at(50)));
        assert!(!pulse.lit_at(at(150)));
        assert!(pulse.lit_at(at(250)));
        assert!(!pulse.lit_at(at(350)));
        assert!(pulse.lit_at(at(900)));
        assert!(!pulse.is_finished_at(at(999)));
        assert!(pulse.is_finished_at(at(1000)));
        assert!(!pulse.lit_at(at(1200)));
    }
}
