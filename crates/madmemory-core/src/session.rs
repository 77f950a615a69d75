use crate::catalog::Catalog;
use crate::error::SessionError;
use crate::events::{Feedback, Indicator, SessionEvent, StrikeReason, Tone};
use crate::rng::{RandomSource, SimpleRng};
use crate::rules::{Evaluation, RuleEngine};
use crate::snapshot::{History, Labels, SelectionMask, Stage, StageSnapshot, BUTTON_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// When the session re-arms after a strike or an advance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackMode {
    /// Re-arm inside the transition itself
    #[default]
    Immediate,
    /// Stay in [`Phase::Resolving`] until the host calls
    /// [`SessionController::finish_feedback`]
    Deferred,
}

/// Session settings supplied by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Label used in log records
    pub module_id: u32,
    pub feedback: FeedbackMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            module_id: 1,
            feedback: FeedbackMode::Immediate,
        }
    }
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Not activated yet; a button press here is a strike
    Idle,
    /// Waiting for the player in this stage
    Stage(Stage),
    /// Feedback is playing; input is ignored until the host finishes it
    Resolving { next: Stage },
    /// Terminal
    Solved,
}

/// Result of pressing one of the four buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Toggled { position: usize, selected: bool },
    /// Pressed before activation: strike and fresh first stage
    Strike,
    Ignored,
}

/// Result of pressing submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Advanced(Stage),
    Solved,
    Strike,
    Ignored,
}

/// Owns the stage history and drives the puzzle from activation to solve.
pub struct SessionController<R = SimpleRng> {
    config: SessionConfig,
    catalog: Catalog,
    rng: R,
    history: History,
    phase: Phase,
    strikes: usize,
    events: VecDeque<SessionEvent>,
}

impl SessionController<SimpleRng> {
    /// Session with default settings and a seeded generator
    pub fn with_seed(seed: u64) -> Self {
        Self::new(SessionConfig::default(), Catalog::default(), SimpleRng::with_seed(seed))
    }
}

impl<R: RandomSource> SessionController<R> {
    pub fn new(config: SessionConfig, catalog: Catalog, rng: R) -> Self {
        Self {
            config,
            catalog,
            rng,
            history: History::new(),
            phase: Phase::Idle,
            strikes: 0,
            events: VecDeque::new(),
        }
    }

    fn span(&self) -> tracing::Span {
        tracing::info_span!("madmemory", module_id = self.config.module_id)
    }

    /// Draw the first stage and start accepting input
    pub fn activate(&mut self) -> Result<(), SessionError> {
        let _span = self.span().entered();
        if self.phase != Phase::Idle {
            debug!(phase = ?self.phase, "Activation ignored");
            return Ok(());
        }

        self.restart_history();
        self.arm(Stage::First)
    }

    /// Flip the button at `position` in the current stage
    pub fn toggle(&mut self, position: usize) -> Result<ToggleOutcome, SessionError> {
        if position >= BUTTON_COUNT {
            return Err(SessionError::InvalidPosition { position });
        }
        let _span = self.span().entered();

        match self.phase {
            Phase::Idle => {
                warn!("Pressed a button before the module has been activated. Resetting the module.");
                let feedback = Feedback::new(
                    Tone::Red,
                    Stage::First,
                    SelectionMask::EMPTY,
                    SelectionMask::EMPTY,
                );
                self.strike(StrikeReason::PrematureInput { position }, feedback)?;
                Ok(ToggleOutcome::Strike)
            }
            Phase::Stage(stage) => {
                let Some(current) = self.history.current_mut() else {
                    return Ok(ToggleOutcome::Ignored);
                };
                let selected = current.selected_mut().toggle(position);
                debug!(
                    stage = stage.number(),
                    position,
                    label = current.labels().get(position),
                    selected,
                    "Button toggled"
                );
                Ok(ToggleOutcome::Toggled { position, selected })
            }
            Phase::Resolving { .. } | Phase::Solved => {
                debug!(phase = ?self.phase, position, "Button press ignored");
                Ok(ToggleOutcome::Ignored)
            }
        }
    }

    /// Check the current selection against the rules
    pub fn submit(&mut self) -> Result<SubmitOutcome, SessionError> {
        let _span = self.span().entered();
        let Phase::Stage(stage) = self.phase else {
            debug!(phase = ?self.phase, "Submit ignored");
            return Ok(SubmitOutcome::Ignored);
        };

        let evaluation = self.evaluate(stage)?;
        let (selected, labels) = match self.history.get(stage) {
            Some(snapshot) => (*snapshot.selected(), *snapshot.labels()),
            None => return Ok(SubmitOutcome::Ignored),
        };
        let received = selected.describe(&labels);
        info!("Received button group {}.", received);

        if selected != evaluation.mask {
            warn!(
                "Button group {} was incorrect (expected {}). Resetting the module.",
                received,
                evaluation.mask.describe(&labels)
            );
            let feedback = Feedback::new(Tone::Red, stage, evaluation.mask, selected);
            let reason = StrikeReason::WrongSubmission {
                submitted: selected,
                expected: evaluation.mask,
            };
            self.strike(reason, feedback)?;
            return Ok(SubmitOutcome::Strike);
        }

        let feedback = Feedback::new(Tone::Green, stage, evaluation.mask, selected);
        match stage.next() {
            Some(next) => {
                info!(
                    "Button group {} was correct. Advancing to stage {}.",
                    received,
                    next.number()
                );
                let snapshot = StageSnapshot::draw(&mut self.rng);
                self.history.push(snapshot);
                let expected = self.evaluate(next)?.mask;
                self.events.push_back(SessionEvent::StageAdvance {
                    stage: next,
                    expected,
                    feedback,
                });
                self.after_feedback(next)?;
                Ok(SubmitOutcome::Advanced(next))
            }
            None => {
                info!("Module solved!");
                self.phase = Phase::Solved;
                self.events.push_back(SessionEvent::Pass { feedback });
                Ok(SubmitOutcome::Solved)
            }
        }
    }

    /// Host is done playing feedback; re-arm if the session was waiting.
    ///
    /// Returns whether anything changed.
    pub fn finish_feedback(&mut self) -> Result<bool, SessionError> {
        let _span = self.span().entered();
        match self.phase {
            Phase::Resolving { next } => {
                self.arm(next)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn strike(&mut self, reason: StrikeReason, feedback: Feedback) -> Result<(), SessionError> {
        self.strikes += 1;
        self.events.push_back(SessionEvent::Strike { reason, feedback });
        self.restart_history();
        self.after_feedback(Stage::First)
    }

    fn restart_history(&mut self) {
        let snapshot = StageSnapshot::draw(&mut self.rng);
        self.history.reset_with(snapshot);
    }

    fn after_feedback(&mut self, next: Stage) -> Result<(), SessionError> {
        match self.config.feedback {
            FeedbackMode::Immediate => self.arm(next),
            FeedbackMode::Deferred => {
                self.phase = Phase::Resolving { next };
                Ok(())
            }
        }
    }

    fn arm(&mut self, stage: Stage) -> Result<(), SessionError> {
        self.phase = Phase::Stage(stage);
        let evaluation = self.evaluate(stage)?;

        if let Some(snapshot) = self.history.get(stage) {
            info!(
                "Stage {}. Screen label is: {}. Button labels are: {}.",
                stage.number(),
                self.catalog.text(snapshot.display()),
                snapshot.labels()
            );
            info!("{}", evaluation.rule);
            info!(
                "Expecting button group {}.",
                evaluation.mask.describe(snapshot.labels())
            );
        }

        self.events.push_back(SessionEvent::ExpectedComputed {
            stage,
            mask: evaluation.mask,
            rule: evaluation.rule,
        });
        Ok(())
    }

    fn evaluate(&self, stage: Stage) -> Result<Evaluation, SessionError> {
        Ok(RuleEngine::new(&self.catalog).evaluate(&self.history, stage)?)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether gameplay input is being accepted
    pub fn armed(&self) -> bool {
        matches!(self.phase, Phase::Stage(_))
    }

    pub fn is_solved(&self) -> bool {
        self.phase == Phase::Solved
    }

    /// Stage of the newest snapshot
    pub fn current_stage(&self) -> Stage {
        Stage::try_from(self.history.len().saturating_sub(1)).unwrap_or(Stage::Fourth)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Text on the display; blank before activation and once solved
    pub fn display_text(&self) -> Option<&str> {
        if matches!(self.phase, Phase::Idle | Phase::Solved) {
            return None;
        }
        self.history
            .current()
            .map(|snapshot| self.catalog.text(snapshot.display()))
    }

    pub fn labels(&self) -> Option<Labels> {
        self.history.current().map(|snapshot| *snapshot.labels())
    }

    pub fn selection(&self) -> Option<SelectionMask> {
        self.history.current().map(|snapshot| *snapshot.selected())
    }

    /// Light above the button at `position`
    pub fn indicator(&self, position: usize) -> Indicator {
        match self.phase {
            Phase::Idle => Indicator::Off,
            Phase::Solved => Indicator::Cleared,
            Phase::Stage(_) | Phase::Resolving { .. } => {
                let selected = self
                    .history
                    .current()
                    .is_some_and(|snapshot| snapshot.selected().get(position));
                if selected {
                    Indicator::Selected
                } else if position < self.current_stage().index() {
                    Indicator::Cleared
                } else {
                    Indicator::Off
                }
            }
        }
    }

    pub fn indicators(&self) -> [Indicator; BUTTON_COUNT] {
        std::array::from_fn(|p| self.indicator(p))
    }

    pub fn strikes(&self) -> usize {
        self.strikes
    }

    pub fn module_id(&self) -> u32 {
        self.config.module_id
    }

    /// Take every event queued since the last call
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }
}
