use crate::animations::Pulse;
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use madmemory_core::{
    Catalog, Phase, RandomSource, SessionConfig, SessionController, SessionError, SessionEvent,
    StrikeReason, SubmitOutcome,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// How long a temporary message stays up
const MESSAGE_DURATION: Duration = Duration::from_secs(3);

/// Draws for the session, backed by `rand`
pub struct HostRng(StdRng);

impl HostRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

impl RandomSource for HostRng {
    fn uniform(&mut self, lo: u32, hi: u32) -> u32 {
        self.0.gen_range(lo..=hi.max(lo))
    }
}

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// The main application state
pub struct App {
    /// Current session
    pub session: SessionController<HostRng>,
    /// Color theme
    pub theme: Theme,
    /// Feedback currently playing
    pub pulse: Option<Pulse>,
    /// Message to display
    pub message: Option<String>,
    /// When the current message goes away; `None` keeps it up
    message_until: Option<Instant>,
    config: SessionConfig,
    catalog: Catalog,
    seed: Option<u64>,
    /// Sessions started, used to vary the seed on restart
    restarts: u64,
}

impl App {
    pub fn new(config: SessionConfig, catalog: Catalog, seed: Option<u64>, theme: Theme) -> Self {
        let session = SessionController::new(config.clone(), catalog.clone(), HostRng::new(seed));
        Self {
            session,
            theme,
            pulse: None,
            message: Some("Press a to activate".to_string()),
            message_until: None,
            config,
            catalog,
            seed,
            restarts: 0,
        }
    }

    /// Get the tick rate; faster while a pulse plays
    pub fn get_tick_rate(&self) -> Duration {
        if self.pulse.is_some() {
            Duration::from_millis(33)
        } else {
            Duration::from_millis(100)
        }
    }

    /// Update animations and timers (called every tick)
    pub fn tick(&mut self) {
        self.expire_message(Instant::now());

        if self.pulse.as_ref().is_some_and(Pulse::is_finished) {
            self.pulse = None;
            let result = self.session.finish_feedback();
            self.after(result.map(|_| ()));
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_until = Some(Instant::now() + MESSAGE_DURATION);
    }

    /// Drop the message once its time is up, whatever the tick rate
    fn expire_message(&mut self, now: Instant) {
        if self.message_until.is_some_and(|until| now >= until) {
            self.message = None;
            self.message_until = None;
        }
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,

            KeyCode::Char('a') => {
                let result = self.session.activate();
                self.after(result);
            }

            KeyCode::Char(c @ '1'..='4') => {
                let position = (c as u8 - b'1') as usize;
                let result = self.session.toggle(position);
                self.after(result.map(|_| ()));
            }

            KeyCode::Enter | KeyCode::Char('s') => {
                let result = self.session.submit();
                if let Ok(SubmitOutcome::Ignored) = result {
                    tracing::debug!("Submit while not armed");
                }
                self.after(result.map(|_| ()));
            }

            KeyCode::Char('r') if self.session.is_solved() => self.restart(),

            _ => {}
        }
        AppAction::Continue
    }

    /// Start a fresh, not yet activated session
    fn restart(&mut self) {
        self.restarts += 1;
        let seed = self.seed.map(|s| s.wrapping_add(self.restarts));
        self.session = SessionController::new(
            self.config.clone(),
            self.catalog.clone(),
            HostRng::new(seed),
        );
        self.pulse = None;
        self.show_message("New module. Press a to activate");
    }

    /// React to whatever the session queued during the last call
    fn after(&mut self, result: Result<(), SessionError>) {
        if let Err(e) = result {
            tracing::error!(error = %e, "Session rejected input");
            self.show_message(&e.to_string());
        }

        for event in self.session.drain_events() {
            if let Some(feedback) = event.feedback() {
                self.pulse = Some(Pulse::new(feedback));
            }
            match event {
                SessionEvent::Strike { reason, .. } => {
                    let text = match reason {
                        StrikeReason::PrematureInput { .. } => "Strike! Pressed before activation",
                        StrikeReason::WrongSubmission { .. } => "Strike! Back to stage 1",
                    };
                    self.show_message(text);
                }
                SessionEvent::StageAdvance { stage, .. } => {
                    self.show_message(&format!("Correct! On to {}", stage));
                }
                SessionEvent::Pass { .. } => {
                    self.show_message("Module solved! Press r for another");
                }
                SessionEvent::ExpectedComputed { .. } => {}
            }
        }
    }

    /// Short status line for the current phase
    pub fn phase_text(&self) -> String {
        match self.session.phase() {
            Phase::Idle => "Waiting for activation".to_string(),
            Phase::Stage(stage) => format!("Stage {}/4", stage.number()),
            Phase::Resolving { .. } => "...".to_string(),
            Phase::Solved => "Solved".to_string(),
        }
    }
}
