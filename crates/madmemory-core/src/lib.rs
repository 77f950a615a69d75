//! Rule engine and session state machine for Mad Memory, a four-stage
//! deduction puzzle.
//!
//! Each stage shows one of sixteen symbols and four buttons labelled 1-4
//! in random order. The buttons the player must select depend on the
//! current display and on everything shown and selected in earlier
//! stages. [`RuleEngine`] computes that answer; [`SessionController`]
//! runs the stages, checks submissions, and resets on a strike.

pub mod catalog;
pub mod error;
pub mod events;
pub mod rng;
pub mod rules;
pub mod session;
pub mod snapshot;


pub use catalog::{classify, Catalog, Category, DisplayEntry, CATALOG_SIZE};
pub use error::{CatalogError, RuleError, SessionError};
pub use events::{Feedback, Indicator, PulseStep, SessionEvent, StrikeReason, Tone, PULSE_PATTERN};
pub use rng::{RandomSource, ScriptedDraws, SimpleRng};
pub use rules::{Evaluation, FourthRule, Rule, RuleEngine, SecondRule, ThirdRule};
pub use session::{FeedbackMode, Phase, SessionConfig, SessionController, SubmitOutcome, ToggleOutcome};
pub use snapshot::{History, Labels, SelectionMask, Stage, StageSnapshot, BUTTON_COUNT};
