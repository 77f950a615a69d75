use thiserror::Error;

/// Problems with a display table supplied by the host
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("display catalog needs exactly 16 entries, found {found}")]
    WrongEntryCount { found: usize },
    #[error("display catalog entry {index} has no text")]
    EmptyText { index: usize },
}

/// Rule engine called outside its domain.
///
/// The session controller never produces these; seeing one means the
/// caller built a history by hand and got it wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("stage {stage} has no rule (stages are 0..=3)")]
    StageOutOfRange { stage: usize },
    #[error("stage {stage} needs {} snapshots of history, found {len}", stage + 1)]
    HistoryTooShort { stage: usize, len: usize },
    #[error("stage {stage} labels {labels:?} are not a permutation of 1..=4")]
    MalformedLabels { stage: usize, labels: [u8; 4] },
}

/// Errors surfaced by [`crate::SessionController`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("button position {position} is out of range (0..=3)")]
    InvalidPosition { position: usize },
    #[error(transparent)]
    Rule(#[from] RuleError),
}
