use crate::error::RuleError;
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};

/// Number of buttons on the panel
pub const BUTTON_COUNT: usize = 4;

/// Redraws allowed per position before the lowest unused label is taken
const MAX_LABEL_DRAWS: usize = 64;

/// One of the four sequential rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    First,
    Second,
    Third,
    Fourth,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::First, Stage::Second, Stage::Third, Stage::Fourth];

    /// Zero-based index into the history
    pub fn index(self) -> usize {
        self as usize
    }

    /// One-based number, as shown to players
    pub fn number(self) -> usize {
        self.index() + 1
    }

    /// The following stage, or `None` after the last one
    pub fn next(self) -> Option<Stage> {
        Self::ALL.get(self.index() + 1).copied()
    }
}

impl TryFrom<usize> for Stage {
    type Error = RuleError;

    fn try_from(stage: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(stage)
            .copied()
            .ok_or(RuleError::StageOutOfRange { stage })
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stage {}", self.number())
    }
}

/// Printed numbers (1..=4) on the buttons, by position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Labels([u8; BUTTON_COUNT]);

impl Labels {
    /// Labels as given; the rule engine rejects any that are not a
    /// permutation of 1..=4
    pub fn new(labels: [u8; BUTTON_COUNT]) -> Self {
        Self(labels)
    }

    /// Draw a permutation of 1..=4, position 0 first, rejecting repeats.
    ///
    /// A source that keeps repeating itself gets `MAX_LABEL_DRAWS`
    /// attempts per position; after that the lowest unused label is used.
    pub fn draw(rng: &mut dyn RandomSource) -> Self {
        let mut labels = [0u8; BUTTON_COUNT];
        for i in 0..BUTTON_COUNT {
            let used = &labels[..i];
            let label = (0..MAX_LABEL_DRAWS)
                .map(|_| rng.uniform(1, BUTTON_COUNT as u32) as u8)
                .find(|candidate| !used.contains(candidate))
                .or_else(|| (1..=BUTTON_COUNT as u8).find(|l| !used.contains(l)))
                .unwrap_or(1);
            labels[i] = label;
        }
        Self(labels)
    }

    pub fn get(&self, position: usize) -> u8 {
        self.0[position]
    }

    /// First position carrying `label`
    pub fn position_of(&self, label: u8) -> Option<usize> {
        self.0.iter().position(|&l| l == label)
    }

    pub fn contains(&self, label: u8) -> bool {
        self.0.contains(&label)
    }

    /// Whether every label 1..=4 appears exactly once
    pub fn is_permutation(&self) -> bool {
        (1..=BUTTON_COUNT as u8).all(|l| self.0.iter().filter(|&&x| x == l).count() == 1)
    }

    pub fn as_array(&self) -> [u8; BUTTON_COUNT] {
        self.0
    }
}

impl std::fmt::Display for Labels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for label in self.0 {
            write!(f, "{}", label)?;
        }
        Ok(())
    }
}

/// Which of the four positions are on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionMask([bool; BUTTON_COUNT]);

impl SelectionMask {
    pub const EMPTY: SelectionMask = SelectionMask([false; BUTTON_COUNT]);
    pub const FULL: SelectionMask = SelectionMask([true; BUTTON_COUNT]);

    pub fn new(bits: [bool; BUTTON_COUNT]) -> Self {
        Self(bits)
    }

    pub fn get(&self, position: usize) -> bool {
        self.0[position]
    }

    pub fn set(&mut self, position: usize, on: bool) {
        self.0[position] = on;
    }

    /// Flip one position and return its new state
    pub fn toggle(&mut self, position: usize) -> bool {
        self.0[position] = !self.0[position];
        self.0[position]
    }

    /// Positions that are on, ascending
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        (0..BUTTON_COUNT).filter(move |&p| self.0[p])
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|b| **b).count()
    }

    pub fn as_array(&self) -> [bool; BUTTON_COUNT] {
        self.0
    }

    /// Labels of the selected buttons in position order, or `(none)`
    pub fn describe(&self, labels: &Labels) -> String {
        let group: String = self
            .positions()
            .map(|p| labels.get(p).to_string())
            .collect();
        if group.is_empty() {
            "(none)".to_string()
        } else {
            format!("\"{}\"", group)
        }
    }
}

impl std::fmt::Display for SelectionMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for on in self.0 {
            write!(f, "{}", if on { 'x' } else { '.' })?;
        }
        Ok(())
    }
}

/// Everything one stage drew and what the player has selected in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSnapshot {
    display: u8,
    labels: Labels,
    selected: SelectionMask,
}

impl StageSnapshot {
    pub fn new(display: u8, labels: Labels) -> Self {
        Self {
            display,
            labels,
            selected: SelectionMask::EMPTY,
        }
    }

    /// Snapshot with a selection already made, for building histories
    pub fn with_selection(display: u8, labels: [u8; BUTTON_COUNT], selected: [bool; BUTTON_COUNT]) -> Self {
        Self {
            display,
            labels: Labels::new(labels),
            selected: SelectionMask::new(selected),
        }
    }

    /// Fresh stage: labels first, then the display index
    pub fn draw(rng: &mut dyn RandomSource) -> Self {
        let labels = Labels::draw(rng);
        let display = rng.uniform(0, 15) as u8;
        Self::new(display, labels)
    }

    pub fn display(&self) -> u8 {
        self.display
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn selected(&self) -> &SelectionMask {
        &self.selected
    }

    pub(crate) fn selected_mut(&mut self) -> &mut SelectionMask {
        &mut self.selected
    }

    /// Whether `label` sits on a button this stage left in state `on`
    pub fn label_with_state(&self, label: u8, on: bool) -> bool {
        (0..BUTTON_COUNT).any(|q| self.labels.get(q) == label && self.selected.get(q) == on)
    }
}

/// Snapshots of every stage reached since the last reset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    stages: Vec<StageSnapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshots(stages: Vec<StageSnapshot>) -> Self {
        Self { stages }
    }

    pub fn push(&mut self, snapshot: StageSnapshot) {
        self.stages.push(snapshot);
    }

    /// Drop everything and start again from `snapshot`
    pub fn reset_with(&mut self, snapshot: StageSnapshot) {
        self.stages.clear();
        self.stages.push(snapshot);
    }

    pub fn get(&self, stage: Stage) -> Option<&StageSnapshot> {
        self.stages.get(stage.index())
    }

    pub fn current(&self) -> Option<&StageSnapshot> {
        self.stages.last()
    }

    /// Only the newest snapshot is mutable; earlier stages are frozen
    pub fn current_mut(&mut self) -> Option<&mut StageSnapshot> {
        self.stages.last_mut()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn snapshots(&self) -> &[StageSnapshot] {
        &self.stages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedDraws, SimpleRng};

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::First.next(), Some(Stage::Second));
        assert_eq!(Stage::Fourth.next(), None);
        assert_eq!(Stage::Second.number(), 2);
        assert_eq!(Stage::try_from(3), Ok(Stage::Fourth));
        assert_eq!(Stage::try_from(4), Err(RuleError::StageOutOfRange { stage: 4 }));
    }

    #[test]
    fn test_draw_rejects_repeated_labels() {
        // 3, then 3 again (rejected), 4, 1, 1 (rejected), 2, then display 6
        let mut draws = ScriptedDraws::new([3, 3, 4, 1, 1, 2, 6]);
        let snapshot = StageSnapshot::draw(&mut draws);
        assert_eq!(snapshot.labels().as_array(), [3, 4, 1, 2]);
        assert_eq!(snapshot.display(), 6);
        assert_eq!(*snapshot.selected(), SelectionMask::EMPTY);
        assert_eq!(draws.remaining(), 0);
    }

    #[test]
    fn test_stuck_source_still_draws_permutation() {
        struct AlwaysLow;
        impl RandomSource for AlwaysLow {
            fn uniform(&mut self, lo: u32, _hi: u32) -> u32 {
                lo
            }
        }

        let snapshot = StageSnapshot::draw(&mut AlwaysLow);
        assert_eq!(snapshot.labels().as_array(), [1, 2, 3, 4]);
        assert_eq!(snapshot.display(), 0);
    }

    #[test]
    fn test_drawn_labels_are_permutations() {
        let mut rng = SimpleRng::with_seed(1234);
        for _ in 0..500 {
            let snapshot = StageSnapshot::draw(&mut rng);
            assert!(snapshot.labels().is_permutation());
            assert!(snapshot.display() < 16);
        }
    }

    #[test]
    fn test_mask_describe() {
        let labels = Labels::new([3, 4, 1, 2]);
        let mut mask = SelectionMask::EMPTY;
        assert_eq!(mask.describe(&labels), "(none)");
        assert!(mask.toggle(1));
        mask.set(3, true);
        assert_eq!(mask.describe(&labels), "\"42\"");
        assert_eq!(mask.count(), 2);
        assert_eq!(mask.to_string(), ".x.x");
    }

    #[test]
    fn test_label_with_state() {
        let snapshot = StageSnapshot::with_selection(0, [2, 1, 4, 3], [true, false, false, true]);
        assert!(snapshot.label_with_state(2, true));
        assert!(snapshot.label_with_state(3, true));
        assert!(snapshot.label_with_state(1, false));
        assert!(!snapshot.label_with_state(4, true));
    }
}
