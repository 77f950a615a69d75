//! Maps a stage's history to the buttons the player must select.

mod stages;
mod types;

pub use types::{Evaluation, FourthRule, Rule, SecondRule, ThirdRule};

use crate::catalog::Catalog;
use crate::error::RuleError;
use crate::snapshot::{History, SelectionMask, Stage};
use stages::StageView;

/// Evaluates the stage rules against a display catalog.
///
/// The engine only ever reads snapshots up to and including the stage
/// being evaluated, so later stages in the history never affect earlier
/// answers.
#[derive(Debug, Clone, Copy)]
pub struct RuleEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> RuleEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Expected mask for `stage`, together with the rule that produced it
    pub fn evaluate(&self, history: &History, stage: Stage) -> Result<Evaluation, RuleError> {
        let snapshots = history.snapshots();
        if snapshots.len() <= stage.index() {
            return Err(RuleError::HistoryTooShort {
                stage: stage.index(),
                len: snapshots.len(),
            });
        }

        let reached = &snapshots[..=stage.index()];
        if let Some((i, bad)) = reached
            .iter()
            .enumerate()
            .find(|(_, s)| !s.labels().is_permutation())
        {
            return Err(RuleError::MalformedLabels {
                stage: i,
                labels: bad.labels().as_array(),
            });
        }

        let view = StageView::new(reached, self.catalog);
        let (mask, rule) = match stage {
            Stage::First => stages::first(&view),
            Stage::Second => stages::second(&view),
            Stage::Third => stages::third(&view),
            Stage::Fourth => stages::fourth(&view),
        };

        Ok(Evaluation { stage, mask, rule })
    }

    /// Expected mask for `stage`
    pub fn expected(&self, history: &History, stage: Stage) -> Result<SelectionMask, RuleError> {
        self.evaluate(history, stage).map(|e| e.mask)
    }

    /// Like [`RuleEngine::expected`] but for a raw zero-based stage number
    pub fn expected_at(&self, history: &History, stage: usize) -> Result<SelectionMask, RuleError> {
        self.expected(history, Stage::try_from(stage)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::snapshot::StageSnapshot;
    use pretty_assertions::assert_eq;

    const NONE: [bool; 4] = [false; 4];

    fn snap(display: u8, labels: [u8; 4], selected: [bool; 4]) -> StageSnapshot {
        StageSnapshot::with_selection(display, labels, selected)
    }

    fn eval(stages: Vec<StageSnapshot>) -> Evaluation {
        let catalog = Catalog::default();
        let stage = Stage::try_from(stages.len() - 1).unwrap();
        RuleEngine::new(&catalog)
            .evaluate(&History::from_snapshots(stages), stage)
            .unwrap()
    }

    fn mask(bits: [bool; 4]) -> SelectionMask {
        SelectionMask::new(bits)
    }

    // Stage 1

    #[test]
    fn test_first_two_digit_value_three() {
        // Both rules land on position 1
        let result = eval(vec![snap(6, [3, 4, 1, 2], NONE)]);
        assert_eq!(result.mask, mask([false, true, false, false]));
        assert_eq!(
            result.rule,
            Rule::First {
                category: Category::TwoDigit,
                value: 3
            }
        );
    }

    #[test]
    fn test_first_digit_value_one() {
        let result = eval(vec![snap(0, [1, 2, 3, 4], NONE)]);
        assert_eq!(result.mask, mask([false, false, true, true]));
    }

    #[test]
    fn test_first_numeral_uses_labels() {
        // label 2 at position 0, value 2 looks for label 3 at position 3
        let result = eval(vec![snap(9, [2, 1, 4, 3], NONE)]);
        assert_eq!(result.mask, mask([true, false, false, true]));
    }

    #[test]
    fn test_first_word_value_four() {
        let result = eval(vec![snap(15, [4, 3, 2, 1], NONE)]);
        assert_eq!(result.mask, mask([true, false, false, true]));
    }

    // Stage 2

    #[test]
    fn test_second_same_display_inverts_selection() {
        let result = eval(vec![
            snap(5, [1, 2, 3, 4], [true, false, true, false]),
            snap(5, [4, 3, 2, 1], NONE),
        ]);
        assert_eq!(result.mask, mask([false, true, false, true]));
        assert_eq!(result.rule, Rule::Second(SecondRule::SameDisplay));
    }

    #[test]
    fn test_second_same_display_outranks_category_and_value() {
        // An identical display also shares category and value; each rule
        // would give a different mask here
        let result = eval(vec![
            snap(5, [1, 2, 3, 4], [true, false, true, false]),
            snap(5, [1, 2, 3, 4], NONE),
        ]);
        assert_eq!(result.mask, mask([false, true, false, true]));
        assert_eq!(result.rule, Rule::Second(SecondRule::SameDisplay));
    }

    #[test]
    fn test_second_same_category_matches_labels_not_positions() {
        // Labels 1 and 4 were selected; they now sit at positions 3 and 0
        let result = eval(vec![
            snap(4, [1, 2, 3, 4], [true, false, false, true]),
            snap(7, [4, 3, 2, 1], NONE),
        ]);
        assert_eq!(result.mask, mask([true, false, false, true]));
        assert_eq!(result.rule, Rule::Second(SecondRule::SameCategory));
    }

    #[test]
    fn test_second_same_value_compares_text_length() {
        // "TWO" has 3 characters
        let result = eval(vec![
            snap(13, [1, 2, 3, 4], NONE),
            snap(9, [3, 1, 4, 2], NONE),
        ]);
        assert_eq!(result.mask, mask([true, true, false, true]));
        assert_eq!(result.rule, Rule::Second(SecondRule::SameValue));
    }

    #[test]
    fn test_second_otherwise() {
        // Label 4 at position 1, display 6 points at position 2
        let result = eval(vec![
            snap(0, [1, 2, 3, 4], NONE),
            snap(6, [2, 4, 1, 3], NONE),
        ]);
        assert_eq!(result.mask, mask([false, true, true, false]));
        assert_eq!(result.rule, Rule::Second(SecondRule::Otherwise));
    }

    // Stage 3

    #[test]
    fn test_third_repeated_display() {
        // Labels 3 and 4 were left unselected in stage 2
        let result = eval(vec![
            snap(3, [1, 2, 3, 4], NONE),
            snap(8, [1, 2, 3, 4], [true, true, false, false]),
            snap(8, [4, 1, 3, 2], NONE),
        ]);
        assert_eq!(result.mask, mask([true, false, true, false]));
        assert_eq!(result.rule, Rule::Third(ThirdRule::RepeatedDisplay));
    }

    #[test]
    fn test_third_same_category_as_second() {
        // Labels 1 and 3 were left unselected in stage 1
        let result = eval(vec![
            snap(0, [1, 2, 3, 4], [false, true, false, true]),
            snap(13, [1, 2, 3, 4], NONE),
            snap(14, [3, 4, 2, 1], NONE),
        ]);
        assert_eq!(result.mask, mask([true, false, false, true]));
        assert_eq!(result.rule, Rule::Third(ThirdRule::SameCategory));
    }

    #[test]
    fn test_third_same_category_outranks_same_value() {
        // "THREE" is a word like "ONE" and has stage 1's value 3
        let result = eval(vec![
            snap(2, [1, 2, 3, 4], [true, false, false, false]),
            snap(12, [1, 2, 3, 4], NONE),
            snap(14, [4, 1, 2, 3], NONE),
        ]);
        assert_eq!(result.mask, mask([true, false, true, true]));
        assert_eq!(result.rule, Rule::Third(ThirdRule::SameCategory));
    }

    #[test]
    fn test_third_same_value_as_first() {
        // Own value 3, and "II" has 2 characters
        let result = eval(vec![
            snap(2, [1, 2, 3, 4], NONE),
            snap(9, [1, 2, 3, 4], NONE),
            snap(6, [2, 3, 1, 4], NONE),
        ]);
        assert_eq!(result.mask, mask([true, true, false, false]));
        assert_eq!(result.rule, Rule::Third(ThirdRule::SameValue));
    }

    #[test]
    fn test_third_otherwise_readds_unselected_positions() {
        // Labels 1 and 4 were selected before, so positions 0 and 3 drop
        // out; position 3 was never selected and comes back.
        let result = eval(vec![
            snap(0, [1, 2, 3, 4], [true, false, false, false]),
            snap(5, [2, 1, 4, 3], [false, false, true, false]),
            snap(10, [4, 3, 2, 1], NONE),
        ]);
        assert_eq!(result.mask, mask([false, true, true, true]));
        assert_eq!(result.rule, Rule::Third(ThirdRule::Otherwise));
    }

    // Stage 4

    #[test]
    fn test_fourth_distinct_values() {
        let result = eval(vec![
            snap(2, [1, 2, 3, 4], NONE),
            snap(9, [1, 2, 3, 4], NONE),
            snap(12, [1, 2, 3, 4], NONE),
            snap(7, [4, 3, 2, 1], [true, true, true, true]),
        ]);
        assert_eq!(result.mask, mask([true, true, true, false]));
        assert_eq!(result.rule, Rule::Fourth(FourthRule::DistinctValues));
    }

    #[test]
    fn test_fourth_single_unselected_label() {
        // Labels 1, 2, 3 were selected once each; label 4 sits at
        // position 0, so position 3 is cleared.
        let result = eval(vec![
            snap(0, [1, 2, 3, 4], [true, false, false, false]),
            snap(4, [1, 2, 3, 4], [false, true, false, false]),
            snap(9, [1, 2, 3, 4], [false, false, true, false]),
            snap(15, [4, 2, 1, 3], NONE),
        ]);
        assert_eq!(result.mask, mask([true, true, true, false]));
        assert_eq!(result.rule, Rule::Fourth(FourthRule::SingleUnselectedLabel));
    }

    #[test]
    fn test_fourth_single_unselected_label_outranks_shared_category() {
        // Stage 4 is a digit like stage 1, but labels 1, 2, 3 were each
        // selected once and label 4 sits at position 0
        let result = eval(vec![
            snap(0, [1, 2, 3, 4], [true, false, false, false]),
            snap(4, [1, 2, 3, 4], [false, true, false, false]),
            snap(9, [1, 2, 3, 4], [false, false, true, false]),
            snap(1, [4, 2, 1, 3], NONE),
        ]);
        assert_eq!(result.mask, mask([true, true, true, false]));
        assert_eq!(result.rule, Rule::Fourth(FourthRule::SingleUnselectedLabel));
    }

    #[test]
    fn test_fourth_shared_category_outranks_shared_value() {
        // Digit like stage 1 (value 1), and value 2 like stage 3
        let result = eval(vec![
            snap(0, [1, 2, 3, 4], NONE),
            snap(4, [1, 2, 3, 4], NONE),
            snap(9, [1, 2, 3, 4], NONE),
            snap(1, [3, 4, 1, 2], NONE),
        ]);
        assert_eq!(result.mask, mask([false, false, true, false]));
        assert_eq!(result.rule, Rule::Fourth(FourthRule::SharedCategory));
    }

    #[test]
    fn test_fourth_shared_category_single_stage() {
        // Numeral like stage 3, whose value 2 sits at position 1
        let result = eval(vec![
            snap(0, [1, 2, 3, 4], NONE),
            snap(4, [1, 2, 3, 4], NONE),
            snap(9, [1, 2, 3, 4], NONE),
            snap(10, [4, 2, 1, 3], NONE),
        ]);
        assert_eq!(result.mask, mask([false, true, false, false]));
        assert_eq!(result.rule, Rule::Fourth(FourthRule::SharedCategory));
    }

    #[test]
    fn test_fourth_shared_category_several_stages() {
        // Digit like stages 1 and 2 (values 1 and 2)
        let result = eval(vec![
            snap(0, [1, 2, 3, 4], NONE),
            snap(1, [1, 2, 3, 4], NONE),
            snap(12, [1, 2, 3, 4], NONE),
            snap(3, [4, 2, 1, 3], NONE),
        ]);
        assert_eq!(result.mask, mask([false, true, true, false]));
    }

    #[test]
    fn test_fourth_shared_value() {
        let result = eval(vec![
            snap(0, [1, 2, 3, 4], NONE),
            snap(4, [1, 2, 3, 4], NONE),
            snap(9, [1, 2, 3, 4], NONE),
            snap(13, [3, 4, 1, 2], NONE),
        ]);
        assert_eq!(result.mask, mask([false, true, false, false]));
        assert_eq!(result.rule, Rule::Fourth(FourthRule::SharedValue));
    }

    #[test]
    fn test_fourth_otherwise_counts_positions() {
        // Only position 0 was selected in all three stages
        let result = eval(vec![
            snap(0, [1, 2, 3, 4], [true, true, false, false]),
            snap(4, [1, 2, 3, 4], [true, false, false, false]),
            snap(8, [1, 2, 3, 4], [true, false, false, false]),
            snap(14, [1, 2, 3, 4], NONE),
        ]);
        assert_eq!(result.mask, mask([false, true, true, true]));
        assert_eq!(result.rule, Rule::Fourth(FourthRule::Otherwise));
    }

    // Engine contract

    #[test]
    fn test_ignores_later_stages() {
        let catalog = Catalog::default();
        let engine = RuleEngine::new(&catalog);
        let short = History::from_snapshots(vec![snap(6, [3, 4, 1, 2], NONE)]);
        let long = History::from_snapshots(vec![
            snap(6, [3, 4, 1, 2], NONE),
            snap(11, [1, 2, 3, 4], [true, true, true, true]),
        ]);
        assert_eq!(
            engine.expected(&short, Stage::First),
            engine.expected(&long, Stage::First)
        );
    }

    #[test]
    fn test_deterministic() {
        let catalog = Catalog::default();
        let engine = RuleEngine::new(&catalog);
        let history = History::from_snapshots(vec![
            snap(0, [1, 2, 3, 4], [true, false, false, false]),
            snap(5, [2, 1, 4, 3], [false, false, true, false]),
            snap(10, [4, 3, 2, 1], NONE),
        ]);
        let first = engine.evaluate(&history, Stage::Third).unwrap();
        for _ in 0..10 {
            assert_eq!(engine.evaluate(&history, Stage::Third).unwrap(), first);
        }
    }

    #[test]
    fn test_rejects_bad_requests() {
        let catalog = Catalog::default();
        let engine = RuleEngine::new(&catalog);
        let history = History::from_snapshots(vec![snap(0, [1, 2, 3, 4], NONE)]);

        assert_eq!(
            engine.expected_at(&history, 4),
            Err(RuleError::StageOutOfRange { stage: 4 })
        );
        assert_eq!(
            engine.expected(&history, Stage::Third),
            Err(RuleError::HistoryTooShort { stage: 2, len: 1 })
        );
        assert!(engine.expected_at(&history, 0).is_ok());
    }

    #[test]
    fn test_rejects_malformed_labels() {
        let catalog = Catalog::default();
        let engine = RuleEngine::new(&catalog);
        let history = History::from_snapshots(vec![
            snap(0, [1, 2, 3, 4], [true, false, false, false]),
            snap(4, [1, 2, 3, 4], [false, true, false, false]),
            snap(9, [1, 2, 3, 4], [false, false, true, false]),
            snap(15, [5, 2, 1, 3], NONE),
        ]);

        assert_eq!(
            engine.expected(&history, Stage::Fourth),
            Err(RuleError::MalformedLabels {
                stage: 3,
                labels: [5, 2, 1, 3]
            })
        );
        // Earlier stages never look at the bad snapshot
        assert!(engine.expected(&history, Stage::Third).is_ok());

        let zero = History::from_snapshots(vec![snap(0, [0, 2, 3, 4], NONE)]);
        assert_eq!(
            engine.expected(&zero, Stage::First),
            Err(RuleError::MalformedLabels {
                stage: 0,
                labels: [0, 2, 3, 4]
            })
        );

        let repeated = History::from_snapshots(vec![snap(0, [1, 1, 3, 4], NONE)]);
        assert!(matches!(
            engine.expected(&repeated, Stage::First),
            Err(RuleError::MalformedLabels { stage: 0, .. })
        ));
    }

    #[test]
    fn test_rule_narration() {
        let text = Rule::Second(SecondRule::SameDisplay).to_string();
        assert!(text.contains("left unselected in stage 1"));

        let text = Rule::First {
            category: Category::Numeral,
            value: 4,
        }
        .to_string();
        assert!(text.contains("numeral"));
        assert!(text.contains("1st position"));
    }
}
