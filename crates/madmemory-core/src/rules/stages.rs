//! One pure function per stage.
//!
//! Each takes a [`StageView`] over the snapshots up to and including its
//! own stage and returns the expected mask with the rule that fired.

use super::types::{FourthRule, Rule, SecondRule, ThirdRule};
use crate::catalog::{Catalog, Category};
use crate::snapshot::{SelectionMask, StageSnapshot, BUTTON_COUNT};

/// Read-only access to a history prefix, in the terms the rules use
pub(crate) struct StageView<'a> {
    stages: &'a [StageSnapshot],
    catalog: &'a Catalog,
}

impl<'a> StageView<'a> {
    pub(crate) fn new(stages: &'a [StageSnapshot], catalog: &'a Catalog) -> Self {
        Self { stages, catalog }
    }

    fn snapshot(&self, stage: usize) -> &StageSnapshot {
        &self.stages[stage]
    }

    fn display(&self, stage: usize) -> u8 {
        self.snapshot(stage).display()
    }

    fn category(&self, stage: usize) -> Category {
        self.catalog.entry(self.display(stage)).category()
    }

    fn value(&self, stage: usize) -> u8 {
        self.catalog.entry(self.display(stage)).value()
    }

    /// Position whose index equals the displayed value, zero-based
    fn value_position(&self, stage: usize) -> usize {
        self.display(stage) as usize % BUTTON_COUNT
    }

    fn label(&self, stage: usize, position: usize) -> u8 {
        self.snapshot(stage).labels().get(position)
    }

    fn selected(&self, stage: usize, position: usize) -> bool {
        self.snapshot(stage).selected().get(position)
    }

    fn text_len(&self, stage: usize) -> usize {
        self.catalog.text_len(self.display(stage))
    }

    /// Set the first position of `stage` carrying `label`
    fn mark_label(&self, mask: &mut SelectionMask, stage: usize, label: u8) {
        if let Some(p) = self.snapshot(stage).labels().position_of(label) {
            mask.set(p, true);
        }
    }

    /// Whether `label` was on a button left in state `on` during `earlier`
    fn label_was(&self, earlier: usize, label: u8, on: bool) -> bool {
        self.snapshot(earlier).label_with_state(label, on)
    }
}

pub(crate) fn first(view: &StageView<'_>) -> (SelectionMask, Rule) {
    let mut mask = SelectionMask::EMPTY;
    let category = view.category(0);
    let value = view.value(0);

    match category {
        Category::Digit => mask.set(2, true),
        Category::TwoDigit => mask.set(1, true),
        Category::Numeral => view.mark_label(&mut mask, 0, 2),
        Category::Word => view.mark_label(&mut mask, 0, 1),
    }

    match value {
        1 => mask.set(3, true),
        2 => view.mark_label(&mut mask, 0, 3),
        3 => view.mark_label(&mut mask, 0, 4),
        _ => mask.set(0, true),
    }

    (mask, Rule::First { category, value })
}

pub(crate) fn second(view: &StageView<'_>) -> (SelectionMask, Rule) {
    let mut mask = SelectionMask::EMPTY;

    let rule = if view.display(1) == view.display(0) {
        for p in 0..BUTTON_COUNT {
            mask.set(p, !view.selected(0, p));
        }
        SecondRule::SameDisplay
    } else if view.category(1) == view.category(0) {
        for p in 0..BUTTON_COUNT {
            mask.set(p, view.label_was(0, view.label(1, p), true));
        }
        SecondRule::SameCategory
    } else if view.value(1) == view.value(0) {
        let limit = view.text_len(0);
        for p in 0..BUTTON_COUNT {
            mask.set(p, view.label(1, p) as usize <= limit);
        }
        SecondRule::SameValue
    } else {
        view.mark_label(&mut mask, 1, 4);
        mask.set(view.value_position(1), true);
        SecondRule::Otherwise
    };

    (mask, Rule::Second(rule))
}

pub(crate) fn third(view: &StageView<'_>) -> (SelectionMask, Rule) {
    let mut mask = SelectionMask::EMPTY;
    let display = view.display(2);

    let rule = if display == view.display(0) || display == view.display(1) {
        for p in 0..BUTTON_COUNT {
            mask.set(p, view.label_was(1, view.label(2, p), false));
        }
        ThirdRule::RepeatedDisplay
    } else if view.category(2) == view.category(1) {
        for p in 0..BUTTON_COUNT {
            mask.set(p, view.label_was(0, view.label(2, p), false));
        }
        ThirdRule::SameCategory
    } else if view.value(2) == view.value(0) {
        let value = view.value(2);
        let previous_len = view.text_len(1);
        for p in 0..BUTTON_COUNT {
            let label = view.label(2, p);
            mask.set(p, label == value || label as usize == previous_len);
        }
        ThirdRule::SameValue
    } else {
        // Labels first, then positions; the second pass may re-add a
        // position whose label the first pass removed.
        for p in 0..BUTTON_COUNT {
            let label = view.label(2, p);
            let used = view.label_was(0, label, true) || view.label_was(1, label, true);
            mask.set(p, !used);
        }
        for p in 0..BUTTON_COUNT {
            if !view.selected(0, p) && !view.selected(1, p) {
                mask.set(p, true);
            }
        }
        ThirdRule::Otherwise
    };

    (mask, Rule::Third(rule))
}

pub(crate) fn fourth(view: &StageView<'_>) -> (SelectionMask, Rule) {
    let mut mask = SelectionMask::EMPTY;
    let earlier = 0..3;

    let (v0, v1, v2) = (view.value(0), view.value(1), view.value(2));
    if v0 != v1 && v0 != v2 && v1 != v2 {
        for stage in earlier {
            mask.set(view.value_position(stage), true);
        }
        return (mask, Rule::Fourth(FourthRule::DistinctValues));
    }

    let mut matched = [false; BUTTON_COUNT];
    for (p, hit) in matched.iter_mut().enumerate() {
        let label = view.label(3, p);
        *hit = earlier.clone().any(|stage| view.label_was(stage, label, true));
        mask.set(p, !*hit);
    }
    let matched_count = matched.iter().filter(|m| **m).count();

    let category = view.category(3);
    let value = view.value(3);

    let rule = if matched_count == BUTTON_COUNT - 1 {
        let unmatched = matched.iter().position(|m| !*m).unwrap_or_default();
        mask = SelectionMask::FULL;
        mask.set(view.label(3, unmatched) as usize - 1, false);
        FourthRule::SingleUnselectedLabel
    } else if earlier.clone().any(|stage| view.category(stage) == category) {
        mask = SelectionMask::EMPTY;
        for stage in earlier.filter(|&stage| view.category(stage) == category) {
            view.mark_label(&mut mask, 3, view.value(stage));
        }
        FourthRule::SharedCategory
    } else if earlier.clone().any(|stage| view.value(stage) == value) {
        mask = SelectionMask::EMPTY;
        mask.set(view.value_position(3), true);
        FourthRule::SharedValue
    } else {
        for p in 0..BUTTON_COUNT {
            let every_time = earlier.clone().all(|stage| view.selected(stage, p));
            mask.set(p, !every_time);
        }
        FourthRule::Otherwise
    };

    (mask, Rule::Fourth(rule))
}
