use crate::catalog::Category;
use crate::snapshot::{SelectionMask, Stage};
use serde::{Deserialize, Serialize};

/// Branch chosen in the second stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecondRule {
    /// Same display as stage 1
    SameDisplay,
    /// Same category as stage 1
    SameCategory,
    /// Same value as stage 1
    SameValue,
    Otherwise,
}

/// Branch chosen in the third stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThirdRule {
    /// Same display as stage 1 or stage 2
    RepeatedDisplay,
    /// Same category as stage 2
    SameCategory,
    /// Same value as stage 1
    SameValue,
    Otherwise,
}

/// Branch chosen in the fourth stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FourthRule {
    /// Stages 1-3 showed three different values
    DistinctValues,
    /// Exactly one button's label was never selected before
    SingleUnselectedLabel,
    /// Category matches at least one earlier stage
    SharedCategory,
    /// Value matches at least one earlier stage
    SharedValue,
    Otherwise,
}

/// The rule that produced an expected selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// Stage 1 combines a rule for the category with a rule for the value
    First { category: Category, value: u8 },
    Second(SecondRule),
    Third(ThirdRule),
    Fourth(FourthRule),
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::First { category, value } => {
                let by_category = match category {
                    Category::Digit => "3rd position",
                    Category::TwoDigit => "2nd position",
                    Category::Numeral => "label \"2\"",
                    Category::Word => "label \"1\"",
                };
                let by_value = match value {
                    1 => "4th position",
                    2 => "label \"3\"",
                    3 => "label \"4\"",
                    _ => "1st position",
                };
                write!(
                    f,
                    "Label is a {category}. Rule 1: {by_category}. Label's value is {value}. Rule 2: {by_value}."
                )
            }
            Rule::Second(rule) => match rule {
                SecondRule::SameDisplay => write!(
                    f,
                    "Label is the same as in stage 1. Rule: all positions left unselected in stage 1."
                ),
                SecondRule::SameCategory => write!(
                    f,
                    "Label is the same type as in stage 1. Rule: all labels selected in stage 1."
                ),
                SecondRule::SameValue => write!(
                    f,
                    "Label has the same value as in stage 1. Rule: all labels less than or equal to the number of characters on the display in stage 1."
                ),
                SecondRule::Otherwise => write!(
                    f,
                    "None of the conditions apply. Rule: label \"4\" and the position equal to the displayed value."
                ),
            },
            Rule::Third(rule) => match rule {
                ThirdRule::RepeatedDisplay => write!(
                    f,
                    "Label is the same as in stage 1 or 2. Rule: all labels left unselected in stage 2."
                ),
                ThirdRule::SameCategory => write!(
                    f,
                    "Label is the same type as in stage 2. Rule: all labels left unselected in stage 1."
                ),
                ThirdRule::SameValue => write!(
                    f,
                    "Label has the same value as in stage 1. Rule: the label equal to the displayed value and the label equal to the number of characters on the display in stage 2."
                ),
                ThirdRule::Otherwise => write!(
                    f,
                    "None of the conditions apply. Rule: all previously unselected labels and all previously unselected positions."
                ),
            },
            Rule::Fourth(rule) => match rule {
                FourthRule::DistinctValues => write!(
                    f,
                    "Stages 1-3 all had different values. Rule: positions equal to those values."
                ),
                FourthRule::SingleUnselectedLabel => write!(
                    f,
                    "Exactly 1 unselected label. Rule: every position except the one equal to that label."
                ),
                FourthRule::SharedCategory => write!(
                    f,
                    "Label is the same type as in a previous stage. Rule: labels equal to the values displayed on every such stage."
                ),
                FourthRule::SharedValue => write!(
                    f,
                    "Label has the same value as in a previous stage. Rule: the position equal to the displayed value."
                ),
                FourthRule::Otherwise => write!(
                    f,
                    "None of the conditions apply. Rule: every position selected less than 3 times in total."
                ),
            },
        }
    }
}

/// Result of evaluating one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub stage: Stage,
    pub mask: SelectionMask,
    pub rule: Rule,
}
