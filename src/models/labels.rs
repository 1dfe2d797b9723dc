use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Fitness tier predicted by the category classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryLabel {
    Beginner,
    Activate,
    Pro,
    Unknown,
}

impl CategoryLabel {
    /// Maps a classifier ordinal to its tier; anything outside 0..=2 is `Unknown`
    pub fn from_ordinal(ordinal: i64) -> Self {
        match ordinal {
            0 => CategoryLabel::Beginner,
            1 => CategoryLabel::Activate,
            2 => CategoryLabel::Pro,
            _ => CategoryLabel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryLabel::Beginner => "Beginner",
            CategoryLabel::Activate => "Activate",
            CategoryLabel::Pro => "Pro",
            CategoryLabel::Unknown => "Unknown",
        }
    }
}

impl Display for CategoryLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fitness goal predicted by the goal classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalLabel {
    WeightLoss,
    MuscleGain,
    Maintenance,
}

impl GoalLabel {
    /// Vocabulary the goal encoder is fit on
    pub const VOCABULARY: [GoalLabel; 3] = [
        GoalLabel::WeightLoss,
        GoalLabel::MuscleGain,
        GoalLabel::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalLabel::WeightLoss => "weight_loss",
            GoalLabel::MuscleGain => "muscle_gain",
            GoalLabel::Maintenance => "maintenance",
        }
    }
}

impl Display for GoalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weight_loss" => Ok(GoalLabel::WeightLoss),
            "muscle_gain" => Ok(GoalLabel::MuscleGain),
            "maintenance" => Ok(GoalLabel::Maintenance),
            other => Err(format!("unknown goal label: {}", other)),
        }
    }
}

/// Maps string labels to ordinals and back.
///
/// Fitting sorts and deduplicates the labels, so ordinals follow lexical
/// order rather than the order labels were supplied in. The goal classifier
/// was trained against encodings produced this way.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = labels.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Encoder for the goal classifier's output
    pub fn for_goals() -> Self {
        Self::fit(GoalLabel::VOCABULARY.iter().map(GoalLabel::as_str))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn inverse_transform(&self, ordinal: i64) -> Option<&str> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|idx| self.classes.get(idx))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ordinals() {
        assert_eq!(CategoryLabel::from_ordinal(0), CategoryLabel::Beginner);
        assert_eq!(CategoryLabel::from_ordinal(1), CategoryLabel::Activate);
        assert_eq!(CategoryLabel::from_ordinal(2), CategoryLabel::Pro);
        assert_eq!(CategoryLabel::from_ordinal(3), CategoryLabel::Unknown);
        assert_eq!(CategoryLabel::from_ordinal(-1), CategoryLabel::Unknown);
    }

    #[test]
    fn test_label_serde() {
        assert_eq!(
            serde_json::to_string(&CategoryLabel::Activate).unwrap(),
            r#""Activate""#
        );
        assert_eq!(
            serde_json::to_string(&GoalLabel::MuscleGain).unwrap(),
            r#""muscle_gain""#
        );
        let goal: GoalLabel = serde_json::from_str(r#""weight_loss""#).unwrap();
        assert_eq!(goal, GoalLabel::WeightLoss);
    }

    #[test]
    fn test_goal_encoder_sorts_vocabulary() {
        let encoder = LabelEncoder::for_goals();
        assert_eq!(
            encoder.classes(),
            ["maintenance", "muscle_gain", "weight_loss"]
        );
        assert_eq!(encoder.inverse_transform(0), Some("maintenance"));
        assert_eq!(encoder.inverse_transform(1), Some("muscle_gain"));
        assert_eq!(encoder.inverse_transform(2), Some("weight_loss"));
    }

    #[test]
    fn test_inverse_transform_out_of_vocabulary() {
        let encoder = LabelEncoder::for_goals();
        assert_eq!(encoder.inverse_transform(3), None);
        assert_eq!(encoder.inverse_transform(-1), None);
    }

    #[test]
    fn test_fit_deduplicates() {
        let encoder = LabelEncoder::fit(["b", "a", "b"]);
        assert_eq!(encoder.classes(), ["a", "b"]);
    }

    #[test]
    fn test_every_encoded_goal_parses() {
        let encoder = LabelEncoder::for_goals();
        for class in encoder.classes() {
            assert!(class.parse::<GoalLabel>().is_ok());
        }
    }
}
