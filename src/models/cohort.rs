use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{CategoryLabel, GoalLabel};
use crate::error::RecommendationError;

/// One exemplar user aggregate in the reference cohort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortRow {
    pub category: CategoryLabel,
    #[serde(alias = "merged_goal")]
    pub goal: GoalLabel,
    pub avg_calories_consumed: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    /// Minutes per night
    pub avg_sleep_duration: f64,
    pub avg_workout_duration: f64,
    pub avg_workout_intensity: f64,
    pub days_since_joined: f64,
}

/// Which fallback tier produced a cohort selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CohortTier {
    CategoryAndGoal,
    CategoryOnly,
    Everyone,
}

/// Mean of each cohort column over a selection of rows
#[derive(Debug, Clone, PartialEq)]
pub struct CohortAverages {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub sleep_minutes: f64,
    pub workout_minutes: f64,
    pub workout_intensity: f64,
    pub days_since_joined: f64,
}

impl CohortAverages {
    /// Averages the selected rows, refusing empty or non-finite input
    pub fn over(rows: &[&CohortRow]) -> Result<Self, RecommendationError> {
        if rows.is_empty() {
            return Err(RecommendationError::AggregationFailure(
                "no cohort rows selected".to_string(),
            ));
        }

        let n = rows.len() as f64;
        let mean = |column: fn(&CohortRow) -> f64| rows.iter().map(|r| column(r)).sum::<f64>() / n;

        let averages = Self {
            calories: mean(|r| r.avg_calories_consumed),
            protein_g: mean(|r| r.protein_g),
            carbs_g: mean(|r| r.carbs_g),
            fat_g: mean(|r| r.fat_g),
            sleep_minutes: mean(|r| r.avg_sleep_duration),
            workout_minutes: mean(|r| r.avg_workout_duration),
            workout_intensity: mean(|r| r.avg_workout_intensity),
            days_since_joined: mean(|r| r.days_since_joined),
        };

        let all_finite = [
            averages.calories,
            averages.protein_g,
            averages.carbs_g,
            averages.fat_g,
            averages.sleep_minutes,
            averages.workout_minutes,
            averages.workout_intensity,
            averages.days_since_joined,
        ]
        .iter()
        .all(|v| v.is_finite());

        if !all_finite {
            return Err(RecommendationError::AggregationFailure(
                "cohort contains non-finite values".to_string(),
            ));
        }

        Ok(averages)
    }
}

/// Fixed exemplar table used to blend recommendations.
///
/// Immutable once built and never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCohort {
    rows: Vec<CohortRow>,
}

impl ReferenceCohort {
    pub fn new(rows: Vec<CohortRow>) -> Result<Self, RecommendationError> {
        if rows.is_empty() {
            return Err(RecommendationError::AggregationFailure(
                "reference cohort must contain at least one row".to_string(),
            ));
        }
        Ok(Self { rows })
    }

    /// Seed cohort shipped with the service
    pub fn seed() -> Self {
        Self {
            rows: vec![
                CohortRow {
                    category: CategoryLabel::Beginner,
                    goal: GoalLabel::WeightLoss,
                    avg_calories_consumed: 2200.0,
                    protein_g: 100.0,
                    carbs_g: 250.0,
                    fat_g: 70.0,
                    avg_sleep_duration: 420.0,
                    avg_workout_duration: 40.0,
                    avg_workout_intensity: 2.0,
                    days_since_joined: 120.0,
                },
                CohortRow {
                    category: CategoryLabel::Pro,
                    goal: GoalLabel::MuscleGain,
                    avg_calories_consumed: 2800.0,
                    protein_g: 150.0,
                    carbs_g: 350.0,
                    fat_g: 80.0,
                    avg_sleep_duration: 460.0,
                    avg_workout_duration: 60.0,
                    avg_workout_intensity: 3.0,
                    days_since_joined: 400.0,
                },
                CohortRow {
                    category: CategoryLabel::Activate,
                    goal: GoalLabel::Maintenance,
                    avg_calories_consumed: 2500.0,
                    protein_g: 120.0,
                    carbs_g: 300.0,
                    fat_g: 75.0,
                    avg_sleep_duration: 440.0,
                    avg_workout_duration: 50.0,
                    avg_workout_intensity: 2.5,
                    days_since_joined: 250.0,
                },
            ],
        }
    }

    /// Reads a JSON array of rows from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecommendationError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RecommendationError::Artifact(format!("{}: {}", path.display(), e))
        })?;
        let rows: Vec<CohortRow> = serde_json::from_str(&raw).map_err(|e| {
            RecommendationError::Artifact(format!("{}: {}", path.display(), e))
        })?;
        Self::new(rows)
    }

    pub fn rows(&self) -> &[CohortRow] {
        &self.rows
    }

    /// Picks the first non-empty tier: exact match, same category, everyone
    pub fn select(&self, category: CategoryLabel, goal: GoalLabel) -> (CohortTier, Vec<&CohortRow>) {
        let exact: Vec<&CohortRow> = self
            .rows
            .iter()
            .filter(|r| r.category == category && r.goal == goal)
            .collect();
        if !exact.is_empty() {
            return (CohortTier::CategoryAndGoal, exact);
        }

        let same_category: Vec<&CohortRow> =
            self.rows.iter().filter(|r| r.category == category).collect();
        if !same_category.is_empty() {
            return (CohortTier::CategoryOnly, same_category);
        }

        (CohortTier::Everyone, self.rows.iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: CategoryLabel, goal: GoalLabel, protein_g: f64) -> CohortRow {
        CohortRow {
            category,
            goal,
            avg_calories_consumed: 2000.0,
            protein_g,
            carbs_g: 200.0,
            fat_g: 60.0,
            avg_sleep_duration: 420.0,
            avg_workout_duration: 30.0,
            avg_workout_intensity: 2.0,
            days_since_joined: 10.0,
        }
    }

    #[test]
    fn test_empty_cohort_rejected() {
        let err = ReferenceCohort::new(vec![]).unwrap_err();
        assert!(matches!(err, RecommendationError::AggregationFailure(_)));
    }

    #[test]
    fn test_select_exact_match() {
        let cohort = ReferenceCohort::seed();
        let (tier, rows) = cohort.select(CategoryLabel::Activate, GoalLabel::Maintenance);
        assert_eq!(tier, CohortTier::CategoryAndGoal);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].avg_calories_consumed, 2500.0);
    }

    #[test]
    fn test_select_falls_back_to_category() {
        let cohort = ReferenceCohort::seed();
        let (tier, rows) = cohort.select(CategoryLabel::Pro, GoalLabel::WeightLoss);
        assert_eq!(tier, CohortTier::CategoryOnly);
        assert!(rows.iter().all(|r| r.category == CategoryLabel::Pro));
    }

    #[test]
    fn test_select_falls_back_to_everyone() {
        let cohort = ReferenceCohort::seed();
        let (tier, rows) = cohort.select(CategoryLabel::Unknown, GoalLabel::WeightLoss);
        assert_eq!(tier, CohortTier::Everyone);
        assert_eq!(rows.len(), cohort.rows().len());
    }

    #[test]
    fn test_averages_over_rows() {
        let a = row(CategoryLabel::Pro, GoalLabel::MuscleGain, 109.8);
        let b = row(CategoryLabel::Pro, GoalLabel::MuscleGain, 110.0);
        let averages = CohortAverages::over(&[&a, &b]).unwrap();
        assert!((averages.protein_g - 109.9).abs() < 1e-9);
        assert_eq!(averages.calories, 2000.0);
    }

    #[test]
    fn test_averages_reject_empty_selection() {
        assert!(matches!(
            CohortAverages::over(&[]),
            Err(RecommendationError::AggregationFailure(_))
        ));
    }

    #[test]
    fn test_averages_reject_non_finite() {
        let bad = row(CategoryLabel::Pro, GoalLabel::MuscleGain, f64::NAN);
        assert!(CohortAverages::over(&[&bad]).is_err());
    }

    #[test]
    fn test_rows_accept_merged_goal_alias() {
        let rows: Vec<CohortRow> = serde_json::from_str(
            r#"[{"category":"Beginner","merged_goal":"weight_loss",
                "avg_calories_consumed":2200,"protein_g":100,"carbs_g":250,"fat_g":70,
                "avg_sleep_duration":420,"avg_workout_duration":40,
                "avg_workout_intensity":2,"days_since_joined":120}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].goal, GoalLabel::WeightLoss);
        assert_eq!(ReferenceCohort::new(rows).unwrap().rows()[0], ReferenceCohort::seed().rows()[0]);
    }
}
