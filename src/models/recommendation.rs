use serde::{Serialize, Serializer};

use super::{CategoryLabel, CohortAverages, GoalLabel};
use crate::error::RecommendationError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionPlan {
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutPlan {
    /// Minutes per session
    pub duration: i64,
    /// 0-4 scale, one decimal
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepPlan {
    pub hours: f64,
}

/// Blended plan for one user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub category: CategoryLabel,
    pub goal: GoalLabel,
    /// Human-readable summary
    pub recommendation: String,
    pub nutrition: NutritionPlan,
    pub workout: WorkoutPlan,
    pub sleep: SleepPlan,
}

/// Rounds to one decimal, ties away from zero
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl Recommendation {
    /// Builds the response from cohort means.
    ///
    /// Nutrition and workout duration are truncated toward zero; intensity and
    /// sleep hours are rounded to one decimal.
    pub fn from_averages(category: CategoryLabel, goal: GoalLabel, averages: &CohortAverages) -> Self {
        let nutrition = NutritionPlan {
            calories: averages.calories.trunc() as i64,
            protein: averages.protein_g.trunc() as i64,
            carbs: averages.carbs_g.trunc() as i64,
            fat: averages.fat_g.trunc() as i64,
        };
        let workout = WorkoutPlan {
            duration: averages.workout_minutes.trunc() as i64,
            intensity: round_one_decimal(averages.workout_intensity),
        };
        let sleep = SleepPlan {
            hours: round_one_decimal(averages.sleep_minutes / 60.0),
        };

        let recommendation = format!(
            "Category: {category}\n\
             Goal: {goal}\n\
             Experience: {experience:.0} days since joining\n\
             \n\
             🥗 Nutrition:\n  \
             - Calories: {calories:.0}\n  \
             - Protein: {protein:.0} g\n  \
             - Carbs: {carbs:.0} g\n  \
             - Fat: {fat:.0} g\n\
             \n\
             🏋️ Workout:\n  \
             - Duration: {duration:.0} min\n  \
             - Intensity: {intensity:.1}/4 scale\n\
             \n\
             😴 Sleep:\n  \
             - Target duration: {hours:.1} hours",
            experience = averages.days_since_joined.round(),
            calories = averages.calories,
            protein = averages.protein_g,
            carbs = averages.carbs_g,
            fat = averages.fat_g,
            duration = averages.workout_minutes,
            intensity = workout.intensity,
            hours = sleep.hours,
        );

        Self {
            category,
            goal,
            recommendation,
            nutrition,
            workout,
            sleep,
        }
    }
}

/// Outcome of a full resolution. Failures are reported, never raised.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(Recommendation),
    Failed(RecommendationError),
}

impl Resolution {
    pub fn is_success(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum ResolutionBody<'a> {
    Resolved {
        success: bool,
        #[serde(flatten)]
        recommendation: &'a Recommendation,
    },
    Failed {
        success: bool,
        error: String,
    },
}

impl Serialize for Resolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = match self {
            Resolution::Resolved(recommendation) => ResolutionBody::Resolved {
                success: true,
                recommendation,
            },
            Resolution::Failed(err) => ResolutionBody::Failed {
                success: false,
                error: err.to_string(),
            },
        };
        body.serialize(serializer)
    }
}

/// Output of the standalone category prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPrediction {
    pub category: CategoryLabel,
    pub category_num: i64,
}

/// Output of the standalone goal prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalPrediction {
    pub goal: GoalLabel,
    pub goal_num: i64,
}
