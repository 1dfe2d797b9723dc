use serde::Deserialize;
use std::fmt;

/// Number of features each classifier consumes
pub const FEATURE_COUNT: usize = 9;

/// A numeric column a classifier can consume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Age,
    Bmi,
    FitnessLevelNum,
    AvgSleepDuration,
    AvgCaloriesConsumed,
    AvgCaloriesBurned,
    AvgSteps,
    AvgWorkoutDuration,
    AvgWorkoutIntensity,
    AvgHeartRate,
    ProteinG,
    CarbsG,
    FatG,
    DaysSinceJoined,
}

impl Feature {
    /// Wire name of the column, matching the request body key
    pub fn name(self) -> &'static str {
        match self {
            Feature::Age => "age",
            Feature::Bmi => "bmi",
            Feature::FitnessLevelNum => "fitness_level_num",
            Feature::AvgSleepDuration => "avg_sleep_duration",
            Feature::AvgCaloriesConsumed => "avg_calories_consumed",
            Feature::AvgCaloriesBurned => "avg_calories_burned",
            Feature::AvgSteps => "avg_steps",
            Feature::AvgWorkoutDuration => "avg_workout_duration",
            Feature::AvgWorkoutIntensity => "avg_workout_intensity",
            Feature::AvgHeartRate => "avg_heart_rate",
            Feature::ProteinG => "protein_g",
            Feature::CarbsG => "carbs_g",
            Feature::FatG => "fat_g",
            Feature::DaysSinceJoined => "days_since_joined",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Feature order expected by the category classifier
pub const CATEGORY_FEATURES: [Feature; FEATURE_COUNT] = [
    Feature::Age,
    Feature::Bmi,
    Feature::FitnessLevelNum,
    Feature::AvgSleepDuration,
    Feature::AvgCaloriesConsumed,
    Feature::AvgSteps,
    Feature::AvgWorkoutDuration,
    Feature::AvgHeartRate,
    Feature::DaysSinceJoined,
];

/// Feature order expected by the goal classifier
pub const GOAL_FEATURES: [Feature; FEATURE_COUNT] = [
    Feature::AvgCaloriesConsumed,
    Feature::AvgCaloriesBurned,
    Feature::ProteinG,
    Feature::CarbsG,
    Feature::FatG,
    Feature::AvgWorkoutDuration,
    Feature::AvgWorkoutIntensity,
    Feature::AvgSleepDuration,
    Feature::DaysSinceJoined,
];

/// Join date assumed when the caller does not send one
pub const DEFAULT_JOIN_DATE: &str = "2024-01-01";

/// Partial user data submitted for classification.
///
/// Every field is optional. [`UserSignal::with_defaults`] fills the gaps the
/// way the full recommendation pipeline expects; the standalone predictions
/// zero-fill through [`UserSignal::category_features`] and
/// [`UserSignal::goal_features`] instead.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserSignal {
    pub age: Option<f64>,
    pub bmi: Option<f64>,
    pub fitness_level_num: Option<f64>,
    /// Minutes per night
    pub avg_sleep_duration: Option<f64>,
    pub avg_calories_consumed: Option<f64>,
    pub avg_calories_burned: Option<f64>,
    pub avg_steps: Option<f64>,
    /// Minutes per session
    pub avg_workout_duration: Option<f64>,
    /// 0-4 scale
    pub avg_workout_intensity: Option<f64>,
    pub avg_heart_rate: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub days_since_joined: Option<f64>,
    pub join_date: Option<String>,
}

impl UserSignal {
    /// Reads one numeric feature; `None` when the caller left it out
    pub fn get(&self, feature: Feature) -> Option<f64> {
        match feature {
            Feature::Age => self.age,
            Feature::Bmi => self.bmi,
            Feature::FitnessLevelNum => self.fitness_level_num,
            Feature::AvgSleepDuration => self.avg_sleep_duration,
            Feature::AvgCaloriesConsumed => self.avg_calories_consumed,
            Feature::AvgCaloriesBurned => self.avg_calories_burned,
            Feature::AvgSteps => self.avg_steps,
            Feature::AvgWorkoutDuration => self.avg_workout_duration,
            Feature::AvgWorkoutIntensity => self.avg_workout_intensity,
            Feature::AvgHeartRate => self.avg_heart_rate,
            Feature::ProteinG => self.protein_g,
            Feature::CarbsG => self.carbs_g,
            Feature::FatG => self.fat_g,
            Feature::DaysSinceJoined => self.days_since_joined,
        }
    }

    /// Fills every field of the default table the caller left out.
    ///
    /// `age`, `bmi` and `fitness_level_num` have no defaults and stay empty;
    /// projection zero-fills them.
    pub fn with_defaults(mut self) -> Self {
        fn fill(slot: &mut Option<f64>, value: f64) {
            slot.get_or_insert(value);
        }

        fill(&mut self.avg_sleep_duration, 420.0);
        fill(&mut self.avg_calories_consumed, 2000.0);
        fill(&mut self.avg_calories_burned, 200.0);
        fill(&mut self.avg_steps, 8000.0);
        fill(&mut self.avg_workout_duration, 30.0);
        fill(&mut self.avg_workout_intensity, 2.0);
        fill(&mut self.avg_heart_rate, 70.0);
        fill(&mut self.protein_g, 100.0);
        fill(&mut self.carbs_g, 250.0);
        fill(&mut self.fat_g, 70.0);
        self.join_date
            .get_or_insert_with(|| DEFAULT_JOIN_DATE.to_string());
        self
    }

    /// Category feature vector, zero-filling anything absent
    pub fn category_features(&self) -> [f64; FEATURE_COUNT] {
        self.project(CATEGORY_FEATURES)
    }

    /// Goal feature vector, zero-filling anything absent
    pub fn goal_features(&self) -> [f64; FEATURE_COUNT] {
        self.project(GOAL_FEATURES)
    }

    fn project(&self, columns: [Feature; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        columns.map(|column| self.get(column).unwrap_or(0.0))
    }
}
