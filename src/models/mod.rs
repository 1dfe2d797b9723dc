pub mod cohort;
pub mod labels;
pub mod recommendation;
pub mod signal;

pub use cohort::{CohortAverages, CohortRow, CohortTier, ReferenceCohort};
pub use labels::{CategoryLabel, GoalLabel, LabelEncoder};
pub use recommendation::{
    CategoryPrediction, GoalPrediction, NutritionPlan, Recommendation, Resolution, SleepPlan,
    WorkoutPlan,
};
pub use signal::{Feature, UserSignal, FEATURE_COUNT};
