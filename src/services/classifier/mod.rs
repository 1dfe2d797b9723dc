//! Pre-trained classifier abstraction
//!
//! The resolver treats both models as opaque `features -> ordinal` functions.
//! Artifacts are loaded once at startup; a missing or malformed artifact leaves
//! the slot empty instead of aborting the process.

use std::sync::Arc;

use crate::{config::Config, error::RecommendationError};

pub mod lightgbm;

pub use lightgbm::LightGbmModel;

/// A trained model that maps a feature vector to a class ordinal
#[cfg_attr(test, mockall::automock)]
pub trait Classifier: Send + Sync {
    /// Predicts the class ordinal for a single row of features
    fn predict(&self, features: &[f64]) -> Result<i64, RecommendationError>;
}

/// The two classifiers the resolver consults, either of which may be absent
#[derive(Clone, Default)]
pub struct ModelSet {
    pub category: Option<Arc<dyn Classifier>>,
    pub goal: Option<Arc<dyn Classifier>>,
}

impl ModelSet {
    /// Loads both artifacts named in the config, logging any that fail
    pub fn load(config: &Config) -> Self {
        Self {
            category: load_artifact("category", &config.category_model_path),
            goal: load_artifact("goal", &config.goal_model_path),
        }
    }

    pub fn all_loaded(&self) -> bool {
        self.category.is_some() && self.goal.is_some()
    }
}

fn load_artifact(role: &'static str, path: &str) -> Option<Arc<dyn Classifier>> {
    match LightGbmModel::load(path) {
        Ok(model) => {
            tracing::info!(
                role,
                path,
                num_class = model.num_class(),
                trees = model.tree_count(),
                "Classifier loaded"
            );
            Some(Arc::new(model))
        }
        Err(e) => {
            tracing::error!(role, path, error = %e, "Failed to load classifier, running degraded");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifacts_leave_slots_empty() {
        let config: Config = envy::from_iter(vec![
            (
                "CATEGORY_MODEL_PATH".to_string(),
                "does/not/exist.json".to_string(),
            ),
            (
                "GOAL_MODEL_PATH".to_string(),
                "does/not/exist_either.json".to_string(),
            ),
        ])
        .unwrap();

        let models = ModelSet::load(&config);
        assert!(models.category.is_none());
        assert!(models.goal.is_none());
        assert!(!models.all_loaded());
    }
}
