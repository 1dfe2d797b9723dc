use chrono::{Local, NaiveDate};
use std::sync::Arc;

use crate::{
    error::RecommendationError,
    models::{
        CategoryLabel, CategoryPrediction, CohortAverages, GoalLabel, GoalPrediction,
        LabelEncoder, Recommendation, ReferenceCohort, Resolution, UserSignal,
    },
    services::{
        classifier::{Classifier, ModelSet},
        tenure,
    },
};

/// Turns partial user data into a fitness recommendation.
///
/// Holds the startup-loaded classifiers, the goal label encoder and the
/// reference cohort. Nothing here changes after construction, so one resolver
/// can serve concurrent requests without locking.
pub struct RecommendationResolver {
    models: ModelSet,
    goal_encoder: LabelEncoder,
    cohort: ReferenceCohort,
}

impl RecommendationResolver {
    pub fn new(models: ModelSet, cohort: ReferenceCohort) -> Self {
        Self {
            models,
            goal_encoder: LabelEncoder::for_goals(),
            cohort,
        }
    }

    /// True when both classifiers loaded at startup
    pub fn models_loaded(&self) -> bool {
        self.models.all_loaded()
    }

    pub fn cohort(&self) -> &ReferenceCohort {
        &self.cohort
    }

    /// Predicts the fitness tier from the raw signal.
    ///
    /// Missing features are zero-filled and `join_date` is ignored; only an
    /// explicit `days_since_joined` reaches the model.
    pub fn predict_category(
        &self,
        signal: &UserSignal,
    ) -> Result<CategoryPrediction, RecommendationError> {
        let classifier = self.category_classifier()?;
        let category_num = classifier.predict(&signal.category_features())?;
        Ok(CategoryPrediction {
            category: CategoryLabel::from_ordinal(category_num),
            category_num,
        })
    }

    /// Predicts the fitness goal from the raw signal, zero-filling like
    /// [`predict_category`](Self::predict_category)
    pub fn predict_goal(&self, signal: &UserSignal) -> Result<GoalPrediction, RecommendationError> {
        let classifier = self.goal_classifier()?;
        let goal_num = classifier.predict(&signal.goal_features())?;
        Ok(GoalPrediction {
            goal: self.decode_goal(goal_num)?,
            goal_num,
        })
    }

    /// Full pipeline against the local calendar date
    pub fn resolve(&self, signal: UserSignal) -> Resolution {
        self.resolve_on(signal, Local::now().date_naive())
    }

    /// Full pipeline with an explicit "today"; failures come back as
    /// [`Resolution::Failed`]
    pub fn resolve_on(&self, signal: UserSignal, today: NaiveDate) -> Resolution {
        match self.try_resolve(signal, today) {
            Ok(recommendation) => Resolution::Resolved(recommendation),
            Err(e) => {
                tracing::warn!(error = %e, "Recommendation failed");
                Resolution::Failed(e)
            }
        }
    }

    fn try_resolve(
        &self,
        signal: UserSignal,
        today: NaiveDate,
    ) -> Result<Recommendation, RecommendationError> {
        let category_model = self.category_classifier()?;
        let goal_model = self.goal_classifier()?;

        let mut signal = signal.with_defaults();
        let join_date = tenure::parse_join_date(
            signal
                .join_date
                .as_deref()
                .unwrap_or(crate::models::signal::DEFAULT_JOIN_DATE),
        )?;
        let days = tenure::days_since_joined(join_date, today);
        signal.days_since_joined = Some(days as f64);

        let category = CategoryLabel::from_ordinal(
            category_model.predict(&signal.category_features())?,
        );
        let goal = self.decode_goal(goal_model.predict(&signal.goal_features())?)?;

        let (tier, rows) = self.cohort.select(category, goal);
        let averages = CohortAverages::over(&rows)?;

        tracing::debug!(
            %category,
            %goal,
            ?tier,
            cohort_rows = rows.len(),
            days_since_joined = days,
            "Recommendation resolved"
        );

        Ok(Recommendation::from_averages(category, goal, &averages))
    }

    fn category_classifier(&self) -> Result<&Arc<dyn Classifier>, RecommendationError> {
        self.models
            .category
            .as_ref()
            .ok_or(RecommendationError::ModelUnavailable("category"))
    }

    fn goal_classifier(&self) -> Result<&Arc<dyn Classifier>, RecommendationError> {
        self.models
            .goal
            .as_ref()
            .ok_or(RecommendationError::ModelUnavailable("goal"))
    }

    fn decode_goal(&self, ordinal: i64) -> Result<GoalLabel, RecommendationError> {
        self.goal_encoder
            .inverse_transform(ordinal)
            .ok_or(RecommendationError::UnseenLabel(ordinal))?
            .parse()
            .map_err(RecommendationError::Inference)
    }
}
