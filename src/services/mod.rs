pub mod classifier;
pub mod resolver;
pub mod tenure;

pub use classifier::{Classifier, LightGbmModel, ModelSet};
pub use resolver::RecommendationResolver;
