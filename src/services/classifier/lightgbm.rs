use serde::Deserialize;
use std::path::Path;

use super::Classifier;
use crate::{error::RecommendationError, models::FEATURE_COUNT};

/// Magnitude below which LightGBM treats a feature value as zero
const ZERO_THRESHOLD: f64 = 1e-35;

// ============================================================================
// Model dump format (`Booster.dump_model()`)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ModelDump {
    num_class: usize,
    #[serde(default)]
    num_tree_per_iteration: Option<usize>,
    max_feature_idx: usize,
    #[serde(default)]
    feature_names: Vec<String>,
    tree_info: Vec<TreeInfo>,
}

#[derive(Debug, Deserialize)]
struct TreeInfo {
    tree_index: usize,
    tree_structure: NodeDump,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeDump {
    Split(SplitDump),
    Leaf(LeafDump),
}

#[derive(Debug, Deserialize)]
struct SplitDump {
    split_feature: usize,
    threshold: ThresholdDump,
    #[serde(default = "default_decision_type")]
    decision_type: String,
    #[serde(default)]
    default_left: bool,
    #[serde(default)]
    missing_type: MissingType,
    left_child: Box<NodeDump>,
    right_child: Box<NodeDump>,
}

#[derive(Debug, Deserialize)]
struct LeafDump {
    leaf_value: f64,
}

/// Numeric for `<=` splits, `a||b||c` category list for `==` splits
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ThresholdDump {
    Numeric(f64),
    Categories(String),
}

fn default_decision_type() -> String {
    "<=".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
enum MissingType {
    #[default]
    None,
    Zero,
    NaN,
}

// ============================================================================
// Compiled trees
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Decision {
    LessOrEqual(f64),
    InCategories(Vec<i64>),
}

#[derive(Debug, Clone, PartialEq)]
enum TreeNode {
    Leaf(f64),
    Split {
        feature: usize,
        decision: Decision,
        default_left: bool,
        missing: MissingType,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn compile(dump: NodeDump, max_feature_idx: usize) -> Result<Self, RecommendationError> {
        match dump {
            NodeDump::Leaf(leaf) => Ok(TreeNode::Leaf(leaf.leaf_value)),
            NodeDump::Split(split) => {
                if split.split_feature > max_feature_idx {
                    return Err(RecommendationError::Artifact(format!(
                        "split on feature {} beyond max_feature_idx {}",
                        split.split_feature, max_feature_idx
                    )));
                }

                let decision = match (split.decision_type.as_str(), split.threshold) {
                    ("<=", ThresholdDump::Numeric(t)) => Decision::LessOrEqual(t),
                    ("==", ThresholdDump::Categories(list)) => {
                        Decision::InCategories(parse_categories(&list)?)
                    }
                    ("==", ThresholdDump::Numeric(t)) => Decision::InCategories(vec![t as i64]),
                    (other, _) => {
                        return Err(RecommendationError::Artifact(format!(
                            "unsupported decision type {}",
                            other
                        )))
                    }
                };

                Ok(TreeNode::Split {
                    feature: split.split_feature,
                    decision,
                    default_left: split.default_left,
                    missing: split.missing_type,
                    left: Box::new(Self::compile(*split.left_child, max_feature_idx)?),
                    right: Box::new(Self::compile(*split.right_child, max_feature_idx)?),
                })
            }
        }
    }

    fn leaf_value(&self, features: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf(value) => return *value,
                TreeNode::Split {
                    feature,
                    decision,
                    default_left,
                    missing,
                    left,
                    right,
                } => {
                    node = if goes_left(features[*feature], decision, *default_left, *missing) {
                        &**left
                    } else {
                        &**right
                    };
                }
            }
        }
    }
}

fn parse_categories(list: &str) -> Result<Vec<i64>, RecommendationError> {
    list.split("||")
        .map(|c| {
            c.trim().parse::<i64>().map_err(|e| {
                RecommendationError::Artifact(format!("bad category threshold {}: {}", c, e))
            })
        })
        .collect()
}

/// Mirrors LightGBM's numerical and categorical split rules
fn goes_left(value: f64, decision: &Decision, default_left: bool, missing: MissingType) -> bool {
    match decision {
        Decision::LessOrEqual(threshold) => {
            let value = if value.is_nan() && missing != MissingType::NaN {
                0.0
            } else {
                value
            };
            let is_missing = match missing {
                MissingType::Zero => value.abs() <= ZERO_THRESHOLD,
                MissingType::NaN => value.is_nan(),
                MissingType::None => false,
            };
            if is_missing {
                default_left
            } else {
                value <= *threshold
            }
        }
        Decision::InCategories(categories) => {
            if value.is_nan() {
                if missing == MissingType::NaN {
                    return false;
                }
                return categories.contains(&0);
            }
            if value < 0.0 {
                return false;
            }
            categories.contains(&(value as i64))
        }
    }
}

// ============================================================================
// Model
// ============================================================================

/// Gradient-boosted tree ensemble evaluated from a LightGBM JSON dump
#[derive(Debug, Clone, PartialEq)]
pub struct LightGbmModel {
    num_class: usize,
    trees_per_iteration: usize,
    num_features: usize,
    trees: Vec<(usize, TreeNode)>,
}

impl LightGbmModel {
    /// Parses a dump and checks it expects exactly [`FEATURE_COUNT`] features
    pub fn from_json(raw: &str) -> Result<Self, RecommendationError> {
        let dump: ModelDump = serde_json::from_str(raw)
            .map_err(|e| RecommendationError::Artifact(format!("malformed model dump: {}", e)))?;

        let num_features = dump.max_feature_idx + 1;
        if num_features != FEATURE_COUNT {
            return Err(RecommendationError::Artifact(format!(
                "model expects {} features, resolver supplies {}",
                num_features, FEATURE_COUNT
            )));
        }
        if !dump.feature_names.is_empty() && dump.feature_names.len() != num_features {
            return Err(RecommendationError::Artifact(format!(
                "{} feature names for {} features",
                dump.feature_names.len(),
                num_features
            )));
        }
        if dump.num_class == 0 || dump.tree_info.is_empty() {
            return Err(RecommendationError::Artifact(
                "model has no classes or no trees".to_string(),
            ));
        }

        let trees_per_iteration = dump.num_tree_per_iteration.unwrap_or(dump.num_class).max(1);
        let trees = dump
            .tree_info
            .into_iter()
            .map(|info| {
                TreeNode::compile(info.tree_structure, dump.max_feature_idx)
                    .map(|tree| (info.tree_index % trees_per_iteration, tree))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            num_class: dump.num_class,
            trees_per_iteration,
            num_features,
            trees,
        })
    }

    /// Reads and parses a dump from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecommendationError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RecommendationError::Artifact(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    pub fn num_class(&self) -> usize {
        self.num_class
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Summed leaf values per class
    pub fn raw_scores(&self, features: &[f64]) -> Result<Vec<f64>, RecommendationError> {
        if features.len() < self.num_features {
            return Err(RecommendationError::Inference(format!(
                "expected {} features, got {}",
                self.num_features,
                features.len()
            )));
        }

        let mut scores = vec![0.0; self.trees_per_iteration];
        for (class, tree) in &self.trees {
            scores[*class] += tree.leaf_value(features);
        }
        Ok(scores)
    }
}

impl Classifier for LightGbmModel {
    fn predict(&self, features: &[f64]) -> Result<i64, RecommendationError> {
        let scores = self.raw_scores(features)?;

        if scores.len() == 1 {
            return Ok(i64::from(scores[0] > 0.0));
        }

        // First maximum wins on ties
        let mut best = 0;
        for (idx, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = idx;
            }
        }
        Ok(best as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn split(feature: usize, threshold: f64, left: serde_json::Value, right: serde_json::Value) -> serde_json::Value {
        json!({
            "split_index": 0,
            "split_feature": feature,
            "split_gain": 1.0,
            "threshold": threshold,
            "decision_type": "<=",
            "default_left": true,
            "missing_type": "None",
            "internal_value": 0.0,
            "left_child": left,
            "right_child": right
        })
    }

    fn leaf(value: f64) -> serde_json::Value {
        json!({ "leaf_index": 0, "leaf_value": value })
    }

    /// Three-class model voting on feature 2: <=0.5 class 0, <=1.5 class 1, else class 2
    fn tiered_model() -> serde_json::Value {
        json!({
            "name": "tree",
            "version": "v3",
            "num_class": 3,
            "num_tree_per_iteration": 3,
            "label_index": 0,
            "max_feature_idx": 8,
            "objective": "multiclass num_class:3",
            "tree_info": [
                { "tree_index": 0, "tree_structure": split(2, 0.5, leaf(1.0), leaf(-1.0)) },
                { "tree_index": 1, "tree_structure":
                    split(2, 0.5, leaf(-1.0), split(2, 1.5, leaf(1.0), leaf(-1.0))) },
                { "tree_index": 2, "tree_structure": split(2, 1.5, leaf(-1.0), leaf(1.0)) }
            ]
        })
    }

    fn features_with(idx: usize, value: f64) -> [f64; FEATURE_COUNT] {
        let mut features = [0.0; FEATURE_COUNT];
        features[idx] = value;
        features
    }

    #[test]
    fn test_multiclass_argmax() {
        let model = LightGbmModel::from_json(&tiered_model().to_string()).unwrap();
        assert_eq!(model.num_class(), 3);
        assert_eq!(model.tree_count(), 3);
        assert_eq!(model.predict(&features_with(2, 0.0)).unwrap(), 0);
        assert_eq!(model.predict(&features_with(2, 1.0)).unwrap(), 1);
        assert_eq!(model.predict(&features_with(2, 2.0)).unwrap(), 2);
    }

    #[test]
    fn test_scores_accumulate_across_iterations() {
        let mut dump = tiered_model();
        // A second boosting round pushing class 0 on every row
        dump["tree_info"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "tree_index": 3, "tree_structure": leaf(5.0) }));

        let model = LightGbmModel::from_json(&dump.to_string()).unwrap();
        let scores = model.raw_scores(&features_with(2, 2.0)).unwrap();
        assert_eq!(scores, vec![4.0, -1.0, 1.0]);
        assert_eq!(model.predict(&features_with(2, 2.0)).unwrap(), 0);
    }

    #[test]
    fn test_binary_model() {
        let dump = json!({
            "num_class": 1,
            "num_tree_per_iteration": 1,
            "max_feature_idx": 8,
            "tree_info": [{ "tree_index": 0, "tree_structure": split(0, 30.0, leaf(-0.7), leaf(0.4)) }]
        });
        let model = LightGbmModel::from_json(&dump.to_string()).unwrap();
        assert_eq!(model.predict(&features_with(0, 25.0)).unwrap(), 0);
        assert_eq!(model.predict(&features_with(0, 45.0)).unwrap(), 1);
    }

    #[test]
    fn test_categorical_split() {
        let dump = json!({
            "num_class": 1,
            "max_feature_idx": 8,
            "tree_info": [{ "tree_index": 0, "tree_structure": {
                "split_feature": 1,
                "threshold": "1||3",
                "decision_type": "==",
                "default_left": false,
                "missing_type": "None",
                "left_child": leaf(1.0),
                "right_child": leaf(-1.0)
            }}]
        });
        let model = LightGbmModel::from_json(&dump.to_string()).unwrap();
        assert_eq!(model.predict(&features_with(1, 3.0)).unwrap(), 1);
        assert_eq!(model.predict(&features_with(1, 2.0)).unwrap(), 0);
        assert_eq!(model.predict(&features_with(1, -1.0)).unwrap(), 0);
    }

    #[test]
    fn test_zero_missing_type_uses_default_direction() {
        let decision = Decision::LessOrEqual(-5.0);
        assert!(goes_left(0.0, &decision, true, MissingType::Zero));
        assert!(!goes_left(0.0, &decision, true, MissingType::None));
        assert!(goes_left(f64::NAN, &decision, true, MissingType::NaN));
    }

    #[test]
    fn test_rejects_wrong_feature_count() {
        let mut dump = tiered_model();
        dump["max_feature_idx"] = json!(4);
        let err = LightGbmModel::from_json(&dump.to_string()).unwrap_err();
        assert!(matches!(err, RecommendationError::Artifact(_)));
    }

    #[test]
    fn test_rejects_split_beyond_feature_range() {
        let dump = json!({
            "num_class": 1,
            "max_feature_idx": 8,
            "tree_info": [{ "tree_index": 0, "tree_structure": split(12, 1.0, leaf(1.0), leaf(0.0)) }]
        });
        assert!(LightGbmModel::from_json(&dump.to_string()).is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            LightGbmModel::from_json("not a model"),
            Err(RecommendationError::Artifact(_))
        ));
    }

    #[test]
    fn test_short_feature_vector_is_inference_error() {
        let model = LightGbmModel::from_json(&tiered_model().to_string()).unwrap();
        assert!(matches!(
            model.predict(&[1.0, 2.0]),
            Err(RecommendationError::Inference(_))
        ));
    }
}
