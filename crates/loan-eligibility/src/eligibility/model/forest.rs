use serde::{Deserialize, Serialize};

use super::{check_row, BinaryClassifier, ClassifierError};

/// Node of a flattened binary decision tree; index 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// `features[feature] <= threshold` descends left, otherwise right.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        label: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("decision tree has no nodes".to_string());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } = node
            {
                if *feature >= feature_count {
                    return Err(format!(
                        "node {index} splits on feature {feature} but only {feature_count} exist"
                    ));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {index} has a non-finite threshold"));
                }
                // Children strictly after the parent keeps every tree acyclic.
                for child in [*left, *right] {
                    if child <= index || child >= self.nodes.len() {
                        return Err(format!(
                            "node {index} references invalid child {child}"
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn classify(&self, features: &[f64]) -> Result<i64, ClassifierError> {
        let mut index = 0;
        // Each step visits a distinct node on a well-formed tree.
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { label }) => return Ok(*label),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = features.get(*feature).ok_or_else(|| ClassifierError::Traversal {
                        reason: format!("node {index} reads missing feature {feature}"),
                    })?;
                    index = if *value <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(ClassifierError::Traversal {
                        reason: format!("node {index} does not exist"),
                    })
                }
            }
        }
        Err(ClassifierError::Traversal {
            reason: "tree did not reach a leaf".to_string(),
        })
    }
}

/// Majority vote over independent trees; ties resolve to the negative class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionForest {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl DecisionForest {
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.n_features != feature_count {
            return Err(format!(
                "decision forest was trained on {} features, expected {}",
                self.n_features, feature_count
            ));
        }
        if self.trees.is_empty() {
            return Err("decision forest has no trees".to_string());
        }
        self.trees
            .iter()
            .enumerate()
            .try_for_each(|(position, tree)| {
                tree.validate(feature_count)
                    .map_err(|reason| format!("tree {position}: {reason}"))
            })
    }
}

impl BinaryClassifier for DecisionForest {
    fn predict(&self, features: &[f64]) -> Result<i64, ClassifierError> {
        check_row(features, self.n_features)?;
        let mut positive = 0usize;
        for tree in &self.trees {
            if tree.classify(features)? == 1 {
                positive += 1;
            }
        }
        Ok(i64::from(positive * 2 > self.trees.len()))
    }

    fn family(&self) -> &'static str {
        "decision_forest"
    }
}
