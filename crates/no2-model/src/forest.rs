//! Tree ensemble representation and traversal.

use no2_core::{FeatureVector, InferenceError, Regressor};
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// How per-tree outputs combine into one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Average of tree outputs (random forest).
    #[default]
    Mean,
    /// Sum of tree outputs (gradient boosting).
    Sum,
}

/// A node in an array-encoded decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Routes to `left` when `x[feature] <= threshold`, otherwise to `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf { value: f64 },
}

impl Node {
    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Node::Split { feature, threshold, left, right }
    }

    pub fn leaf(value: f64) -> Self {
        Node::Leaf { value }
    }
}

/// A single regression tree. Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    fn validate(&self, tree_idx: usize, n_features: usize) -> Result<(), ModelError> {
        let invalid = |msg: String| ModelError::Invalid(format!("tree {tree_idx}: {msg}"));

        if self.nodes.is_empty() {
            return Err(invalid("has no nodes".into()));
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Leaf { value } if !value.is_finite() => {
                    return Err(invalid(format!("node {idx} has a non-finite leaf value")));
                }
                Node::Leaf { .. } => {}
                Node::Split { feature, threshold, left, right } => {
                    if feature >= n_features {
                        return Err(invalid(format!(
                            "node {idx} splits on feature {feature}, model has {n_features}"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(invalid(format!("node {idx} has a non-finite threshold")));
                    }
                    for child in [left, right] {
                        // children after their parent keeps traversal acyclic
                        if child <= idx || child >= self.nodes.len() {
                            return Err(invalid(format!(
                                "node {idx} has invalid child index {child}"
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Walks from the root to a leaf. The tree must have passed validation.
    fn evaluate(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split { feature, threshold, left, right } => {
                    idx = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

/// A validated tree ensemble regressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    n_features: usize,
    #[serde(default)]
    feature_names: Vec<String>,
    #[serde(default)]
    aggregation: Aggregation,
    #[serde(default)]
    base_score: f64,
    trees: Vec<Tree>,
}

impl Forest {
    /// Builds a mean-aggregated forest and validates it.
    pub fn new(n_features: usize, trees: Vec<Tree>) -> Result<Self, ModelError> {
        let forest = Self {
            n_features,
            feature_names: Vec::new(),
            aggregation: Aggregation::Mean,
            base_score: 0.0,
            trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    pub fn with_feature_names<I, S>(mut self, names: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_names = names.into_iter().map(Into::into).collect();
        self.validate()?;
        Ok(self)
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation, base_score: f64) -> Result<Self, ModelError> {
        self.aggregation = aggregation;
        self.base_score = base_score;
        self.validate()?;
        Ok(self)
    }

    /// Parses and validates a JSON artifact.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let forest: Forest = serde_json::from_str(json)?;
        forest.validate()?;
        Ok(forest)
    }

    /// Parses and validates a JSON artifact from a reader.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, ModelError> {
        let forest: Forest = serde_json::from_reader(reader)?;
        forest.validate()?;
        Ok(forest)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.n_features == 0 {
            return Err(ModelError::Invalid("n_features must be positive".into()));
        }
        if !self.feature_names.is_empty() && self.feature_names.len() != self.n_features {
            return Err(ModelError::Invalid(format!(
                "{} feature names for {} features",
                self.feature_names.len(),
                self.n_features
            )));
        }
        if !self.base_score.is_finite() {
            return Err(ModelError::Invalid("base_score is not finite".into()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("ensemble has no trees".into()));
        }
        self.trees
            .iter()
            .enumerate()
            .try_for_each(|(i, tree)| tree.validate(i, self.n_features))
    }

    /// Predicts a single row.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, InferenceError> {
        if row.len() != self.n_features {
            return Err(InferenceError::FeatureCount {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        if let Some(index) = row.iter().position(|v| !v.is_finite()) {
            return Err(InferenceError::NonFinite { index });
        }

        let total: f64 = self.trees.iter().map(|t| t.evaluate(row)).sum();
        let combined = match self.aggregation {
            Aggregation::Mean => total / self.trees.len() as f64,
            Aggregation::Sum => total,
        };
        Ok(self.base_score + combined)
    }
}

impl Regressor for Forest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<f64>, InferenceError> {
        rows.iter().map(|row| self.predict_row(row.as_slice())).collect()
    }
}
