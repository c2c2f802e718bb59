//! Fitted classifiers
//!
//! Parameters follow scikit-learn's exported attributes (`classes_`,
//! `coef_`, `intercept_`, and the `tree_` arrays of each estimator), so a
//! training script can dump them without any translation step.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use super::error::{BundleError, PredictionError};

/// Marker for "no child" in the tree arrays
const TREE_LEAF: i64 = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    /// Binary logistic regression
    LogisticRegression {
        classes: Vec<i64>,
        coefficients: Vec<f64>,
        intercept: f64,
    },

    /// Averaged ensemble of decision trees
    RandomForest {
        classes: Vec<i64>,
        n_features: usize,
        trees: Vec<DecisionTree>,
    },
}

/// One decision tree in array layout. Node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights, one column per class
    pub value: Vec<Vec<f64>>,
}

impl Classifier {
    pub fn classes(&self) -> &[i64] {
        match self {
            Classifier::LogisticRegression { classes, .. } => classes,
            Classifier::RandomForest { classes, .. } => classes,
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            Classifier::LogisticRegression { coefficients, .. } => coefficients.len(),
            Classifier::RandomForest { n_features, .. } => *n_features,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), BundleError> {
        let classes = self.classes();
        if classes.is_empty() {
            return Err(BundleError::Invalid("classifier has no classes".to_string()));
        }
        for (i, class) in classes.iter().enumerate() {
            if classes[..i].contains(class) {
                return Err(BundleError::Invalid(format!("duplicate class {}", class)));
            }
        }

        match self {
            Classifier::LogisticRegression { classes, coefficients, intercept } => {
                if classes.len() != 2 {
                    return Err(BundleError::Invalid(format!(
                        "logistic regression must be binary, found {} classes",
                        classes.len()
                    )));
                }
                if coefficients.is_empty() {
                    return Err(BundleError::Invalid("logistic regression has no coefficients".to_string()));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(BundleError::Invalid("logistic regression parameters must be finite".to_string()));
                }
            }
            Classifier::RandomForest { classes, n_features, trees } => {
                if trees.is_empty() {
                    return Err(BundleError::Invalid("random forest has no trees".to_string()));
                }
                for (index, tree) in trees.iter().enumerate() {
                    tree.validate(*n_features, classes.len())
                        .map_err(|reason| BundleError::Invalid(format!("tree {}: {}", index, reason)))?;
                }
            }
        }
        Ok(())
    }

    /// Class probabilities, one row per input row, columns ordered as `classes()`
    pub fn predict_proba(&self, rows: &Array2<f64>) -> Result<Array2<f64>, PredictionError> {
        if rows.ncols() != self.n_features() {
            return Err(PredictionError::DimensionMismatch {
                stage: "classifier",
                expected: self.n_features(),
                actual: rows.ncols(),
            });
        }

        match self {
            Classifier::LogisticRegression { coefficients, intercept, .. } => {
                let weights = ArrayView1::from(coefficients.as_slice());
                let logits = rows.dot(&weights) + *intercept;

                let mut proba = Array2::zeros((rows.nrows(), 2));
                for (mut out, z) in proba.axis_iter_mut(Axis(0)).zip(logits.iter()) {
                    let positive = sigmoid(*z);
                    out[0] = 1.0 - positive;
                    out[1] = positive;
                }
                Ok(proba)
            }
            Classifier::RandomForest { classes, trees, .. } => {
                let mut proba = Array2::zeros((rows.nrows(), classes.len()));
                for (tree_index, tree) in trees.iter().enumerate() {
                    for (row, mut out) in rows.axis_iter(Axis(0)).zip(proba.axis_iter_mut(Axis(0))) {
                        let leaf = tree.leaf_distribution(row, tree_index)?;
                        out += &leaf;
                    }
                }
                proba /= trees.len() as f64;
                Ok(proba)
            }
        }
    }

    /// Predicted class label for each input row
    pub fn predict(&self, rows: &Array2<f64>) -> Result<Vec<i64>, PredictionError> {
        let proba = self.predict_proba(rows)?;
        proba
            .axis_iter(Axis(0))
            .map(|row| argmax(row).map(|index| self.classes()[index]))
            .collect()
    }

    /// Column of `class` in the probability matrix
    pub fn class_index(&self, class: i64) -> Result<usize, PredictionError> {
        self.classes()
            .iter()
            .position(|c| *c == class)
            .ok_or(PredictionError::UnknownClass(class))
    }
}

impl DecisionTree {
    fn len(&self) -> usize {
        self.children_left.len()
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let nodes = self.len();
        if nodes == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != nodes
            || self.feature.len() != nodes
            || self.threshold.len() != nodes
            || self.value.len() != nodes
        {
            return Err("node arrays differ in length".to_string());
        }

        let in_range = |child: i64| child > 0 && (child as usize) < nodes;
        for node in 0..nodes {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if self.value[node].len() != n_classes {
                return Err(format!("node {} has {} class weights, expected {}", node, self.value[node].len(), n_classes));
            }
            if left == TREE_LEAF && right == TREE_LEAF {
                let weights = &self.value[node];
                if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || weights.iter().sum::<f64>() <= 0.0 {
                    return Err(format!("leaf {} has no class weight", node));
                }
                continue;
            }
            if !in_range(left) || !in_range(right) {
                return Err(format!("node {} has children out of range", node));
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {} splits on unknown feature {}", node, feature));
            }
        }
        Ok(())
    }

    /// Normalized class distribution of the leaf `row` lands in
    fn leaf_distribution(&self, row: ArrayView1<f64>, tree: usize) -> Result<Array1<f64>, PredictionError> {
        let malformed = |reason: String| PredictionError::MalformedTree { tree, reason };

        let mut node = 0usize;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..self.len() {
            let left = *self.children_left.get(node).ok_or_else(|| malformed(format!("missing node {}", node)))?;
            if left == TREE_LEAF {
                let weights = ArrayView1::from(self.value[node].as_slice());
                let total = weights.sum();
                if total <= 0.0 {
                    return Err(malformed(format!("leaf {} has no class weight", node)));
                }
                return Ok(weights.mapv(|w| w / total));
            }

            let feature = self.feature[node] as usize;
            let value = *row.get(feature).ok_or_else(|| malformed(format!("feature {} out of range", feature)))?;
            node = if value <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }

        Err(malformed("traversal did not reach a leaf".to_string()))
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// First index of the maximum, like numpy's `argmax`
fn argmax(row: ArrayView1<f64>) -> Result<usize, PredictionError> {
    let mut best: Option<(usize, f64)> = None;
    for (index, p) in row.iter().enumerate() {
        if !p.is_finite() {
            return Err(PredictionError::InvalidProbabilities(format!("non-finite probability {}", p)));
        }
        match best {
            Some((_, max)) if *p <= max => {}
            _ => best = Some((index, *p)),
        }
    }
    best.map(|(index, _)| index)
        .ok_or_else(|| PredictionError::InvalidProbabilities("empty probability row".to_string()))
}
