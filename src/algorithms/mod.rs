pub mod encoder;
pub mod forest;
pub mod similarity;
pub mod split;

pub use encoder::{FeatureSchema, OneHotFrame};
pub use forest::RandomForest;
pub use similarity::SimilarityMatrix;

use crate::error::{RecError, RecResult};
use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2};

pub const RECOMMENDABLE: usize = 1;
pub const NOT_RECOMMENDABLE: usize = 0;

/// A fitted binary classifier over aligned feature rows.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn n_features(&self) -> usize;

    fn predict_labels(&self, features: &Array2<f64>) -> Array1<usize>;

    fn predict(&self, features: &Array2<f64>) -> RecResult<Vec<bool>> {
        if features.ncols() != self.n_features() {
            return Err(RecError::Schema {
                expected: self.n_features(),
                actual: features.ncols(),
            });
        }
        if features.nrows() == 0 {
            return Ok(Vec::new());
        }
        Ok(self
            .predict_labels(features)
            .iter()
            .map(|&label| label == RECOMMENDABLE)
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct DecisionTreeModel {
    tree: DecisionTree<f64, usize>,
    n_features: usize,
}

impl DecisionTreeModel {
    pub fn fit(features: Array2<f64>, labels: Array1<usize>) -> RecResult<Self> {
        if features.nrows() == 0 {
            return Err(RecError::Training("cannot fit a tree on zero rows".to_string()));
        }
        let n_features = features.ncols();
        let dataset = Dataset::new(features, labels);
        let tree = DecisionTree::params()
            .max_depth(None)
            .fit(&dataset)
            .map_err(|e| RecError::Training(e.to_string()))?;

        Ok(Self { tree, n_features })
    }
}

impl Classifier for DecisionTreeModel {
    fn name(&self) -> &'static str {
        "Decision Tree"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_labels(&self, features: &Array2<f64>) -> Array1<usize> {
        self.tree.predict(features)
    }
}
