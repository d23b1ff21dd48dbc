use super::{Classifier, DecisionTreeModel, RECOMMENDABLE};
use crate::error::{RecError, RecResult};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Bagged decision trees over random feature subsets, majority voting.
pub struct RandomForest {
    trees: Vec<SubspaceTree>,
    n_features: usize,
}

struct SubspaceTree {
    model: DecisionTreeModel,
    columns: Vec<usize>,
}

struct TreePlan {
    rows: Vec<usize>,
    columns: Vec<usize>,
}

fn subspace_size(width: usize) -> usize {
    ((width as f64).sqrt().ceil() as usize).clamp(1, width)
}

fn plan_tree(n_rows: usize, width: usize, seed: u64) -> TreePlan {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows = (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();

    let extra = subspace_size(width) - 1;
    let mut columns: Vec<usize> = sample(&mut rng, width - 1, extra).into_iter().map(|c| c + 1).collect();
    columns.push(0);
    columns.sort_unstable();

    TreePlan { rows, columns }
}

impl RandomForest {
    pub fn fit(features: &Array2<f64>, labels: &Array1<usize>, n_estimators: usize, seed: u64) -> RecResult<Self> {
        let n = features.nrows();
        let width = features.ncols();
        if n == 0 || width == 0 {
            return Err(RecError::Training("cannot fit a forest on an empty matrix".to_string()));
        }
        if n_estimators == 0 {
            return Err(RecError::Training("forest needs at least one estimator".to_string()));
        }

        let plans: Vec<TreePlan> = (0..n_estimators)
            .map(|i| plan_tree(n, width, seed.wrapping_add(i as u64)))
            .collect();

        let trees = plans
            .into_par_iter()
            .map(|plan| -> RecResult<SubspaceTree> {
                let x = features.select(Axis(0), &plan.rows).select(Axis(1), &plan.columns);
                let y = labels.select(Axis(0), &plan.rows);
                Ok(SubspaceTree {
                    model: DecisionTreeModel::fit(x, y)?,
                    columns: plan.columns,
                })
            })
            .collect::<RecResult<Vec<_>>>()?;

        Ok(Self { trees, n_features: width })
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &'static str {
        "Random Forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_labels(&self, features: &Array2<f64>) -> Array1<usize> {
        let mut votes = Array1::<usize>::zeros(features.nrows());
        for tree in &self.trees {
            let labels = tree.model.predict_labels(&features.select(Axis(1), &tree.columns));
            votes.zip_mut_with(&labels, |v, &l| {
                if l == RECOMMENDABLE {
                    *v += 1;
                }
            });
        }

        // Strict majority; an even split is not recommendable.
        let total = self.trees.len();
        votes.mapv(|v| usize::from(v * 2 > total))
    }
}
