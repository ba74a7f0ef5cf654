// Copyright 2024 Felix Engl
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use text_processing::{SparseMatrix, SparseVector};
use crate::config::ForestConfig;
use crate::error::ForestError;
use crate::label::Label;
use crate::traits::{Classifier, Probabilities};
use crate::tree::{DecisionTree, TreeParams};
use crate::weights::{class_counts, class_weights};

/// An ensemble of decision trees, each grown on a bootstrap sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    config: ForestConfig,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl Default for RandomForestClassifier {
    fn default() -> Self {
        Self::new(ForestConfig::default())
    }
}

impl RandomForestClassifier {
    /// Create a new, unfitted random forest
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            n_features: 0,
            trees: Vec::new(),
        }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// The weight of every row for one tree, the bootstrap multiplicity times the class weight.
    fn sample_weights(&self, class_weight: &[f64; 2], y: &[Label], rng: &mut ChaCha8Rng) -> Vec<f64> {
        let n_samples = y.len();
        let mut multiplicity = vec![0.0; n_samples];
        if self.config.bootstrap {
            for _ in 0..n_samples {
                multiplicity[rng.gen_range(0..n_samples)] += 1.0;
            }
        } else {
            multiplicity.fill(1.0);
        }
        multiplicity
            .into_iter()
            .zip(y)
            .map(|(count, label)| count * class_weight[label.index()])
            .collect()
    }

    fn grow(&self, x: &SparseMatrix, y: &[Label]) -> Vec<DecisionTree> {
        let class_weight = class_weights(self.config.class_weight, y);
        let params = TreeParams {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            min_samples_leaf: self.config.min_samples_leaf,
            max_features: self.config.max_features.resolve(x.n_cols()),
        };
        (0..self.config.n_trees)
            .into_par_iter()
            .map(|tree_index| {
                let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed.wrapping_add(tree_index as u64));
                let sample_weights = self.sample_weights(&class_weight, y, &mut rng);
                DecisionTree::fit(x.rows(), y, &sample_weights, x.n_cols(), &params, &mut rng)
            })
            .collect()
    }

    fn check_dimension(&self, x: &SparseVector) -> Result<(), ForestError> {
        if !self.is_fitted() {
            return Err(ForestError::NotFitted);
        }
        if x.dim() != self.n_features {
            return Err(ForestError::DimensionMismatch { expected: self.n_features, actual: x.dim() });
        }
        Ok(())
    }
}

impl Classifier for RandomForestClassifier {
    fn fit(&mut self, x: &SparseMatrix, y: &[Label]) -> Result<(), ForestError> {
        self.config.validate()?;
        if x.n_rows() != y.len() {
            return Err(ForestError::LengthMismatch { samples: x.n_rows(), labels: y.len() });
        }
        if x.is_empty() {
            return Err(ForestError::EmptyMatrix);
        }
        match class_counts(y) {
            [0, _] => return Err(ForestError::SingleClass(Label::Fake)),
            [_, 0] => return Err(ForestError::SingleClass(Label::Real)),
            _ => {}
        }

        log::info!(
            "Train random forest with {} trees on {} samples and {} features.",
            self.config.n_trees,
            x.n_rows(),
            x.n_cols()
        );
        let trees = match self.config.threads {
            Some(threads) => {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?
                    .install(|| self.grow(x, y))
            }
            None => self.grow(x, y),
        };
        log::debug!(
            "Grown {} trees with up to {} levels.",
            trees.len(),
            trees.iter().map(DecisionTree::depth).max().unwrap_or_default()
        );
        self.trees = trees;
        self.n_features = x.n_cols();
        Ok(())
    }

    fn predict(&self, x: &SparseVector) -> Result<Label, ForestError> {
        Ok(self.predict_proba(x)?.most_likely())
    }

    /// The mean of the leaf distributions of all trees.
    fn predict_proba(&self, x: &SparseVector) -> Result<Probabilities, ForestError> {
        self.check_dimension(x)?;
        let mut sum = [0.0; 2];
        for tree in &self.trees {
            let probabilities = tree.predict_proba(x);
            sum[0] += probabilities.of(Label::Real);
            sum[1] += probabilities.of(Label::Fake);
        }
        let n_trees = self.trees.len() as f64;
        Ok(Probabilities::new(sum[0] / n_trees, sum[1] / n_trees))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_all(&self, x: &SparseMatrix) -> Result<Vec<Label>, ForestError> {
        x.rows().par_iter().map(|row| self.predict(row)).collect()
    }
}

#[cfg(test)]
mod test {
    use text_processing::{SparseMatrix, SparseVector};
    use crate::config::ForestConfig;
    use crate::error::ForestError;
    use crate::label::Label;
    use crate::traits::Classifier;
    use super::RandomForestClassifier;

    fn config() -> ForestConfig {
        ForestConfig {
            n_trees: 25,
            min_samples_split: 2,
            min_samples_leaf: 1,
            ..ForestConfig::default()
        }
    }

    /// Feature 0 marks fake samples, feature 1 marks real samples.
    fn data() -> (SparseMatrix, Vec<Label>) {
        let mut x = SparseMatrix::new(4);
        let mut y = Vec::new();
        for i in 0..30 {
            let noise = (i % 3) as f64 * 0.1;
            if i % 3 == 0 {
                x.push(SparseVector::from_dense(&[0.8 + noise, 0.0, noise, 0.1])).unwrap();
                y.push(Label::Fake);
            } else {
                x.push(SparseVector::from_dense(&[0.0, 0.7 + noise, noise, 0.1])).unwrap();
                y.push(Label::Real);
            }
        }
        (x, y)
    }

    #[test]
    fn learns_separable_data() {
        let (x, y) = data();
        let mut forest = RandomForestClassifier::new(config());
        forest.fit(&x, &y).unwrap();
        assert_eq!(25, forest.trees().len());
        assert_eq!(4, forest.n_features());
        assert_eq!(y, forest.predict_all(&x).unwrap());

        let fake = SparseVector::from_dense(&[0.9, 0.0, 0.0, 0.0]);
        let probabilities = forest.predict_proba(&fake).unwrap();
        assert!(probabilities.of(Label::Fake) > 0.5);
        assert!((probabilities.of(Label::Fake) + probabilities.of(Label::Real) - 1.0).abs() < 1e-9);
        assert_eq!(Label::Fake, forest.predict(&fake).unwrap());
    }

    #[test]
    fn is_reproducible() {
        let (x, y) = data();
        let mut a = RandomForestClassifier::new(config());
        a.fit(&x, &y).unwrap();
        let mut b = RandomForestClassifier::new(ForestConfig { threads: Some(2), ..config() });
        b.fit(&x, &y).unwrap();
        assert_eq!(a.trees(), b.trees());
    }

    #[test]
    fn fit_errors() {
        let (x, y) = data();
        let mut forest = RandomForestClassifier::new(config());
        assert!(matches!(
            forest.fit(&x, &y[..3]),
            Err(ForestError::LengthMismatch { samples: 30, labels: 3 })
        ));
        assert!(matches!(forest.fit(&SparseMatrix::new(4), &[]), Err(ForestError::EmptyMatrix)));
        assert!(matches!(
            forest.fit(&x, &vec![Label::Real; 30]),
            Err(ForestError::SingleClass(Label::Real))
        ));
        assert!(matches!(
            forest.predict(&SparseVector::zeros(4)),
            Err(ForestError::NotFitted)
        ));
    }

    #[test]
    fn predict_checks_dimension() {
        let (x, y) = data();
        let mut forest = RandomForestClassifier::new(config());
        forest.fit(&x, &y).unwrap();
        assert!(matches!(
            forest.predict_proba(&SparseVector::zeros(3)),
            Err(ForestError::DimensionMismatch { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn compensates_imbalance() {
        // 1 fake sample for 9 real ones, the fake marker feature should still win.
        let mut x = SparseMatrix::new(2);
        let mut y = Vec::new();
        for i in 0..40 {
            if i % 10 == 0 {
                x.push(SparseVector::from_dense(&[1.0, 0.0])).unwrap();
                y.push(Label::Fake);
            } else {
                x.push(SparseVector::from_dense(&[0.0, 1.0])).unwrap();
                y.push(Label::Real);
            }
        }
        let mut forest = RandomForestClassifier::new(config());
        forest.fit(&x, &y).unwrap();
        assert_eq!(Label::Fake, forest.predict(&SparseVector::from_dense(&[1.0, 0.0])).unwrap());
        assert_eq!(Label::Real, forest.predict(&SparseVector::from_dense(&[0.0, 1.0])).unwrap());
    }

    #[test]
    fn survives_serialization() {
        let (x, y) = data();
        let mut forest = RandomForestClassifier::new(config());
        forest.fit(&x, &y).unwrap();
        let decoded: RandomForestClassifier = bincode::deserialize(&bincode::serialize(&forest).unwrap()).unwrap();
        assert_eq!(forest, decoded);
        for row in x.rows() {
            assert_eq!(forest.predict_proba(row).unwrap(), decoded.predict_proba(row).unwrap());
        }
    }
}
