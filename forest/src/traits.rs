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

use serde::{Deserialize, Serialize};
use text_processing::{SparseMatrix, SparseVector};
use crate::error::ForestError;
use crate::label::Label;

/// The probability mass over the labels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Probabilities([f64; 2]);

impl Probabilities {
    pub const fn new(real: f64, fake: f64) -> Self {
        Self([real, fake])
    }

    /// Normalizes [weights] to a probability mass. Zero weights become an even split.
    pub fn from_weights(weights: [f64; 2]) -> Self {
        let total = weights[0] + weights[1];
        if total > 0.0 {
            Self([weights[0] / total, weights[1] / total])
        } else {
            Self([0.5, 0.5])
        }
    }

    #[inline]
    pub fn of(&self, label: Label) -> f64 {
        self.0[label.index()]
    }

    /// The label with the highest probability, [Label::Real] on ties.
    pub fn most_likely(&self) -> Label {
        if self.0[Label::Fake.index()] > self.0[Label::Real.index()] {
            Label::Fake
        } else {
            Label::Real
        }
    }

    pub fn as_array(&self) -> [f64; 2] {
        self.0
    }
}

/// A binary classifier over sparse feature vectors.
pub trait Classifier {
    /// Fits the classifier to the rows of [x] labeled by [y].
    fn fit(&mut self, x: &SparseMatrix, y: &[Label]) -> Result<(), ForestError>;

    /// Predicts the label of [x].
    fn predict(&self, x: &SparseVector) -> Result<Label, ForestError>;

    /// The probability of each label for [x].
    fn predict_proba(&self, x: &SparseVector) -> Result<Probabilities, ForestError>;

    /// The number of features the classifier was fitted with.
    fn n_features(&self) -> usize;

    fn predict_all(&self, x: &SparseMatrix) -> Result<Vec<Label>, ForestError> {
        x.rows().iter().map(|row| self.predict(row)).collect()
    }
}

#[cfg(test)]
mod test {
    use crate::label::Label;
    use super::Probabilities;

    #[test]
    fn ties_go_to_real() {
        assert_eq!(Label::Real, Probabilities::new(0.5, 0.5).most_likely());
        assert_eq!(Label::Fake, Probabilities::new(0.4, 0.6).most_likely());
        assert_eq!(Label::Real, Probabilities::from_weights([0.0, 0.0]).most_likely());
    }

    #[test]
    fn normalizes_weights() {
        let probabilities = Probabilities::from_weights([1.0, 3.0]);
        assert_eq!(0.25, probabilities.of(Label::Real));
        assert_eq!(0.75, probabilities.of(Label::Fake));
    }
}
