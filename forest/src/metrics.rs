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

//! Evaluation of binary predictions.

use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::error::ForestError;
use crate::label::Label;

/// Rows are the true labels, columns the predicted ones: `[[tn, fp], [fn, tp]]`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix(pub [[usize; 2]; 2]);

impl ConfusionMatrix {
    pub fn from_predictions(truth: &[Label], predicted: &[Label]) -> Result<Self, ForestError> {
        if truth.len() != predicted.len() {
            return Err(ForestError::LengthMismatch { samples: predicted.len(), labels: truth.len() });
        }
        let mut matrix = [[0usize; 2]; 2];
        for (actual, predicted) in truth.iter().zip(predicted) {
            matrix[actual.index()][predicted.index()] += 1;
        }
        Ok(Self(matrix))
    }

    #[inline]
    pub fn count(&self, actual: Label, predicted: Label) -> usize {
        self.0[actual.index()][predicted.index()]
    }

    pub fn total(&self) -> usize {
        self.0.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        Label::ALL.iter().map(|label| self.count(*label, *label)).sum()
    }
}

impl Display for ConfusionMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "[[{} {}]", self.0[0][0], self.0[0][1])?;
        write!(f, " [{} {}]]", self.0[1][0], self.0[1][1])
    }
}

/// The scores of a single class.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Divides or returns 0 for an empty denominator.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Per class precision, recall and f1 with accuracy and averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub confusion_matrix: ConfusionMatrix,
    /// Indexed by [Label::index]
    pub classes: [ClassMetrics; 2],
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    pub fn new(truth: &[Label], predicted: &[Label]) -> Result<Self, ForestError> {
        Ok(Self::from_confusion_matrix(ConfusionMatrix::from_predictions(truth, predicted)?))
    }

    pub fn from_confusion_matrix(confusion_matrix: ConfusionMatrix) -> Self {
        let classes = Label::ALL.map(|label| {
            let true_positive = confusion_matrix.count(label, label) as f64;
            let predicted = Label::ALL.iter().map(|actual| confusion_matrix.count(*actual, label)).sum::<usize>();
            let support = Label::ALL.iter().map(|other| confusion_matrix.count(label, *other)).sum::<usize>();
            let precision = ratio(true_positive, predicted as f64);
            let recall = ratio(true_positive, support as f64);
            let f1 = ratio(2.0 * precision * recall, precision + recall);
            ClassMetrics { precision, recall, f1, support }
        });
        let total = confusion_matrix.total();
        let accuracy = ratio(confusion_matrix.correct() as f64, total as f64);

        let n_classes = classes.len() as f64;
        let macro_avg = ClassMetrics {
            precision: classes.iter().map(|value| value.precision).sum::<f64>() / n_classes,
            recall: classes.iter().map(|value| value.recall).sum::<f64>() / n_classes,
            f1: classes.iter().map(|value| value.f1).sum::<f64>() / n_classes,
            support: total,
        };
        let weighted = |select: fn(&ClassMetrics) -> f64| {
            ratio(
                classes.iter().map(|value| select(value) * value.support as f64).sum::<f64>(),
                total as f64,
            )
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|value| value.precision),
            recall: weighted(|value| value.recall),
            f1: weighted(|value| value.f1),
            support: total,
        };

        Self { confusion_matrix, classes, accuracy, macro_avg, weighted_avg }
    }

    #[inline]
    pub fn class(&self, label: Label) -> &ClassMetrics {
        &self.classes[label.index()]
    }
}

impl Display for ClassificationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fn row(f: &mut Formatter<'_>, name: &str, metrics: &ClassMetrics) -> std::fmt::Result {
            writeln!(
                f,
                "{name:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                metrics.precision, metrics.recall, metrics.f1, metrics.support
            )
        }
        writeln!(f, "{:>12} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        for label in Label::ALL {
            row(f, label.name(), self.class(label))?;
        }
        writeln!(f)?;
        writeln!(f, "{:>12} {:>9} {:>9} {:>9.2} {:>9}", "accuracy", "", "", self.accuracy, self.macro_avg.support)?;
        row(f, "macro avg", &self.macro_avg)?;
        row(f, "weighted avg", &self.weighted_avg)?;
        writeln!(f)?;
        writeln!(f, "Confusion matrix:")?;
        write!(f, "{}", self.confusion_matrix)
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;
    use crate::label::Label::{Fake, Real};
    use super::{ClassificationReport, ConfusionMatrix};

    #[test]
    fn confusion_matrix_layout() {
        let truth = [Real, Real, Real, Fake, Fake];
        let predicted = [Real, Fake, Real, Fake, Real];
        let matrix = ConfusionMatrix::from_predictions(&truth, &predicted).unwrap();
        assert_eq!([[2, 1], [1, 1]], matrix.0);
        assert_eq!(5, matrix.total());
        assert_eq!(3, matrix.correct());
        assert_eq!("[[2 1]\n [1 1]]", matrix.to_string());
        assert!(ConfusionMatrix::from_predictions(&truth, &predicted[..2]).is_err());
    }

    #[test]
    fn report_scores() {
        let truth = [Real, Real, Real, Fake, Fake];
        let predicted = [Real, Fake, Real, Fake, Real];
        let report = ClassificationReport::new(&truth, &predicted).unwrap();
        assert_approx_eq!(f64, 0.6, report.accuracy);
        assert_approx_eq!(f64, 2.0 / 3.0, report.class(Real).precision);
        assert_approx_eq!(f64, 2.0 / 3.0, report.class(Real).recall);
        assert_approx_eq!(f64, 0.5, report.class(Fake).precision);
        assert_approx_eq!(f64, 0.5, report.class(Fake).f1);
        assert_eq!(3, report.class(Real).support);
        assert_approx_eq!(f64, (2.0 / 3.0 + 0.5) / 2.0, report.macro_avg.f1, epsilon = 1e-12);
        assert_approx_eq!(f64, (2.0 / 3.0 * 3.0 + 0.5 * 2.0) / 5.0, report.weighted_avg.f1, epsilon = 1e-12);
        assert_eq!(5, report.weighted_avg.support);
    }

    #[test]
    fn zero_division_gives_zero() {
        let report = ClassificationReport::new(&[Real, Real], &[Real, Real]).unwrap();
        assert_eq!(0.0, report.class(Fake).precision);
        assert_eq!(0.0, report.class(Fake).f1);
        assert_eq!(1.0, report.accuracy);
        let rendered = report.to_string();
        assert!(rendered.contains("precision"));
        assert!(rendered.contains("weighted avg"));
    }
}
