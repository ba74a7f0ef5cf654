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

use crate::config::ClassWeight;
use crate::label::Label;

/// Counts the samples per label.
pub fn class_counts(labels: &[Label]) -> [usize; 2] {
    let mut counts = [0usize; 2];
    for label in labels {
        counts[label.index()] += 1;
    }
    counts
}

/// The weight of a sample of each label.
/// Labels without samples get a weight of 0.
pub fn class_weights(kind: ClassWeight, labels: &[Label]) -> [f64; 2] {
    match kind {
        ClassWeight::Uniform => [1.0, 1.0],
        ClassWeight::Balanced => {
            let counts = class_counts(labels);
            let n_samples = labels.len() as f64;
            let n_classes = Label::ALL.len() as f64;
            counts.map(|count| {
                if count == 0 {
                    0.0
                } else {
                    n_samples / (n_classes * count as f64)
                }
            })
        }
    }
}

#[cfg(test)]
mod test {
    use crate::config::ClassWeight;
    use crate::label::Label;
    use super::{class_counts, class_weights};

    #[test]
    fn balanced_weights() {
        let labels = [Label::Real, Label::Real, Label::Real, Label::Fake];
        assert_eq!([3, 1], class_counts(&labels));
        assert_eq!([4.0 / 6.0, 2.0], class_weights(ClassWeight::Balanced, &labels));
        assert_eq!([1.0, 1.0], class_weights(ClassWeight::Uniform, &labels));
    }

    #[test]
    fn balanced_classes_weigh_the_same() {
        let labels = [Label::Real, Label::Fake, Label::Fake, Label::Real];
        assert_eq!([1.0, 1.0], class_weights(ClassWeight::Balanced, &labels));
    }
}
