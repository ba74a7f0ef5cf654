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

use forest::Label;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use crate::config::SplitConfig;

#[derive(Debug, Error, PartialEq)]
pub enum SplitError {
    #[error("The test size has to be between 0 and 1 but is {0}!")]
    InvalidTestSize(f64),
    #[error("The class {label} has only {count} members, at least 2 are needed for a stratified split!")]
    TooFewMembers { label: Label, count: usize },
}

/// Row indices of the train and test set, both ascending.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Splits the rows labeled by [labels] into a train and test set while keeping
/// the label proportions.
///
/// The test set has `ceil(test_size * n)` rows, distributed over the labels by
/// the largest remainder. Every label keeps at least one row in each set.
pub fn stratified_split(labels: &[Label], cfg: &SplitConfig) -> Result<TrainTestSplit, SplitError> {
    if !(cfg.test_size > 0.0 && cfg.test_size < 1.0) {
        return Err(SplitError::InvalidTestSize(cfg.test_size));
    }
    let mut members: [Vec<usize>; 2] = Default::default();
    for (index, label) in labels.iter().enumerate() {
        members[label.index()].push(index);
    }
    for label in Label::ALL {
        let count = members[label.index()].len();
        if count < 2 {
            return Err(SplitError::TooFewMembers { label, count });
        }
    }

    let n_samples = labels.len();
    let n_test = (cfg.test_size * n_samples as f64).ceil() as usize;
    let quotas = [members[0].len(), members[1].len()].map(|count| n_test as f64 * count as f64 / n_samples as f64);
    let mut allocation = quotas.map(|quota| quota.floor() as usize);
    let mut missing = n_test.saturating_sub(allocation.iter().sum::<usize>());
    let mut by_remainder = Label::ALL;
    by_remainder.sort_by(|a, b| {
        let a = quotas[a.index()].fract();
        let b = quotas[b.index()].fract();
        b.total_cmp(&a)
    });
    for label in by_remainder {
        if missing == 0 {
            break;
        }
        allocation[label.index()] += 1;
        missing -= 1;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
    let mut split = TrainTestSplit::default();
    for label in Label::ALL {
        let rows = &mut members[label.index()];
        rows.shuffle(&mut rng);
        let n_test = allocation[label.index()].clamp(1, rows.len() - 1);
        split.test.extend_from_slice(&rows[..n_test]);
        split.train.extend_from_slice(&rows[n_test..]);
    }
    split.train.sort_unstable();
    split.test.sort_unstable();
    log::info!("Split into {} train and {} test samples.", split.train.len(), split.test.len());
    Ok(split)
}

#[cfg(test)]
mod test {
    use forest::Label;
    use forest::weights::class_counts;
    use crate::config::SplitConfig;
    use super::{stratified_split, SplitError};

    fn labels(real: usize, fake: usize) -> Vec<Label> {
        let mut labels = vec![Label::Real; real];
        labels.extend(std::iter::repeat(Label::Fake).take(fake));
        labels
    }

    #[test]
    fn keeps_proportions() {
        let labels = labels(80, 20);
        let split = stratified_split(&labels, &SplitConfig::default()).unwrap();
        assert_eq!(20, split.test.len());
        assert_eq!(80, split.train.len());
        let test_labels = split.test.iter().map(|index| labels[*index]).collect::<Vec<_>>();
        assert_eq!([16, 4], class_counts(&test_labels));
    }

    #[test]
    fn rounds_up_by_largest_remainder() {
        // n_test = ceil(0.2 * 13) = 3, quotas 1.846 and 1.154
        let labels = labels(8, 5);
        let split = stratified_split(&labels, &SplitConfig::default()).unwrap();
        let test_labels = split.test.iter().map(|index| labels[*index]).collect::<Vec<_>>();
        assert_eq!([2, 1], class_counts(&test_labels));
        assert_eq!(10, split.train.len());
    }

    #[test]
    fn is_a_seeded_partition() {
        let labels = labels(30, 17);
        let cfg = SplitConfig::default();
        let split = stratified_split(&labels, &cfg).unwrap();
        assert_eq!(split, stratified_split(&labels, &cfg).unwrap());

        let mut all = split.train.clone();
        all.extend_from_slice(&split.test);
        all.sort_unstable();
        assert_eq!((0..labels.len()).collect::<Vec<_>>(), all);

        let other = stratified_split(&labels, &SplitConfig { seed: 7, ..cfg }).unwrap();
        assert_eq!(split.test.len(), other.test.len());
    }

    #[test]
    fn rejects_degenerate_input() {
        assert_eq!(
            Err(SplitError::TooFewMembers { label: Label::Fake, count: 1 }),
            stratified_split(&labels(10, 1), &SplitConfig::default())
        );
        assert_eq!(
            Err(SplitError::InvalidTestSize(1.0)),
            stratified_split(&labels(10, 10), &SplitConfig { test_size: 1.0, seed: 1 })
        );
    }

    #[test]
    fn every_class_is_in_both_sets() {
        let labels = labels(2, 2);
        let split = stratified_split(&labels, &SplitConfig { test_size: 0.9, seed: 3 }).unwrap();
        let train = split.train.iter().map(|index| labels[*index]).collect::<Vec<_>>();
        let test = split.test.iter().map(|index| labels[*index]).collect::<Vec<_>>();
        assert_eq!([1, 1], class_counts(&train));
        assert_eq!([1, 1], class_counts(&test));
    }
}
