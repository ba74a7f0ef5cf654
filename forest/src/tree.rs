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

//! CART decision tree over sparse feature vectors.

use std::ops::Range;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use text_processing::SparseVector;
use crate::label::Label;
use crate::traits::Probabilities;

/// Nodes with a lower impurity are not split.
const MIN_IMPURITY: f64 = 1e-7;

/// The growth limits of a single tree.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Number of non-constant features evaluated per split
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// The weighted class distribution of the training samples in the leaf.
    Leaf { distribution: Probabilities },
    /// Samples with `value <= threshold` go to [left].
    Split { feature: u32, threshold: f64, left: u32, right: u32 },
}

/// A fitted decision tree. The root is the first node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DecisionTreeRecord")]
pub struct DecisionTree {
    n_features: usize,
    nodes: Vec<Node>,
}

#[derive(Deserialize)]
struct DecisionTreeRecord {
    n_features: usize,
    nodes: Vec<Node>,
}

impl TryFrom<DecisionTreeRecord> for DecisionTree {
    type Error = String;

    fn try_from(value: DecisionTreeRecord) -> Result<Self, Self::Error> {
        if value.nodes.is_empty() {
            return Err("A tree needs at least one node.".to_string());
        }
        let len = value.nodes.len();
        for (index, node) in value.nodes.iter().enumerate() {
            if let Node::Split { feature, left, right, .. } = node {
                let valid_child = |child: u32| (child as usize) > index && (child as usize) < len;
                if !valid_child(*left) || !valid_child(*right) {
                    return Err(format!("The node {index} points to an invalid child."));
                }
                if *feature as usize >= value.n_features {
                    return Err(format!("The node {index} splits on the unknown feature {feature}."));
                }
            }
        }
        Ok(Self { n_features: value.n_features, nodes: value.nodes })
    }
}

/// A node waiting to be grown.
struct Task {
    node: usize,
    samples: Vec<usize>,
    depth: usize,
}

struct Split {
    feature: u32,
    threshold: f64,
}

/// The rows of the training data in a node, by value.
struct Bin {
    value: f64,
    weights: [f64; 2],
    count: usize,
}

/// Weighted gini impurity of a class distribution.
fn gini(weights: [f64; 2]) -> f64 {
    let total = weights[0] + weights[1];
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - weights.iter().map(|value| (value / total).powi(2)).sum::<f64>()
}

/// Increases with a decreasing weighted impurity of the children.
fn proxy_improvement(left: [f64; 2], right: [f64; 2]) -> f64 {
    let squared = |weights: [f64; 2]| {
        let total = weights[0] + weights[1];
        if total <= 0.0 {
            0.0
        } else {
            (weights[0] * weights[0] + weights[1] * weights[1]) / total
        }
    };
    squared(left) + squared(right)
}

struct TreeBuilder<'a> {
    rows: &'a [SparseVector],
    labels: &'a [Label],
    sample_weights: &'a [f64],
    params: &'a TreeParams,
}

impl<'a> TreeBuilder<'a> {
    fn class_weights(&self, samples: &[usize]) -> [f64; 2] {
        let mut weights = [0.0; 2];
        for &sample in samples {
            weights[self.labels[sample].index()] += self.sample_weights[sample];
        }
        weights
    }

    fn build(&self, n_features: usize, rng: &mut ChaCha8Rng) -> DecisionTree {
        let samples = (0..self.rows.len())
            .filter(|sample| self.sample_weights[*sample] > 0.0)
            .collect();
        let mut nodes = vec![Node::Leaf { distribution: Probabilities::default() }];
        let mut tasks = vec![Task { node: 0, samples, depth: 0 }];
        while let Some(task) = tasks.pop() {
            let weights = self.class_weights(&task.samples);
            let n_samples = task.samples.len();
            let can_split = task.depth < self.params.max_depth
                && n_samples >= self.params.min_samples_split
                && n_samples >= 2 * self.params.min_samples_leaf
                && gini(weights) > MIN_IMPURITY;
            let split = if can_split {
                self.find_best_split(&task.samples, weights, rng)
            } else {
                None
            };
            match split {
                None => {
                    nodes[task.node] = Node::Leaf { distribution: Probabilities::from_weights(weights) };
                }
                Some(Split { feature, threshold }) => {
                    let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = task.samples
                        .iter()
                        .partition(|sample| self.rows[**sample].get(feature) <= threshold);
                    let left = nodes.len();
                    let right = left + 1;
                    nodes.push(Node::Leaf { distribution: Probabilities::default() });
                    nodes.push(Node::Leaf { distribution: Probabilities::default() });
                    nodes[task.node] = Node::Split { feature, threshold, left: left as u32, right: right as u32 };
                    tasks.push(Task { node: right, samples: right_samples, depth: task.depth + 1 });
                    tasks.push(Task { node: left, samples: left_samples, depth: task.depth + 1 });
                }
            }
        }
        DecisionTree { n_features, nodes }
    }

    /// Draws features in random order until [TreeParams::max_features] non-constant
    /// features were evaluated. Features without a non-zero value in the node are
    /// constant and never drawn.
    fn find_best_split(&self, samples: &[usize], totals: [f64; 2], rng: &mut ChaCha8Rng) -> Option<Split> {
        let mut entries = samples
            .iter()
            .flat_map(|&sample| self.rows[sample].iter().map(move |(feature, value)| (feature, value, sample)))
            .collect::<Vec<_>>();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)).then(a.2.cmp(&b.2)));

        let mut groups: Vec<Range<usize>> = Vec::new();
        for (position, entry) in entries.iter().enumerate() {
            match groups.last_mut() {
                Some(group) if entries[group.start].0 == entry.0 => group.end = position + 1,
                _ => groups.push(position..position + 1),
            }
        }

        let mut best: Option<(f64, Split)> = None;
        let mut evaluated = 0;
        let mut drawn = 0;
        while drawn < groups.len() && evaluated < self.params.max_features {
            let pick = rng.gen_range(drawn..groups.len());
            groups.swap(drawn, pick);
            let group = &entries[groups[drawn].clone()];
            drawn += 1;

            let zero_count = samples.len() - group.len();
            let is_constant = zero_count == 0 && group[0].1 == group[group.len() - 1].1;
            if is_constant {
                continue;
            }
            evaluated += 1;

            let feature = group[0].0;
            let bins = self.bins(group, zero_count, totals);
            if let Some((improvement, threshold)) = self.best_threshold(&bins, samples.len(), totals) {
                if best.as_ref().map_or(true, |(current, _)| improvement > *current) {
                    best = Some((improvement, Split { feature, threshold }));
                }
            }
        }
        best.map(|(_, split)| split)
    }

    /// Groups the values of a feature in ascending order, the implicit zeros included.
    fn bins(&self, group: &[(u32, f64, usize)], zero_count: usize, totals: [f64; 2]) -> Vec<Bin> {
        let mut zero_weights = totals;
        for &(_, _, sample) in group {
            let class = self.labels[sample].index();
            zero_weights[class] = (zero_weights[class] - self.sample_weights[sample]).max(0.0);
        }
        let mut zero_bin = (zero_count > 0).then_some(Bin { value: 0.0, weights: zero_weights, count: zero_count });

        let mut bins: Vec<Bin> = Vec::new();
        for &(_, value, sample) in group {
            if value > 0.0 {
                if let Some(zero) = zero_bin.take() {
                    bins.push(zero);
                }
            }
            let class = self.labels[sample].index();
            let weight = self.sample_weights[sample];
            match bins.last_mut() {
                Some(last) if last.value == value => {
                    last.weights[class] += weight;
                    last.count += 1;
                }
                _ => {
                    let mut weights = [0.0; 2];
                    weights[class] = weight;
                    bins.push(Bin { value, weights, count: 1 });
                }
            }
        }
        if let Some(zero) = zero_bin {
            bins.push(zero);
        }
        bins
    }

    /// The best threshold between two neighbouring bins that leaves at least
    /// [TreeParams::min_samples_leaf] samples on both sides.
    fn best_threshold(&self, bins: &[Bin], n_samples: usize, totals: [f64; 2]) -> Option<(f64, f64)> {
        let mut left = [0.0; 2];
        let mut left_count = 0;
        let mut best: Option<(f64, f64)> = None;
        for (current, next) in bins.iter().zip(bins.iter().skip(1)) {
            left[0] += current.weights[0];
            left[1] += current.weights[1];
            left_count += current.count;
            let right_count = n_samples - left_count;
            if left_count < self.params.min_samples_leaf || right_count < self.params.min_samples_leaf {
                continue;
            }
            let right = [(totals[0] - left[0]).max(0.0), (totals[1] - left[1]).max(0.0)];
            let improvement = proxy_improvement(left, right);
            if best.map_or(true, |(current, _)| improvement > current) {
                let mut threshold = (current.value + next.value) / 2.0;
                if threshold >= next.value {
                    threshold = current.value;
                }
                best = Some((improvement, threshold));
            }
        }
        best
    }
}

impl DecisionTree {
    /// Grows a tree over [rows]. Rows with a sample weight of 0 are ignored.
    pub fn fit(rows: &[SparseVector], labels: &[Label], sample_weights: &[f64], n_features: usize, params: &TreeParams, rng: &mut ChaCha8Rng) -> Self {
        TreeBuilder { rows, labels, sample_weights, params }.build(n_features, rng)
    }

    /// The class distribution of the leaf reached by [x].
    pub fn predict_proba(&self, x: &SparseVector) -> Probabilities {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { distribution } => return *distribution,
                Node::Split { feature, threshold, left, right } => {
                    index = if x.get(*feature) <= *threshold { *left } else { *right } as usize;
                }
            }
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|node| matches!(node, Node::Leaf { .. })).count()
    }

    /// The number of splits on the longest path from the root to a leaf.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((index, level)) = stack.pop() {
            depth = depth.max(level);
            if let Node::Split { left, right, .. } = &self.nodes[index] {
                stack.push((*left as usize, level + 1));
                stack.push((*right as usize, level + 1));
            }
        }
        depth
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use text_processing::SparseVector;
    use crate::label::Label;
    use super::{DecisionTree, Node, TreeParams};

    fn params() -> TreeParams {
        TreeParams {
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: 3,
        }
    }

    fn data() -> (Vec<SparseVector>, Vec<Label>) {
        let rows = vec![
            SparseVector::from_dense(&[0.0, 1.0, 0.0]),
            SparseVector::from_dense(&[0.0, 0.5, 0.0]),
            SparseVector::from_dense(&[0.0, 0.0, 0.3]),
            SparseVector::from_dense(&[0.9, 0.0, 0.0]),
            SparseVector::from_dense(&[0.7, 0.0, 0.2]),
            SparseVector::from_dense(&[0.8, 0.1, 0.0]),
        ];
        let labels = vec![Label::Real, Label::Real, Label::Real, Label::Fake, Label::Fake, Label::Fake];
        (rows, labels)
    }

    #[test]
    fn separates_on_the_informative_feature() {
        let (rows, labels) = data();
        let weights = vec![1.0; rows.len()];
        let tree = DecisionTree::fit(&rows, &labels, &weights, 3, &params(), &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(1, tree.depth());
        assert_eq!(2, tree.n_leaves());
        match &tree.nodes()[0] {
            Node::Split { feature, threshold, .. } => {
                assert_eq!(0, *feature);
                assert_eq!(0.35, *threshold);
            }
            other => panic!("Expected a split but got {other:?}"),
        }
        for (row, label) in rows.iter().zip(&labels) {
            assert_eq!(1.0, tree.predict_proba(row).of(*label));
        }
        assert_eq!(Label::Fake, tree.predict_proba(&SparseVector::from_dense(&[0.5, 0.0, 0.0])).most_likely());
    }

    #[test]
    fn respects_min_samples_leaf() {
        let rows = vec![
            SparseVector::from_dense(&[1.0]),
            SparseVector::zeros(1),
            SparseVector::zeros(1),
            SparseVector::zeros(1),
        ];
        let labels = vec![Label::Fake, Label::Real, Label::Real, Label::Real];
        let weights = vec![1.0; 4];
        let params = TreeParams { min_samples_leaf: 2, ..params() };
        let tree = DecisionTree::fit(&rows, &labels, &weights, 1, &params, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(1, tree.n_nodes());
        assert_eq!(0.25, tree.predict_proba(&rows[0]).of(Label::Fake));
    }

    #[test]
    fn leaves_hold_the_weighted_distribution() {
        let (rows, labels) = data();
        let weights = vec![1.0, 1.0, 1.0, 3.0, 0.0, 0.0];
        let params = TreeParams { max_depth: 1, max_features: 1, ..params() };
        let tree = DecisionTree::fit(&rows, &labels, &weights, 3, &params, &mut ChaCha8Rng::seed_from_u64(7));
        let mut total = [0.0; 2];
        for row in &rows[..4] {
            let probabilities = tree.predict_proba(row);
            assert!((probabilities.of(Label::Real) + probabilities.of(Label::Fake) - 1.0).abs() < 1e-12);
            total[0] += probabilities.of(Label::Real);
            total[1] += probabilities.of(Label::Fake);
        }
        assert!(total[1] > 0.0);
    }

    #[test]
    fn stops_at_max_depth() {
        let rows = (0..16).map(|value| SparseVector::from_dense(&[value as f64 + 1.0])).collect::<Vec<_>>();
        let labels = (0..16).map(|value| if value % 2 == 0 { Label::Real } else { Label::Fake }).collect::<Vec<_>>();
        let weights = vec![1.0; 16];
        let params = TreeParams { max_depth: 2, ..params() };
        let tree = DecisionTree::fit(&rows, &labels, &weights, 1, &params, &mut ChaCha8Rng::seed_from_u64(3));
        assert!(tree.depth() <= 2);
    }

    #[test]
    fn is_deterministic_and_serializable() {
        let (rows, labels) = data();
        let weights = vec![1.0; rows.len()];
        let params = TreeParams { max_features: 1, ..params() };
        let a = DecisionTree::fit(&rows, &labels, &weights, 3, &params, &mut ChaCha8Rng::seed_from_u64(11));
        let b = DecisionTree::fit(&rows, &labels, &weights, 3, &params, &mut ChaCha8Rng::seed_from_u64(11));
        assert_eq!(a, b);
        let decoded: DecisionTree = bincode::deserialize(&bincode::serialize(&a).unwrap()).unwrap();
        assert_eq!(a, decoded);
    }

    #[test]
    fn rejects_corrupt_trees() {
        let json = r#"{"n_features": 1, "nodes": [{"Split": {"feature": 0, "threshold": 0.5, "left": 0, "right": 1}}]}"#;
        assert!(serde_json::from_str::<DecisionTree>(json).is_err());
        let json = r#"{"n_features": 1, "nodes": []}"#;
        assert!(serde_json::from_str::<DecisionTree>(json).is_err());
    }
}
