use rand::Rng;
use rand::seq::SliceRandom;

/// One node of a fitted tree, stored in a flat arena.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Class distribution of the training samples that reached this leaf.
    Leaf { distribution: Vec<f64> },
    /// `feature <= threshold` goes left, everything else right.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Growth limits shared by every tree of a forest.
#[derive(Debug, Clone)]
pub(super) struct TreeParams {
    pub n_classes: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: usize,
}

/// CART classification tree grown with Gini impurity.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

struct Pending {
    node: usize,
    samples: Vec<usize>,
    depth: usize,
}

struct Split {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl DecisionTree {
    /// Grow a tree over `samples` (indices into `x`/`y`, duplicates allowed).
    pub(super) fn grow<R: Rng>(
        x: &[Vec<f64>],
        y: &[usize],
        samples: Vec<usize>,
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let n_features = x.first().map_or(0, Vec::len);
        let mut nodes = vec![placeholder()];
        let mut stack = vec![Pending {
            node: 0,
            samples,
            depth: 0,
        }];

        while let Some(task) = stack.pop() {
            let counts = class_counts(y, &task.samples, params.n_classes);
            let depth_ok = params.max_depth.is_none_or(|max| task.depth < max);
            let splittable = depth_ok
                && task.samples.len() >= params.min_samples_split
                && gini(&counts, task.samples.len()) > f64::EPSILON;

            let split = if splittable {
                best_split(x, y, &task.samples, n_features, params, rng)
            } else {
                None
            };

            match split {
                Some(split) => {
                    let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = task
                        .samples
                        .iter()
                        .partition(|&&idx| x[idx][split.feature] <= split.threshold);
                    let left = nodes.len();
                    let right = left + 1;
                    nodes.push(placeholder());
                    nodes.push(placeholder());
                    nodes[task.node] = Node::Split {
                        feature: split.feature,
                        threshold: split.threshold,
                        left,
                        right,
                    };
                    stack.push(Pending {
                        node: right,
                        samples: right_samples,
                        depth: task.depth + 1,
                    });
                    stack.push(Pending {
                        node: left,
                        samples: left_samples,
                        depth: task.depth + 1,
                    });
                }
                None => {
                    nodes[task.node] = Node::Leaf {
                        distribution: distribution(&counts),
                    };
                }
            }
        }

        Self { nodes }
    }

    /// Walk the tree and return the reached leaf's class distribution.
    ///
    /// `None` when a split tests a feature index past the end of `features`.
    pub fn leaf_distribution(&self, features: &[f64]) -> Option<&[f64]> {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return Some(distribution),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = *features.get(*feature)?;
                    idx = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Longest root-to-leaf path, counted in edges.
    pub fn depth(&self) -> usize {
        let mut deepest = 0usize;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            match &self.nodes[idx] {
                Node::Leaf { .. } => deepest = deepest.max(depth),
                Node::Split { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }
        deepest
    }
}

fn placeholder() -> Node {
    Node::Leaf {
        distribution: Vec::new(),
    }
}

fn class_counts(y: &[usize], samples: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &idx in samples {
        counts[y[idx]] += 1;
    }
    counts
}

fn distribution(counts: &[usize]) -> Vec<f64> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![1.0 / counts.len() as f64; counts.len()];
    }
    counts.iter().map(|&c| c as f64 / total as f64).collect()
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

/// Search a random subset of features for the lowest weighted Gini split.
///
/// Constant features do not count against `max_features`; the search keeps
/// drawing until it has examined that many informative features or runs out.
fn best_split<R: Rng>(
    x: &[Vec<f64>],
    y: &[usize],
    samples: &[usize],
    n_features: usize,
    params: &TreeParams,
    rng: &mut R,
) -> Option<Split> {
    let mut order: Vec<usize> = (0..n_features).collect();
    order.shuffle(rng);

    let mut best: Option<Split> = None;
    let mut examined = 0usize;
    let mut pairs: Vec<(f64, usize)> = Vec::with_capacity(samples.len());
    for feature in order {
        if examined >= params.max_features && best.is_some() {
            break;
        }
        pairs.clear();
        pairs.extend(samples.iter().map(|&idx| (x[idx][feature], y[idx])));
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (first, last) = (pairs[0].0, pairs[pairs.len() - 1].0);
        if first == last {
            continue;
        }
        examined += 1;
        if let Some(candidate) = best_threshold(&pairs, feature, params)
            && best
                .as_ref()
                .is_none_or(|current| candidate.impurity < current.impurity)
        {
            best = Some(candidate);
        }
    }
    best
}

fn best_threshold(pairs: &[(f64, usize)], feature: usize, params: &TreeParams) -> Option<Split> {
    let n = pairs.len();
    let mut right_counts = vec![0usize; params.n_classes];
    for &(_, label) in pairs {
        right_counts[label] += 1;
    }
    let mut left_counts = vec![0usize; params.n_classes];

    let mut best: Option<Split> = None;
    for i in 0..n - 1 {
        let label = pairs[i].1;
        left_counts[label] += 1;
        right_counts[label] -= 1;
        let (value, next) = (pairs[i].0, pairs[i + 1].0);
        if value == next {
            continue;
        }
        let left_n = i + 1;
        let right_n = n - left_n;
        if left_n < params.min_samples_leaf || right_n < params.min_samples_leaf {
            continue;
        }
        let impurity = (left_n as f64 * gini(&left_counts, left_n)
            + right_n as f64 * gini(&right_counts, right_n))
            / n as f64;
        if best.as_ref().is_none_or(|current| impurity < current.impurity) {
            let mut threshold = value + (next - value) / 2.0;
            if threshold >= next {
                threshold = value;
            }
            best = Some(Split {
                feature,
                threshold,
                impurity,
            });
        }
    }
    best
}
