use mlh_core::FOREST_MIN_IMPURITY_DECREASE;
use mlh_core::Feature;
use mlh_core::Probability;
use rand::rngs::SmallRng;

/// One node of a flattened classification tree.
///
/// Rows with `row[feature] <= threshold` descend left.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Node {
    Split {
        feature: usize,
        threshold: Feature,
        left: usize,
        right: usize,
    },
    Leaf {
        proba: Vec<Probability>,
    },
}

/// Stopping rules and feature sampling for a single tree.
#[derive(Debug, Clone, Copy)]
pub struct Growth {
    pub max_depth: Option<usize>,
    pub min_split: usize,
    pub min_leaf: usize,
    pub max_features: usize,
}

/// CART classification tree grown on Gini impurity.
///
/// Nodes are stored in a flat vector with the root at index 0, so the tree
/// serializes as a plain list and prediction is an index walk.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

/// Pending node awaiting a split decision during growth.
struct Task {
    node: usize,
    depth: usize,
    samples: Vec<usize>,
}

/// Best split found for a node.
struct Cut {
    feature: usize,
    threshold: Feature,
    impurity: Probability,
}

impl Tree {
    /// Grow a tree over `samples` (indices into `x`, repeats allowed).
    /// `y` holds class positions in `0..k`.
    pub fn grow(
        x: &[Vec<Feature>],
        y: &[usize],
        k: usize,
        samples: Vec<usize>,
        growth: &Growth,
        rng: &mut SmallRng,
    ) -> Self {
        let ref grower = Grower { x, y, k, growth };
        let mut nodes = vec![Node::Leaf { proba: vec![] }];
        let mut stack = vec![Task {
            node: 0,
            depth: 0,
            samples,
        }];
        while let Some(task) = stack.pop() {
            let counts = grower.counts(&task.samples);
            let n = task.samples.len();
            let cut = if grower.splittable(&counts, n, task.depth) {
                grower.cut(&task.samples, &counts, rng)
            } else {
                None
            };
            match cut {
                None => nodes[task.node] = Node::Leaf {
                    proba: counts.iter().map(|&c| c as Probability / n as Probability).collect(),
                },
                Some(cut) => {
                    let (lhs, rhs) = task
                        .samples
                        .into_iter()
                        .partition::<Vec<usize>, _>(|&i| x[i][cut.feature] <= cut.threshold);
                    let left = nodes.len();
                    let right = left + 1;
                    nodes.push(Node::Leaf { proba: vec![] });
                    nodes.push(Node::Leaf { proba: vec![] });
                    nodes[task.node] = Node::Split {
                        feature: cut.feature,
                        threshold: cut.threshold,
                        left,
                        right,
                    };
                    stack.push(Task {
                        node: right,
                        depth: task.depth + 1,
                        samples: rhs,
                    });
                    stack.push(Task {
                        node: left,
                        depth: task.depth + 1,
                        samples: lhs,
                    });
                }
            }
        }
        Self { nodes }
    }

    /// Class probabilities at the leaf this row lands in.
    pub fn proba(&self, row: &[Feature]) -> &[Probability] {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                Node::Leaf { proba } => return proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => i = if row[*feature] <= *threshold { *left } else { *right },
            }
        }
    }
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
    pub fn leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }
    /// Longest root-to-leaf path, counted in edges.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((i, d)) = stack.pop() {
            deepest = deepest.max(d);
            if let Node::Split { left, right, .. } = &self.nodes[i] {
                stack.push((*left, d + 1));
                stack.push((*right, d + 1));
            }
        }
        deepest
    }
}

struct Grower<'a> {
    x: &'a [Vec<Feature>],
    y: &'a [usize],
    k: usize,
    growth: &'a Growth,
}

impl Grower<'_> {
    fn counts(&self, samples: &[usize]) -> Vec<usize> {
        samples.iter().fold(vec![0; self.k], |mut counts, &i| {
            counts[self.y[i]] += 1;
            counts
        })
    }

    fn splittable(&self, counts: &[usize], n: usize, depth: usize) -> bool {
        n >= self.growth.min_split
            && n >= 2 * self.growth.min_leaf
            && self.growth.max_depth.map_or(true, |d| depth < d)
            && counts.iter().filter(|&&c| c > 0).count() > 1
    }

    /// Lowest weighted child impurity over a random subset of features.
    fn cut(&self, samples: &[usize], counts: &[usize], rng: &mut SmallRng) -> Option<Cut> {
        let n = samples.len();
        let width = self.x[0].len();
        let parent = gini(counts, n);
        let mut best: Option<Cut> = None;
        let features = rand::seq::index::sample(rng, width, self.growth.max_features.min(width));
        for feature in features.into_vec() {
            let mut order = samples.to_vec();
            order.sort_by(|&a, &b| self.x[a][feature].total_cmp(&self.x[b][feature]));
            let mut left = vec![0; self.k];
            for i in 0..n - 1 {
                left[self.y[order[i]]] += 1;
                let lo = self.x[order[i]][feature];
                let hi = self.x[order[i + 1]][feature];
                let nl = i + 1;
                let nr = n - nl;
                if lo >= hi || nl < self.growth.min_leaf || nr < self.growth.min_leaf {
                    continue;
                }
                let right = counts
                    .iter()
                    .zip(left.iter())
                    .map(|(total, l)| total - l)
                    .collect::<Vec<_>>();
                let impurity = (nl as Probability * gini(&left, nl)
                    + nr as Probability * gini(&right, nr))
                    / n as Probability;
                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    let mid = lo + (hi - lo) / 2.0;
                    best = Some(Cut {
                        feature,
                        threshold: if mid < hi { mid } else { lo },
                        impurity,
                    });
                }
            }
        }
        best.filter(|cut| cut.impurity < parent - FOREST_MIN_IMPURITY_DECREASE)
    }
}

/// Gini impurity of a class histogram over `n` samples.
pub fn gini(counts: &[usize], n: usize) -> Probability {
    if n == 0 {
        return 0.0;
    }
    let n = n as Probability;
    1.0 - counts
        .iter()
        .map(|&c| c as Probability / n)
        .map(|p| p * p)
        .sum::<Probability>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn growth() -> Growth {
        Growth {
            max_depth: None,
            min_split: 2,
            min_leaf: 1,
            max_features: usize::MAX,
        }
    }

    #[test]
    fn gini_of_pure_and_even() {
        assert_eq!(gini(&[4, 0], 4), 0.0);
        assert!((gini(&[2, 2], 4) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn separable_data_fits_exactly() {
        let x = vec![vec![1.0], vec![2.0], vec![10.0], vec![11.0]];
        let y = vec![0, 0, 1, 1];
        let ref mut rng = SmallRng::seed_from_u64(0);
        let tree = Tree::grow(&x, &y, 2, (0..4).collect(), &growth(), rng);
        assert_eq!(tree.leaves(), 2);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.proba(&[0.0]), &[1.0, 0.0]);
        assert_eq!(tree.proba(&[100.0]), &[0.0, 1.0]);
        match &tree.nodes()[0] {
            Node::Split { threshold, .. } => assert_eq!(*threshold, 6.0),
            Node::Leaf { .. } => panic!("root should split"),
        }
    }

    #[test]
    fn depth_limit_is_respected() {
        let x = (0..16).map(|i| vec![i as f64]).collect::<Vec<_>>();
        let y = (0..16).map(|i| i % 2).collect::<Vec<_>>();
        let ref mut rng = SmallRng::seed_from_u64(7);
        let limited = Growth {
            max_depth: Some(2),
            ..growth()
        };
        let tree = Tree::grow(&x, &y, 2, (0..16).collect(), &limited, rng);
        assert!(tree.depth() <= 2);
    }

    #[test]
    fn constant_features_make_a_leaf() {
        let x = vec![vec![1.0], vec![1.0], vec![1.0]];
        let y = vec![0, 1, 1];
        let ref mut rng = SmallRng::seed_from_u64(1);
        let tree = Tree::grow(&x, &y, 2, (0..3).collect(), &growth(), rng);
        assert_eq!(tree.leaves(), 1);
        let proba = tree.proba(&[1.0]);
        assert!((proba[1] - 2.0 / 3.0).abs() < 1e-12);
    }
}
