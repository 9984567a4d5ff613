//! Decision trees over a key set.
//!
//! A tree is built once from an immutable key set and then walked, either by
//! the emitter to produce code or by [`Decision::classify`] to evaluate it
//! directly. Every key of the original set lands in exactly one leaf.
//!
//! ```text
//!             LengthSwitch
//!            /     |      \
//!        len 3   len 4   len 5
//!          │       │       │
//!       Branch   Leaf   Branch ── s[i] <= c ? then : else
//!       /    \           /    \
//!    Leaf   Leaf      Leaf   Leaf ── linear equality tests
//! ```

use indexmap::IndexMap;
use tracing::debug;

use crate::partition::{choose_best_position, split_keys, SplitPoint};

/// A node of the decision tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Test one byte position against a threshold.
    Branch(Branch),
    /// Dispatch on the exact input length.
    LengthSwitch(LengthSwitch),
    /// Compare the input against each candidate in turn.
    Leaf(Leaf),
}

/// Internal node: keys admitted by `point` go to `then_branch`, the rest to
/// `else_branch`. Both sides always hold at least one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    point: SplitPoint,
    then_branch: Box<Decision>,
    else_branch: Box<Decision>,
}

impl Branch {
    /// # Panics
    ///
    /// Panics if either side holds no keys.
    pub fn new(point: SplitPoint, then_branch: Decision, else_branch: Decision) -> Self {
        assert!(
            then_branch.key_count() > 0 && else_branch.key_count() > 0,
            "branch on position {} has an empty side",
            point.position
        );
        Branch {
            point,
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    pub fn point(&self) -> SplitPoint {
        self.point
    }

    pub fn then_branch(&self) -> &Decision {
        &self.then_branch
    }

    pub fn else_branch(&self) -> &Decision {
        &self.else_branch
    }
}

/// Top-level dispatch by exact length. Cases keep first-encountered order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LengthSwitch {
    cases: IndexMap<usize, Decision>,
}

impl LengthSwitch {
    pub fn cases(&self) -> impl Iterator<Item = (usize, &Decision)> {
        self.cases.iter().map(|(len, node)| (*len, node))
    }

    pub fn case(&self, len: usize) -> Option<&Decision> {
        self.cases.get(&len)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// Terminal node. Holds more than one candidate only when no position
/// discriminates between them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaf {
    candidates: Vec<String>,
}

impl Leaf {
    pub fn new(candidates: Vec<String>) -> Self {
        Leaf { candidates }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }
}

/// Shape summary of a tree, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub keys: usize,
    pub branches: usize,
    pub leaves: usize,
    /// Largest number of candidates in a single leaf.
    pub widest_leaf: usize,
    /// Largest number of byte comparisons on any root-to-leaf path.
    pub max_branch_depth: usize,
}

impl Decision {
    /// Evaluate the tree on `input`, returning the matching key.
    ///
    /// Follows the same control flow the emitted code does.
    pub fn classify(&self, input: &str) -> Option<&str> {
        match self {
            Decision::Branch(branch) => {
                if branch.point.admits(input.as_bytes()) {
                    branch.then_branch.classify(input)
                } else {
                    branch.else_branch.classify(input)
                }
            }
            Decision::LengthSwitch(switch) => switch.case(input.len())?.classify(input),
            Decision::Leaf(leaf) => leaf
                .candidates
                .iter()
                .find(|candidate| candidate.as_str() == input)
                .map(String::as_str),
        }
    }

    /// All keys held by the tree's leaves, in pre-order.
    pub fn keys(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_keys(&mut out);
        out
    }

    fn collect_keys<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Decision::Branch(branch) => {
                branch.then_branch.collect_keys(out);
                branch.else_branch.collect_keys(out);
            }
            Decision::LengthSwitch(switch) => {
                for node in switch.cases.values() {
                    node.collect_keys(out);
                }
            }
            Decision::Leaf(leaf) => out.extend(leaf.candidates.iter().map(String::as_str)),
        }
    }

    pub fn key_count(&self) -> usize {
        match self {
            Decision::Branch(branch) => {
                branch.then_branch.key_count() + branch.else_branch.key_count()
            }
            Decision::LengthSwitch(switch) => switch.cases.values().map(Decision::key_count).sum(),
            Decision::Leaf(leaf) => leaf.candidates.len(),
        }
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        self.accumulate(0, &mut stats);
        stats
    }

    fn accumulate(&self, depth: usize, stats: &mut TreeStats) {
        match self {
            Decision::Branch(branch) => {
                stats.branches += 1;
                branch.then_branch.accumulate(depth + 1, stats);
                branch.else_branch.accumulate(depth + 1, stats);
            }
            Decision::LengthSwitch(switch) => {
                for node in switch.cases.values() {
                    node.accumulate(depth, stats);
                }
            }
            Decision::Leaf(leaf) => {
                stats.leaves += 1;
                stats.keys += leaf.candidates.len();
                stats.widest_leaf = stats.widest_leaf.max(leaf.candidates.len());
                stats.max_branch_depth = stats.max_branch_depth.max(depth);
            }
        }
    }
}

/// Recursively partition `keys` into a tree of branches and leaves.
pub fn build(keys: Vec<String>) -> Decision {
    if keys.len() <= 1 {
        return Decision::Leaf(Leaf::new(keys));
    }

    let Some(point) = choose_best_position(&keys) else {
        debug!(candidates = keys.len(), "no discriminating position, falling back to linear scan");
        return Decision::Leaf(Leaf::new(keys));
    };

    let (then_keys, else_keys) = split_keys(keys, point);
    if then_keys.is_empty() || else_keys.is_empty() {
        let mut keys = then_keys;
        keys.extend(else_keys);
        return Decision::Leaf(Leaf::new(keys));
    }

    Decision::Branch(Branch::new(point, build(then_keys), build(else_keys)))
}

/// Build the top-level tree: a [`LengthSwitch`] with one subtree per distinct
/// key length, or an empty leaf for an empty key set.
pub fn build_top(keys: Vec<String>) -> Decision {
    if keys.is_empty() {
        return build(keys);
    }

    let mut by_len: IndexMap<usize, Vec<String>> = IndexMap::new();
    for key in keys {
        by_len.entry(key.len()).or_default().push(key);
    }

    let cases = by_len
        .into_iter()
        .map(|(len, group)| (len, build(group)))
        .collect();
    Decision::LengthSwitch(LengthSwitch { cases })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_build_trivial_sets_are_leaves() {
        assert_eq!(build(vec![]), Decision::Leaf(Leaf::default()));
        assert_eq!(build(owned(&["x"])), Decision::Leaf(Leaf::new(owned(&["x"]))));
    }

    #[test]
    fn test_build_pair_branches_on_first_difference() {
        let tree = build(owned(&["ab", "ac"]));
        let Decision::Branch(branch) = &tree else {
            panic!("expected a branch, got {:?}", tree);
        };
        assert_eq!(branch.point(), SplitPoint::new(1, Some(b'b')));
        assert_eq!(branch.then_branch().keys(), vec!["ab"]);
        assert_eq!(branch.else_branch().keys(), vec!["ac"]);
    }

    #[test]
    fn test_build_identical_keys_fall_back_to_leaf() {
        // Indistinguishable at every position.
        let tree = build(owned(&["dup", "dup"]));
        assert_eq!(tree, Decision::Leaf(Leaf::new(owned(&["dup", "dup"]))));
    }

    #[test]
    fn test_build_top_groups_by_length() {
        let tree = build_top(owned(&["a", "bb", "cc", "d"]));
        let Decision::LengthSwitch(switch) = &tree else {
            panic!("expected a length switch, got {:?}", tree);
        };
        let lengths: Vec<usize> = switch.cases().map(|(len, _)| len).collect();
        assert_eq!(lengths, vec![1, 2]);
        assert_eq!(switch.len(), 2);
        assert!(!switch.is_empty());
        assert_eq!(switch.case(3), None);

        let mut ones = switch.case(1).expect("length 1").keys();
        ones.sort_unstable();
        assert_eq!(ones, vec!["a", "d"]);

        let mut twos = switch.case(2).expect("length 2").keys();
        twos.sort_unstable();
        assert_eq!(twos, vec!["bb", "cc"]);
    }

    #[test]
    fn test_build_top_empty_set() {
        let tree = build_top(vec![]);
        assert_eq!(tree, Decision::Leaf(Leaf::default()));
        assert_eq!(tree.classify(""), None);
        assert_eq!(tree.classify("anything"), None);
    }

    #[test]
    fn test_classify_colours() {
        let tree = build_top(owned(&["red", "green", "blue"]));
        assert_eq!(tree.classify("red"), Some("red"));
        assert_eq!(tree.classify("green"), Some("green"));
        assert_eq!(tree.classify("blue"), Some("blue"));
        for miss in ["purple", "re", "", "greenish", "rad", "bleu"] {
            assert_eq!(tree.classify(miss), None, "{:?} should not match", miss);
        }
    }

    #[test]
    fn test_keys_cover_input_exactly_once() {
        let input = owned(&["width", "height", "depth", "weight", "wide", "w", "", "x"]);
        let tree = build_top(input.clone());
        let mut got = tree.keys();
        got.sort_unstable();
        let mut want: Vec<&str> = input.iter().map(String::as_str).collect();
        want.sort_unstable();
        assert_eq!(got, want);
        assert_eq!(tree.key_count(), input.len());
    }

    #[test]
    fn test_stats() {
        let tree = build_top(owned(&["ab", "ac", "ad", "b"]));
        let stats = tree.stats();
        assert_eq!(stats.keys, 4);
        assert_eq!(stats.leaves, stats.branches + 2);
        assert_eq!(stats.widest_leaf, 1);
        assert!(stats.max_branch_depth >= 2);
    }

    #[test]
    #[should_panic(expected = "empty side")]
    fn test_branch_rejects_empty_side() {
        let _ = Branch::new(
            SplitPoint::new(0, Some(b'a')),
            build(owned(&["a"])),
            Decision::Leaf(Leaf::default()),
        );
    }
}
