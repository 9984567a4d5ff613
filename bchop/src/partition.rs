//! Column partitioning of a key set.
//!
//! For a fixed byte position, the bytes of every key at that position form a
//! column. Sorting the column and looking for the boundary between two
//! distinct values nearest the median gives the most balanced two-way split
//! available at that position. Comparing the balance of every column picks
//! the position a decision tree should test next.
//!
//! Keys too short to have a byte at the position contribute the sentinel
//! `None`, which orders below every byte (`None < Some(0)`).

/// The byte of a key at some position, or `None` past the end of the key.
pub type Probe = Option<u8>;

/// Read the byte of `key` at `position`.
#[inline]
pub fn probe(key: &[u8], position: usize) -> Probe {
    key.get(position).copied()
}

/// The most balanced boundary found in one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    /// Signed distance of the boundary from the median, in sorted-column
    /// index space. Positive when found right of the median, negative (or
    /// zero) when found on the left.
    pub delta: isize,
    /// The lower of the two differing values at the boundary.
    pub threshold: Probe,
}

/// A position and threshold that together define a two-way split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplitPoint {
    pub position: usize,
    pub threshold: Probe,
}

impl SplitPoint {
    pub fn new(position: usize, threshold: Probe) -> Self {
        SplitPoint { position, threshold }
    }

    /// Whether `key` falls on the "then" side of this split: either too short
    /// to have a byte at `position`, or its byte there is at most `threshold`.
    ///
    /// Construction, evaluation and emitted code all use this one rule.
    #[inline]
    pub fn admits(&self, key: &[u8]) -> bool {
        probe(key, self.position) <= self.threshold
    }
}

/// Find the boundary nearest the median of a sorted column.
///
/// At each radius the boundary right of the median is checked before the one
/// on its left; the first boundary between two distinct values wins.
fn find_even_division(column: &[Probe]) -> Option<Split> {
    let len = column.len();
    let mid = len / 2;
    for delta in 0..mid {
        let right = mid + delta;
        if right + 1 < len && column[right] != column[right + 1] {
            return Some(Split {
                delta: delta as isize,
                threshold: column[right],
            });
        }
        let left = mid - delta;
        if left >= 1 && column[left] != column[left - 1] {
            return Some(Split {
                delta: -(delta as isize),
                threshold: column[left - 1],
            });
        }
    }
    None
}

/// Find the most balanced split of `keys` at byte `position`.
///
/// Returns `None` when every key has the same probe at `position`.
pub fn find_split_at<S: AsRef<str>>(keys: &[S], position: usize) -> Option<Split> {
    let mut column: Vec<Probe> = keys
        .iter()
        .map(|key| probe(key.as_ref().as_bytes(), position))
        .collect();
    column.sort_unstable();
    find_even_division(&column)
}

/// Pick the position whose split is closest to perfectly balanced.
///
/// Every position below the longest key's length is evaluated. A later
/// position replaces the incumbent only when its `|delta|` is strictly
/// smaller, so the first position wins ties.
pub fn choose_best_position<S: AsRef<str>>(keys: &[S]) -> Option<SplitPoint> {
    let width = keys.iter().map(|key| key.as_ref().len()).max().unwrap_or(0);

    let mut best: Option<(usize, SplitPoint)> = None;
    for position in 0..width {
        let Some(split) = find_split_at(keys, position) else {
            continue;
        };
        let balance = split.delta.unsigned_abs();
        if best.map_or(true, |(incumbent, _)| balance < incumbent) {
            best = Some((balance, SplitPoint::new(position, split.threshold)));
            // Nothing can be strictly smaller than zero.
            if balance == 0 {
                break;
            }
        }
    }
    best.map(|(_, point)| point)
}

/// Partition `keys` by `point`, preserving relative order on each side.
///
/// # Panics
///
/// Panics if `point.position` is at or beyond the longest key: such a split
/// can only come from a construction bug.
pub fn split_keys(keys: Vec<String>, point: SplitPoint) -> (Vec<String>, Vec<String>) {
    assert!(
        keys.iter().any(|key| key.len() > point.position),
        "split position {} is beyond the longest key",
        point.position
    );
    keys.into_iter()
        .partition(|key| point.admits(key.as_bytes()))
}
