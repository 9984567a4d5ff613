//! Synthetic vocabularies for benchmarks.
//!
//! Vocabularies are generated deterministically so that runs are comparable:
//! a fixed set of stems combined with suffixes, which yields many keys that
//! share prefixes and lengths, the hard case for the partitioner.

// Each benchmark file compiles this module independently and uses different subsets.
#![allow(dead_code)]

use bchop::KeyTable;

const STEMS: &[&str] = &[
    "width", "height", "depth", "colour", "border", "margin", "padding", "font", "line", "align",
    "offset", "scale", "shadow", "weight", "opacity", "cursor",
];

const SUFFIXES: &[&str] = &["", "-x", "-y", "-top", "-left", "-min", "-max", "-auto"];

/// `n` distinct keys (capped at stems × suffixes × 8).
pub fn vocabulary(n: usize) -> Vec<String> {
    let mut keys = Vec::with_capacity(n);
    'outer: for round in 0..8 {
        for suffix in SUFFIXES {
            for stem in STEMS {
                if keys.len() == n {
                    break 'outer;
                }
                let key = if round == 0 {
                    format!("{}{}", stem, suffix)
                } else {
                    format!("{}{}{}", stem, round, suffix)
                };
                keys.push(key);
            }
        }
    }
    keys
}

/// A key table with one code per key and one auxiliary field.
pub fn table(n: usize) -> KeyTable {
    let mut table = KeyTable::new("Attr", "Unknown");
    table.add_field("arity", "int", "0");
    for (i, key) in vocabulary(n).into_iter().enumerate() {
        table
            .insert(key, format!("Attr{}", i))
            .assign("arity", (i % 4).to_string());
    }
    table
}

/// Named sizes used across benchmark groups.
pub fn sizes() -> [(&'static str, usize); 4] {
    [("tiny", 8), ("small", 32), ("medium", 128), ("large", 512)]
}
