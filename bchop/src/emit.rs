//! Decision tree → C++ conditional code.
//!
//! Rendering is a pre-order walk over the tree:
//! - `Branch` becomes `if ( <admits> ) { then } else { else }`
//! - `LengthSwitch` becomes `switch ( len ) { case L: { ... } break; default: return false; }`
//! - `Leaf` becomes one `if ( s == "key" ) { <outcome> return true; }` per
//!   candidate, followed by `return false;`
//!
//! Every control path of the output ends in `return true;` or
//! `return false;`. The emitted code expects `s` (a `std::string`) and
//! `len` (its length) in scope.

use std::fmt::Write;

use crate::partition::SplitPoint;
use crate::tree::{Branch, Decision, LengthSwitch, Leaf};
use crate::writer::CodeWriter;

/// Statements recorded for a matched key, written just before its
/// `return true;`.
pub trait MatchOutcome {
    fn write_match(&self, key: &str, w: &mut CodeWriter);
}

/// A bare membership test: a match records nothing.
impl MatchOutcome for () {
    fn write_match(&self, _key: &str, _w: &mut CodeWriter) {}
}

/// How a byte of the input is read for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteCompare {
    /// `s[i]`. Sufficient when every key is ASCII: inputs with high bytes may
    /// route differently but still fail the final equality test.
    Plain,
    /// `static_cast<unsigned char>( s[i] )`, so that comparisons follow
    /// unsigned byte order even where `char` is signed.
    Unsigned,
}

impl ByteCompare {
    pub fn for_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        if keys.into_iter().all(|key| key.is_ascii()) {
            ByteCompare::Plain
        } else {
            ByteCompare::Unsigned
        }
    }
}

/// Render `node` into `w`, choosing the comparison mode from its keys.
pub fn emit(node: &Decision, w: &mut CodeWriter, outcome: &dyn MatchOutcome) {
    let compare = ByteCompare::for_keys(node.keys());
    Emitter { outcome, compare }.node(node, w);
}

struct Emitter<'a> {
    outcome: &'a dyn MatchOutcome,
    compare: ByteCompare,
}

impl Emitter<'_> {
    fn node(&self, node: &Decision, w: &mut CodeWriter) {
        match node {
            Decision::Branch(branch) => self.branch(branch, w),
            Decision::LengthSwitch(switch) => self.length_switch(switch, w),
            Decision::Leaf(leaf) => self.leaf(leaf, w),
        }
    }

    fn branch(&self, branch: &Branch, w: &mut CodeWriter) {
        w.line(format_args!("if ( {} ) {{", self.condition(branch.point())));
        {
            let mut body = w.indent();
            self.node(branch.then_branch(), &mut body);
        }
        w.line("} else {");
        {
            let mut body = w.indent();
            self.node(branch.else_branch(), &mut body);
        }
        w.line("}");
    }

    fn length_switch(&self, switch: &LengthSwitch, w: &mut CodeWriter) {
        w.line("switch ( len ) {");
        {
            let mut cases = w.indent();
            for (len, node) in switch.cases() {
                cases.line(format_args!("case {}: {{", len));
                {
                    let mut body = cases.indent();
                    self.node(node, &mut body);
                }
                cases.line("} break;");
            }
            cases.line("default: return false;");
        }
        w.line("}");
    }

    fn leaf(&self, leaf: &Leaf, w: &mut CodeWriter) {
        for key in leaf.candidates() {
            w.line(format_args!("if ( s == {} ) {{", string_literal(key)));
            {
                let mut body = w.indent();
                self.outcome.write_match(key, &mut body);
                body.line("return true;");
            }
            w.line("}");
        }
        w.line("return false;");
    }

    /// The "then" condition of a branch, mirroring [`SplitPoint::admits`].
    fn condition(&self, point: SplitPoint) -> String {
        let i = point.position;
        let Some(threshold) = point.threshold else {
            return format!("len <= {}", i);
        };
        let byte = match self.compare {
            ByteCompare::Plain => format!("s[{}]", i),
            ByteCompare::Unsigned => format!("static_cast<unsigned char>( s[{}] )", i),
        };
        let test = format!("{} <= {}", byte, char_literal(threshold));
        if i == 0 {
            test
        } else {
            format!("len <= {} || {}", i, test)
        }
    }
}

/// A C++ literal for a threshold byte.
///
/// Bytes above 0x7f are written as integers: a `'\xNN'` literal would be
/// negative where `char` is signed.
pub fn char_literal(byte: u8) -> String {
    match byte {
        b'\'' => "'\\''".to_string(),
        b'\\' => "'\\\\'".to_string(),
        0 => "'\\0'".to_string(),
        0x20..=0x7e => format!("'{}'", byte as char),
        0x01..=0x7f => format!("'\\x{:02x}'", byte),
        _ => format!("0x{:02x}", byte),
    }
}

/// A C++ string literal for a key, with non-printable bytes as octal escapes.
pub fn string_literal(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    out.push('"');
    for &byte in key.as_bytes() {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            // Avoid forming trigraphs.
            b'?' => out.push_str("\\?"),
            0x20..=0x7e => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\{:03o}", byte);
            }
        }
    }
    out.push('"');
    out
}
