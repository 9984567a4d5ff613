//! The key → outcome association behind a generated lookup function.
//!
//! A [`KeyTable`] knows, for every key, which code and field values a match
//! records. It renders those assignments for the emitter and can replay the
//! generated function's behaviour directly through [`KeyTable::lookup`].

use indexmap::IndexMap;

use crate::config::{render_literal, Config};
use crate::emit::MatchOutcome;
use crate::error::ConfigError;
use crate::tree::Decision;
use crate::writer::CodeWriter;

/// What a match on one key records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntry {
    pub code: String,
    /// Identifier of the key in the keys class, if one is generated.
    pub name: Option<String>,
    /// Field overrides as (field name, literal), in declaration order.
    pub assignments: Vec<(String, String)>,
}

impl KeyEntry {
    pub fn assign(&mut self, field: impl Into<String>, literal: impl Into<String>) -> &mut Self {
        self.assignments.push((field.into(), literal.into()));
        self
    }
}

/// An auxiliary out-parameter of the lookup function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSlot {
    pub name: String,
    pub ty: String,
    pub default: String,
}

/// Result of evaluating a lookup, as the generated function would report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup<'t> {
    pub matched: bool,
    pub code: &'t str,
    /// Every declared field with its final value, in declaration order.
    pub fields: Vec<(&'t str, &'t str)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTable {
    codes_class: String,
    default_code: String,
    fields: Vec<FieldSlot>,
    entries: IndexMap<String, KeyEntry>,
}

impl KeyTable {
    pub fn new(codes_class: impl Into<String>, default_code: impl Into<String>) -> Self {
        KeyTable {
            codes_class: codes_class.into(),
            default_code: default_code.into(),
            fields: Vec::new(),
            entries: IndexMap::new(),
        }
    }

    /// Build a table from a validated configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut table = KeyTable::new(&config.template.class_names.codes, &config.default_code);
        for field in &config.fields {
            // Validation guarantees every value has a literal form.
            let default = render_literal(&field.default).unwrap_or_default();
            table.add_field(&field.name, &field.ty, default);
        }
        for (key, entry_config) in &config.map {
            let entry = table.insert(key, &entry_config.code);
            entry.name = entry_config.key.clone();
            for (field, value) in &entry_config.fields {
                entry.assign(field, render_literal(value).unwrap_or_default());
            }
        }
        Ok(table)
    }

    pub fn add_field(&mut self, name: impl Into<String>, ty: impl Into<String>, default: impl Into<String>) {
        self.fields.push(FieldSlot {
            name: name.into(),
            ty: ty.into(),
            default: default.into(),
        });
    }

    /// Add `key` with its code, replacing any earlier entry for the same key.
    pub fn insert(&mut self, key: impl Into<String>, code: impl Into<String>) -> &mut KeyEntry {
        let entry = KeyEntry {
            code: code.into(),
            name: None,
            assignments: Vec::new(),
        };
        let (index, _) = self.entries.insert_full(key.into(), entry);
        &mut self.entries[index]
    }

    pub fn codes_class(&self) -> &str {
        &self.codes_class
    }

    pub fn default_code(&self) -> &str {
        &self.default_code
    }

    pub fn fields(&self) -> &[FieldSlot] {
        &self.fields
    }

    pub fn entry(&self, key: &str) -> Option<&KeyEntry> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &KeyEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the empty string is a key. It is matched by a length-zero
    /// check ahead of the tree rather than by the tree itself.
    pub fn has_empty_key(&self) -> bool {
        self.entries.contains_key("")
    }

    /// The keys that go into the decision tree: every key but the empty one.
    pub fn tree_keys(&self) -> Vec<String> {
        self.keys().filter(|key| !key.is_empty()).map(str::to_owned).collect()
    }

    /// `Codes::CODE`
    pub fn qualified(&self, code: &str) -> String {
        format!("{}::{}", self.codes_class, code)
    }

    /// Evaluate the generated lookup function on `input` against `tree`.
    ///
    /// Code and fields start at their defaults and are overwritten only on a
    /// match, exactly as in the emitted code.
    pub fn lookup<'t>(&'t self, tree: &Decision, input: &str) -> Lookup<'t> {
        let mut result = Lookup {
            matched: false,
            code: &self.default_code,
            fields: self
                .fields
                .iter()
                .map(|slot| (slot.name.as_str(), slot.default.as_str()))
                .collect(),
        };

        let hit = if input.is_empty() {
            self.entries.get_key_value("")
        } else {
            tree.classify(input).and_then(|key| self.entries.get_key_value(key))
        };
        let Some((_, entry)) = hit else {
            return result;
        };

        result.matched = true;
        result.code = entry.code.as_str();
        for (field, literal) in &entry.assignments {
            if let Some(slot) = result.fields.iter_mut().find(|slot| slot.0 == field.as_str()) {
                slot.1 = literal.as_str();
            }
        }
        result
    }

    /// Write the statements recording a match on `key`, without the return.
    pub fn write_assignments(&self, key: &str, w: &mut CodeWriter) {
        let Some(entry) = self.entries.get(key) else {
            return;
        };
        w.line(format_args!("code = {};", self.qualified(&entry.code)));
        for (field, literal) in &entry.assignments {
            w.line(format_args!("{} = {};", field, literal));
        }
    }
}

impl MatchOutcome for KeyTable {
    fn write_match(&self, key: &str, w: &mut CodeWriter) {
        self.write_assignments(key, w);
    }
}
