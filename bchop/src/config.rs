//! JSON configuration of a lookup-code generation run.
//!
//! ```json
//! {
//!   "template": {
//!     "include-once": "ITEM_ATTRS_HPP",
//!     "namespace": "items",
//!     "header": { "file": "itemattrs.hpp", "include": [] },
//!     "source": { "file": "itemattrs.cpp" },
//!     "class-names": { "codes": "AttrCode", "keys": "AttrKey" },
//!     "function-names": { "lookup": "lookupAttr", "has-code": "isAttr" }
//!   },
//!   "map": {
//!     "width": { "key": "WIDTH", "code": "Width", "arity": 1 }
//!   },
//!   "enums": [ "Unknown" ],
//!   "default-code": "Unknown",
//!   "fields": [ { "name": "arity", "type": "int", "default": 0 } ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub template: Template,
    /// Key string → code and field overrides, in declaration order.
    pub map: IndexMap<String, EntryConfig>,
    /// Extra enumerators with no associated key, listed before mapped codes.
    #[serde(default)]
    pub enums: Vec<String>,
    /// Code reported for inputs that match no key.
    pub default_code: String,
    /// Auxiliary out-parameters of the lookup function.
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Template {
    pub include_once: String,
    pub namespace: String,
    pub header: FileTemplate,
    pub source: FileTemplate,
    pub class_names: ClassNames,
    #[serde(default)]
    pub function_names: FunctionNames,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileTemplate {
    pub file: String,
    /// Extra lines written verbatim after the standard includes.
    #[serde(default)]
    pub include: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassNames {
    pub codes: String,
    /// When set, a class of `std::string_view` constants naming every key.
    #[serde(default)]
    pub keys: Option<String>,
}

/// Names of the generated functions. Only the lookup function is always
/// generated; each of the others is generated when named.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FunctionNames {
    #[serde(default = "default_lookup_name")]
    pub lookup: String,
    #[serde(default)]
    pub from_code_to_key: Option<String>,
    #[serde(default)]
    pub from_key_to_code: Option<String>,
    #[serde(default)]
    pub has_code: Option<String>,
}

fn default_lookup_name() -> String {
    "lookupCode".to_string()
}

impl Default for FunctionNames {
    fn default() -> Self {
        FunctionNames {
            lookup: default_lookup_name(),
            from_code_to_key: None,
            from_key_to_code: None,
            has_code: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryConfig {
    pub code: String,
    /// Identifier of this key in the keys class.
    #[serde(default)]
    pub key: Option<String>,
    /// Field overrides applied on a match.
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub default: Value,
}

/// Parameter and local names used by the generated functions.
const RESERVED_NAMES: [&str; 4] = ["s", "len", "code", "key"];

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check the cross-references the schema alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut codes = HashSet::new();
        for code in self.enums.iter().chain(self.map.values().map(|entry| &entry.code)) {
            if !codes.insert(code.as_str()) {
                return Err(ConfigError::DuplicateCode(code.clone()));
            }
        }
        if !codes.contains(self.default_code.as_str()) {
            return Err(ConfigError::UnknownDefaultCode(self.default_code.clone()));
        }

        let mut declared = HashSet::new();
        for field in &self.fields {
            if RESERVED_NAMES.contains(&field.name.as_str()) {
                return Err(ConfigError::ReservedFieldName(field.name.clone()));
            }
            if !declared.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateField(field.name.clone()));
            }
            render_literal(&field.default).ok_or_else(|| ConfigError::UnsupportedFieldValue {
                owner: "default".to_string(),
                field: field.name.clone(),
                value: field.default.clone(),
            })?;
        }

        for (key, entry) in &self.map {
            if key.as_bytes().contains(&0) {
                return Err(ConfigError::NulInKey(key.clone()));
            }
            if self.template.class_names.keys.is_some() && entry.key.is_none() {
                return Err(ConfigError::MissingKeyName(key.clone()));
            }
            for (field, value) in &entry.fields {
                if !declared.contains(field.as_str()) {
                    return Err(ConfigError::UndeclaredField {
                        key: key.clone(),
                        field: field.clone(),
                    });
                }
                render_literal(value).ok_or_else(|| ConfigError::UnsupportedFieldValue {
                    owner: format!("key {:?}", key),
                    field: field.clone(),
                    value: value.clone(),
                })?;
            }
        }
        Ok(())
    }
}

/// Render a field value as target-language source.
///
/// Strings are taken verbatim as literal expressions (`"\"px\""`,
/// `"Unit::Px"`); numbers and booleans are printed. Anything else has no
/// literal form.
pub fn render_literal(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLOURS: &str = r##"{
        "template": {
            "include-once": "COLOURS_HPP",
            "namespace": "paint",
            "header": { "file": "colours.hpp" },
            "source": { "file": "colours.cpp", "include": ["#include <cstdint>"] },
            "class-names": { "codes": "Colour" }
        },
        "map": {
            "red": { "code": "RED", "hex": "0xff0000" },
            "green": { "code": "GREEN" },
            "blue": { "code": "BLUE", "hex": 255 }
        },
        "enums": ["UNKNOWN"],
        "default-code": "UNKNOWN",
        "fields": [ { "name": "hex", "type": "std::uint32_t", "default": 0 } ]
    }"##;

    #[test]
    fn test_parse_preserves_order_and_defaults() {
        let config = Config::from_json_str(COLOURS).expect("valid config");
        let keys: Vec<&str> = config.map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["red", "green", "blue"]);
        assert_eq!(config.template.function_names, FunctionNames::default());
        assert_eq!(config.template.function_names.lookup, "lookupCode");
        assert_eq!(config.template.header.include, Vec::<String>::new());
        assert_eq!(config.template.source.include, vec!["#include <cstdint>"]);
        assert_eq!(config.template.class_names.keys, None);
        assert_eq!(config.map["red"].fields["hex"], Value::from("0xff0000"));
        assert!(config.map["green"].fields.is_empty());
        config.validate().expect("validates");
    }

    #[test]
    fn test_function_names_are_optional() {
        let json = COLOURS.replace(
            r#""class-names": { "codes": "Colour" }"#,
            r#""class-names": { "codes": "Colour" },
               "function-names": { "has-code": "isColour", "from-code-to-key": "colourName" }"#,
        );
        let config = Config::from_json_str(&json).expect("valid config");
        let names = &config.template.function_names;
        assert_eq!(names.lookup, "lookupCode");
        assert_eq!(names.has_code.as_deref(), Some("isColour"));
        assert_eq!(names.from_code_to_key.as_deref(), Some("colourName"));
        assert_eq!(names.from_key_to_code, None);
    }

    #[test]
    fn test_unknown_default_code() {
        let json = COLOURS.replace(r#""default-code": "UNKNOWN""#, r#""default-code": "MAUVE""#);
        let err = Config::from_json_str(&json).unwrap().validate().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDefaultCode(code) if code == "MAUVE"));
    }

    #[test]
    fn test_duplicate_code() {
        let json = COLOURS.replace(r#""code": "GREEN""#, r#""code": "RED""#);
        let err = Config::from_json_str(&json).unwrap().validate().unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateCode(code) if code == "RED"));
    }

    #[test]
    fn test_undeclared_field() {
        let json = COLOURS.replace(r#""code": "GREEN""#, r#""code": "GREEN", "shade": 2"#);
        let err = Config::from_json_str(&json).unwrap().validate().unwrap_err();
        assert!(matches!(err, ConfigError::UndeclaredField { ref key, ref field } if key == "green" && field == "shade"));
    }

    #[test]
    fn test_unsupported_field_value() {
        let json = COLOURS.replace(r#""hex": 255"#, r#""hex": [255]"#);
        let err = Config::from_json_str(&json).unwrap().validate().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFieldValue { .. }));
        assert_eq!(err.to_string(), "key \"blue\" gives field `hex` an unsupported value [255]");
    }

    #[test]
    fn test_keys_class_requires_key_names() {
        let json = COLOURS.replace(
            r#""class-names": { "codes": "Colour" }"#,
            r#""class-names": { "codes": "Colour", "keys": "ColourKey" }"#,
        );
        let err = Config::from_json_str(&json).unwrap().validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingKeyName(key) if key == "red"));
    }

    #[test]
    fn test_nul_in_key() {
        let json = COLOURS.replace(r#""red":"#, r#""r\u0000d":"#);
        let err = Config::from_json_str(&json).unwrap().validate().unwrap_err();
        assert!(matches!(err, ConfigError::NulInKey(_)));
    }

    #[test]
    fn test_reserved_field_name() {
        let json = COLOURS.replace(r#"{ "name": "hex""#, r#"{ "name": "len""#);
        let err = Config::from_json_str(&json).unwrap().validate().unwrap_err();
        assert!(matches!(err, ConfigError::ReservedFieldName(name) if name == "len"));
    }

    #[test]
    fn test_malformed_json() {
        let err = Config::from_json_str("{ \"template\": ").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_path(Path::new("/nonexistent/bchop.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_render_literal() {
        assert_eq!(render_literal(&Value::from("Unit::Px")), Some("Unit::Px".to_string()));
        assert_eq!(render_literal(&Value::from(-3)), Some("-3".to_string()));
        assert_eq!(render_literal(&Value::from(true)), Some("true".to_string()));
        assert_eq!(render_literal(&Value::Null), None);
    }
}
