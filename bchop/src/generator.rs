//! Header and source generation around the lookup tree.
//!
//! The generator builds the decision tree once from the configured key map
//! and renders two artifacts from it:
//! 1. **Header**: include guard, optional keys class, codes enum, and the
//!    declarations of every generated function
//! 2. **Source**: key-name definitions, the lookup function (the emitted
//!    tree), and the optional helpers, which call the lookup function or
//!    walk the flat key map rather than the tree

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{Config, Template};
use crate::emit::{emit, string_literal};
use crate::error::{ConfigError, GenerateError};
use crate::table::{KeyTable, Lookup};
use crate::tree::{build_top, Decision};
use crate::writer::CodeWriter;

/// Paths of the artifacts written by [`CodeGenerator::write_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub header: PathBuf,
    pub source: PathBuf,
}

#[derive(Debug, Clone)]
pub struct CodeGenerator {
    template: Template,
    enums: Vec<String>,
    table: KeyTable,
    tree: Decision,
}

impl CodeGenerator {
    /// Validate `config` and build its decision tree.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let table = KeyTable::from_config(&config)?;
        let tree = build_top(table.tree_keys());

        let stats = tree.stats();
        debug!(
            keys = table.len(),
            branches = stats.branches,
            leaves = stats.leaves,
            widest_leaf = stats.widest_leaf,
            max_branch_depth = stats.max_branch_depth,
            "built decision tree"
        );

        Ok(CodeGenerator {
            template: config.template,
            enums: config.enums,
            table,
            tree,
        })
    }

    pub fn tree(&self) -> &Decision {
        &self.tree
    }

    pub fn table(&self) -> &KeyTable {
        &self.table
    }

    /// Evaluate the generated lookup function on `input`.
    pub fn lookup(&self, input: &str) -> Lookup<'_> {
        self.table.lookup(&self.tree, input)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Header
    // ══════════════════════════════════════════════════════════════════════

    pub fn header(&self) -> String {
        let t = &self.template;
        let mut w = CodeWriter::with_capacity(1024 + self.table.len() * 64);

        w.line(format_args!("#ifndef {}", t.include_once));
        w.line(format_args!("#define {}", t.include_once));
        w.blank();
        w.line("#include <string>");
        if t.class_names.keys.is_some() {
            w.line("#include <string_view>");
        }
        w.blank();
        write_includes(&mut w, &t.header.include);
        w.line(format_args!("namespace {} {{", t.namespace));
        w.blank();

        self.write_keys_class(&mut w);
        self.write_codes_enum(&mut w);
        self.write_declarations(&mut w);

        w.line("} // namespace");
        w.blank();
        w.line("#endif");
        w.into_string()
    }

    fn write_keys_class(&self, w: &mut CodeWriter) {
        let Some(keys_class) = &self.template.class_names.keys else {
            return;
        };
        w.line(format_args!("class {} {{", keys_class));
        w.line("public:");
        {
            let mut body = w.indent();
            for (_, entry) in self.table.entries() {
                if let Some(name) = &entry.name {
                    body.line(format_args!("static const std::string_view {};", name));
                }
            }
        }
        w.line("}; // class");
        w.blank();
    }

    fn write_codes_enum(&self, w: &mut CodeWriter) {
        w.line(format_args!("enum class {} {{", self.table.codes_class()));
        {
            let mut body = w.indent();
            for extra in &self.enums {
                body.line(format_args!("{},", extra));
            }
            for (_, entry) in self.table.entries() {
                body.line(format_args!("{},", entry.code));
            }
        }
        w.line("}; // enum");
        w.blank();
    }

    fn write_declarations(&self, w: &mut CodeWriter) {
        w.line(format_args!("{};", self.lookup_signature()));
        w.blank();
        let names = &self.template.function_names;
        if let Some(name) = &names.from_code_to_key {
            w.line(format_args!("{};", self.code_to_key_signature(name)));
            w.blank();
        }
        if let Some(name) = &names.from_key_to_code {
            w.line(format_args!("{};", self.key_to_code_signature(name)));
            w.blank();
        }
        if let Some(name) = &names.has_code {
            w.line(format_args!("{};", has_code_signature(name)));
            w.blank();
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Source
    // ══════════════════════════════════════════════════════════════════════

    pub fn source(&self) -> String {
        let t = &self.template;
        let mut w = CodeWriter::with_capacity(4096 + self.table.len() * 256);

        w.line("#include <string>");
        w.blank();
        w.line(format_args!("#include {}", string_literal(&t.header.file)));
        w.blank();
        write_includes(&mut w, &t.source.include);
        w.line(format_args!("namespace {} {{", t.namespace));
        w.blank();

        self.write_key_definitions(&mut w);
        self.write_lookup_function(&mut w);
        self.write_code_to_key_function(&mut w);
        self.write_key_to_code_function(&mut w);
        self.write_has_code_function(&mut w);

        w.line("} // namespace");
        w.into_string()
    }

    fn write_key_definitions(&self, w: &mut CodeWriter) {
        let Some(keys_class) = &self.template.class_names.keys else {
            return;
        };
        for (key, entry) in self.table.entries() {
            if let Some(name) = &entry.name {
                w.line(format_args!(
                    "const std::string_view {}::{} {{ {} }};",
                    keys_class,
                    name,
                    string_literal(key)
                ));
            }
        }
        w.blank();
    }

    fn write_lookup_function(&self, w: &mut CodeWriter) {
        w.line(format_args!("{} {{", self.lookup_signature()));
        {
            let mut body = w.indent();
            body.line("size_t len = s.length();");
            body.line(format_args!("code = {};", self.table.qualified(self.table.default_code())));
            for field in self.table.fields() {
                body.line(format_args!("{} = {};", field.name, field.default));
            }
            if self.table.has_empty_key() {
                body.line("if ( len == 0 ) {");
                {
                    let mut empty = body.indent();
                    self.table.write_assignments("", &mut empty);
                    empty.line("return true;");
                }
                body.line("}");
            }
            emit(&self.tree, &mut body, &self.table);
        }
        w.line("}");
        w.blank();
    }

    fn write_code_to_key_function(&self, w: &mut CodeWriter) {
        let Some(name) = &self.template.function_names.from_code_to_key else {
            return;
        };
        w.line(format_args!("{} {{", self.code_to_key_signature(name)));
        {
            let mut body = w.indent();
            body.line("switch ( code ) {");
            {
                let mut cases = body.indent();
                for (key, entry) in self.table.entries() {
                    cases.line(format_args!(
                        "case {}: return {};",
                        self.table.qualified(&entry.code),
                        string_literal(key)
                    ));
                }
                cases.line("default: return nullptr;");
            }
            body.line("}");
        }
        w.line("}");
        w.blank();
    }

    fn write_key_to_code_function(&self, w: &mut CodeWriter) {
        let Some(name) = &self.template.function_names.from_key_to_code else {
            return;
        };
        w.line(format_args!("{} {{", self.key_to_code_signature(name)));
        {
            let mut body = w.indent();
            self.write_lookup_locals(&mut body);
            body.line(format_args!("{};", self.lookup_call()));
            body.line("return code;");
        }
        w.line("}");
        w.blank();
    }

    fn write_has_code_function(&self, w: &mut CodeWriter) {
        let Some(name) = &self.template.function_names.has_code else {
            return;
        };
        w.line(format_args!("{} {{", has_code_signature(name)));
        {
            let mut body = w.indent();
            self.write_lookup_locals(&mut body);
            body.line(format_args!("return {};", self.lookup_call()));
        }
        w.line("}");
        w.blank();
    }

    fn write_lookup_locals(&self, w: &mut CodeWriter) {
        w.line(format_args!("{} code;", self.table.codes_class()));
        for field in self.table.fields() {
            w.line(format_args!("{} {};", field.ty, field.name));
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Signatures
    // ══════════════════════════════════════════════════════════════════════

    fn lookup_signature(&self) -> String {
        let mut params = format!(
            "const std::string & s, {} & code",
            self.table.codes_class()
        );
        for field in self.table.fields() {
            params.push_str(&format!(", {} & {}", field.ty, field.name));
        }
        format!("bool {}( {} )", self.template.function_names.lookup, params)
    }

    fn lookup_call(&self) -> String {
        let mut args = vec!["key", "code"];
        args.extend(self.table.fields().iter().map(|field| field.name.as_str()));
        format!("{}( {} )", self.template.function_names.lookup, args.join(", "))
    }

    fn code_to_key_signature(&self, name: &str) -> String {
        format!("const char * {}( {} code )", name, self.table.codes_class())
    }

    fn key_to_code_signature(&self, name: &str) -> String {
        format!("{} {}( const std::string & key )", self.table.codes_class(), name)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Output
    // ══════════════════════════════════════════════════════════════════════

    /// Write both artifacts, resolving the configured file names against
    /// `out_dir`.
    pub fn write_files(&self, out_dir: &Path) -> Result<GeneratedFiles, GenerateError> {
        let header = out_dir.join(&self.template.header.file);
        let source = out_dir.join(&self.template.source.file);

        write_artifact(&header, &self.header())?;
        info!(path = %header.display(), "wrote header");
        write_artifact(&source, &self.source())?;
        info!(path = %source.display(), "wrote source");

        Ok(GeneratedFiles { header, source })
    }
}

fn has_code_signature(name: &str) -> String {
    format!("bool {}( const std::string & key )", name)
}

fn write_includes(w: &mut CodeWriter, includes: &[String]) {
    if includes.is_empty() {
        return;
    }
    for include in includes {
        w.line(include);
    }
    w.blank();
}

fn write_artifact(path: &Path, contents: &str) -> Result<(), GenerateError> {
    let to_error = |source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    fs::write(path, contents).map_err(to_error)
}
