//! Reader and writer tables, and the source/target pairing built on them.
//!
//! Built-in readers and writers are installed on first use. Custom entries
//! registered later are searched after the built-ins. A [`Translation`] is
//! the unit callers actually work with: one reader and one writer, run as
//! read-then-write.

use crate::traits::{Diagnostic, ReadError, Reader, Writer};
use std::sync::{OnceLock, PoisonError, RwLock};

/// A process-wide list of `'static` entries with lazily installed built-ins.
struct Table<T: ?Sized + 'static> {
    entries: RwLock<Vec<&'static T>>,
    installed: OnceLock<()>,
    builtins: fn() -> Vec<&'static T>,
}

impl<T: ?Sized + Sync + 'static> Table<T> {
    const fn new(builtins: fn() -> Vec<&'static T>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            installed: OnceLock::new(),
            builtins,
        }
    }

    fn install_builtins(&self) {
        self.installed.get_or_init(|| {
            let builtins = (self.builtins)();
            self.entries
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .extend(builtins);
        });
    }

    fn register(&self, entry: &'static T) {
        self.install_builtins();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    fn find(&self, matches: impl Fn(&T) -> bool) -> Option<&'static T> {
        self.install_builtins();
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .find(|entry| matches(entry))
    }

    fn all(&self) -> Vec<&'static T> {
        self.install_builtins();
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

static READERS: Table<dyn Reader> = Table::new(builtin_readers);
static WRITERS: Table<dyn Writer> = Table::new(builtin_writers);

fn builtin_readers() -> Vec<&'static dyn Reader> {
    let mut readers: Vec<&'static dyn Reader> = Vec::new();
    #[cfg(feature = "read-powershell")]
    readers.push(&crate::input::powershell::POWERSHELL_READER);
    readers
}

fn builtin_writers() -> Vec<&'static dyn Writer> {
    let mut writers: Vec<&'static dyn Writer> = Vec::new();
    #[cfg(feature = "write-csharp")]
    writers.push(&crate::output::csharp::CSHARP_WRITER);
    #[cfg(feature = "write-powershell")]
    writers.push(&crate::output::powershell::POWERSHELL_WRITER);
    writers
}

pub fn register_reader(reader: &'static dyn Reader) {
    READERS.register(reader);
}

pub fn register_writer(writer: &'static dyn Writer) {
    WRITERS.register(writer);
}

pub fn reader_for_language(lang: &str) -> Option<&'static dyn Reader> {
    READERS.find(|r| r.language() == lang)
}

pub fn reader_for_extension(ext: &str) -> Option<&'static dyn Reader> {
    READERS.find(|r| r.extensions().contains(&ext))
}

pub fn writer_for_language(lang: &str) -> Option<&'static dyn Writer> {
    WRITERS.find(|w| w.language() == lang)
}

pub fn writer_for_extension(ext: &str) -> Option<&'static dyn Writer> {
    WRITERS.find(|w| w.extension() == ext)
}

pub fn readers() -> Vec<&'static dyn Reader> {
    READERS.all()
}

pub fn writers() -> Vec<&'static dyn Writer> {
    WRITERS.all()
}

/// Rendered text plus whatever the reader approximated to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct Translated {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// One reader paired with one writer.
#[derive(Clone, Copy)]
pub struct Translation {
    pub reader: &'static dyn Reader,
    pub writer: &'static dyn Writer,
}

impl Translation {
    /// Pair readers and writers by language name.
    pub fn between(source: &str, target: &str) -> Option<Self> {
        Some(Self {
            reader: reader_for_language(source)?,
            writer: writer_for_language(target)?,
        })
    }

    /// Pair by file extension, e.g. `("ps1", "cs")`.
    pub fn for_extensions(source: &str, target: &str) -> Option<Self> {
        Some(Self {
            reader: reader_for_extension(source)?,
            writer: writer_for_extension(target)?,
        })
    }

    pub fn run(&self, syntax_tree: &str) -> Result<Translated, ReadError> {
        let conversion = self.reader.read(syntax_tree)?;
        let text = self.writer.write(&conversion.node);
        tracing::debug!(
            source = self.reader.language(),
            target = self.writer.language(),
            diagnostics = conversion.diagnostics.len(),
            "translated"
        );
        Ok(Translated {
            text,
            diagnostics: conversion.diagnostics,
        })
    }
}

/// Every pairing of a reader with a writer for a different language.
pub fn translations() -> Vec<Translation> {
    let writers = writers();
    readers()
        .into_iter()
        .flat_map(|reader| {
            writers
                .iter()
                .filter(move |writer| writer.language() != reader.language())
                .map(move |&writer| Translation { reader, writer })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "read-powershell")]
    fn test_reader_lookup() {
        let reader = reader_for_language("powershell").expect("powershell reader");
        assert_eq!(reader.language(), "powershell");
        assert!(reader.extensions().contains(&"ps1"));

        let reader = reader_for_extension("psm1").expect("psm1 extension");
        assert_eq!(reader.language(), "powershell");
        assert!(reader_for_extension("ts").is_none());
    }

    #[test]
    #[cfg(all(feature = "write-csharp", feature = "write-powershell"))]
    fn test_writer_lookup() {
        let writer = writer_for_language("csharp").expect("csharp writer");
        assert_eq!(writer.extension(), "cs");
        assert_eq!(
            writer_for_extension("ps1").map(|w| w.language()),
            Some("powershell")
        );
    }

    #[test]
    fn test_custom_writer_registration() {
        struct Silent;

        impl Writer for Silent {
            fn language(&self) -> &'static str {
                "silent"
            }

            fn extension(&self) -> &'static str {
                "silent"
            }

            fn write(&self, _node: &crate::ir::Node) -> String {
                String::new()
            }
        }

        static SILENT: Silent = Silent;
        register_writer(&SILENT);

        let writer = writer_for_language("silent").expect("registered writer");
        assert_eq!(writer.write(&crate::ir::Stmt::Break.into()), "");

        // Built-ins are still installed and searched first.
        let all = writers();
        assert_eq!(all.last().map(|w| w.language()), Some("silent"));
        #[cfg(feature = "write-csharp")]
        assert_eq!(all[0].language(), "csharp");
    }

    #[test]
    #[cfg(all(feature = "read-powershell", feature = "write-csharp"))]
    fn test_translation_run() {
        let translation = Translation::between("powershell", "csharp").unwrap();

        let translated = translation
            .run(
                r#"{ "type": "ScriptBlock", "statements": [
                    { "type": "AssignmentStatement",
                      "left": { "type": "VariableExpression", "variable_path": "x" },
                      "right": { "type": "BinaryExpression", "operator": "Plus",
                                 "left": { "type": "ConstantExpression", "value": "1" },
                                 "right": { "type": "ConstantExpression", "value": "2" } } } ] }"#,
            )
            .unwrap();

        assert_eq!(translated.text, "x = 1 + 2;\n");
        assert!(translated.diagnostics.is_empty());
    }

    #[test]
    #[cfg(all(feature = "read-powershell", feature = "write-csharp"))]
    fn test_translation_reports_diagnostics() {
        let translated = Translation::for_extensions("ps1", "cs")
            .unwrap()
            .run(
                r#"{ "type": "ScriptBlock", "statements": [
                    { "type": "BinaryExpression", "operator": "Imatch",
                      "left": { "type": "VariableExpression", "variable_path": "s" },
                      "right": { "type": "StringConstantExpression", "value": "^a" } } ] }"#,
            )
            .unwrap();

        assert_eq!(translated.text, "s /* unknown operator */ \"^a\";\n");
        assert!(matches!(
            translated.diagnostics.as_slice(),
            [Diagnostic::UnknownOperator { token, .. }] if token == "Imatch"
        ));
    }

    #[test]
    fn test_translation_needs_both_ends() {
        assert!(Translation::between("cobol", "csharp").is_none());
        assert!(Translation::between("powershell", "cobol").is_none());
    }

    #[test]
    #[cfg(all(
        feature = "read-powershell",
        feature = "write-csharp",
        feature = "write-powershell"
    ))]
    fn test_translations_skip_same_language() {
        let pairs: Vec<_> = translations()
            .iter()
            .map(|t| (t.reader.language(), t.writer.language()))
            .collect();

        assert!(pairs.contains(&("powershell", "csharp")));
        assert!(!pairs.contains(&("powershell", "powershell")));
    }
}
