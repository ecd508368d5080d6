//! Source printer of the **sdc** decompiler.
//!
//! [`Printer`] walks the program model of `sdc-lang` and builds a document with
//! the `pretty` combinators. Everything that differs between target languages
//! goes through the [`Language`] hooks, implemented here by [`Java`] and
//! [`Kotlin`].

mod error;
pub mod java;
pub mod kotlin;
mod language;
mod print;

use itertools::Itertools;
use pretty::Arena;
use sdc_lang::decl::{ClassDecl, FieldDecl, MethodDecl};

pub use error::PrintError;
pub use java::Java;
pub use kotlin::Kotlin;
pub use language::{BindingSite, Language};
pub use print::{DeclaredSet, Doc, Printer, Scope};

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub indent_size: usize,
    /// Line width handed to the layout engine.
    pub width: usize,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            indent_size: 4,
            width: 100,
        }
    }
}

/// Lays out a finished document. Trailing blanks left by indentation on empty
/// lines are removed, and so is the final line break.
pub fn render_doc(doc: Doc<'_>, width: usize) -> Result<String, PrintError> {
    let mut w = Vec::new();
    doc.render(width, &mut w)
        .map_err(|e| PrintError::Render(e.to_string()))?;
    let rendered = String::from_utf8(w).map_err(|e| PrintError::Render(e.to_string()))?;
    Ok(rendered.lines().map(str::trim_end).join("\n"))
}

pub fn render_class<L: Language>(
    class: &ClassDecl,
    language: &L,
    config: Config,
) -> Result<String, PrintError> {
    log::debug!("rendering class {}", class.name);
    let arena = Arena::new();
    let printer = Printer::new(&arena, language, config);
    let doc = printer.class(class)?;
    render_doc(doc, config.width)
}

pub fn render_method<L: Language>(
    method: &MethodDecl,
    language: &L,
    config: Config,
) -> Result<String, PrintError> {
    let arena = Arena::new();
    let printer = Printer::new(&arena, language, config);
    let doc = printer.method(method)?;
    render_doc(doc, config.width)
}

pub fn render_field<L: Language>(
    field: &FieldDecl,
    language: &L,
    config: Config,
) -> Result<String, PrintError> {
    let arena = Arena::new();
    let printer = Printer::new(&arena, language, config);
    let doc = printer.field(field)?;
    render_doc(doc, config.width)
}
