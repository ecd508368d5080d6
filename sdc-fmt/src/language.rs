use sdc_lang::ast::operators::Operators;
use sdc_lang::ast::{Literal, NewArray};
use sdc_lang::decl::{Annotation, ClassDecl, ClassKind, FieldDecl, MethodDecl, Modifier};

use crate::error::PrintError;
use crate::print::{Doc, Printer, Scope};

/// Places where a variable is introduced together with its type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingSite {
    /// First use of a local inside an expression.
    Local,
    Parameter,
    ForEach,
    Catch,
}

/// Lexical choices and declaration layout of one target language.
///
/// The traversal itself lives in [`Printer`]; implementations only spell
/// tokens and arrange declarations, usually by combining the scaffolding
/// helpers the printer exposes.
pub trait Language: Sized {
    type Operators: Operators;

    fn operators(&self) -> &Self::Operators;

    /// Implicit superclass, omitted from class headers.
    fn base_class(&self) -> &'static str;
    fn annotation_identifier(&self) -> &'static str {
        "@"
    }
    fn statement_terminator(&self) -> &'static str;
    fn instance_of(&self) -> &'static str;
    /// Dedicated negated type test. Without one the test is wrapped in `!(..)`.
    fn inverted_instance_of(&self) -> Option<&'static str> {
        None
    }
    fn new_keyword(&self) -> &'static str;
    fn for_each_keyword(&self) -> &'static str;
    /// Whether a for-each may bind several variables as `(a, b)`.
    fn destructuring(&self) -> bool {
        false
    }
    /// Whether counted loops keep the `for (init; cond; step)` form. Without
    /// it they print as `init` followed by a `while` loop.
    fn c_style_for(&self) -> bool {
        true
    }
    fn not_null_separator(&self) -> &'static str {
        "."
    }
    /// Separator between `break`/`continue` and a target label.
    fn jump_label_separator(&self) -> &'static str {
        " "
    }
    fn loop_label(&self, label: &str) -> String {
        format!("{label}: ")
    }
    /// Text before the parenthesized condition, before the first branch and
    /// between the branches of a conditional expression.
    fn ternary_tokens(&self) -> (&'static str, &'static str, &'static str) {
        ("", "? ", " : ")
    }
    fn pattern_match_keyword(&self) -> &'static str;
    fn pattern_arm_prefix(&self) -> &'static str {
        ""
    }
    fn default_arm(&self) -> &'static str;
    /// Prefix of an anonymous class header, before the supertype.
    fn anonymous_class_prefix(&self) -> &'static str;
    /// Written after an interface name in an anonymous class header.
    fn anonymous_interface_arguments(&self) -> &'static str {
        ""
    }
    fn class_kind_keyword(&self, kind: ClassKind) -> &'static str;
    /// `None` for modifiers the language does not spell.
    fn modifier_keyword(&self, modifier: Modifier) -> Option<&'static str>;
    fn modifier_rank(&self, modifier: Modifier) -> u8 {
        modifier as u8
    }
    fn literal(&self, lit: &Literal) -> String {
        lit.to_string()
    }

    fn declaration(&self, site: BindingSite, name: &str, ty: &str) -> String;
    fn variadic_parameter(&self, name: &str, ty: &str) -> String;
    fn new_array<'a>(
        &self,
        printer: &Printer<'a, Self>,
        array: &NewArray,
        scope: &mut Scope<'_>,
    ) -> Result<Doc<'a>, PrintError>;

    fn print_class<'a>(
        &self,
        printer: &Printer<'a, Self>,
        class: &ClassDecl,
    ) -> Result<Doc<'a>, PrintError>;
    fn print_method<'a>(
        &self,
        printer: &Printer<'a, Self>,
        method: &MethodDecl,
    ) -> Result<Doc<'a>, PrintError>;
    fn print_field<'a>(
        &self,
        printer: &Printer<'a, Self>,
        field: &FieldDecl,
    ) -> Result<Doc<'a>, PrintError>;
    fn print_annotation<'a>(&self, printer: &Printer<'a, Self>, annotation: &Annotation) -> Doc<'a> {
        printer.annotation(annotation)
    }
}
