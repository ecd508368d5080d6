//! Kotlin target.
//!
//! The model is shared with Java, so types arrive in whatever spelling the
//! front end produced. JVM primitives and `T[]` arrays are mapped to their
//! Kotlin classes; everything else is printed as given.

use sdc_lang::ast::operators::{Affix, BinaryOp, Operation, Operators, UnaryOp};
use sdc_lang::ast::{Literal, NewArray};
use sdc_lang::decl::{ClassDecl, ClassKind, FieldDecl, MethodDecl, Modifier};

use crate::error::PrintError;
use crate::language::{BindingSite, Language};
use crate::print::{Doc, Printer, Scope};

#[derive(Debug, Default, Clone, Copy)]
pub struct KotlinOperators;

impl Operators for KotlinOperators {
    fn priority(&self, op: Operation) -> u8 {
        match op {
            Operation::Member
            | Operation::Index
            | Operation::ArrayLength
            | Operation::PostfixStep(_)
            | Operation::Unary(UnaryOp::BitNot) => 1,
            Operation::Unary(_) | Operation::PrefixStep(_) => 2,
            Operation::Cast => 3,
            Operation::Binary(op) => match op {
                BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 4,
                BinaryOp::Add | BinaryOp::Sub => 5,
                // Named infix functions.
                BinaryOp::Shl
                | BinaryOp::Shr
                | BinaryOp::UShr
                | BinaryOp::BitAnd
                | BinaryOp::BitOr
                | BinaryOp::BitXor => 7,
                BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 10,
                BinaryOp::Eq | BinaryOp::Ne => 11,
                BinaryOp::And => 12,
                BinaryOp::Or => 13,
            },
            Operation::InstanceOf => 9,
            Operation::Ternary => 14,
            Operation::Assign | Operation::CompoundAssign(_) => 15,
        }
    }

    fn is_associative(&self, op: Operation) -> bool {
        match op {
            Operation::Member
            | Operation::Index
            | Operation::ArrayLength
            | Operation::PostfixStep(_)
            | Operation::Unary(UnaryOp::BitNot)
            | Operation::Cast => true,
            Operation::Binary(op) => matches!(
                op,
                BinaryOp::Add
                    | BinaryOp::Mul
                    | BinaryOp::BitAnd
                    | BinaryOp::BitOr
                    | BinaryOp::BitXor
                    | BinaryOp::And
                    | BinaryOp::Or
            ),
            Operation::Assign | Operation::CompoundAssign(_) => true,
            _ => false,
        }
    }

    fn token(&self, op: Operation) -> &'static str {
        match op {
            Operation::Binary(op) => match op {
                BinaryOp::Shl => "shl",
                BinaryOp::Shr => "shr",
                BinaryOp::UShr => "ushr",
                BinaryOp::BitAnd => "and",
                BinaryOp::BitOr => "or",
                BinaryOp::BitXor => "xor",
                op => op.symbol(),
            },
            Operation::Unary(UnaryOp::BitNot) => ".inv()",
            Operation::Unary(op) => op.symbol(),
            Operation::PrefixStep(step) | Operation::PostfixStep(step) => step.symbol(),
            // Bitwise compounds have no operator form and get expanded.
            Operation::CompoundAssign(op) => match op {
                BinaryOp::Add => "+=",
                BinaryOp::Sub => "-=",
                BinaryOp::Mul => "*=",
                BinaryOp::Div => "/=",
                BinaryOp::Rem => "%=",
                _ => "",
            },
            Operation::Cast => "as",
            Operation::InstanceOf => "is",
            Operation::Ternary => "if",
            Operation::ArrayLength => ".size",
            Operation::Index => "[",
            Operation::Member => ".",
            Operation::Assign => "=",
        }
    }

    fn cast(&self, ty: &str) -> Affix {
        Affix::Postfix(format!(" as {}", type_name(ty)))
    }

    fn is_postfix(&self, op: Operation) -> bool {
        op == Operation::Unary(UnaryOp::BitNot)
    }
}

/// Kotlin name of a JVM primitive, if `ty` is one.
fn primitive(ty: &str) -> Option<&'static str> {
    Some(match ty {
        "int" | "Int" => "Int",
        "long" | "Long" => "Long",
        "short" | "Short" => "Short",
        "byte" | "Byte" => "Byte",
        "char" | "Char" => "Char",
        "boolean" | "Boolean" => "Boolean",
        "float" | "Float" => "Float",
        "double" | "Double" => "Double",
        _ => return None,
    })
}

/// Kotlin spelling of `ty`: `int` is `Int`, `int[]` is `IntArray` and
/// `String[]` is `Array<String>`.
fn type_name(ty: &str) -> String {
    if let Some(element) = ty.strip_suffix("[]") {
        return match primitive(element) {
            Some(p) => format!("{p}Array"),
            None => format!("Array<{}>", type_name(element)),
        };
    }
    primitive(ty).map_or_else(|| ty.to_string(), str::to_string)
}

/// Element type of an array type in either spelling: `T[]`, `Array<T>`,
/// `Array<out T>` or `IntArray`.
fn element_type(ty: &str) -> &str {
    if let Some(element) = ty.strip_suffix("[]") {
        return element;
    }
    if let Some(inner) = ty.strip_prefix("Array<").and_then(|t| t.strip_suffix('>')) {
        return inner.strip_prefix("out ").unwrap_or(inner);
    }
    match ty.strip_suffix("Array") {
        Some(element) if primitive(element).is_some() => element,
        _ => ty,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Kotlin;

impl Kotlin {
    /// `IntArray(n)` or `arrayOfNulls<T>(n)`, nested in `Array(n) { .. }`
    /// for every outer dimension.
    fn sized_array<'a>(
        &self,
        printer: &Printer<'a, Self>,
        element: &str,
        dimensions: &[Doc<'a>],
    ) -> Doc<'a> {
        match dimensions {
            [] => printer.nil(),
            [size] => {
                let head = match primitive(element) {
                    Some(p) => format!("{p}Array"),
                    None => format!("arrayOfNulls<{}>", type_name(element)),
                };
                printer.text(head).append(size.clone().parens())
            }
            [size, rest @ ..] => printer
                .text("Array")
                .append(size.clone().parens())
                .append(printer.text(" { "))
                .append(self.sized_array(printer, element, rest))
                .append(printer.text(" }")),
        }
    }
}

impl Language for Kotlin {
    type Operators = KotlinOperators;

    fn operators(&self) -> &KotlinOperators {
        &KotlinOperators
    }

    fn base_class(&self) -> &'static str {
        "Any"
    }
    fn statement_terminator(&self) -> &'static str {
        ""
    }
    fn instance_of(&self) -> &'static str {
        "is"
    }
    fn inverted_instance_of(&self) -> Option<&'static str> {
        Some("!is")
    }
    fn new_keyword(&self) -> &'static str {
        ""
    }
    fn for_each_keyword(&self) -> &'static str {
        "in"
    }
    fn destructuring(&self) -> bool {
        true
    }
    fn c_style_for(&self) -> bool {
        false
    }
    fn not_null_separator(&self) -> &'static str {
        "!!."
    }
    fn jump_label_separator(&self) -> &'static str {
        "@"
    }
    fn loop_label(&self, label: &str) -> String {
        format!("{label}@ ")
    }
    fn ternary_tokens(&self) -> (&'static str, &'static str, &'static str) {
        ("if ", "", " else ")
    }
    fn pattern_match_keyword(&self) -> &'static str {
        "when"
    }
    fn default_arm(&self) -> &'static str {
        "else"
    }
    fn anonymous_class_prefix(&self) -> &'static str {
        "object : "
    }

    fn class_kind_keyword(&self, kind: ClassKind) -> &'static str {
        match kind {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum class",
            ClassKind::Annotation => "annotation class",
        }
    }

    /// Visibility is public and members are final by default. JVM flags
    /// without a keyword are spelled as their `kotlin.jvm` annotations.
    fn modifier_keyword(&self, modifier: Modifier) -> Option<&'static str> {
        match modifier {
            Modifier::Public | Modifier::Static | Modifier::Final => None,
            Modifier::Protected => Some("protected"),
            Modifier::Private => Some("private"),
            Modifier::Abstract => Some("abstract"),
            Modifier::Native => Some("external"),
            Modifier::Transient => Some("@Transient"),
            Modifier::Volatile => Some("@Volatile"),
            Modifier::Synchronized => Some("@Synchronized"),
            Modifier::Strictfp => Some("@Strictfp"),
        }
    }

    fn modifier_rank(&self, modifier: Modifier) -> u8 {
        match modifier {
            Modifier::Transient | Modifier::Volatile | Modifier::Synchronized | Modifier::Strictfp => 0,
            m => m as u8 + 1,
        }
    }

    fn literal(&self, lit: &Literal) -> String {
        match lit {
            Literal::String(_) => lit.to_string().replace('$', "\\$"),
            _ => lit.to_string(),
        }
    }

    fn declaration(&self, site: BindingSite, name: &str, ty: &str) -> String {
        match site {
            BindingSite::Local => format!("var {name}: {}", type_name(ty)),
            BindingSite::Parameter | BindingSite::Catch => format!("{name}: {}", type_name(ty)),
            BindingSite::ForEach => name.to_string(),
        }
    }

    fn variadic_parameter(&self, name: &str, ty: &str) -> String {
        format!("vararg {name}: {}", type_name(element_type(ty)))
    }

    fn new_array<'a>(
        &self,
        printer: &Printer<'a, Self>,
        array: &NewArray,
        scope: &mut Scope<'_>,
    ) -> Result<Doc<'a>, PrintError> {
        let element = array.element_type.as_str();
        match &array.initializer {
            Some(elements) => {
                let elements = elements
                    .iter()
                    .map(|e| printer.expression(e, scope))
                    .collect::<Result<Vec<_>, _>>()?;
                let head = match primitive(element) {
                    Some(p) => {
                        let mut function = p.to_lowercase();
                        function.push_str("ArrayOf");
                        function
                    }
                    None => format!("arrayOf<{}>", type_name(element)),
                };
                Ok(printer.text(head).append(printer.list(elements).parens()))
            }
            None => {
                let dimensions = array
                    .dimensions
                    .iter()
                    .map(|d| printer.expression(d, scope))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.sized_array(printer, element, &dimensions))
            }
        }
    }

    fn print_class<'a>(
        &self,
        printer: &Printer<'a, Self>,
        class: &ClassDecl,
    ) -> Result<Doc<'a>, PrintError> {
        // Only a class calls a superclass constructor in its header.
        let mut supertypes = class
            .superclass
            .as_deref()
            .filter(|s| class.kind == ClassKind::Class && *s != self.base_class())
            .map(|s| format!("{s}()"))
            .into_iter()
            .collect::<Vec<_>>();
        if class.kind != ClassKind::Annotation {
            supertypes.extend(class.interfaces.iter().cloned());
        }
        Ok(printer
            .package_and_imports(class)
            .append(printer.annotations(&class.annotations))
            .append(printer.modifiers(&class.modifiers))
            .append(printer.text(format!(
                "{} {}",
                self.class_kind_keyword(class.kind),
                class.name
            )))
            .append(printer.generics(&class.generics))
            .append(printer.type_list(": ", &supertypes).group())
            .append(printer.text(" "))
            .append(printer.class_body(class)?))
    }

    fn print_method<'a>(
        &self,
        printer: &Printer<'a, Self>,
        method: &MethodDecl,
    ) -> Result<Doc<'a>, PrintError> {
        let mut scope = Scope::new(&method.body);
        let mut doc = printer.annotations(&method.annotations);
        if !method.throws.is_empty() {
            let classes = method
                .throws
                .iter()
                .map(|t| format!("{t}::class"))
                .collect::<Vec<_>>()
                .join(", ");
            doc = doc
                .append(printer.text(format!("@Throws({classes})")))
                .append(printer.hardline());
        }
        doc = doc.append(printer.modifiers(&method.modifiers));
        if method.is_constructor() {
            doc = doc.append(printer.text("constructor"));
        } else {
            doc = doc.append(printer.text("fun "));
            if !method.generics.is_empty() {
                doc = doc
                    .append(printer.generics(&method.generics))
                    .append(printer.text(" "));
            }
            doc = doc.append(printer.text(method.name.clone()));
        }
        doc = doc.append(printer.parameters(method, &mut scope)?);
        if let Some(return_type) = method
            .return_type
            .as_deref()
            .filter(|t| !matches!(*t, "void" | "Unit"))
        {
            doc = doc.append(printer.text(format!(": {}", type_name(return_type))));
        }
        Ok(doc.append(printer.method_body(method, &mut scope)?))
    }

    fn print_field<'a>(
        &self,
        printer: &Printer<'a, Self>,
        field: &FieldDecl,
    ) -> Result<Doc<'a>, PrintError> {
        let keyword = if field.modifiers.contains(&Modifier::Final) {
            "val"
        } else {
            "var"
        };
        Ok(printer
            .annotations(&field.annotations)
            .append(printer.modifiers(&field.modifiers))
            .append(printer.text(format!(
                "{keyword} {}: {}",
                field.name,
                type_name(&field.ty)
            )))
            .append(printer.initializer(field)?))
    }
}
