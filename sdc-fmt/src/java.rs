//! Java target.

use pretty::DocAllocator;
use sdc_lang::ast::NewArray;
use sdc_lang::ast::operators::{Affix, BinaryOp, Operation, Operators};
use sdc_lang::decl::{ClassDecl, ClassKind, FieldDecl, MethodDecl, Modifier};

use crate::error::PrintError;
use crate::language::{BindingSite, Language};
use crate::print::{Doc, Printer, Scope};

/// Java operator table. Priorities follow JLS precedence, 1 binding tightest.
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaOperators;

impl Operators for JavaOperators {
    fn priority(&self, op: Operation) -> u8 {
        match op {
            Operation::Member
            | Operation::Index
            | Operation::ArrayLength
            | Operation::PostfixStep(_) => 1,
            Operation::Unary(_) | Operation::PrefixStep(_) | Operation::Cast => 2,
            Operation::Binary(op) => match op {
                BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 3,
                BinaryOp::Add | BinaryOp::Sub => 4,
                BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => 5,
                BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 6,
                BinaryOp::Eq | BinaryOp::Ne => 7,
                BinaryOp::BitAnd => 8,
                BinaryOp::BitXor => 9,
                BinaryOp::BitOr => 10,
                BinaryOp::And => 11,
                BinaryOp::Or => 12,
            },
            Operation::InstanceOf => 6,
            Operation::Ternary => 13,
            Operation::Assign | Operation::CompoundAssign(_) => 14,
        }
    }

    fn is_associative(&self, op: Operation) -> bool {
        match op {
            Operation::Member
            | Operation::Index
            | Operation::ArrayLength
            | Operation::PostfixStep(_) => true,
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
            // Right associative: `a = b = c`.
            Operation::Assign | Operation::CompoundAssign(_) => true,
            _ => false,
        }
    }

    fn token(&self, op: Operation) -> &'static str {
        match op {
            Operation::Binary(op) => op.symbol(),
            Operation::Unary(op) => op.symbol(),
            Operation::PrefixStep(step) | Operation::PostfixStep(step) => step.symbol(),
            Operation::CompoundAssign(op) => match op {
                BinaryOp::Add => "+=",
                BinaryOp::Sub => "-=",
                BinaryOp::Mul => "*=",
                BinaryOp::Div => "/=",
                BinaryOp::Rem => "%=",
                BinaryOp::Shl => "<<=",
                BinaryOp::Shr => ">>=",
                BinaryOp::UShr => ">>>=",
                BinaryOp::BitAnd => "&=",
                BinaryOp::BitOr => "|=",
                BinaryOp::BitXor => "^=",
                _ => "",
            },
            Operation::Cast => "(",
            Operation::InstanceOf => "instanceof",
            Operation::Ternary => "?",
            Operation::ArrayLength => ".length",
            Operation::Index => "[",
            Operation::Member => ".",
            Operation::Assign => "=",
        }
    }

    fn cast(&self, ty: &str) -> Affix {
        Affix::Prefix(format!("({ty}) "))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Java;

impl Language for Java {
    type Operators = JavaOperators;

    fn operators(&self) -> &JavaOperators {
        &JavaOperators
    }

    fn base_class(&self) -> &'static str {
        "Object"
    }
    fn statement_terminator(&self) -> &'static str {
        ";"
    }
    fn instance_of(&self) -> &'static str {
        "instanceof"
    }
    fn new_keyword(&self) -> &'static str {
        "new "
    }
    fn for_each_keyword(&self) -> &'static str {
        ":"
    }
    fn pattern_match_keyword(&self) -> &'static str {
        "switch"
    }
    fn pattern_arm_prefix(&self) -> &'static str {
        "case "
    }
    fn default_arm(&self) -> &'static str {
        "default"
    }
    fn anonymous_class_prefix(&self) -> &'static str {
        "new "
    }
    fn anonymous_interface_arguments(&self) -> &'static str {
        "()"
    }

    fn class_kind_keyword(&self, kind: ClassKind) -> &'static str {
        match kind {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Annotation => "@interface",
        }
    }

    fn modifier_keyword(&self, modifier: Modifier) -> Option<&'static str> {
        Some(match modifier {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Strictfp => "strictfp",
        })
    }

    fn declaration(&self, _site: BindingSite, name: &str, ty: &str) -> String {
        format!("{ty} {name}")
    }

    fn variadic_parameter(&self, name: &str, ty: &str) -> String {
        let element = ty.strip_suffix("[]").unwrap_or(ty);
        format!("{element}... {name}")
    }

    fn new_array<'a>(
        &self,
        printer: &Printer<'a, Self>,
        array: &NewArray,
        scope: &mut Scope<'_>,
    ) -> Result<Doc<'a>, PrintError> {
        let head = printer.text(format!("new {}", array.element_type));
        match &array.initializer {
            Some(elements) => {
                let elements = elements
                    .iter()
                    .map(|e| printer.expression(e, scope))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(head
                    .append(printer.text("[] "))
                    .append(printer.list(elements).braces()))
            }
            None => {
                let mut doc = head;
                for dimension in &array.dimensions {
                    doc = doc.append(printer.expression(dimension, scope)?.brackets());
                }
                Ok(doc)
            }
        }
    }

    fn print_class<'a>(
        &self,
        printer: &Printer<'a, Self>,
        class: &ClassDecl,
    ) -> Result<Doc<'a>, PrintError> {
        let (extends, implements) = match class.kind {
            ClassKind::Interface => (None, printer.type_list("extends ", &class.interfaces)),
            ClassKind::Annotation => (None, printer.nil()),
            ClassKind::Class | ClassKind::Enum => (
                class
                    .superclass
                    .as_deref()
                    .filter(|s| *s != self.base_class()),
                printer.type_list("implements ", &class.interfaces),
            ),
        };
        let extends = match extends {
            Some(superclass) => printer
                .arena()
                .line()
                .append(printer.text(format!("extends {superclass}")))
                .nest(printer.indent()),
            None => printer.nil(),
        };
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
            .append(extends.append(implements).group())
            .append(printer.text(" "))
            .append(printer.class_body(class)?))
    }

    fn print_method<'a>(
        &self,
        printer: &Printer<'a, Self>,
        method: &MethodDecl,
    ) -> Result<Doc<'a>, PrintError> {
        let mut scope = Scope::new(&method.body);
        let mut doc = printer
            .annotations(&method.annotations)
            .append(printer.modifiers(&method.modifiers));
        if !method.generics.is_empty() {
            doc = doc
                .append(printer.generics(&method.generics))
                .append(printer.text(" "));
        }
        if let Some(return_type) = &method.return_type {
            doc = doc.append(printer.text(format!("{return_type} ")));
        }
        Ok(doc
            .append(printer.text(method.name.clone()))
            .append(printer.parameters(method, &mut scope)?)
            .append(printer.throws_clause(&method.throws))
            .append(printer.method_body(method, &mut scope)?))
    }

    fn print_field<'a>(
        &self,
        printer: &Printer<'a, Self>,
        field: &FieldDecl,
    ) -> Result<Doc<'a>, PrintError> {
        Ok(printer
            .annotations(&field.annotations)
            .append(printer.modifiers(&field.modifiers))
            .append(printer.text(format!("{} {}", field.ty, field.name)))
            .append(printer.initializer(field)?)
            .append(printer.text(self.statement_terminator())))
    }
}
