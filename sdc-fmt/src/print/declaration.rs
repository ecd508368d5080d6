//! Class, method and field scaffolding shared by every language.

use itertools::Itertools;
use pretty::DocAllocator;
use sdc_lang::ast::{Expression, Literal};
use sdc_lang::decl::{Annotation, AnnotationValue, ClassDecl, FieldDecl, MethodDecl, Modifier};

use super::{Doc, Printer, Scope};
use crate::error::PrintError;
use crate::language::{BindingSite, Language};

impl<'a, L: Language> Printer<'a, L> {
    /// Class declaration, preceded by a comment when upstream failed on it.
    pub fn class(&self, class: &ClassDecl) -> Result<Doc<'a>, PrintError> {
        let Some(error) = &class.error else {
            return self.language.print_class(self, class);
        };
        log::warn!("class {} carries a decompilation error: {error}", class.name);
        let comment = self.text(format!(
            "// Error occurred while decompiling class {}: {error}",
            class.name
        ));
        match self.language.print_class(self, class) {
            Ok(doc) => Ok(comment.append(self.hardline()).append(doc)),
            Err(e) => {
                log::warn!("dropping the body of class {}: {e}", class.name);
                Ok(comment)
            }
        }
    }

    pub fn method(&self, method: &MethodDecl) -> Result<Doc<'a>, PrintError> {
        match self.language.print_method(self, method) {
            Err(e) if method.error.is_some() => {
                log::warn!("dropping the body of method {}: {e}", method.name);
                Ok(self.text(format!(
                    "// Error occurred while decompiling method {}: {e}",
                    method.name
                )))
            }
            result => result,
        }
    }

    pub fn field(&self, field: &FieldDecl) -> Result<Doc<'a>, PrintError> {
        self.language.print_field(self, field)
    }

    /// ` = value` of a field, resolved against the field's own variables.
    pub fn initializer(&self, field: &FieldDecl) -> Result<Doc<'a>, PrintError> {
        let Some(init) = &field.initializer else {
            return Ok(self.nil());
        };
        let mut scope = Scope::new(&field.body);
        Ok(self
            .text(" =")
            .append(
                self.arena
                    .line()
                    .append(self.expression(init, &mut scope)?)
                    .nest(self.indent()),
            )
            .group())
    }

    pub fn annotation(&self, annotation: &Annotation) -> Doc<'a> {
        let head = self.text(format!(
            "{}{}",
            self.language.annotation_identifier(),
            annotation.name
        ));
        if annotation.properties.is_empty() {
            return head;
        }
        let properties = annotation
            .properties
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    AnnotationValue::String(s) => {
                        self.language.literal(&Literal::String(s.clone()))
                    }
                    AnnotationValue::Raw(raw) => raw.clone(),
                };
                self.text(format!("{key} = {value}"))
            })
            .collect::<Vec<_>>();
        head.append(self.list(properties).parens())
    }

    /// One annotation per line, each followed by a line break.
    pub fn annotations(&self, annotations: &[Annotation]) -> Doc<'a> {
        self.arena.concat(annotations.iter().map(|a| {
            self.language
                .print_annotation(self, a)
                .append(self.hardline())
        }))
    }

    /// Annotations on the same line as what they annotate.
    pub fn inline_annotations(&self, annotations: &[Annotation]) -> Doc<'a> {
        self.arena.concat(
            annotations
                .iter()
                .map(|a| self.language.print_annotation(self, a).append(self.text(" "))),
        )
    }

    /// Modifier keywords in the language's canonical order, each followed by
    /// a space.
    pub fn modifiers(&self, modifiers: &[Modifier]) -> Doc<'a> {
        let words = modifiers
            .iter()
            .unique()
            .sorted_by_key(|m| self.language.modifier_rank(**m))
            .filter_map(|m| self.language.modifier_keyword(*m))
            .map(|word| format!("{word} "))
            .collect::<String>();
        self.text(words)
    }

    /// `<T, U>`, or nothing for a non generic declaration.
    pub fn generics(&self, generics: &[String]) -> Doc<'a> {
        if generics.is_empty() {
            return self.nil();
        }
        self.text(format!("<{}>", generics.join(", ")))
    }

    /// Parenthesized parameter list. Marks every parameter as declared in
    /// `scope`.
    pub fn parameters(
        &self,
        method: &MethodDecl,
        scope: &mut Scope<'_>,
    ) -> Result<Doc<'a>, PrintError> {
        let last = method.parameters.len().saturating_sub(1);
        let docs = method
            .parameters
            .iter()
            .enumerate()
            .map(|(i, parameter)| {
                let variable = scope.variable(parameter.variable)?;
                scope.declared.declare(parameter.variable);
                let declaration = if method.varargs && i == last {
                    self.language
                        .variadic_parameter(&variable.name, &variable.ty)
                } else {
                    self.language
                        .declaration(BindingSite::Parameter, &variable.name, &variable.ty)
                };
                Ok(self
                    .inline_annotations(&parameter.annotations)
                    .append(self.text(declaration)))
            })
            .collect::<Result<Vec<_>, PrintError>>()?;
        Ok(self.list(docs).parens())
    }

    /// `keyword first, second, ...`. The first entry stays next to the
    /// keyword, later ones get their own continuation line at double indent
    /// when the enclosing group breaks.
    pub fn type_list(&self, keyword: &str, types: &[String]) -> Doc<'a> {
        let double = 2 * self.indent();
        let mut iter = types.iter();
        let Some(first) = iter.next() else {
            return self.nil();
        };
        let mut doc = self
            .arena
            .line()
            .append(self.text(format!("{keyword}{first}")))
            .nest(double);
        for ty in iter {
            doc = doc
                .append(self.text(","))
                .append(self.arena.line().append(self.text(ty.clone())).nest(double));
        }
        doc
    }

    pub fn throws_clause(&self, throws: &[String]) -> Doc<'a> {
        if throws.is_empty() {
            return self.nil();
        }
        self.arena
            .line()
            .append(self.text(format!("throws {}", throws.join(", "))))
            .nest(2 * self.indent())
            .group()
    }

    /// Body of a method, or the terminator for one without code. Local
    /// classes come first, then the comment for an upstream failure, then
    /// whatever part of the body could be printed.
    pub fn method_body(
        &self,
        method: &MethodDecl,
        scope: &mut Scope<'_>,
    ) -> Result<Doc<'a>, PrintError> {
        if !method.has_code() {
            return Ok(self.text(self.language.statement_terminator()));
        }
        let mut body = self.nil();
        for class in &method.local_classes {
            body = body.append(self.hardline()).append(self.class(class)?);
        }
        if let Some(error) = &method.error {
            log::warn!("method {} carries a decompilation error: {error}", method.name);
            body = body
                .append(self.hardline())
                .append(self.text(format!("// {error}")));
        }
        let chain = match self.construction_chain(method.body.entry, scope, false) {
            Err(e) if method.error.is_some() => {
                log::warn!("dropping the body of method {}: {e}", method.name);
                self.nil()
            }
            chain => chain?,
        };
        Ok(self.text(" ").append(self.braced(body.append(chain))))
    }

    /// Members separated by blank lines: enum constants, fields, methods,
    /// then inner classes.
    pub fn class_body(&self, class: &ClassDecl) -> Result<Doc<'a>, PrintError> {
        let mut sections = vec![];
        let has_members =
            !(class.fields.is_empty() && class.methods.is_empty() && class.inner_classes.is_empty());
        if !class.enum_constants.is_empty() {
            let terminator = if has_members { ";" } else { "" };
            sections.push(self.text(format!(
                "{}{terminator}",
                class.enum_constants.join(", ")
            )));
        }
        if !class.fields.is_empty() {
            let fields = class
                .fields
                .iter()
                .map(|f| self.field(f))
                .collect::<Result<Vec<_>, _>>()?;
            sections.push(self.arena.intersperse(fields, self.hardline()));
        }
        for method in &class.methods {
            sections.push(self.method(method)?);
        }
        for inner in &class.inner_classes {
            sections.push(self.class(inner)?);
        }
        if sections.is_empty() {
            return Ok(self.braced(self.nil()));
        }
        let blank_line = self.hardline().append(self.hardline());
        Ok(self.braced(
            self.hardline()
                .append(self.arena.intersperse(sections, blank_line)),
        ))
    }

    /// `package` and `import` lines of a top level class.
    pub fn package_and_imports(&self, class: &ClassDecl) -> Doc<'a> {
        if class.nested {
            return self.nil();
        }
        let terminator = self.language.statement_terminator();
        let mut doc = self.nil();
        if let Some(package) = &class.package {
            doc = doc
                .append(self.text(format!("package {package}{terminator}")))
                .append(self.hardline())
                .append(self.hardline());
        }
        let imports = class.imports.iter().unique().collect::<Vec<_>>();
        if !imports.is_empty() {
            for import in imports {
                doc = doc
                    .append(self.text(format!("import {import}{terminator}")))
                    .append(self.hardline());
            }
            doc = doc.append(self.hardline());
        }
        doc
    }

    /// Anonymous class instantiation. Implementing an interface gives a
    /// header with the interface alone, otherwise the superclass constructor
    /// is called with `arguments`.
    pub fn anonymous_class(
        &self,
        class: &ClassDecl,
        arguments: &[Expression],
        scope: &mut Scope<'_>,
    ) -> Result<Doc<'a>, PrintError> {
        let header = match class.interfaces.first() {
            Some(interface) => self.text(format!(
                "{interface}{}",
                self.language.anonymous_interface_arguments()
            )),
            None => {
                let superclass = class
                    .superclass
                    .clone()
                    .unwrap_or_else(|| self.language.base_class().to_string());
                self.text(superclass)
                    .append(self.arguments(arguments, scope)?)
            }
        };
        Ok(self
            .text(self.language.anonymous_class_prefix())
            .append(header)
            .append(self.text(" "))
            .append(self.class_body(class)?))
    }
}
