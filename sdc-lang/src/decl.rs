use std::fmt;

use crate::ast::Expression;
use crate::construction::{MethodBody, VariableId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnnotationValue {
    /// Printed between double quotes.
    String(String),
    /// Numbers, class literals and enum constants, printed verbatim.
    Raw(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotation {
    pub name: String,
    /// Kept in declaration order.
    pub properties: Vec<(String, AnnotationValue)>,
}

impl Annotation {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            properties: vec![],
        }
    }

    pub fn with(mut self, key: &str, value: AnnotationValue) -> Self {
        self.properties.push((key.to_string(), value));
        self
    }
}

/// Failure recorded by the analysis of a single method or class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitError {
    pub location: String,
    pub message: String,
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}
impl std::error::Error for UnitError {}

#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    pub ty: String,
    pub name: String,
    pub initializer: Option<Expression>,
    /// Variables the initializer refers to, such as `this`.
    pub body: MethodBody,
}

impl FieldDecl {
    pub fn new(modifiers: Vec<Modifier>, ty: &str, name: &str) -> Self {
        Self {
            annotations: vec![],
            modifiers,
            ty: ty.to_string(),
            name: name.to_string(),
            initializer: None,
            body: MethodBody::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Parameter {
    pub variable: VariableId,
    pub annotations: Vec<Annotation>,
}

#[derive(Clone, Debug, Default)]
pub struct MethodDecl {
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    pub generics: Vec<String>,
    /// `None` for constructors.
    pub return_type: Option<String>,
    pub name: String,
    /// Variables of `body` bound by the signature.
    pub parameters: Vec<Parameter>,
    /// The last parameter is variadic.
    pub varargs: bool,
    pub throws: Vec<String>,
    pub body: MethodBody,
    /// Classes declared inside the method body.
    pub local_classes: Vec<ClassDecl>,
    pub error: Option<UnitError>,
}

impl MethodDecl {
    pub fn new(modifiers: Vec<Modifier>, return_type: Option<&str>, name: &str) -> Self {
        Self {
            modifiers,
            return_type: return_type.map(str::to_string),
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    /// Abstract and native methods print a signature only.
    pub fn has_code(&self) -> bool {
        !self
            .modifiers
            .iter()
            .any(|m| matches!(m, Modifier::Abstract | Modifier::Native))
    }

    pub fn add_parameter(&mut self, name: &str, ty: &str) -> VariableId {
        let variable = self.body.parameter(name, ty);
        self.parameters.push(Parameter {
            variable,
            annotations: vec![],
        });
        variable
    }
}

#[derive(Clone, Debug, Default)]
pub struct ClassDecl {
    pub package: Option<String>,
    pub imports: Vec<String>,
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    pub kind: ClassKind,
    pub name: String,
    pub generics: Vec<String>,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub enum_constants: Vec<String>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub inner_classes: Vec<ClassDecl>,
    /// Inner, local and anonymous classes print no package or imports.
    pub nested: bool,
    pub error: Option<UnitError>,
}

impl ClassDecl {
    pub fn new(modifiers: Vec<Modifier>, kind: ClassKind, name: &str) -> Self {
        Self {
            modifiers,
            kind,
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn nested(mut self) -> Self {
        self.nested = true;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unit_error_display() {
        let e = UnitError {
            location: "Foo.bar()".to_string(),
            message: "NullPointerException at offset 12".to_string(),
        };
        assert_eq!(e.to_string(), "Foo.bar(): NullPointerException at offset 12");
    }

    #[test]
    fn abstract_methods_have_no_code() {
        let m = MethodDecl::new(vec![Modifier::Public, Modifier::Abstract], Some("void"), "run");
        assert!(!m.has_code());
        assert!(!m.is_constructor());
        let c = MethodDecl::new(vec![Modifier::Public], None, "Foo");
        assert!(c.has_code());
        assert!(c.is_constructor());
    }

    #[test]
    fn parameters_bind_body_variables() {
        let mut m = MethodDecl::new(vec![], Some("void"), "set");
        let v = m.add_parameter("value", "int");
        assert_eq!(m.parameters.len(), 1);
        assert_eq!(m.body.variables[v].name, "value");
    }
}
