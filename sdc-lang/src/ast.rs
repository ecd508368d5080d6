pub mod builder;
pub mod operators;
pub mod statement;

use std::fmt;

use crate::construction::VariableId;
use crate::decl::ClassDecl;
use operators::{BinaryOp, Step, UnaryOp};

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(String),
    /// Already spelled constant, e.g. an enum entry used as a case key.
    Name(String),
}

impl Literal {
    /// Numeric constants whose spelling starts with a minus sign.
    pub fn is_negative(&self) -> bool {
        match self {
            Literal::Int(v) | Literal::Long(v) => *v < 0,
            Literal::Float(v) => v.is_finite() && v.is_sign_negative(),
            Literal::Double(v) => v.is_finite() && v.is_sign_negative(),
            _ => false,
        }
    }
}

pub(crate) fn escape_char(c: char, quote: char) -> String {
    match c {
        '\\' => "\\\\".to_string(),
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        '\u{8}' => "\\b".to_string(),
        c if c == quote => format!("\\{c}"),
        c if c.is_control() => format!("\\u{:04x}", c as u32),
        c => c.to_string(),
    }
}

fn float_constant(f: &mut fmt::Formatter, class: &str, v: f64) -> Option<fmt::Result> {
    if v.is_nan() {
        Some(write!(f, "{class}.NaN"))
    } else if v.is_infinite() && v > 0.0 {
        Some(write!(f, "{class}.POSITIVE_INFINITY"))
    } else if v.is_infinite() {
        Some(write!(f, "{class}.NEGATIVE_INFINITY"))
    } else {
        None
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Long(v) => write!(f, "{v}L"),
            Literal::Float(v) => float_constant(f, "Float", *v as f64)
                .unwrap_or_else(|| write!(f, "{v:?}f")),
            Literal::Double(v) => {
                float_constant(f, "Double", *v).unwrap_or_else(|| write!(f, "{v:?}"))
            }
            Literal::Char(c) => write!(f, "'{}'", escape_char(*c, '\'')),
            Literal::String(s) => {
                let escaped = s.chars().map(|c| escape_char(c, '"')).collect::<String>();
                write!(f, "\"{escaped}\"")
            }
            Literal::Name(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Clone, Debug)]
pub enum FieldOwner {
    Instance(Box<Expression>),
    /// Qualifier of a static field, printed verbatim. Empty for an
    /// unqualified access.
    Static(String),
}

#[derive(Clone, Debug)]
pub struct FieldAccess {
    pub owner: FieldOwner,
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct Receiver {
    pub instance: Box<Expression>,
    /// Call through a forced non-null assertion (`x!!.f()` in Kotlin).
    pub not_null_checked: bool,
}

/// Method call. Static calls carry their qualifier inside `function`.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub receiver: Option<Receiver>,
    pub function: String,
    pub arguments: Vec<Expression>,
}

#[derive(Clone, Debug)]
pub struct NewArray {
    pub element_type: String,
    pub dimensions: Vec<Expression>,
    pub initializer: Option<Vec<Expression>>,
}

#[derive(Clone, Debug)]
pub enum IncrementKind {
    /// `x++`
    Postfix(Step),
    /// `++x`, used when the update is hoisted in front of its use.
    Prefix(Step),
    /// `x += amount`
    Compound(BinaryOp, Box<Expression>),
}

#[derive(Clone, Debug)]
pub struct Increment {
    pub target: Box<Expression>,
    pub kind: IncrementKind,
}

#[derive(Clone, Debug)]
pub enum Expression {
    Constant(Literal),
    Binary(BinaryOp, Box<Expression>, Box<Expression>),
    Unary(UnaryOp, Box<Expression>),
    Ternary {
        condition: Box<Expression>,
        then: Box<Expression>,
        otherwise: Box<Expression>,
    },
    Field(FieldAccess),
    Variable(VariableId),
    Invocation(Invocation),
    New {
        class: String,
        arguments: Vec<Expression>,
    },
    NewArray(NewArray),
    ArrayLength(Box<Expression>),
    Index {
        array: Box<Expression>,
        index: Box<Expression>,
    },
    Cast {
        ty: String,
        operand: Box<Expression>,
    },
    InstanceOf {
        operand: Box<Expression>,
        ty: String,
        inverted: bool,
    },
    Increment(Increment),
    AnonymousClass {
        class: Box<ClassDecl>,
        arguments: Vec<Expression>,
    },
}

impl Expression {
    /// Logical negation of a condition.
    ///
    /// The structuring stage stores the condition under which a branch is
    /// skipped, so conditionals and loops print the negation of what they
    /// carry. Comparisons are flipped and `&&`/`||` are pushed through with De
    /// Morgan's laws so the result reads naturally instead of piling up `!`.
    pub fn negate(&self) -> Expression {
        match self {
            Expression::Unary(UnaryOp::Not, operand) => (**operand).clone(),
            Expression::Constant(Literal::Bool(b)) => Expression::Constant(Literal::Bool(!b)),
            Expression::Binary(op, lhs, rhs) => match (op.negated_comparison(), op) {
                (Some(flipped), _) => Expression::Binary(flipped, lhs.clone(), rhs.clone()),
                (None, BinaryOp::And) => Expression::Binary(
                    BinaryOp::Or,
                    Box::new(lhs.negate()),
                    Box::new(rhs.negate()),
                ),
                (None, BinaryOp::Or) => Expression::Binary(
                    BinaryOp::And,
                    Box::new(lhs.negate()),
                    Box::new(rhs.negate()),
                ),
                (None, _) => Expression::Unary(UnaryOp::Not, Box::new(self.clone())),
            },
            Expression::InstanceOf {
                operand,
                ty,
                inverted,
            } => Expression::InstanceOf {
                operand: operand.clone(),
                ty: ty.clone(),
                inverted: !inverted,
            },
            _ => Expression::Unary(UnaryOp::Not, Box::new(self.clone())),
        }
    }

    /// True for constants, variables and field or index chains built only
    /// from those. Such an expression may be printed twice without changing
    /// what the program does.
    pub fn is_side_effect_free(&self) -> bool {
        match self {
            Expression::Constant(_) | Expression::Variable(_) => true,
            Expression::Field(FieldAccess { owner, .. }) => match owner {
                FieldOwner::Instance(instance) => instance.is_side_effect_free(),
                FieldOwner::Static(_) => true,
            },
            Expression::Index { array, index } => {
                array.is_side_effect_free() && index.is_side_effect_free()
            }
            Expression::ArrayLength(array) => array.is_side_effect_free(),
            _ => false,
        }
    }
}
