//! Short constructors for expression trees, used by the structuring stage and
//! by tests.

use super::operators::{BinaryOp, Step, UnaryOp};
use super::statement::Statement;
use super::*;

pub fn int(v: i64) -> Expression {
    Expression::Constant(Literal::Int(v))
}

pub fn string(s: &str) -> Expression {
    Expression::Constant(Literal::String(s.to_string()))
}

pub fn boolean(b: bool) -> Expression {
    Expression::Constant(Literal::Bool(b))
}

pub fn null() -> Expression {
    Expression::Constant(Literal::Null)
}

/// A constant printed exactly as given.
pub fn name(n: &str) -> Expression {
    Expression::Constant(Literal::Name(n.to_string()))
}

pub fn var(id: VariableId) -> Expression {
    Expression::Variable(id)
}

pub fn binary(op: BinaryOp, lhs: Expression, rhs: Expression) -> Expression {
    Expression::Binary(op, Box::new(lhs), Box::new(rhs))
}

pub fn unary(op: UnaryOp, operand: Expression) -> Expression {
    Expression::Unary(op, Box::new(operand))
}

pub fn not(operand: Expression) -> Expression {
    unary(UnaryOp::Not, operand)
}

pub fn ternary(condition: Expression, then: Expression, otherwise: Expression) -> Expression {
    Expression::Ternary {
        condition: Box::new(condition),
        then: Box::new(then),
        otherwise: Box::new(otherwise),
    }
}

pub fn field(owner: Expression, name: &str) -> Expression {
    Expression::Field(FieldAccess {
        owner: FieldOwner::Instance(Box::new(owner)),
        name: name.to_string(),
    })
}

pub fn static_field(owner: &str, name: &str) -> Expression {
    Expression::Field(FieldAccess {
        owner: FieldOwner::Static(owner.to_string()),
        name: name.to_string(),
    })
}

pub fn call(receiver: Expression, function: &str, arguments: Vec<Expression>) -> Expression {
    Expression::Invocation(Invocation {
        receiver: Some(Receiver {
            instance: Box::new(receiver),
            not_null_checked: false,
        }),
        function: function.to_string(),
        arguments,
    })
}

pub fn checked_call(receiver: Expression, function: &str, arguments: Vec<Expression>) -> Expression {
    Expression::Invocation(Invocation {
        receiver: Some(Receiver {
            instance: Box::new(receiver),
            not_null_checked: true,
        }),
        function: function.to_string(),
        arguments,
    })
}

pub fn static_call(function: &str, arguments: Vec<Expression>) -> Expression {
    Expression::Invocation(Invocation {
        receiver: None,
        function: function.to_string(),
        arguments,
    })
}

pub fn new(class: &str, arguments: Vec<Expression>) -> Expression {
    Expression::New {
        class: class.to_string(),
        arguments,
    }
}

pub fn new_array(element_type: &str, dimensions: Vec<Expression>) -> Expression {
    Expression::NewArray(NewArray {
        element_type: element_type.to_string(),
        dimensions,
        initializer: None,
    })
}

pub fn array_of(element_type: &str, elements: Vec<Expression>) -> Expression {
    Expression::NewArray(NewArray {
        element_type: element_type.to_string(),
        dimensions: vec![],
        initializer: Some(elements),
    })
}

pub fn length(array: Expression) -> Expression {
    Expression::ArrayLength(Box::new(array))
}

pub fn index(array: Expression, index: Expression) -> Expression {
    Expression::Index {
        array: Box::new(array),
        index: Box::new(index),
    }
}

pub fn cast(ty: &str, operand: Expression) -> Expression {
    Expression::Cast {
        ty: ty.to_string(),
        operand: Box::new(operand),
    }
}

pub fn instance_of(operand: Expression, ty: &str) -> Expression {
    Expression::InstanceOf {
        operand: Box::new(operand),
        ty: ty.to_string(),
        inverted: false,
    }
}

pub fn post_increment(target: Expression) -> Expression {
    Expression::Increment(Increment {
        target: Box::new(target),
        kind: IncrementKind::Postfix(Step::Increment),
    })
}

pub fn pre_decrement(target: Expression) -> Expression {
    Expression::Increment(Increment {
        target: Box::new(target),
        kind: IncrementKind::Prefix(Step::Decrement),
    })
}

pub fn compound(op: BinaryOp, target: Expression, amount: Expression) -> Expression {
    Expression::Increment(Increment {
        target: Box::new(target),
        kind: IncrementKind::Compound(op, Box::new(amount)),
    })
}

pub fn anonymous(class: ClassDecl, arguments: Vec<Expression>) -> Expression {
    Expression::AnonymousClass {
        class: Box::new(class),
        arguments,
    }
}

pub fn assign(target: Expression, value: Expression) -> Statement {
    Statement::Assignment { target, value }
}

pub fn eval(e: Expression) -> Statement {
    Statement::Expression(e)
}

pub fn ret(value: Option<Expression>) -> Statement {
    Statement::Return {
        value,
        explicit: true,
    }
}

pub fn throw(e: Expression) -> Statement {
    Statement::Throw(e)
}
