use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Rem, // %

    Shl,  // <<
    Shr,  // >>
    UShr, // >>>

    Lt, // <
    Le, // <=
    Gt, // >
    Ge, // >=
    Eq, // ==
    Ne, // !=

    BitAnd, // &
    BitOr,  // |
    BitXor, // ^

    And, // &&
    Or,  // ||
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge | BinaryOp::Eq | BinaryOp::Ne
        )
    }

    /// The comparison that holds exactly when `self` does not.
    pub fn negated_comparison(self) -> Option<BinaryOp> {
        match self {
            BinaryOp::Lt => Some(BinaryOp::Ge),
            BinaryOp::Le => Some(BinaryOp::Gt),
            BinaryOp::Gt => Some(BinaryOp::Le),
            BinaryOp::Ge => Some(BinaryOp::Lt),
            BinaryOp::Eq => Some(BinaryOp::Ne),
            BinaryOp::Ne => Some(BinaryOp::Eq),
            _ => None,
        }
    }

    /// Spelling shared by the C family of languages.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,    // !
    Negate, // -
    BitNot, // ~
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
            UnaryOp::BitNot => "~",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    Increment,
    Decrement,
}

impl Step {
    pub fn symbol(self) -> &'static str {
        match self {
            Step::Increment => "++",
            Step::Decrement => "--",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Every kind of node that takes part in precedence decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Binary(BinaryOp),
    Unary(UnaryOp),
    Cast,
    InstanceOf,
    Ternary,
    PrefixStep(Step),
    PostfixStep(Step),
    CompoundAssign(BinaryOp),
    ArrayLength,
    Index,
    /// Field access and method invocation.
    Member,
    Assign,
}

/// Where a cast puts its type relative to the operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Affix {
    Prefix(String),
    Postfix(String),
}

/// Priority, associativity and spelling of operators for one target language.
///
/// Priorities follow a single convention: a lower number binds tighter. A
/// sub-expression is parenthesized when [`needs_brackets`] says so for the
/// priority of the position it is printed in.
pub trait Operators {
    fn priority(&self, op: Operation) -> u8;
    fn is_associative(&self, op: Operation) -> bool;
    /// Surface token of the operator. Composite forms (ternary, index, cast)
    /// report their leading token only.
    fn token(&self, op: Operation) -> &'static str;
    fn cast(&self, ty: &str) -> Affix;
    /// Unary operators written after their operand.
    fn is_postfix(&self, _op: Operation) -> bool {
        false
    }
}

/// Bracket rule shared by every operator position.
pub fn needs_brackets(child: u8, parent: u8, associative: bool) -> bool {
    child > parent || (child == parent && !associative)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn looser_child_is_bracketed() {
        assert!(needs_brackets(4, 3, true));
        assert!(!needs_brackets(3, 4, false));
    }

    #[test]
    fn equal_priority_depends_on_associativity() {
        assert!(needs_brackets(4, 4, false));
        assert!(!needs_brackets(4, 4, true));
    }

    #[test]
    fn comparison_negation_is_an_involution() {
        for op in [
            BinaryOp::Lt,
            BinaryOp::Le,
            BinaryOp::Gt,
            BinaryOp::Ge,
            BinaryOp::Eq,
            BinaryOp::Ne,
        ] {
            let flipped = op.negated_comparison().unwrap();
            assert_eq!(flipped.negated_comparison(), Some(op));
        }
        assert_eq!(BinaryOp::Add.negated_comparison(), None);
    }
}
