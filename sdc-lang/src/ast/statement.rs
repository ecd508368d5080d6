use super::Expression;

#[derive(Clone, Debug)]
pub enum Statement {
    Expression(Expression),
    Assignment {
        target: Expression,
        value: Expression,
    },
    /// `explicit` is false on paths where the keyword was elided, such as
    /// the fall-off return at the end of a void method.
    Return {
        value: Option<Expression>,
        explicit: bool,
    },
    Throw(Expression),
}

impl Statement {
    /// Statements that produce no text at all.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            Statement::Return {
                value: None,
                explicit: false
            }
        )
    }
}
