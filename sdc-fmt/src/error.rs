use std::fmt;

use sdc_lang::ast::operators::BinaryOp;
use sdc_lang::construction::{ConstructionId, VariableId};

/// Contract violations between the structuring stage and the printer.
///
/// Any of these aborts the unit being printed. Failures that upstream already
/// recorded on a method or class are not errors here: they become comments in
/// the output.
#[derive(Debug, Clone, PartialEq)]
pub enum PrintError {
    UnknownVariable(VariableId),
    UnknownConstruction(ConstructionId),
    /// A construction reached twice, either shared by two parents or part of
    /// a cycle of `next` links.
    RevisitedConstruction(ConstructionId),
    /// A compound assignment the language has no operator for, on a target
    /// that cannot be repeated or in a position that needs a value.
    UnexpandableCompound(BinaryOp),
    /// A for-each binding this many variables in a language without
    /// destructuring loops.
    UnsupportedDestructuring(usize),
    Render(String),
}

impl fmt::Display for PrintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintError::UnknownVariable(id) => {
                write!(f, "variable {id:?} does not belong to this method body")
            }
            PrintError::UnknownConstruction(id) => {
                write!(f, "construction {id:?} does not belong to this method body")
            }
            PrintError::RevisitedConstruction(id) => {
                write!(f, "construction {id:?} is reached more than once")
            }
            PrintError::UnexpandableCompound(op) => {
                write!(f, "compound `{op}=` cannot be written as a plain assignment here")
            }
            PrintError::UnsupportedDestructuring(count) => {
                write!(f, "for-each over {count} variables cannot be written in this language")
            }
            PrintError::Render(msg) => write!(f, "failed to render document: {msg}"),
        }
    }
}
impl std::error::Error for PrintError {}
