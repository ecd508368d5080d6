//! Structured control flow of one method body.
//!
//! Constructions live in an arena owned by [`MethodBody`] and are linked by
//! [`ConstructionId`]s. A construction is followed by at most one `next`
//! construction, so a method body is a tree of chains rather than a list of
//! blocks. Break and continue targets belong to the chain position that
//! carries them.

use slotmap::SlotMap;

use crate::ast::statement::Statement;
use crate::ast::{Expression, Literal};

slotmap::new_key_type! {
    pub struct VariableId;
    pub struct ConstructionId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableKind {
    /// Declared with its type on its first appearance.
    Local,
    Parameter,
    /// Variable of an enclosing method seen from a local or anonymous class.
    Captured,
    This,
}

#[derive(Clone, Debug)]
pub struct Variable {
    pub name: String,
    pub ty: String,
    pub kind: VariableKind,
}

#[derive(Clone, Debug, Default)]
pub struct Jump {
    pub label: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CatchClause {
    pub variable: VariableId,
    pub body: ConstructionId,
}

#[derive(Clone, Debug)]
pub struct SwitchCase {
    /// `None` stands for the default case.
    pub keys: Vec<Option<Literal>>,
    pub body: ConstructionId,
}

#[derive(Clone, Debug)]
pub struct WhenArm {
    pub guard: Expression,
    pub body: ConstructionId,
}

/// Conditions of `Conditional`, `While` and `For` hold the condition under
/// which the body is skipped.
#[derive(Clone, Debug)]
pub enum ConstructionKind {
    Block(Vec<Statement>),
    Conditional {
        condition: Expression,
        then_branch: ConstructionId,
        else_branch: Option<ConstructionId>,
    },
    While {
        condition: Expression,
        body: ConstructionId,
    },
    DoWhile {
        condition: Expression,
        body: ConstructionId,
    },
    For {
        init: Option<Statement>,
        condition: Expression,
        afterthought: Option<Statement>,
        body: ConstructionId,
    },
    /// More than one variable destructures each element, in component
    /// order.
    ForEach {
        variables: Vec<VariableId>,
        container: Expression,
        body: ConstructionId,
    },
    TryCatch {
        body: ConstructionId,
        catches: Vec<CatchClause>,
        finally: Option<ConstructionId>,
    },
    Switch {
        selector: Expression,
        cases: Vec<SwitchCase>,
    },
    When {
        selector: Expression,
        arms: Vec<WhenArm>,
        default: Option<ConstructionId>,
    },
}

#[derive(Clone, Debug)]
pub struct Construction {
    pub kind: ConstructionKind,
    pub next: Option<ConstructionId>,
    pub break_to: Option<Jump>,
    pub continue_to: Option<Jump>,
    /// Label of a loop targeted by a labelled jump.
    pub label: Option<String>,
}

impl Construction {
    pub fn new(kind: ConstructionKind) -> Self {
        Self {
            kind,
            next: None,
            break_to: None,
            continue_to: None,
            label: None,
        }
    }

    pub fn with_break(mut self, label: Option<&str>) -> Self {
        self.break_to = Some(Jump {
            label: label.map(str::to_string),
        });
        self
    }

    pub fn with_continue(mut self, label: Option<&str>) -> Self {
        self.continue_to = Some(Jump {
            label: label.map(str::to_string),
        });
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// A block without statements, jumps or label. Such a block in an else
    /// branch is only a carrier for the chained `else if`.
    pub fn is_empty_block(&self) -> bool {
        matches!(&self.kind, ConstructionKind::Block(stmts) if stmts.is_empty())
            && self.break_to.is_none()
            && self.continue_to.is_none()
            && self.label.is_none()
    }
}

/// Variables and constructions of one method, plus the head of its chain.
#[derive(Clone, Debug, Default)]
pub struct MethodBody {
    pub variables: SlotMap<VariableId, Variable>,
    pub constructions: SlotMap<ConstructionId, Construction>,
    pub entry: Option<ConstructionId>,
}

impl MethodBody {
    pub fn new() -> Self {
        Self::default()
    }

    fn variable(&mut self, name: &str, ty: &str, kind: VariableKind) -> VariableId {
        self.variables.insert(Variable {
            name: name.to_string(),
            ty: ty.to_string(),
            kind,
        })
    }

    pub fn local(&mut self, name: &str, ty: &str) -> VariableId {
        self.variable(name, ty, VariableKind::Local)
    }

    pub fn parameter(&mut self, name: &str, ty: &str) -> VariableId {
        self.variable(name, ty, VariableKind::Parameter)
    }

    pub fn captured(&mut self, name: &str, ty: &str) -> VariableId {
        self.variable(name, ty, VariableKind::Captured)
    }

    pub fn this(&mut self, class: &str) -> VariableId {
        self.variable("this", class, VariableKind::This)
    }

    pub fn insert(&mut self, construction: Construction) -> ConstructionId {
        self.constructions.insert(construction)
    }

    pub fn block(&mut self, statements: Vec<Statement>) -> ConstructionId {
        self.insert(Construction::new(ConstructionKind::Block(statements)))
    }

    /// Links `ids` through their `next` fields in the given order and returns
    /// the head of the chain.
    pub fn chain(&mut self, ids: &[ConstructionId]) -> Option<ConstructionId> {
        for pair in ids.windows(2) {
            if let Some(node) = self.constructions.get_mut(pair[0]) {
                if node.next.is_some() {
                    log::warn!("relinking construction {:?} that already has a successor", pair[0]);
                }
                node.next = Some(pair[1]);
            }
        }
        ids.first().copied()
    }

    pub fn is_this(&self, e: &Expression) -> bool {
        match e {
            Expression::Variable(id) => self
                .variables
                .get(*id)
                .is_some_and(|v| v.kind == VariableKind::This),
            _ => false,
        }
    }
}
