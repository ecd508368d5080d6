mod construction;
mod declaration;

use std::borrow::Cow;

use pretty::{Arena, DocAllocator, DocBuilder};
use sdc_lang::ast::operators::{Affix, BinaryOp, Operation, Operators, UnaryOp, needs_brackets};
use sdc_lang::ast::{
    Expression, FieldAccess, FieldOwner, Increment, IncrementKind, Invocation,
};
use sdc_lang::construction::{
    Construction, ConstructionId, MethodBody, Variable, VariableId, VariableKind,
};
use slotmap::SecondaryMap;

use crate::Config;
use crate::error::PrintError;
use crate::language::{BindingSite, Language};

pub type Doc<'a> = DocBuilder<'a, Arena<'a>>;

/// Variables whose declaring occurrence has already been printed.
///
/// Keyed by variable identity, so two expression nodes that refer to the same
/// slot share one entry no matter where they sit in the tree.
#[derive(Debug, Default)]
pub struct DeclaredSet(SecondaryMap<VariableId, ()>);

impl DeclaredSet {
    /// Records `id`. Returns true only the first time.
    pub fn declare(&mut self, id: VariableId) -> bool {
        self.0.insert(id, ()).is_none()
    }

    pub fn contains(&self, id: VariableId) -> bool {
        self.0.contains_key(id)
    }
}

/// Traversal state of one method body.
pub struct Scope<'b> {
    body: &'b MethodBody,
    pub declared: DeclaredSet,
    visited: SecondaryMap<ConstructionId, ()>,
}

impl<'b> Scope<'b> {
    pub fn new(body: &'b MethodBody) -> Self {
        Self {
            body,
            declared: DeclaredSet::default(),
            visited: SecondaryMap::new(),
        }
    }

    pub fn body(&self) -> &'b MethodBody {
        self.body
    }

    pub fn variable(&self, id: VariableId) -> Result<&'b Variable, PrintError> {
        self.body
            .variables
            .get(id)
            .ok_or(PrintError::UnknownVariable(id))
    }

    pub fn peek(&self, id: ConstructionId) -> Result<&'b Construction, PrintError> {
        self.body
            .constructions
            .get(id)
            .ok_or(PrintError::UnknownConstruction(id))
    }

    /// Marks `id` as printed. Reaching the same construction twice means the
    /// chain is not a tree.
    pub fn enter(&mut self, id: ConstructionId) -> Result<&'b Construction, PrintError> {
        let node = self.peek(id)?;
        if self.visited.insert(id, ()).is_some() {
            return Err(PrintError::RevisitedConstruction(id));
        }
        Ok(node)
    }
}

pub struct Printer<'a, L: Language> {
    arena: &'a Arena<'a>,
    language: &'a L,
    config: Config,
}

impl<'a, L: Language> Printer<'a, L> {
    pub fn new(arena: &'a Arena<'a>, language: &'a L, config: Config) -> Self {
        Self {
            arena,
            language,
            config,
        }
    }

    pub fn arena(&self) -> &'a Arena<'a> {
        self.arena
    }

    pub fn language(&self) -> &'a L {
        self.language
    }

    pub fn indent(&self) -> isize {
        self.config.indent_size as isize
    }

    pub fn text<U: Into<Cow<'a, str>>>(&self, s: U) -> Doc<'a> {
        self.arena.text(s)
    }

    pub fn nil(&self) -> Doc<'a> {
        self.arena.nil()
    }

    pub fn hardline(&self) -> Doc<'a> {
        self.arena.hardline()
    }

    fn breakable_comma(&self) -> Doc<'a> {
        self.arena.text(",").append(self.arena.softline())
    }

    /// `{` body `}` with the body one level deeper. Every element of `body`
    /// starts with its own line break.
    pub fn braced(&self, body: Doc<'a>) -> Doc<'a> {
        self.text("{")
            .append(body.nest(self.indent()))
            .append(self.hardline())
            .append(self.text("}"))
    }

    /// Comma separated list that wraps greedily, continuation lines indented
    /// twice.
    pub fn list(&self, docs: Vec<Doc<'a>>) -> Doc<'a> {
        self.arena
            .intersperse(docs, self.breakable_comma())
            .nest(2 * self.indent())
            .group()
    }

    pub fn arguments(
        &self,
        arguments: &[Expression],
        scope: &mut Scope<'_>,
    ) -> Result<Doc<'a>, PrintError> {
        let docs = arguments
            .iter()
            .map(|arg| self.expression(arg, scope).map(|d| d.group()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.list(docs).parens())
    }

    /// Operation that decides whether `e` needs brackets when nested.
    fn operation_of(e: &Expression) -> Option<Operation> {
        match e {
            Expression::Constant(lit) if lit.is_negative() => {
                Some(Operation::Unary(UnaryOp::Negate))
            }
            Expression::Binary(op, ..) => Some(Operation::Binary(*op)),
            Expression::Unary(op, _) => Some(Operation::Unary(*op)),
            Expression::Ternary { .. } => Some(Operation::Ternary),
            Expression::Field(_) | Expression::Invocation(_) => Some(Operation::Member),
            Expression::ArrayLength(_) => Some(Operation::ArrayLength),
            Expression::Index { .. } => Some(Operation::Index),
            Expression::Cast { .. } => Some(Operation::Cast),
            Expression::InstanceOf { .. } => Some(Operation::InstanceOf),
            Expression::Increment(Increment { kind, .. }) => Some(match kind {
                IncrementKind::Postfix(step) => Operation::PostfixStep(*step),
                IncrementKind::Prefix(step) => Operation::PrefixStep(*step),
                IncrementKind::Compound(op, _) => Operation::CompoundAssign(*op),
            }),
            Expression::Constant(_)
            | Expression::Variable(_)
            | Expression::New { .. }
            | Expression::NewArray(_)
            | Expression::AnonymousClass { .. } => None,
        }
    }

    /// Prints `child` in a position of priority `parent`, adding brackets
    /// when its own priority would otherwise regroup the expression.
    pub fn operand(
        &self,
        child: &Expression,
        parent: Operation,
        associative: bool,
        scope: &mut Scope<'_>,
    ) -> Result<Doc<'a>, PrintError> {
        let ops = self.language.operators();
        let doc = self.expression(child, scope)?;
        Ok(match Self::operation_of(child) {
            Some(op) if needs_brackets(ops.priority(op), ops.priority(parent), associative) => {
                doc.parens()
            }
            _ => doc,
        })
    }

    /// Operand of a postfix or member-like operation, which chain freely
    /// when the provider calls them associative.
    fn owner(
        &self,
        child: &Expression,
        parent: Operation,
        scope: &mut Scope<'_>,
    ) -> Result<Doc<'a>, PrintError> {
        let associative = self.language.operators().is_associative(parent);
        self.operand(child, parent, associative, scope)
    }

    pub fn expression(&self, e: &Expression, scope: &mut Scope<'_>) -> Result<Doc<'a>, PrintError> {
        let ops = self.language.operators();
        match e {
            Expression::Constant(lit) => Ok(self.text(self.language.literal(lit))),
            Expression::Binary(op, lhs, rhs) => self.binary(*op, lhs, rhs, scope),
            Expression::Unary(op, operand) => {
                let operation = Operation::Unary(*op);
                let inner = self.owner(operand, operation, scope)?;
                let token = self.text(ops.token(operation));
                Ok(if ops.is_postfix(operation) {
                    inner.append(token)
                } else {
                    token.append(inner)
                })
            }
            Expression::Ternary {
                condition,
                then,
                otherwise,
            } => {
                let (prefix, question, colon) = self.language.ternary_tokens();
                let condition = self.expression(condition, scope)?;
                let then = self.operand(then, Operation::Ternary, false, scope)?;
                let otherwise = self.operand(otherwise, Operation::Ternary, false, scope)?;
                Ok(self
                    .text(prefix)
                    .append(condition.parens())
                    .append(
                        self.arena
                            .line()
                            .append(self.text(question))
                            .append(then)
                            .append(self.text(colon))
                            .append(otherwise)
                            .nest(self.indent()),
                    )
                    .group())
            }
            Expression::Field(FieldAccess { owner, name }) => match owner {
                FieldOwner::Instance(instance) => Ok(self
                    .owner(instance, Operation::Member, scope)?
                    .append(self.text(ops.token(Operation::Member)))
                    .append(self.text(name.clone()))),
                FieldOwner::Static(qualifier) if qualifier.is_empty() => {
                    Ok(self.text(name.clone()))
                }
                FieldOwner::Static(qualifier) => Ok(self.text(format!(
                    "{qualifier}{}{name}",
                    ops.token(Operation::Member)
                ))),
            },
            Expression::Variable(id) => self.variable(*id, scope),
            Expression::Invocation(invocation) => self.invocation(invocation, scope),
            Expression::New { class, arguments } => Ok(self
                .text(format!("{}{class}", self.language.new_keyword()))
                .append(self.arguments(arguments, scope)?)),
            Expression::NewArray(array) => self.language.new_array(self, array, scope),
            Expression::ArrayLength(array) => Ok(self
                .owner(array, Operation::ArrayLength, scope)?
                .append(self.text(ops.token(Operation::ArrayLength)))),
            Expression::Index { array, index } => {
                // `new int[3][0]` would read as a two dimensional creation.
                let owner = match **array {
                    Expression::NewArray(_) => self.expression(array, scope)?.parens(),
                    _ => self.owner(array, Operation::Index, scope)?,
                };
                Ok(owner.append(self.expression(index, scope)?.brackets()))
            }
            Expression::Cast { ty, operand } => match ops.cast(ty) {
                Affix::Prefix(head) => Ok(self
                    .text(head)
                    .append(self.owner(operand, Operation::Cast, scope)?)),
                Affix::Postfix(tail) => Ok(self
                    .owner(operand, Operation::Cast, scope)?
                    .append(self.text(tail))),
            },
            Expression::InstanceOf {
                operand,
                ty,
                inverted,
            } => {
                let operand = self.operand(operand, Operation::InstanceOf, true, scope)?;
                let test = |token: &str| {
                    operand
                        .clone()
                        .append(self.text(format!(" {token} {ty}")))
                };
                Ok(match (inverted, self.language.inverted_instance_of()) {
                    (false, _) => test(self.language.instance_of()),
                    (true, Some(token)) => test(token),
                    (true, None) => self
                        .text(ops.token(Operation::Unary(UnaryOp::Not)))
                        .append(test(self.language.instance_of()).parens()),
                })
            }
            Expression::Increment(increment) => self.increment(increment, false, scope),
            Expression::AnonymousClass { class, arguments } => {
                self.anonymous_class(class, arguments, scope)
            }
        }
    }

    fn binary(
        &self,
        op: BinaryOp,
        lhs: &Expression,
        rhs: &Expression,
        scope: &mut Scope<'_>,
    ) -> Result<Doc<'a>, PrintError> {
        let ops = self.language.operators();
        let operation = Operation::Binary(op);
        let left = self.operand(lhs, operation, true, scope)?;
        // `a + (b + c)` may drop its brackets, `a + (b - c)` may not.
        let same_op = matches!(rhs, Expression::Binary(child, ..) if *child == op);
        let right = self.operand(
            rhs,
            operation,
            same_op && ops.is_associative(operation),
            scope,
        )?;
        Ok(left
            .append(self.text(format!(" {}", ops.token(operation))))
            .append(self.arena.line().append(right).nest(self.indent()))
            .group())
    }

    fn variable(&self, id: VariableId, scope: &mut Scope<'_>) -> Result<Doc<'a>, PrintError> {
        let variable = scope.variable(id)?;
        let first_use = variable.kind == VariableKind::Local && scope.declared.declare(id);
        Ok(self.text(if first_use {
            log::trace!("declaring {} at its first use", variable.name);
            self.language
                .declaration(BindingSite::Local, &variable.name, &variable.ty)
        } else {
            variable.name.clone()
        }))
    }

    /// Variable introduced by a for-each, catch clause or signature. Always
    /// printed with its type.
    pub fn binding(
        &self,
        id: VariableId,
        site: BindingSite,
        scope: &mut Scope<'_>,
    ) -> Result<Doc<'a>, PrintError> {
        let variable = scope.variable(id)?;
        scope.declared.declare(id);
        Ok(self.text(
            self.language
                .declaration(site, &variable.name, &variable.ty),
        ))
    }

    fn invocation(
        &self,
        invocation: &Invocation,
        scope: &mut Scope<'_>,
    ) -> Result<Doc<'a>, PrintError> {
        let head = match &invocation.receiver {
            Some(receiver) if !scope.body().is_this(&receiver.instance) => {
                let separator = if receiver.not_null_checked {
                    self.language.not_null_separator()
                } else {
                    self.language.operators().token(Operation::Member)
                };
                self.owner(&receiver.instance, Operation::Member, scope)?
                    .append(self.text(separator))
            }
            _ => self.nil(),
        };
        Ok(head
            .append(self.text(invocation.function.clone()))
            .append(self.arguments(&invocation.arguments, scope)?))
    }

    /// `standalone` is set when the increment is a whole statement, so its
    /// value is never read.
    fn increment(
        &self,
        increment: &Increment,
        standalone: bool,
        scope: &mut Scope<'_>,
    ) -> Result<Doc<'a>, PrintError> {
        let ops = self.language.operators();
        let target = &increment.target;
        match &increment.kind {
            IncrementKind::Postfix(step) => {
                let operation = Operation::PostfixStep(*step);
                Ok(self
                    .owner(target, operation, scope)?
                    .append(self.text(ops.token(operation))))
            }
            IncrementKind::Prefix(step) => {
                let operation = Operation::PrefixStep(*step);
                Ok(self
                    .text(ops.token(operation))
                    .append(self.owner(target, operation, scope)?))
            }
            IncrementKind::Compound(op, amount) => {
                let operation = Operation::CompoundAssign(*op);
                let token = ops.token(operation);
                if token.is_empty() && !(standalone && target.is_side_effect_free()) {
                    return Err(PrintError::UnexpandableCompound(*op));
                }
                let target_doc = self.operand(target, operation, true, scope)?;
                if token.is_empty() {
                    // No compound form in this language: `x = x op amount`.
                    let value = self.binary(*op, target, amount, scope)?;
                    return Ok(target_doc
                        .append(self.text(format!(" {} ", ops.token(Operation::Assign))))
                        .append(value));
                }
                let amount = self.operand(amount, operation, false, scope)?;
                Ok(target_doc
                    .append(self.text(format!(" {token}")))
                    .append(self.arena.line().append(amount).nest(self.indent()))
                    .group())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use pretty::Arena;
    use sdc_lang::ast::builder::*;
    use sdc_lang::ast::statement::Statement;
    use sdc_lang::construction::MethodBody;

    use super::*;
    use crate::{Java, Kotlin, render_doc};

    fn java(e: &Expression, body: &MethodBody) -> String {
        let arena = Arena::new();
        let printer = Printer::new(&arena, &Java, Config::default());
        let mut scope = Scope::new(body);
        let doc = printer.expression(e, &mut scope).unwrap();
        render_doc(doc, 100).unwrap()
    }

    fn kotlin(e: &Expression, body: &MethodBody) -> String {
        let arena = Arena::new();
        let printer = Printer::new(&arena, &Kotlin, Config::default());
        let mut scope = Scope::new(body);
        let doc = printer.expression(e, &mut scope).unwrap();
        render_doc(doc, 100).unwrap()
    }

    fn a() -> Expression {
        name("a")
    }
    fn b() -> Expression {
        name("b")
    }
    fn c() -> Expression {
        name("c")
    }

    #[test]
    fn non_associative_right_operand() {
        let body = MethodBody::new();
        let e = binary(BinaryOp::Sub, a(), binary(BinaryOp::Sub, b(), c()));
        assert_eq!(java(&e, &body), "a - (b - c)");
        let e = binary(BinaryOp::Sub, binary(BinaryOp::Sub, a(), b()), c());
        assert_eq!(java(&e, &body), "a - b - c");
    }

    #[test]
    fn associative_chain_flattens() {
        let body = MethodBody::new();
        let e = binary(BinaryOp::Add, a(), binary(BinaryOp::Add, b(), c()));
        assert_eq!(java(&e, &body), "a + b + c");
        let e = binary(BinaryOp::Add, a(), binary(BinaryOp::Sub, b(), c()));
        assert_eq!(java(&e, &body), "a + (b - c)");
        let e = binary(BinaryOp::Mul, a(), binary(BinaryOp::Div, b(), c()));
        assert_eq!(java(&e, &body), "a * (b / c)");
    }

    #[test]
    fn precedence_brackets() {
        let body = MethodBody::new();
        let e = binary(BinaryOp::Mul, binary(BinaryOp::Add, a(), b()), c());
        assert_eq!(java(&e, &body), "(a + b) * c");
        let e = binary(BinaryOp::Add, a(), binary(BinaryOp::Mul, b(), c()));
        assert_eq!(java(&e, &body), "a + b * c");
        let e = binary(
            BinaryOp::Or,
            binary(BinaryOp::And, a(), b()),
            binary(BinaryOp::And, b(), c()),
        );
        assert_eq!(java(&e, &body), "a && b || b && c");
        let e = unary(UnaryOp::Negate, binary(BinaryOp::Add, a(), b()));
        assert_eq!(java(&e, &body), "-(a + b)");
        let e = unary(UnaryOp::Negate, int(-1));
        assert_eq!(java(&e, &body), "-(-1)");
    }

    #[test]
    fn ternary_layout() {
        let body = MethodBody::new();
        let e = ternary(
            binary(BinaryOp::Gt, a(), b()),
            a(),
            ternary(c(), b(), a()),
        );
        assert_eq!(java(&e, &body), "(a > b) ? a : ((c) ? b : a)");
        assert_eq!(
            kotlin(&ternary(c(), a(), b()), &body),
            "if (c) a else b"
        );
    }

    #[test]
    fn first_use_declares() {
        let mut body = MethodBody::new();
        let x = body.local("x", "int");
        let e = binary(BinaryOp::Add, var(x), var(x));
        assert_eq!(java(&e, &body), "int x + x");
        assert_eq!(kotlin(&e, &body), "var x: Int + x");
    }

    #[test]
    fn declared_set_is_identity_keyed() {
        let mut body = MethodBody::new();
        let x = body.local("x", "int");
        let y = body.local("x", "int");
        let mut declared = DeclaredSet::default();
        assert!(declared.declare(x));
        assert!(!declared.declare(x));
        assert!(declared.declare(y));
        assert!(declared.contains(x));
    }

    #[test]
    fn member_access() {
        let mut body = MethodBody::new();
        let this = body.this("Foo");
        let p = body.parameter("p", "Foo");
        let e = call(var(this), "run", vec![]);
        assert_eq!(java(&e, &body), "run()");
        let e = field(var(this), "count");
        assert_eq!(java(&e, &body), "this.count");
        let e = call(
            cast("Foo", var(p)),
            "bar",
            vec![int(1), string("s")],
        );
        assert_eq!(java(&e, &body), "((Foo) p).bar(1, \"s\")");
        let e = checked_call(var(p), "bar", vec![]);
        assert_eq!(java(&e, &body), "p.bar()");
        assert_eq!(kotlin(&e, &body), "p!!.bar()");
        let e = static_field("System", "out");
        assert_eq!(java(&e, &body), "System.out");
        let e = length(field(var(p), "items"));
        assert_eq!(java(&e, &body), "p.items.length");
        assert_eq!(kotlin(&e, &body), "p.items.size");
        let e = index(index(var(p), int(0)), int(1));
        assert_eq!(java(&e, &body), "p[0][1]");
    }

    #[test]
    fn instance_of_and_casts() {
        let mut body = MethodBody::new();
        let o = body.parameter("o", "Object");
        let e = instance_of(var(o), "String");
        assert_eq!(java(&e, &body), "o instanceof String");
        assert_eq!(java(&e.negate(), &body), "!(o instanceof String)");
        assert_eq!(kotlin(&e.negate(), &body), "o !is String");
        let e = cast("String", var(o));
        assert_eq!(kotlin(&e, &body), "o as String");
    }

    #[test]
    fn increments() {
        let mut body = MethodBody::new();
        let i = body.parameter("i", "int");
        assert_eq!(java(&post_increment(var(i)), &body), "i++");
        assert_eq!(java(&pre_decrement(var(i)), &body), "--i");
        let e = compound(BinaryOp::Add, var(i), int(2));
        assert_eq!(java(&e, &body), "i += 2");
        let e = compound(BinaryOp::Shl, var(i), int(2));
        assert_eq!(java(&e, &body), "i <<= 2");
    }

    fn kotlin_statement(stmt: &Statement, body: &MethodBody) -> Result<String, PrintError> {
        let arena = Arena::new();
        let printer = Printer::new(&arena, &Kotlin, Config::default());
        let mut scope = Scope::new(body);
        let doc = printer.statement(stmt, &mut scope)?;
        render_doc(doc, 100)
    }

    #[test]
    fn bitwise_compound_expands_only_when_repeatable() {
        let mut body = MethodBody::new();
        let i = body.parameter("i", "int");
        let a = body.parameter("a", "int[]");
        let e = compound(BinaryOp::Shl, var(i), int(2));
        assert_eq!(kotlin_statement(&eval(e), &body).unwrap(), "i = i shl 2");
        let e = compound(BinaryOp::BitAnd, index(var(a), var(i)), int(1));
        assert_eq!(
            kotlin_statement(&eval(e), &body).unwrap(),
            "a[i] = a[i] and 1"
        );
        assert_eq!(kotlin(&compound(BinaryOp::Add, var(i), int(2)), &body), "i += 2");

        let impure = compound(BinaryOp::Shl, index(var(a), post_increment(var(i))), int(2));
        assert_eq!(
            kotlin_statement(&eval(impure.clone()), &body),
            Err(PrintError::UnexpandableCompound(BinaryOp::Shl))
        );
        assert_eq!(java(&impure, &body), "a[i++] <<= 2");

        // Used as a value, e.g. the argument of a call.
        let nested = static_call("f", vec![compound(BinaryOp::Shl, var(i), int(2))]);
        assert_eq!(
            kotlin_statement(&eval(nested), &body),
            Err(PrintError::UnexpandableCompound(BinaryOp::Shl))
        );
    }

    #[test]
    fn index_on_array_creation_is_bracketed() {
        let body = MethodBody::new();
        let e = index(new_array("int", vec![int(3)]), int(0));
        assert_eq!(java(&e, &body), "(new int[3])[0]");
        let e = index(array_of("int", vec![int(1), int(2)]), int(0));
        assert_eq!(java(&e, &body), "(new int[] {1, 2})[0]");
        let e = length(new_array("int", vec![int(3)]));
        assert_eq!(java(&e, &body), "new int[3].length");
    }

    #[test]
    fn arguments_wrap_when_too_long() {
        let body = MethodBody::new();
        let e = static_call(
            "Math.max",
            vec![name("firstArgument"), name("secondArgument")],
        );
        let arena = Arena::new();
        let printer = Printer::new(&arena, &Java, Config::default());
        let mut scope = Scope::new(&body);
        let doc = printer.expression(&e, &mut scope).unwrap();
        assert_eq!(
            render_doc(doc, 30).unwrap(),
            "Math.max(firstArgument,\n        secondArgument)"
        );
    }
}
