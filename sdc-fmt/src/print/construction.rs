use pretty::DocAllocator;
use sdc_lang::ast::operators::{Operation, Operators};
use sdc_lang::ast::Expression;
use sdc_lang::ast::statement::Statement;
use sdc_lang::construction::{Construction, ConstructionId, ConstructionKind, Jump};

use super::{Doc, Printer, Scope};
use crate::error::PrintError;
use crate::language::{BindingSite, Language};

impl<'a, L: Language> Printer<'a, L> {
    /// Statement without its terminator.
    fn statement_body(&self, stmt: &Statement, scope: &mut Scope<'_>) -> Result<Doc<'a>, PrintError> {
        let ops = self.language.operators();
        match stmt {
            Statement::Expression(Expression::Increment(increment)) => {
                self.increment(increment, true, scope)
            }
            Statement::Expression(e) => self.expression(e, scope),
            Statement::Assignment { target, value } => {
                let target = self.expression(target, scope)?;
                let value = self.operand(value, Operation::Assign, true, scope)?;
                Ok(target
                    .append(self.text(format!(" {}", ops.token(Operation::Assign))))
                    .append(self.arena.line().append(value).nest(self.indent()))
                    .group())
            }
            Statement::Return { value, explicit } => match (value, explicit) {
                (Some(value), true) => Ok(self
                    .text("return ")
                    .append(self.expression(value, scope)?)),
                (Some(value), false) => self.expression(value, scope),
                (None, true) => Ok(self.text("return")),
                (None, false) => Ok(self.nil()),
            },
            Statement::Throw(e) => Ok(self
                .text("throw")
                .append(
                    self.arena
                        .line()
                        .append(self.expression(e, scope)?)
                        .nest(self.indent()),
                )
                .group()),
        }
    }

    pub fn statement(&self, stmt: &Statement, scope: &mut Scope<'_>) -> Result<Doc<'a>, PrintError> {
        Ok(self
            .statement_body(stmt, scope)?
            .append(self.text(self.language.statement_terminator())))
    }

    /// Walks a chain of constructions starting at `head`.
    ///
    /// Every printed element begins with its own line break, except the first
    /// one when `same_line` is set (the `if` of a collapsed `else if`).
    pub fn construction_chain(
        &self,
        head: Option<ConstructionId>,
        scope: &mut Scope<'_>,
        mut same_line: bool,
    ) -> Result<Doc<'a>, PrintError> {
        let mut doc = self.nil();
        let mut cursor = head;
        while let Some(id) = cursor {
            let node = scope.enter(id)?;
            log::trace!("printing construction {id:?}");
            let tight = same_line || matches!(node.kind, ConstructionKind::Block(_));
            if !tight {
                doc = doc.append(self.hardline());
            }
            if !self.rewrites_as_while(node) {
                doc = doc.append(self.label(node));
            }
            doc = doc
                .append(self.construction(node, scope)?)
                .append(self.jumps(node));
            same_line = false;
            cursor = node.next;
        }
        Ok(doc)
    }

    fn label(&self, node: &Construction) -> Doc<'a> {
        match &node.label {
            Some(label) => self.text(self.language.loop_label(label)),
            None => self.nil(),
        }
    }

    /// Counted loops in a language without the C form. Their label belongs
    /// to the `while`, not to the initializer printed before it.
    fn rewrites_as_while(&self, node: &Construction) -> bool {
        matches!(node.kind, ConstructionKind::For { .. }) && !self.language.c_style_for()
    }

    fn jump(&self, keyword: &str, jump: &Jump) -> Doc<'a> {
        let target = match &jump.label {
            Some(label) => format!("{keyword}{}{label}", self.language.jump_label_separator()),
            None => keyword.to_string(),
        };
        self.hardline().append(self.text(format!(
            "{target}{}",
            self.language.statement_terminator()
        )))
    }

    fn jumps(&self, node: &Construction) -> Doc<'a> {
        let mut doc = self.nil();
        if let Some(jump) = &node.break_to {
            doc = doc.append(self.jump("break", jump));
        }
        if let Some(jump) = &node.continue_to {
            doc = doc.append(self.jump("continue", jump));
        }
        doc
    }

    fn block_of(&self, head: ConstructionId, scope: &mut Scope<'_>) -> Result<Doc<'a>, PrintError> {
        Ok(self.braced(self.construction_chain(Some(head), scope, false)?))
    }

    /// Negated skip condition in parentheses.
    fn guard(
        &self,
        condition: &Expression,
        scope: &mut Scope<'_>,
    ) -> Result<Doc<'a>, PrintError> {
        Ok(self.expression(&condition.negate(), scope)?.parens())
    }

    fn construction(&self, node: &Construction, scope: &mut Scope<'_>) -> Result<Doc<'a>, PrintError> {
        match &node.kind {
            ConstructionKind::Block(statements) => {
                let mut doc = self.nil();
                for stmt in statements.iter().filter(|s| !s.is_silent()) {
                    doc = doc
                        .append(self.hardline())
                        .append(self.statement(stmt, scope)?);
                }
                Ok(doc)
            }
            ConstructionKind::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                let doc = self
                    .text("if ")
                    .append(self.guard(condition, scope)?)
                    .append(self.text(" "))
                    .append(self.block_of(*then_branch, scope)?);
                let Some(else_id) = else_branch else {
                    return Ok(doc);
                };
                let else_node = scope.peek(*else_id)?;
                let chained_if = match else_node.next {
                    Some(next) if else_node.is_empty_block() => {
                        matches!(scope.peek(next)?.kind, ConstructionKind::Conditional { .. })
                            .then_some(next)
                    }
                    _ => None,
                };
                match chained_if {
                    Some(next) => {
                        scope.enter(*else_id)?;
                        Ok(doc
                            .append(self.text(" else "))
                            .append(self.construction_chain(Some(next), scope, true)?))
                    }
                    None => Ok(doc
                        .append(self.text(" else "))
                        .append(self.block_of(*else_id, scope)?)),
                }
            }
            ConstructionKind::While { condition, body } => Ok(self
                .text("while ")
                .append(self.guard(condition, scope)?)
                .append(self.text(" "))
                .append(self.block_of(*body, scope)?)),
            ConstructionKind::DoWhile { condition, body } => Ok(self
                .text("do ")
                .append(self.block_of(*body, scope)?)
                .append(self.text(" while "))
                .append(self.expression(condition, scope)?.parens())
                .append(self.text(self.language.statement_terminator()))),
            ConstructionKind::For {
                init,
                condition,
                afterthought,
                body,
            } if self.rewrites_as_while(node) => {
                let mut doc = self.nil();
                if let Some(stmt) = init.as_ref().filter(|s| !s.is_silent()) {
                    doc = doc.append(self.statement(stmt, scope)?).append(self.hardline());
                }
                let mut inner = self.construction_chain(Some(*body), scope, false)?;
                if let Some(stmt) = afterthought.as_ref().filter(|s| !s.is_silent()) {
                    inner = inner
                        .append(self.hardline())
                        .append(self.statement(stmt, scope)?);
                }
                Ok(doc
                    .append(self.label(node))
                    .append(self.text("while "))
                    .append(self.guard(condition, scope)?)
                    .append(self.text(" "))
                    .append(self.braced(inner)))
            }
            ConstructionKind::For {
                init,
                condition,
                afterthought,
                body,
            } => {
                let init = match init {
                    Some(stmt) => self.statement_body(stmt, scope)?,
                    None => self.nil(),
                };
                let condition = self.expression(&condition.negate(), scope)?;
                let afterthought = match afterthought {
                    Some(stmt) => self
                        .text(" ")
                        .append(self.statement_body(stmt, scope)?),
                    None => self.nil(),
                };
                Ok(self
                    .text("for (")
                    .append(init)
                    .append(self.text("; "))
                    .append(condition)
                    .append(self.text(";"))
                    .append(afterthought)
                    .append(self.text(") "))
                    .append(self.block_of(*body, scope)?))
            }
            ConstructionKind::ForEach {
                variables,
                container,
                body,
            } => {
                let binding = match variables.as_slice() {
                    [variable] => self.binding(*variable, BindingSite::ForEach, scope)?,
                    [_, _, ..] if self.language.destructuring() => {
                        let bindings = variables
                            .iter()
                            .map(|v| self.binding(*v, BindingSite::ForEach, scope))
                            .collect::<Result<Vec<_>, _>>()?;
                        self.arena.intersperse(bindings, self.text(", ")).parens()
                    }
                    _ => return Err(PrintError::UnsupportedDestructuring(variables.len())),
                };
                Ok(self
                    .text("for (")
                    .append(binding)
                    .append(self.text(format!(" {} ", self.language.for_each_keyword())))
                    .append(self.expression(container, scope)?)
                    .append(self.text(") "))
                    .append(self.block_of(*body, scope)?))
            }
            ConstructionKind::TryCatch {
                body,
                catches,
                finally,
            } => {
                let mut doc = self.text("try ").append(self.block_of(*body, scope)?);
                for clause in catches {
                    let binding = self.binding(clause.variable, BindingSite::Catch, scope)?;
                    doc = doc
                        .append(self.text(" catch "))
                        .append(binding.parens())
                        .append(self.text(" "))
                        .append(self.block_of(clause.body, scope)?);
                }
                if let Some(finally) = finally {
                    doc = doc
                        .append(self.text(" finally "))
                        .append(self.block_of(*finally, scope)?);
                }
                Ok(doc)
            }
            ConstructionKind::Switch { selector, cases } => {
                let mut cases_doc = self.nil();
                for case in cases {
                    for key in &case.keys {
                        let label = match key {
                            Some(key) => format!("case {}:", self.language.literal(key)),
                            None => "default:".to_string(),
                        };
                        cases_doc = cases_doc.append(self.hardline()).append(self.text(label));
                    }
                    cases_doc = cases_doc.append(
                        self.construction_chain(Some(case.body), scope, false)?
                            .nest(self.indent()),
                    );
                }
                Ok(self
                    .text("switch ")
                    .append(self.expression(selector, scope)?.parens())
                    .append(self.text(" {"))
                    .append(cases_doc.nest(self.indent()))
                    .append(self.hardline())
                    .append(self.text("}")))
            }
            ConstructionKind::When {
                selector,
                arms,
                default,
            } => {
                let mut arms_doc = self.nil();
                for arm in arms {
                    arms_doc = arms_doc
                        .append(self.hardline())
                        .append(self.text(self.language.pattern_arm_prefix()))
                        .append(self.expression(&arm.guard, scope)?)
                        .append(self.text(" -> "))
                        .append(self.block_of(arm.body, scope)?);
                }
                let default_body = match default {
                    Some(body) => self.block_of(*body, scope)?,
                    None => self.text("{}"),
                };
                arms_doc = arms_doc
                    .append(self.hardline())
                    .append(self.text(format!("{} -> ", self.language.default_arm())))
                    .append(default_body);
                Ok(self
                    .text(format!("{} ", self.language.pattern_match_keyword()))
                    .append(self.expression(selector, scope)?.parens())
                    .append(self.text(" {"))
                    .append(arms_doc.nest(self.indent()))
                    .append(self.hardline())
                    .append(self.text("}")))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use pretty::Arena;
    use sdc_lang::ast::Literal;
    use sdc_lang::ast::builder::*;
    use sdc_lang::ast::operators::BinaryOp;
    use sdc_lang::construction::*;

    use super::*;
    use crate::{Config, Java, Kotlin, render_doc};

    fn render<L: Language>(language: &L, body: &MethodBody) -> Result<String, PrintError> {
        let arena = Arena::new();
        let printer = Printer::new(&arena, language, Config::default());
        let mut scope = Scope::new(body);
        let doc = printer.construction_chain(body.entry, &mut scope, false)?;
        render_doc(doc, 100)
    }

    #[test]
    fn jumps_follow_any_construction() {
        let mut body = MethodBody::new();
        let a = body.insert(
            Construction::new(ConstructionKind::Block(vec![eval(static_call("f", vec![]))]))
                .with_break(Some("L")),
        );
        let b = body.insert(Construction::new(ConstructionKind::Block(vec![])).with_continue(None));
        let c = body.insert(Construction::new(ConstructionKind::Block(vec![])).with_break(None));
        body.entry = body.chain(&[a, b, c]);
        assert_eq!(
            render(&Java, &body).unwrap(),
            "\nf();\nbreak L;\ncontinue;\nbreak;"
        );
        assert_eq!(
            render(&Kotlin, &body).unwrap(),
            "\nf()\nbreak@L\ncontinue\nbreak"
        );
    }

    #[test]
    fn single_declaration_across_constructions() {
        let mut body = MethodBody::new();
        let x = body.local("x", "int");
        let first = body.block(vec![assign(var(x), int(0))]);
        let inc = body.block(vec![eval(post_increment(var(x)))]);
        let cond = body.insert(Construction::new(ConstructionKind::Conditional {
            condition: binary(BinaryOp::Le, var(x), int(0)),
            then_branch: inc,
            else_branch: None,
        }));
        let last = body.block(vec![ret(Some(var(x)))]);
        body.entry = body.chain(&[first, cond, last]);
        assert_eq!(
            render(&Java, &body).unwrap(),
            "\nint x = 0;\nif (x > 0) {\n    x++;\n}\nreturn x;"
        );
    }

    #[test]
    fn else_if_collapses() {
        let mut body = MethodBody::new();
        let a = body.parameter("a", "int");
        let then1 = body.block(vec![ret(Some(int(1)))]);
        let then2 = body.block(vec![ret(Some(int(2)))]);
        let otherwise = body.block(vec![ret(Some(int(3)))]);
        let inner = body.insert(Construction::new(ConstructionKind::Conditional {
            condition: binary(BinaryOp::Ne, var(a), int(2)),
            then_branch: then2,
            else_branch: Some(otherwise),
        }));
        let carrier = body.block(vec![]);
        body.chain(&[carrier, inner]);
        let outer = body.insert(Construction::new(ConstructionKind::Conditional {
            condition: binary(BinaryOp::Ne, var(a), int(1)),
            then_branch: then1,
            else_branch: Some(carrier),
        }));
        body.entry = Some(outer);
        assert_eq!(
            render(&Java, &body).unwrap(),
            "\nif (a == 1) {\n    return 1;\n} else if (a == 2) {\n    return 2;\n} else {\n    return 3;\n}"
        );
    }

    #[test]
    fn else_with_jump_is_not_collapsed() {
        let mut body = MethodBody::new();
        let a = body.parameter("a", "boolean");
        let then1 = body.block(vec![]);
        let then2 = body.block(vec![]);
        let inner = body.insert(Construction::new(ConstructionKind::Conditional {
            condition: var(a),
            then_branch: then2,
            else_branch: None,
        }));
        let carrier = body.insert(Construction::new(ConstructionKind::Block(vec![])).with_break(None));
        body.chain(&[carrier, inner]);
        let outer = body.insert(Construction::new(ConstructionKind::Conditional {
            condition: var(a),
            then_branch: then1,
            else_branch: Some(carrier),
        }));
        body.entry = Some(outer);
        assert_eq!(
            render(&Java, &body).unwrap(),
            "\nif (!a) {\n} else {\n    break;\n    if (!a) {\n    }\n}"
        );
    }

    #[test]
    fn loops() {
        let mut body = MethodBody::new();
        let i = body.local("i", "int");
        let n = body.parameter("n", "int");
        let s = body.local("s", "String");
        let items = body.parameter("items", "List<String>");
        let for_body = body.block(vec![eval(static_call("f", vec![var(i)]))]);
        let for_loop = body.insert(Construction::new(ConstructionKind::For {
            init: Some(assign(var(i), int(0))),
            condition: binary(BinaryOp::Ge, var(i), var(n)),
            afterthought: Some(eval(post_increment(var(i)))),
            body: for_body,
        }));
        let each_body = body.block(vec![eval(static_call("g", vec![var(s)]))]);
        let each = body.insert(Construction::new(ConstructionKind::ForEach {
            variables: vec![s],
            container: var(items),
            body: each_body,
        }));
        let while_body = body.block(vec![]);
        let while_loop = body.insert(
            Construction::new(ConstructionKind::While {
                condition: boolean(false),
                body: while_body,
            })
            .with_label("outer"),
        );
        let do_body = body.block(vec![eval(pre_decrement(var(n)))]);
        let do_loop = body.insert(Construction::new(ConstructionKind::DoWhile {
            condition: binary(BinaryOp::Gt, var(n), int(0)),
            body: do_body,
        }));
        body.entry = body.chain(&[for_loop, each, while_loop, do_loop]);
        assert_eq!(
            render(&Java, &body).unwrap(),
            "
for (int i = 0; i < n; i++) {
    f(i);
}
for (String s : items) {
    g(s);
}
outer: while (true) {
}
do {
    --n;
} while (n > 0);"
        );
    }

    #[test]
    fn kotlin_loops() {
        let mut body = MethodBody::new();
        let i = body.local("i", "int");
        let n = body.parameter("n", "int");
        let k = body.local("k", "String");
        let v = body.local("v", "Int");
        let map = body.parameter("map", "Map<String, Int>");
        let for_body = body.block(vec![eval(static_call("f", vec![var(i)]))]);
        let for_loop = body.insert(
            Construction::new(ConstructionKind::For {
                init: Some(assign(var(i), int(0))),
                condition: binary(BinaryOp::Ge, var(i), var(n)),
                afterthought: Some(eval(post_increment(var(i)))),
                body: for_body,
            })
            .with_label("outer"),
        );
        let each_body = body.block(vec![eval(static_call("g", vec![var(k), var(v)]))]);
        let each = body.insert(Construction::new(ConstructionKind::ForEach {
            variables: vec![k, v],
            container: var(map),
            body: each_body,
        }));
        body.entry = body.chain(&[for_loop, each]);
        assert_eq!(
            render(&Kotlin, &body).unwrap(),
            "
var i: Int = 0
outer@ while (i < n) {
    f(i)
    i++
}
for ((k, v) in map) {
    g(k, v)
}"
        );
    }

    #[test]
    fn java_rejects_destructuring_for_each() {
        let mut body = MethodBody::new();
        let k = body.local("k", "String");
        let v = body.local("v", "int");
        let map = body.parameter("map", "Map<String, Integer>");
        let each_body = body.block(vec![]);
        body.entry = Some(body.insert(Construction::new(ConstructionKind::ForEach {
            variables: vec![k, v],
            container: var(map),
            body: each_body,
        })));
        assert_eq!(
            render(&Java, &body),
            Err(PrintError::UnsupportedDestructuring(2))
        );
    }

    #[test]
    fn try_catch_keeps_clause_order() {
        let mut body = MethodBody::new();
        let io = body.local("e", "IOException");
        let other = body.local("t", "Throwable");
        let guarded = body.block(vec![eval(static_call("read", vec![]))]);
        let first = body.block(vec![]);
        let second = body.block(vec![throw(var(other))]);
        let cleanup = body.block(vec![eval(static_call("close", vec![]))]);
        body.entry = Some(body.insert(Construction::new(ConstructionKind::TryCatch {
            body: guarded,
            catches: vec![
                CatchClause {
                    variable: io,
                    body: first,
                },
                CatchClause {
                    variable: other,
                    body: second,
                },
            ],
            finally: Some(cleanup),
        })));
        assert_eq!(
            render(&Java, &body).unwrap(),
            "
try {
    read();
} catch (IOException e) {
} catch (Throwable t) {
    throw t;
} finally {
    close();
}"
        );
        assert_eq!(
            render(&Kotlin, &body).unwrap(),
            "
try {
    read()
} catch (e: IOException) {
} catch (t: Throwable) {
    throw t
} finally {
    close()
}"
        );
    }

    #[test]
    fn switch_cases_and_default() {
        let mut body = MethodBody::new();
        let k = body.parameter("k", "int");
        let one = body.insert(
            Construction::new(ConstructionKind::Block(vec![eval(static_call("one", vec![]))]))
                .with_break(None),
        );
        let other = body.block(vec![eval(static_call("other", vec![]))]);
        body.entry = Some(body.insert(Construction::new(ConstructionKind::Switch {
            selector: var(k),
            cases: vec![
                SwitchCase {
                    keys: vec![Some(Literal::Int(1)), Some(Literal::Int(2))],
                    body: one,
                },
                SwitchCase {
                    keys: vec![None],
                    body: other,
                },
            ],
        })));
        assert_eq!(
            render(&Java, &body).unwrap(),
            "
switch (k) {
    case 1:
    case 2:
        one();
        break;
    default:
        other();
}"
        );
    }

    #[test]
    fn pattern_match_with_empty_default() {
        let mut body = MethodBody::new();
        let k = body.parameter("k", "Int");
        let arm = body.block(vec![eval(static_call("one", vec![]))]);
        body.entry = Some(body.insert(Construction::new(ConstructionKind::When {
            selector: var(k),
            arms: vec![WhenArm {
                guard: int(1),
                body: arm,
            }],
            default: None,
        })));
        assert_eq!(
            render(&Kotlin, &body).unwrap(),
            "
when (k) {
    1 -> {
        one()
    }
    else -> {}
}"
        );
        let mut body = MethodBody::new();
        let k = body.parameter("k", "int");
        body.entry = Some(body.insert(Construction::new(ConstructionKind::When {
            selector: var(k),
            arms: vec![],
            default: None,
        })));
        assert_eq!(
            render(&Java, &body).unwrap(),
            "\nswitch (k) {\n    default -> {}\n}"
        );
    }

    #[test]
    fn revisited_construction_is_an_error() {
        let mut body = MethodBody::new();
        let a = body.block(vec![]);
        body.constructions[a].next = Some(a);
        body.entry = Some(a);
        assert_eq!(
            render(&Java, &body),
            Err(PrintError::RevisitedConstruction(a))
        );
    }

    #[test]
    fn silent_return_prints_nothing() {
        let mut body = MethodBody::new();
        body.entry = Some(body.block(vec![
            eval(static_call("f", vec![])),
            Statement::Return {
                value: None,
                explicit: false,
            },
        ]));
        assert_eq!(render(&Java, &body).unwrap(), "\nf();");
    }
}
