//! Class model shared by the golden tests of every target language.

use sdc_lang::ast::builder::*;
use sdc_lang::ast::operators::BinaryOp;
use sdc_lang::construction::{Construction, ConstructionKind};
use sdc_lang::decl::{
    Annotation, AnnotationValue, ClassDecl, ClassKind, FieldDecl, MethodDecl, Modifier, UnitError,
};

/// `Counter`, written against the target's spelling of the `int` type.
pub fn counter(int_type: &str) -> ClassDecl {
    let mut class = ClassDecl::new(
        vec![Modifier::Public, Modifier::Final],
        ClassKind::Class,
        "Counter",
    );
    class.package = Some("org.example".to_string());
    class.imports = ["java.io.IOException", "java.io.Serializable", "java.io.IOException"]
        .map(str::to_string)
        .to_vec();
    class.annotations = vec![
        Annotation::new("SuppressWarnings")
            .with("value", AnnotationValue::String("unchecked".to_string())),
    ];
    class.superclass = Some("Base".to_string());
    class.interfaces = vec!["Serializable".to_string()];

    let mut name = FieldDecl::new(
        vec![Modifier::Static, Modifier::Final, Modifier::Private],
        "String",
        "NAME",
    );
    name.initializer = Some(string("counter"));
    let mut count = FieldDecl::new(vec![Modifier::Private], int_type, "count");
    count.initializer = Some(int(0));
    class.fields = vec![name, count];

    class.methods = vec![constructor(int_type), step(int_type), load(), task()];

    let mut mode = ClassDecl::new(vec![Modifier::Public], ClassKind::Enum, "Mode").nested();
    mode.enum_constants = vec!["UP".to_string(), "DOWN".to_string()];
    class.inner_classes = vec![mode];
    class
}

fn constructor(int_type: &str) -> MethodDecl {
    let mut method = MethodDecl::new(vec![Modifier::Public], None, "Counter");
    let this = method.body.this("Counter");
    let start = method.add_parameter("start", int_type);
    let body = method
        .body
        .block(vec![assign(field(var(this), "count"), var(start))]);
    method.body.entry = Some(body);
    method
}

/// `if`/`else if`/`else` followed by a return.
fn step(int_type: &str) -> MethodDecl {
    let mut method = MethodDecl::new(vec![Modifier::Public], Some(int_type), "step");
    let this = method.body.this("Counter");
    let by = method.add_parameter("by", int_type);
    let body = &mut method.body;

    let add = body.block(vec![eval(compound(
        BinaryOp::Add,
        field(var(this), "count"),
        var(by),
    ))]);
    let fail = body.block(vec![throw(new(
        "IllegalStateException",
        vec![string("zero")],
    ))]);
    let reset = body.block(vec![eval(call(var(this), "reset", vec![]))]);
    let inner = body.insert(Construction::new(ConstructionKind::Conditional {
        condition: binary(BinaryOp::Ne, var(by), int(0)),
        then_branch: fail,
        else_branch: Some(reset),
    }));
    let carrier = body.block(vec![]);
    body.chain(&[carrier, inner]);
    let outer = body.insert(Construction::new(ConstructionKind::Conditional {
        condition: binary(BinaryOp::Le, var(by), int(0)),
        then_branch: add,
        else_branch: Some(carrier),
    }));
    let tail = body.block(vec![ret(Some(field(var(this), "count")))]);
    body.entry = body.chain(&[outer, tail]);
    method
}

/// Upstream gave up on this body, and what is left refers to a construction
/// that no longer exists.
fn load() -> MethodDecl {
    let mut method = MethodDecl::new(vec![Modifier::Public], Some("void"), "load");
    let path = method.add_parameter("path", "String");
    method.throws = vec!["IOException".to_string()];
    method.error = Some(UnitError {
        location: "Counter.load".to_string(),
        message: "NullPointerException at offset 12".to_string(),
    });
    let body = &mut method.body;
    let lost = body.block(vec![]);
    body.constructions.remove(lost);
    let check = body.insert(Construction::new(ConstructionKind::Conditional {
        condition: binary(BinaryOp::Eq, var(path), null()),
        then_branch: lost,
        else_branch: None,
    }));
    body.entry = Some(check);
    method
}

fn task() -> MethodDecl {
    let mut run = MethodDecl::new(vec![Modifier::Public], Some("void"), "run");
    let tick = run.body.block(vec![eval(static_call("tick", vec![]))]);
    run.body.entry = Some(tick);
    let mut runnable = ClassDecl::default().nested();
    runnable.interfaces = vec!["Runnable".to_string()];
    runnable.methods = vec![run];

    let mut method = MethodDecl::new(vec![Modifier::Public], Some("Runnable"), "task");
    let body = method
        .body
        .block(vec![ret(Some(anonymous(runnable, vec![])))]);
    method.body.entry = Some(body);
    method
}

/// A class whose own failure also broke one of its methods.
pub fn broken() -> ClassDecl {
    let mut class = ClassDecl::new(vec![Modifier::Public], ClassKind::Class, "Broken");
    class.error = Some(UnitError {
        location: "constant pool".to_string(),
        message: "unsupported attribute".to_string(),
    });
    let mut method = MethodDecl::new(vec![], Some("void"), "run");
    let lost = method.body.block(vec![]);
    method.body.constructions.remove(lost);
    method.body.entry = Some(lost);
    class.methods = vec![method];
    class
}
