//! Syntax tree fixtures for integration tests.
//!
//! Each scenario comes as a set of versioned declarations plus a `Main`
//! class driving them, built the way an external parser would hand them
//! over.

use polyver_ast::{
    Assign, AssignOp, BinaryOp, Block, CompilationUnit, ConstructorDecl, Expr, FieldDecl, Member,
    MethodDecl, Modifiers, Param, Stmt, TypeDecl, TypeRef,
};

/// `System.out.println(message);`
pub fn println(message: Expr) -> Stmt {
    Stmt::expr(Expr::method_call(
        Expr::field(Expr::name("System"), "out"),
        "println",
        vec![message],
    ))
}

/// `lhs + rhs`
pub fn concat(lhs: Expr, rhs: Expr) -> Expr {
    Expr::binary(BinaryOp::Add, lhs, rhs)
}

/// `receiver.name(args);`
pub fn call(receiver: &str, name: &str, args: Vec<Expr>) -> Stmt {
    Stmt::expr(Expr::method_call(Expr::name(receiver), name, args))
}

pub fn param(ty: &str, name: &str) -> Param {
    Param::new(TypeRef::new(ty), name)
}

/// A public void method.
pub fn method(name: &str, params: Vec<Param>, body: Vec<Stmt>) -> Member {
    Member::Method(MethodDecl {
        modifiers: Modifiers::public(),
        return_type: TypeRef::void(),
        name: name.to_string(),
        params,
        body: Some(Block::new(body)),
    })
}

pub fn constructor(class: &str, params: Vec<Param>, body: Vec<Stmt>) -> Member {
    Member::Constructor(ConstructorDecl {
        modifiers: Modifiers::public(),
        name: class.to_string(),
        params,
        body: Block::new(body),
    })
}

pub fn field(ty: &str, name: &str, init: Option<Expr>) -> Member {
    let mut decl = FieldDecl::new(Modifiers::public(), TypeRef::new(ty), name);
    decl.variables[0].init = init;
    Member::Field(decl)
}

/// A unit holding one public class.
pub fn class(name: &str, members: Vec<Member>) -> CompilationUnit {
    let mut ty = TypeDecl::class(name, Modifiers::public());
    ty.members = members;
    CompilationUnit::with_type(None, ty)
}

/// `public class Main { public static void main(String[] args) { ... } }`
pub fn main_class(body: Vec<Stmt>) -> CompilationUnit {
    class(
        "Main",
        vec![Member::Method(MethodDecl {
            modifiers: Modifiers::public().with_static(),
            return_type: TypeRef::void(),
            name: "main".to_string(),
            params: vec![Param::new(TypeRef::new("String").array_of(), "args")],
            body: Some(Block::new(body)),
        })],
    )
}

/// `Test t = new Test(args);`
pub fn new_local(class: &str, var: &str, args: Vec<Expr>) -> Stmt {
    Stmt::local(
        TypeRef::new(class),
        var,
        Some(Expr::new_object(TypeRef::new(class), args)),
    )
}

// ============================================================================
// Scenarios
// ============================================================================

/// Two versions of `Test`: both print from `display()`, and each logs a
/// different argument type.
pub fn display_log_versions() -> Vec<CompilationUnit> {
    let version = |n: u32, log_param: Param| {
        class(
            &format!("Test__{}__", n),
            vec![
                method(
                    "display",
                    vec![],
                    vec![println(Expr::string(format!("V{} display: Called.", n)))],
                ),
                method(
                    "log",
                    vec![log_param.clone()],
                    vec![println(concat(
                        Expr::string(format!("V{} log: ", n)),
                        Expr::name(&log_param.name),
                    ))],
                ),
            ],
        )
    };
    vec![
        version(1, param("int", "x")),
        version(2, param("String", "s")),
    ]
}

/// Calls `display()` between pinned `log` calls of either version.
pub fn display_log_main() -> CompilationUnit {
    main_class(vec![
        new_local("Test", "t", vec![]),
        call("t", "display", vec![]),
        call("t", "log", vec![Expr::int(123)]),
        call("t", "display", vec![]),
        call("t", "log", vec![Expr::string("hello")]),
        call("t", "display", vec![]),
    ])
}

pub fn display_log_program() -> Vec<CompilationUnit> {
    let mut units = display_log_versions();
    units.push(display_log_main());
    units
}

/// Version 1 has a default label and a no-argument constructor; version 2
/// takes its label as a constructor argument.
pub fn labeled_versions() -> Vec<CompilationUnit> {
    let describe = |n: u32, label: Expr| {
        method(
            "describe",
            vec![],
            vec![println(concat(
                Expr::string(format!("V{} describe: ", n)),
                label,
            ))],
        )
    };
    vec![
        class(
            "Test__1__",
            vec![
                field("String", "label", Some(Expr::string("none"))),
                constructor("Test__1__", vec![], vec![]),
                describe(1, Expr::name("label")),
            ],
        ),
        class(
            "Test__2__",
            vec![
                field("String", "label", None),
                constructor(
                    "Test__2__",
                    vec![param("String", "label")],
                    vec![Stmt::expr(Expr::assign(
                        Expr::this_field("label"),
                        Expr::name("label"),
                    ))],
                ),
                describe(2, Expr::this_field("label")),
            ],
        ),
    ]
}

/// Both versions declare a public `count` and print it from `show()`.
pub fn counter_versions() -> Vec<CompilationUnit> {
    (1..=2)
        .map(|n| {
            class(
                &format!("Test__{}__", n),
                vec![
                    field("int", "count", None),
                    method(
                        "show",
                        vec![],
                        vec![println(concat(
                            Expr::string(format!("V{} count: ", n)),
                            Expr::name("count"),
                        ))],
                    ),
                ],
            )
        })
        .collect()
}

/// Writes and reads `t.count` from outside the versioned type.
pub fn counter_main() -> CompilationUnit {
    let count = || Expr::field(Expr::name("t"), "count");
    main_class(vec![
        new_local("Test", "t", vec![]),
        Stmt::expr(Expr::assign(count(), Expr::int(5))),
        Stmt::expr(Expr::Assign(Assign {
            target: Box::new(count()),
            op: AssignOp::Add,
            value: Box::new(Expr::int(2)),
        })),
        println(concat(Expr::string("count: "), count())),
        call("t", "show", vec![]),
    ])
}

/// A non-versioned class that only uses plain locals.
pub fn helper_class() -> CompilationUnit {
    class(
        "Helper",
        vec![method(
            "sum",
            vec![param("int", "a"), param("int", "b")],
            vec![
                Stmt::local(
                    TypeRef::new("int"),
                    "total",
                    Some(concat(Expr::name("a"), Expr::name("b"))),
                ),
                println(concat(Expr::string("sum: "), Expr::name("total"))),
            ],
        )],
    )
}
