//! CLI end-to-end tests.
//!
//! These tests spawn the actual `polyver` binary and validate stdout, the
//! files it writes and its exit codes.
//!
//! Exit code expectations:
//! - 0: Success
//! - 2: Invalid arguments (missing input directory, bad config)
//! - 3: Input error (malformed syntax tree)
//! - 4: Synthesis failed for at least one group

use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

use polyver_ast::{
    BinaryOp, Block, CompilationUnit, Expr, Member, MethodDecl, Modifiers, Param, Stmt, TypeDecl,
    TypeRef,
};

/// Run polyver with given arguments and return (stdout, stderr, exit_code).
fn run_polyver(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_polyver"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute polyver");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

fn println(message: Expr) -> Stmt {
    Stmt::expr(Expr::method_call(
        Expr::field(Expr::name("System"), "out"),
        "println",
        vec![message],
    ))
}

fn public_method(name: &str, params: Vec<Param>, body: Vec<Stmt>) -> Member {
    Member::Method(MethodDecl {
        modifiers: Modifiers::public(),
        return_type: TypeRef::void(),
        name: name.to_string(),
        params,
        body: Some(Block::new(body)),
    })
}

fn version(n: u32, log_type: &str) -> CompilationUnit {
    let mut ty = TypeDecl::class(format!("Test__{}__", n), Modifiers::public());
    ty.members = vec![
        public_method(
            "display",
            vec![],
            vec![println(Expr::string(format!("V{} display: Called.", n)))],
        ),
        public_method(
            "log",
            vec![Param::new(TypeRef::new(log_type), "value")],
            vec![println(Expr::binary(
                BinaryOp::Add,
                Expr::string(format!("V{} log: ", n)),
                Expr::name("value"),
            ))],
        ),
    ];
    CompilationUnit::with_type(Some("demo".to_string()), ty)
}

fn main_unit() -> CompilationUnit {
    let call = |name: &str, args| Stmt::expr(Expr::method_call(Expr::name("t"), name, args));
    let mut ty = TypeDecl::class("Main", Modifiers::public());
    ty.members = vec![Member::Method(MethodDecl {
        modifiers: Modifiers::public().with_static(),
        return_type: TypeRef::void(),
        name: "main".to_string(),
        params: vec![Param::new(TypeRef::new("String").array_of(), "args")],
        body: Some(Block::new(vec![
            Stmt::local(
                TypeRef::new("Test"),
                "t",
                Some(Expr::new_object(TypeRef::new("Test"), vec![])),
            ),
            call("display", vec![]),
            call("log", vec![Expr::int(123)]),
        ])),
    })];
    CompilationUnit::with_type(Some("demo".to_string()), ty)
}

fn write_tree(dir: &Path, file: &str, unit: &CompilationUnit) {
    fs::write(dir.join(file), serde_json::to_string_pretty(unit).unwrap()).unwrap();
}

/// Input directory with two versions of `Test` and a `Main` using them.
fn display_log_input() -> TempDir {
    let input = TempDir::new().unwrap();
    write_tree(input.path(), "Test__1__.json", &version(1, "int"));
    write_tree(input.path(), "Test__2__.json", &version(2, "String"));
    write_tree(input.path(), "Main.json", &main_unit());
    input
}

// ============================================================================
// Transform
// ============================================================================

#[test]
fn transform_writes_java_sources() {
    let input = display_log_input();
    let out = TempDir::new().unwrap();

    let (stdout, stderr, exit_code) = run_polyver(&[
        "transform",
        path_arg(input.path()),
        "--out",
        path_arg(out.path()),
    ]);
    assert_eq!(exit_code, 0, "stderr: {}", stderr);

    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["inputs"], 3);
    assert_eq!(json["written"], serde_json::json!(["Test.java", "Main.java"]));
    assert_eq!(json["stats"]["pinned_calls"], 1);
    assert_eq!(json["digest"].as_str().map(str::len), Some(64));

    let test = fs::read_to_string(out.path().join("Test.java")).unwrap();
    assert!(test.starts_with("package demo;"), "{}", test);
    assert!(test.contains("public class Test {"), "{}", test);
    assert!(test.contains("public void __switchToVersion(int version) {"));

    let main = fs::read_to_string(out.path().join("Main.java")).unwrap();
    assert!(main.contains("t.__switchToVersion(1);"), "{}", main);
}

#[test]
fn transform_is_deterministic() {
    let input = display_log_input();
    let out_a = TempDir::new().unwrap();
    let out_b = TempDir::new().unwrap();

    let (first, _, code_a) = run_polyver(&[
        "transform",
        path_arg(input.path()),
        "--out",
        path_arg(out_a.path()),
    ]);
    let (second, _, code_b) = run_polyver(&[
        "transform",
        path_arg(input.path()),
        "--out",
        path_arg(out_b.path()),
    ]);
    assert_eq!((code_a, code_b), (0, 0));

    let first: Value = serde_json::from_str(&first).unwrap();
    let second: Value = serde_json::from_str(&second).unwrap();
    assert_eq!(first["digest"], second["digest"]);
    assert_eq!(
        fs::read_to_string(out_a.path().join("Test.java")).unwrap(),
        fs::read_to_string(out_b.path().join("Test.java")).unwrap()
    );
}

#[test]
fn transform_emits_json_trees() {
    let input = display_log_input();
    let out = TempDir::new().unwrap();

    let (_, stderr, exit_code) = run_polyver(&[
        "transform",
        path_arg(input.path()),
        "--out",
        path_arg(out.path()),
        "--emit",
        "json",
    ]);
    assert_eq!(exit_code, 0, "stderr: {}", stderr);

    let text = fs::read_to_string(out.path().join("Test.json")).unwrap();
    let unit: CompilationUnit = serde_json::from_str(&text).expect("output should be a tree");
    assert_eq!(unit.primary_type_name(), Some("Test"));
    assert_eq!(unit.package.as_deref(), Some("demo"));
}

#[test]
fn transform_with_custom_config() {
    let input = display_log_input();
    let out = TempDir::new().unwrap();
    let config = input.path().join("polyver.config");
    fs::write(&config, r#"{"naming": {"switch_method": "useVersion"}}"#).unwrap();

    let (_, stderr, exit_code) = run_polyver(&[
        "--config",
        path_arg(&config),
        "transform",
        path_arg(input.path()),
        "--out",
        path_arg(out.path()),
    ]);
    assert_eq!(exit_code, 0, "stderr: {}", stderr);

    let test = fs::read_to_string(out.path().join("Test.java")).unwrap();
    assert!(test.contains("public void useVersion(int version) {"), "{}", test);
    assert!(!test.contains("__switchToVersion"), "{}", test);
}

// ============================================================================
// Symbols
// ============================================================================

#[test]
fn symbols_reports_merged_classes() {
    let input = display_log_input();

    let (stdout, stderr, exit_code) = run_polyver(&["symbols", path_arg(input.path())]);
    assert_eq!(exit_code, 0, "stderr: {}", stderr);

    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "ok");
    let text = json["symbols"].to_string();
    assert!(text.contains("\"Test\""), "{}", text);
    assert!(text.contains("\"Main\""), "{}", text);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn missing_input_returns_exit_2() {
    let out = TempDir::new().unwrap();
    let missing = out.path().join("missing");

    let (stdout, _, exit_code) = run_polyver(&[
        "transform",
        path_arg(&missing),
        "--out",
        path_arg(out.path()),
    ]);
    assert_eq!(exit_code, 2);

    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["code"], 2);
}

#[test]
fn invalid_config_returns_exit_2() {
    let input = display_log_input();
    let config = input.path().join("bad.config");
    fs::write(&config, r#"{"naming": {"active_field": "not valid"}}"#).unwrap();

    let (_, _, exit_code) = run_polyver(&[
        "--config",
        path_arg(&config),
        "symbols",
        path_arg(input.path()),
    ]);
    assert_eq!(exit_code, 2);
}

#[test]
fn malformed_tree_returns_exit_3() {
    let input = display_log_input();
    fs::write(input.path().join("Broken.json"), "{ not json").unwrap();
    let out = TempDir::new().unwrap();

    let (stdout, _, exit_code) = run_polyver(&[
        "transform",
        path_arg(input.path()),
        "--out",
        path_arg(out.path()),
    ]);
    assert_eq!(exit_code, 3);

    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    let message = json["error"]["message"].as_str().unwrap_or_default();
    assert!(message.contains("Broken.json"), "{}", message);
}

#[test]
fn failed_group_returns_exit_4_and_writes_the_rest() {
    let input = display_log_input();
    let duplicate = version(2, "long");
    write_tree(input.path(), "Test__2__copy.json", &duplicate);
    let out = TempDir::new().unwrap();

    let (stdout, _, exit_code) = run_polyver(&[
        "transform",
        path_arg(input.path()),
        "--out",
        path_arg(out.path()),
    ]);
    assert_eq!(exit_code, 4);

    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "error");
    assert_eq!(json["failures"][0]["base_name"], "Test");
    assert_eq!(json["written"], serde_json::json!(["Main.java"]));
    assert!(out.path().join("Main.java").exists());
    assert!(!out.path().join("Test.java").exists());
}
