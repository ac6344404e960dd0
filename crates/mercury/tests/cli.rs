//! CLI tests - drive the `mercury` binary end to end.

use assert_cmd::Command;
use tempfile::TempDir;

fn mercury(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mercury").unwrap();
    cmd.current_dir(dir.path()).env("XDG_CONFIG_HOME", dir.path().join("xdg"));
    cmd
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    let output = mercury(&dir).arg("--help").output().unwrap();
    assert!(output.status.success());
    let help = stdout_of(&output);
    for command in ["compile", "translate", "run", "repl"] {
        assert!(help.contains(command), "missing {command} in:\n{help}");
    }
}

#[test]
fn test_compile_writes_python_next_to_source() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("hello.merc"),
        "func hello(name)(\n    write(\"hi\", name); // greet\n)\nhello(\"you\");\n",
    )
    .unwrap();

    let output = mercury(&dir).args(["compile", "hello.merc"]).output().unwrap();
    assert!(output.status.success(), "{}", stderr_of(&output));
    assert!(stdout_of(&output).contains("Compiled hello.merc -> hello.py"));

    let python = std::fs::read_to_string(dir.path().join("hello.py")).unwrap();
    assert_eq!(
        python,
        "def hello(name):\n    # greet\n    print(\"hi\", name)\nhello(\"you\")"
    );
}

#[test]
fn test_compile_many_files_with_shared_module() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("common.merc"), "var answer = 42;").unwrap();
    std::fs::write(dir.path().join("a.merc"), "use common;\nwrite(common.answer);").unwrap();
    std::fs::write(dir.path().join("b.merc"), "use common;\nvar x = common.answer;").unwrap();

    let output = mercury(&dir)
        .args(["compile", "a.merc", "b.merc"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr_of(&output));

    assert_eq!(
        std::fs::read_to_string(dir.path().join("__mer_common.py")).unwrap(),
        "answer = 42"
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("b.py")).unwrap(),
        "import __mer_common as common\nx = common.answer"
    );
}

#[test]
fn test_compile_reports_offending_line() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.merc"), "var a = 1;\nwrite(a)\n").unwrap();

    let output = mercury(&dir).args(["compile", "bad.merc"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("line 2: missing `;`"), "{stderr}");
    assert!(stderr.contains("write(a)"), "{stderr}");
    assert!(!dir.path().join("bad.py").exists());
}

#[test]
fn test_compile_missing_file() {
    let dir = TempDir::new().unwrap();
    let output = mercury(&dir).args(["compile", "ghost.merc"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("not found"));
}

#[test]
fn test_translate_from_stdin() {
    let dir = TempDir::new().unwrap();
    let output = mercury(&dir)
        .args(["translate", "-"])
        .write_stdin("var n = 3;\nwhile (n > 0)(\nn = n - 1;\n)\n")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr_of(&output));
    assert_eq!(stdout_of(&output), "n = 3\nwhile (n > 0):\n    n = n - 1\n");
}

#[test]
fn test_translate_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("one.merc"), "write(1);").unwrap();
    let output = mercury(&dir)
        .args(["translate", "one.merc", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["code"], "print(1)");
    assert_eq!(json["target_language"], "python");
}

#[test]
fn test_project_config_is_applied() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".mercury")).unwrap();
    std::fs::write(
        dir.path().join(".mercury/config.toml"),
        "[translate]\nstrict_blocks = true\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("open.merc"), "func f()(\nreturn 1;\n").unwrap();

    let output = mercury(&dir).args(["compile", "open.merc"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("never closed"));
}

#[test]
fn test_run_executes_program() {
    if which::which("python3").is_err() {
        return;
    }
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("sq.merc"), "func sq(x)(\nreturn x * x;\n)").unwrap();
    std::fs::write(
        dir.path().join("main.merc"),
        "use sq;\nfor i in 1..4(\nwrite(sq.sq(i));\n)",
    )
    .unwrap();

    let output = mercury(&dir).args(["run", "main.merc"]).output().unwrap();
    assert!(output.status.success(), "{}", stderr_of(&output));
    assert_eq!(stdout_of(&output), "1\n4\n9\n");
}
