use assert_cmd::cargo;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::{TempDir, tempdir};

struct Sandbox {
    _td: TempDir,
    base: PathBuf,
    cfg: PathBuf,
}

fn sandbox() -> Sandbox {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();
    let cfg = base.join("config.xml");
    fs::write(&cfg, "<config>\n  <log_level>quiet</log_level>\n</config>\n").unwrap();
    Sandbox { _td: td, base, cfg }
}

fn run(sb: &Sandbox, args: &[&dyn AsRef<std::ffi::OsStr>]) -> Output {
    let mut cmd = Command::new(cargo::cargo_bin!("safe_tree"));
    cmd.env("SAFE_TREE_CONFIG", &sb.cfg);
    for a in args {
        cmd.arg(a);
    }
    cmd.output().expect("spawn binary")
}

fn write(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

#[test]
fn list_json_is_parseable() {
    let sb = sandbox();
    let dir = sb.base.join("data");
    write(&dir.join("a.txt"), "a");
    write(&dir.join("sub/b.rs"), "b");

    let out = run(&sb, &[&"list", &dir, &"--recursive", &"--format", &"json"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is json");
    let names: Vec<&str> = v
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["full_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["a.txt", "sub", "b.rs"]);
    assert_eq!(v[1]["kind"], "directory");
}

#[test]
fn list_text_marks_directories() {
    let sb = sandbox();
    let dir = sb.base.join("data");
    write(&dir.join("f.txt"), "f");
    fs::create_dir_all(dir.join("d")).unwrap();

    let out = run(&sb, &[&"list", &dir, &"--no-files"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.trim(), format!("{}/", dir.join("d").display()));
}

#[test]
fn copy_then_delete() {
    let sb = sandbox();
    write(&sb.base.join("src/tree/one.txt"), "1");
    write(&sb.base.join("src/tree/deep/two.txt"), "2");
    let dest = sb.base.join("dest");

    let out = run(&sb, &[&"copy", &sb.base.join("src/tree"), &dest]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read_to_string(dest.join("tree/deep/two.txt")).unwrap(), "2");

    let out = run(&sb, &[&"delete", &dest.join("tree")]);
    assert!(out.status.success());
    assert!(!dest.join("tree").exists());
    assert_eq!(fs::read_dir(&dest).unwrap().count(), 0);
}

#[test]
fn copy_with_fail_policy_reports_conflict() {
    let sb = sandbox();
    write(&sb.base.join("src/a.txt"), "new");
    write(&sb.base.join("dest/a.txt"), "old");

    let out = run(
        &sb,
        &[&"--on-conflict", &"fail", &"copy", &sb.base.join("src/a.txt"), &sb.base.join("dest")],
    );
    assert_eq!(out.status.code(), Some(3));
    assert_eq!(fs::read_to_string(sb.base.join("dest/a.txt")).unwrap(), "old");
}

#[test]
fn delete_files_rejects_directories() {
    let sb = sandbox();
    let file = sb.base.join("f.txt");
    write(&file, "keep");
    let dir = sb.base.join("d");
    fs::create_dir_all(&dir).unwrap();

    let out = run(&sb, &[&"delete-files", &file, &dir]);
    assert_eq!(out.status.code(), Some(8));
    assert!(file.exists());
    assert!(dir.exists());
}

#[test]
fn missing_path_exits_with_not_found() {
    let sb = sandbox();
    let out = run(&sb, &[&"delete", &sb.base.join("ghost")]);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("not found"), "stderr: {stderr}");
}

#[test]
fn move_and_rename() {
    let sb = sandbox();
    write(&sb.base.join("in/report.txt"), "r");
    fs::create_dir_all(sb.base.join("out")).unwrap();

    let out = run(&sb, &[&"--no-safe-mode", &"move", &sb.base.join("in/report.txt"), &sb.base.join("out")]);
    assert!(out.status.success());
    assert!(!sb.base.join("in/report.txt").exists());

    let out = run(&sb, &[&"rename", &sb.base.join("out/report.txt"), &"final.txt"]);
    assert!(out.status.success());
    assert_eq!(fs::read_to_string(sb.base.join("out/final.txt")).unwrap(), "r");
}

#[test]
fn init_config_writes_template_once() {
    let td = tempdir().unwrap();
    let cfg = fs::canonicalize(td.path()).unwrap().join("nested/config.xml");

    let init = || {
        Command::new(cargo::cargo_bin!("safe_tree"))
            .env("SAFE_TREE_CONFIG", &cfg)
            .arg("init-config")
            .output()
            .expect("spawn binary")
    };
    assert!(init().status.success());
    let body = fs::read_to_string(&cfg).unwrap();
    assert!(body.contains("<safe_mode>true</safe_mode>"));
    assert!(!init().status.success(), "second init must not overwrite");
}

#[test]
fn print_config_shows_env_override() {
    let sb = sandbox();
    let out = run(&sb, &[&"--print-config"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains(&sb.cfg.display().to_string()), "stdout: {stdout}");
}

#[test]
fn explicit_missing_config_is_an_error() {
    let td = tempdir().unwrap();
    let out = Command::new(cargo::cargo_bin!("safe_tree"))
        .env("SAFE_TREE_CONFIG", td.path().join("absent.xml"))
        .args(["list", "."])
        .output()
        .expect("spawn binary");
    assert!(!out.status.success());
}
