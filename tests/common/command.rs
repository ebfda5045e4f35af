use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with one recorded snapshot of 1.txt, a/2.txt and a/b/3.txt
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_bak_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let file1 = FileSpec::new(repository_dir.path().join("1.txt"), "one".to_string());
    write_file(file1);

    let file2 = FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    );
    write_file(file2);

    let file3 = FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    );
    write_file(file3);

    bak_snapshot(repository_dir.path(), "Initial snapshot")
        .assert()
        .success();

    repository_dir
}

pub fn run_bak_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("bak").expect("Failed to find bak binary");
    cmd.envs(vec![("NO_PAGER", "1")]);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn bak_snapshot(dir: &Path, message: &str) -> Command {
    let mut cmd = run_bak_command(dir, &["snapshot", "-m", message]);
    cmd.envs(vec![
        ("BAK_AUTHOR_NAME", &"fake_user".to_string()),
        ("BAK_AUTHOR_EMAIL", &"fake_email@email.com".to_string()),
        ("BAK_AUTHOR_DATE", &"2023-01-01 12:00:00 +0000".to_string()), // %Y-%m-%d %H:%M:%S %z
    ]);
    cmd
}

/// Get the current HEAD snapshot SHA
pub fn get_head_snapshot_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_path = dir.join(".bak").join("HEAD");
    let head_content = std::fs::read_to_string(head_path)?;

    // HEAD contains either a snapshot SHA or a ref like "ref: refs/heads/master"
    if let Some(ref_path) = head_content.strip_prefix("ref: ") {
        let ref_file = dir.join(".bak").join(ref_path.trim());
        let snapshot_sha = std::fs::read_to_string(ref_file)?;
        Ok(snapshot_sha.trim().to_string())
    } else {
        Ok(head_content.trim().to_string())
    }
}

/// Get the SHA the mirror marker points at, if any sync ever finished
pub fn get_mirror_sha(dir: &Path) -> Option<String> {
    let marker = dir
        .join(".bak")
        .join("refs")
        .join("mirrors")
        .join("default");

    std::fs::read_to_string(marker)
        .ok()
        .map(|content| content.trim().to_string())
}
