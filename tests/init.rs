use assert_cmd::Command;
use predicates::prelude::predicate;

mod common;

#[test]
fn new_repository_initiated_with_metadata_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let mut sut = Command::cargo_bin("bak")?;

    sut.arg("init").arg(dir.path());

    sut.assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^Initialized empty backup repository in .+$",
        )?);

    assert!(dir.path().join(".bak").join("objects").is_dir());
    assert!(
        dir.path()
            .join(".bak")
            .join("refs")
            .join("heads")
            .is_dir()
    );
    assert!(
        dir.path()
            .join(".bak")
            .join("refs")
            .join("mirrors")
            .is_dir()
    );

    let head_content = std::fs::read_to_string(dir.path().join(".bak").join("HEAD"))?;
    assert_eq!(head_content, "ref: refs/heads/master");

    Ok(())
}

#[test]
fn init_creates_a_missing_target_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let target = dir.path().join("nested").join("backups");

    let mut sut = Command::cargo_bin("bak")?;
    sut.arg("init").arg(&target);

    sut.assert().success();
    assert!(target.join(".bak").join("objects").is_dir());

    Ok(())
}

#[test]
fn init_in_current_directory_when_no_path_given() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    common::command::run_bak_command(dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Initialized empty backup repository",
        ));

    assert!(dir.path().join(".bak").join("HEAD").is_file());

    Ok(())
}
