use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

use common::command::{bak_snapshot, get_head_snapshot_sha, init_repository_dir, run_bak_command};
use common::file::{FileSpec, delete_path, write_file};

#[rstest]
fn name_status_lists_added_modified_and_deleted_files(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    let old_sha = get_head_snapshot_sha(repository_dir.path())?;

    // Modify 1.txt, delete a/2.txt, add 4.txt and a/5.txt
    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one modified".to_string(),
    ));
    delete_path(repository_dir.path().join("a").join("2.txt").as_path());
    write_file(FileSpec::new(
        repository_dir.path().join("4.txt"),
        "four".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("5.txt"),
        "five".to_string(),
    ));

    bak_snapshot(repository_dir.path(), "Second snapshot")
        .assert()
        .success();
    let new_sha = get_head_snapshot_sha(repository_dir.path())?;

    // Output is sorted by path, not grouped by status
    let expected_output = "M\t1.txt\nA\t4.txt\nD\ta/2.txt\nA\ta/5.txt\n".to_string();

    let actual_output = run_bak_command(repository_dir.path(), &["diff", &old_sha, &new_sha])
        .assert()
        .success();

    let stdout = actual_output.get_output().stdout.clone();
    let actual_output = String::from_utf8(stdout)?;

    pretty_assertions::assert_eq!(actual_output, expected_output);

    Ok(())
}

#[rstest]
fn diff_filter_restricts_the_listed_change_kinds(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    let old_sha = get_head_snapshot_sha(repository_dir.path())?;

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one modified".to_string(),
    ));
    delete_path(repository_dir.path().join("a").join("2.txt").as_path());
    write_file(FileSpec::new(
        repository_dir.path().join("4.txt"),
        "four".to_string(),
    ));

    bak_snapshot(repository_dir.path(), "Second snapshot")
        .assert()
        .success();
    let new_sha = get_head_snapshot_sha(repository_dir.path())?;

    let expected_output = "A\t4.txt\nD\ta/2.txt\n".to_string();

    let actual_output = run_bak_command(
        repository_dir.path(),
        &["diff", &old_sha, &new_sha, "--diff-filter=AD"],
    )
    .assert()
    .success();

    let stdout = actual_output.get_output().stdout.clone();
    let actual_output = String::from_utf8(stdout)?;

    pretty_assertions::assert_eq!(actual_output, expected_output);

    Ok(())
}

#[rstest]
fn identical_revisions_produce_an_empty_changeset(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    let sha = get_head_snapshot_sha(repository_dir.path())?;

    run_bak_command(repository_dir.path(), &["diff", &sha, &sha])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    Ok(())
}

#[rstest]
fn content_change_of_equal_length_is_reported_as_modified(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    let old_sha = get_head_snapshot_sha(repository_dir.path())?;

    // same byte length as "one", different content
    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "uno".to_string(),
    ));

    bak_snapshot(repository_dir.path(), "Rename contents")
        .assert()
        .success();
    let new_sha = get_head_snapshot_sha(repository_dir.path())?;

    run_bak_command(repository_dir.path(), &["diff", &old_sha, &new_sha])
        .assert()
        .success()
        .stdout(predicate::str::diff("M\t1.txt\n"));

    Ok(())
}

#[rstest]
fn deleting_a_directory_reports_each_contained_file(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    let old_sha = get_head_snapshot_sha(repository_dir.path())?;

    delete_path(repository_dir.path().join("a").as_path());

    bak_snapshot(repository_dir.path(), "Drop the a directory")
        .assert()
        .success();
    let new_sha = get_head_snapshot_sha(repository_dir.path())?;

    run_bak_command(repository_dir.path(), &["diff", &old_sha, &new_sha])
        .assert()
        .success()
        .stdout(predicate::str::diff("D\ta/2.txt\nD\ta/b/3.txt\n"));

    Ok(())
}

#[rstest]
fn revisions_resolve_from_refs_aliases_and_abbreviated_ids(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    let old_sha = get_head_snapshot_sha(repository_dir.path())?;

    write_file(FileSpec::new(
        repository_dir.path().join("4.txt"),
        "four".to_string(),
    ));
    bak_snapshot(repository_dir.path(), "Second snapshot")
        .assert()
        .success();

    let expected_output = "A\t4.txt\n".to_string();

    for (old, new) in [
        (old_sha.clone(), "HEAD".to_string()),
        (old_sha[..7].to_string(), "@".to_string()),
        ("HEAD^".to_string(), "master".to_string()),
        ("HEAD~1".to_string(), "HEAD".to_string()),
    ] {
        let actual_output = run_bak_command(repository_dir.path(), &["diff", &old, &new])
            .assert()
            .success();

        let stdout = actual_output.get_output().stdout.clone();
        let actual_output = String::from_utf8(stdout)?;

        pretty_assertions::assert_eq!(actual_output, expected_output, "diff {} {}", old, new);
    }

    Ok(())
}

#[rstest]
fn unknown_revision_is_an_error(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;

    run_bak_command(repository_dir.path(), &["diff", "nope", "HEAD"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown revision"));

    Ok(())
}

#[rstest]
fn file_replaced_by_directory_decomposes_into_delete_and_adds(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    let old_sha = get_head_snapshot_sha(repository_dir.path())?;

    // 1.txt becomes a directory containing one file
    delete_path(repository_dir.path().join("1.txt").as_path());
    write_file(FileSpec::new(
        repository_dir.path().join("1.txt").join("nested.txt"),
        "nested".to_string(),
    ));

    bak_snapshot(repository_dir.path(), "File becomes directory")
        .assert()
        .success();
    let new_sha = get_head_snapshot_sha(repository_dir.path())?;

    run_bak_command(repository_dir.path(), &["diff", &old_sha, &new_sha])
        .assert()
        .success()
        .stdout(predicate::str::diff("D\t1.txt\nA\t1.txt/nested.txt\n"));

    Ok(())
}
