use predicates::prelude::predicate;
use pretty_assertions::assert_eq;

mod common;

#[test]
fn branch_points_at_the_current_tip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = common::repo_dir();
    let home = common::home_dir_with_identity("Ada", "ada@example.com");
    common::grit(dir.path(), home.path())
        .arg("init")
        .assert()
        .success();

    common::write_file(dir.path(), "a.txt", "hello\n");
    common::grit(dir.path(), home.path())
        .args(["add", "a.txt"])
        .assert()
        .success();
    common::grit(dir.path(), home.path())
        .args(["commit", "-m", "first"])
        .assert()
        .success();

    common::grit(dir.path(), home.path())
        .args(["branch", "dev"])
        .assert()
        .success();

    assert_eq!(
        common::read_ref(dir.path(), "dev"),
        common::read_ref(dir.path(), "master")
    );

    Ok(())
}

#[test]
fn branch_from_a_detached_head_uses_the_detached_digest(
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = common::repo_dir();
    let home = common::home_dir_with_identity("Ada", "ada@example.com");
    common::grit(dir.path(), home.path())
        .arg("init")
        .assert()
        .success();

    common::write_file(dir.path(), "a.txt", "hello\n");
    common::grit(dir.path(), home.path())
        .args(["add", "a.txt"])
        .assert()
        .success();
    common::grit(dir.path(), home.path())
        .args(["commit", "-m", "first"])
        .assert()
        .success();

    let tip = common::read_ref(dir.path(), "master");
    std::fs::write(dir.path().join(".git/HEAD"), format!("{tip}\n"))?;

    common::grit(dir.path(), home.path())
        .args(["branch", "experiment"])
        .assert()
        .success();

    assert_eq!(common::read_ref(dir.path(), "experiment"), tip);

    Ok(())
}

#[test]
fn a_duplicate_branch_is_refused() -> Result<(), Box<dyn std::error::Error>> {
    let dir = common::repo_dir();
    let home = common::home_dir_with_identity("Ada", "ada@example.com");
    common::grit(dir.path(), home.path())
        .arg("init")
        .assert()
        .success();

    common::write_file(dir.path(), "a.txt", "hello\n");
    common::grit(dir.path(), home.path())
        .args(["add", "a.txt"])
        .assert()
        .success();
    common::grit(dir.path(), home.path())
        .args(["commit", "-m", "first"])
        .assert()
        .success();

    common::grit(dir.path(), home.path())
        .args(["branch", "dev"])
        .assert()
        .success();
    common::grit(dir.path(), home.path())
        .args(["branch", "dev"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    Ok(())
}

#[test]
fn branching_before_the_first_commit_is_refused() -> Result<(), Box<dyn std::error::Error>> {
    let dir = common::repo_dir();
    let home = common::home_dir_with_identity("Ada", "ada@example.com");
    common::grit(dir.path(), home.path())
        .arg("init")
        .assert()
        .success();

    common::grit(dir.path(), home.path())
        .args(["branch", "dev"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("without any commit"));

    assert!(!dir.path().join(".git/refs/heads/dev").exists());

    Ok(())
}
