use predicates::prelude::predicate;
use pretty_assertions::assert_eq;

mod common;

#[test]
fn checkout_restores_a_deleted_file() -> Result<(), Box<dyn std::error::Error>> {
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

    std::fs::remove_file(dir.path().join("a.txt"))?;

    common::grit(dir.path(), home.path())
        .args(["checkout", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 1 paths from the index"));

    assert_eq!(std::fs::read_to_string(dir.path().join("a.txt"))?, "hello\n");

    Ok(())
}

#[test]
fn checkout_recreates_missing_parent_directories() -> Result<(), Box<dyn std::error::Error>> {
    let dir = common::repo_dir();
    let home = common::home_dir_with_identity("Ada", "ada@example.com");
    common::grit(dir.path(), home.path())
        .arg("init")
        .assert()
        .success();

    common::write_file(dir.path(), "src/lib/x.txt", "x\n");
    common::grit(dir.path(), home.path())
        .args(["add", "src/lib/x.txt"])
        .assert()
        .success();

    std::fs::remove_dir_all(dir.path().join("src"))?;

    common::grit(dir.path(), home.path())
        .args(["checkout", "src/lib/x.txt"])
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("src/lib/x.txt"))?,
        "x\n"
    );

    Ok(())
}

#[test]
fn checkout_of_an_unknown_path_fails_without_writing() -> Result<(), Box<dyn std::error::Error>> {
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
    std::fs::remove_file(dir.path().join("a.txt"))?;

    common::grit(dir.path(), home.path())
        .args(["checkout", "a.txt", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "'missing.txt' did not match any file(s) known to git",
        ));

    // the failing lookup happened before anything was restored
    assert!(!dir.path().join("a.txt").exists());
    assert!(!dir.path().join("missing.txt").exists());

    Ok(())
}

#[test]
fn checkout_handles_multiple_paths() -> Result<(), Box<dyn std::error::Error>> {
    let dir = common::repo_dir();
    let home = common::home_dir_with_identity("Ada", "ada@example.com");
    common::grit(dir.path(), home.path())
        .arg("init")
        .assert()
        .success();

    common::write_file(dir.path(), "a.txt", "a\n");
    common::write_file(dir.path(), "b.txt", "b\n");
    common::grit(dir.path(), home.path())
        .args(["add", "a.txt", "b.txt"])
        .assert()
        .success();

    std::fs::remove_file(dir.path().join("a.txt"))?;
    std::fs::remove_file(dir.path().join("b.txt"))?;

    common::grit(dir.path(), home.path())
        .args(["checkout", "a.txt", "b.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 2 paths from the index"));

    assert_eq!(std::fs::read_to_string(dir.path().join("a.txt"))?, "a\n");
    assert_eq!(std::fs::read_to_string(dir.path().join("b.txt"))?, "b\n");

    Ok(())
}
