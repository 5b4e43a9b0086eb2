use predicates::prelude::predicate;

mod common;

#[test]
fn init_creates_the_repository_layout() -> Result<(), Box<dyn std::error::Error>> {
    let dir = common::repo_dir();
    let home = common::home_dir_with_identity("Ada", "ada@example.com");

    common::grit(dir.path(), home.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Initialized empty Git repository in",
        ));

    assert!(dir.path().join(".git/objects").is_dir());
    assert!(dir.path().join(".git/refs/heads").is_dir());
    assert_eq!(common::read_head(dir.path()), "ref: refs/heads/master\n");
    // no branch file exists until the first commit
    assert!(!dir.path().join(".git/refs/heads/master").exists());

    Ok(())
}

#[test]
fn init_accepts_a_target_path() -> Result<(), Box<dyn std::error::Error>> {
    let dir = common::repo_dir();
    let home = common::home_dir_with_identity("Ada", "ada@example.com");
    let nested = dir.path().join("project");

    common::grit(dir.path(), home.path())
        .arg("init")
        .arg(&nested)
        .assert()
        .success();

    assert_eq!(common::read_head(&nested), "ref: refs/heads/master\n");

    Ok(())
}

#[test]
fn init_is_idempotent_on_an_existing_repository() -> Result<(), Box<dyn std::error::Error>> {
    let dir = common::repo_dir();
    let home = common::home_dir_with_identity("Ada", "ada@example.com");

    common::grit(dir.path(), home.path())
        .arg("init")
        .assert()
        .success();
    common::grit(dir.path(), home.path())
        .arg("init")
        .assert()
        .success();

    assert_eq!(common::read_head(dir.path()), "ref: refs/heads/master\n");

    Ok(())
}
