#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::TempDir;
use sha1::{Digest, Sha1};
use std::io::Read;
use std::path::Path;

/// Fresh directory to host a repository
pub fn repo_dir() -> TempDir {
    TempDir::new().expect("failed to create temp dir")
}

/// Fresh home directory carrying a `.gitconfig` with the given identity
pub fn home_dir_with_identity(name: &str, email: &str) -> TempDir {
    let home = TempDir::new().expect("failed to create temp home dir");
    std::fs::write(
        home.path().join(".gitconfig"),
        format!("[user]\n\tname = {name}\n\temail = {email}\n"),
    )
    .expect("failed to write .gitconfig");

    home
}

/// Build a `grit` invocation rooted in `repo` with `home` as $HOME
pub fn grit(repo: &Path, home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("grit").expect("grit binary should build");
    cmd.current_dir(repo).env("HOME", home);

    cmd
}

/// Write a file under the repository, creating parent directories
pub fn write_file(repo: &Path, relative: &str, content: &str) {
    let path = repo.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create parent dirs");
    }
    std::fs::write(path, content).expect("failed to write file");
}

/// Read a branch file, trimmed to the bare hex digest
pub fn read_ref(repo: &Path, name: &str) -> String {
    std::fs::read_to_string(repo.join(".git/refs/heads").join(name))
        .expect("branch file should exist")
        .trim()
        .to_string()
}

pub fn read_head(repo: &Path) -> String {
    std::fs::read_to_string(repo.join(".git/HEAD"))
        .expect("HEAD should exist")
        .to_string()
}

/// Load an object from the store: decompress and split off the header
pub fn read_object(repo: &Path, hex: &str) -> (String, Vec<u8>) {
    let (dir, file) = hex.split_at(2);
    let compressed = std::fs::read(repo.join(".git/objects").join(dir).join(file))
        .expect("object file should exist");

    let mut decoder = flate2::read::ZlibDecoder::new(&compressed[..]);
    let mut content = Vec::new();
    decoder
        .read_to_end(&mut content)
        .expect("object should be valid zlib");

    let nul = content
        .iter()
        .position(|&b| b == 0)
        .expect("object should have a header");
    let header = String::from_utf8(content[..nul].to_vec()).expect("header should be UTF-8");

    (header, content[nul + 1..].to_vec())
}

pub fn object_exists(repo: &Path, hex: &str) -> bool {
    let (dir, file) = hex.split_at(2);
    repo.join(".git/objects").join(dir).join(file).exists()
}

/// The digest a blob with this content is stored under
pub fn blob_oid(content: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("blob {}\0", content.len()).as_bytes());
    hasher.update(content);

    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

pub fn hex_to_bytes(hex: &str) -> Vec<u8> {
    hex.as_bytes()
        .chunks(2)
        .map(|pair| u8::from_str_radix(std::str::from_utf8(pair).unwrap(), 16).unwrap())
        .collect()
}

/// Tree digest recorded by a commit object
pub fn tree_oid_of_commit(repo: &Path, commit_hex: &str) -> String {
    let (header, body) = read_object(repo, commit_hex);
    assert!(header.starts_with("commit "), "unexpected header {header:?}");

    let body = String::from_utf8(body).expect("commit body should be UTF-8");
    body.lines()
        .next()
        .and_then(|line| line.strip_prefix("tree "))
        .expect("commit should start with a tree header")
        .to_string()
}

/// Entry count from the index header
pub fn index_entry_count(repo: &Path) -> u32 {
    let index = std::fs::read(repo.join(".git/index")).expect("index file should exist");
    assert_eq!(&index[..4], b"DIRC");

    u32::from_be_bytes(index[8..12].try_into().unwrap())
}

/// Object ID of the first index entry (offset 12 header + 40 stat bytes)
pub fn first_index_entry_oid(repo: &Path) -> String {
    let index = std::fs::read(repo.join(".git/index")).expect("index file should exist");

    index[52..72].iter().map(|byte| format!("{byte:02x}")).collect()
}
