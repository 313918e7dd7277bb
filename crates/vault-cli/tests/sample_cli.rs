use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_file(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, text).expect("write file");
}

fn setup_vault(root: &Path) {
    write_file(&root.join("root_note.md"), "---\ntags: []\n---\nHello world\n");
    write_file(&root.join("notes/meeting.md"), "Meeting agenda and attendees\n");
    write_file(&root.join("notes/research.yml"), "title: Study\n");
    write_file(
        &root.join("projects/proj1.md"),
        "Project milestone and deadline\n",
    );
    write_file(&root.join("projects/proj2.md"), "Some content\n");
}

fn sample_cmd() -> Command {
    Command::cargo_bin("vault-sample").expect("binary builds")
}

#[test]
fn writes_reports_and_json_for_a_stratified_run() {
    let temp = TempDir::new().expect("tempdir");
    setup_vault(temp.path());
    let out = temp.path().join("out");

    sample_cmd()
        .args(["--root"])
        .arg(temp.path())
        .args(["--strategy", "dir", "--sample-size", "4", "--seed", "0"])
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Selected 4 files"));

    assert!(out.join("sample_analysis.md").exists());
    assert!(out.join("obsidian_template.md").exists());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("sample.json")).expect("json"))
            .expect("parse json");
    assert_eq!(json["sample"].as_array().map(Vec::len), Some(4));
}

#[test]
fn diverse_runs_are_deterministic_for_a_seed() {
    let temp = TempDir::new().expect("tempdir");
    // Reports land outside the scanned root so the second run sees the
    // same file set.
    let root = temp.path().join("vault");
    setup_vault(&root);

    let mut selections = Vec::new();
    for run in 0..2 {
        let out = temp.path().join(format!("out{run}"));
        sample_cmd()
            .arg("--root")
            .arg(&root)
            .args(["--strategy", "diverse", "--sample-size", "3", "--seed", "7"])
            .arg("--output-dir")
            .arg(&out)
            .assert()
            .success();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("sample.json")).expect("json"))
                .expect("parse json");
        let relatives: Vec<String> = json["sample"]
            .as_array()
            .expect("sample array")
            .iter()
            .map(|entry| entry["relative"].as_str().expect("relative").to_string())
            .collect();
        selections.push(relatives);
    }

    assert_eq!(selections[0], selections[1]);
    assert_eq!(selections[0].len(), 3);
}

#[test]
fn stratified_by_characteristic_uses_the_strata_key() {
    let temp = TempDir::new().expect("tempdir");
    setup_vault(temp.path());
    let out = temp.path().join("out");
    let json_out = temp.path().join("exports/picked.json");

    sample_cmd()
        .arg("--root")
        .arg(temp.path())
        .args([
            "--strategy",
            "char",
            "--strata-key",
            "has_frontmatter",
            "--sample-size",
            "5",
        ])
        .arg("--output-dir")
        .arg(&out)
        .arg("--json-out")
        .arg(&json_out)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_out).expect("json")).expect("parse json");
    assert_eq!(json["sample"].as_array().map(Vec::len), Some(5));
}

#[test]
fn no_matching_files_exits_with_code_two() {
    let temp = TempDir::new().expect("tempdir");
    fs::write(temp.path().join("only.txt"), "not included").expect("write");

    sample_cmd()
        .arg("--root")
        .arg(temp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No files found"));
}

#[test]
fn invalid_root_fails_with_an_error() {
    let temp = TempDir::new().expect("tempdir");

    sample_cmd()
        .arg("--root")
        .arg(temp.path().join("missing"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid root directory"));
}

#[test]
fn exclude_dirs_prune_matching_directories() {
    let temp = TempDir::new().expect("tempdir");
    setup_vault(temp.path());
    write_file(&temp.path().join("drafts/hidden.md"), "draft\n");
    let out = temp.path().join("out");

    sample_cmd()
        .arg("--root")
        .arg(temp.path())
        .args(["--strategy", "dir", "--sample-size", "100"])
        .args(["--exclude-dirs", "drafts", "notes"])
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("sample.json")).expect("json"))
            .expect("parse json");
    let relatives: Vec<&str> = json["sample"]
        .as_array()
        .expect("sample array")
        .iter()
        .map(|entry| entry["relative"].as_str().expect("relative"))
        .collect();
    assert_eq!(relatives.len(), 3);
    assert!(relatives.iter().all(|rel| !rel.starts_with("drafts/")));
    assert!(relatives.iter().all(|rel| !rel.starts_with("notes/")));
}
