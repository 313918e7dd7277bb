use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use vault_sampler::{
    distance, relative_posix, FileSampler, SampleReporter, SamplerConfig, StrataKey,
};

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

fn sampler_with_seed(root: &Path, seed: u64) -> FileSampler {
    FileSampler::new(
        root,
        SamplerConfig {
            seed,
            ..SamplerConfig::default()
        },
    )
    .expect("sampler")
}

#[test]
fn scan_finds_all_five_files_in_relative_order() {
    let temp = TempDir::new().expect("tempdir");
    setup_vault(temp.path());

    let mut sampler = sampler_with_seed(temp.path(), 0);
    sampler.scan_files();

    let rels: Vec<String> = sampler
        .files()
        .iter()
        .map(|p| relative_posix(sampler.root(), p))
        .collect();
    assert_eq!(
        rels,
        vec![
            "notes/meeting.md",
            "notes/research.yml",
            "projects/proj1.md",
            "projects/proj2.md",
            "root_note.md",
        ]
    );
}

#[test]
fn characteristics_capture_frontmatter_and_hints() {
    let temp = TempDir::new().expect("tempdir");
    setup_vault(temp.path());

    let mut sampler = sampler_with_seed(temp.path(), 0);
    sampler.scan_files();
    let sample = sampler.stratified_sample(5, StrataKey::Directory);

    let by_rel = |suffix: &str| {
        sample
            .characteristics
            .iter()
            .find(|(path, _)| path.ends_with(suffix))
            .map(|(_, chars)| chars.clone())
            .expect("characteristics present")
    };

    let root_note = by_rel("root_note.md");
    assert!(root_note.has_frontmatter);
    assert_eq!(root_note.directory, "root");
    assert_eq!(root_note.depth, 0);

    let meeting = by_rel("notes/meeting.md");
    assert!(!meeting.has_frontmatter);
    assert_eq!(meeting.directory, "notes");
    assert!(meeting
        .content_hints
        .iter()
        .any(|hint| hint.as_str() == "meeting"));

    let proj = by_rel("projects/proj1.md");
    assert!(proj
        .content_hints
        .iter()
        .any(|hint| hint.as_str() == "project"));
}

#[test]
fn stratified_by_directory_with_k4_returns_exactly_four() {
    let temp = TempDir::new().expect("tempdir");
    setup_vault(temp.path());

    let mut sampler = sampler_with_seed(temp.path(), 0);
    let sample = sampler.stratified_sample(4, StrataKey::Directory);
    assert_eq!(sample.files.len(), 4);

    // Proportional over the 1/2/2 split: every stratum represented.
    let dirs: Vec<String> = sample
        .files
        .iter()
        .map(|path| sample.characteristics[path].directory.clone())
        .collect();
    for dir in ["root", "notes", "projects"] {
        assert!(dirs.iter().any(|d| d == dir), "missing stratum {dir}");
    }
}

#[test]
fn same_seed_same_diverse_selection() {
    let temp = TempDir::new().expect("tempdir");
    setup_vault(temp.path());

    let mut a = sampler_with_seed(temp.path(), 123);
    let mut b = sampler_with_seed(temp.path(), 123);

    let sample_a: Vec<String> = a
        .diverse_sample(3)
        .files
        .iter()
        .map(|p| relative_posix(a.root(), p))
        .collect();
    let sample_b: Vec<String> = b
        .diverse_sample(3)
        .files
        .iter()
        .map(|p| relative_posix(b.root(), p))
        .collect();

    assert_eq!(sample_a, sample_b);
    assert_eq!(sample_a.len(), 3);
}

#[test]
fn distance_is_symmetric_across_the_fixture() {
    let temp = TempDir::new().expect("tempdir");
    setup_vault(temp.path());

    let mut sampler = sampler_with_seed(temp.path(), 0);
    sampler.scan_files();
    let sample = sampler.stratified_sample(5, StrataKey::Directory);

    let records: Vec<_> = sample.characteristics.values().collect();
    for a in &records {
        for b in &records {
            assert_eq!(distance(a, b), distance(b, a));
        }
        assert_eq!(distance(a, a), 0.0);
    }
}

#[test]
fn full_pipeline_writes_all_reports() {
    let temp = TempDir::new().expect("tempdir");
    setup_vault(temp.path());

    let mut sampler = sampler_with_seed(temp.path(), 0);
    sampler.scan_files();
    let sample = sampler.diverse_sample(4);

    let reporter = SampleReporter::new(sampler.root(), sampler.files().len());
    let out = temp.path().join("out");
    let paths = reporter.write_all(&sample, &out, None).expect("write reports");

    let analysis = fs::read_to_string(&paths.analysis).expect("analysis");
    assert!(analysis.contains("Sample size: 4 files"));
    assert!(analysis.contains("Total files: 5 files"));

    let template = fs::read_to_string(&paths.template).expect("template");
    assert!(template.contains("# Obsidian Template Suggestions"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.json).expect("json")).expect("parse");
    assert_eq!(json["sample"].as_array().map(Vec::len), Some(4));
}
