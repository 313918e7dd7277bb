use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::characteristics::FileCharacteristics;
use crate::error::Result;
use crate::sampler::{Sample, StrataKey};
use crate::scanner::relative_posix;

/// Characteristic sections rendered in the analysis report.
const REPORT_KEYS: &[StrataKey] = &[
    StrataKey::Directory,
    StrataKey::SizeCategory,
    StrataKey::Age,
    StrataKey::Length,
    StrataKey::HasFrontmatter,
];

/// Strata represented by more than this many sampled files get a MOC
/// suggestion.
const MOC_MIN_COUNT: usize = 3;

/// How many tag suggestions the template report lists.
const TEMPLATE_TAG_LIMIT: usize = 10;

static UNSAFE_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid name regex"));
static NAME_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\s]+").expect("valid separator regex"));

/// Output locations produced by [`SampleReporter::write_all`].
pub struct ReportPaths {
    pub analysis: PathBuf,
    pub template: PathBuf,
    pub json: PathBuf,
}

/// Renders a sample into human-readable reports and a JSON export.
///
/// Pure serializations of the selection; nothing here feeds back into
/// sampling. Existing report files at the target paths are overwritten.
pub struct SampleReporter<'a> {
    root: &'a Path,
    total_files: usize,
}

#[derive(Serialize)]
struct SampleExport<'a> {
    root: String,
    sample: Vec<SampleEntry<'a>>,
}

#[derive(Serialize)]
struct SampleEntry<'a> {
    path: String,
    relative: String,
    characteristics: &'a FileCharacteristics,
}

impl<'a> SampleReporter<'a> {
    pub fn new(root: &'a Path, total_files: usize) -> Self {
        Self { root, total_files }
    }

    /// Markdown analysis report: structure suggestions, characteristic
    /// distributions, and per-file notes.
    #[must_use]
    pub fn render_analysis(&self, sample: &Sample) -> String {
        let mut md = String::new();
        md.push_str("# File Sample Analysis for Obsidian Migration\n\n");
        md.push_str(&format!("Sample size: {} files\n", sample.files.len()));
        md.push_str(&format!("Total files: {} files\n\n", self.total_files));

        md.push_str("## Recommended Obsidian Structure\n\n");

        md.push_str("### Suggested Maps of Content (MOCs)\n");
        let directories = sample
            .files
            .iter()
            .map(|path| sample.characteristics[path].directory.clone());
        for (directory, count) in ranked_counts(directories) {
            if count >= MOC_MIN_COUNT {
                md.push_str(&format!(
                    "- [[{} MOC]] - {count} files in sample\n",
                    title_case(&directory)
                ));
            }
        }
        md.push('\n');

        md.push_str("### Suggested Tag Hierarchy\n");
        for (hint, count) in ranked_counts(self.sampled_hints(sample)) {
            md.push_str(&format!("- `#{hint}` - appears in {count} sample files\n"));
        }
        md.push('\n');

        md.push_str("## Sample Characteristics\n\n");
        for key in REPORT_KEYS {
            md.push_str(&format!("### {}\n", title_case(key.as_str())));
            let labels = sample
                .files
                .iter()
                .map(|path| key.label_for(&sample.characteristics[path]));
            for (label, count) in ranked_counts(labels) {
                md.push_str(&format!("- {label}: {count}\n"));
            }
            md.push('\n');
        }

        md.push_str("## Sample Files Analysis\n\n");
        let mut ordered: Vec<&PathBuf> = sample.files.iter().collect();
        ordered.sort_by_key(|path| relative_posix(self.root, path));
        for path in ordered {
            let relative = relative_posix(self.root, path);
            let chars = &sample.characteristics[path];

            md.push_str(&format!("### {relative}\n"));
            md.push_str(&format!(
                "**Suggested Obsidian name**: `{}.md`\n\n",
                suggested_name(path)
            ));
            md.push_str(&format!("**Current location**: `{}/`\n", chars.directory));
            md.push_str(&format!(
                "**Characteristics**: {} size, {} length, {}\n",
                chars.size_category.as_str(),
                chars.length.as_str(),
                chars.age.as_str()
            ));
            if chars.has_frontmatter {
                md.push_str("**Has YAML frontmatter** (good for Obsidian)\n");
            } else {
                md.push_str("**No frontmatter** - consider adding for better organization\n");
            }
            if !chars.content_hints.is_empty() {
                let tags: Vec<String> = chars
                    .content_hints
                    .iter()
                    .map(|hint| format!("#{}", hint.as_str()))
                    .collect();
                md.push_str(&format!("**Suggested tags**: {}\n", tags.join(", ")));
            }
            md.push_str(&format!(
                "**Potential links**: Look for connections to other files in `{}`\n",
                chars.directory
            ));
            md.push_str("\n---\n\n");
        }

        md
    }

    /// Markdown frontmatter-template suggestion report.
    #[must_use]
    pub fn render_template_suggestions(&self, sample: &Sample) -> String {
        let mut md = String::new();
        md.push_str("# Obsidian Template Suggestions\n\n");
        md.push_str("## Frontmatter Template\n");
        md.push_str("Based on your sample analysis, here's a suggested template:\n\n");
        md.push_str("```markdown\n");
        md.push_str(FRONTMATTER_TEMPLATE);
        md.push_str("```\n\n");

        md.push_str("## Common Tags to Consider\n");
        for (hint, count) in ranked_counts(self.sampled_hints(sample))
            .into_iter()
            .take(TEMPLATE_TAG_LIMIT)
        {
            md.push_str(&format!("- `#{hint}` (appears {count} times in sample)\n"));
        }

        md.push_str("\n## Common Categories\n");
        let directories = sample
            .files
            .iter()
            .map(|path| sample.characteristics[path].directory.clone());
        for (directory, count) in ranked_counts(directories) {
            md.push_str(&format!("- `{directory}` ({count} files)\n"));
        }

        md
    }

    /// JSON export of the sampled paths and their full characteristic
    /// records.
    pub fn render_json(&self, sample: &Sample) -> Result<String> {
        let export = SampleExport {
            root: self.root.display().to_string(),
            sample: sample
                .files
                .iter()
                .map(|path| SampleEntry {
                    path: path.display().to_string(),
                    relative: relative_posix(self.root, path),
                    characteristics: &sample.characteristics[path],
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Write all three outputs, creating directories as needed.
    pub fn write_all(
        &self,
        sample: &Sample,
        output_dir: &Path,
        json_out: Option<&Path>,
    ) -> Result<ReportPaths> {
        fs::create_dir_all(output_dir)?;
        let paths = ReportPaths {
            analysis: output_dir.join("sample_analysis.md"),
            template: output_dir.join("obsidian_template.md"),
            json: json_out
                .map(Path::to_path_buf)
                .unwrap_or_else(|| output_dir.join("sample.json")),
        };

        fs::write(&paths.analysis, self.render_analysis(sample))?;
        fs::write(&paths.template, self.render_template_suggestions(sample))?;
        if let Some(parent) = paths.json.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&paths.json, self.render_json(sample)?)?;

        Ok(paths)
    }

    fn sampled_hints(&self, sample: &Sample) -> Vec<String> {
        sample
            .files
            .iter()
            .flat_map(|path| sample.characteristics[path].content_hints.iter())
            .map(|hint| hint.as_str().to_string())
            .collect()
    }
}

const FRONTMATTER_TEMPLATE: &str = "---\n\
tags: []\n\
created: {{date}}\n\
modified: {{date}}\n\
status: \n\
type: \n\
---\n\n\
# {{title}}\n\n\
## Links\n\n- \n\n\
## Tags\n\n- \n\n\
## Notes\n\n";

/// Occurrence counts ordered by count descending, then label ascending.
fn ranked_counts<I>(items: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Filename stem cleaned into an Obsidian-friendly note name.
fn suggested_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cleaned = UNSAFE_NAME_CHARS.replace_all(&stem, "");
    NAME_SEPARATORS.replace_all(&cleaned, "-").into_owned()
}

fn title_case(label: &str) -> String {
    label
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{FileSampler, SamplerConfig, StrataKey};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn build_sample(root: &Path) -> (FileSampler, Sample) {
        fs::create_dir_all(root.join("notes")).unwrap();
        fs::write(root.join("root_note.md"), "---\ntags: []\n---\nHello\n").unwrap();
        fs::write(root.join("notes/meeting one.md"), "Meeting agenda\n").unwrap();
        fs::write(root.join("notes/plain.md"), "Nothing special\n").unwrap();

        let mut sampler = FileSampler::new(root, SamplerConfig::default()).unwrap();
        let sample = sampler.stratified_sample(3, StrataKey::Directory);
        (sampler, sample)
    }

    #[test]
    fn analysis_report_covers_all_sections() {
        let temp = tempdir().unwrap();
        let (sampler, sample) = build_sample(temp.path());
        let reporter = SampleReporter::new(sampler.root(), sampler.files().len());
        let md = reporter.render_analysis(&sample);

        assert!(md.starts_with("# File Sample Analysis for Obsidian Migration"));
        assert!(md.contains("Sample size: 3 files"));
        assert!(md.contains("Total files: 3 files"));
        assert!(md.contains("### Suggested Tag Hierarchy"));
        assert!(md.contains("`#meeting`"));
        assert!(md.contains("### Size Category"));
        assert!(md.contains("### notes/meeting one.md"));
        assert!(md.contains("**Suggested Obsidian name**: `meeting-one.md`"));
        assert!(md.contains("**Has YAML frontmatter**"));
        assert!(md.contains("**No frontmatter**"));
    }

    #[test]
    fn template_report_lists_common_tags_and_categories() {
        let temp = tempdir().unwrap();
        let (sampler, sample) = build_sample(temp.path());
        let reporter = SampleReporter::new(sampler.root(), sampler.files().len());
        let md = reporter.render_template_suggestions(&sample);

        assert!(md.starts_with("# Obsidian Template Suggestions"));
        assert!(md.contains("created: {{date}}"));
        assert!(md.contains("- `#meeting` (appears 1 times in sample)"));
        assert!(md.contains("- `notes` (2 files)"));
        assert!(md.contains("- `root` (1 files)"));
    }

    #[test]
    fn json_export_round_trips_with_relative_paths() {
        let temp = tempdir().unwrap();
        let (sampler, sample) = build_sample(temp.path());
        let reporter = SampleReporter::new(sampler.root(), sampler.files().len());
        let json = reporter.render_json(&sample).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entries = parsed["sample"].as_array().unwrap();
        assert_eq!(entries.len(), 3);
        let relatives: Vec<&str> = entries
            .iter()
            .map(|entry| entry["relative"].as_str().unwrap())
            .collect();
        assert!(relatives.contains(&"root_note.md"));
        let root_entry = entries
            .iter()
            .find(|entry| entry["relative"] == "root_note.md")
            .unwrap();
        assert_eq!(root_entry["characteristics"]["has_frontmatter"], true);
        assert_eq!(root_entry["characteristics"]["directory"], "root");
        assert_eq!(root_entry["characteristics"]["age"], "recent");
    }

    #[test]
    fn write_all_creates_directories_and_overwrites() {
        let temp = tempdir().unwrap();
        let (sampler, sample) = build_sample(temp.path());
        let reporter = SampleReporter::new(sampler.root(), sampler.files().len());

        let out = temp.path().join("reports/nested");
        let paths = reporter.write_all(&sample, &out, None).unwrap();
        assert!(paths.analysis.exists());
        assert!(paths.template.exists());
        assert_eq!(paths.json, out.join("sample.json"));

        // Second write overwrites in place.
        let paths = reporter.write_all(&sample, &out, None).unwrap();
        assert!(paths.json.exists());
    }

    #[test]
    fn explicit_json_path_is_respected() {
        let temp = tempdir().unwrap();
        let (sampler, sample) = build_sample(temp.path());
        let reporter = SampleReporter::new(sampler.root(), sampler.files().len());

        let out = temp.path().join("reports");
        let json_out = temp.path().join("elsewhere/export.json");
        let paths = reporter
            .write_all(&sample, &out, Some(&json_out))
            .unwrap();
        assert_eq!(paths.json, json_out);
        assert!(json_out.exists());
    }
}
