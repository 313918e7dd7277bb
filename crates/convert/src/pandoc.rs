use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{ConvertError, Result};
use crate::{markdown_sibling, Converter};

/// Extension to pandoc input-format mapping.
const FORMAT_MAP: &[(&str, &str)] = &[
    ("rtf", "rtf"),
    ("docx", "docx"),
    ("doc", "doc"),
    ("html", "html"),
    ("htm", "html"),
    ("odt", "odt"),
    ("epub", "epub"),
    ("tex", "latex"),
];

/// Locations probed for the pandoc executable, PATH first.
const PANDOC_CANDIDATES: &[&str] = &["pandoc", "/usr/local/bin/pandoc", "/usr/bin/pandoc"];

/// Converter for rich document formats, driven by the external `pandoc`
/// tool.
pub struct PandocConverter {
    pandoc: PathBuf,
}

impl PandocConverter {
    /// Probe for a working pandoc executable.
    pub fn new() -> Result<Self> {
        find_pandoc()
            .map(|pandoc| Self { pandoc })
            .ok_or(ConvertError::PandocNotFound)
    }

    /// Use a known pandoc executable without probing.
    pub fn with_executable(pandoc: impl Into<PathBuf>) -> Self {
        Self {
            pandoc: pandoc.into(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.pandoc
    }

    fn input_format(path: &Path) -> Option<&'static str> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        FORMAT_MAP
            .iter()
            .find(|(candidate, _)| *candidate == ext)
            .map(|(_, format)| *format)
    }
}

impl Converter for PandocConverter {
    fn can_convert(&self, path: &Path) -> bool {
        Self::input_format(path).is_some()
    }

    fn convert(&self, path: &Path) -> Result<PathBuf> {
        let format = Self::input_format(path).ok_or_else(|| {
            ConvertError::Unsupported(
                path.extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            )
        })?;

        let md_path = markdown_sibling(path);
        let output = Command::new(&self.pandoc)
            .arg(path)
            .args(["-f", format, "-t", "markdown", "-o"])
            .arg(&md_path)
            .output()
            .map_err(|e| ConvertError::PandocFailed {
                input: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ConvertError::PandocFailed {
                input: path.to_path_buf(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        log::info!("Converted {} ({format} -> markdown)", path.display());
        Ok(md_path)
    }
}

/// Probe candidate locations with `--version`, returning the first that
/// runs.
fn find_pandoc() -> Option<PathBuf> {
    for candidate in PANDOC_CANDIDATES {
        let runs = Command::new(candidate)
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false);
        if runs {
            return Some(PathBuf::from(candidate));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_map_covers_supported_extensions() {
        assert_eq!(PandocConverter::input_format(Path::new("a.docx")), Some("docx"));
        assert_eq!(PandocConverter::input_format(Path::new("a.HTM")), Some("html"));
        assert_eq!(PandocConverter::input_format(Path::new("a.tex")), Some("latex"));
        assert_eq!(PandocConverter::input_format(Path::new("a.txt")), None);
        assert_eq!(PandocConverter::input_format(Path::new("no_ext")), None);
    }

    #[test]
    fn can_convert_follows_the_format_map() {
        let converter = PandocConverter::with_executable("pandoc");
        assert!(converter.can_convert(Path::new("report.rtf")));
        assert!(converter.can_convert(Path::new("book.epub")));
        assert!(!converter.can_convert(Path::new("notes.md")));
    }

    #[test]
    fn missing_executable_surfaces_as_pandoc_failed() {
        let converter = PandocConverter::with_executable("/definitely/not/pandoc");
        let err = converter.convert(Path::new("report.rtf")).unwrap_err();
        assert!(matches!(err, ConvertError::PandocFailed { .. }));
    }
}
