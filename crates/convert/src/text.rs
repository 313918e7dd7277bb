use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::{markdown_sibling, Converter};

/// Converter for plain text files.
///
/// Copies the text into a sibling `.md` file, decoding UTF-8 with a lossy
/// fallback for legacy encodings.
#[derive(Debug, Default)]
pub struct TextConverter;

impl TextConverter {
    pub fn new() -> Self {
        Self
    }
}

impl Converter for TextConverter {
    fn can_convert(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
    }

    fn convert(&self, path: &Path) -> Result<PathBuf> {
        let bytes = fs::read(path)?;
        let content = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                log::warn!(
                    "{} is not valid UTF-8, decoding with replacement",
                    path.display()
                );
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };

        let md_path = markdown_sibling(path);
        fs::write(&md_path, content)?;
        log::info!("Converted {} (txt -> markdown)", path.display());
        Ok(md_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn converts_txt_to_markdown_sibling() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("memo.txt");
        fs::write(&input, "plain text body\n").unwrap();

        let converter = TextConverter::new();
        assert!(converter.can_convert(&input));
        let output = converter.convert(&input).unwrap();

        assert_eq!(output, temp.path().join("memo.md"));
        assert_eq!(fs::read_to_string(output).unwrap(), "plain text body\n");
    }

    #[test]
    fn invalid_utf8_falls_back_to_replacement() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("legacy.txt");
        fs::write(&input, [b'o', b'k', 0xFF, b'!']).unwrap();

        let output = TextConverter::new().convert(&input).unwrap();
        let text = fs::read_to_string(output).unwrap();
        assert!(text.starts_with("ok"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn rejects_other_extensions() {
        let converter = TextConverter::new();
        assert!(!converter.can_convert(Path::new("notes.md")));
        assert!(!converter.can_convert(Path::new("doc.docx")));
        assert!(!converter.can_convert(Path::new("no_extension")));
    }
}
