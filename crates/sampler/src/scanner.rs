use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Scanner for candidate vault files under a root directory.
///
/// Filters by extension and excluded directory names, prunes excluded
/// directories at any nesting level, and returns a deterministic order:
/// paths sorted by their POSIX-style relative path from the root.
pub struct VaultScanner {
    root: PathBuf,
    include_extensions: BTreeSet<String>,
    exclude_dirs: BTreeSet<String>,
    follow_symlinks: bool,
}

impl VaultScanner {
    pub fn new(
        root: impl Into<PathBuf>,
        include_extensions: &[String],
        exclude_dirs: &[String],
        follow_symlinks: bool,
    ) -> Self {
        Self {
            root: root.into(),
            include_extensions: include_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_dirs: exclude_dirs.iter().cloned().collect(),
            follow_symlinks,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan for files with included extensions, respecting excludes.
    ///
    /// Permission failures on individual entries are logged and skipped;
    /// files resolving outside the root (symlink escapes) are silently
    /// dropped.
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut keyed: Vec<(String, PathBuf)> = Vec::new();

        let excluded = self.exclude_dirs.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .follow_links(self.follow_symlinks);
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            if !is_dir {
                return true;
            }
            entry
                .file_name()
                .to_str()
                .map(|name| !excluded.contains(name))
                .unwrap_or(true)
        });

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if !self.has_included_extension(path) {
                        continue;
                    }

                    // Contain traversal within the root.
                    let Ok(resolved) = path.canonicalize() else {
                        log::warn!("Failed to resolve {}, skipping", path.display());
                        continue;
                    };
                    let Ok(relative) = resolved.strip_prefix(&self.root) else {
                        continue;
                    };

                    keyed.push((posix_path(relative), resolved));
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        // Stable ordering by relative POSIX path, no duplicates.
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.dedup_by(|a, b| a.0 == b.0);
        keyed.into_iter().map(|(_, path)| path).collect()
    }

    fn has_included_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.include_extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }
}

/// Relative path of `path` under `root`, rendered with `/` separators.
pub fn relative_posix(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    posix_path(relative)
}

fn posix_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
