use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collects files under `root` whose name ends with `.{ext}`,
/// sorted by path. Directories named in `ignored` are not descended into.
/// Symlinks to files are included; symlinked directories are not followed.
pub fn find_files_with_extension(
    root: &Path,
    ext: &str,
    ignored: &[String],
) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }

    let dot_ext = if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    };

    let mut results = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_entry(|e| {
        if e.depth() == 0 || !e.file_type().is_dir() {
            return true;
        }
        let n = e.file_name().to_string_lossy();
        !ignored.iter().any(|i| i.as_str() == n)
    }) {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        let is_file = entry.file_type().is_file()
            || (entry.file_type().is_symlink() && entry.path().is_file());
        if is_file {
            let name = entry.file_name().to_string_lossy();
            if name.ends_with(&dot_ext) {
                results.push(entry.into_path());
            }
        }
    }
    results.sort();
    Ok(results)
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
