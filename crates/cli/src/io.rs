//! Font file discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use glob::glob;
use readify_core::config::FONT_EXTENSIONS;

/// Find fonts matching a glob pattern in a directory.
pub fn glob_fonts(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = dir.join(pattern);
    let pattern_str = pattern.to_str().context("Invalid pattern path")?;
    Ok(glob(pattern_str)
        .with_context(|| format!("Failed to glob pattern: {pattern_str}"))?
        .filter_map(Result::ok)
        .collect())
}

/// Expand command-line inputs into font files.
///
/// Files are kept as given, in order. A directory expands to the font files
/// directly inside it, sorted by name.
pub fn collect_font_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut fonts = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for ext in FONT_EXTENSIONS {
                found.extend(glob_fonts(input, &format!("*.{ext}"))?);
            }
            if found.is_empty() {
                bail!("No .ttf or .otf files in {}", input.display());
            }
            found.sort();
            fonts.extend(found);
        } else if input.is_file() {
            fonts.push(input.clone());
        } else {
            bail!("Font file not found: {}", input.display());
        }
    }
    Ok(fonts)
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use super::*;

    #[test]
    fn test_directory_expands_to_sorted_fonts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["B-Bold.ttf", "A-Regular.otf", "notes.txt"] {
            write(dir.path().join(name), b"").unwrap();
        }

        let fonts = collect_font_inputs(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(fonts, vec![dir.path().join("A-Regular.otf"), dir.path().join("B-Bold.ttf")]);
    }

    #[test]
    fn test_files_keep_given_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("z.ttf");
        let b = dir.path().join("a.ttf");
        write(&a, b"").unwrap();
        write(&b, b"").unwrap();

        assert_eq!(collect_font_inputs(&[a.clone(), b.clone()]).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_missing_input_fails() {
        assert!(collect_font_inputs(&[PathBuf::from("/nonexistent/font.ttf")]).is_err());
    }

    #[test]
    fn test_empty_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_font_inputs(&[dir.path().to_path_buf()]).is_err());
    }
}
