//! File and directory ignore pattern handling for codebase templates.
//! Build artifacts and caches are never copied out of a template. Extra patterns
//! come from the template manifest and from a .codebaseignore file, similar to
//! .gitignore functionality.

use crate::constants::{CONFIG_FILES, DEFAULT_IGNORE_PATTERNS, IGNORE_FILE};
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::{fs::read_to_string, path::Path};

/// Builds the set of ignored paths for a template.
///
/// # Arguments
/// * `template_root` - Template directory that may contain a .codebaseignore file
/// * `extra_patterns` - Additional patterns, usually from the template manifest
///
/// # Returns
/// * `Result<GlobSet>` - Set of compiled glob patterns for path matching
///
/// # Notes
/// - Default patterns are always included
/// - The ignore file and the template manifest are always ignored
/// - Blank lines and lines starting with `#` are skipped
///
/// # Example
/// ```ignore
/// # Contents of .codebaseignore:
/// *.log
/// captures/
/// ```
pub fn parse_ignore_file<P: AsRef<Path>>(
    template_root: P,
    extra_patterns: &[String],
) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in DEFAULT_IGNORE_PATTERNS {
        builder.add(Glob::new(pattern)?);
    }
    builder.add(Glob::new(IGNORE_FILE)?);
    for manifest in CONFIG_FILES {
        builder.add(Glob::new(manifest)?);
    }

    for pattern in extra_patterns {
        add_pattern(&mut builder, pattern)?;
    }

    let ignore_path = template_root.as_ref().join(IGNORE_FILE);
    if let Ok(contents) = read_to_string(&ignore_path) {
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            add_pattern(&mut builder, line)?;
        }
    } else {
        debug!("{} does not exist", IGNORE_FILE);
    }

    Ok(builder.build()?)
}

/// Adds a pattern; a trailing slash ignores the directory and its contents.
fn add_pattern(builder: &mut GlobSetBuilder, pattern: &str) -> Result<()> {
    let trimmed = pattern.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::ConfigError(format!("invalid ignore pattern '{}'", pattern)));
    }
    builder.add(Glob::new(trimmed)?);
    builder.add(Glob::new(&format!("{}/**", trimmed))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_ignore_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let glob_set = parse_ignore_file(temp_dir.path(), &[]).unwrap();
        assert!(glob_set.is_match("app/build"));
        assert!(glob_set.is_match("app/build/outputs/app.apk"));
        assert!(glob_set.is_match("node_modules/express/index.js"));
        assert!(glob_set.is_match(".DS_Store"));
        assert!(glob_set.is_match(IGNORE_FILE));
        assert!(glob_set.is_match("codebase.yaml"));
        assert!(!glob_set.is_match("app/src/main/AndroidManifest.xml"));
    }
}
