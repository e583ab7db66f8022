//! Renames entries named after the placeholder code identifier.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::error::Result;
use crate::tree::VirtualTree;

fn replace_prefix(name: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    name.strip_prefix(old_prefix).map(|rest| format!("{}{}", new_prefix, rest))
}

/// Maps every component of `path` that starts with `old_prefix`.
fn rename_components(path: &Path, old_prefix: &str, new_prefix: &str) -> PathBuf {
    path.components()
        .map(|component| match component {
            Component::Normal(name) => match name.to_str() {
                Some(name) => replace_prefix(name, old_prefix, new_prefix)
                    .map(OsString::from)
                    .unwrap_or_else(|| OsString::from(name)),
                None => name.to_os_string(),
            },
            other => other.as_os_str().to_os_string(),
        })
        .collect()
}

/// Renames every entry whose base name starts with `old_prefix`.
///
/// All matches are collected from a full scan first; the rename then maps every
/// path of the tree at once, so a renamed directory carries its children along.
///
/// # Returns
/// * `Result<usize>` - Number of entries whose own name was changed
///
/// # Errors
/// * `Error::RenameConflict` if a renamed entry collides with an existing one
pub fn rename_prefixed(tree: &mut VirtualTree, old_prefix: &str, new_prefix: &str) -> Result<usize> {
    if old_prefix.is_empty() || old_prefix == new_prefix {
        return Ok(0);
    }

    let matches: Vec<PathBuf> = tree
        .paths()
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(old_prefix))
        })
        .collect();

    for path in &matches {
        debug!(
            "Renaming '{}' to '{}'",
            path.display(),
            rename_components(path, old_prefix, new_prefix).display()
        );
    }

    if !matches.is_empty() {
        tree.remap(|path| rename_components(path, old_prefix, new_prefix))?;
    }
    Ok(matches.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tree::Entry;

    fn count_prefixed(tree: &VirtualTree, prefix: &str) -> usize {
        tree.paths()
            .iter()
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(prefix))
            })
            .count()
    }

    #[test]
    fn test_rename_files_and_directories() {
        let mut tree = VirtualTree::new();
        tree.insert("src/CodeBaseApplication.kt", Entry::file(""));
        tree.insert("src/CodeBaseViews/CodeBaseFragment.kt", Entry::file(""));
        tree.insert("src/MainActivity.kt", Entry::file(""));
        tree.insert("src/MyCodeBase.kt", Entry::file(""));

        let renamed = rename_prefixed(&mut tree, "CodeBase", "TestApp").unwrap();

        assert_eq!(renamed, 3);
        assert_eq!(count_prefixed(&tree, "TestApp"), 3);
        assert_eq!(count_prefixed(&tree, "CodeBase"), 0);
        assert!(tree.contains("src/TestAppApplication.kt"));
        assert!(tree.contains("src/TestAppViews/TestAppFragment.kt"));
        assert!(tree.contains("src/MyCodeBase.kt"));
        assert!(tree.contains("src/MainActivity.kt"));
    }

    #[test]
    fn test_rename_conflict() {
        let mut tree = VirtualTree::new();
        tree.insert("CodeBase.kt", Entry::file("a"));
        tree.insert("TestApp.kt", Entry::file("b"));
        let result = rename_prefixed(&mut tree, "CodeBase", "TestApp");
        assert!(matches!(result, Err(Error::RenameConflict { .. })));
    }

    #[test]
    fn test_same_prefix_is_noop() {
        let mut tree = VirtualTree::new();
        tree.insert("CodeBase.kt", Entry::file("a"));
        assert_eq!(rename_prefixed(&mut tree, "CodeBase", "CodeBase").unwrap(), 0);
        assert!(tree.contains("CodeBase.kt"));
    }
}
