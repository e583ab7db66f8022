//! Moves sources from the placeholder package directory to the requested package.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSetBuilder};
use log::{debug, info};

use crate::error::Result;
use crate::identifier::validate_package;
use crate::tree::VirtualTree;

/// Converts `a.b.c` into the relative path `a/b/c`.
pub fn package_path(package: &str) -> Result<PathBuf> {
    Ok(validate_package(package)?.iter().collect())
}

/// Finds every directory of the tree matched by one of the `patterns`.
pub fn find_source_roots(tree: &VirtualTree, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
    }
    let roots = builder.build()?;

    Ok(tree
        .iter()
        .filter(|(path, entry)| entry.is_dir() && roots.is_match(path))
        .map(|(path, _)| path.clone())
        .collect())
}

/// Moves the contents of `root/<old package>` to `root/<new package>`.
///
/// The old package directory and every ancestor it leaves empty are removed,
/// stopping at `root`. A root without the old package directory is left alone.
///
/// # Returns
/// * `Result<bool>` - Whether anything was moved
pub fn rewrite_package_path(
    tree: &mut VirtualTree,
    root: &Path,
    old_package: &str,
    new_package: &str,
) -> Result<bool> {
    let old_dir = root.join(package_path(old_package)?);
    let new_dir = root.join(package_path(new_package)?);

    if !tree.is_dir(&old_dir) {
        debug!("No '{}' under '{}', skipping", old_package, root.display());
        return Ok(false);
    }
    if old_dir == new_dir {
        return Ok(false);
    }

    let moved: BTreeSet<PathBuf> = tree.descendants(&old_dir).into_iter().collect();
    tree.create_dir_all(&new_dir);
    tree.remap(|path| {
        if moved.contains(path) {
            let rest = path.strip_prefix(&old_dir).unwrap_or(path);
            new_dir.join(rest)
        } else {
            path.to_path_buf()
        }
    })?;

    let mut current = Some(old_dir.as_path());
    while let Some(dir) = current {
        if dir == root || !dir.starts_with(root) || !tree.is_empty_dir(dir) {
            break;
        }
        tree.remove(dir);
        current = dir.parent();
    }

    info!(
        "Moved {} entries from '{}' to '{}'",
        moved.len(),
        old_dir.display(),
        new_dir.display()
    );
    Ok(true)
}

/// Runs [`rewrite_package_path`] on every source root of the tree.
///
/// # Returns
/// * `Result<usize>` - Number of roots that contained the old package
pub fn rewrite_source_roots(
    tree: &mut VirtualTree,
    source_root_patterns: &[String],
    old_package: &str,
    new_package: &str,
) -> Result<usize> {
    let mut rewritten = 0;
    for root in find_source_roots(tree, source_root_patterns)? {
        if rewrite_package_path(tree, &root, old_package, new_package)? {
            rewritten += 1;
        }
    }
    Ok(rewritten)
}
