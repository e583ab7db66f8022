//! Writing a transformed tree to its destination.
//!
//! The tree is written into a scratch directory created next to the destination
//! and renamed into place once complete, so a failed run never leaves a
//! half-written project behind.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::prompt::Prompter;
use crate::tree::{Entry, VirtualTree};

/// Ensures the output directory is safe to write to.
///
/// # Arguments
/// * `output_dir` - Target directory path for generated output
/// * `force` - Whether an existing directory may be replaced
/// * `prompt` - Used to confirm the replacement
/// * `skip_overwrite_check` - Replace without asking
///
/// # Returns
/// * `Result<bool>` - Whether an existing directory will be replaced
///
/// # Errors
/// * `Error::OutputDirectoryExistsError` if the directory exists and replacing it
///   was not allowed or not confirmed
pub fn ensure_output_dir<P: AsRef<Path>>(
    output_dir: P,
    force: bool,
    prompt: &dyn Prompter,
    skip_overwrite_check: bool,
) -> Result<bool> {
    let output_dir = output_dir.as_ref();
    if !output_dir.exists() {
        return Ok(false);
    }
    let confirmed = force
        && prompt.confirm(
            skip_overwrite_check,
            format!("Directory '{}' already exists. Replace it?", output_dir.display()),
        )?;
    if !confirmed {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: output_dir.display().to_string(),
        });
    }
    Ok(true)
}

/// Writes every entry of `tree` below `dest`, which must already exist.
pub fn write_tree(tree: &VirtualTree, dest: &Path) -> Result<()> {
    for (path, entry) in tree.iter() {
        let target = dest.join(path);
        match entry {
            Entry::Dir => fs::create_dir_all(&target)?,
            Entry::File { contents, permissions } => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&target, contents)?;
                if let Some(permissions) = permissions {
                    fs::set_permissions(&target, permissions.clone())?;
                }
            }
            Entry::Symlink { target: link } => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                write_symlink(link, &target)?;
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
fn write_symlink(link: &Path, target: &Path) -> Result<()> {
    std::os::unix::fs::symlink(link, target)?;
    Ok(())
}

#[cfg(not(unix))]
fn write_symlink(link: &Path, target: &Path) -> Result<()> {
    log::warn!(
        "Skipping link '{}' -> '{}': links are only recreated on unix",
        target.display(),
        link.display()
    );
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Writes `tree` to a scratch directory and moves it to `output_dir`.
///
/// # Arguments
/// * `tree` - Transformed tree
/// * `output_dir` - Destination directory
/// * `replace` - Remove an existing destination before the final rename
pub fn commit_tree(tree: &VirtualTree, output_dir: &Path, replace: bool) -> Result<()> {
    let parent = parent_dir(output_dir);
    fs::create_dir_all(&parent)?;

    let scratch = tempfile::Builder::new().prefix(".codebase-").tempdir_in(&parent)?;
    let staged = scratch.path().join("output");
    fs::create_dir(&staged)?;
    write_tree(tree, &staged)?;
    debug!("Staged {} entries in '{}'", tree.len(), staged.display());

    if output_dir.exists() {
        if !replace {
            return Err(Error::OutputDirectoryExistsError {
                output_dir: output_dir.display().to_string(),
            });
        }
        debug!("Removing existing '{}'", output_dir.display());
        fs::remove_dir_all(output_dir)?;
    }

    fs::rename(&staged, output_dir)?;
    Ok(())
}
