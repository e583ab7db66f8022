//! Template loading for codebase-kit.
//! Handles both local filesystem templates and git repository templates.
use crate::error::Result;
use crate::loader::git::GitLoader;
use crate::loader::interface::TemplateLoader;
use crate::loader::local::LocalLoader;
use std::path::{Path, PathBuf};

pub mod git;
pub mod interface;
pub mod local;

/// Represents the source location of a template.
#[derive(Debug, PartialEq, Eq)]
pub enum TemplateSource {
    /// Local filesystem template path
    FileSystem(PathBuf),
    /// Git repository URL (HTTPS or SSH)
    Git(String),
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateSource::FileSystem(path) => {
                write!(f, "local path: '{}'", path.display())
            }
            TemplateSource::Git(repo) => write!(f, "git repository: '{repo}'"),
        }
    }
}

impl TemplateSource {
    /// Creates a TemplateSource from a string path or URL.
    pub fn from_string(s: &str) -> Self {
        if GitLoader::<&str>::is_git_url(s) {
            Self::Git(s.to_string())
        } else {
            Self::FileSystem(PathBuf::from(s))
        }
    }

    /// Loads the template and returns its local directory.
    ///
    /// # Arguments
    /// * `scratch_dir` - Directory that receives git clones; unused for local paths
    ///
    /// # Returns
    /// * `Result<PathBuf>` - Path to the loaded template
    pub fn load(&self, scratch_dir: &Path) -> Result<PathBuf> {
        match self {
            TemplateSource::Git(repo) => GitLoader::new(repo.as_str(), scratch_dir).load(),
            TemplateSource::FileSystem(path) => LocalLoader::new(path).load(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_source_display() {
        let fs_source = TemplateSource::FileSystem(PathBuf::from("/path/to/template"));
        assert_eq!(format!("{}", fs_source), "local path: '/path/to/template'");

        let git_source = TemplateSource::Git("git@github.com:user/repo".to_string());
        assert_eq!(
            format!("{}", git_source),
            "git repository: 'git@github.com:user/repo'"
        );
    }

    #[test]
    fn test_template_source_from_string() {
        assert_eq!(
            TemplateSource::from_string("https://github.com/user/codebase.git"),
            TemplateSource::Git("https://github.com/user/codebase.git".to_string())
        );
        assert_eq!(
            TemplateSource::from_string("./android/codebase"),
            TemplateSource::FileSystem(PathBuf::from("./android/codebase"))
        );
    }
}
