use crate::error::{Error, Result};
use crate::loader::interface::TemplateLoader;
use log::debug;
use std::path::{Path, PathBuf};
use url::Url;

/// Loader for templates from git repositories.
///
/// Repositories are cloned into a scratch directory owned by the caller.
pub struct GitLoader<'a, S: AsRef<str>> {
    repo: S,
    scratch_dir: &'a Path,
}

impl<'a, S: AsRef<str>> GitLoader<'a, S> {
    /// Creates a new GitLoader instance.
    pub fn new(repo: S, scratch_dir: &'a Path) -> Self {
        Self { repo, scratch_dir }
    }

    /// Checks if the given string is a git repository URL.
    pub fn is_git_url(s: &str) -> bool {
        if let Ok(url) = Url::parse(s) {
            if matches!(url.scheme(), "https" | "git" | "ssh") {
                return true;
            }
        }
        s.starts_with("git@")
    }

    fn repo_name(&self) -> &str {
        self.repo
            .as_ref()
            .trim_end_matches('/')
            .rsplit(['/', ':'])
            .next()
            .map(|name| name.trim_end_matches(".git"))
            .filter(|name| !name.is_empty())
            .unwrap_or("template")
    }
}

impl<S: AsRef<str>> TemplateLoader for GitLoader<'_, S> {
    /// Loads a template by cloning a git repository.
    ///
    /// # Returns
    /// * `Result<PathBuf>` - Path to the cloned repository
    ///
    /// # Errors
    /// * `Error::Git2Error` if clone fails
    fn load(&self) -> Result<PathBuf> {
        let repo_url = self.repo.as_ref();
        let clone_path = self.scratch_dir.join(self.repo_name());

        debug!("Cloning repository '{}' to '{}'.", repo_url, clone_path.display());

        // Set up authentication callbacks
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                git2::Cred::ssh_key_from_agent(username)
            } else {
                git2::Cred::default()
            }
        });

        let mut fetch_opts = git2::FetchOptions::new();
        fetch_opts.remote_callbacks(callbacks);
        fetch_opts.depth(1);

        let mut builder = git2::build::RepoBuilder::new();
        builder.fetch_options(fetch_opts);

        builder.clone(repo_url, &clone_path).map_err(Error::Git2Error)?;
        Ok(clone_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_git_url() {
        assert!(GitLoader::<&str>::is_git_url("https://github.com/user/codebase.git"));
        assert!(GitLoader::<&str>::is_git_url("git@github.com:user/codebase.git"));
        assert!(!GitLoader::<&str>::is_git_url("./android/codebase"));
        assert!(!GitLoader::<&str>::is_git_url("/opt/templates/server/codebase"));
    }

    #[test]
    fn test_repo_name() {
        let scratch = Path::new("/tmp");
        assert_eq!(GitLoader::new("https://host/user/codebase.git", scratch).repo_name(), "codebase");
        assert_eq!(GitLoader::new("git@host:codebase.git", scratch).repo_name(), "codebase");
        assert_eq!(GitLoader::new("https://host/", scratch).repo_name(), "host");
    }
}
