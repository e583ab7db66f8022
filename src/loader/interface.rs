use crate::error::Result;
use std::path::PathBuf;

/// Trait for loading templates from different sources.
pub trait TemplateLoader {
    /// Loads the template and returns the local directory that holds it.
    ///
    /// # Returns
    /// * `Result<PathBuf>` - Path to the loaded template
    fn load(&self) -> Result<PathBuf>;
}
