//! Template manifest handling.
//! A template may carry a codebase.json / codebase.yml / codebase.yaml file that
//! overrides the built-in placeholder literals, the source roots, the Android
//! module table and the ignore patterns of its variant.

use std::path::Path;

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{android, portal, server, CONFIG_FILES};
use crate::error::{Error, Result};
use crate::identifier::IdentifierCase;

/// The kind of project a template produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Android,
    Server,
    Portal,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Android => write!(f, "android"),
            Variant::Server => write!(f, "server"),
            Variant::Portal => write!(f, "portal"),
        }
    }
}

impl Variant {
    /// Case used to derive the code identifier from the display name.
    pub fn identifier_case(self) -> IdentifierCase {
        match self {
            Variant::Android => IdentifierCase::Pascal,
            Variant::Server | Variant::Portal => IdentifierCase::LowerCamel,
        }
    }

    /// Location of the shipped template relative to the templates root.
    pub fn template_dir(self) -> &'static str {
        match self {
            Variant::Android => android::TEMPLATE_DIR,
            Variant::Server => server::TEMPLATE_DIR,
            Variant::Portal => portal::TEMPLATE_DIR,
        }
    }
}

/// Literal placeholder tokens found in a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    pub display_name: String,
    pub code_identifier: String,
    pub package: String,
    pub jni_package: Option<String>,
    pub port: Option<String>,
    pub version: Option<String>,
}

impl Placeholders {
    pub fn defaults(variant: Variant) -> Self {
        match variant {
            Variant::Android => Self {
                display_name: android::DISPLAY_NAME.to_string(),
                code_identifier: android::CODE_IDENTIFIER.to_string(),
                package: android::PACKAGE.to_string(),
                jni_package: Some(android::JNI_PACKAGE.to_string()),
                port: None,
                version: Some(android::VERSION.to_string()),
            },
            Variant::Server => Self {
                display_name: server::DISPLAY_NAME.to_string(),
                code_identifier: server::CODE_IDENTIFIER.to_string(),
                package: server::PACKAGE.to_string(),
                jni_package: None,
                port: Some(server::PORT.to_string()),
                version: Some(server::VERSION.to_string()),
            },
            Variant::Portal => Self {
                display_name: portal::DISPLAY_NAME.to_string(),
                code_identifier: portal::CODE_IDENTIFIER.to_string(),
                package: portal::PACKAGE.to_string(),
                jni_package: None,
                port: None,
                version: Some(portal::VERSION.to_string()),
            },
        }
    }
}

/// An optional Android module and the directory that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub dir: String,
    #[serde(default)]
    pub ui: bool,
}

/// Manifest as written by template authors; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawManifest {
    placeholders: Option<RawPlaceholders>,
    source_roots: Option<Vec<String>>,
    settings_files: Option<Vec<String>>,
    modules: Option<IndexMap<String, ModuleSpec>>,
    ignore: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawPlaceholders {
    display_name: Option<String>,
    code_identifier: Option<String>,
    package: Option<String>,
    jni_package: Option<String>,
    port: Option<String>,
    version: Option<String>,
}

/// Resolved template description: manifest values merged over variant defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub variant: Variant,
    pub placeholders: Placeholders,
    pub source_roots: Vec<String>,
    pub settings_files: Vec<String>,
    pub modules: IndexMap<String, ModuleSpec>,
    pub ignore: Vec<String>,
}

impl Manifest {
    /// Built-in description of the shipped template of `variant`.
    pub fn defaults(variant: Variant) -> Self {
        let (source_roots, settings_files, modules) = match variant {
            Variant::Android => (
                to_strings(android::SOURCE_ROOTS),
                to_strings(android::SETTINGS_FILES),
                android::MODULES
                    .iter()
                    .map(|(tag, dir, ui)| {
                        (tag.to_string(), ModuleSpec { dir: dir.to_string(), ui: *ui })
                    })
                    .collect(),
            ),
            Variant::Server | Variant::Portal => (Vec::new(), Vec::new(), IndexMap::new()),
        };

        Self {
            variant,
            placeholders: Placeholders::defaults(variant),
            source_roots,
            settings_files,
            modules,
            ignore: Vec::new(),
        }
    }

    fn merge(mut self, raw: RawManifest) -> Self {
        if let Some(p) = raw.placeholders {
            let target = &mut self.placeholders;
            if let Some(v) = p.display_name {
                target.display_name = v;
            }
            if let Some(v) = p.code_identifier {
                target.code_identifier = v;
            }
            if let Some(v) = p.package {
                target.package = v;
            }
            target.jni_package = p.jni_package.or(target.jni_package.take());
            target.port = p.port.or(target.port.take());
            target.version = p.version.or(target.version.take());
        }
        if let Some(roots) = raw.source_roots {
            self.source_roots = roots;
        }
        if let Some(files) = raw.settings_files {
            self.settings_files = files;
        }
        if let Some(modules) = raw.modules {
            self.modules = modules;
        }
        self.ignore = raw.ignore;
        self
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Finds the first manifest file present in the template directory.
///
/// # Arguments
/// * `template_dir` - Directory containing the template
/// * `config_files` - List of manifest file names to try
///
/// # Returns
/// * `Result<Option<String>>` - Contents of the first found manifest, if any
pub fn load_config<P: AsRef<Path>>(
    template_dir: P,
    config_files: &[&str],
) -> Result<Option<String>> {
    for file in config_files {
        let config_path = template_dir.as_ref().join(file);
        if config_path.exists() {
            debug!("Loading manifest from {}", config_path.display());
            return Ok(Some(std::fs::read_to_string(&config_path)?));
        }
    }
    debug!("No manifest found (tried: {})", config_files.join(", "));
    Ok(None)
}

/// Parses manifest content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor valid YAML,
///   or if a required placeholder ends up empty
pub fn parse_config(content: &str, variant: Variant) -> Result<Manifest> {
    let raw: RawManifest = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid manifest format: {}", e)))?,
    };
    let manifest = Manifest::defaults(variant).merge(raw);

    let placeholders = &manifest.placeholders;
    for (field, value) in [
        ("display_name", &placeholders.display_name),
        ("code_identifier", &placeholders.code_identifier),
        ("package", &placeholders.package),
    ] {
        if value.is_empty() {
            return Err(Error::ConfigError(format!("placeholder '{}' must not be empty", field)));
        }
    }
    Ok(manifest)
}

/// Loads the manifest of a template, falling back to the variant defaults.
pub fn get_config<P: AsRef<Path>>(template_dir: P, variant: Variant) -> Result<Manifest> {
    match load_config(template_dir, &CONFIG_FILES)? {
        Some(content) => parse_config(&content, variant),
        None => Ok(Manifest::defaults(variant)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_android_defaults() {
        let manifest = Manifest::defaults(Variant::Android);
        assert_eq!(manifest.placeholders.package, "com.dailystudio.codebase");
        assert_eq!(manifest.modules.len(), 3);
        assert!(manifest.modules["views"].ui);
        assert!(!manifest.modules["ndk"].ui);
    }

    #[test]
    fn test_yaml_overrides() {
        let content = "placeholders:\n  package: org.acme.starter\n  port: \"3000\"\nignore:\n  - captures/\n";
        let manifest = parse_config(content, Variant::Server).unwrap();
        assert_eq!(manifest.placeholders.package, "org.acme.starter");
        assert_eq!(manifest.placeholders.port.as_deref(), Some("3000"));
        assert_eq!(manifest.placeholders.code_identifier, "codeBase");
        assert_eq!(manifest.ignore, vec!["captures/".to_string()]);
    }

    #[test]
    fn test_json_modules() {
        let content = r#"{"modules": {"views": {"dir": "app", "ui": true}}}"#;
        let manifest = parse_config(content, Variant::Android).unwrap();
        assert_eq!(manifest.modules.len(), 1);
        assert_eq!(manifest.source_roots, vec!["**/src/*/java", "**/src/*/kotlin"]);
    }

    #[test]
    fn test_invalid_manifest() {
        assert!(parse_config("placeholders: [1, 2", Variant::Portal).is_err());
        assert!(parse_config("unknown_key: 1", Variant::Portal).is_err());
        assert!(parse_config("placeholders:\n  package: \"\"\n", Variant::Portal).is_err());
    }

    #[test]
    fn test_missing_manifest_uses_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let manifest = get_config(temp_dir.path(), Variant::Portal).unwrap();
        assert_eq!(manifest, Manifest::defaults(Variant::Portal));
    }
}
