//! Template instantiation pipeline.
//!
//! Module selection, package path rewriting, file renaming and content rewriting
//! all run on an in-memory copy of the template. The destination is written once,
//! at the end, by [`crate::output::commit_tree`].

use std::collections::BTreeSet;
use std::path::PathBuf;

use log::{debug, info};

use crate::config::{get_config, Manifest, Variant};
use crate::error::{Error, Result};
use crate::identifier::{code_identifier, to_jni_package, validate_endpoint, validate_package};
use crate::ignore::parse_ignore_file;
use crate::loader::TemplateSource;
use crate::modules::{select_modules, SelectionReport};
use crate::output::{commit_tree, ensure_output_dir};
use crate::package::rewrite_source_roots;
use crate::prompt::Prompter;
use crate::rename::rename_prefixed;
use crate::rules::{ContentRewriter, RewriteStats, RuleKind, RuleSet};
use crate::tree::{Entry, VirtualTree};

/// Operator input of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub variant: Variant,
    /// Local path or git URL of the template
    pub template: String,
    pub output_dir: PathBuf,
    pub display_name: String,
    /// Dotted package for Android, endpoint name for the server and the portal
    pub package: String,
    pub port: Option<u16>,
    pub version: Option<String>,
    /// Requested Android module tags
    pub modules: BTreeSet<String>,
    pub force: bool,
    pub skip_overwrite_check: bool,
    pub dry_run: bool,
}

/// What a generation run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub code_identifier: String,
    pub modules: SelectionReport,
    pub package_roots: usize,
    pub renamed: usize,
    pub rewrite: RewriteStats,
    /// Files of the generated tree, relative to the output directory
    pub files: Vec<PathBuf>,
}

/// Applies a manifest and a request to template trees.
pub struct Processor<'a> {
    manifest: &'a Manifest,
    request: &'a GenerationRequest,
    code_identifier: String,
    rules: RuleSet,
}

impl<'a> Processor<'a> {
    /// Validates the request and derives the rename rules.
    ///
    /// # Errors
    /// * `Error::ValidationError` for an empty name or an invalid package/endpoint
    /// * `Error::ConfigError` if two placeholders share a token
    pub fn new(manifest: &'a Manifest, request: &'a GenerationRequest) -> Result<Self> {
        let display_name = request.display_name.trim();
        if display_name.is_empty() {
            return Err(Error::ValidationError("application name is required".to_string()));
        }
        let code_identifier = code_identifier(display_name, manifest.variant.identifier_case())?;

        match manifest.variant {
            Variant::Android => {
                validate_package(&request.package)?;
            }
            Variant::Server | Variant::Portal => validate_endpoint(&request.package)?,
        }

        let placeholders = &manifest.placeholders;
        let mut rules = RuleSet::new();
        rules.add(RuleKind::Package, &placeholders.package, &request.package)?;
        if let (Variant::Android, Some(jni)) = (manifest.variant, &placeholders.jni_package) {
            rules.add(RuleKind::JniPackage, jni, to_jni_package(&request.package))?;
        }
        rules.add(RuleKind::CodeIdentifier, &placeholders.code_identifier, &code_identifier)?;
        rules.add(RuleKind::DisplayName, &placeholders.display_name, display_name)?;
        if let (Some(token), Some(port)) = (&placeholders.port, request.port) {
            rules.add(RuleKind::Port, token, port.to_string())?;
        }
        if let (Some(token), Some(version)) = (&placeholders.version, &request.version) {
            rules.add(RuleKind::Version, token, version)?;
        }
        rules.warn_on_overlaps();

        for rule in rules.rules() {
            debug!("{} rule: '{}' -> '{}'", rule.kind, rule.token, rule.replacement);
        }

        Ok(Self { manifest, request, code_identifier, rules })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn code_identifier(&self) -> &str {
        &self.code_identifier
    }

    /// Runs every stage on `tree`.
    pub fn process(&self, tree: &mut VirtualTree) -> Result<GenerationReport> {
        let mut report = GenerationReport {
            code_identifier: self.code_identifier.clone(),
            ..Default::default()
        };

        if self.manifest.variant == Variant::Android && !self.manifest.modules.is_empty() {
            info!("Selecting modules...");
            report.modules = select_modules(
                tree,
                &self.manifest.modules,
                &self.request.modules,
                &self.manifest.settings_files,
            )?;
        }

        if !self.manifest.source_roots.is_empty() {
            info!("Rewriting package directories...");
            report.package_roots = rewrite_source_roots(
                tree,
                &self.manifest.source_roots,
                &self.manifest.placeholders.package,
                &self.request.package,
            )?;
        }

        info!("Renaming files...");
        report.renamed = rename_prefixed(
            tree,
            &self.manifest.placeholders.code_identifier,
            &self.code_identifier,
        )?;

        info!("Rewriting file contents...");
        report.rewrite = ContentRewriter::new(&self.rules)?.rewrite_tree(tree);

        report.files = tree
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::File { .. }))
            .map(|(path, _)| path.clone())
            .collect();
        Ok(report)
    }
}

/// Loads the template, transforms it and writes the result.
///
/// # Flow
/// 1. Checks the output directory
/// 2. Loads the template (cloning git sources into a scratch directory)
/// 3. Loads the template manifest and ignore patterns
/// 4. Reads the template into memory and runs the [`Processor`]
/// 5. Commits the tree to the output directory unless this is a dry run
pub fn generate(request: &GenerationRequest, prompt: &dyn Prompter) -> Result<GenerationReport> {
    let replace = if request.dry_run {
        false
    } else {
        ensure_output_dir(
            &request.output_dir,
            request.force,
            prompt,
            request.skip_overwrite_check,
        )?
    };

    let source = TemplateSource::from_string(&request.template);
    info!("Using template from the {}", source);
    let scratch = tempfile::TempDir::new()?;
    let template_root = source.load(scratch.path())?;

    let manifest = get_config(&template_root, request.variant)?;
    let processor = Processor::new(&manifest, request)?;
    let ignored = parse_ignore_file(&template_root, &manifest.ignore)?;

    let mut tree = VirtualTree::load(&template_root, &ignored)?;
    if tree.is_empty() {
        return Err(Error::TemplateError(format!(
            "template '{}' is empty",
            template_root.display()
        )));
    }

    let report = processor.process(&mut tree)?;

    if request.dry_run {
        info!("Dry run, nothing written to '{}'", request.output_dir.display());
    } else {
        commit_tree(&tree, &request.output_dir, replace)?;
    }
    Ok(report)
}
