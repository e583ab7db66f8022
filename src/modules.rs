//! Optional Android module selection.
//!
//! Unrequested modules lose their directory, their entry in the Gradle settings
//! `include` statements and every `project(':module')` dependency line in build
//! files. Anything missing along the way is logged and skipped.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use indexmap::IndexMap;
use log::{debug, info, warn};
use regex::Regex;

use crate::config::ModuleSpec;
use crate::error::{Error, Result};
use crate::tree::VirtualTree;

/// Summary of a module selection pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionReport {
    pub removed_modules: Vec<String>,
    /// Deleted dependency lines plus edited or deleted include statements
    pub removed_lines: usize,
}

/// Checks requested tags against the module table.
///
/// # Errors
/// * `Error::ValidationError` if a tag is unknown or no UI module is requested
pub fn validate_selection(
    modules: &IndexMap<String, ModuleSpec>,
    requested: &BTreeSet<String>,
) -> Result<()> {
    if let Some(unknown) = requested.iter().find(|tag| !modules.contains_key(*tag)) {
        let known: Vec<&str> = modules.keys().map(String::as_str).collect();
        return Err(Error::ValidationError(format!(
            "unknown module '{}' (available: {})",
            unknown,
            known.join(", ")
        )));
    }
    let has_ui_modules = modules.values().any(|spec| spec.ui);
    if has_ui_modules && !requested.iter().any(|tag| modules[tag].ui) {
        let ui: Vec<&str> = modules
            .iter()
            .filter(|(_, spec)| spec.ui)
            .map(|(tag, _)| tag.as_str())
            .collect();
        return Err(Error::ValidationError(format!(
            "at least one UI module is required (available: {})",
            ui.join(", ")
        )));
    }
    Ok(())
}

fn include_statement_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*include\b").expect("include pattern is valid"))
}

fn include_item_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"['"]:?([^'"]+)['"]"#).expect("item pattern is valid"))
}

#[derive(Debug, PartialEq, Eq)]
enum IncludeEdit {
    Untouched,
    Rewritten(String),
    Deleted,
}

/// Drops `dir` from an include statement such as `include ':app', ':core'`.
fn strip_include_item(line: &str, dir: &str) -> IncludeEdit {
    if !include_statement_pattern().is_match(line) {
        return IncludeEdit::Untouched;
    }
    let items: Vec<(std::ops::Range<usize>, &str)> = include_item_pattern()
        .captures_iter(line)
        .filter_map(|caps| Some((caps.get(0)?.range(), caps.get(1)?.as_str())))
        .collect();
    let Some(index) = items.iter().position(|(_, name)| *name == dir) else {
        return IncludeEdit::Untouched;
    };
    if items.len() == 1 {
        return IncludeEdit::Deleted;
    }

    // Take the separator on the side that has a neighbour.
    let span = if index == 0 {
        items[0].0.start..items[1].0.start
    } else {
        items[index - 1].0.end..items[index].0.end
    };
    let mut kept = line.to_string();
    kept.replace_range(span, "");
    IncludeEdit::Rewritten(kept)
}

/// Removes `dir` from the include statements of `settings`. Returns the number
/// of statements edited or deleted.
fn remove_include(tree: &mut VirtualTree, settings: &Path, dir: &str) -> usize {
    let Some(content) = tree.read_to_string(settings) else {
        warn!("Cannot read '{}' as text, leaving it untouched", settings.display());
        return 0;
    };

    let mut changed = 0;
    let mut output = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        let body = line.trim_end_matches(['\r', '\n']);
        match strip_include_item(body, dir) {
            IncludeEdit::Untouched => output.push_str(line),
            IncludeEdit::Rewritten(kept) => {
                debug!("Rewriting '{}' as '{}' in '{}'", body, kept, settings.display());
                output.push_str(&kept);
                output.push_str(&line[body.len()..]);
                changed += 1;
            }
            IncludeEdit::Deleted => {
                debug!("Removing '{}' from '{}'", body, settings.display());
                changed += 1;
            }
        }
    }

    if changed > 0 {
        tree.write(settings, output);
    }
    changed
}

fn dependency_pattern(dir: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r#"project\s*\(\s*(path\s*[:=]\s*)?['"]:{}['"]"#,
        regex::escape(dir)
    ))?)
}

/// Deletes every line of `path` matched by `pattern`. Returns the number of deleted lines.
fn delete_lines(tree: &mut VirtualTree, path: &Path, pattern: &Regex) -> usize {
    let Some(content) = tree.read_to_string(path) else {
        warn!("Cannot read '{}' as text, leaving it untouched", path.display());
        return 0;
    };

    let mut removed = 0;
    let kept: Vec<&str> = content
        .split_inclusive('\n')
        .filter(|line| {
            let matched = pattern.is_match(line.trim_end_matches(['\r', '\n']));
            if matched {
                debug!("Removing '{}' from '{}'", line.trim_end(), path.display());
                removed += 1;
            }
            !matched
        })
        .collect();

    if removed > 0 {
        tree.write(path, kept.concat());
    }
    removed
}

fn is_build_file(path: &Path) -> bool {
    matches!(
        path.file_name().and_then(|n| n.to_str()),
        Some("build.gradle") | Some("build.gradle.kts")
    )
}

/// Removes every module of `modules` whose tag is not in `requested`.
///
/// # Arguments
/// * `tree` - Template tree
/// * `modules` - Module table (tag to directory)
/// * `requested` - Tags requested by the operator
/// * `settings_files` - Candidate Gradle settings files, the first one present is used
pub fn select_modules(
    tree: &mut VirtualTree,
    modules: &IndexMap<String, ModuleSpec>,
    requested: &BTreeSet<String>,
    settings_files: &[String],
) -> Result<SelectionReport> {
    validate_selection(modules, requested)?;

    let mut report = SelectionReport::default();
    let settings = settings_files.iter().map(PathBuf::from).find(|p| tree.contains(p));
    if settings.is_none() {
        warn!(
            "No module manifest found (tried: {}), include lines are kept",
            settings_files.join(", ")
        );
    }

    for (tag, spec) in modules {
        if requested.contains(tag) {
            debug!("Keeping module '{}' ({})", tag, spec.dir);
            continue;
        }

        if tree.is_dir(&spec.dir) {
            tree.remove_all(&spec.dir);
        } else {
            warn!("Module directory '{}' of '{}' does not exist", spec.dir, tag);
        }

        if let Some(settings) = &settings {
            let changed = remove_include(tree, settings, &spec.dir);
            if changed == 0 {
                warn!("No include for ':{}' in '{}'", spec.dir, settings.display());
            }
            report.removed_lines += changed;
        }

        let dependency = dependency_pattern(&spec.dir)?;
        let build_files: Vec<PathBuf> =
            tree.paths().into_iter().filter(|p| is_build_file(p)).collect();
        for build_file in &build_files {
            report.removed_lines += delete_lines(tree, build_file, &dependency);
        }

        info!("Removed module '{}' ({})", tag, spec.dir);
        report.removed_modules.push(tag.clone());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Manifest, Variant};
    use crate::tree::Entry;

    fn requested(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    fn android_tree() -> VirtualTree {
        let mut tree = VirtualTree::new();
        tree.insert(
            "settings.gradle",
            Entry::file(
                "rootProject.name = \"CodeBase\"\ninclude ':app'\ninclude ':app-compose'\n\
                 include(\":core-native\")\ninclude ':core'\n",
            ),
        );
        tree.insert(
            "app/build.gradle",
            Entry::file(
                "dependencies {\n    implementation project(':core')\n    \
                 implementation project(':core-native')\n}\n",
            ),
        );
        tree.insert("app/src/main/AndroidManifest.xml", Entry::file("<manifest/>"));
        tree.insert("app-compose/build.gradle", Entry::file("plugins {}\n"));
        tree.insert("core-native/src/main/cpp/nativelib.cpp", Entry::file("// jni"));
        tree.insert("core/build.gradle", Entry::file("plugins {}\n"));
        tree
    }

    #[test]
    fn test_views_only() {
        let manifest = Manifest::defaults(Variant::Android);
        let mut tree = android_tree();

        let report = select_modules(
            &mut tree,
            &manifest.modules,
            &requested(&["views"]),
            &manifest.settings_files,
        )
        .unwrap();

        assert_eq!(report.removed_modules, vec!["compose", "ndk"]);
        assert!(!tree.contains("app-compose"));
        assert!(!tree.contains("core-native"));
        assert!(tree.contains("app/src/main/AndroidManifest.xml"));

        let settings = tree.read_to_string("settings.gradle").unwrap();
        assert_eq!(
            settings,
            "rootProject.name = \"CodeBase\"\ninclude ':app'\ninclude ':core'\n"
        );
        let build = tree.read_to_string("app/build.gradle").unwrap();
        assert!(build.contains("project(':core')"));
        assert!(!build.contains("core-native"));
        assert_eq!(report.removed_lines, 3);
    }

    #[test]
    fn test_all_modules_kept() {
        let manifest = Manifest::defaults(Variant::Android);
        let mut tree = android_tree();
        let before = tree.clone();

        let report = select_modules(
            &mut tree,
            &manifest.modules,
            &requested(&["views", "compose", "ndk"]),
            &manifest.settings_files,
        )
        .unwrap();

        assert!(report.removed_modules.is_empty());
        assert_eq!(tree, before);
    }

    #[test]
    fn test_missing_manifest_continues() {
        let manifest = Manifest::defaults(Variant::Android);
        let mut tree = android_tree();
        tree.remove("settings.gradle");

        let report = select_modules(
            &mut tree,
            &manifest.modules,
            &requested(&["compose"]),
            &manifest.settings_files,
        )
        .unwrap();

        assert_eq!(report.removed_modules, vec!["views", "ndk"]);
        assert!(!tree.contains("app"));
        assert!(tree.contains("app-compose/build.gradle"));
    }

    #[test]
    fn test_multi_module_include_statements() {
        let manifest = Manifest::defaults(Variant::Android);
        let mut tree = android_tree();
        tree.write(
            "settings.gradle",
            "include ':app', ':app-compose'\ninclude ':core-native', ':core'\n\
             include(\":app\", \":app-compose\", \":core\")\r\n",
        );

        let report = select_modules(
            &mut tree,
            &manifest.modules,
            &requested(&["views"]),
            &manifest.settings_files,
        )
        .unwrap();

        assert_eq!(
            tree.read_to_string("settings.gradle").unwrap(),
            "include ':app'\ninclude ':core'\ninclude(\":app\", \":core\")\r\n"
        );
        assert_eq!(report.removed_lines, 4);
    }

    #[test]
    fn test_strip_include_item() {
        assert_eq!(strip_include_item("include ':app'", "app"), IncludeEdit::Deleted);
        assert_eq!(strip_include_item("include ':app-compose'", "app"), IncludeEdit::Untouched);
        assert_eq!(strip_include_item("rootProject.name = 'app'", "app"), IncludeEdit::Untouched);
        assert_eq!(
            strip_include_item("include 'app', 'core'", "app"),
            IncludeEdit::Rewritten("include 'core'".to_string())
        );
    }

    #[test]
    fn test_invalid_selection() {
        let manifest = Manifest::defaults(Variant::Android);
        assert!(validate_selection(&manifest.modules, &requested(&["ndk"])).is_err());
        assert!(validate_selection(&manifest.modules, &requested(&["wear"])).is_err());
        assert!(validate_selection(&manifest.modules, &requested(&["views", "ndk"])).is_ok());
    }
}
