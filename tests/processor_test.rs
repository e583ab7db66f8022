mod common;

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use codebase_kit::config::Variant;
use codebase_kit::error::Error;
use codebase_kit::processor::{generate, GenerationRequest};
use codebase_kit::prompt::FixedPrompter;
use common::server_template;
use tempfile::TempDir;

fn request(template: &Path, output: &Path) -> GenerationRequest {
    GenerationRequest {
        variant: Variant::Server,
        template: template.to_string_lossy().into_owned(),
        output_dir: output.to_path_buf(),
        display_name: "Test App".to_string(),
        package: "test-app".to_string(),
        port: None,
        version: None,
        modules: BTreeSet::new(),
        force: false,
        skip_overwrite_check: false,
        dry_run: false,
    }
}

#[test]
fn test_dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("template");
    let output = temp_dir.path().join("out");
    server_template(&template);

    let mut request = request(&template, &output);
    request.dry_run = true;
    let report = generate(&request, &FixedPrompter(false)).unwrap();

    assert!(!output.exists());
    assert!(report
        .files
        .iter()
        .any(|path| path == Path::new("src/testAppRouter.js")));
}

#[test]
fn test_existing_output_requires_force() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("template");
    let output = temp_dir.path().join("out");
    server_template(&template);
    fs::create_dir_all(&output).unwrap();
    fs::write(output.join("old.txt"), "old").unwrap();

    let mut request = request(&template, &output);
    match generate(&request, &FixedPrompter(true)) {
        Err(Error::OutputDirectoryExistsError { .. }) => (),
        other => panic!("Expected OutputDirectoryExistsError, got {:?}", other),
    }

    request.force = true;
    assert!(generate(&request, &FixedPrompter(false)).is_err());
    assert!(output.join("old.txt").exists());

    request.skip_overwrite_check = true;
    generate(&request, &FixedPrompter(false)).unwrap();
    assert!(!output.join("old.txt").exists());
    assert!(output.join("package.json").is_file());
}

#[test]
fn test_missing_template() {
    let temp_dir = TempDir::new().unwrap();
    let request = request(&temp_dir.path().join("missing"), &temp_dir.path().join("out"));

    match generate(&request, &FixedPrompter(false)) {
        Err(Error::TemplateDoesNotExistsError { .. }) => (),
        other => panic!("Expected TemplateDoesNotExistsError, got {:?}", other),
    }
}

#[test]
fn test_empty_template() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("template");
    fs::create_dir_all(template.join("node_modules/left-pad")).unwrap();

    let request = request(&template, &temp_dir.path().join("out"));
    assert!(matches!(
        generate(&request, &FixedPrompter(false)),
        Err(Error::TemplateError(_))
    ));
}

#[cfg(unix)]
#[test]
fn test_template_links_are_recreated() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("template");
    let output = temp_dir.path().join("out");
    server_template(&template);
    std::os::unix::fs::symlink("src", template.join("lib")).unwrap();
    std::os::unix::fs::symlink("missing.js", template.join("dangling.js")).unwrap();

    generate(&request(&template, &output), &FixedPrompter(false)).unwrap();

    assert_eq!(fs::read_link(output.join("lib")).unwrap(), Path::new("src"));
    assert_eq!(fs::read_link(output.join("dangling.js")).unwrap(), Path::new("missing.js"));
    assert!(output.join("lib/testAppRouter.js").is_file());
}
