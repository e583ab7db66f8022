//! codebase-kit instantiates the Android, Express server and Vue portal codebase
//! templates into new projects, and generates the assets those projects need:
//! launcher icons, vector drawables and service files.

/// Command-line interface module for the codebase binary
pub mod cli;

/// Template manifest handling
/// Supports JSON and YAML formats (codebase.json, codebase.yml, codebase.yaml)
pub mod config;

/// Built-in placeholder literals, ignore patterns and service templates
pub mod constants;

/// Error types and handling for codebase-kit
pub mod error;

/// Launcher icon generation through ImageMagick
pub mod icon;

/// Display name to code identifier, package and endpoint conversions
pub mod identifier;

/// File and directory ignore patterns
/// Processes .codebaseignore files to exclude specific paths
pub mod ignore;

/// Local and git template sources
pub mod loader;

pub mod logger;

/// Android module selection
pub mod modules;

/// Atomic output directory writes
pub mod output;

/// Package directory rewriting below source roots
pub mod package;

/// Core template processing orchestration
/// Combines all components to generate the final output
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Placeholder prefix renaming of files and directories
pub mod rename;

/// Rename rules and the single-pass content rewriter
pub mod rules;

/// systemd and pm2 service files
pub mod service;

/// In-memory template tree
pub mod tree;

/// SVG to Android vector drawable conversion
pub mod vector;
