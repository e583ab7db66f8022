use std::io;

use codebase_kit::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::ToolNotFound { tool: "magick".to_string() };
    assert_eq!(
        err.to_string(),
        "Required tool 'magick' was not found, please install it and retry."
    );

    let err = Error::RenameConflict {
        source_path: "CodeBase.kt".to_string(),
        target_path: "TestApp.kt".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Rename conflict: 'CodeBase.kt' would overwrite 'TestApp.kt'."
    );
}
