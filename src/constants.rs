//! Common constants used throughout codebase-kit.

/// Supported template manifest file names
pub const CONFIG_FILES: [&str; 3] = ["codebase.json", "codebase.yml", "codebase.yaml"];

/// Template ignore file name
pub const IGNORE_FILE: &str = ".codebaseignore";

/// Environment variable pointing at the directory that holds the shipped templates
pub const TEMPLATES_ROOT_ENV: &str = "CODEBASE_TEMPLATES";

/// Build artifacts and caches never copied out of a template.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "**/.DS_Store",
    "**/.git",
    "**/.git/**",
    "**/.gradle",
    "**/.gradle/**",
    "**/.idea",
    "**/.idea/**",
    "**/.cxx",
    "**/.cxx/**",
    "**/build",
    "**/build/**",
    "**/node_modules",
    "**/node_modules/**",
    "**/dist",
    "**/dist/**",
    "**/*.iml",
    "**/local.properties",
];

/// Placeholder literals of the Android template.
pub mod android {
    pub const DISPLAY_NAME: &str = "Code Base";
    pub const CODE_IDENTIFIER: &str = "CodeBase";
    pub const PACKAGE: &str = "com.dailystudio.codebase";
    pub const JNI_PACKAGE: &str = "com_dailystudio_codebase";
    pub const VERSION: &str = "1.0.0";
    pub const TEMPLATE_DIR: &str = "android/codebase";

    pub const SOURCE_ROOTS: &[&str] = &["**/src/*/java", "**/src/*/kotlin"];
    pub const SETTINGS_FILES: &[&str] = &["settings.gradle", "settings.gradle.kts"];

    /// `(tag, module directory, is a UI module)`
    pub const MODULES: &[(&str, &str, bool)] = &[
        ("views", "app", true),
        ("compose", "app-compose", true),
        ("ndk", "core-native", false),
    ];
}

/// Placeholder literals of the Express server template.
pub mod server {
    pub const DISPLAY_NAME: &str = "Code Base";
    pub const CODE_IDENTIFIER: &str = "codeBase";
    pub const PACKAGE: &str = "codebase";
    pub const PORT: &str = "1809";
    pub const VERSION: &str = "1.0.0";
    pub const TEMPLATE_DIR: &str = "server/codebase";
}

/// Placeholder literals of the Vue portal template.
pub mod portal {
    pub const DISPLAY_NAME: &str = "Code Base";
    pub const CODE_IDENTIFIER: &str = "codeBase";
    pub const PACKAGE: &str = "codebase";
    pub const VERSION: &str = "1.0.0";
    pub const TEMPLATE_DIR: &str = "portal/codebase";
}

/// File extensions that are always copied verbatim.
pub const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "ico", "ttf", "otf", "woff", "woff2", "jar",
    "aar", "so", "a", "o", "dex", "apk", "zip", "gz", "tar", "keystore", "jks", "pdf", "mp3",
    "mp4", "wasm",
];

/// Number of leading bytes inspected for a NUL byte when sniffing binaries.
pub const BINARY_SNIFF_LEN: usize = 8192;

pub const SYSTEMD_UNIT_TEMPLATE: &str = "[Unit]
Description=%description%
After=network.target

[Service]
Type=simple
User=%user%
WorkingDirectory=%workdir%
ExecStart=%exec%
Environment=PORT=%port%
Restart=on-failure
RestartSec=5

[Install]
WantedBy=multi-user.target
";

pub const PM2_CONFIG_TEMPLATE: &str = "module.exports = {
  apps: [
    {
      name: '%name%',
      cwd: '%workdir%',
      script: '%exec%',
      env: {
        NODE_ENV: 'production',
        PORT: '%port%',
      },
    },
  ],
};
";
