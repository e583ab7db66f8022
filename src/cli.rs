//! Command-line interface implementation for codebase-kit.
//! Provides argument parsing and help text formatting using clap.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::{error::ErrorKind, Parser, Subcommand};

use crate::config::Variant;
use crate::constants::TEMPLATES_ROOT_ENV;
use crate::icon::{IconFormat, IconSpec};
use crate::identifier::to_endpoint;
use crate::processor::GenerationRequest;
use crate::service::{parse_var, ServiceKind, ServiceSpec};
use crate::vector::{DEFAULT_FILL, DEFAULT_SIZE_DP};

/// Command-line arguments structure for codebase-kit.
#[derive(Parser, Debug)]
#[command(
    name = "codebase",
    author,
    version,
    about = "codebase: scaffold Android, Express server and Vue portal projects from codebase templates",
    long_about = None
)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an Android application from the Android codebase template
    Android(AndroidArgs),
    /// Create an Express server from the server codebase template
    Server(ServerArgs),
    /// Create a Vue portal from the portal codebase template
    Portal(PortalArgs),
    /// Write a systemd unit or a pm2 ecosystem file
    Service(ServiceArgs),
    /// Convert an SVG icon into an Android vector drawable
    Vector(VectorArgs),
    /// Generate Android launcher icons with ImageMagick
    Icon(IconArgs),
}

/// Options shared by every generation command.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct TemplateArgs {
    /// Template directory or git repository URL; defaults to the shipped template
    #[arg(short, long, value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// Directory holding the shipped android/, server/ and portal/ templates
    #[arg(long, env = TEMPLATES_ROOT_ENV, value_name = "DIR")]
    pub templates_root: Option<PathBuf>,

    /// Replace an existing output directory
    #[arg(short, long)]
    pub force: bool,

    /// Replace an existing output directory without asking for confirmation
    #[arg(long)]
    pub skip_overwrite_check: bool,

    /// Run every stage in memory without writing the output directory
    #[arg(long)]
    pub dry_run: bool,
}

impl TemplateArgs {
    /// The template given on the command line, or the variant's shipped template.
    pub fn resolve_template(&self, variant: Variant) -> String {
        match &self.template {
            Some(template) => template.clone(),
            None => {
                let root = self.templates_root.as_deref().unwrap_or_else(|| Path::new("."));
                root.join(variant.template_dir()).to_string_lossy().into_owned()
            }
        }
    }

    fn request(
        &self,
        variant: Variant,
        name: &str,
        package: String,
        output: &Path,
    ) -> GenerationRequest {
        GenerationRequest {
            variant,
            template: self.resolve_template(variant),
            output_dir: output.to_path_buf(),
            display_name: name.to_string(),
            package,
            port: None,
            version: None,
            modules: BTreeSet::new(),
            force: self.force,
            skip_overwrite_check: self.skip_overwrite_check,
            dry_run: self.dry_run,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct AndroidArgs {
    /// Application display name, e.g. "Test App"
    #[arg(short, long)]
    pub name: String,

    /// Dotted application package, e.g. com.example.test
    #[arg(short, long)]
    pub package: String,

    /// Directory where the project will be created
    #[arg(short, long)]
    pub output: PathBuf,

    /// UI modules to keep
    #[arg(long, value_delimiter = ',', default_value = "views")]
    pub ui: Vec<String>,

    /// Extra modules to keep, e.g. ndk
    #[arg(short, long, value_delimiter = ',')]
    pub modules: Vec<String>,

    /// Application version
    #[arg(long)]
    pub app_version: Option<String>,

    #[command(flatten)]
    pub template: TemplateArgs,
}

impl AndroidArgs {
    pub fn to_request(&self) -> GenerationRequest {
        let mut request =
            self.template.request(Variant::Android, &self.name, self.package.clone(), &self.output);
        request.version = self.app_version.clone();
        request.modules = self.ui.iter().chain(&self.modules).cloned().collect();
        request
    }
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    /// Server display name, e.g. "Test App"
    #[arg(short, long)]
    pub name: String,

    /// Directory where the project will be created
    #[arg(short, long)]
    pub output: PathBuf,

    /// Endpoint name; defaults to the kebab-case form of the name
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Port the server listens on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Server version
    #[arg(long)]
    pub app_version: Option<String>,

    #[command(flatten)]
    pub template: TemplateArgs,
}

impl ServerArgs {
    pub fn to_request(&self) -> GenerationRequest {
        let endpoint = self.endpoint.clone().unwrap_or_else(|| to_endpoint(&self.name));
        let mut request = self.template.request(Variant::Server, &self.name, endpoint, &self.output);
        request.port = self.port;
        request.version = self.app_version.clone();
        request
    }
}

#[derive(clap::Args, Debug)]
pub struct PortalArgs {
    /// Portal display name, e.g. "Test App"
    #[arg(short, long)]
    pub name: String,

    /// Directory where the project will be created
    #[arg(short, long)]
    pub output: PathBuf,

    /// Endpoint name; defaults to the kebab-case form of the name
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Portal version
    #[arg(long)]
    pub app_version: Option<String>,

    #[command(flatten)]
    pub template: TemplateArgs,
}

impl PortalArgs {
    pub fn to_request(&self) -> GenerationRequest {
        let endpoint = self.endpoint.clone().unwrap_or_else(|| to_endpoint(&self.name));
        let mut request = self.template.request(Variant::Portal, &self.name, endpoint, &self.output);
        request.version = self.app_version.clone();
        request
    }
}

#[derive(clap::Args, Debug)]
pub struct ServiceArgs {
    /// Service manager: systemd or pm2
    #[arg(short, long, default_value = "systemd")]
    pub kind: ServiceKind,

    /// Service name
    #[arg(short, long)]
    pub name: String,

    /// Working directory of the service
    #[arg(short, long)]
    pub workdir: String,

    /// Command (systemd) or script (pm2) to start
    #[arg(short, long)]
    pub exec: String,

    #[arg(short, long)]
    pub user: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    #[arg(short, long)]
    pub description: Option<String>,

    /// Extra template variable, may be repeated
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Template file used instead of the built-in one
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Output file; printed to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ServiceArgs {
    pub fn to_spec(&self) -> ServiceSpec {
        ServiceSpec {
            kind: self.kind,
            name: self.name.clone(),
            description: self.description.clone(),
            workdir: self.workdir.clone(),
            exec: self.exec.clone(),
            user: self.user.clone(),
            port: self.port,
            extra: self.vars.clone(),
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct VectorArgs {
    /// SVG file to convert
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Vector drawable XML file to write
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Width and height of the drawable in dp
    #[arg(short, long, default_value_t = DEFAULT_SIZE_DP)]
    pub size: u32,

    /// Fill colour of paths without their own hex fill
    #[arg(long, default_value = DEFAULT_FILL)]
    pub fill: String,
}

#[derive(clap::Args, Debug)]
pub struct IconArgs {
    /// Foreground SVG
    #[arg(long, value_name = "SVG")]
    pub foreground: PathBuf,

    /// Android res directory receiving the mipmap-* folders
    #[arg(short, long, value_name = "RES_DIR")]
    pub output: PathBuf,

    /// Background colour
    #[arg(short, long, default_value = "#FFFFFF")]
    pub background: String,

    /// Colour applied to the foreground
    #[arg(short, long)]
    pub tint: Option<String>,

    /// Foreground size in percent of the icon
    #[arg(short, long, default_value_t = 65)]
    pub scale: u32,

    /// Bitmap format: webp or png
    #[arg(long, default_value = "webp")]
    pub format: IconFormat,

    /// Print the ImageMagick commands and target files without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl IconArgs {
    pub fn to_spec(&self) -> IconSpec {
        IconSpec {
            foreground: self.foreground.clone(),
            output: self.output.clone(),
            background: self.background.clone(),
            tint: self.tint.clone(),
            scale: self.scale,
            format: self.format,
            dry_run: self.dry_run,
        }
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 2 after printing help for `-h`/`--help`
/// * With status code 1 after printing usage if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                let _ = e.print();
                std::process::exit(2);
            }
            ErrorKind::MissingRequiredArgument
            | ErrorKind::MissingSubcommand
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                let _ = e.print();
                std::process::exit(1);
            }
            _ => e.exit(),
        },
    }
}
