//! Launcher icon generation through ImageMagick.
//!
//! For every density the foreground SVG is rasterized at `scale` percent of the
//! canvas, centered on the background colour, and clipped to a rounded square
//! (`ic_launcher`) and to a circle (`ic_launcher_round`).

use std::cell::RefCell;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::vector::{self, is_hex_color};

/// Launcher icon densities and their pixel size for the 48dp base icon.
pub const DENSITIES: [(&str, u32); 5] = [
    ("mdpi", 48),
    ("hdpi", 72),
    ("xhdpi", 96),
    ("xxhdpi", 144),
    ("xxxhdpi", 192),
];
pub const PLAYSTORE_SIZE: u32 = 512;
pub const PLAYSTORE_FILE: &str = "ic_launcher-playstore.png";
pub const FOREGROUND_DRAWABLE: &str = "drawable/ic_launcher_foreground.xml";
/// Adaptive icon layers are 108dp.
const FOREGROUND_DRAWABLE_DP: u32 = 108;
const CORNER_RADIUS_PERCENT: u32 = 10;
const RASTER_DENSITY: &str = "384";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconFormat {
    Webp,
    Png,
}

impl IconFormat {
    pub fn extension(self) -> &'static str {
        match self {
            IconFormat::Webp => "webp",
            IconFormat::Png => "png",
        }
    }
}

impl FromStr for IconFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "webp" => Ok(IconFormat::Webp),
            "png" => Ok(IconFormat::Png),
            other => Err(Error::ValidationError(format!(
                "unknown icon format '{}' (expected webp or png)",
                other
            ))),
        }
    }
}

/// Size and offset of the foreground on a `size` pixel canvas.
///
/// # Errors
/// * `Error::ValidationError` if `scale` is outside 1..=100
pub fn foreground_geometry(size: u32, scale: u32) -> Result<(u32, u32)> {
    if !(1..=100).contains(&scale) {
        return Err(Error::ValidationError(format!(
            "scale must be between 1 and 100, got {}",
            scale
        )));
    }
    let fg = size * scale / 100;
    Ok((fg, (size - fg) / 2))
}

/// Runs the external image tool.
pub trait ImageTool {
    fn run(&self, args: &[String]) -> Result<()>;
}

/// The ImageMagick 7 `magick` binary.
pub struct Magick {
    program: PathBuf,
}

impl Magick {
    pub const PROGRAM: &'static str = "magick";

    /// Checks that `magick` can be started.
    ///
    /// # Errors
    /// * `Error::ToolNotFound` if the binary is missing or does not answer `-version`
    pub fn probe() -> Result<Self> {
        let program = PathBuf::from(Self::PROGRAM);
        let status = Command::new(&program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(status) if status.success() => Ok(Self { program }),
            Ok(_) => Err(Error::ToolNotFound { tool: Self::PROGRAM.to_string() }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::ToolNotFound { tool: Self::PROGRAM.to_string() })
            }
            Err(e) => Err(Error::IoError(e)),
        }
    }
}

impl ImageTool for Magick {
    fn run(&self, args: &[String]) -> Result<()> {
        debug!("Running {} {}", self.program.display(), args.join(" "));
        let status = Command::new(&self.program)
            .args(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        if !status.success() {
            return Err(Error::CommandError {
                command: format!("{} {}", self.program.display(), args.join(" ")),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Tool that only records its invocations; used for dry runs.
#[derive(Default)]
pub struct RecordingTool {
    pub invocations: RefCell<Vec<Vec<String>>>,
}

impl ImageTool for RecordingTool {
    fn run(&self, args: &[String]) -> Result<()> {
        self.invocations.borrow_mut().push(args.to_vec());
        Ok(())
    }
}

/// Operator input for an icon set.
#[derive(Debug, Clone)]
pub struct IconSpec {
    pub foreground: PathBuf,
    /// Android `res` directory
    pub output: PathBuf,
    pub background: String,
    pub tint: Option<String>,
    pub scale: u32,
    pub format: IconFormat,
    /// Plan the commands and check the foreground without touching the disk
    pub dry_run: bool,
}

impl IconSpec {
    fn validate(&self) -> Result<()> {
        if !self.foreground.is_file() {
            return Err(Error::ValidationError(format!(
                "foreground '{}' is not a file",
                self.foreground.display()
            )));
        }
        for colour in std::iter::once(&self.background).chain(self.tint.as_ref()) {
            if !is_hex_color(colour) {
                return Err(Error::ValidationError(format!("'{}' is not a hex colour", colour)));
            }
        }
        foreground_geometry(PLAYSTORE_SIZE, self.scale)?;
        Ok(())
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

fn rasterize_args(spec: &IconSpec, fg: u32, target: &Path) -> Vec<String> {
    let mut args = strings(&["-background", "none", "-density", RASTER_DENSITY]);
    args.push(path_arg(&spec.foreground));
    if let Some(tint) = spec.tint.as_deref() {
        args.extend(strings(&["-fill", tint, "-colorize", "100"]));
    }
    let resize = format!("{fg}x{fg}");
    args.extend(strings(&["-resize", resize.as_str()]));
    args.push(path_arg(target));
    args
}

fn compose_args(
    spec: &IconSpec,
    size: u32,
    offset: u32,
    foreground: &Path,
    mask: Option<String>,
    target: &Path,
) -> Vec<String> {
    let canvas = format!("{size}x{size}");
    let background = format!("xc:{}", spec.background);
    let geometry = format!("+{offset}+{offset}");
    let mut args = strings(&["-size", canvas.as_str(), background.as_str()]);
    args.push(path_arg(foreground));
    args.extend(strings(&["-geometry", geometry.as_str(), "-composite"]));
    if let Some(shape) = mask {
        args.extend(strings(&[
            "(",
            "-size",
            canvas.as_str(),
            "xc:none",
            "-fill",
            "white",
            "-draw",
            shape.as_str(),
            ")",
        ]));
        args.extend(strings(&["-alpha", "set", "-compose", "DstIn", "-composite"]));
    }
    args.push(path_arg(target));
    args
}

fn rounded_rect(size: u32) -> String {
    let radius = size * CORNER_RADIUS_PERCENT / 100;
    let edge = size - 1;
    format!("roundrectangle 0,0,{edge},{edge},{radius},{radius}")
}

fn circle(size: u32) -> String {
    let center = size / 2;
    format!("circle {center},{center} {center},0")
}

/// Generates the launcher icon set described by `spec`.
///
/// # Returns
/// * `Result<Vec<PathBuf>>` - Every file written below `spec.output`
pub fn generate_icons(spec: &IconSpec, tool: &dyn ImageTool) -> Result<Vec<PathBuf>> {
    spec.validate()?;
    let scratch = if spec.dry_run {
        None
    } else {
        std::fs::create_dir_all(&spec.output)?;
        Some(tempfile::Builder::new().prefix(".codebase-icon-").tempdir()?)
    };
    let scratch_dir = match &scratch {
        Some(dir) => dir.path().to_path_buf(),
        None => std::env::temp_dir(),
    };
    let ext = spec.format.extension();
    let mut files = Vec::new();

    for (density, size) in DENSITIES {
        info!("Generating {} icons ({}px)...", density, size);
        let (fg, offset) = foreground_geometry(size, spec.scale)?;
        let foreground = scratch_dir.join(format!("foreground-{size}.png"));
        tool.run(&rasterize_args(spec, fg, &foreground))?;

        let dir = spec.output.join(format!("mipmap-{density}"));
        if !spec.dry_run {
            std::fs::create_dir_all(&dir)?;
        }
        let square = dir.join(format!("ic_launcher.{ext}"));
        let round = dir.join(format!("ic_launcher_round.{ext}"));
        tool.run(&compose_args(spec, size, offset, &foreground, Some(rounded_rect(size)), &square))?;
        tool.run(&compose_args(spec, size, offset, &foreground, Some(circle(size)), &round))?;
        files.push(square);
        files.push(round);
    }

    info!("Generating the store listing icon...");
    let (fg, offset) = foreground_geometry(PLAYSTORE_SIZE, spec.scale)?;
    let foreground = scratch_dir.join(format!("foreground-{PLAYSTORE_SIZE}.png"));
    tool.run(&rasterize_args(spec, fg, &foreground))?;
    let playstore = spec.output.join(PLAYSTORE_FILE);
    tool.run(&compose_args(spec, PLAYSTORE_SIZE, offset, &foreground, None, &playstore))?;
    files.push(playstore);

    let drawable = spec.output.join(FOREGROUND_DRAWABLE);
    let fill = spec.tint.as_deref().unwrap_or(vector::DEFAULT_FILL);
    if spec.dry_run {
        vector::convert(&spec.foreground, FOREGROUND_DRAWABLE_DP, fill)?;
    } else {
        vector::convert_file(&spec.foreground, &drawable, FOREGROUND_DRAWABLE_DP, fill)?;
    }
    files.push(drawable);

    if let Some(scratch) = scratch {
        debug!("Removing scratch directory '{}'", scratch.path().display());
        scratch.close()?;
    }
    Ok(files)
}
