//! codebase's main application entry point.
//! Parses the command line, sets up logging and dispatches to the subcommands.

use std::fs;

use log::info;

use codebase_kit::{
    cli::{get_args, Commands, IconArgs, ServiceArgs, VectorArgs},
    error::{default_error_handler, Result},
    icon::{generate_icons, ImageTool, Magick, RecordingTool},
    logger::init_logger,
    processor::{generate, GenerationReport, GenerationRequest},
    prompt::DialoguerPrompter,
    vector::convert_file,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    let result = match args.command {
        Commands::Android(args) => run_generation(args.to_request()),
        Commands::Server(args) => run_generation(args.to_request()),
        Commands::Portal(args) => run_generation(args.to_request()),
        Commands::Service(args) => run_service(&args),
        Commands::Vector(args) => run_vector(&args),
        Commands::Icon(args) => run_icon(&args),
    };

    if let Err(err) = result {
        default_error_handler(err);
    }
}

/// Creates a project from its template.
///
/// # Flow
/// 1. Checks the output directory, asking before replacing it
/// 2. Loads the template and its manifest
/// 3. Selects modules, rewrites package paths, renames files, rewrites contents
/// 4. Moves the result into the output directory
fn run_generation(request: GenerationRequest) -> Result<()> {
    let prompt = DialoguerPrompter::new();
    let report = generate(&request, &prompt)?;
    print_report(&request, &report);
    Ok(())
}

fn print_report(request: &GenerationRequest, report: &GenerationReport) {
    for module in &report.modules.removed_modules {
        println!("Removed module: '{}'", module);
    }
    println!(
        "{} files, {} renamed, {} rewritten with {} substitutions, {} binaries kept as-is.",
        report.files.len(),
        report.renamed,
        report.rewrite.files_changed,
        report.rewrite.substitutions,
        report.rewrite.binaries_skipped
    );
    if request.dry_run {
        println!("Dry run: '{}' was not written.", request.output_dir.display());
    } else {
        println!(
            "{} '{}' ({}) created successfully in {}.",
            request.variant,
            request.display_name,
            report.code_identifier,
            request.output_dir.display()
        );
    }
}

fn run_service(args: &ServiceArgs) -> Result<()> {
    let template = match &args.template {
        Some(path) => Some(fs::read_to_string(path)?),
        None => None,
    };
    let spec = args.to_spec();
    let rendered = spec.render(template.as_deref())?;
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, rendered)?;
            println!("Service file written to {}.", path.display());
        }
        None => {
            info!("Suggested file name: {}", spec.kind.file_name(&spec.name));
            print!("{}", rendered);
        }
    }
    Ok(())
}

fn run_vector(args: &VectorArgs) -> Result<()> {
    convert_file(&args.input, &args.output, args.size, &args.fill)?;
    println!("Vector drawable written to {}.", args.output.display());
    Ok(())
}

fn run_icon(args: &IconArgs) -> Result<()> {
    let spec = args.to_spec();
    if spec.dry_run {
        let tool = RecordingTool::default();
        let files = generate_icons(&spec, &tool)?;
        for invocation in tool.invocations.borrow().iter() {
            println!("{} {}", Magick::PROGRAM, invocation.join(" "));
        }
        for file in files {
            println!("Would write: '{}'", file.display());
        }
        return Ok(());
    }

    let tool: Box<dyn ImageTool> = Box::new(Magick::probe()?);
    for file in generate_icons(&spec, &*tool)? {
        println!("Generated: '{}'", file.display());
    }
    Ok(())
}
