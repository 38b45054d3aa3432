//! CLI logic for the umlsketch diagram tool.
//!
//! Reads a saved diagram, optionally re-arranges it, and writes either the
//! PlantUML source or the updated diagram record.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::{fs, io::Write};

use log::{debug, info};

use umlsketch::{UmlSketchError, codegen, layout::Engine, persist};

/// Run the umlsketch CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `UmlSketchError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed diagram files
/// - Layout requested on an empty diagram
pub fn run(args: &Args) -> Result<(), UmlSketchError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing diagram"
    );

    let (app_config, config_source) = config::load_config(args.config.as_ref())?;
    info!(source:% = config_source; "Configuration loaded");

    let source = fs::read_to_string(&args.input)?;
    let mut diagram = persist::from_json(&source)?;

    if let Some(diagram_type) = args.diagram_type {
        debug!(diagram_type:% = diagram_type; "Overriding diagram type");
        diagram.set_diagram_type(diagram_type);
    }

    if args.layout {
        if diagram.is_empty() {
            return Err(UmlSketchError::EmptyDiagram);
        }
        let engine = Engine::new(app_config.layout().clone(), app_config.grid().size());
        let layout = engine.calculate(&diagram);
        let report = layout.report();
        info!(
            layers = report.layers,
            iterations = report.iterations_run,
            converged = report.converged;
            "Layout calculated"
        );
        layout.apply(&mut diagram);
    }

    let output = match args.format {
        OutputFormat::Plantuml => codegen::generate(&diagram),
        OutputFormat::Json => persist::to_json(&diagram)?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &output)?;
            info!(output_file:% = path; "Output written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{output}")?;
        }
    }

    Ok(())
}
