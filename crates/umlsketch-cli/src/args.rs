//! Command-line argument definitions for the umlsketch CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`].

use clap::{Parser, ValueEnum};

use umlsketch::model::DiagramType;

/// What the CLI writes out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// PlantUML source
    #[default]
    Plantuml,
    /// The (possibly re-arranged) diagram record
    Json,
}

/// Command-line arguments for the umlsketch tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a saved diagram (JSON)
    #[arg(help = "Path to the input diagram")]
    pub input: String,

    /// Output path; standard output when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plantuml)]
    pub format: OutputFormat,

    /// Run auto-layout before writing
    #[arg(long)]
    pub layout: bool,

    /// Override the diagram type (sequence, class, usecase, component)
    #[arg(long)]
    pub diagram_type: Option<DiagramType>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["umlsketch", "diagram.json"]).unwrap();
        assert_eq!(args.input, "diagram.json");
        assert_eq!(args.output, None);
        assert_eq!(args.format, OutputFormat::Plantuml);
        assert!(!args.layout);
        assert_eq!(args.diagram_type, None);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "umlsketch",
            "in.json",
            "-o",
            "out.json",
            "--format",
            "json",
            "--layout",
            "--diagram-type",
            "use-case",
        ])
        .unwrap();
        assert_eq!(args.output.as_deref(), Some("out.json"));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.layout);
        assert_eq!(args.diagram_type, Some(DiagramType::Usecase));
    }

    #[test]
    fn test_unknown_diagram_type_rejected() {
        assert!(Args::try_parse_from(["umlsketch", "in.json", "--diagram-type", "gantt"]).is_err());
    }
}
