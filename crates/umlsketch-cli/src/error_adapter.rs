//! Error adapter for converting UmlSketchError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error type
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use umlsketch::UmlSketchError;

/// Adapter giving a [`UmlSketchError`] a diagnostic code and a hint.
pub struct ErrorAdapter<'a>(pub &'a UmlSketchError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            UmlSketchError::Io(_) => "umlsketch::io",
            UmlSketchError::Json(_) => "umlsketch::json",
            UmlSketchError::UnknownNode(_) => "umlsketch::unknown_node",
            UmlSketchError::SelfConnection(_) => "umlsketch::self_connection",
            UmlSketchError::EmptyDiagram => "umlsketch::empty_diagram",
            UmlSketchError::MissingKey(_) => "umlsketch::missing_key",
            UmlSketchError::Config(_) => "umlsketch::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            UmlSketchError::Json(_) => {
                "expected a saved diagram with `diagramType`, `nodes` and `edges` fields"
            }
            UmlSketchError::EmptyDiagram => "add at least one node before running the layout",
            UmlSketchError::Config(_) => {
                "check the configuration file against the documented sections: layout, view, grid, history"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_codes() {
        let err = UmlSketchError::EmptyDiagram;
        let adapter = ErrorAdapter(&err);
        assert_eq!(
            adapter.code().map(|c| c.to_string()).as_deref(),
            Some("umlsketch::empty_diagram")
        );
        assert!(adapter.help().is_some());

        let err = UmlSketchError::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let adapter = ErrorAdapter(&err);
        assert_eq!(
            adapter.code().map(|c| c.to_string()).as_deref(),
            Some("umlsketch::io")
        );
        assert!(adapter.help().is_none());
    }

    #[test]
    fn test_display_matches_error() {
        let err = UmlSketchError::Config("grid.size must be positive, got 0".to_string());
        assert_eq!(ErrorAdapter(&err).to_string(), err.to_string());
    }

    #[test]
    fn test_renders_with_graphical_handler() {
        let err = UmlSketchError::MissingKey("diagram".to_string());
        let mut out = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut out, &ErrorAdapter(&err))
            .unwrap();
        assert!(out.contains("umlsketch::missing_key"));
        assert!(out.contains("diagram"));
    }
}
