//! umlsketch - layout and geometry engine for a drag-and-drop UML editor.
//!
//! The crate keeps a logical model of a diagram (nodes with sizes and
//! positions, directed edges between them) and provides what an editor
//! front end needs on top of it:
//!
//! - automatic arrangement ([`layout`]),
//! - connector endpoints clipped to node outlines ([`connector`]),
//! - a zoom/pan transform between logical and screen space ([`view`]),
//! - PlantUML text generation ([`codegen`]),
//! - JSON persistence behind a key/value store ([`persist`]),
//! - undo/redo ([`history`]) and a controller tying it together ([`editor`]).
//!
//! # Example
//!
//! ```
//! use umlsketch::{Editor, config::AppConfig};
//! use umlsketch::model::{DiagramType, EdgeStyle, NodeKind};
//!
//! let mut editor = Editor::with_seed(AppConfig::default(), 7);
//! editor.set_diagram_type(DiagramType::Component);
//! let api = editor.add_node(NodeKind::Component);
//! let db = editor.add_node(NodeKind::Database);
//! editor.connect(api, db, EdgeStyle::Solid).unwrap();
//!
//! let report = editor.auto_layout().unwrap();
//! assert_eq!(report.layers, 2);
//! assert!(editor.generate_code().contains("node_0 --> node_1"));
//! ```

pub mod codegen;
pub mod config;
pub mod connector;
pub mod diagram;
pub mod editor;
pub mod history;
pub mod layout;
pub mod persist;
pub mod view;

mod error;

pub use umlsketch_core::{geometry, identifier, model};

pub use editor::Editor;
pub use error::UmlSketchError;
