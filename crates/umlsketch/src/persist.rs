//! Saving and loading diagrams.
//!
//! A diagram is stored as one flat JSON record:
//!
//! ```json
//! {
//!   "diagramType": "sequence",
//!   "nodeCounter": 2,
//!   "nodes": [{ "id": "node-0", "kind": "actor", "label": "Actor1", "x": 40, "y": 60 }],
//!   "edges": [{ "from": "node-0", "to": "node-1", "style": "solid" }]
//! }
//! ```
//!
//! Records written by the browser editor are accepted too: they name the
//! node kind `type`, the edges `connections`, and store coordinates as CSS
//! `left` / `top` strings such as `"120px"`.
//!
//! Records live in a [`KeyValueStore`] under [`DIAGRAM_KEY`].

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};

use umlsketch_core::{
    geometry::Point,
    identifier::NodeId,
    model::{DiagramType, EdgeStyle, NodeKind},
};

use crate::{
    diagram::{Diagram, Node},
    error::UmlSketchError,
};

/// Storage key of the current diagram.
pub const DIAGRAM_KEY: &str = "diagram";

/// Serialized form of a [`Diagram`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramRecord {
    #[serde(default)]
    diagram_type: DiagramType,
    #[serde(default)]
    node_counter: usize,
    #[serde(default)]
    nodes: Vec<NodeRecord>,
    #[serde(default, alias = "connections")]
    edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct NodeRecord {
    id: NodeId,
    #[serde(default, alias = "type")]
    kind: NodeKind,
    #[serde(default)]
    label: String,
    #[serde(default, alias = "left", deserialize_with = "coordinate")]
    x: f32,
    #[serde(default, alias = "top", deserialize_with = "coordinate")]
    y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct EdgeRecord {
    from: NodeId,
    to: NodeId,
    #[serde(default)]
    style: EdgeStyle,
}

/// Accepts plain numbers and CSS lengths like `"120px"`.
fn coordinate<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => {
            let trimmed = text.trim();
            let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
            if number.is_empty() {
                return Ok(0.0);
            }
            number.parse().map_err(|_| {
                serde::de::Error::custom(format!("invalid coordinate `{text}`"))
            })
        }
    }
}

impl DiagramRecord {
    /// Captures the persistent state of `diagram`.
    pub fn from_diagram(diagram: &Diagram) -> Self {
        Self {
            diagram_type: diagram.diagram_type(),
            node_counter: diagram.node_counter(),
            nodes: diagram
                .nodes()
                .map(|node| NodeRecord {
                    id: node.id(),
                    kind: node.kind(),
                    label: node.label().to_string(),
                    x: node.position().x(),
                    y: node.position().y(),
                })
                .collect(),
            edges: diagram
                .edges()
                .iter()
                .map(|edge| EdgeRecord {
                    from: edge.from(),
                    to: edge.to(),
                    style: edge.style(),
                })
                .collect(),
        }
    }

    /// Rebuilds a diagram from the record.
    ///
    /// Node sizes come from the kind defaults. Edges that reference missing
    /// nodes, or connect a node to itself, are dropped.
    pub fn into_diagram(self) -> Diagram {
        let mut diagram = Diagram::new(self.diagram_type);

        for record in self.nodes {
            let node = Node::new(
                record.id,
                record.kind,
                record.label,
                Point::new(record.x, record.y),
            );
            if diagram.insert_node(node).is_some() {
                warn!(
                    node_id:% = record.id;
                    "Duplicate node id in saved diagram, keeping the last one"
                );
            }
        }
        diagram.set_node_counter(self.node_counter);

        for record in self.edges {
            if let Err(err) = diagram.connect(record.from, record.to, record.style) {
                warn!(
                    from:% = record.from,
                    to:% = record.to,
                    error:% = err;
                    "Dropping invalid edge"
                );
            }
        }

        diagram
    }
}

/// Serializes `diagram` to its JSON record.
///
/// # Errors
///
/// Returns [`UmlSketchError::Json`] if serialization fails.
pub fn to_json(diagram: &Diagram) -> Result<String, UmlSketchError> {
    Ok(serde_json::to_string_pretty(&DiagramRecord::from_diagram(
        diagram,
    ))?)
}

/// Parses a diagram from its JSON record.
///
/// # Errors
///
/// Returns [`UmlSketchError::Json`] for malformed input.
pub fn from_json(json: &str) -> Result<Diagram, UmlSketchError> {
    let record: DiagramRecord = serde_json::from_str(json)?;
    Ok(record.into_diagram())
}

/// Key/value storage for saved diagrams.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, UmlSketchError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), UmlSketchError>;
}

/// Saves `diagram` under [`DIAGRAM_KEY`].
///
/// # Errors
///
/// Propagates serialization and storage errors.
pub fn save(diagram: &Diagram, store: &mut dyn KeyValueStore) -> Result<(), UmlSketchError> {
    let json = to_json(diagram)?;
    store.set(DIAGRAM_KEY, &json)?;
    debug!(node_count = diagram.node_count(); "Saved diagram");
    Ok(())
}

/// Loads the diagram saved under [`DIAGRAM_KEY`].
///
/// # Errors
///
/// Returns [`UmlSketchError::MissingKey`] when nothing was saved, and
/// propagates storage and parse errors.
pub fn load(store: &dyn KeyValueStore) -> Result<Diagram, UmlSketchError> {
    let json = store
        .get(DIAGRAM_KEY)?
        .ok_or_else(|| UmlSketchError::MissingKey(DIAGRAM_KEY.to_string()))?;
    let diagram = from_json(&json)?;
    debug!(node_count = diagram.node_count(); "Loaded diagram");
    Ok(diagram)
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, UmlSketchError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), UmlSketchError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store keeping one `<key>.json` file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on the
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, UmlSketchError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), UmlSketchError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);

        // Write next to the target, then rename over it
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;
        debug!(path:? = path; "Wrote store entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn sample() -> Diagram {
        let mut rng = StdRng::seed_from_u64(5);
        let mut diagram = Diagram::new(DiagramType::Component);
        let api = diagram.add_node(NodeKind::Component, &mut rng);
        let db = diagram.add_node(NodeKind::Database, &mut rng);
        diagram.connect(api, db, EdgeStyle::Dashed).unwrap();
        diagram.set_label(db, "Orders \"main\"").unwrap();
        diagram
    }

    #[test]
    fn test_json_preserves_diagram() {
        let diagram = sample();
        let restored = from_json(&to_json(&diagram).unwrap()).unwrap();
        assert_eq!(restored, diagram);
    }

    #[test]
    fn test_json_field_names() {
        let json = to_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["diagramType"], "component");
        assert_eq!(value["nodeCounter"], 2);
        assert_eq!(value["nodes"][1]["kind"], "database");
        assert_eq!(value["edges"][0]["style"], "dashed");
    }

    #[test]
    fn test_legacy_record() {
        let json = r#"{
            "diagramType": "usecase",
            "nodeCounter": 3,
            "nodes": [
                {"id": "node-0", "type": "actor", "label": "Customer", "left": "60px", "top": "40px"},
                {"id": "node-2", "type": "node", "label": "Pay", "left": "200px", "top": "45.5px"}
            ],
            "connections": [
                {"from": "node-0", "to": "node-2"},
                {"from": "node-0", "to": "node-1"}
            ]
        }"#;

        let diagram = from_json(json).unwrap();

        assert_eq!(diagram.diagram_type(), DiagramType::Usecase);
        assert_eq!(diagram.node_counter(), 3);
        let pay = diagram.node(NodeId::new("node-2")).unwrap();
        assert_eq!(pay.kind(), NodeKind::Generic);
        assert_eq!(pay.position(), Point::new(200.0, 45.5));
        assert_eq!(pay.size(), NodeKind::Generic.default_size());
        // The edge to the missing node-1 is dropped
        assert_eq!(diagram.edges().len(), 1);
        assert_eq!(diagram.edges()[0].style(), EdgeStyle::Solid);
    }

    #[test]
    fn test_bad_coordinate_rejected() {
        let json = r#"{"nodes": [{"id": "a", "x": "wide"}]}"#;
        assert!(matches!(from_json(json), Err(UmlSketchError::Json(_))));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(matches!(load(&store), Err(UmlSketchError::MissingKey(_))));

        let diagram = sample();
        save(&diagram, &mut store).unwrap();
        assert_eq!(load(&store).unwrap(), diagram);
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("saved"));
        assert_eq!(store.get(DIAGRAM_KEY).unwrap(), None);

        let diagram = sample();
        save(&diagram, &mut store).unwrap();

        assert!(dir.path().join("saved").join("diagram.json").exists());
        assert_eq!(load(&store).unwrap(), diagram);

        store.set("../escape", "{}").unwrap();
        assert!(dir.path().join("saved").join("___escape.json").exists());
    }
}
