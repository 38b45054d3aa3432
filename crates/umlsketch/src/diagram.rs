//! The node/edge store.
//!
//! [`Diagram`] exclusively owns the nodes and edges of the diagram being
//! edited. Everything else (layout, connectors, code generation,
//! persistence) borrows it. Node positions are logical top-left corners;
//! zoom and pan never touch them.

use indexmap::IndexMap;
use log::debug;
use rand::Rng;

use umlsketch_core::{
    geometry::{Bounds, Point, Size},
    identifier::NodeId,
    model::{DiagramType, EdgeStyle, NodeKind},
};

use crate::error::UmlSketchError;

/// A diagram element with a logical size and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    label: String,
    size: Size,
    position: Point,
}

impl Node {
    /// Creates a node with the default size of its kind.
    pub fn new(id: NodeId, kind: NodeKind, label: impl Into<String>, position: Point) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            size: kind.default_size(),
            position,
        }
    }

    /// Overrides the node size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Top-left corner in logical canvas units.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.position, self.size)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

/// A directed relationship between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    from: NodeId,
    to: NodeId,
    style: EdgeStyle,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, style: EdgeStyle) -> Self {
        Self { from, to, style }
    }

    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }

    pub fn style(&self) -> EdgeStyle {
        self.style
    }

    /// Returns true if either endpoint is `id`.
    pub fn touches(&self, id: NodeId) -> bool {
        self.from == id || self.to == id
    }
}

/// Owner of the nodes and edges of one diagram.
///
/// Nodes keep their insertion order, which is also the order used by code
/// generation and by the layout engine when breaking ties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    nodes: IndexMap<NodeId, Node>,
    edges: Vec<Edge>,
    diagram_type: DiagramType,
    node_counter: usize,
}

impl Diagram {
    pub fn new(diagram_type: DiagramType) -> Self {
        Self {
            diagram_type,
            ..Self::default()
        }
    }

    pub fn diagram_type(&self) -> DiagramType {
        self.diagram_type
    }

    pub fn set_diagram_type(&mut self, diagram_type: DiagramType) {
        self.diagram_type = diagram_type;
    }

    /// Counter used to name the next added node.
    pub fn node_counter(&self) -> usize {
        self.node_counter
    }

    pub(crate) fn set_node_counter(&mut self, counter: usize) {
        self.node_counter = counter;
    }

    /// Adds a node of `kind` at a random spot near the top-left of the canvas.
    ///
    /// The node is named `node-<counter>` and labelled `<Kind><counter + 1>`.
    pub fn add_node<R: Rng + ?Sized>(&mut self, kind: NodeKind, rng: &mut R) -> NodeId {
        // Skip ids already taken by inserted or loaded nodes
        let mut id = NodeId::from_counter(self.node_counter);
        while self.nodes.contains_key(&id) {
            self.node_counter += 1;
            id = NodeId::from_counter(self.node_counter);
        }
        self.node_counter += 1;

        let label = format!("{}{}", kind.display_name(), self.node_counter);
        let position = Point::new(
            30.0 + rng.random_range(0.0..150.0),
            30.0 + rng.random_range(0.0..100.0),
        );
        debug!(node_id:% = id, kind:?; "Adding node");
        self.nodes.insert(id, Node::new(id, kind, label, position));
        id
    }

    /// Inserts a fully specified node, replacing any node with the same id.
    pub fn insert_node(&mut self, node: Node) -> Option<Node> {
        self.nodes.insert(node.id(), node)
    }

    /// Removes a node together with every edge referencing it.
    ///
    /// # Errors
    ///
    /// Returns [`UmlSketchError::UnknownNode`] if no node has this id.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, UmlSketchError> {
        let node = self
            .nodes
            .shift_remove(&id)
            .ok_or(UmlSketchError::UnknownNode(id))?;
        let before = self.edges.len();
        self.edges.retain(|edge| !edge.touches(id));
        debug!(
            node_id:% = id,
            removed_edges = before - self.edges.len();
            "Removed node"
        );
        Ok(node)
    }

    /// Adds a directed edge between two existing, distinct nodes.
    ///
    /// Parallel edges are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`UmlSketchError::UnknownNode`] for a missing endpoint and
    /// [`UmlSketchError::SelfConnection`] when `from == to`.
    pub fn connect(
        &mut self,
        from: NodeId,
        to: NodeId,
        style: EdgeStyle,
    ) -> Result<(), UmlSketchError> {
        for id in [from, to] {
            if !self.nodes.contains_key(&id) {
                return Err(UmlSketchError::UnknownNode(id));
            }
        }
        if from == to {
            return Err(UmlSketchError::SelfConnection(from));
        }
        self.edges.push(Edge::new(from, to, style));
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Replaces the label of a node.
    ///
    /// # Errors
    ///
    /// Returns [`UmlSketchError::UnknownNode`] if no node has this id.
    pub fn set_label(
        &mut self,
        id: NodeId,
        label: impl Into<String>,
    ) -> Result<(), UmlSketchError> {
        let node = self.node_mut(id)?;
        node.label = label.into();
        Ok(())
    }

    /// Moves a node so its top-left corner is at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`UmlSketchError::UnknownNode`] if no node has this id.
    pub fn move_node(&mut self, id: NodeId, position: Point) -> Result<(), UmlSketchError> {
        self.node_mut(id)?.set_position(position);
        Ok(())
    }

    /// Moves a node by a logical displacement.
    ///
    /// # Errors
    ///
    /// Returns [`UmlSketchError::UnknownNode`] if no node has this id.
    pub fn translate_node(&mut self, id: NodeId, delta: Point) -> Result<(), UmlSketchError> {
        let node = self.node_mut(id)?;
        node.position = node.position.add_point(delta);
        Ok(())
    }

    /// Snaps a single node to the grid, keeping it at non-negative coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`UmlSketchError::UnknownNode`] if no node has this id.
    pub fn snap_node(&mut self, id: NodeId, grid: f32) -> Result<(), UmlSketchError> {
        let node = self.node_mut(id)?;
        node.position = node.position.snap_to_grid(grid).max_each(0.0);
        Ok(())
    }

    /// Snaps every node to the grid, keeping them at non-negative coordinates.
    pub fn snap_to_grid(&mut self, grid: f32) {
        for node in self.nodes.values_mut() {
            node.position = node.position.snap_to_grid(grid).max_each(0.0);
        }
    }

    /// Bounding box of all nodes, or `None` for an empty diagram.
    pub fn content_bounds(&self) -> Option<Bounds> {
        self.nodes
            .values()
            .map(Node::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Removes every node and edge and restarts node numbering.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.node_counter = 0;
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, UmlSketchError> {
        self.nodes
            .get_mut(&id)
            .ok_or(UmlSketchError::UnknownNode(id))
    }
}
