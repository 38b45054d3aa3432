//! The editor controller.
//!
//! [`Editor`] is the single owner of the editing session: the diagram, the
//! view transform, undo history, selection and connection-mode state. The
//! presentation layer forwards user gestures to it and reads back the
//! diagram, the connectors and the transform to draw.
//!
//! Every operation that changes the diagram records a snapshot first, so it
//! can be undone.

use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};

use umlsketch_core::{
    geometry::{Insets, Point, Size},
    identifier::NodeId,
    model::{DiagramType, EdgeStyle, NodeKind},
};

use crate::{
    codegen,
    config::AppConfig,
    connector::{self, Connector},
    diagram::Diagram,
    error::UmlSketchError,
    history::History,
    layout::{Engine, LayoutReport},
    persist::{self, KeyValueStore},
    view::ViewTransform,
};

/// What a click on a node did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The node became the selection.
    Selected(NodeId),
    /// Connection mode: the node was picked as the source.
    SourcePicked(NodeId),
    /// Connection mode: an edge from the picked source was created.
    Connected { from: NodeId, to: NodeId },
    /// Connection mode: the source was clicked again and the pick dropped.
    Cancelled,
}

#[derive(Debug, Clone)]
struct DragState {
    node: NodeId,
    before: Diagram,
}

/// Editing session over one diagram.
#[derive(Debug)]
pub struct Editor {
    diagram: Diagram,
    view: ViewTransform,
    history: History,
    config: AppConfig,
    rng: StdRng,
    selection: Option<NodeId>,
    connection_mode: bool,
    pending_source: Option<NodeId>,
    connection_style: EdgeStyle,
    drag: Option<DragState>,
}

impl Editor {
    /// Creates an editor over an empty diagram.
    pub fn new(config: AppConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Creates an editor whose node placement is reproducible.
    pub fn with_seed(config: AppConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: AppConfig, rng: StdRng) -> Self {
        Self {
            diagram: Diagram::default(),
            view: ViewTransform::new(config.view()),
            history: History::new(config.history().limit()),
            config,
            rng,
            selection: None,
            connection_mode: false,
            pending_source: None,
            connection_style: EdgeStyle::default(),
            drag: None,
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    pub fn is_connection_mode(&self) -> bool {
        self.connection_mode
    }

    /// Source picked by the first click in connection mode.
    pub fn pending_source(&self) -> Option<NodeId> {
        self.pending_source
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Applies a fallible mutation, recording the prior state if it succeeds.
    fn mutate<T>(
        &mut self,
        f: impl FnOnce(&mut Diagram) -> Result<T, UmlSketchError>,
    ) -> Result<T, UmlSketchError> {
        let before = self.diagram.clone();
        let value = f(&mut self.diagram)?;
        self.history.record(before);
        Ok(value)
    }

    /// Drops selection and connection state that refers to missing nodes.
    fn forget_missing_nodes(&mut self) {
        if self
            .selection
            .is_some_and(|id| !self.diagram.contains_node(id))
        {
            self.selection = None;
        }
        if self
            .pending_source
            .is_some_and(|id| !self.diagram.contains_node(id))
        {
            self.pending_source = None;
        }
        if self
            .drag
            .as_ref()
            .is_some_and(|drag| !self.diagram.contains_node(drag.node))
        {
            self.drag = None;
        }
    }

    /// Adds a node of `kind` at a random spot near the canvas origin.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        self.history.record(self.diagram.clone());
        self.diagram.add_node(kind, &mut self.rng)
    }

    /// Removes a node and its edges.
    ///
    /// # Errors
    ///
    /// Returns [`UmlSketchError::UnknownNode`] if no node has this id.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), UmlSketchError> {
        self.mutate(|diagram| diagram.remove_node(id))?;
        self.forget_missing_nodes();
        Ok(())
    }

    /// Connects two nodes.
    ///
    /// # Errors
    ///
    /// Returns [`UmlSketchError::UnknownNode`] or
    /// [`UmlSketchError::SelfConnection`].
    pub fn connect(
        &mut self,
        from: NodeId,
        to: NodeId,
        style: EdgeStyle,
    ) -> Result<(), UmlSketchError> {
        self.mutate(|diagram| diagram.connect(from, to, style))
    }

    /// Renames a node.
    ///
    /// # Errors
    ///
    /// Returns [`UmlSketchError::UnknownNode`] if no node has this id.
    pub fn set_label(
        &mut self,
        id: NodeId,
        label: impl Into<String>,
    ) -> Result<(), UmlSketchError> {
        let label = label.into();
        self.mutate(|diagram| diagram.set_label(id, label))
    }

    /// Selects a node, or clears the selection with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`UmlSketchError::UnknownNode`] if no node has this id.
    pub fn select(&mut self, id: Option<NodeId>) -> Result<(), UmlSketchError> {
        if let Some(id) = id {
            if !self.diagram.contains_node(id) {
                return Err(UmlSketchError::UnknownNode(id));
            }
        }
        self.selection = id;
        Ok(())
    }

    /// Switches connection mode on or off and returns the new state.
    ///
    /// Leaving the mode drops a picked source.
    pub fn toggle_connection_mode(&mut self) -> bool {
        self.connection_mode = !self.connection_mode;
        if !self.connection_mode {
            self.pending_source = None;
        }
        debug!(enabled = self.connection_mode; "Connection mode toggled");
        self.connection_mode
    }

    /// Style of edges created by clicks in connection mode.
    pub fn set_connection_style(&mut self, style: EdgeStyle) {
        self.connection_style = style;
    }

    /// Handles a click on a node.
    ///
    /// Outside connection mode the node is selected. In connection mode the
    /// first click picks the source and the second click on another node
    /// connects them; clicking the source again drops the pick.
    ///
    /// # Errors
    ///
    /// Returns [`UmlSketchError::UnknownNode`] if no node has this id.
    pub fn click_node(&mut self, id: NodeId) -> Result<ClickOutcome, UmlSketchError> {
        if !self.diagram.contains_node(id) {
            return Err(UmlSketchError::UnknownNode(id));
        }

        if !self.connection_mode {
            self.selection = Some(id);
            return Ok(ClickOutcome::Selected(id));
        }

        match self.pending_source.take() {
            None => {
                self.pending_source = Some(id);
                Ok(ClickOutcome::SourcePicked(id))
            }
            Some(source) if source == id => Ok(ClickOutcome::Cancelled),
            Some(source) => {
                self.connect(source, id, self.connection_style)?;
                Ok(ClickOutcome::Connected {
                    from: source,
                    to: id,
                })
            }
        }
    }

    /// Starts dragging a node.
    ///
    /// # Errors
    ///
    /// Returns [`UmlSketchError::UnknownNode`] if no node has this id.
    pub fn begin_drag(&mut self, id: NodeId) -> Result<(), UmlSketchError> {
        if !self.diagram.contains_node(id) {
            return Err(UmlSketchError::UnknownNode(id));
        }
        self.drag = Some(DragState {
            node: id,
            before: self.diagram.clone(),
        });
        Ok(())
    }

    /// Moves the dragged node by a screen-space displacement.
    ///
    /// The displacement is divided by the zoom, so a node follows the
    /// pointer at any zoom level. Without an active drag this does nothing.
    pub fn drag_node(&mut self, screen_delta: Point) -> Result<(), UmlSketchError> {
        let Some(drag) = &self.drag else {
            return Ok(());
        };
        let delta = self.view.screen_delta_to_logical(screen_delta);
        self.diagram.translate_node(drag.node, delta)
    }

    /// Finishes a drag, snapping the node to the grid if configured.
    ///
    /// The drag is recorded as one undo step when the node actually moved.
    pub fn end_drag(&mut self) -> Result<(), UmlSketchError> {
        let Some(drag) = self.drag.take() else {
            return Ok(());
        };
        if self.config.grid().snap_on_drop() {
            self.diagram.snap_node(drag.node, self.config.grid().size())?;
        }
        if drag.before != self.diagram {
            self.history.record(drag.before);
        }
        Ok(())
    }

    /// Arranges all nodes automatically.
    ///
    /// # Errors
    ///
    /// Returns [`UmlSketchError::EmptyDiagram`] when there is nothing to
    /// arrange.
    pub fn auto_layout(&mut self) -> Result<LayoutReport, UmlSketchError> {
        if self.diagram.is_empty() {
            return Err(UmlSketchError::EmptyDiagram);
        }

        let engine = Engine::new(self.config.layout().clone(), self.config.grid().size());
        let layout = engine.calculate(&self.diagram);
        self.history.record(self.diagram.clone());
        layout.apply(&mut self.diagram);

        info!(
            node_count = self.diagram.node_count(),
            layers = layout.report().layers;
            "Auto-layout applied"
        );
        Ok(layout.report())
    }

    /// Snaps every node to the grid.
    pub fn snap_all_to_grid(&mut self) {
        self.history.record(self.diagram.clone());
        self.diagram.snap_to_grid(self.config.grid().size());
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom_by(self.config.view().zoom_step());
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_by(-self.config.view().zoom_step());
    }

    /// Zooms by `delta` around a screen point, e.g. the mouse position
    /// during wheel zoom.
    pub fn zoom_at_point(&mut self, delta: f32, screen: Point) {
        self.view.zoom_at_point(delta, screen);
    }

    pub fn pan(&mut self, screen_delta: Point) {
        self.view.pan(screen_delta);
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    /// Zooms and pans so every node fits in `viewport`, with padding.
    ///
    /// Returns `false`, leaving the view unchanged, for an empty diagram.
    pub fn fit_to_content(&mut self, viewport: Size) -> bool {
        let Some(bounds) = self.diagram.content_bounds() else {
            return false;
        };
        let padded = bounds.add_padding(Insets::uniform(self.config.view().fit_padding()));
        self.view.fit_to_content(padded, viewport);
        true
    }

    /// Connector endpoints for every edge, in logical coordinates.
    pub fn connectors(&self) -> Vec<Connector> {
        connector::connectors(&self.diagram)
    }

    /// PlantUML source of the diagram.
    pub fn generate_code(&self) -> String {
        codegen::generate(&self.diagram)
    }

    pub fn set_diagram_type(&mut self, diagram_type: DiagramType) {
        if self.diagram.diagram_type() == diagram_type {
            return;
        }
        self.history.record(self.diagram.clone());
        self.diagram.set_diagram_type(diagram_type);
    }

    /// Saves the diagram into `store`.
    ///
    /// # Errors
    ///
    /// Propagates serialization and storage errors.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), UmlSketchError> {
        persist::save(&self.diagram, store)
    }

    /// Replaces the diagram with the one saved in `store`.
    ///
    /// # Errors
    ///
    /// Returns [`UmlSketchError::MissingKey`] when nothing was saved; the
    /// current diagram is kept on any error.
    pub fn load(&mut self, store: &dyn KeyValueStore) -> Result<(), UmlSketchError> {
        let loaded = persist::load(store)?;
        self.history.record(std::mem::replace(&mut self.diagram, loaded));
        self.pending_source = None;
        self.drag = None;
        self.forget_missing_nodes();
        Ok(())
    }

    /// Removes every node and edge.
    pub fn clear(&mut self) {
        self.history.record(self.diagram.clone());
        self.diagram.clear();
        self.selection = None;
        self.pending_source = None;
        self.drag = None;
    }

    /// Reverts the last change. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = self.diagram.clone();
        match self.history.undo(current) {
            Some(previous) => {
                self.diagram = previous;
                self.drag = None;
                self.forget_missing_nodes();
                true
            }
            None => false,
        }
    }

    /// Re-applies the last undone change. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        let current = self.diagram.clone();
        match self.history.redo(current) {
            Some(next) => {
                self.diagram = next;
                self.drag = None;
                self.forget_missing_nodes();
                true
            }
            None => false,
        }
    }
}
