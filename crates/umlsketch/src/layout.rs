//! Auto-layout of diagram nodes.
//!
//! The [`Engine`] arranges nodes in three phases followed by a grid snap:
//!
//! 1. **Layering**: nodes are grouped by BFS depth from the root nodes
//!    (nodes without incoming edges, and every actor) and the layers are
//!    placed left to right.
//! 2. **Force refinement**: a cooling force simulation relaxes the layered
//!    placement, pushing crowded nodes apart and pulling long edges in.
//! 3. **Overlap resolution**: pairs still closer than the minimum spacing
//!    are pushed apart along the axis of least overlap.
//!
//! The engine only reads nodes and edges; it returns a [`Layout`] that the
//! caller applies to the [`Diagram`].
//!
//! # Example
//!
//! ```
//! # use rand::{SeedableRng, rngs::StdRng};
//! # use umlsketch::{config::LayoutConfig, diagram::Diagram, layout::Engine};
//! # use umlsketch_core::model::{EdgeStyle, NodeKind};
//! let mut rng = StdRng::seed_from_u64(1);
//! let mut diagram = Diagram::default();
//! let user = diagram.add_node(NodeKind::Actor, &mut rng);
//! let api = diagram.add_node(NodeKind::Component, &mut rng);
//! diagram.connect(user, api, EdgeStyle::Solid).unwrap();
//!
//! let layout = Engine::new(LayoutConfig::default(), 20.0).calculate(&diagram);
//! assert_eq!(layout.layers().len(), 2);
//!
//! layout.apply(&mut diagram);
//! ```

mod force;
mod layering;
mod overlap;

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, info, warn};
use rand::{SeedableRng, rngs::StdRng};

use umlsketch_core::{
    geometry::{Point, Size},
    identifier::NodeId,
};

use crate::{
    config::LayoutConfig,
    diagram::{Diagram, Edge, Node},
};

/// Statistics of one layout run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutReport {
    /// Number of layers, including the trailing layer of unreached nodes.
    pub layers: usize,
    /// Force refinement iterations performed.
    pub iterations_run: usize,
    /// Pairwise overlap resolution passes performed.
    pub overlap_passes: usize,
    /// Whether the pairwise passes ran out and the ordered sweep finished
    /// the separation.
    pub swept: bool,
    /// Whether every pair of nodes ended up separated.
    pub converged: bool,
}

/// Computed node positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: IndexMap<NodeId, Point>,
    layers: Vec<Vec<NodeId>>,
    report: LayoutReport,
}

impl Layout {
    /// Top-left position of every laid out node, in node order.
    pub fn positions(&self) -> &IndexMap<NodeId, Point> {
        &self.positions
    }

    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    /// Layers from left to right, each listing its nodes top to bottom.
    pub fn layers(&self) -> &[Vec<NodeId>] {
        &self.layers
    }

    pub fn report(&self) -> LayoutReport {
        self.report
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Writes the computed positions back into `diagram`.
    ///
    /// Only node coordinates change. Nodes removed since the layout was
    /// computed are ignored.
    pub fn apply(&self, diagram: &mut Diagram) {
        for (&id, &position) in &self.positions {
            if diagram.move_node(id, position).is_err() {
                warn!(node_id:% = id; "Laid out node no longer exists");
            }
        }
    }
}

/// Layered + force-directed layout engine.
#[derive(Debug, Clone)]
pub struct Engine {
    config: LayoutConfig,
    grid_size: f32,
}

impl Engine {
    /// Creates an engine snapping its result to `grid_size`.
    pub fn new(config: LayoutConfig, grid_size: f32) -> Self {
        Self { config, grid_size }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out every node and edge of `diagram`.
    pub fn calculate(&self, diagram: &Diagram) -> Layout {
        let nodes: Vec<&Node> = diagram.nodes().collect();
        self.calculate_nodes(&nodes, diagram.edges())
    }

    /// Lays out `nodes`, using `edges` between them.
    ///
    /// Edges referencing unknown nodes and self loops are ignored. The
    /// result depends only on the inputs and the configured seed.
    pub fn calculate_nodes(&self, nodes: &[&Node], edges: &[Edge]) -> Layout {
        if nodes.is_empty() {
            debug!("Nothing to lay out");
            return Layout::default();
        }

        let index: HashMap<NodeId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id(), idx))
            .collect();
        let links: Vec<(usize, usize)> = edges
            .iter()
            .filter_map(|edge| {
                let from = *index.get(&edge.from())?;
                let to = *index.get(&edge.to())?;
                (from != to).then_some((from, to))
            })
            .collect();
        let sizes: Vec<Size> = nodes.iter().map(|node| node.size()).collect();
        let forced_roots: Vec<bool> = nodes
            .iter()
            .map(|node| node.kind().is_flow_source())
            .collect();

        debug!(
            node_count = nodes.len(),
            edge_count = links.len(),
            ignored_edges = edges.len() - links.len();
            "Calculating layout"
        );

        // Phase A
        let graph = layering::build_graph(nodes.len(), &links);
        let layers = layering::assign_layers(&graph, &forced_roots);
        let mut positions = layering::place_layers(
            &layers,
            &sizes,
            self.config.min_node_spacing(),
            self.config.arrow_space(),
            self.config.margin(),
        );

        // Phase B
        let mut rng = StdRng::seed_from_u64(self.config.seed());
        let iterations_run =
            force::Simulation::new(&self.config, &sizes, &links).run(&mut positions, &mut rng);

        // Phase C: the extra grid cell keeps the spacing after snapping
        let resolution = overlap::resolve(
            &mut positions,
            &sizes,
            self.config.min_node_spacing() + self.grid_size.max(0.0),
            self.config.overlap_push(),
            self.config.margin(),
            self.config.overlap_passes(),
        );
        if !resolution.converged {
            warn!(
                passes = resolution.passes;
                "Overlap resolution stopped before every node was separated"
            );
        }

        let report = LayoutReport {
            layers: layers.len(),
            iterations_run,
            overlap_passes: resolution.passes,
            swept: resolution.swept,
            converged: resolution.converged,
        };
        info!(
            layers = report.layers,
            iterations = report.iterations_run,
            overlap_passes = report.overlap_passes,
            swept = report.swept;
            "Layout finished"
        );

        Layout {
            positions: nodes
                .iter()
                .zip(positions)
                .map(|(node, position)| {
                    (
                        node.id(),
                        position.snap_to_grid(self.grid_size).max_each(0.0),
                    )
                })
                .collect(),
            layers: layers
                .iter()
                .map(|layer| layer.iter().map(|&idx| nodes[idx].id()).collect())
                .collect(),
            report,
        }
    }
}
