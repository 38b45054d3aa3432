//! Phase A: assign nodes to layers and place the layers left to right.

use std::collections::{HashSet, VecDeque};

use log::trace;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
};

use umlsketch_core::geometry::{Point, Size};

/// Builds the dependency graph over node indices.
///
/// Node weights are the indices into the caller's node slice, so graph
/// indices and slice indices coincide.
pub(super) fn build_graph(node_count: usize, edges: &[(usize, usize)]) -> DiGraph<usize, ()> {
    let mut graph = DiGraph::with_capacity(node_count, edges.len());
    for idx in 0..node_count {
        graph.add_node(idx);
    }
    for &(from, to) in edges {
        graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
    }
    graph
}

/// Groups nodes into layers by BFS depth from the roots.
///
/// Roots are nodes without incoming edges plus every node flagged in
/// `forced_roots`; without any, the first node is the root. Nodes the BFS
/// never reaches form one trailing layer. Within a layer nodes keep their
/// slice order.
pub(super) fn assign_layers(graph: &DiGraph<usize, ()>, forced_roots: &[bool]) -> Vec<Vec<usize>> {
    let node_count = graph.node_count();
    if node_count == 0 {
        return Vec::new();
    }

    let mut roots: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|&idx| {
            forced_roots.get(idx.index()).copied().unwrap_or(false)
                || graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
        })
        .collect();
    if roots.is_empty() {
        roots.push(NodeIndex::new(0));
    }

    let mut layers: Vec<Vec<usize>> = Vec::new();
    let mut visited = HashSet::with_capacity(node_count);
    let mut queue = VecDeque::with_capacity(node_count);
    for root in roots {
        visited.insert(root);
        queue.push_back((root, 0usize));
    }

    // Every node is enqueued at most once, so this runs at most `node_count` times
    while let Some((idx, depth)) = queue.pop_front() {
        while layers.len() <= depth {
            layers.push(Vec::new());
        }
        layers[depth].push(graph[idx]);

        let mut children: Vec<NodeIndex> = graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter(|child| !visited.contains(child))
            .collect();
        children.sort_unstable();
        children.dedup();
        for child in children {
            visited.insert(child);
            queue.push_back((child, depth + 1));
        }
    }

    let unreached: Vec<usize> = graph
        .node_indices()
        .filter(|idx| !visited.contains(idx))
        .map(|idx| graph[idx])
        .collect();
    if !unreached.is_empty() {
        trace!(count = unreached.len(); "Unreached nodes placed in a trailing layer");
        layers.push(unreached);
    }

    for layer in &mut layers {
        layer.sort_unstable();
    }
    layers
}

/// Places layers left to right and stacks each layer vertically.
///
/// Every layer is as wide as its widest node and nodes are centered in it
/// horizontally. Stacks are centered on a common midline
/// `margin + tallest_stack / 2`. Returns top-left positions indexed like
/// `sizes`.
pub(super) fn place_layers(
    layers: &[Vec<usize>],
    sizes: &[Size],
    spacing: f32,
    arrow_space: f32,
    margin: f32,
) -> Vec<Point> {
    let stack_height = |layer: &[usize]| -> f32 {
        let heights: f32 = layer.iter().map(|&idx| sizes[idx].height()).sum();
        heights + spacing * layer.len().saturating_sub(1) as f32
    };

    let tallest = layers
        .iter()
        .map(|layer| stack_height(layer))
        .fold(0.0_f32, f32::max);
    let midline = margin + tallest / 2.0;

    let mut positions = vec![Point::default(); sizes.len()];
    let mut x_cursor = margin;
    for layer in layers {
        let layer_width = layer
            .iter()
            .map(|&idx| sizes[idx].width())
            .fold(0.0_f32, f32::max);

        let mut y_cursor = midline - stack_height(layer) / 2.0;
        for &idx in layer {
            let size = sizes[idx];
            let x = x_cursor + (layer_width - size.width()) / 2.0;
            positions[idx] = Point::new(x, y_cursor);
            y_cursor += size.height() + spacing;
        }

        x_cursor += layer_width + arrow_space;
    }

    positions
}
