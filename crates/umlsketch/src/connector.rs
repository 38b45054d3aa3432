//! Connector geometry.
//!
//! A connector is drawn between the *boundaries* of two nodes rather than
//! their centers, so arrow heads stay visible. Each endpoint is found by
//! casting a ray from a node center toward the other node's center and
//! clipping it against the node's outline (a rectangle for most kinds, an
//! ellipse for actors).
//!
//! All math works on logical coordinates; the view transform is applied by
//! the presentation layer afterwards.

use log::debug;

use umlsketch_core::{
    geometry::{Point, Size},
    identifier::NodeId,
    model::{EdgeStyle, Outline},
};

use crate::diagram::{Diagram, Node};

/// Point where the ray from `center` toward `target` leaves a rectangle.
///
/// The rectangle is `size` wide and tall, centered on `center`. When the
/// target coincides with the center there is no direction, and the center
/// itself is returned.
///
/// # Examples
///
/// ```
/// # use umlsketch::connector::edge_intersection;
/// # use umlsketch_core::geometry::{Point, Size};
/// let center = Point::new(0.0, 0.0);
/// let exit = edge_intersection(center, Size::new(80.0, 40.0), Point::new(100.0, 100.0));
///
/// // Steep ray: leaves through the bottom edge
/// assert_eq!(exit, Point::new(20.0, 20.0));
/// ```
pub fn edge_intersection(center: Point, size: Size, target: Point) -> Point {
    let delta = target.sub_point(center);
    if delta.is_zero() {
        return center;
    }

    let half_width = size.width() / 2.0;
    let half_height = size.height() / 2.0;

    // Only the sides the ray actually heads toward are candidates
    let mut t = f32::INFINITY;
    if delta.x() != 0.0 {
        t = t.min(half_width / delta.x().abs());
    }
    if delta.y() != 0.0 {
        t = t.min(half_height / delta.y().abs());
    }

    center.add_point(delta.scale(t))
}

/// Point where the ray from `center` toward `target` leaves the ellipse
/// inscribed in a box of `size`.
///
/// For square boxes this is a circle of radius `size.width() / 2`.
pub fn ellipse_intersection(center: Point, size: Size, target: Point) -> Point {
    let delta = target.sub_point(center);
    if delta.is_zero() {
        return center;
    }

    let rx = size.width() / 2.0;
    let ry = size.height() / 2.0;
    let t = 1.0 / ((delta.x() / rx).powi(2) + (delta.y() / ry).powi(2)).sqrt();

    center.add_point(delta.scale(t))
}

/// Clips the ray from a node's center toward `target` against its outline.
pub fn boundary_point(node: &Node, target: Point) -> Point {
    match node.kind().outline() {
        Outline::Rectangle => edge_intersection(node.center(), node.size(), target),
        Outline::Ellipse => ellipse_intersection(node.center(), node.size(), target),
    }
}

/// A drawable connector between two node boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    from: NodeId,
    to: NodeId,
    style: EdgeStyle,
    start: Point,
    end: Point,
}

impl Connector {
    /// Computes the connector between two nodes.
    pub fn between(from: &Node, to: &Node, style: EdgeStyle) -> Self {
        Self {
            from: from.id(),
            to: to.id(),
            style,
            start: boundary_point(from, to.center()),
            end: boundary_point(to, from.center()),
        }
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

    /// Point on the source boundary.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Point on the target boundary, where the arrow head goes.
    pub fn end(&self) -> Point {
        self.end
    }
}

/// Connectors for every edge of the diagram, in edge order.
///
/// Edges whose endpoints are missing are skipped.
pub fn connectors(diagram: &Diagram) -> Vec<Connector> {
    diagram
        .edges()
        .iter()
        .filter_map(|edge| {
            match (diagram.node(edge.from()), diagram.node(edge.to())) {
                (Some(from), Some(to)) => Some(Connector::between(from, to, edge.style())),
                _ => {
                    debug!(from:% = edge.from(), to:% = edge.to(); "Skipping dangling edge");
                    None
                }
            }
        })
        .collect()
}
