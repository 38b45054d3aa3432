//! Phase B: force-directed refinement of the layered placement.
//!
//! Nodes repel each other when they come close and connected nodes attract
//! each other when they drift further apart than an ideal arrow length.
//! The simulation cools down geometrically, so late iterations only make
//! small corrections.

use std::f32::consts::TAU;

use log::debug;
use rand::{Rng, rngs::StdRng};

use umlsketch_core::geometry::{Bounds, Point, Size};

use crate::config::LayoutConfig;

/// Force simulation over top-left positions.
pub(super) struct Simulation<'a> {
    config: &'a LayoutConfig,
    sizes: &'a [Size],
    edges: &'a [(usize, usize)],
}

impl<'a> Simulation<'a> {
    pub(super) fn new(
        config: &'a LayoutConfig,
        sizes: &'a [Size],
        edges: &'a [(usize, usize)],
    ) -> Self {
        Self {
            config,
            sizes,
            edges,
        }
    }

    /// Runs the configured number of iterations in place.
    ///
    /// Returns the number of iterations performed, which is zero when there
    /// is nothing to separate.
    pub(super) fn run(&self, positions: &mut [Point], rng: &mut StdRng) -> usize {
        if positions.len() < 2 {
            return 0;
        }

        debug!(
            node_count = positions.len(),
            iterations = self.config.iterations();
            "Running force refinement"
        );

        let mut temperature = 1.0_f32;
        for _ in 0..self.config.iterations() {
            let forces = self.forces(positions, rng);
            for (position, force) in positions.iter_mut().zip(forces) {
                let velocity = force.scale(temperature).clamp_length(self.config.max_step());
                *position = position
                    .add_point(velocity.scale(self.config.damping()))
                    .max_each(self.config.margin());
            }
            temperature *= self.config.cooling_factor();
        }

        self.config.iterations()
    }

    /// Net force on every node for the current positions.
    fn forces(&self, positions: &[Point], rng: &mut StdRng) -> Vec<Point> {
        let centers: Vec<Point> = positions
            .iter()
            .zip(self.sizes)
            .map(|(position, size)| Bounds::new_from_top_left(*position, *size).center())
            .collect();
        let mut forces = vec![Point::default(); positions.len()];

        // Repulsion between every pair
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let (direction, distance) = direction_between(centers[j], centers[i], rng);

                let reach = 1.5
                    * (self.sizes[i].half_diagonal()
                        + self.sizes[j].half_diagonal()
                        + self.config.min_node_spacing());
                if distance >= reach {
                    continue;
                }

                let d = distance.max(1.0);
                let mut magnitude = self.config.repulsion_strength() / (d * d);

                let bounds_i = Bounds::new_from_top_left(positions[i], self.sizes[i]);
                let bounds_j = Bounds::new_from_top_left(positions[j], self.sizes[j]);
                if bounds_i.overlaps(&bounds_j) {
                    magnitude += self.config.overlap_impulse();
                }

                let push = direction.scale(magnitude);
                forces[i] = forces[i].add_point(push);
                forces[j] = forces[j].sub_point(push);
            }
        }

        // Attraction along edges that are longer than ideal
        for &(from, to) in self.edges {
            let delta = centers[to].sub_point(centers[from]);
            let distance = delta.hypot();
            let ideal = self.sizes[from].width() / 2.0
                + self.sizes[to].width() / 2.0
                + self.config.arrow_space();
            if distance <= ideal {
                continue;
            }

            let pull = delta
                .scale(1.0 / distance)
                .scale((distance - ideal) * self.config.attraction_strength());
            forces[from] = forces[from].add_point(pull);
            forces[to] = forces[to].sub_point(pull);
        }

        forces
    }
}

/// Unit vector pointing from `from` to `to`, with the distance between them.
///
/// Coincident points get a random direction so they can separate.
fn direction_between(from: Point, to: Point, rng: &mut StdRng) -> (Point, f32) {
    let delta = to.sub_point(from);
    let distance = delta.hypot();
    if distance > 0.0 {
        return (delta.scale(1.0 / distance), distance);
    }

    let angle = rng.random_range(0.0..TAU);
    (Point::new(angle.cos(), angle.sin()), 0.0)
}
