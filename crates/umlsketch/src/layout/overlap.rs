//! Phase C: push apart nodes that are still too close after refinement.
//!
//! Pairwise passes fix the common case of a few nodes touching. Crowds piled
//! up against the margin can keep trading places between passes, so when the
//! passes run out a sweep in coordinate order settles every remaining pair.

use log::{debug, trace};

use umlsketch_core::geometry::{Bounds, Insets, Point, Size};

/// Smallest extra distance a sweep move adds past the blocking node.
const MIN_SWEEP_STEP: f32 = 0.5;

/// Outcome of overlap resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Resolution {
    /// Pairwise passes performed, including the final clean one.
    pub(super) passes: usize,
    /// Whether the sweep had to finish the job.
    pub(super) swept: bool,
    /// Whether every pair ended up at least the clearance apart.
    pub(super) converged: bool,
}

/// Separates every pair of nodes by at least `clearance` on one axis.
///
/// Each pass pushes offending pairs apart along the axis of least overlap,
/// by half the overlap plus `push` each. Nodes never move below `margin`;
/// when one side is blocked the other side takes the whole displacement.
/// Passes stop at the first one without offenders. If `max_passes` run out
/// first, [`sweep`] separates the rest.
pub(super) fn resolve(
    positions: &mut [Point],
    sizes: &[Size],
    clearance: f32,
    push: f32,
    margin: f32,
    max_passes: usize,
) -> Resolution {
    let padding = Insets::uniform(clearance / 2.0);

    for pass in 1..=max_passes {
        let mut offenders = 0usize;

        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let a = padded(positions[i], sizes[i], padding);
                let b = padded(positions[j], sizes[j], padding);
                let depth = a.overlap_depth(&b);
                if !(depth.x() > 0.0 && depth.y() > 0.0) {
                    continue;
                }
                offenders += 1;

                if depth.x() <= depth.y() {
                    let shift = depth.x() / 2.0 + push;
                    let (low, high) = ordered(i, j, a.center().x(), b.center().x());
                    let (low_x, high_x) =
                        separate(positions[low].x(), positions[high].x(), shift, margin);
                    positions[low] = positions[low].with_x(low_x);
                    positions[high] = positions[high].with_x(high_x);
                } else {
                    let shift = depth.y() / 2.0 + push;
                    let (low, high) = ordered(i, j, a.center().y(), b.center().y());
                    let (low_y, high_y) =
                        separate(positions[low].y(), positions[high].y(), shift, margin);
                    positions[low] = positions[low].with_y(low_y);
                    positions[high] = positions[high].with_y(high_y);
                }
            }
        }

        trace!(pass, offenders; "Overlap resolution pass");
        if offenders == 0 {
            return Resolution {
                passes: pass,
                swept: false,
                converged: true,
            };
        }
    }

    let moves = sweep(positions, sizes, clearance, push);
    debug!(passes = max_passes, moves; "Swept remaining overlaps");

    Resolution {
        passes: max_passes,
        swept: true,
        converged: is_separated(positions, sizes, clearance),
    }
}

/// Places nodes one at a time in `(x, y)` order, moving each right or down
/// past any already placed node it is too close to.
///
/// Nodes only move towards larger coordinates, so the margin holds and a
/// placed node never has to move again. Once a node has been moved past a
/// placed node on one axis it stays clear of it, which bounds the moves
/// per node by the number of nodes placed before it. Returns the number of
/// moves made.
pub(super) fn sweep(positions: &mut [Point], sizes: &[Size], clearance: f32, push: f32) -> usize {
    let padding = Insets::uniform(clearance / 2.0);
    let step = push.max(MIN_SWEEP_STEP);

    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.sort_by(|&a, &b| {
        positions[a]
            .x()
            .total_cmp(&positions[b].x())
            .then(positions[a].y().total_cmp(&positions[b].y()))
            .then(a.cmp(&b))
    });

    let mut moves = 0usize;
    for (placed_count, &node) in order.iter().enumerate() {
        let placed = &order[..placed_count];
        for _ in 0..=placed.len() {
            let moving = padded(positions[node], sizes[node], padding);
            let blocker = placed.iter().find_map(|&other| {
                let fixed = padded(positions[other], sizes[other], padding);
                let depth = moving.overlap_depth(&fixed);
                (depth.x() > 0.0 && depth.y() > 0.0).then_some(fixed)
            });
            let Some(fixed) = blocker else {
                break;
            };

            let need_x = fixed.max_x() - moving.min_x();
            let need_y = fixed.max_y() - moving.min_y();
            positions[node] = if need_x <= need_y {
                positions[node].with_x(positions[node].x() + need_x + step)
            } else {
                positions[node].with_y(positions[node].y() + need_y + step)
            };
            moves += 1;
        }
    }
    moves
}

/// Checks that every pair is at least `clearance` apart on some axis.
fn is_separated(positions: &[Point], sizes: &[Size], clearance: f32) -> bool {
    let padding = Insets::uniform(clearance / 2.0);
    (0..positions.len()).all(|i| {
        let a = padded(positions[i], sizes[i], padding);
        ((i + 1)..positions.len()).all(|j| {
            let depth = a.overlap_depth(&padded(positions[j], sizes[j], padding));
            !(depth.x() > 0.0 && depth.y() > 0.0)
        })
    })
}

fn padded(position: Point, size: Size, padding: Insets) -> Bounds {
    Bounds::new_from_top_left(position, size).add_padding(padding)
}

/// Orders a pair by coordinate, breaking ties by index.
fn ordered(i: usize, j: usize, coord_i: f32, coord_j: f32) -> (usize, usize) {
    if coord_j < coord_i { (j, i) } else { (i, j) }
}

/// Moves `low` down and `high` up by `shift`, keeping `low` at or above
/// `margin` and handing any blocked distance to `high`.
fn separate(low: f32, high: f32, shift: f32, margin: f32) -> (f32, f32) {
    let mut new_low = low - shift;
    let mut new_high = high + shift;
    if new_low < margin {
        new_high += margin - new_low;
        new_low = margin.min(low);
    }
    (new_low, new_high)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gap_on_some_axis(a: Bounds, b: Bounds) -> f32 {
        let depth = a.overlap_depth(&b);
        // Negative depth is the gap between the boxes
        (-depth.x()).max(-depth.y())
    }

    #[test]
    fn test_clean_layout_takes_one_pass() {
        let sizes = [Size::new(80.0, 40.0); 2];
        let mut positions = [Point::new(20.0, 20.0), Point::new(200.0, 20.0)];

        let resolution = resolve(&mut positions, &sizes, 60.0, 10.0, 20.0, 10);

        assert_eq!(
            resolution,
            Resolution {
                passes: 1,
                swept: false,
                converged: true
            }
        );
        assert_eq!(positions[1], Point::new(200.0, 20.0));
    }

    #[test]
    fn test_stacked_pair_pushed_vertically() {
        let sizes = [Size::new(80.0, 40.0); 2];
        let mut positions = [Point::new(100.0, 100.0), Point::new(100.0, 150.0)];

        let resolution = resolve(&mut positions, &sizes, 60.0, 10.0, 20.0, 10);

        assert!(resolution.converged);
        assert_eq!(positions[0].x(), 100.0);
        assert_eq!(positions[1].x(), 100.0);
        // Gap of 10 against a clearance of 60: each side moves 25 + 10
        assert_eq!(positions[0].y(), 65.0);
        assert_eq!(positions[1].y(), 185.0);
    }

    #[test]
    fn test_margin_blocks_one_side() {
        let sizes = [Size::new(80.0, 40.0); 2];
        let mut positions = [Point::new(20.0, 20.0), Point::new(50.0, 20.0)];

        let resolution = resolve(&mut positions, &sizes, 60.0, 10.0, 20.0, 10);

        assert!(resolution.converged);
        assert_eq!(positions[0], Point::new(20.0, 20.0));
        let a = Bounds::new_from_top_left(positions[0], sizes[0]);
        let b = Bounds::new_from_top_left(positions[1], sizes[1]);
        assert!(gap_on_some_axis(a, b) >= 60.0);
    }

    #[test]
    fn test_crowded_cluster_converges() {
        let sizes = [
            Size::new(80.0, 40.0),
            Size::new(50.0, 50.0),
            Size::new(80.0, 50.0),
            Size::new(80.0, 40.0),
        ];
        let mut positions = [
            Point::new(40.0, 40.0),
            Point::new(60.0, 50.0),
            Point::new(45.0, 70.0),
            Point::new(70.0, 45.0),
        ];

        let resolution = resolve(&mut positions, &sizes, 60.0, 10.0, 20.0, 10);

        assert!(resolution.converged, "{resolution:?}");
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let a = Bounds::new_from_top_left(positions[i], sizes[i]);
                let b = Bounds::new_from_top_left(positions[j], sizes[j]);
                assert!(gap_on_some_axis(a, b) >= 60.0, "{i} and {j} too close");
            }
        }
    }

    #[test]
    fn test_no_passes_falls_back_to_sweep() {
        let sizes = [Size::new(80.0, 40.0); 2];
        let mut positions = [Point::new(20.0, 20.0); 2];

        let resolution = resolve(&mut positions, &sizes, 60.0, 10.0, 20.0, 0);

        assert_eq!(
            resolution,
            Resolution {
                passes: 0,
                swept: true,
                converged: true
            }
        );
        assert_eq!(positions[0], Point::new(20.0, 20.0));
        // Moved below the first node: 40 of height, 60 of clearance and the push
        assert_eq!(positions[1], Point::new(20.0, 130.0));
    }

    #[test]
    fn test_pile_on_margin_is_separated() {
        let sizes = [
            Size::new(50.0, 50.0),
            Size::new(80.0, 40.0),
            Size::new(80.0, 50.0),
            Size::new(80.0, 40.0),
            Size::new(80.0, 40.0),
            Size::new(50.0, 50.0),
        ];
        let mut positions = [
            Point::new(20.0, 20.0),
            Point::new(20.0, 20.0),
            Point::new(25.0, 20.0),
            Point::new(20.0, 30.0),
            Point::new(40.0, 20.0),
            Point::new(20.0, 20.0),
        ];

        let resolution = resolve(&mut positions, &sizes, 60.0, 10.0, 20.0, 1);

        assert!(resolution.converged, "{resolution:?}");
        for i in 0..positions.len() {
            assert!(positions[i].x() >= 20.0 && positions[i].y() >= 20.0);
            for j in (i + 1)..positions.len() {
                let a = Bounds::new_from_top_left(positions[i], sizes[i]);
                let b = Bounds::new_from_top_left(positions[j], sizes[j]);
                assert!(gap_on_some_axis(a, b) >= 60.0, "{i} and {j} too close");
            }
        }
    }

    #[test]
    fn test_sweep_leaves_separated_nodes_alone() {
        let sizes = [Size::new(80.0, 40.0); 3];
        let mut positions = [
            Point::new(20.0, 20.0),
            Point::new(200.0, 20.0),
            Point::new(20.0, 200.0),
        ];
        let before = positions;

        assert_eq!(sweep(&mut positions, &sizes, 60.0, 10.0), 0);
        assert_eq!(positions, before);
    }
}
