//! Geometric primitives for the diagram canvas.
//!
//! All values are expressed in *logical* canvas units: the coordinates a
//! node keeps no matter how the canvas is zoomed or panned.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate (or a displacement) on the canvas
//! - [`Size`] - Width and height of a node
//! - [`Bounds`] - An axis-aligned box defined by minimum and maximum coordinates
//! - [`Insets`] - Padding values for the four sides of a box
//!
//! # Coordinate System
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! The origin is the top-left corner of the canvas and Y grows downward,
//! matching screen coordinates.

/// A 2D point on the canvas.
///
/// Points double as displacement vectors: forces, drag deltas and pan
/// offsets are all carried as `Point`s.
///
/// # Examples
///
/// ```
/// # use umlsketch_core::geometry::Point;
/// let a = Point::new(10.0, 20.0);
/// let b = Point::new(13.0, 24.0);
///
/// assert_eq!(b.sub_point(a), Point::new(3.0, 4.0));
/// assert_eq!(a.distance(b), 5.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns a copy of this point with a different x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Returns a copy of this point with a different y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Checks if both coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Length of the point taken as a vector from the origin
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        self.sub_point(other).hypot()
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns the vector scaled down to `max_len` if it is longer than that.
    ///
    /// # Examples
    ///
    /// ```
    /// # use umlsketch_core::geometry::Point;
    /// let step = Point::new(30.0, 40.0).clamp_length(10.0);
    /// assert_eq!(step, Point::new(6.0, 8.0));
    ///
    /// let short = Point::new(1.0, 1.0);
    /// assert_eq!(short.clamp_length(10.0), short);
    /// ```
    pub fn clamp_length(self, max_len: f32) -> Self {
        let len = self.hypot();
        if len > max_len && len > 0.0 {
            self.scale(max_len / len)
        } else {
            self
        }
    }

    /// Clamps both coordinates to be at least `min`
    pub fn max_each(self, min: f32) -> Self {
        Self {
            x: self.x.max(min),
            y: self.y.max(min),
        }
    }

    /// Rounds both coordinates to the nearest multiple of `grid`.
    ///
    /// A non-positive grid leaves the point unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use umlsketch_core::geometry::Point;
    /// let snapped = Point::new(29.0, 31.0).snap_to_grid(20.0);
    /// assert_eq!(snapped, Point::new(20.0, 40.0));
    /// ```
    pub fn snap_to_grid(self, grid: f32) -> Self {
        if grid <= 0.0 {
            return self;
        }
        Self {
            x: (self.x / grid).round() * grid,
            y: (self.y / grid).round() * grid,
        }
    }
}

/// Width and height of an element
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a size with the maximum width and height of both sizes
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Half of the diagonal length, i.e. the radius of the circumscribed circle
    pub fn half_diagonal(self) -> f32 {
        self.width.hypot(self.height) / 2.0
    }

    /// Returns true if both dimensions are strictly positive
    pub fn is_positive(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Returns the size grown by the given insets
    pub fn add_padding(self, insets: Insets) -> Self {
        Self {
            width: self.width + insets.horizontal_sum(),
            height: self.height + insets.vertical_sum(),
        }
    }
}

/// An axis-aligned rectangle given by its minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds centered on `center`
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates bounds whose top-left corner is `top_left`.
    ///
    /// This is how nodes are stored: their position is the top-left corner.
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the top-left corner
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Smallest bounds containing both `self` and `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use umlsketch_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
    /// let b = Bounds::new_from_top_left(Point::new(10.0, 40.0), Size::new(120.0, 80.0));
    ///
    /// let both = a.merge(&b);
    /// assert_eq!(both.width(), 130.0);
    /// assert_eq!(both.height(), 120.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by `offset`
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Grows the bounds outward by the given insets
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left(),
            min_y: self.min_y - insets.top(),
            max_x: self.max_x + insets.right(),
            max_y: self.max_y + insets.bottom(),
        }
    }

    /// Returns true if `point` lies inside or on the edge of the bounds
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Penetration depth of two boxes along each axis.
    ///
    /// Positive components mean the projections overlap on that axis by that
    /// amount; zero or negative means they are separated (or just touching).
    ///
    /// # Examples
    ///
    /// ```
    /// # use umlsketch_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
    /// let b = Bounds::new_from_top_left(Point::new(8.0, 5.0), Size::new(10.0, 10.0));
    ///
    /// let depth = a.overlap_depth(&b);
    /// assert_eq!(depth.x(), 2.0);
    /// assert_eq!(depth.y(), 5.0);
    /// ```
    pub fn overlap_depth(&self, other: &Self) -> Point {
        let x = self.max_x.min(other.max_x) - self.min_x.max(other.min_x);
        let y = self.max_y.min(other.max_y) - self.min_y.max(other.min_y);
        Point::new(x, y)
    }

    /// Returns true if the interiors of the two boxes intersect.
    ///
    /// Boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        let depth = self.overlap_depth(other);
        depth.x > 0.0 && depth.y > 0.0
    }
}

/// Padding around an element, with a value per side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn left(self) -> f32 {
        self.left
    }

    /// Returns the sum of left and right insets
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Returns the sum of top and bottom insets
    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let p1 = Point::new(1.0, 2.0);
        let p2 = Point::new(3.0, 4.0);

        assert_eq!(p1.add_point(p2), Point::new(4.0, 6.0));
        assert_eq!(p2.sub_point(p1), Point::new(2.0, 2.0));
        assert_eq!(p1.scale(2.5), Point::new(2.5, 5.0));
    }

    #[test]
    fn test_point_distance() {
        assert_eq!(Point::new(3.0, 4.0).hypot(), 5.0);
        assert_eq!(Point::default().hypot(), 0.0);
        assert_eq!(Point::new(1.0, 1.0).distance(Point::new(4.0, 5.0)), 5.0);
    }

    #[test]
    fn test_point_clamp_length_keeps_direction() {
        let clamped = Point::new(-60.0, 80.0).clamp_length(50.0);
        assert_eq!(clamped, Point::new(-30.0, 40.0));

        // Zero vectors stay zero
        assert!(Point::default().clamp_length(1.0).is_zero());
    }

    #[test]
    fn test_point_max_each() {
        let clamped = Point::new(-5.0, 30.0).max_each(20.0);
        assert_eq!(clamped, Point::new(20.0, 30.0));
    }

    #[test]
    fn test_point_snap_to_grid() {
        assert_eq!(
            Point::new(9.9, 10.1).snap_to_grid(20.0),
            Point::new(0.0, 20.0)
        );
        assert_eq!(
            Point::new(-11.0, 0.0).snap_to_grid(10.0),
            Point::new(-10.0, 0.0)
        );
        assert_eq!(
            Point::new(3.3, 4.4).snap_to_grid(0.0),
            Point::new(3.3, 4.4)
        );
    }

    #[test]
    fn test_size_half_diagonal() {
        let size = Size::new(60.0, 80.0);
        assert_eq!(size.half_diagonal(), 50.0);
    }

    #[test]
    fn test_size_is_positive() {
        assert!(Size::new(1.0, 1.0).is_positive());
        assert!(!Size::new(0.0, 1.0).is_positive());
        assert!(!Size::new(1.0, -1.0).is_positive());
    }

    #[test]
    fn test_size_add_padding() {
        let padded = Size::new(10.0, 20.0).add_padding(Insets::uniform(5.0));
        assert_eq!(padded, Size::new(20.0, 30.0));
    }

    #[test]
    fn test_bounds_new_from_center() {
        let center = Point::new(50.0, 60.0);
        let bounds = Bounds::new_from_center(center, Size::new(20.0, 30.0));

        assert_eq!(bounds.min_x(), 40.0);
        assert_eq!(bounds.min_y(), 45.0);
        assert_eq!(bounds.max_x(), 60.0);
        assert_eq!(bounds.max_y(), 75.0);
        assert_eq!(bounds.center(), center);
    }

    #[test]
    fn test_bounds_new_from_top_left() {
        let top_left = Point::new(10.0, 20.0);
        let bounds = Bounds::new_from_top_left(top_left, Size::new(30.0, 40.0));

        assert_eq!(bounds.max_x(), 40.0);
        assert_eq!(bounds.max_y(), 60.0);
        assert_eq!(bounds.min_point(), top_left);
        assert_eq!(bounds.to_size(), Size::new(30.0, 40.0));
        assert_eq!(bounds.center(), Point::new(25.0, 40.0));
    }

    #[test]
    fn test_bounds_add_padding() {
        let bounds = Bounds::new_from_top_left(Point::new(2.0, 3.0), Size::new(4.0, 5.0));
        let padded = bounds.add_padding(Insets::new(1.0, 2.0, 3.0, 4.0));

        assert_eq!(padded.min_x(), -2.0); // 2 - 4 (left)
        assert_eq!(padded.min_y(), 2.0); // 3 - 1 (top)
        assert_eq!(padded.max_x(), 8.0); // 6 + 2 (right)
        assert_eq!(padded.max_y(), 11.0); // 8 + 3 (bottom)
    }

    #[test]
    fn test_bounds_translate() {
        let bounds = Bounds::new_from_top_left(Point::new(1.0, 2.0), Size::new(4.0, 4.0));
        let moved = bounds.translate(Point::new(3.0, -1.0));

        assert_eq!(moved.min_point(), Point::new(4.0, 1.0));
        assert_eq!(moved.to_size(), bounds.to_size());
    }

    #[test]
    fn test_bounds_contains_point() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));

        assert!(bounds.contains_point(Point::new(5.0, 5.0)));
        assert!(bounds.contains_point(Point::new(10.0, 0.0)));
        assert!(!bounds.contains_point(Point::new(10.5, 5.0)));
    }

    #[test]
    fn test_bounds_overlap() {
        let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let touching = Bounds::new_from_top_left(Point::new(10.0, 0.0), Size::new(10.0, 10.0));
        let crossing = Bounds::new_from_top_left(Point::new(5.0, 9.0), Size::new(10.0, 10.0));
        let apart = Bounds::new_from_top_left(Point::new(50.0, 50.0), Size::new(10.0, 10.0));

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&crossing));
        assert!(!a.overlaps(&apart));

        let depth = a.overlap_depth(&crossing);
        assert_eq!(depth, Point::new(5.0, 1.0));
    }

    #[test]
    fn test_insets_sums() {
        let insets = Insets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(insets.horizontal_sum(), 6.0);
        assert_eq!(insets.vertical_sum(), 4.0);
        assert_eq!(Insets::uniform(5.0), Insets::new(5.0, 5.0, 5.0, 5.0));
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    /// Overlap is symmetric: a overlaps b exactly when b overlaps a.
    fn check_overlap_is_symmetric(a: Bounds, b: Bounds) -> Result<(), TestCaseError> {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        let d1 = a.overlap_depth(&b);
        let d2 = b.overlap_depth(&a);
        prop_assert!(approx_eq!(f32, d1.x(), d2.x()));
        prop_assert!(approx_eq!(f32, d1.y(), d2.y()));
        Ok(())
    }

    /// Merged bounds contain the centers of both inputs.
    fn check_merge_contains_centers(a: Bounds, b: Bounds) -> Result<(), TestCaseError> {
        let merged = a.merge(&b);
        prop_assert!(merged.contains_point(a.center()));
        prop_assert!(merged.contains_point(b.center()));
        Ok(())
    }

    /// A clamped vector never exceeds the limit and never flips direction.
    fn check_clamp_length(p: Point, limit: f32) -> Result<(), TestCaseError> {
        let clamped = p.clamp_length(limit);
        prop_assert!(clamped.hypot() <= limit + 0.01);
        prop_assert!(clamped.x() * p.x() >= 0.0);
        prop_assert!(clamped.y() * p.y() >= 0.0);
        Ok(())
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in bounds_strategy(), b in bounds_strategy()) {
            check_overlap_is_symmetric(a, b)?;
        }

        #[test]
        fn merge_contains_centers(a in bounds_strategy(), b in bounds_strategy()) {
            check_merge_contains_centers(a, b)?;
        }

        #[test]
        fn clamp_length_bounded(p in point_strategy(), limit in 0.5f32..100.0) {
            check_clamp_length(p, limit)?;
        }
    }
}
