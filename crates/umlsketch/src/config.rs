//! Configuration types for the editor and the layout engine.
//!
//! All types implement [`serde::Deserialize`] with per-field defaults, so a
//! configuration file only needs to mention the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration grouping every section.
//! - [`LayoutConfig`] - Tuning of the layered + force-directed auto-layout.
//! - [`ViewConfig`] - Zoom limits and zoom step of the canvas view.
//! - [`GridConfig`] - Grid size and snapping behaviour.
//! - [`HistoryConfig`] - Undo history length.
//!
//! # Example
//!
//! ```
//! # use umlsketch::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().iterations(), 150);
//! assert!(config.validate().is_ok());
//! ```

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Auto-layout section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Canvas view section.
    #[serde(default)]
    view: ViewConfig,

    /// Grid section.
    #[serde(default)]
    grid: GridConfig,

    /// Undo history section.
    #[serde(default)]
    history: HistoryConfig,
}

impl AppConfig {
    /// Creates a configuration from its sections.
    pub fn new(
        layout: LayoutConfig,
        view: ViewConfig,
        grid: GridConfig,
        history: HistoryConfig,
    ) -> Self {
        Self {
            layout,
            view,
            grid,
            history,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    pub fn history(&self) -> &HistoryConfig {
        &self.history
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting found.
    pub fn validate(&self) -> Result<(), String> {
        self.layout.validate()?;
        self.view.validate()?;
        self.grid.validate()?;
        self.history.validate()
    }
}

/// Tuning of the auto-layout.
///
/// Distances are in logical canvas units.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Gap kept between stacked nodes and around every node after layout.
    min_node_spacing: f32,
    /// Horizontal gap between layers, leaving room for arrows.
    arrow_space: f32,
    /// Number of force refinement iterations.
    iterations: usize,
    repulsion_strength: f32,
    attraction_strength: f32,
    damping: f32,
    cooling_factor: f32,
    /// Extra push applied to pairs whose boxes overlap during refinement.
    overlap_impulse: f32,
    /// Largest distance a node may travel in one refinement iteration.
    max_step: f32,
    /// Distance kept from the canvas origin.
    margin: f32,
    /// Cap on overlap resolution passes.
    overlap_passes: usize,
    /// Extra distance added on each side when pushing an overlapping pair apart.
    overlap_push: f32,
    /// Seed for tie-breaking randomness; equal seeds give equal layouts.
    seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_node_spacing: 40.0,
            arrow_space: 60.0,
            iterations: 150,
            repulsion_strength: 5000.0,
            attraction_strength: 0.05,
            damping: 0.85,
            cooling_factor: 0.98,
            overlap_impulse: 20.0,
            max_step: 50.0,
            margin: 20.0,
            overlap_passes: 10,
            overlap_push: 10.0,
            seed: 0,
        }
    }
}

impl LayoutConfig {
    pub fn min_node_spacing(&self) -> f32 {
        self.min_node_spacing
    }

    pub fn arrow_space(&self) -> f32 {
        self.arrow_space
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn repulsion_strength(&self) -> f32 {
        self.repulsion_strength
    }

    pub fn attraction_strength(&self) -> f32 {
        self.attraction_strength
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn cooling_factor(&self) -> f32 {
        self.cooling_factor
    }

    pub fn overlap_impulse(&self) -> f32 {
        self.overlap_impulse
    }

    pub fn max_step(&self) -> f32 {
        self.max_step
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn overlap_passes(&self) -> usize {
        self.overlap_passes
    }

    pub fn overlap_push(&self) -> f32 {
        self.overlap_push
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Set the number of force refinement iterations
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the seed used for tie-breaking
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the minimum gap between nodes
    pub fn with_min_node_spacing(mut self, spacing: f32) -> Self {
        self.min_node_spacing = spacing;
        self
    }

    fn validate(&self) -> Result<(), String> {
        let non_negative = [
            ("layout.min_node_spacing", self.min_node_spacing),
            ("layout.arrow_space", self.arrow_space),
            ("layout.repulsion_strength", self.repulsion_strength),
            ("layout.attraction_strength", self.attraction_strength),
            ("layout.overlap_impulse", self.overlap_impulse),
            ("layout.margin", self.margin),
            ("layout.overlap_push", self.overlap_push),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(format!("{name} must be non-negative, got {value}"));
            }
        }
        if !(self.max_step > 0.0) {
            return Err(format!(
                "layout.max_step must be positive, got {}",
                self.max_step
            ));
        }
        for (name, value) in [
            ("layout.damping", self.damping),
            ("layout.cooling_factor", self.cooling_factor),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(format!("{name} must be in (0, 1], got {value}"));
            }
        }
        Ok(())
    }
}

/// Zoom behaviour of the canvas view.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    min_zoom: f32,
    max_zoom: f32,
    /// Zoom change applied by the zoom in / zoom out buttons.
    zoom_step: f32,
    /// Padding added around the content by fit-to-content.
    fit_padding: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.25,
            max_zoom: 3.0,
            zoom_step: 0.1,
            fit_padding: 40.0,
        }
    }
}

impl ViewConfig {
    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    pub fn zoom_step(&self) -> f32 {
        self.zoom_step
    }

    pub fn fit_padding(&self) -> f32 {
        self.fit_padding
    }

    fn validate(&self) -> Result<(), String> {
        if !(self.min_zoom > 0.0) {
            return Err(format!(
                "view.min_zoom must be positive, got {}",
                self.min_zoom
            ));
        }
        if !(self.max_zoom >= self.min_zoom) {
            return Err(format!(
                "view.max_zoom ({}) must not be below view.min_zoom ({})",
                self.max_zoom, self.min_zoom
            ));
        }
        if !(self.zoom_step > 0.0) {
            return Err(format!(
                "view.zoom_step must be positive, got {}",
                self.zoom_step
            ));
        }
        if !(self.fit_padding >= 0.0) {
            return Err(format!(
                "view.fit_padding must be non-negative, got {}",
                self.fit_padding
            ));
        }
        Ok(())
    }
}

/// Grid used by snapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    size: f32,
    /// Snap a node to the grid when a drag ends.
    snap_on_drop: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 20.0,
            snap_on_drop: true,
        }
    }
}

impl GridConfig {
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn snap_on_drop(&self) -> bool {
        self.snap_on_drop
    }

    fn validate(&self) -> Result<(), String> {
        if !(self.size > 0.0) {
            return Err(format!("grid.size must be positive, got {}", self.size));
        }
        Ok(())
    }
}

/// Undo history.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo steps kept.
    limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { limit: 50 }
    }
}

impl HistoryConfig {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    fn validate(&self) -> Result<(), String> {
        if self.limit == 0 {
            return Err("history.limit must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [layout]
            iterations = 40
            seed = 7

            [view]
            max_zoom = 4.0
            "#,
        )
        .unwrap();

        assert_eq!(config.layout().iterations(), 40);
        assert_eq!(config.layout().seed(), 7);
        assert_eq!(config.layout().arrow_space(), 60.0);
        assert_eq!(config.view().max_zoom(), 4.0);
        assert_eq!(config.view().min_zoom(), 0.25);
        assert_eq!(config.grid().size(), 20.0);
        assert_eq!(config.history().limit(), 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.layout().min_node_spacing(), 40.0);
        assert!(config.grid().snap_on_drop());
    }

    #[test]
    fn test_inverted_zoom_limits_rejected() {
        let config: AppConfig = toml::from_str(
            r#"
            [view]
            min_zoom = 2.0
            max_zoom = 1.0
            "#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.contains("view.max_zoom"), "{err}");
    }

    #[test]
    fn test_bad_damping_rejected() {
        let config: AppConfig = toml::from_str("[layout]\ndamping = 1.5\n").unwrap();
        assert!(config.validate().unwrap_err().contains("layout.damping"));
    }

    #[test]
    fn test_zero_grid_rejected() {
        let config: AppConfig = toml::from_str("[grid]\nsize = 0.0\n").unwrap();
        assert!(config.validate().unwrap_err().contains("grid.size"));
    }

    #[test]
    fn test_zero_history_rejected() {
        let config = AppConfig::new(
            LayoutConfig::default(),
            ViewConfig::default(),
            GridConfig::default(),
            HistoryConfig::new(0),
        );
        assert!(config.validate().is_err());
    }
}
