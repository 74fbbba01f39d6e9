use std::collections::HashMap;

// =============================================================================
// Phase 1: Aggregation
// =============================================================================

/// One row of the aggregated result: a categorical key plus the reduced
/// metric values for that key's group. One entry per distinct key.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedEntry {
    pub key: String,
    pub metrics: HashMap<String, f64>,
}

impl AggregatedEntry {
    pub fn new(key: String) -> Self {
        Self {
            key,
            metrics: HashMap::new(),
        }
    }

    /// Metric value by name; unknown metrics read as 0
    pub fn metric(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(0.0)
    }
}

/// Result of a quantile split: `outliers` holds entries strictly above the
/// threshold, `normal` the rest. Both halves are sorted by the split metric,
/// descending.
#[derive(Debug, Clone)]
pub struct Partition {
    pub normal: Vec<AggregatedEntry>,
    pub outliers: Vec<AggregatedEntry>,
    pub threshold: f64,
}

// =============================================================================
// Phase 2: Layout
// =============================================================================

/// Pixel-space geometry of a single drawable shape.
#[derive(Debug, Clone)]
pub enum PrimitiveShape {
    /// Axis-aligned rectangle (x, y is the top-left corner)
    Bar { x: f64, y: f64, width: f64, height: f64 },
    /// Horizontal stem from x1 to x2 at row center y, with a dot at the tip
    Lollipop { x1: f64, x2: f64, y: f64, radius: f64 },
    /// Packed circle with a centered label
    Bubble { cx: f64, cy: f64, radius: f64, label: String },
}

/// A positioned, colored shape carrying the entry it was derived from.
/// Built fresh on every layout call and never mutated afterwards; the
/// source entry feeds the hover tooltip.
#[derive(Debug, Clone)]
pub struct LayoutPrimitive {
    pub shape: PrimitiveShape,
    pub color: String,
    pub source: AggregatedEntry,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisOrient {
    Top,
    Bottom,
    Left,
}

#[derive(Debug, Clone)]
pub struct Tick {
    pub pos: f64,
    pub label: String,
}

/// An axis line with tick marks, in panel-local coordinates. The line runs
/// from `start` to `end` along the axis direction at offset `cross` on the
/// perpendicular one.
#[derive(Debug, Clone)]
pub struct AxisScene {
    pub orient: AxisOrient,
    pub start: f64,
    pub end: f64,
    pub cross: f64,
    pub ticks: Vec<Tick>,
}

/// One chart panel: its own coordinate space, axes and shapes. Panels are
/// stacked vertically in the output document at `y_offset`.
#[derive(Debug, Clone)]
pub struct PanelScene {
    pub title: Option<String>,
    pub y_offset: f64,
    pub width: f64,
    pub height: f64,
    pub axes: Vec<AxisScene>,
    pub primitives: Vec<LayoutPrimitive>,
}

/// The complete renderable chart.
#[derive(Debug, Clone)]
pub struct ChartScene {
    pub width: f64,
    pub height: f64,
    pub title: Option<String>,
    pub panels: Vec<PanelScene>,
}
