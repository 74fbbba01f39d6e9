// Abstract Syntax Tree for the ChartPipe DSL

/// A named reduction over each key group
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    /// count(as: events) — group size
    Count { name: String },
    /// sum(field: went, as: attendance) — sum of a numeric column
    Sum { field: String, name: String },
    /// value(field: Capacity, as: capacity) — pre-aggregated pass-through
    Value { field: String, name: String },
}

impl Summary {
    pub fn name(&self) -> &str {
        match self {
            Summary::Count { name } => name,
            Summary::Sum { name, .. } => name,
            Summary::Value { name, .. } => name,
        }
    }
}

/// split(metric: capacity, quantile: 0.9) — quantile outlier split
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSpec {
    pub metric: String,
    pub quantile: f64,
}

/// One metric requested by a band geom, with an optional fixed color
#[derive(Debug, Clone, PartialEq)]
pub struct MetricArg {
    pub name: String,
    pub color: Option<String>,
}

/// Chart geometry
#[derive(Debug, Clone, PartialEq)]
pub enum Geom {
    /// Horizontal bar rows, one panel per metric
    Bars { metrics: Vec<MetricArg> },
    /// Vertical bar columns, single metric
    Columns { metrics: Vec<MetricArg> },
    /// Horizontal stem-and-dot rows, one panel per metric
    Lollipop { metrics: Vec<MetricArg> },
    /// Bubble pack sized by one metric
    Pack { metric: String, padding: Option<f64> },
}

/// Chart labels
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Labels {
    pub title: Option<String>,
}

/// Complete chart specification
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Categorical key column
    pub group_by: String,
    pub summaries: Vec<Summary>,
    pub split: Option<SplitSpec>,
    pub geom: Geom,
    pub labels: Labels,
    /// canvas() overrides, applied onto CanvasSpec defaults by the runtime
    pub canvas: Vec<(String, f64)>,
}
