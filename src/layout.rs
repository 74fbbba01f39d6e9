use anyhow::{bail, Result};
use serde::Deserialize;

use crate::ir::{
    AxisOrient, AxisScene, ChartScene, LayoutPrimitive, PanelScene, PrimitiveShape, Tick,
};
use crate::ir::AggregatedEntry;
use crate::pack;
use crate::scale::{BandScale, LinearScale};

/// Margins and sizing for a chart. Each geometry reads the fields it needs:
/// band charts in row orientation grow with `row_height` per entry, column
/// charts use `row_height` as the per-category slot width and `height` as
/// the fixed canvas height, packs use a `width` x `width` square.
#[derive(Debug, Clone, Deserialize)]
pub struct CanvasSpec {
    #[serde(default = "default_top")]
    pub top: f64,
    #[serde(default = "default_right")]
    pub right: f64,
    #[serde(default = "default_bottom")]
    pub bottom: f64,
    #[serde(default = "default_left")]
    pub left: f64,
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_panel_gap")]
    pub panel_gap: f64,
    #[serde(default = "default_band_padding")]
    pub band_padding: f64,
}

fn default_top() -> f64 { 20.0 }
fn default_right() -> f64 { 20.0 }
fn default_bottom() -> f64 { 40.0 }
fn default_left() -> f64 { 150.0 }
fn default_row_height() -> f64 { 25.0 }
fn default_width() -> f64 { 800.0 }
fn default_height() -> f64 { 500.0 }
fn default_panel_gap() -> f64 { 30.0 }
fn default_band_padding() -> f64 { 0.1 }

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            top: default_top(),
            right: default_right(),
            bottom: default_bottom(),
            left: default_left(),
            row_height: default_row_height(),
            width: default_width(),
            height: default_height(),
            panel_gap: default_panel_gap(),
            band_padding: default_band_padding(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BandKind {
    Bar,
    Lollipop,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Orientation {
    /// Horizontal bars/stems, one row per entry, categorical axis on the left
    Row,
    /// Vertical bars, one column per entry, categorical axis on the bottom
    Column,
}

/// A metric column to lay out, with its resolved color.
#[derive(Debug, Clone)]
pub struct MetricStyle {
    pub name: String,
    pub color: String,
}

const LOLLIPOP_RADIUS: f64 = 6.0;

fn metric_max(entries: &[AggregatedEntry], metric: &str) -> f64 {
    entries
        .iter()
        .map(|e| e.metric(metric))
        .fold(0.0, f64::max)
}

fn fmt_tick(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// Lay out a band chart: a categorical axis crossed with one linear axis
/// per metric. With several metrics, panels repeat side by side offset by
/// panel width + gap, all sharing the single categorical axis. An entry
/// with a metric value of 0 still occupies its band slot with a
/// zero-length shape.
pub fn layout_band(
    entries: &[AggregatedEntry],
    metrics: &[MetricStyle],
    kind: BandKind,
    orient: Orientation,
    canvas: &CanvasSpec,
    title: Option<String>,
) -> Result<PanelScene> {
    if metrics.is_empty() {
        bail!("Band layout requires at least one metric");
    }
    match orient {
        Orientation::Row => Ok(layout_band_rows(entries, metrics, kind, canvas, title)),
        Orientation::Column => {
            if metrics.len() > 1 {
                bail!("Column charts support a single metric");
            }
            if kind == BandKind::Lollipop {
                bail!("Lollipop charts are row-oriented");
            }
            Ok(layout_band_columns(entries, &metrics[0], canvas, title))
        }
    }
}

fn layout_band_rows(
    entries: &[AggregatedEntry],
    metrics: &[MetricStyle],
    kind: BandKind,
    canvas: &CanvasSpec,
    title: Option<String>,
) -> PanelScene {
    let n = entries.len();
    let height = canvas.top + canvas.bottom + n as f64 * canvas.row_height;
    let band = BandScale::new(n, (canvas.top, height - canvas.bottom), canvas.band_padding);

    let panel_width = canvas.width - canvas.left - canvas.right;
    let total_width = canvas.left
        + canvas.right
        + metrics.len() as f64 * panel_width
        + (metrics.len() as f64 - 1.0) * canvas.panel_gap;

    let mut axes = Vec::new();
    let mut primitives = Vec::new();

    // Shared categorical axis on the left
    axes.push(AxisScene {
        orient: AxisOrient::Left,
        start: canvas.top,
        end: height - canvas.bottom,
        cross: canvas.left,
        ticks: entries
            .iter()
            .enumerate()
            .map(|(i, e)| Tick {
                pos: band.center(i),
                label: e.key.clone(),
            })
            .collect(),
    });

    for (m_idx, metric) in metrics.iter().enumerate() {
        let x_start = canvas.left + m_idx as f64 * (panel_width + canvas.panel_gap);
        let linear = LinearScale::new(
            (0.0, metric_max(entries, &metric.name)),
            (x_start, x_start + panel_width),
        )
        .nice();

        axes.push(AxisScene {
            orient: AxisOrient::Top,
            start: x_start,
            end: x_start + panel_width,
            cross: canvas.top,
            ticks: linear
                .ticks(6)
                .into_iter()
                .map(|t| Tick {
                    pos: linear.scale(t),
                    label: fmt_tick(t),
                })
                .collect(),
        });

        for (i, entry) in entries.iter().enumerate() {
            let v = entry.metric(&metric.name);
            let shape = match kind {
                BandKind::Bar => PrimitiveShape::Bar {
                    x: x_start,
                    y: band.slot(i),
                    width: linear.scale(v) - x_start,
                    height: band.bandwidth(),
                },
                BandKind::Lollipop => PrimitiveShape::Lollipop {
                    x1: x_start,
                    x2: linear.scale(v),
                    y: band.center(i),
                    radius: LOLLIPOP_RADIUS,
                },
            };
            primitives.push(LayoutPrimitive {
                shape,
                color: metric.color.clone(),
                source: entry.clone(),
            });
        }
    }

    PanelScene {
        title,
        y_offset: 0.0,
        width: total_width,
        height,
        axes,
        primitives,
    }
}

fn layout_band_columns(
    entries: &[AggregatedEntry],
    metric: &MetricStyle,
    canvas: &CanvasSpec,
    title: Option<String>,
) -> PanelScene {
    let n = entries.len();
    let width = canvas.left + canvas.right + n as f64 * canvas.row_height;
    let height = canvas.height;

    let band = BandScale::new(n, (canvas.left, width - canvas.right), canvas.band_padding);
    let linear = LinearScale::new(
        (0.0, metric_max(entries, &metric.name)),
        (height - canvas.bottom, canvas.top),
    )
    .nice();
    let baseline = linear.scale(0.0);

    let axes = vec![
        AxisScene {
            orient: AxisOrient::Bottom,
            start: canvas.left,
            end: width - canvas.right,
            cross: height - canvas.bottom,
            ticks: entries
                .iter()
                .enumerate()
                .map(|(i, e)| Tick {
                    pos: band.center(i),
                    label: e.key.clone(),
                })
                .collect(),
        },
        AxisScene {
            orient: AxisOrient::Left,
            start: canvas.top,
            end: height - canvas.bottom,
            cross: canvas.left,
            ticks: linear
                .ticks(6)
                .into_iter()
                .map(|t| Tick {
                    pos: linear.scale(t),
                    label: fmt_tick(t),
                })
                .collect(),
        },
    ];

    let primitives = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let v = entry.metric(&metric.name);
            let top = linear.scale(v);
            LayoutPrimitive {
                shape: PrimitiveShape::Bar {
                    x: band.slot(i),
                    y: top,
                    width: band.bandwidth(),
                    height: baseline - top,
                },
                color: metric.color.clone(),
                source: entry.clone(),
            }
        })
        .collect();

    PanelScene {
        title,
        y_offset: 0.0,
        width,
        height,
        axes,
        primitives,
    }
}

/// Lay out a bubble pack: one circle per entry, area proportional to the
/// metric, deterministic for a fixed entry order.
pub fn layout_pack(
    entries: &[AggregatedEntry],
    metric: &str,
    padding: f64,
    size: f64,
    colors: &[String],
) -> PanelScene {
    let values: Vec<f64> = entries.iter().map(|e| e.metric(metric)).collect();
    let circles = pack::pack_fit(&values, size, size, padding);

    let primitives = entries
        .iter()
        .zip(circles)
        .enumerate()
        .map(|(i, (entry, c))| LayoutPrimitive {
            shape: PrimitiveShape::Bubble {
                cx: c.x,
                cy: c.y,
                radius: c.r,
                label: entry.key.clone(),
            },
            color: colors
                .get(i)
                .cloned()
                .unwrap_or_else(|| "#1f77b4".to_string()),
            source: entry.clone(),
        })
        .collect();

    PanelScene {
        title: None,
        y_offset: 0.0,
        width: size,
        height: size,
        axes: Vec::new(),
        primitives,
    }
}

const PANEL_TITLE_GAP: f64 = 24.0;

/// Stack panels vertically into a single scene, leaving room above each
/// titled panel for its heading.
pub fn assemble_scene(title: Option<String>, mut panels: Vec<PanelScene>) -> ChartScene {
    let mut y = if title.is_some() { PANEL_TITLE_GAP } else { 0.0 };
    let mut width: f64 = 0.0;
    for panel in &mut panels {
        if panel.title.is_some() {
            y += PANEL_TITLE_GAP;
        }
        panel.y_offset = y;
        y += panel.height;
        width = width.max(panel.width);
    }
    ChartScene {
        width,
        height: y,
        title,
        panels,
    }
}
