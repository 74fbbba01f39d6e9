// Runtime executor for the ChartPipe DSL

use anyhow::{anyhow, bail, Result};

use crate::aggregate::{self, Reducer};
use crate::data::Dataset;
use crate::ir::{AggregatedEntry, PanelScene};
use crate::layout::{self, BandKind, CanvasSpec, MetricStyle, Orientation};
use crate::palette::ColorPalette;
use crate::parser::ast::{ChartSpec, Geom, MetricArg, Summary};
use crate::svg;

const DEFAULT_PACK_PADDING: f64 = 20.0;
const OUTLIER_COLOR: &str = "#d62728";

/// Render a chart specification against a dataset, producing an SVG document
pub fn render_chart(spec: &ChartSpec, data: &Dataset) -> Result<String> {
    let reducers = lower_summaries(&spec.summaries);
    let entries = aggregate::aggregate(data, &spec.group_by, &reducers)?;
    let canvas = resolve_canvas(&spec.canvas);

    let panels = match &spec.geom {
        Geom::Bars { metrics } => band_panels(
            spec,
            entries,
            metrics,
            BandKind::Bar,
            Orientation::Row,
            &canvas,
        )?,
        Geom::Columns { metrics } => band_panels(
            spec,
            entries,
            metrics,
            BandKind::Bar,
            Orientation::Column,
            &canvas,
        )?,
        Geom::Lollipop { metrics } => band_panels(
            spec,
            entries,
            metrics,
            BandKind::Lollipop,
            Orientation::Row,
            &canvas,
        )?,
        Geom::Pack { metric, padding } => {
            if spec.split.is_some() {
                bail!("split() is not supported with pack()");
            }
            check_metric_declared(spec, metric)?;
            let mut entries = entries;
            sort_descending(&mut entries, metric);
            // Stable ordinal colors keyed on the sorted entry order
            let keys: Vec<String> = entries.iter().map(|e| e.key.clone()).collect();
            let color_map = ColorPalette::category10().assign_colors(&keys);
            let colors: Vec<String> = keys
                .iter()
                .map(|k| color_map.get(k).cloned().unwrap_or_default())
                .collect();
            vec![layout::layout_pack(
                &entries,
                metric,
                padding.unwrap_or(DEFAULT_PACK_PADDING),
                canvas.width,
                &colors,
            )]
        }
    };

    let scene = layout::assemble_scene(spec.labels.title.clone(), panels);
    Ok(svg::render_scene(&scene))
}

fn lower_summaries(summaries: &[Summary]) -> Vec<Reducer> {
    summaries
        .iter()
        .map(|s| match s {
            Summary::Count { name } => Reducer::count(name),
            Summary::Sum { field, name } => Reducer::sum(field, name),
            Summary::Value { field, name } => Reducer::value(field, name),
        })
        .collect()
}

fn check_metric_declared(spec: &ChartSpec, metric: &str) -> Result<()> {
    if spec.summaries.iter().any(|s| s.name() == metric) {
        Ok(())
    } else {
        Err(anyhow!(
            "Metric '{}' is not produced by any summary; declared metrics: {}",
            metric,
            spec.summaries
                .iter()
                .map(Summary::name)
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }
}

fn resolve_canvas(overrides: &[(String, f64)]) -> CanvasSpec {
    let mut canvas = CanvasSpec::default();
    for (key, v) in overrides {
        match key.as_str() {
            "top" => canvas.top = *v,
            "right" => canvas.right = *v,
            "bottom" => canvas.bottom = *v,
            "left" => canvas.left = *v,
            "row_height" => canvas.row_height = *v,
            "width" => canvas.width = *v,
            "height" => canvas.height = *v,
            "panel_gap" => canvas.panel_gap = *v,
            "band_padding" => canvas.band_padding = *v,
            _ => {} // parser only emits recognized keys
        }
    }
    canvas
}

fn resolve_metric_styles(spec: &ChartSpec, metrics: &[MetricArg]) -> Result<Vec<MetricStyle>> {
    let palette = ColorPalette::category10();
    metrics
        .iter()
        .enumerate()
        .map(|(i, m)| {
            check_metric_declared(spec, &m.name)?;
            Ok(MetricStyle {
                name: m.name.clone(),
                color: m
                    .color
                    .clone()
                    .unwrap_or_else(|| palette.color(i).to_string()),
            })
        })
        .collect()
}

fn sort_descending(entries: &mut [AggregatedEntry], metric: &str) {
    entries.sort_by(|a, b| {
        b.metric(metric)
            .partial_cmp(&a.metric(metric))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn band_panels(
    spec: &ChartSpec,
    entries: Vec<AggregatedEntry>,
    metrics: &[MetricArg],
    kind: BandKind,
    orient: Orientation,
    canvas: &CanvasSpec,
) -> Result<Vec<PanelScene>> {
    let styles = resolve_metric_styles(spec, metrics)?;

    match &spec.split {
        None => {
            // Default order: first occurrence during aggregation
            let panel = layout::layout_band(&entries, &styles, kind, orient, canvas, None)?;
            Ok(vec![panel])
        }
        Some(split) => {
            check_metric_declared(spec, &split.metric)?;
            let partition = aggregate::partition_by_quantile(entries, &split.metric, split.quantile);

            let mut panels = vec![layout::layout_band(
                &partition.normal,
                &styles,
                kind,
                orient,
                canvas,
                None,
            )?];

            // An empty outlier subset skips the panel entirely
            if !partition.outliers.is_empty() {
                let outlier_styles: Vec<MetricStyle> = styles
                    .iter()
                    .map(|s| MetricStyle {
                        name: s.name.clone(),
                        color: OUTLIER_COLOR.to_string(),
                    })
                    .collect();
                panels.push(layout::layout_band(
                    &partition.outliers,
                    &outlier_styles,
                    kind,
                    orient,
                    canvas,
                    Some(format!(
                        "Outliers ({}th percentile+)",
                        (split.quantile * 100.0).round() as i64
                    )),
                )?);
            }
            Ok(panels)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_chart_spec;

    fn events_data() -> Dataset {
        Dataset::new(
            vec!["file".to_string(), "went".to_string()],
            vec![
                vec!["Venue A".to_string(), "5".to_string()],
                vec!["Venue A".to_string(), "3".to_string()],
                vec!["Venue B".to_string(), "10".to_string()],
            ],
        )
    }

    fn venues_data() -> Dataset {
        Dataset::new(
            vec![
                "Name".to_string(),
                "Type".to_string(),
                "Capacity".to_string(),
            ],
            vec![
                vec!["Club X".to_string(), "Club".to_string(), "10".to_string()],
                vec!["Hall Y".to_string(), "Hall".to_string(), "20".to_string()],
                vec!["Bar Z".to_string(), "Bar".to_string(), "30".to_string()],
                vec!["Cafe W".to_string(), "Cafe".to_string(), "40".to_string()],
                vec!["Arena V".to_string(), "Arena".to_string(), "1000".to_string()],
            ],
        )
    }

    fn render(dsl: &str, data: &Dataset) -> Result<String> {
        let (_, spec) = parse_chart_spec(dsl).map_err(|e| anyhow!("parse failed: {:?}", e))?;
        render_chart(&spec, data)
    }

    #[test]
    fn test_render_bars() {
        let svg = render(
            "group(by: file) | count(as: events) | sum(field: went, as: attendance) \
             | bars(metric: events, metric: attendance) | labs(title: \"Events\")",
            &events_data(),
        )
        .unwrap();
        assert!(svg.starts_with("<svg"));
        // 2 entries x 2 metrics
        assert_eq!(svg.matches("<rect x=").count(), 4);
        assert!(svg.contains("Events"));
    }

    #[test]
    fn test_render_columns() {
        let svg = render(
            "group(by: file) | count(as: events) | columns(metric: events)",
            &events_data(),
        )
        .unwrap();
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<rect x=").count(), 2);
    }

    #[test]
    fn test_render_capacity_lollipop_with_outliers() {
        let svg = render(
            "group(by: Name) | value(field: Capacity, as: capacity) \
             | split(metric: capacity, quantile: 0.9) | lollipop(metric: capacity)",
            &venues_data(),
        )
        .unwrap();
        assert!(svg.contains("Outliers (90th percentile+)"));
        // 4 normal + 1 outlier stems
        assert_eq!(svg.matches("<circle").count(), 5);
        assert!(svg.contains(OUTLIER_COLOR));
    }

    #[test]
    fn test_render_split_skips_empty_outlier_panel() {
        let data = Dataset::new(
            vec!["Name".to_string(), "Capacity".to_string()],
            vec![
                vec!["A".to_string(), "50".to_string()],
                vec!["B".to_string(), "50".to_string()],
            ],
        );
        let svg = render(
            "group(by: Name) | value(field: Capacity, as: capacity) \
             | split(metric: capacity) | lollipop(metric: capacity)",
            &data,
        )
        .unwrap();
        assert!(!svg.contains("Outliers"));
    }

    #[test]
    fn test_render_pack() {
        let svg = render(
            "group(by: Type) | count(as: count) | pack(metric: count) | canvas(width: 700)",
            &venues_data(),
        )
        .unwrap();
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<g><circle").count(), 5);
    }

    #[test]
    fn test_render_unknown_metric_fails() {
        let err = render(
            "group(by: file) | count(as: events) | bars(metric: attendance)",
            &events_data(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("attendance"));
    }

    #[test]
    fn test_render_unknown_key_column_fails() {
        assert!(render(
            "group(by: venue) | count(as: events) | bars(metric: events)",
            &events_data(),
        )
        .is_err());
    }

    #[test]
    fn test_render_split_with_pack_fails() {
        assert!(render(
            "group(by: Type) | count(as: count) | split(metric: count) | pack(metric: count)",
            &venues_data(),
        )
        .is_err());
    }

    #[test]
    fn test_render_columns_multiple_metrics_fails() {
        assert!(render(
            "group(by: file) | count(as: a) | sum(field: went, as: b) \
             | columns(metric: a, metric: b)",
            &events_data(),
        )
        .is_err());
    }

    #[test]
    fn test_canvas_overrides_apply() {
        let canvas = resolve_canvas(&[("width".to_string(), 700.0), ("left".to_string(), 60.0)]);
        assert_eq!(canvas.width, 700.0);
        assert_eq!(canvas.left, 60.0);
        assert_eq!(canvas.top, 20.0);
    }
}
