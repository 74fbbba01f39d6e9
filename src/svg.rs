//! SVG emission for chart scenes. Every shape carries a `<title>` child
//! built from its source entry, which browsers surface as a hover tooltip.

use crate::ir::{AxisOrient, AxisScene, ChartScene, LayoutPrimitive, PanelScene, PrimitiveShape};

const AXIS_COLOR: &str = "#000";
const STEM_COLOR: &str = "#999";
const FONT_FAMILY: &str = "sans-serif";

/// Render a complete scene as a standalone SVG document
pub fn render_scene(scene: &ChartScene) -> String {
    let mut svg = String::new();
    let width = scene.width.max(1.0);
    let height = scene.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>");

    if let Some(title) = &scene.title {
        svg.push_str(&format!(
            "<text x=\"8\" y=\"16\" font-family=\"{FONT_FAMILY}\" font-size=\"14\" font-weight=\"bold\">{}</text>",
            escape_xml(title)
        ));
    }

    for panel in &scene.panels {
        svg.push_str(&render_panel(panel));
    }

    svg.push_str("</svg>");
    svg
}

fn render_panel(panel: &PanelScene) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<g transform=\"translate(0,{:.2})\">",
        panel.y_offset
    ));

    if let Some(title) = &panel.title {
        out.push_str(&format!(
            "<text x=\"8\" y=\"-8\" font-family=\"{FONT_FAMILY}\" font-size=\"13\" font-weight=\"bold\">{}</text>",
            escape_xml(title)
        ));
    }

    for axis in &panel.axes {
        out.push_str(&render_axis(axis));
    }
    for prim in &panel.primitives {
        out.push_str(&render_primitive(prim));
    }

    out.push_str("</g>");
    out
}

fn render_axis(axis: &AxisScene) -> String {
    let mut out = String::new();
    match axis.orient {
        AxisOrient::Top | AxisOrient::Bottom => {
            out.push_str(&format!(
                "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{AXIS_COLOR}\"/>",
                axis.start, axis.cross, axis.end, axis.cross
            ));
        }
        AxisOrient::Left => {
            out.push_str(&format!(
                "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{AXIS_COLOR}\"/>",
                axis.cross, axis.start, axis.cross, axis.end
            ));
        }
    }

    for tick in &axis.ticks {
        match axis.orient {
            AxisOrient::Top => {
                out.push_str(&format!(
                    "<line x1=\"{x:.2}\" y1=\"{:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"{AXIS_COLOR}\"/>",
                    axis.cross,
                    axis.cross - 6.0,
                    x = tick.pos
                ));
                out.push_str(&format!(
                    "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{FONT_FAMILY}\" font-size=\"10\">{}</text>",
                    tick.pos,
                    axis.cross - 9.0,
                    escape_xml(&tick.label)
                ));
            }
            AxisOrient::Bottom => {
                out.push_str(&format!(
                    "<line x1=\"{x:.2}\" y1=\"{:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"{AXIS_COLOR}\"/>",
                    axis.cross,
                    axis.cross + 6.0,
                    x = tick.pos
                ));
                out.push_str(&format!(
                    "<text transform=\"translate({:.2},{:.2}) rotate(-35)\" text-anchor=\"end\" font-family=\"{FONT_FAMILY}\" font-size=\"10\">{}</text>",
                    tick.pos,
                    axis.cross + 16.0,
                    escape_xml(&tick.label)
                ));
            }
            AxisOrient::Left => {
                out.push_str(&format!(
                    "<line x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{:.2}\" y2=\"{y:.2}\" stroke=\"{AXIS_COLOR}\"/>",
                    axis.cross - 6.0,
                    axis.cross,
                    y = tick.pos
                ));
                out.push_str(&format!(
                    "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" font-family=\"{FONT_FAMILY}\" font-size=\"10\">{}</text>",
                    axis.cross - 8.0,
                    tick.pos + 3.5,
                    escape_xml(&tick.label)
                ));
            }
        }
    }

    out
}

fn render_primitive(prim: &LayoutPrimitive) -> String {
    let tooltip = format!("<title>{}</title>", escape_xml(&tooltip_text(prim)));
    match &prim.shape {
        PrimitiveShape::Bar { x, y, width, height } => format!(
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" fill=\"{}\">{tooltip}</rect>",
            escape_xml(&prim.color)
        ),
        PrimitiveShape::Lollipop { x1, x2, y, radius } => format!(
            "<g><line x1=\"{x1:.2}\" y1=\"{y:.2}\" x2=\"{x2:.2}\" y2=\"{y:.2}\" stroke=\"{STEM_COLOR}\"/>\
             <circle cx=\"{x2:.2}\" cy=\"{y:.2}\" r=\"{radius:.2}\" fill=\"{}\"/>{tooltip}</g>",
            escape_xml(&prim.color)
        ),
        PrimitiveShape::Bubble { cx, cy, radius, label } => {
            let font_size = (radius / 3.0).clamp(8.0, 12.0);
            let mut out = format!(
                "<g><circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{radius:.2}\" fill=\"{}\" stroke=\"#333\"/>",
                escape_xml(&prim.color)
            );
            if *radius > 0.0 {
                out.push_str(&format!(
                    "<text x=\"{cx:.2}\" y=\"{cy:.2}\" dy=\"0.3em\" text-anchor=\"middle\" font-family=\"{FONT_FAMILY}\" font-size=\"{font_size:.1}\">{}</text>",
                    escape_xml(label)
                ));
            }
            out.push_str(&tooltip);
            out.push_str("</g>");
            out
        }
    }
}

/// Tooltip body: the key, then one metric per line in name order
fn tooltip_text(prim: &LayoutPrimitive) -> String {
    let mut names: Vec<&String> = prim.source.metrics.keys().collect();
    names.sort();
    let mut lines = vec![prim.source.key.clone()];
    for name in names {
        lines.push(format!("{}: {}", name, fmt_value(prim.source.metric(name))));
    }
    lines.join("\n")
}

fn fmt_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{AggregatedEntry, Tick};

    fn bar_scene() -> ChartScene {
        let mut entry = AggregatedEntry::new("Bar & Grill".to_string());
        entry.metrics.insert("events".to_string(), 12.0);
        ChartScene {
            width: 800.0,
            height: 200.0,
            title: Some("Events <per> venue".to_string()),
            panels: vec![PanelScene {
                title: None,
                y_offset: 24.0,
                width: 800.0,
                height: 176.0,
                axes: vec![AxisScene {
                    orient: AxisOrient::Top,
                    start: 150.0,
                    end: 780.0,
                    cross: 20.0,
                    ticks: vec![Tick { pos: 150.0, label: "0".to_string() }],
                }],
                primitives: vec![LayoutPrimitive {
                    shape: PrimitiveShape::Bar {
                        x: 150.0,
                        y: 30.0,
                        width: 300.0,
                        height: 20.0,
                    },
                    color: "steelblue".to_string(),
                    source: entry,
                }],
            }],
        }
    }

    #[test]
    fn test_render_scene_structure() {
        let svg = render_scene(&bar_scene());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("<rect x=\"150.00\""));
        assert!(svg.contains("fill=\"steelblue\""));
    }

    #[test]
    fn test_render_escapes_markup() {
        let svg = render_scene(&bar_scene());
        assert!(svg.contains("Events &lt;per&gt; venue"));
        assert!(svg.contains("Bar &amp; Grill"));
        assert!(!svg.contains("<per>"));
    }

    #[test]
    fn test_tooltip_carries_source_metrics() {
        let svg = render_scene(&bar_scene());
        assert!(svg.contains("<title>Bar &amp; Grill\nevents: 12</title>"));
    }

    #[test]
    fn test_render_lollipop_and_bubble() {
        let mut entry = AggregatedEntry::new("Club".to_string());
        entry.metrics.insert("capacity".to_string(), 120.0);
        let prim = |shape| LayoutPrimitive {
            shape,
            color: "#ff8c00".to_string(),
            source: entry.clone(),
        };
        let scene = ChartScene {
            width: 700.0,
            height: 700.0,
            title: None,
            panels: vec![PanelScene {
                title: None,
                y_offset: 0.0,
                width: 700.0,
                height: 700.0,
                axes: vec![],
                primitives: vec![
                    prim(PrimitiveShape::Lollipop {
                        x1: 150.0,
                        x2: 400.0,
                        y: 50.0,
                        radius: 6.0,
                    }),
                    prim(PrimitiveShape::Bubble {
                        cx: 350.0,
                        cy: 350.0,
                        radius: 60.0,
                        label: "Club".to_string(),
                    }),
                ],
            }],
        };
        let svg = render_scene(&scene);
        assert!(svg.contains("<circle cx=\"400.00\" cy=\"50.00\" r=\"6.00\""));
        assert!(svg.contains("<circle cx=\"350.00\" cy=\"350.00\" r=\"60.00\""));
        // bubble label font size is clamped to 12
        assert!(svg.contains("font-size=\"12.0\""));
    }
}
