use crate::graph::{Graph, Node};
use crate::layout::{Layout, LayoutNode};
use crate::measure::TextMetrics;
use std::collections::HashMap;
use std::fmt::Write;

pub struct SvgRenderer {
    metrics: TextMetrics,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            metrics: TextMetrics::default(),
        }
    }
}

impl SvgRenderer {
    /// Serialize one laid-out graph as an SVG document. Each node becomes a
    /// record shape (header + one row per field); each edge a directed
    /// arrow. Parallel edges are drawn individually.
    pub fn render(&self, graph: &Graph, layout: &Layout) -> String {
        let mut svg = String::new();

        writeln!(
            &mut svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            layout.width, layout.height, layout.width, layout.height
        )
        .unwrap();

        writeln!(
            &mut svg,
            r##"<defs>
<marker id="arrow" markerWidth="10" markerHeight="7" refX="9" refY="3.5" orient="auto">
<polygon points="0 0, 10 3.5, 0 7" fill="#666" />
</marker>
</defs>"##
        )
        .unwrap();

        writeln!(
            &mut svg,
            r#"<style>
  .entity-bg {{ fill: #fff; }}
  .entity-header {{ fill: #e0e0e0; }}
  .entity-border {{ fill: none; stroke: #333; stroke-width: 1.5; }}
  .entity-name {{ font-family: monospace; font-size: 14px; font-weight: bold; }}
  .field-text {{ font-family: monospace; font-size: 12px; }}
  .pk {{ font-weight: bold; }}
  .edge {{ stroke: #666; stroke-width: 1.5; fill: none; }}
</style>"#
        )
        .unwrap();

        let node_map: HashMap<&str, &Node> =
            graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        // Edges first so nodes paint over their endpoints.
        for edge in &layout.edges {
            self.render_edge(&mut svg, &edge.waypoints);
        }

        for node in &layout.nodes {
            if let Some(graph_node) = node_map.get(node.id.as_str()) {
                self.render_node(&mut svg, node, graph_node);
            }
        }

        writeln!(&mut svg, "</svg>").unwrap();
        svg
    }

    fn render_node(&self, svg: &mut String, layout: &LayoutNode, node: &Node) {
        let x = layout.x;
        let y = layout.y;
        let w = layout.width;
        let header_h = self.metrics.header_height();

        writeln!(
            svg,
            r#"<rect class="entity-bg" x="{}" y="{}" width="{}" height="{}" rx="4" />"#,
            x, y, w, layout.height
        )
        .unwrap();

        if node.fields.is_empty() {
            writeln!(
                svg,
                r#"<rect class="entity-header" x="{}" y="{}" width="{}" height="{}" rx="4" />"#,
                x, y, w, layout.height
            )
            .unwrap();
        } else {
            writeln!(
                svg,
                r#"<rect class="entity-header" x="{}" y="{}" width="{}" height="{}" rx="4" />"#,
                x, y, w, header_h
            )
            .unwrap();
            writeln!(
                svg,
                r#"<rect class="entity-header" x="{}" y="{}" width="{}" height="{}" />"#,
                x,
                y + header_h - 4.0,
                w,
                4.0
            )
            .unwrap();
        }

        let text_y = y + header_h / 2.0 + 5.0;
        writeln!(
            svg,
            r#"<text class="entity-name" x="{}" y="{}" text-anchor="middle">{}</text>"#,
            x + w / 2.0,
            text_y,
            escape_xml(&node.label)
        )
        .unwrap();

        if !node.fields.is_empty() {
            writeln!(
                svg,
                r##"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#333" stroke-width="1" />"##,
                x,
                y + header_h,
                x + w,
                y + header_h
            )
            .unwrap();

            let mut row_y = y + header_h + self.metrics.padding_y + self.metrics.line_height * 0.7;
            for field in &node.fields {
                let class = if field.primary_key {
                    "field-text pk"
                } else {
                    "field-text"
                };
                writeln!(
                    svg,
                    r#"<text class="{}" x="{}" y="{}">{}</text>"#,
                    class,
                    x + self.metrics.padding_x,
                    row_y,
                    escape_xml(&field.label)
                )
                .unwrap();
                row_y += self.metrics.line_height;
            }
        }

        writeln!(
            svg,
            r#"<rect class="entity-border" x="{}" y="{}" width="{}" height="{}" rx="4" />"#,
            x, y, w, layout.height
        )
        .unwrap();
    }

    fn render_edge(&self, svg: &mut String, waypoints: &[(f64, f64)]) {
        let points: Vec<String> = waypoints
            .iter()
            .map(|(x, y)| format!("{},{}", x, y))
            .collect();
        writeln!(
            svg,
            r#"<polyline class="edge" points="{}" marker-end="url(#arrow)" />"#,
            points.join(" ")
        )
        .unwrap();
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
