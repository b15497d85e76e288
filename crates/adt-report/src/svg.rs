//! Standalone SVG chart rendering.
//!
//! The batch variant writes vector images next to the summary CSVs, so the
//! charts must be self-contained documents with no external assets. Markup is
//! produced with format! templates, the same way the dashboard page is.

use crate::config::ChartStyle;
use crate::error::{ReportError, Result};

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 90.0;

/// Render a vertical bar chart to an SVG document.
///
/// `data` is (label, count) in table order; the order is preserved on the
/// x axis.
pub fn render_bar_chart(
    title: &str,
    x_label: &str,
    y_label: &str,
    data: &[(String, u64)],
    style: &ChartStyle,
) -> Result<String> {
    if data.is_empty() {
        return Err(ReportError::EmptyTable(title.to_string()));
    }

    let plot = PlotArea::new(style);
    let y_max = nice_ceiling(data.iter().map(|(_, c)| *c).max().unwrap_or(0));

    let mut body = String::new();
    body.push_str(&plot.gridlines_and_axis_labels(y_max, style.y_ticks));

    // Bars fill 70% of each slot, centered.
    let slot = plot.width / data.len() as f64;
    let bar_width = slot * 0.7;
    for (i, (label, count)) in data.iter().enumerate() {
        let h = plot.height * (*count as f64 / y_max as f64);
        let x = plot.x0 + slot * i as f64 + (slot - bar_width) / 2.0;
        let y = plot.y0 + plot.height - h;
        body.push_str(&format!(
            r#"<rect class="bar" x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{color}"><title>{label}: {count}</title></rect>"#,
            x = x,
            y = y,
            w = bar_width,
            h = h,
            color = style.color,
            label = xml_escape(label),
            count = count,
        ));
        body.push('\n');
        body.push_str(&plot.x_tick_label(slot * i as f64 + slot / 2.0, label));
    }

    Ok(plot.document(title, x_label, y_label, &body))
}

/// Render a line chart with point markers to an SVG document.
///
/// `data` is (label, count) in chronological order.
pub fn render_line_chart(
    title: &str,
    x_label: &str,
    y_label: &str,
    data: &[(String, u64)],
    style: &ChartStyle,
) -> Result<String> {
    if data.is_empty() {
        return Err(ReportError::EmptyTable(title.to_string()));
    }

    let plot = PlotArea::new(style);
    let y_max = nice_ceiling(data.iter().map(|(_, c)| *c).max().unwrap_or(0));

    let mut body = String::new();
    body.push_str(&plot.gridlines_and_axis_labels(y_max, style.y_ticks));

    // A single point still needs a finite x position.
    let step = if data.len() > 1 {
        plot.width / (data.len() - 1) as f64
    } else {
        0.0
    };

    let points: Vec<(f64, f64)> = data
        .iter()
        .enumerate()
        .map(|(i, (_, count))| {
            let x = if data.len() > 1 {
                plot.x0 + step * i as f64
            } else {
                plot.x0 + plot.width / 2.0
            };
            let y = plot.y0 + plot.height - plot.height * (*count as f64 / y_max as f64);
            (x, y)
        })
        .collect();

    let path: Vec<String> = points
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect();
    body.push_str(&format!(
        r#"<polyline class="series" points="{points}" fill="none" stroke="{color}" stroke-width="2"/>"#,
        points = path.join(" "),
        color = style.color,
    ));
    body.push('\n');

    for (i, ((label, count), (x, y))) in data.iter().zip(points.iter()).enumerate() {
        body.push_str(&format!(
            r#"<circle class="marker" cx="{x:.1}" cy="{y:.1}" r="4" fill="{color}"><title>{label}: {count}</title></circle>"#,
            x = x,
            y = y,
            color = style.color,
            label = xml_escape(label),
            count = count,
        ));
        body.push('\n');
        let slot_center = if data.len() > 1 {
            step * i as f64
        } else {
            plot.width / 2.0
        };
        body.push_str(&plot.x_tick_label(slot_center, label));
    }

    Ok(plot.document(title, x_label, y_label, &body))
}

/// Shared frame: title, axes, labels, and coordinate transforms.
struct PlotArea {
    canvas_width: u32,
    canvas_height: u32,
    x0: f64,
    y0: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn new(style: &ChartStyle) -> Self {
        PlotArea {
            canvas_width: style.width,
            canvas_height: style.height,
            x0: MARGIN_LEFT,
            y0: MARGIN_TOP,
            width: style.width as f64 - MARGIN_LEFT - MARGIN_RIGHT,
            height: style.height as f64 - MARGIN_TOP - MARGIN_BOTTOM,
        }
    }

    fn gridlines_and_axis_labels(&self, y_max: u64, ticks: u32) -> String {
        let mut out = String::new();
        for t in 0..=ticks {
            let value = y_max as f64 * t as f64 / ticks as f64;
            let y = self.y0 + self.height - self.height * t as f64 / ticks as f64;
            out.push_str(&format!(
                r##"<line class="grid" x1="{x0:.1}" y1="{y:.1}" x2="{x1:.1}" y2="{y:.1}" stroke="#dddddd" stroke-width="1"/>"##,
                x0 = self.x0,
                x1 = self.x0 + self.width,
                y = y,
            ));
            out.push('\n');
            out.push_str(&format!(
                r#"<text class="ytick" x="{x:.1}" y="{y:.1}" text-anchor="end" dominant-baseline="middle" font-size="12">{v}</text>"#,
                x = self.x0 - 8.0,
                y = y,
                v = value.round() as u64,
            ));
            out.push('\n');
        }
        out
    }

    /// Rotated tick label under the x axis; `offset` is relative to the plot
    /// origin.
    fn x_tick_label(&self, offset: f64, label: &str) -> String {
        let x = self.x0 + offset;
        let y = self.y0 + self.height + 16.0;
        format!(
            "<text class=\"xtick\" x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"end\" font-size=\"12\" transform=\"rotate(-45 {x:.1} {y:.1})\">{label}</text>\n",
            x = x,
            y = y,
            label = xml_escape(label),
        )
    }

    fn document(&self, title: &str, x_label: &str, y_label: &str, body: &str) -> String {
        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">
<rect width="{w}" height="{h}" fill="#ffffff"/>
<text class="title" x="{cx:.1}" y="30" text-anchor="middle" font-size="18" font-weight="bold">{title}</text>
<line class="axis" x1="{x0:.1}" y1="{ybot:.1}" x2="{x1:.1}" y2="{ybot:.1}" stroke="#333333" stroke-width="1"/>
<line class="axis" x1="{x0:.1}" y1="{y0:.1}" x2="{x0:.1}" y2="{ybot:.1}" stroke="#333333" stroke-width="1"/>
<text class="xlabel" x="{cx:.1}" y="{xl:.1}" text-anchor="middle" font-size="14">{x_label}</text>
<text class="ylabel" x="20" y="{cy:.1}" text-anchor="middle" font-size="14" transform="rotate(-90 20 {cy:.1})">{y_label}</text>
{body}</svg>
"##,
            w = self.canvas_width,
            h = self.canvas_height,
            cx = self.x0 + self.width / 2.0,
            cy = self.y0 + self.height / 2.0,
            x0 = self.x0,
            x1 = self.x0 + self.width,
            y0 = self.y0,
            ybot = self.y0 + self.height,
            xl = self.canvas_height as f64 - 15.0,
            title = xml_escape(title),
            x_label = xml_escape(x_label),
            y_label = xml_escape(y_label),
            body = body,
        )
    }
}

/// Round a maximum value up to a clean axis ceiling (1/2/5 ladder).
fn nice_ceiling(max: u64) -> u64 {
    if max == 0 {
        return 1;
    }
    let mut step = 1u64;
    loop {
        for mult in [1u64, 2, 5] {
            let ceiling = step * mult;
            if ceiling >= max {
                return ceiling;
            }
        }
        step *= 10;
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<(String, u64)> {
        vec![
            ("4720".to_string(), 12),
            ("4732".to_string(), 7),
            ("4723".to_string(), 3),
        ]
    }

    #[test]
    fn test_bar_chart_has_one_rect_per_row() {
        let svg = render_bar_chart(
            "Number of Critical Events by Event ID",
            "Event ID",
            "Number of Occurrences",
            &sample(),
            &ChartStyle::event_bars(),
        )
        .unwrap();

        assert_eq!(svg.matches("<rect class=\"bar\"").count(), 3);
        assert!(svg.contains("Number of Critical Events by Event ID"));
        assert!(svg.contains("#87ceeb"));
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    // The frame literals carry hex colors; make sure they come through
    // verbatim rather than truncated at the quote-hash boundary.
    #[test]
    fn test_frame_colors_survive_templating() {
        let svg = render_bar_chart("t", "x", "y", &sample(), &ChartStyle::default()).unwrap();
        assert!(svg.contains(r##"fill="#ffffff""##));
        assert!(svg.contains(r##"stroke="#dddddd""##));
        assert!(svg.contains(r##"stroke="#333333""##));
    }

    #[test]
    fn test_line_chart_has_one_marker_per_point() {
        let svg = render_line_chart(
            "Number of Critical Events by Date",
            "Date",
            "Number of Occurrences",
            &sample(),
            &ChartStyle::date_line(),
        )
        .unwrap();

        assert_eq!(svg.matches("<circle class=\"marker\"").count(), 3);
        assert_eq!(svg.matches("<polyline class=\"series\"").count(), 1);
    }

    #[test]
    fn test_single_point_line_chart() {
        let data = vec![("2024-03-15".to_string(), 4)];
        let svg = render_line_chart("t", "x", "y", &data, &ChartStyle::date_line()).unwrap();
        assert_eq!(svg.matches("<circle class=\"marker\"").count(), 1);
        // No NaN coordinates from a zero-length x range.
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_empty_table_is_an_error() {
        let err = render_bar_chart("t", "x", "y", &[], &ChartStyle::default()).unwrap_err();
        assert!(matches!(err, ReportError::EmptyTable(_)));
    }

    #[test]
    fn test_labels_are_escaped() {
        let data = vec![("<script>&\"".to_string(), 1)];
        let svg = render_bar_chart("t", "x", "y", &data, &ChartStyle::default()).unwrap();
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;&amp;&quot;"));
    }

    #[test]
    fn test_nice_ceiling_ladder() {
        assert_eq!(nice_ceiling(0), 1);
        assert_eq!(nice_ceiling(1), 1);
        assert_eq!(nice_ceiling(3), 5);
        assert_eq!(nice_ceiling(7), 10);
        assert_eq!(nice_ceiling(12), 20);
        assert_eq!(nice_ceiling(47), 50);
        assert_eq!(nice_ceiling(99), 100);
        assert_eq!(nice_ceiling(101), 200);
    }
}
