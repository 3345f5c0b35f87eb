//src/chart.rs
//! Progress chart projection.
//!
//! Maps one exercise's log entries onto a fixed 600x300 plot: dates spread
//! evenly along x in ascending order, weight on an inverted y axis with 10%
//! headroom above and below. The projection is a pure function of its input.

use crate::model::{format_weight, LogEntry};
use chrono::NaiveDate;
use std::fmt::Write as _;
use thiserror::Error;

const WEIGHT_FLOOR_FACTOR: f64 = 0.9;
const WEIGHT_CEIL_FACTOR: f64 = 1.1;
const FLAT_RANGE_FALLBACK: f64 = 10.0;
const WEIGHT_LABEL_OFFSET: f64 = 15.0;
const DATE_LABEL_OFFSET: f64 = 20.0;
const MARKER_RADIUS: f64 = 5.0;

pub const MIN_CHART_POINTS: usize = 2;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartError {
    #[error("Add at least 2 logs for this exercise to see a graph (found {found})")]
    InsufficientData { found: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for ChartGeometry {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 300.0,
            padding: 40.0,
        }
    }
}

impl ChartGeometry {
    pub fn inner_width(&self) -> f64 {
        self.width - self.padding * 2.0
    }

    pub fn inner_height(&self) -> f64 {
        self.height - self.padding * 2.0
    }

    /// y of the horizontal axis.
    pub fn baseline(&self) -> f64 {
        self.height - self.padding
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub date: NaiveDate,
    pub weight: f64,
}

impl PlotPoint {
    pub fn weight_label(&self) -> String {
        format!("{}kg", format_weight(self.weight))
    }

    pub fn date_label(&self) -> String {
        self.date.format("%b %-d").to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartProjection {
    pub points: Vec<PlotPoint>,
    /// Lowest weight scaled down by 10%.
    pub min_weight: f64,
    /// Highest weight scaled up by 10%.
    pub max_weight: f64,
    /// `max_weight - min_weight`, or 10 when that is zero.
    pub range: f64,
    pub geometry: ChartGeometry,
}

impl ChartProjection {
    /// Lower and upper end of the weight axis.
    pub fn weight_bounds(&self) -> [f64; 2] {
        [self.min_weight, self.min_weight + self.range]
    }
}

/// Projects entries onto the default geometry.
/// # Errors
/// `ChartError::InsufficientData` with fewer than two plottable entries.
pub fn project(entries: &[LogEntry]) -> Result<ChartProjection, ChartError> {
    project_with(entries, ChartGeometry::default())
}

/// Projects entries onto `geometry`. Entries whose weight is not finite are skipped.
/// # Errors
/// `ChartError::InsufficientData` with fewer than two plottable entries.
pub fn project_with(
    entries: &[LogEntry],
    geometry: ChartGeometry,
) -> Result<ChartProjection, ChartError> {
    let mut sorted: Vec<&LogEntry> = entries.iter().filter(|e| e.weight.is_finite()).collect();
    if sorted.len() < MIN_CHART_POINTS {
        return Err(ChartError::InsufficientData {
            found: sorted.len(),
        });
    }
    // Ties on date fall back to id so any input order yields the same output.
    sorted.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    let min_weight = sorted.iter().map(|e| e.weight).fold(f64::INFINITY, f64::min) * WEIGHT_FLOOR_FACTOR;
    let max_weight = sorted.iter().map(|e| e.weight).fold(f64::NEG_INFINITY, f64::max) * WEIGHT_CEIL_FACTOR;
    let mut range = max_weight - min_weight;
    if range == 0.0 {
        range = FLAT_RANGE_FALLBACK;
    }

    let last = (sorted.len() - 1) as f64;
    let points = sorted
        .iter()
        .enumerate()
        .map(|(i, entry)| PlotPoint {
            x: geometry.padding + (i as f64 / last) * geometry.inner_width(),
            y: geometry.baseline() - ((entry.weight - min_weight) / range) * geometry.inner_height(),
            date: entry.date,
            weight: entry.weight,
        })
        .collect();

    Ok(ChartProjection {
        points,
        min_weight,
        max_weight,
        range,
        geometry,
    })
}

/// Renders a projection as a standalone SVG document.
pub fn render_svg(projection: &ChartProjection) -> String {
    let g = projection.geometry;
    let mut svg = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}">"#,
        g.width, g.height
    );
    let _ = writeln!(
        svg,
        r##"  <line x1="{p}" y1="{b}" x2="{r}" y2="{b}" stroke="#e2e8f0" stroke-width="2" />"##,
        p = g.padding,
        b = g.baseline(),
        r = g.width - g.padding
    );
    let _ = writeln!(
        svg,
        r##"  <line x1="{p}" y1="{p}" x2="{p}" y2="{b}" stroke="#e2e8f0" stroke-width="2" />"##,
        p = g.padding,
        b = g.baseline()
    );

    let polyline = projection
        .points
        .iter()
        .map(|pt| format!("{},{}", pt.x, pt.y))
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(
        svg,
        r##"  <polyline fill="none" stroke="#3b82f6" stroke-width="3" stroke-linecap="round" stroke-linejoin="round" points="{polyline}" />"##
    );

    for pt in &projection.points {
        let _ = writeln!(svg, "  <g>");
        let _ = writeln!(
            svg,
            r##"    <circle cx="{}" cy="{}" r="{MARKER_RADIUS}" fill="white" stroke="#2563eb" stroke-width="2" />"##,
            pt.x, pt.y
        );
        let _ = writeln!(
            svg,
            r##"    <text x="{}" y="{}" text-anchor="middle" fill="#1e293b" font-size="12" font-weight="bold">{}</text>"##,
            pt.x,
            pt.y - WEIGHT_LABEL_OFFSET,
            escape_text(&pt.weight_label())
        );
        let _ = writeln!(
            svg,
            r##"    <text x="{}" y="{}" text-anchor="middle" fill="#64748b" font-size="10">{}</text>"##,
            pt.x,
            g.baseline() + DATE_LABEL_OFFSET,
            escape_text(&pt.date_label())
        );
        let _ = writeln!(svg, "  </g>");
    }
    svg.push_str("</svg>\n");
    svg
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, date: &str, weight: f64) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            exercise: "Bench Press".to_string(),
            weight,
        }
    }

    #[test]
    fn fewer_than_two_points_is_insufficient() {
        assert_eq!(project(&[]), Err(ChartError::InsufficientData { found: 0 }));
        assert_eq!(
            project(&[entry("1", "2024-01-01", 60.0)]),
            Err(ChartError::InsufficientData { found: 1 })
        );
    }

    #[test]
    fn nan_weights_are_not_plotted() {
        let entries = [entry("1", "2024-01-01", 60.0), entry("2", "2024-01-02", f64::NAN)];
        assert_eq!(project(&entries), Err(ChartError::InsufficientData { found: 1 }));
    }

    #[test]
    fn endpoints_span_the_inner_width() {
        let entries = [
            entry("1", "2024-01-01", 60.0),
            entry("2", "2024-01-08", 62.5),
            entry("3", "2024-01-15", 65.0),
        ];
        let proj = project(&entries).unwrap();
        assert_eq!(proj.points[0].x, 40.0);
        assert_eq!(proj.points[1].x, 300.0);
        assert_eq!(proj.points[2].x, 560.0);
        // Lowest point sits 10% of its weight above the floor.
        let expected_low = 260.0 - ((60.0 - 54.0) / (71.5 - 54.0)) * 220.0;
        assert!((proj.points[0].y - expected_low).abs() < 1e-9);
    }

    #[test]
    fn flat_weights_use_fallback_range() {
        let entries = [entry("1", "2024-01-01", 0.0), entry("2", "2024-01-02", 0.0)];
        let proj = project(&entries).unwrap();
        assert_eq!(proj.min_weight, 0.0);
        assert_eq!(proj.max_weight, 0.0);
        assert_eq!(proj.range, 10.0);
        assert_eq!(proj.weight_bounds(), [0.0, 10.0]);
        assert_eq!(proj.points[0].y, 260.0);
        assert_eq!(proj.points[1].y, 260.0);
    }

    #[test]
    fn labels_match_display_format() {
        let pt = PlotPoint {
            x: 0.0,
            y: 0.0,
            date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            weight: 62.5,
        };
        assert_eq!(pt.weight_label(), "62.5kg");
        assert_eq!(pt.date_label(), "Jan 8");
    }

    #[test]
    fn svg_has_one_marker_per_point() {
        let entries = [entry("1", "2024-01-01", 60.0), entry("2", "2024-01-08", 62.5)];
        let svg = render_svg(&project(&entries).unwrap());
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains(">60kg<"));
        assert!(svg.contains(">Jan 8<"));
        assert!(svg.contains("points=\"40,"));
    }
}
