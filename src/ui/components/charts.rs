//! Dashboard charts rendered to SVG with plotters.

use std::f64::consts::{FRAC_PI_2, TAU};

use dioxus::prelude::*;
use plotters::prelude::{
    AreaSeries, ChartBuilder, Color, IntoDrawingArea, IntoFont, LineSeries, Polygon, RGBAColor,
    RGBColor, Rectangle, SVGBackend, ShapeStyle, Text,
};

use crate::domain::{ImpactSummary, TrendPoint};
use crate::ui::theme;
use crate::util::format::format_number;

const IMPACT_LABELS: [&str; 3] = ["Trees Saved", "CO2 Reduced (kg)", "Water Saved (L)"];
const IMPACT_COLORS: [RGBColor; 3] = [
    RGBColor(40, 167, 69),
    RGBColor(23, 162, 184),
    RGBColor(255, 193, 7),
];
const EMPTY_RING: RGBColor = RGBColor(51, 65, 85);
const TEXT: RGBColor = RGBColor(148, 163, 184);
const TREND_LINE: RGBColor = RGBColor(40, 167, 69);
const TREND_FILL: RGBAColor = RGBAColor(40, 167, 69, 0.15);

const CHART_WIDTH: u32 = 420;
const CHART_HEIGHT: u32 = 280;

#[component]
pub fn ImpactChart(summary: ImpactSummary) -> Element {
    let svg = render_impact_chart(&summary, CHART_WIDTH, CHART_HEIGHT);
    rsx! {
        section { class: "{theme::panel()}",
            h2 { class: "{theme::section_title()}", "Environmental Impact" }
            div { class: "chart-frame mt-4", dangerous_inner_html: "{svg}" }
            if summary.is_empty() {
                p { class: "mt-2 text-xs text-slate-500", "No completed pickups yet." }
            }
        }
    }
}

#[component]
pub fn TrendChart(points: Vec<TrendPoint>) -> Element {
    let svg = render_trend_chart(&points, CHART_WIDTH, CHART_HEIGHT);
    rsx! {
        section { class: "{theme::panel()}",
            h2 { class: "{theme::section_title()}", "Monthly Pickups" }
            div { class: "chart-frame mt-4", dangerous_inner_html: "{svg}" }
        }
    }
}

/// Start and end angle (radians, clockwise from 12 o'clock) of each non-empty
/// doughnut segment.
pub fn doughnut_segments(values: &[f64]) -> Vec<(usize, f64, f64)> {
    let total: f64 = values.iter().filter(|v| v.is_finite() && **v > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = 0.0;
    let mut segments = Vec::new();
    for (index, value) in values.iter().enumerate() {
        if !value.is_finite() || *value <= 0.0 {
            continue;
        }
        let sweep = value / total * TAU;
        segments.push((index, start, start + sweep));
        start += sweep;
    }
    segments
}

/// Polygon outline of a ring sector between `start` and `end`.
fn ring_sector(
    center: (i32, i32),
    outer: f64,
    inner: f64,
    start: f64,
    end: f64,
) -> Vec<(i32, i32)> {
    let steps = (((end - start) / TAU) * 120.0).ceil().max(2.0) as usize;
    let point = |radius: f64, angle: f64| {
        // Angles run clockwise from the top.
        let theta = angle - FRAC_PI_2;
        (
            center.0 + (radius * theta.cos()).round() as i32,
            center.1 + (radius * theta.sin()).round() as i32,
        )
    };

    let mut outline = Vec::with_capacity(steps * 2 + 2);
    for step in 0..=steps {
        let angle = start + (end - start) * step as f64 / steps as f64;
        outline.push(point(outer, angle));
    }
    for step in (0..=steps).rev() {
        let angle = start + (end - start) * step as f64 / steps as f64;
        outline.push(point(inner, angle));
    }
    outline
}

pub fn render_impact_chart(summary: &ImpactSummary, width: u32, height: u32) -> String {
    let values = summary.values();
    let legend_height = 28;
    let center = (width as i32 / 2, (height as i32 - legend_height) / 2);
    let outer = f64::from(center.1.min(center.0) - 8).max(10.0);
    let inner = outer * 0.6;

    let mut svg_buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut svg_buffer, (width, height)).into_drawing_area();

        let segments = doughnut_segments(&values);
        if segments.is_empty() {
            root.draw(&Polygon::new(
                ring_sector(center, outer, inner, 0.0, TAU),
                EMPTY_RING.filled(),
            ))
            .ok();
        }
        for (index, start, end) in segments {
            root.draw(&Polygon::new(
                ring_sector(center, outer, inner, start, end),
                IMPACT_COLORS[index].filled(),
            ))
            .ok();
        }

        // Legend along the bottom edge.
        let slot = width as i32 / IMPACT_LABELS.len() as i32;
        let y = height as i32 - legend_height / 2;
        for (index, label) in IMPACT_LABELS.iter().enumerate() {
            let x = slot * index as i32 + 8;
            root.draw(&Rectangle::new(
                [(x, y - 5), (x + 10, y + 5)],
                IMPACT_COLORS[index].filled(),
            ))
            .ok();
            let text = format!("{label}: {}", format_number(values[index]));
            root.draw(&Text::new(
                text,
                (x + 14, y - 6),
                ("sans-serif", 11).into_font().color(&TEXT),
            ))
            .ok();
        }

        root.present().ok();
    }

    make_svg_responsive(svg_buffer, width, height)
}

pub fn render_trend_chart(points: &[TrendPoint], width: u32, height: u32) -> String {
    let mut svg_buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut svg_buffer, (width, height)).into_drawing_area();

        let x_max = points.len().saturating_sub(1).max(1) as f64;
        let y_max = points
            .iter()
            .map(|point| point.count)
            .fold(0.0_f64, f64::max)
            .max(1.0)
            * 1.1;

        let chart = ChartBuilder::on(&root)
            .margin(8)
            .x_label_area_size(24)
            .y_label_area_size(36)
            .build_cartesian_2d(0.0..x_max, 0.0..y_max);

        if let Ok(mut chart) = chart {
            let month_label = |x: &f64| {
                let index = x.round();
                if (x - index).abs() > 0.01 || index < 0.0 {
                    return String::new();
                }
                points
                    .get(index as usize)
                    .map(|point| point.month.clone())
                    .unwrap_or_default()
            };

            chart
                .configure_mesh()
                .disable_mesh()
                .x_labels(points.len().clamp(2, 12))
                .y_labels(5)
                .axis_style(TEXT)
                .label_style(("sans-serif", 11, &TEXT))
                .x_label_formatter(&month_label)
                .y_label_formatter(&|y| format!("{}", y.round() as i64))
                .draw()
                .ok();

            let series: Vec<(f64, f64)> = points
                .iter()
                .enumerate()
                .map(|(index, point)| (index as f64, point.count.max(0.0)))
                .collect();

            if !series.is_empty() {
                chart
                    .draw_series(AreaSeries::new(series.iter().copied(), 0.0, TREND_FILL))
                    .ok();
                chart
                    .draw_series(LineSeries::new(
                        series.iter().copied(),
                        ShapeStyle::from(&TREND_LINE).stroke_width(2),
                    ))
                    .ok();
            }
        }

        root.present().ok();
    }

    make_svg_responsive(svg_buffer, width, height)
}

fn make_svg_responsive(svg: String, width: u32, height: u32) -> String {
    let needle = format!("width=\"{width}\" height=\"{height}\"");
    if svg.contains(&needle) {
        svg.replace(
            &needle,
            &format!(
                "viewBox=\"0 0 {width} {height}\" width=\"100%\" height=\"100%\" preserveAspectRatio=\"xMidYMid meet\""
            ),
        )
    } else {
        svg
    }
}
