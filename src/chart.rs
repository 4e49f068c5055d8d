//! Shot chart rendering on plotters' SVG backend: a half court drawn from
//! fixed shapes, shots plotted on top and grouped by zone.

use anyhow::Result;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;

use crate::service::{ChartView, ShotChart};
use crate::shots::zones::*;
use crate::shots::Shot;

pub const WIDTH: u32 = 600;
pub const HEIGHT: u32 = 700;

const MARGIN_LEFT: i32 = 20;
const MARGIN_RIGHT: i32 = 20;
const MARGIN_TOP: i32 = 80;
const MARGIN_BOTTOM: i32 = 60;

const X_RANGE: (f64, f64) = (-260.0, 260.0);
const Y_RANGE: (f64, f64) = (-60.0, 440.0);

const COURT_COLOR: RGBColor = RGBColor(0x2C, 0x3E, 0x50);
const COURT_BACKGROUND: RGBColor = RGBColor(0xF8, 0xF9, 0xFA);
const PAINT_SHADE: RGBColor = RGBColor(0x34, 0x98, 0xDB);
const HOOP_COLOR: RGBColor = RGBColor(0xE7, 0x4C, 0x3C);
const THREE_LINE_COLOR: RGBColor = RGBColor(0xE6, 0x7E, 0x22);
const SUBTITLE_COLOR: RGBColor = RGBColor(0x55, 0x55, 0x55);
const MESSAGE_COLOR: RGBColor = RGBColor(0x66, 0x7E, 0xEA);
const ERROR_COLOR: RGBColor = RGBColor(0xD3, 0x2F, 0x2F);
const LINE_WIDTH: u32 = 3;
const FONT: &str = "sans-serif";

type Canvas<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type CourtArea<'a> = DrawingArea<SVGBackend<'a>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

struct MarkerStyle {
    color: RGBColor,
    size: i32,
}

fn marker_style(group: MarkerGroup) -> MarkerStyle {
    match group {
        MarkerGroup::Paint => MarkerStyle { color: RGBColor(0x27, 0xAE, 0x60), size: 12 },
        MarkerGroup::ThreePoint => MarkerStyle { color: RGBColor(0xE7, 0x4C, 0x3C), size: 14 },
        MarkerGroup::MidRange => MarkerStyle { color: RGBColor(0x34, 0x98, 0xDB), size: 10 },
    }
}

/// Render a view as a standalone SVG document.
pub fn render(view: &ChartView) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        match view {
            ChartView::Chart(chart) => draw_chart(&root, chart)?,
            ChartView::Error(msg) => draw_message(&root, &format!("❌ {}", msg), ERROR_COLOR, 16.0)?,
            other => draw_message(&root, &other.message().unwrap_or_default(), MESSAGE_COLOR, 20.0)?,
        }
        root.present()?;
    }
    Ok(svg)
}

fn centered(size: f64, color: RGBColor) -> TextStyle<'static> {
    (FONT, size)
        .into_font()
        .color(&color)
        .pos(Pos::new(HPos::Center, VPos::Center))
}

fn draw_message(root: &Canvas, message: &str, color: RGBColor, size: f64) -> Result<()> {
    let center = (WIDTH as i32 / 2, HEIGHT as i32 / 2);
    root.draw(&Text::new(message.to_string(), center, centered(size, color)))?;
    Ok(())
}

/// Margins around the court area so both axes share one scale.
fn court_margins() -> (i32, i32, i32, i32) {
    let plot_w = f64::from(WIDTH as i32 - MARGIN_LEFT - MARGIN_RIGHT);
    let plot_h = f64::from(HEIGHT as i32 - MARGIN_TOP - MARGIN_BOTTOM);
    let span_x = X_RANGE.1 - X_RANGE.0;
    let span_y = Y_RANGE.1 - Y_RANGE.0;
    let scale = (plot_w / span_x).min(plot_h / span_y);
    let pad_x = ((plot_w - span_x * scale) / 2.0).round() as i32;
    let pad_y = ((plot_h - span_y * scale) / 2.0).round() as i32;
    (MARGIN_TOP + pad_y, MARGIN_BOTTOM + pad_y, MARGIN_LEFT + pad_x, MARGIN_RIGHT + pad_x)
}

fn draw_chart(root: &Canvas, chart: &ShotChart) -> Result<()> {
    root.fill(&WHITE)?;
    draw_title(root, chart)?;

    let (top, bottom, left, right) = court_margins();
    let court_area = root.margin(top, bottom, left, right);
    let court = ChartBuilder::on(&court_area).build_cartesian_2d(X_RANGE.0..X_RANGE.1, Y_RANGE.0..Y_RANGE.1)?;
    let area = court.plotting_area();
    area.fill(&COURT_BACKGROUND)?;
    draw_court(area)?;

    for group in MarkerGroup::ALL {
        for shot in chart.shots.iter().filter(|s| s.zone().marker_group() == group) {
            draw_marker(area, shot, group)?;
        }
    }

    draw_legend(root, chart)?;
    Ok(())
}

fn draw_title(root: &Canvas, chart: &ShotChart) -> Result<()> {
    let made = chart.shots.iter().filter(|s| s.made).count();
    let total = chart.shots.len();
    let fg = if total > 0 { made as f64 * 100.0 / total as f64 } else { 0.0 };
    let subtitle = format!(
        "Total shots: {} | Paint: {} | Threes: {} | Mid-range: {} | FG: {:.1}%",
        total, chart.zones.paint, chart.zones.three_point, chart.zones.mid_range, fg
    );
    let x = WIDTH as i32 / 2;
    root.draw(&Text::new(format!("🏀 {}", chart.title), (x, 30), centered(20.0, COURT_COLOR)))?;
    root.draw(&Text::new(subtitle, (x, 55), centered(13.0, SUBTITLE_COLOR)))?;
    if chart.source.is_synthetic() {
        root.draw(&Text::new(
            "🔄 Showing demo data: the NBA stats API could not be reached",
            (x, 74),
            centered(11.0, ERROR_COLOR),
        ))?;
    }
    Ok(())
}

fn draw_court(area: &CourtArea) -> Result<()> {
    let court_line = || COURT_COLOR.stroke_width(LINE_WIDTH);
    let three_line = || THREE_LINE_COLOR.stroke_width(LINE_WIDTH + 1);

    // hoop and backboard
    area.draw(&PathElement::new(
        arc_points((0.0, 0.0), 7.5, 0.0, 2.0 * PI, 30),
        HOOP_COLOR.stroke_width(LINE_WIDTH + 1),
    ))?;
    area.draw(&Rectangle::new([(-30.0, -7.5), (30.0, -8.5)], COURT_COLOR.mix(0.1).filled()))?;
    area.draw(&Rectangle::new([(-30.0, -7.5), (30.0, -8.5)], court_line()))?;

    // paint
    area.draw(&Rectangle::new([(-80.0, PAINT_TOP), (80.0, BASELINE_Y)], PAINT_SHADE.mix(0.05).filled()))?;
    area.draw(&Rectangle::new([(-80.0, PAINT_TOP), (80.0, BASELINE_Y)], court_line()))?;
    area.draw(&Rectangle::new([(-60.0, PAINT_TOP), (60.0, BASELINE_Y)], court_line()))?;

    // free throw circle, far half solid and near half dashed
    area.draw(&PathElement::new(arc_points((0.0, PAINT_TOP), 60.0, 0.0, PI, 30), court_line()))?;
    for dash in dashes(&arc_points((0.0, PAINT_TOP), 60.0, PI, 2.0 * PI, 30)) {
        area.draw(&PathElement::new(dash, court_line()))?;
    }

    // restricted area
    area.draw(&PathElement::new(arc_points((0.0, 0.0), 40.0, 0.0, PI, 20), court_line()))?;

    // three point line
    for x in [-CORNER_THREE_X, CORNER_THREE_X] {
        area.draw(&PathElement::new(vec![(x, BASELINE_Y), (x, CORNER_THREE_TOP)], three_line()))?;
    }
    let corner_angle = (CORNER_THREE_TOP / THREE_POINT_RADIUS).asin();
    area.draw(&PathElement::new(
        arc_points((0.0, 0.0), THREE_POINT_RADIUS, corner_angle, PI - corner_angle, 50),
        three_line(),
    ))?;

    // center court
    area.draw(&PathElement::new(arc_points((0.0, HALF_COURT_Y), 60.0, PI, 2.0 * PI, 30), court_line()))?;
    area.draw(&PathElement::new(arc_points((0.0, HALF_COURT_Y), 20.0, PI, 2.0 * PI, 20), court_line()))?;

    // baseline and sidelines
    area.draw(&PathElement::new(
        vec![
            (-COURT_HALF_WIDTH, HALF_COURT_Y),
            (-COURT_HALF_WIDTH, BASELINE_Y),
            (COURT_HALF_WIDTH, BASELINE_Y),
            (COURT_HALF_WIDTH, HALF_COURT_Y),
        ],
        court_line(),
    ))?;
    Ok(())
}

/// `n` points on a circular arc from `start` to `end` (radians,
/// counterclockwise), in court coordinates.
fn arc_points(center: (f64, f64), radius: f64, start: f64, end: f64, n: usize) -> Vec<(f64, f64)> {
    let steps = n.max(2) - 1;
    (0..=steps)
        .map(|i| {
            let angle = start + (end - start) * i as f64 / steps as f64;
            (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
        })
        .collect()
}

/// Every other segment of a polyline.
fn dashes(points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    points.windows(2).step_by(2).map(|w| w.to_vec()).collect()
}

fn diamond(r: i32) -> Vec<(i32, i32)> {
    vec![(0, -r), (r, 0), (0, r), (-r, 0)]
}

fn star(outer: i32) -> Vec<(i32, i32)> {
    let inner = f64::from(outer) * 0.45;
    (0..10)
        .map(|i| {
            let radius = if i % 2 == 0 { f64::from(outer) } else { inner };
            let angle = -PI / 2.0 + f64::from(i) * PI / 5.0;
            ((radius * angle.cos()).round() as i32, (radius * angle.sin()).round() as i32)
        })
        .collect()
}

fn closed(mut points: Vec<(i32, i32)>) -> Vec<(i32, i32)> {
    if let Some(&first) = points.first() {
        points.push(first);
    }
    points
}

/// Made shots are filled with a white outline, missed shots are hollow.
fn draw_marker(area: &CourtArea, shot: &Shot, group: MarkerGroup) -> Result<()> {
    let style = marker_style(group);
    let at = (shot.loc_x, shot.loc_y);
    let r = style.size / 2;
    let fill = style.color.mix(0.8).filled();
    let outline = if shot.made { WHITE.stroke_width(2) } else { style.color.mix(0.8).stroke_width(2) };

    let outline_points = match group {
        MarkerGroup::Paint => {
            if shot.made {
                area.draw(&(EmptyElement::at(at) + Circle::new((0, 0), r, fill)))?;
            }
            area.draw(&(EmptyElement::at(at) + Circle::new((0, 0), r, outline)))?;
            return Ok(());
        }
        MarkerGroup::MidRange => diamond(r),
        MarkerGroup::ThreePoint => star(r),
    };
    if shot.made {
        area.draw(&(EmptyElement::at(at) + Polygon::new(outline_points.clone(), fill)))?;
    }
    area.draw(&(EmptyElement::at(at) + PathElement::new(closed(outline_points), outline)))?;
    Ok(())
}

fn draw_legend(root: &Canvas, chart: &ShotChart) -> Result<()> {
    let y = HEIGHT as i32 - MARGIN_BOTTOM / 2;
    let slot = WIDTH as i32 / 4;
    for (i, group) in MarkerGroup::ALL.iter().enumerate() {
        let style = marker_style(*group);
        let x = slot * (i as i32 + 1);
        root.draw(&Rectangle::new([(x - 46, y - 6), (x - 34, y + 6)], style.color.filled()))?;
        let label = format!("{} ({})", group.label(), chart.zones.plotted(*group));
        let text_style = (FONT, 12.0).into_font().color(&COURT_COLOR).pos(Pos::new(HPos::Left, VPos::Center));
        root.draw(&Text::new(label, (x - 28, y), text_style))?;
    }
    Ok(())
}
