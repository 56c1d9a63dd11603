use std::path::PathBuf;

use plotters::chart::ChartContext;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::ranged1d::{Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{dash_polyline, file_stem, format_significant, BarChart, Canvas, ChartRenderer, LineChart, XAxis};
use crate::error::RenderError;
use crate::settings::Settings;

const FONT_FAMILY: &str = "sans-serif";

const PALETTE: &[RGBColor] = &[
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

fn series_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Rough width of `text` in pixels; the SVG backend does not measure glyphs.
fn text_width(text: &str, font_size: u32) -> u32 {
    text.chars().count() as u32 * font_size * 3 / 5
}

/// Writes charts as `<stem>.svg` files into an output directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgRenderer {
    out_dir: PathBuf,
    canvas: Canvas,
    bar_width: f64,
}

impl SvgRenderer {
    pub fn new(out_dir: impl Into<PathBuf>, canvas: Canvas, bar_width: f64) -> Self {
        Self { out_dir: out_dir.into(), canvas, bar_width }
    }

    pub fn for_snapshots(out_dir: impl Into<PathBuf>, settings: &Settings) -> Self {
        Self::new(out_dir, Canvas::from(&settings.chart), settings.chart.bar_width)
    }

    pub fn for_history(out_dir: impl Into<PathBuf>, settings: &Settings) -> Self {
        Self::new(out_dir, Canvas::from(&settings.history), settings.chart.bar_width)
    }

    fn write(&self, stem: &str, svg: String) -> Result<PathBuf, RenderError> {
        let path = self.out_dir.join(format!("{}.svg", file_stem(stem)));
        std::fs::write(&path, svg)?;
        tracing::info!(path=?path, "chart written");
        Ok(path)
    }
}

impl ChartRenderer for SvgRenderer {
    #[tracing::instrument(level = "info", skip(self, chart), fields(title=%chart.title))]
    fn render_bar_chart(&mut self, stem: &str, chart: &BarChart) -> Result<PathBuf, RenderError> {
        let svg = draw_bar_chart(chart, &self.canvas, self.bar_width)?;
        self.write(stem, svg)
    }

    #[tracing::instrument(level = "info", skip(self, chart), fields(title=%chart.title, nr_series=%chart.series.len()))]
    fn render_line_chart(&mut self, stem: &str, chart: &LineChart) -> Result<PathBuf, RenderError> {
        let svg = draw_line_chart(chart, &self.canvas)?;
        self.write(stem, svg)
    }
}

/// Renders a horizontal bar chart to an SVG document. Every label gets a row; rows without a
/// value stay empty. Bars are annotated with their value.
pub fn draw_bar_chart(chart: &BarChart, canvas: &Canvas, bar_width: f64) -> Result<String, RenderError> {
    let present: Vec<f64> = chart.values.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    if present.is_empty() {
        return Err(RenderError::EmptyValueSet(chart.title.clone()));
    }

    let max_value = present.iter().copied().fold(f64::MIN, f64::max);
    let min_value = present.iter().copied().fold(f64::MAX, f64::min);
    let upper = if 0.0 < max_value { max_value * 1.2 } else { 1.0 };
    let lower = if min_value < 0.0 { min_value * 1.2 } else { 0.0 };

    let nr_rows = chart.labels.len().max(chart.values.len());
    let label_area = chart
        .labels
        .iter()
        .map(|l| text_width(l, canvas.font_size))
        .max()
        .unwrap_or_default()
        + canvas.font_size;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (canvas.width, canvas.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, (FONT_FAMILY, canvas.font_size + 4))
            .margin(canvas.font_size)
            .x_label_area_size(canvas.font_size * 3)
            .y_label_area_size(label_area)
            .build_cartesian_2d(lower..upper, -0.5..(nr_rows as f64 - 0.5))?;

        let row_label = |y: &f64| {
            let row = y.round();
            if (y - row).abs() < 0.3 && 0.0 <= row && (row as usize) < nr_rows {
                chart.labels.get(nr_rows - 1 - row as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        };

        ctx.configure_mesh()
            .disable_y_mesh()
            .y_labels(nr_rows)
            .y_label_formatter(&row_label)
            .x_desc(chart.value_desc.as_str())
            .label_style((FONT_FAMILY, canvas.font_size))
            .axis_desc_style((FONT_FAMILY, canvas.font_size))
            .draw()?;

        let half = bar_width / 2.0;
        for (i, value) in chart.values.iter().enumerate() {
            let value = match value {
                Some(v) if v.is_finite() => *v,
                _ => continue,
            };
            let y = (nr_rows - 1 - i) as f64;

            ctx.draw_series(std::iter::once(Rectangle::new(
                [(0.0, y - half), (value, y + half)],
                series_color(i).filled(),
            )))?;

            ctx.draw_series(std::iter::once(Text::new(
                format_significant(value),
                (value + upper * 0.005, y),
                (FONT_FAMILY, canvas.font_size)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Left, VPos::Center)),
            )))?;
        }

        root.present()?;
    }

    Ok(svg)
}

/// Renders a line chart with point markers to an SVG document. Missing points break a line;
/// confidence bounds, when present, are drawn as capped error bars.
pub fn draw_line_chart(chart: &LineChart, canvas: &Canvas) -> Result<String, RenderError> {
    let plotted = |y: f64| y.is_finite() && (!chart.log_y || 0.0 < y);
    let ys: Vec<f64> = chart
        .series
        .iter()
        .flat_map(|s| s.points.iter().flatten())
        .flat_map(|p| {
            let (lo, hi) = p.bounds.unwrap_or((p.y, p.y));
            [p.y, lo, hi]
        })
        .filter(|y| plotted(*y))
        .collect();
    if ys.is_empty() || chart.x_axis.is_empty() {
        return Err(RenderError::EmptyValueSet(chart.title.clone()));
    }

    let y_min = ys.iter().copied().fold(f64::MAX, f64::min);
    let y_max = ys.iter().copied().fold(f64::MIN, f64::max);
    let x_range = x_range(&chart.x_axis);

    let x_label_area = match &chart.x_axis {
        XAxis::Categories(labels) => {
            labels
                .iter()
                .flat_map(|l| l.lines())
                .map(|l| text_width(l, canvas.font_size))
                .max()
                .unwrap_or_default()
                + canvas.font_size * 3
        },
        XAxis::Numeric { .. } => canvas.font_size * 3,
    };
    let y_label_area = canvas.font_size * 5;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (canvas.width, canvas.height)).into_drawing_area();
        root.fill(&WHITE)?;

        if chart.log_y {
            let y_range = (y_min / 1.5)..(y_max * 1.5);
            let mut ctx = ChartBuilder::on(&root)
                .caption(&chart.title, (FONT_FAMILY, canvas.font_size + 4))
                .margin(canvas.font_size)
                .x_label_area_size(x_label_area)
                .y_label_area_size(y_label_area)
                .build_cartesian_2d(x_range, y_range.log_scale())?;
            draw_lines(&root, &mut ctx, chart, canvas, &plotted)?;
        } else {
            let lower = if y_min < 0.0 { y_min * 1.1 } else { 0.0 };
            let upper = if 0.0 < y_max { y_max * 1.1 } else { 1.0 };
            let mut ctx = ChartBuilder::on(&root)
                .caption(&chart.title, (FONT_FAMILY, canvas.font_size + 4))
                .margin(canvas.font_size)
                .x_label_area_size(x_label_area)
                .y_label_area_size(y_label_area)
                .build_cartesian_2d(x_range, lower..upper)?;
            draw_lines(&root, &mut ctx, chart, canvas, &plotted)?;
        }

        root.present()?;
    }

    Ok(svg)
}

fn x_range(axis: &XAxis) -> std::ops::Range<f64> {
    match axis {
        XAxis::Categories(labels) => -0.5..(labels.len() as f64 - 0.5),
        XAxis::Numeric { values, .. } => {
            let lo = values.iter().copied().fold(f64::MAX, f64::min);
            let hi = values.iter().copied().fold(f64::MIN, f64::max);
            if lo < hi {
                lo..hi
            } else {
                (lo - 1.0)..(hi + 1.0)
            }
        },
    }
}

/// Mesh label for numeric axes. Category labels may span several lines, which the mesh cannot
/// lay out, so they are drawn by `draw_category_labels`.
fn x_tick_label(axis: &XAxis, x: f64) -> String {
    match axis {
        XAxis::Categories(_) => String::new(),
        XAxis::Numeric { .. } => {
            let rep = format!("{:.3}", x);
            rep.trim_end_matches('0').trim_end_matches('.').to_string()
        },
    }
}

/// Draws each category label below its tick, rotated to read downwards, with its lines placed
/// side by side and the first line nearest the tick's right.
fn draw_category_labels<'a, 'b: 'a, Y>(
    root: &DrawingArea<SVGBackend<'b>, Shift>, ctx: &ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, Y>>,
    labels: &[String], canvas: &Canvas,
) -> Result<(), RenderError>
where
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let (_, y_pixels) = ctx.plotting_area().get_pixel_range();
    let top = y_pixels.end + canvas.font_size as i32 / 2;
    let line_height = canvas.font_size as i32;
    let style = (FONT_FAMILY, canvas.font_size)
        .into_font()
        .transform(FontTransform::Rotate90)
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));

    for (idx, label) in labels.iter().enumerate() {
        let (px, _) = ctx.backend_coord(&(idx as f64, 1.0));
        let lines: Vec<&str> = label.lines().collect();
        let first = px + (lines.len() as i32 - 1) * line_height / 2;
        for (nr, line) in lines.iter().enumerate() {
            let x = first - nr as i32 * line_height;
            root.draw(&Text::new(line.to_string(), (x, top), style.clone()))?;
        }
    }
    Ok(())
}

fn draw_lines<'a, 'b: 'a, Y>(
    root: &DrawingArea<SVGBackend<'b>, Shift>, ctx: &mut ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, Y>>,
    chart: &LineChart, canvas: &Canvas, plotted: &dyn Fn(f64) -> bool,
) -> Result<(), RenderError>
where
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let x_labels = match &chart.x_axis {
        XAxis::Categories(labels) => labels.len().max(1),
        XAxis::Numeric { values, .. } => values.len().max(2),
    };
    let x_formatter = |x: &f64| x_tick_label(&chart.x_axis, *x);

    let mut mesh = ctx.configure_mesh();
    mesh.x_labels(x_labels)
        .x_label_formatter(&x_formatter)
        .y_desc(chart.y_desc.as_str())
        .label_style((FONT_FAMILY, canvas.font_size))
        .axis_desc_style((FONT_FAMILY, canvas.font_size));
    if let XAxis::Numeric { desc, .. } = &chart.x_axis {
        mesh.x_desc(desc.as_str());
    }
    mesh.draw()?;
    if let XAxis::Categories(labels) = &chart.x_axis {
        draw_category_labels(root, ctx, labels, canvas)?;
    }

    for (i, series) in chart.series.iter().enumerate() {
        let color = series_color(i);
        let stroke = color.stroke_width(2);

        let points: Vec<Option<(f64, f64)>> = series
            .points
            .iter()
            .enumerate()
            .map(|(idx, p)| match (chart.x_axis.coord(idx), p) {
                (Some(x), Some(p)) if plotted(p.y) => Some((x, p.y)),
                _ => None,
            })
            .collect();

        for run in points.split(Option::is_none).filter(|run| !run.is_empty()) {
            let run: Vec<(f64, f64)> = run.iter().flatten().copied().collect();
            match series.style.dash_pattern() {
                None => {
                    ctx.draw_series(std::iter::once(PathElement::new(run.clone(), stroke)))?;
                },
                Some(pattern) => {
                    let pixels: Vec<(f64, f64)> = run
                        .iter()
                        .map(|coord| {
                            let (px, py) = ctx.backend_coord(coord);
                            (px as f64, py as f64)
                        })
                        .collect();
                    for dash in dash_polyline(&pixels, pattern) {
                        let dash: Vec<(i32, i32)> = dash.iter().map(|(x, y)| (x.round() as i32, y.round() as i32)).collect();
                        root.draw(&PathElement::new(dash, stroke))?;
                    }
                },
            }

            ctx.draw_series(PointSeries::of_element(run, 3, color.filled(), &|coord, size, style| {
                EmptyElement::at(coord) + Circle::new((0, 0), size, style)
            }))?;
        }

        for (idx, point) in series.points.iter().enumerate() {
            let (x, (lo, hi)) = match (chart.x_axis.coord(idx), point.and_then(|p| p.bounds)) {
                (Some(x), Some(bounds)) if plotted(bounds.0) && plotted(bounds.1) => (x, bounds),
                _ => continue,
            };
            let (px, top) = ctx.backend_coord(&(x, hi));
            let (_, bottom) = ctx.backend_coord(&(x, lo));
            let cap = 4;
            let whisker = color.stroke_width(1);
            root.draw(&PathElement::new(vec![(px, top), (px, bottom)], whisker))?;
            root.draw(&PathElement::new(vec![(px - cap, top), (px + cap, top)], whisker))?;
            root.draw(&PathElement::new(vec![(px - cap, bottom), (px + cap, bottom)], whisker))?;
        }

        ctx.draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
            .label(series.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], stroke));
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::LowerMiddle)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT_FAMILY, canvas.font_size))
        .draw()?;

    Ok(())
}
