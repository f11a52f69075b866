//! Rasterises report pages.
//!
//! Every page is drawn with the `plotters` crate into an in-memory RGB
//! buffer, which [`crate::pdf`] then embeds as one PDF page.

use crate::{
    histogram::{value_range, Histogram},
    pages::{Chart, Page},
};
use plotters::{coord::Shift, prelude::*};
use rayon::prelude::*;
use std::ops::Range;
use thiserror::Error;

/// Custom error type for plot generation.
#[derive(Error, Debug)]
pub enum PlotError {
    /// Error while drawing onto the bitmap.
    #[error("Drawing area error: {0}")]
    DrawingAreaError(
        #[from] DrawingAreaErrorKind<<BitMapBackend<'static> as DrawingBackend>::ErrorType>,
    ),
}

/// A rasterised page, 8 bit RGB, row major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterPage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

const FONT: &str = "sans-serif";
const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Whether titles, axes and labels are drawn around the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decorations {
    Full,
    /// Data only. Needs no fonts.
    Bare,
}

/// Draws a single page into an RGB buffer of `width` x `height` pixels.
pub fn render_page(page: &Page, width: u32, height: u32) -> Result<RasterPage, PlotError> {
    render_page_with(page, width, height, Decorations::Full)
}

/// Draws all pages in parallel, keeping page order.
pub fn render_pages(pages: &[Page], width: u32, height: u32) -> Result<Vec<RasterPage>, PlotError> {
    pages
        .par_iter()
        .map(|page| render_page(page, width, height))
        .collect()
}

fn render_page_with(
    page: &Page,
    width: u32,
    height: u32,
    decorations: Decorations,
) -> Result<RasterPage, PlotError> {
    let mut rgb = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        match &page.chart {
            Chart::Histogram {
                histogram,
                x_label,
                y_label,
            } => draw_histogram(
                &root,
                decorations,
                &page.title,
                histogram,
                x_label,
                y_label.as_deref(),
            )?,
            Chart::Scatter {
                points,
                x_label,
                y_label,
            } => draw_scatter(&root, decorations, &page.title, points, x_label, y_label)?,
        }

        root.present()?;
    }

    Ok(RasterPage { width, height, rgb })
}

fn chart_builder<'a, 'b, DB: DrawingBackend>(
    root: &'a DrawingArea<DB, Shift>,
    decorations: Decorations,
    title: &str,
) -> ChartBuilder<'a, 'b, DB> {
    let mut builder = ChartBuilder::on(root);
    builder.margin(15);
    if decorations == Decorations::Full {
        builder
            .caption(title, (FONT, 28).into_font())
            .x_label_area_size(50)
            .y_label_area_size(70);
    }
    builder
}

fn draw_histogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    decorations: Decorations,
    title: &str,
    histogram: &Histogram,
    x_label: &str,
    y_label: Option<&str>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let x_range = padded_range(
        histogram.edges.first().copied(),
        histogram.edges.last().copied(),
        0.0,
    );
    let y_max = histogram.max_count().max(1) as f64 * 1.05;

    let mut chart =
        chart_builder(root, decorations, title).build_cartesian_2d(x_range, 0f64..y_max)?;

    if decorations == Decorations::Full {
        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh()
            .disable_y_mesh()
            .x_desc(x_label)
            .axis_desc_style((FONT, 18).into_font());
        if let Some(y_label) = y_label {
            mesh.y_desc(y_label);
        }
        mesh.draw()?;
    }

    chart.draw_series(
        histogram
            .iter_bins()
            .filter(|&(_, _, count)| count > 0)
            .map(|(lo, hi, count)| {
                Rectangle::new([(lo, 0.0), (hi, count as f64)], BAR_COLOR.filled())
            }),
    )?;

    Ok(())
}

fn draw_scatter<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    decorations: Decorations,
    title: &str,
    points: &[(f64, f64)],
    x_label: &str,
    y_label: &str,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    let x_range = value_range(&xs);
    let y_range = value_range(&ys);

    let mut chart = chart_builder(root, decorations, title).build_cartesian_2d(
        padded_range(x_range.map(|r| r.0), x_range.map(|r| r.1), 0.05),
        padded_range(y_range.map(|r| r.0), y_range.map(|r| r.1), 0.05),
    )?;

    if decorations == Decorations::Full {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc(x_label)
            .y_desc(y_label)
            .axis_desc_style((FONT, 18).into_font())
            .draw()?;
    }

    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 3, BAR_COLOR.mix(0.6).filled())),
    )?;

    Ok(())
}

/// Axis range around `[lo, hi]`, widened by `pad` of its span.
///
/// Missing bounds give `[0, 1]`; a zero-width range is widened by half a unit
/// and not padded further.
fn padded_range(lo: Option<f64>, hi: Option<f64>, pad: f64) -> Range<f64> {
    match (lo, hi) {
        (Some(lo), Some(hi)) if lo < hi => {
            let margin = (hi - lo) * pad;
            (lo - margin)..(hi + margin)
        }
        (Some(v), Some(_)) => (v - 0.5)..(v + 0.5),
        _ => 0.0..1.0,
    }
}
