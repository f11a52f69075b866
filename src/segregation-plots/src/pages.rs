//! Builds the ordered list of chart pages for one summary table.
//!
//! Pages are plain data; rasterising them is left to [`crate::plot`]. Rows
//! whose inner region has no population are dropped before any chart is
//! derived.

use crate::{
    histogram::Histogram,
    indices::{capitalize, SegregationIndex},
    region::{RegionType, SummaryKey},
    selection::{finite_points, finite_values, log1p, partition, populated},
    summary::{RegionRecord, SummaryTable},
};

/// What a page draws.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Histogram {
        histogram: Histogram,
        x_label: String,
        y_label: Option<String>,
    },
    Scatter {
        points: Vec<(f64, f64)>,
        x_label: String,
        y_label: String,
    },
}

/// One page of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub title: String,
    pub chart: Chart,
}

/// Parameters controlling how pages are derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSettings {
    /// Number of bins in equal-width histograms.
    pub histogram_bins: usize,
    /// Exclusive upper bound of the neighbor histogram edges.
    pub neighbor_bin_limit: u32,
    /// CBSA code of regions outside every CBSA.
    pub null_cbsa: u32,
}

/// Which enclosing area a group of charts is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Enclosing {
    Cbsa,
    PseudoCbsa,
}

impl Enclosing {
    fn suffix(self) -> &'static str {
        match self {
            Enclosing::Cbsa => "CBSA-based",
            Enclosing::PseudoCbsa => "PCBSA-based",
        }
    }
}

/// Accumulates pages sharing one title.
struct PageBuilder<'s> {
    title: String,
    settings: &'s PageSettings,
    pages: Vec<Page>,
}

impl PageBuilder<'_> {
    fn histogram(&mut self, histogram: Histogram, x_label: String, y_label: Option<&str>) {
        self.pages.push(Page {
            title: self.title.clone(),
            chart: Chart::Histogram {
                histogram,
                x_label,
                y_label: y_label.map(str::to_string),
            },
        });
    }

    fn equal_width(&mut self, values: &[f64], x_label: String) {
        let histogram = Histogram::equal_width(values, self.settings.histogram_bins);
        self.histogram(histogram, x_label, None);
    }

    fn scatter(&mut self, points: Vec<(f64, f64)>, x_label: &str, y_label: &str) {
        self.pages.push(Page {
            title: self.title.clone(),
            chart: Chart::Scatter {
                points,
                x_label: x_label.to_string(),
                y_label: y_label.to_string(),
            },
        });
    }

    /// CBSA population vs raw and adjusted index, for every index.
    fn index_scatters(&mut self, rows: &[&RegionRecord]) {
        const X_LABEL: &str = "log CBSA total population";
        let x = |r: &RegionRecord| Some(log1p(r.cbsa_total_pop as f64));
        for index in SegregationIndex::SCATTER_ORDER {
            let raw = finite_points(rows, x, |r| index.value(r));
            self.scatter(raw, X_LABEL, index.column());

            let adjusted = finite_points(rows, x, |r| index.adjusted(r));
            self.scatter(adjusted, X_LABEL, index.adjusted_column());
        }
    }

    /// Histograms of every raw and adjusted index.
    fn index_histograms(&mut self, rows: &[&RegionRecord], enclosing: Enclosing) {
        for index in SegregationIndex::HISTOGRAM_ORDER {
            let raw = finite_values(rows, |r| index.value(r));
            self.equal_width(
                &raw,
                format!("{} ({})", capitalize(index.label()), enclosing.suffix()),
            );

            let adjusted = finite_values(rows, |r| index.adjusted(r));
            self.equal_width(
                &adjusted,
                format!("Adjusted {} ({})", index.label(), enclosing.suffix()),
            );
        }
    }
}

/// Derives every page for one summary table, in report order.
pub fn build_pages(key: &SummaryKey, table: &SummaryTable, settings: &PageSettings) -> Vec<Page> {
    let rows = populated(&table.rows);
    let split = partition(&rows, settings.null_cbsa);
    let is_cousub = key.region == RegionType::CountySubdivision;

    let mut builder = PageBuilder {
        title: key.title(),
        settings,
        pages: Vec::new(),
    };

    // Scatters are drawn for buffered region types only.
    if !is_cousub {
        builder.index_scatters(&split.cbsa);
    }

    let population: Vec<f64> = rows.iter().map(|r| r.region_pop as f64).collect();
    let histogram = if is_cousub {
        let logged: Vec<f64> = population.iter().copied().map(log1p).collect();
        (
            Histogram::equal_width(&logged, settings.histogram_bins),
            "Log inner region population",
        )
    } else {
        (
            Histogram::equal_width(&population, settings.histogram_bins),
            "Inner region population",
        )
    };
    builder.histogram(histogram.0, histogram.1.to_string(), Some("Frequency"));

    let neighbors: Vec<f64> = rows.iter().map(|r| r.neighbors as f64).collect();
    builder.histogram(
        Histogram::integer_bins(&neighbors, settings.neighbor_bin_limit),
        format!("Number of {}s per inner region", key.region),
        None,
    );

    let radius = finite_values(&rows, |r| r.region_radius);
    builder.equal_width(&radius, "Inner region radius (miles)".to_string());

    let local = finite_values(&rows, |r| r.local_entropy);
    builder.equal_width(&local, "Local entropy".to_string());

    let regional = finite_values(&rows, |r| r.regional_entropy);
    builder.equal_width(&regional, "Regional entropy".to_string());

    builder.index_histograms(&split.cbsa, Enclosing::Cbsa);

    if is_cousub {
        let pcbsa = finite_values(&split.pseudo_cbsa, |r| {
            Some(log1p(r.pcbsa_total_pop as f64))
        });
        builder.equal_width(
            &pcbsa,
            "log pseudo-CBSA total population (non-CBSA regions)".to_string(),
        );
        builder.index_histograms(&split.pseudo_cbsa, Enclosing::PseudoCbsa);
    }

    builder.pages
}
