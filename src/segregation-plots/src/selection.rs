//! Row selection and value extraction shared by every chart.

use crate::summary::RegionRecord;

/// Rows of a table split by whether the region lies inside a CBSA.
///
/// Every input row lands in exactly one of the two halves, in input order.
#[derive(Debug, Default)]
pub struct CbsaPartition<'a> {
    pub cbsa: Vec<&'a RegionRecord>,
    pub pseudo_cbsa: Vec<&'a RegionRecord>,
}

/// Keeps only rows whose inner region has a positive population.
pub fn populated(rows: &[RegionRecord]) -> Vec<&RegionRecord> {
    rows.iter().filter(|r| r.region_pop > 0).collect()
}

/// Splits rows into CBSA and pseudo-CBSA regions.
pub fn partition<'a>(rows: &[&'a RegionRecord], null_cbsa: u32) -> CbsaPartition<'a> {
    let (pseudo_cbsa, cbsa): (Vec<_>, Vec<_>) = rows
        .iter()
        .copied()
        .partition(|r| r.is_pseudo_cbsa(null_cbsa));
    CbsaPartition { cbsa, pseudo_cbsa }
}

/// `ln(1 + x)`, the transform applied to every population axis.
pub fn log1p(value: f64) -> f64 {
    value.ln_1p()
}

/// Collects the finite values of a column, skipping missing ones.
pub fn finite_values<'a, F>(rows: &[&'a RegionRecord], column: F) -> Vec<f64>
where
    F: Fn(&'a RegionRecord) -> Option<f64>,
{
    rows.iter()
        .filter_map(|&r| column(r))
        .filter(|v| v.is_finite())
        .collect()
}

/// Collects `(x, y)` pairs, dropping any pair with a missing coordinate.
pub fn finite_points<'a, X, Y>(rows: &[&'a RegionRecord], x: X, y: Y) -> Vec<(f64, f64)>
where
    X: Fn(&'a RegionRecord) -> Option<f64>,
    Y: Fn(&'a RegionRecord) -> Option<f64>,
{
    rows.iter()
        .filter_map(|&r| Some((x(r)?, y(r)?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect()
}
