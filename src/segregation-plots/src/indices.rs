//! The segregation indices carried by every summary row.

use crate::summary::RegionRecord;

/// A segregation index together with its population-adjusted counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegregationIndex {
    BlackIsolation,
    WhiteIsolation,
    BlackOthersDissimilarity,
    WhiteOthersDissimilarity,
}

impl SegregationIndex {
    /// Order of the scatter pages.
    pub const SCATTER_ORDER: [SegregationIndex; 4] = [
        SegregationIndex::BlackOthersDissimilarity,
        SegregationIndex::WhiteOthersDissimilarity,
        SegregationIndex::BlackIsolation,
        SegregationIndex::WhiteIsolation,
    ];

    /// Order of the per-index histogram pages.
    pub const HISTOGRAM_ORDER: [SegregationIndex; 4] = [
        SegregationIndex::BlackIsolation,
        SegregationIndex::WhiteIsolation,
        SegregationIndex::BlackOthersDissimilarity,
        SegregationIndex::WhiteOthersDissimilarity,
    ];

    /// CSV column holding the raw index.
    pub fn column(self) -> &'static str {
        match self {
            SegregationIndex::BlackIsolation => "BlackIsolation",
            SegregationIndex::WhiteIsolation => "WhiteIsolation",
            SegregationIndex::BlackOthersDissimilarity => "BODissimilarity",
            SegregationIndex::WhiteOthersDissimilarity => "WODissimilarity",
        }
    }

    /// CSV column holding the adjusted index.
    pub fn adjusted_column(self) -> &'static str {
        match self {
            SegregationIndex::BlackIsolation => "BlackIsolationResid",
            SegregationIndex::WhiteIsolation => "WhiteIsolationResid",
            SegregationIndex::BlackOthersDissimilarity => "BODissimilarityResid",
            SegregationIndex::WhiteOthersDissimilarity => "WODissimilarityResid",
        }
    }

    /// Lower case human readable name, e.g. `black/others dissimilarity`.
    pub fn label(self) -> &'static str {
        match self {
            SegregationIndex::BlackIsolation => "black isolation",
            SegregationIndex::WhiteIsolation => "white isolation",
            SegregationIndex::BlackOthersDissimilarity => "black/others dissimilarity",
            SegregationIndex::WhiteOthersDissimilarity => "white/others dissimilarity",
        }
    }

    pub fn value(self, row: &RegionRecord) -> Option<f64> {
        match self {
            SegregationIndex::BlackIsolation => row.black_isolation,
            SegregationIndex::WhiteIsolation => row.white_isolation,
            SegregationIndex::BlackOthersDissimilarity => row.bo_dissimilarity,
            SegregationIndex::WhiteOthersDissimilarity => row.wo_dissimilarity,
        }
    }

    pub fn adjusted(self, row: &RegionRecord) -> Option<f64> {
        match self {
            SegregationIndex::BlackIsolation => row.black_isolation_resid,
            SegregationIndex::WhiteIsolation => row.white_isolation_resid,
            SegregationIndex::BlackOthersDissimilarity => row.bo_dissimilarity_resid,
            SegregationIndex::WhiteOthersDissimilarity => row.wo_dissimilarity_resid,
        }
    }
}

/// Upper-cases the first character of a label.
pub(crate) fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
