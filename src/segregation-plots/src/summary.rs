//! Loading of normalized segregation summaries.
//!
//! Summaries are gzip-compressed CSV files with one row per inner region.
//! Only the columns needed for plotting are deserialized; any other column
//! in the file is ignored.

use flate2::read::GzDecoder;
use serde::Deserialize;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

/// One inner region of a summary table.
///
/// Floating point columns are `None` when the field is empty. Non-finite
/// values (`NaN`, `Inf`) are kept as read and treated as missing downstream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionRecord {
    /// Enclosing CBSA code, or the null code for regions outside every CBSA.
    #[serde(rename = "CBSA")]
    pub cbsa: String,
    #[serde(rename = "RegionPop")]
    pub region_pop: i64,
    #[serde(rename = "Neighbors")]
    pub neighbors: i64,
    /// Radius of the inner region in miles.
    #[serde(rename = "RegionRadius")]
    pub region_radius: Option<f64>,
    #[serde(rename = "LocalEntropy")]
    pub local_entropy: Option<f64>,
    #[serde(rename = "RegionalEntropy")]
    pub regional_entropy: Option<f64>,
    #[serde(rename = "CBSATotalPop")]
    pub cbsa_total_pop: i64,
    #[serde(rename = "PCBSATotalPop")]
    pub pcbsa_total_pop: i64,
    #[serde(rename = "BlackIsolation")]
    pub black_isolation: Option<f64>,
    #[serde(rename = "WhiteIsolation")]
    pub white_isolation: Option<f64>,
    #[serde(rename = "BlackIsolationResid")]
    pub black_isolation_resid: Option<f64>,
    #[serde(rename = "WhiteIsolationResid")]
    pub white_isolation_resid: Option<f64>,
    #[serde(rename = "BODissimilarity")]
    pub bo_dissimilarity: Option<f64>,
    #[serde(rename = "WODissimilarity")]
    pub wo_dissimilarity: Option<f64>,
    #[serde(rename = "BODissimilarityResid")]
    pub bo_dissimilarity_resid: Option<f64>,
    #[serde(rename = "WODissimilarityResid")]
    pub wo_dissimilarity_resid: Option<f64>,
}

impl RegionRecord {
    /// Whether the region lies outside every CBSA.
    ///
    /// Codes are compared numerically when possible so zero padded codes match.
    pub fn is_pseudo_cbsa(&self, null_cbsa: u32) -> bool {
        let code = self.cbsa.trim();
        match code.parse::<u32>() {
            Ok(value) => value == null_cbsa,
            Err(_) => code == null_cbsa.to_string(),
        }
    }
}

/// All rows of one summary file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTable {
    pub rows: Vec<RegionRecord>,
}

#[derive(thiserror::Error, Debug)]
pub enum SummaryError {
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error reading '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl SummaryTable {
    /// Loads a gzip-compressed summary from disk.
    pub fn load(path: &Path) -> Result<Self, SummaryError> {
        let file = File::open(path).map_err(|source| SummaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decoder = GzDecoder::new(BufReader::new(file));
        Self::from_reader(decoder).map_err(|source| SummaryError::Csv {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses an uncompressed CSV summary with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let rows = rdr.deserialize().collect::<Result<Vec<RegionRecord>, _>>()?;
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    pub const HEADER: &str = "State,CBSA,Name,CBSATotalPop,PCBSATotalPop,LocalEntropy,RegionalEntropy,\
BlackIsolation,WhiteIsolation,BlackIsolationResid,WhiteIsolationResid,\
BODissimilarity,WODissimilarity,BODissimilarityResid,WODissimilarityResid,\
Neighbors,RegionPop,RegionRadius";

    /// Builds a CSV row in [`HEADER`] order from the columns the tests vary.
    pub fn row(cbsa: &str, region_pop: i64, cbsa_pop: i64, pcbsa_pop: i64, index: &str) -> String {
        format!(
            "MI,{cbsa},Somewhere,{cbsa_pop},{pcbsa_pop},0.5,0.7,\
{index},{index},{index},{index},{index},{index},{index},{index},\
4,{region_pop},3.25"
        )
    }

    pub fn csv(rows: &[String]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        text
    }

    pub fn gzip(text: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parses_rows_in_file_order() {
            let text = csv(&[
                row("11460", 1200, 344791, 0, "0.25"),
                row("99999", 300, 0, 15000, "0.5"),
            ]);
            let table = SummaryTable::from_reader(text.as_bytes()).unwrap();

            assert_eq!(table.len(), 2);
            assert_eq!(table.rows[0].cbsa, "11460");
            assert_eq!(table.rows[0].region_pop, 1200);
            assert_eq!(table.rows[0].cbsa_total_pop, 344791);
            assert_eq!(table.rows[0].neighbors, 4);
            assert_eq!(table.rows[0].region_radius, Some(3.25));
            assert_eq!(table.rows[1].pcbsa_total_pop, 15000);
            assert_eq!(table.rows[1].black_isolation, Some(0.5));
        }

        #[test]
        fn test_missing_and_non_finite_values() {
            let text = csv(&[row("11460", 10, 100, 0, ""), row("11460", 10, 100, 0, "NaN")]);
            let table = SummaryTable::from_reader(text.as_bytes()).unwrap();

            assert_eq!(table.rows[0].wo_dissimilarity, None);
            assert!(table.rows[1].wo_dissimilarity.unwrap().is_nan());
        }

        #[test]
        fn test_header_only_table_is_empty() {
            let table = SummaryTable::from_reader(csv(&[]).as_bytes()).unwrap();
            assert!(table.is_empty());
        }

        #[test]
        fn test_malformed_integer_is_an_error() {
            let text = csv(&[row("11460", 10, 100, 0, "0.1").replace(",10,", ",ten,")]);
            assert!(SummaryTable::from_reader(text.as_bytes()).is_err());
        }

        #[test]
        fn test_pseudo_cbsa_detection() {
            let text = csv(&[
                row("99999", 1, 0, 0, "0"),
                row("09999", 1, 0, 0, "0"),
                row("11460", 1, 0, 0, "0"),
            ]);
            let table = SummaryTable::from_reader(text.as_bytes()).unwrap();

            assert!(table.rows[0].is_pseudo_cbsa(99999));
            assert!(!table.rows[0].is_pseudo_cbsa(9999));
            assert!(table.rows[1].is_pseudo_cbsa(9999));
            assert!(!table.rows[2].is_pseudo_cbsa(99999));
        }
    }

    mod file_tests {
        use super::*;

        #[test]
        fn test_load_gzip_file() -> anyhow::Result<()> {
            let dir = tempfile::tempdir()?;
            let path = dir.path().join("segregation_cousub_2010_norm.csv.gz");
            std::fs::write(&path, gzip(&csv(&[row("11460", 5, 10, 0, "0.3")])))?;

            let table = SummaryTable::load(&path)?;
            assert_eq!(table.len(), 1);
            assert_eq!(table.rows[0].bo_dissimilarity, Some(0.3));
            Ok(())
        }

        #[test]
        fn test_missing_file_reports_path() {
            let path = Path::new("does/not/exist.csv.gz");
            match SummaryTable::load(path) {
                Err(SummaryError::Io { path: p, .. }) => assert_eq!(p, path),
                other => panic!("Expected I/O error, got {other:?}"),
            }
        }
    }
}
