//! Geographic aggregation levels and the summary files keyed on them.
//!
//! Every summary table is identified by a [`SummaryKey`]: the region type the
//! statistics were computed at, the population buffer used to grow each inner
//! region (absent for county subdivisions) and the census year.

use derive_more::Display;
use serde::Deserialize;
use std::str::FromStr;

/// Geographic aggregation level of an inner region.
///
/// Written as `cousub`, `tract` or `blockgroup` in file names and
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Deserialize)]
#[serde(try_from = "String")]
pub enum RegionType {
    /// County subdivision. These are never grown with a population buffer.
    #[display("cousub")]
    CountySubdivision,
    #[display("tract")]
    Tract,
    #[display("blockgroup")]
    BlockGroup,
}

impl RegionType {
    /// All region types, in report order.
    pub const ALL: [RegionType; 3] = [
        RegionType::CountySubdivision,
        RegionType::Tract,
        RegionType::BlockGroup,
    ];

    /// Whether summaries at this level are computed per population buffer size.
    pub fn has_population_buffer(self) -> bool {
        !matches!(self, RegionType::CountySubdivision)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("Unknown region type '{0}' (expected cousub, tract or blockgroup)")]
pub struct UnknownRegionType(pub String);

impl FromStr for RegionType {
    type Err = UnknownRegionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cousub" => Ok(RegionType::CountySubdivision),
            "tract" => Ok(RegionType::Tract),
            "blockgroup" => Ok(RegionType::BlockGroup),
            other => Err(UnknownRegionType(other.to_string())),
        }
    }
}

impl TryFrom<String> for RegionType {
    type Error = UnknownRegionType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Identifies one normalized summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SummaryKey {
    pub region: RegionType,
    /// Population buffer size in persons, `None` for county subdivisions.
    pub buffer: Option<u32>,
    pub year: u32,
}

impl SummaryKey {
    /// Name of the gzip-compressed CSV holding this table.
    pub fn file_name(&self) -> String {
        match self.buffer {
            Some(buffer) => format!(
                "segregation_{}_{:4}_{}_norm.csv.gz",
                self.region, self.year, buffer
            ),
            None => format!("segregation_{}_{:4}_norm.csv.gz", self.region, self.year),
        }
    }

    /// Title shown on every page generated from this table.
    pub fn title(&self) -> String {
        match self.buffer {
            Some(buffer) => format!(
                "{:4} {}s, {} person buffers",
                self.year, self.region, buffer
            ),
            None => format!("{:4} {}s", self.year, self.region),
        }
    }
}

/// Lists the tables making up a report, in page order.
///
/// Region types are visited in the given order and crossed with every buffer
/// size. County subdivisions have no population buffer and appear once.
pub fn plan(year: u32, region_types: &[RegionType], buffer_sizes: &[u32]) -> Vec<SummaryKey> {
    let mut keys = Vec::new();
    for &region in region_types {
        if region.has_population_buffer() {
            keys.extend(buffer_sizes.iter().map(|&buffer| SummaryKey {
                region,
                buffer: Some(buffer),
                year,
            }));
        } else {
            keys.push(SummaryKey {
                region,
                buffer: None,
                year,
            });
        }
    }
    keys
}

/// CBSA code assigned to regions lying outside every CBSA.
///
/// 2000-era summaries use a four digit code, later ones five digits.
pub fn null_cbsa_code(year: u32) -> u32 {
    if year < 2010 {
        9999
    } else {
        99999
    }
}
