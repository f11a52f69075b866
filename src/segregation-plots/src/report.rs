//! Generates the yearly PDF report.
//!
//! Tables are processed one at a time in plan order: load, derive pages,
//! rasterise, append to the document. Only one table's pages are held in
//! memory at once.

use crate::{
    config::{ConfigError, ReportConfig},
    pages::{build_pages, Page},
    pdf::{PdfError, PdfWriter},
    plot::{render_pages, PlotError},
    region::{plan, SummaryKey},
    summary::{SummaryError, SummaryTable},
};
use log::{debug, info, warn};
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error(transparent)]
    Pdf(#[from] PdfError),
    #[error("I/O error writing '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of a report run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub path: PathBuf,
    pub tables: usize,
    pub pages: usize,
}

/// Name of the report written for a year.
pub fn output_file_name(year: u32) -> String {
    format!("segregation_{year:4}.pdf")
}

/// Tables making up the report for a year.
pub fn report_plan(year: u32, config: &ReportConfig) -> Vec<SummaryKey> {
    plan(year, &config.region_types, &config.buffer_sizes)
}

/// Loads one table and derives its pages.
pub fn table_pages(
    key: &SummaryKey,
    year: u32,
    config: &ReportConfig,
) -> Result<Vec<Page>, ReportError> {
    let path = config.data_dir.join(key.file_name());
    info!("Reading '{}'", path.display());

    let table = SummaryTable::load(&path)?;
    if table.is_empty() {
        warn!("'{}' has no rows, its charts will be empty", path.display());
    }
    let pages = build_pages(key, &table, &config.page_settings(year));
    debug!(
        "{} rows in '{}' produced {} pages",
        table.len(),
        key.file_name(),
        pages.len()
    );
    Ok(pages)
}

/// Writes `segregation_<year>.pdf` into the configured output directory.
///
/// `on_table` is called after each table has been appended. The document is
/// written to a `.partial` sibling and only replaces an existing report once
/// every table has been appended; on failure the partial file is removed.
pub fn generate_report<F>(
    year: u32,
    config: &ReportConfig,
    on_table: F,
) -> Result<ReportSummary, ReportError>
where
    F: FnMut(&SummaryKey),
{
    config.validate()?;

    let path = config.output_dir.join(output_file_name(year));
    let partial = partial_path(&path);
    let keys = report_plan(year, config);

    let pages = match write_document(&partial, &keys, year, config, on_table) {
        Ok(pages) => pages,
        Err(err) => {
            if let Err(remove_err) = fs::remove_file(&partial) {
                debug!("Could not remove '{}': {}", partial.display(), remove_err);
            }
            return Err(err);
        }
    };

    fs::rename(&partial, &path).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    info!("Wrote {} pages to '{}'", pages, path.display());

    Ok(ReportSummary {
        path,
        tables: keys.len(),
        pages,
    })
}

/// Writes every table's pages to `path`, returning the page count.
fn write_document<F>(
    path: &Path,
    keys: &[SummaryKey],
    year: u32,
    config: &ReportConfig,
    mut on_table: F,
) -> Result<usize, ReportError>
where
    F: FnMut(&SummaryKey),
{
    let file = create_output(path)?;
    let mut writer = PdfWriter::new(BufWriter::new(file))?;

    for key in keys {
        let pages = table_pages(key, year, config)?;
        let rasters = render_pages(&pages, config.page_width, config.page_height)?;
        for raster in &rasters {
            writer.add_page(raster)?;
        }
        on_table(key);
    }

    let pages = writer.page_count();
    writer.finish()?;
    Ok(pages)
}

/// Sibling of the report the document is written to before being moved into place.
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

fn create_output(path: &Path) -> Result<File, ReportError> {
    let io_error = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    File::create(path).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        region::RegionType,
        summary::test_helpers::{csv, gzip, row},
    };

    fn write_summary(dir: &Path, key: &SummaryKey) -> std::io::Result<()> {
        let text = csv(&[
            row("11460", 1200, 344791, 0, "0.25"),
            row("99999", 300, 0, 15000, "0.5"),
        ]);
        fs::write(dir.join(key.file_name()), gzip(&text))
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name(2010), "segregation_2010.pdf");
    }

    #[test]
    fn test_report_plan_follows_config() {
        let config = ReportConfig {
            region_types: vec![RegionType::BlockGroup, RegionType::CountySubdivision],
            buffer_sizes: vec![65000],
            ..ReportConfig::default()
        };
        let keys = report_plan(2000, &config);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].buffer, Some(65000));
        assert_eq!(keys[1].region, RegionType::CountySubdivision);
    }

    #[test]
    fn test_table_pages_reads_from_data_dir() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = ReportConfig {
            data_dir: dir.path().to_path_buf(),
            ..ReportConfig::default()
        };
        let key = report_plan(2010, &config)[0];
        write_summary(dir.path(), &key)?;

        let pages = table_pages(&key, 2010, &config)?;
        assert_eq!(pages.len(), 22);
        Ok(())
    }

    #[test]
    fn test_missing_summary_propagates() {
        let config = ReportConfig {
            data_dir: PathBuf::from("does/not/exist"),
            ..ReportConfig::default()
        };
        let key = report_plan(2010, &config)[0];
        assert!(matches!(
            table_pages(&key, 2010, &config),
            Err(ReportError::Summary(SummaryError::Io { .. }))
        ));
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("out/segregation_2010.pdf")),
            PathBuf::from("out/segregation_2010.pdf.partial")
        );
    }

    #[test]
    fn test_failed_run_keeps_previous_report() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = ReportConfig {
            data_dir: dir.path().join("missing"),
            output_dir: dir.path().to_path_buf(),
            ..ReportConfig::default()
        };
        let report = dir.path().join(output_file_name(2010));
        fs::write(&report, b"%PDF-1.4 previous report")?;

        let result = generate_report(2010, &config, |_| {});
        assert!(matches!(
            result,
            Err(ReportError::Summary(SummaryError::Io { .. }))
        ));
        assert_eq!(fs::read(&report)?, b"%PDF-1.4 previous report");
        assert!(!partial_path(&report).exists());
        Ok(())
    }

    #[test]
    #[ignore = "requires a system sans-serif font"]
    fn test_generate_report() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = ReportConfig {
            data_dir: dir.path().to_path_buf(),
            output_dir: dir.path().join("out"),
            region_types: vec![RegionType::Tract],
            buffer_sizes: vec![25000],
            page_width: 320,
            page_height: 240,
            ..ReportConfig::default()
        };
        for key in report_plan(2010, &config) {
            write_summary(dir.path(), &key)?;
        }

        let mut seen = Vec::new();
        let summary = generate_report(2010, &config, |key| seen.push(*key))?;
        assert_eq!(summary.tables, 1);
        assert_eq!(summary.pages, 21);
        assert_eq!(seen.len(), 1);
        assert!(fs::read(&summary.path)?.starts_with(b"%PDF-"));
        assert!(!partial_path(&summary.path).exists());
        Ok(())
    }
}
