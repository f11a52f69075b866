//! Minimal PDF writer for raster pages.
//!
//! Each page holds a single RGB image XObject compressed with `FlateDecode`,
//! scaled to fill the page at 96 DPI. Objects are streamed as pages are
//! added; the page tree, catalog and cross-reference table are written by
//! [`PdfWriter::finish`].
//!
//! Object numbering is fixed: `1` is the catalog, `2` the page tree and each
//! page `n` (from zero) owns objects `3 + 3n` (page), `4 + 3n` (content) and
//! `5 + 3n` (image).

use crate::plot::RasterPage;
use flate2::{write::ZlibEncoder, Compression};
use std::io::{self, Write};

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const POINTS_PER_PIXEL: f64 = 72.0 / 96.0;

#[derive(thiserror::Error, Debug)]
pub enum PdfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Page buffer holds {actual} bytes, expected {expected} for {width}x{height} RGB")]
    InvalidRaster {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Counts bytes written so object offsets can be recorded.
struct CountingWriter<W: Write> {
    inner: W,
    written: usize,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

pub struct PdfWriter<W: Write> {
    out: CountingWriter<W>,
    /// Byte offset of every object, indexed by object id - 1.
    offsets: Vec<usize>,
    page_ids: Vec<usize>,
}

impl<W: Write> PdfWriter<W> {
    /// Writes the file header.
    pub fn new(inner: W) -> Result<Self, PdfError> {
        let mut out = CountingWriter { inner, written: 0 };
        // The binary comment marks the file as containing 8 bit data.
        out.write_all(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n")?;
        Ok(Self {
            out,
            offsets: vec![0; 2],
            page_ids: Vec::new(),
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Appends one page showing the raster.
    pub fn add_page(&mut self, page: &RasterPage) -> Result<(), PdfError> {
        let expected = page.width as usize * page.height as usize * 3;
        if page.rgb.len() != expected {
            return Err(PdfError::InvalidRaster {
                width: page.width,
                height: page.height,
                expected,
                actual: page.rgb.len(),
            });
        }

        let page_id = 3 + 3 * self.page_ids.len();
        let content_id = page_id + 1;
        let image_id = page_id + 2;
        let width_pt = page.width as f64 * POINTS_PER_PIXEL;
        let height_pt = page.height as f64 * POINTS_PER_PIXEL;

        self.begin_object(page_id)?;
        write!(
            self.out,
            "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {width_pt:.2} {height_pt:.2}] \
/Resources << /XObject << /Im0 {image_id} 0 R >> >> /Contents {content_id} 0 R >>\nendobj\n"
        )?;

        let content = format!("q {width_pt:.2} 0 0 {height_pt:.2} 0 0 cm /Im0 Do Q\n");
        self.begin_object(content_id)?;
        write!(self.out, "<< /Length {} >>\nstream\n", content.len())?;
        self.out.write_all(content.as_bytes())?;
        self.out.write_all(b"endstream\nendobj\n")?;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&page.rgb)?;
        let compressed = encoder.finish()?;

        self.begin_object(image_id)?;
        write!(
            self.out,
            "<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB \
/BitsPerComponent 8 /Filter /FlateDecode /Length {} >>\nstream\n",
            page.width,
            page.height,
            compressed.len()
        )?;
        self.out.write_all(&compressed)?;
        self.out.write_all(b"\nendstream\nendobj\n")?;

        self.page_ids.push(page_id);
        Ok(())
    }

    /// Writes the page tree, catalog, cross-reference table and trailer.
    pub fn finish(mut self) -> Result<W, PdfError> {
        let kids = self
            .page_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");

        self.begin_object(PAGES_ID)?;
        write!(
            self.out,
            "<< /Type /Pages /Kids [{kids}] /Count {} >>\nendobj\n",
            self.page_ids.len()
        )?;

        self.begin_object(CATALOG_ID)?;
        write!(
            self.out,
            "<< /Type /Catalog /Pages {PAGES_ID} 0 R >>\nendobj\n"
        )?;

        let xref_offset = self.out.written;
        write!(self.out, "xref\n0 {}\n", self.offsets.len() + 1)?;
        self.out.write_all(b"0000000000 65535 f \n")?;
        for offset in &self.offsets {
            write!(self.out, "{offset:010} 00000 n \n")?;
        }
        write!(
            self.out,
            "trailer\n<< /Size {} /Root {CATALOG_ID} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            self.offsets.len() + 1
        )?;
        self.out.flush()?;

        Ok(self.out.inner)
    }

    fn begin_object(&mut self, id: usize) -> Result<(), PdfError> {
        if self.offsets.len() < id {
            self.offsets.resize(id, 0);
        }
        self.offsets[id - 1] = self.out.written;
        write!(self.out, "{id} 0 obj\n")?;
        Ok(())
    }
}
