//! Chat transcript export to PDF.

use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex, PdfPageIndex};
use tracing::info;

use crate::error::ExportError;
use crate::models::chat::{transcript, ChatMessage};

// A4 dimensions (mm)
const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 20.0;
const FONT_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 14.0;
const LINE_H: f32 = 5.0;
const WRAP_COLUMNS: usize = 95;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

struct TranscriptWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    current_page: PdfPageIndex,
    current_layer: PdfLayerIndex,
    y: f32,
}

impl TranscriptWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Render(format!("{e:?}")))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Render(format!("{e:?}")))?;
        Ok(Self {
            doc,
            font,
            font_bold,
            current_page: page,
            current_layer: layer,
            y: MARGIN,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer");
        self.current_page = page;
        self.current_layer = layer;
        self.y = MARGIN;
    }

    fn text(&mut self, s: &str, size: f32, bold: bool) {
        if self.y + LINE_H > PAGE_H - MARGIN {
            self.new_page();
        }
        let font = if bold { &self.font_bold } else { &self.font };
        self.doc
            .get_page(self.current_page)
            .get_layer(self.current_layer)
            .use_text(s, size, Mm(MARGIN), Mm(PAGE_H - self.y), font);
        self.y += LINE_H;
    }

    fn title(&mut self, title: &str) {
        self.text(title, TITLE_SIZE, true);
        let ts = chrono::Local::now().format("Exported %Y-%m-%d %H:%M").to_string();
        self.text(&ts, 8.0, false);
        self.y += LINE_H;
    }

    fn paragraph(&mut self, line: &str) {
        if line.trim().is_empty() {
            self.y += LINE_H;
            return;
        }
        for wrapped in textwrap::wrap(line, WRAP_COLUMNS) {
            self.text(&wrapped, FONT_SIZE, false);
        }
    }

    fn to_bytes(self) -> Result<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| ExportError::Render(format!("{e:?}")))?;
        buf.into_inner().map_err(|e| ExportError::Render(e.to_string()))
    }
}

/// Built-in PDF fonts only cover Latin-1.
fn printable(line: &str) -> String {
    line.replace('₹', "Rs.")
        .chars()
        .map(|c| if c == '\t' || (c as u32) < 0x100 { c } else { '?' })
        .collect()
}

/// Lay a plain-text transcript out on A4 pages.
pub fn render_transcript_pdf(title: &str, transcript: &str) -> Result<Vec<u8>> {
    let mut pdf = TranscriptWriter::new(title)?;
    pdf.title(&printable(title));
    for line in transcript.lines() {
        pdf.paragraph(&printable(line));
    }
    pdf.to_bytes()
}

/// Render `history` and write it to `path`, replacing any existing file.
pub fn export_transcript(title: &str, history: &[ChatMessage], path: &Path) -> Result<()> {
    let bytes = render_transcript_pdf(title, &transcript(history))?;
    std::fs::write(path, &bytes).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    info!("Exported {} messages to {}", history.len(), path.display());
    Ok(())
}
