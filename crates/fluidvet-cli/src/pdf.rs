//! PDF session report via `printpdf`. One paragraph per reevaluation.

use std::io::BufWriter;

use anyhow::{anyhow, Result};
use printpdf::*;

use fluidvet_core::export::{plan_report, record_paragraph};
use fluidvet_core::ClinicalSession;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const TOP: Mm = Mm(280.0);
const BOTTOM: Mm = Mm(20.0);

/// Writes lines top to bottom, starting a new page when the current one is full.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: Mm,
}

impl PageWriter<'_> {
    fn line(&mut self, text: &str, size: f32, bold: bool, indent: f32) {
        if self.y.0 < BOTTOM.0 {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP;
        }
        let font = if bold { &self.bold } else { &self.font };
        self.layer
            .use_text(pdf_safe(text), size, Mm(20.0 + indent), self.y, font);
        self.y -= Mm(size * 0.5);
    }

    fn gap(&mut self, mm: f32) {
        self.y -= Mm(mm);
    }
}

/// Render the plan, warnings and every reevaluation. Returns PDF bytes.
pub fn session_pdf(session: &ClinicalSession) -> Result<Vec<u8>> {
    let title = "Fluid Therapy Plan";
    let (doc, page1, layer1) = PdfDocument::new(title, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("PDF font error: {e}"))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("PDF font error: {e}"))?;

    let mut writer = PageWriter {
        doc: &doc,
        layer,
        font,
        bold,
        y: TOP,
    };

    writer.line(title, 14.0, true, 0.0);
    writer.line(
        &format!("Session {} started {}", session.session_id, session.created_at),
        8.0,
        false,
        0.0,
    );
    writer.gap(4.0);

    let report = plan_report(session.request(), session.plan(), &session.warnings());
    for line in report.lines().skip(1) {
        if line.is_empty() {
            writer.gap(3.0);
        } else if line.chars().all(|c| !c.is_lowercase()) {
            writer.line(line, 11.0, true, 0.0);
        } else {
            writer.line(line, 9.0, false, 5.0);
        }
    }

    let history = session.history();
    if !history.is_empty() {
        writer.gap(6.0);
        writer.line(
            &format!("REEVALUATIONS (peak risk: {})", history.peak_risk()),
            11.0,
            true,
            0.0,
        );
        for record in history {
            for line in wrap_text(&record_paragraph(record), 95) {
                writer.line(&line, 9.0, false, 5.0);
            }
            writer.gap(2.0);
        }
    }

    drop(writer);
    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| anyhow!("PDF save error: {e}"))?;
    buf.into_inner()
        .map_err(|e| anyhow!("PDF buffer error: {e}"))
}

/// Builtin PDF fonts only cover WinAnsi; spell out arrows and minus signs.
fn pdf_safe(text: &str) -> String {
    text.replace('→', "->").replace('−', "-")
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
