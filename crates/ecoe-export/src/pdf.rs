//! Printable evaluation report.
//!
//! A4 portrait, built top-down with a y cursor and an explicit page break
//! once the cursor crosses the bottom limit. The treatment plan is left
//! out on purpose: the report may be handed to the examinee, and the
//! expected management belongs to the instructor guide only.

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use tracing::info;

use ecoe_core::models::case::ClinicalCase;
use ecoe_core::models::evaluation::{ChecklistStatus, EvaluationState};
use ecoe_core::models::student::Student;

use crate::error::ExportError;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN_LEFT: Mm = Mm(14.0);
const TOP_START: Mm = Mm(18.0);
/// Cursor position (from the top) past which a new page is started.
const BOTTOM_LIMIT: Mm = Mm(270.0);

/// Wrap width, in characters, for full-width body text at 10pt.
const BODY_WRAP: usize = 96;
/// Wrap width for the checklist item column.
const ITEM_WRAP: usize = 58;

// Checklist table column offsets.
const COL_CATEGORY: Mm = Mm(14.0);
const COL_ITEM: Mm = Mm(52.0);
const COL_STATUS: Mm = Mm(168.0);

/// Build the full report as PDF bytes.
pub fn generate_report(
    student: &Student,
    case: &ClinicalCase,
    evaluation: &EvaluationState,
) -> Result<Vec<u8>, ExportError> {
    let mut writer = ReportWriter::new("Evaluación de Estación Clínica (ECOE)")?;

    writer.line("Evaluación de Estación Clínica (ECOE)", TextStyle::Title);
    writer.gap();
    writer.line(
        &format!("Estudiante: {} ({})", student.name, student.id),
        TextStyle::Body,
    );
    writer.line(
        &format!("Caso: {} ({})", case.topic, case.specialty),
        TextStyle::Body,
    );
    writer.line(
        &format!("Fecha: {}", evaluation.finished_at.strftime("%Y-%m-%d %H:%M")),
        TextStyle::Body,
    );
    writer.line(
        &format!(
            "Calificación Final: {:.1} / {:.1}",
            evaluation.score, evaluation.max_score
        ),
        TextStyle::BodyBold,
    );

    writer.section("Resumen del Caso", &case.student_instructions.case_summary);
    writer.section("Enfermedad Actual (HPI)", &case.teacher_guide.hpi);
    writer.section("Examen Físico", &case.teacher_guide.physical_exam);
    writer.section("Diagnóstico", &case.teacher_guide.diagnosis);

    if let Some(note) = evaluation.teacher_note.as_deref() {
        writer.section("Nota del Docente", note);
    }

    writer.section("Comentarios Generales (IA)", &evaluation.feedback);
    writer.bullet_section("Fortalezas", &evaluation.strengths);
    writer.bullet_section("Áreas a Mejorar", &evaluation.weaknesses);

    writer.checklist_table(case, evaluation);

    let bytes = writer.finish()?;
    info!(student = %student.name, bytes = bytes.len(), "evaluation report generated");
    Ok(bytes)
}

/// Download filename for a student's report. Whitespace runs in the name
/// become single underscores.
pub fn report_filename(student_name: &str) -> String {
    let name = student_name.split_whitespace().collect::<Vec<_>>().join("_");
    format!("Evaluacion_{name}.pdf")
}

/// Printed label for a checklist outcome.
pub fn status_label(status: ChecklistStatus) -> &'static str {
    match status {
        ChecklistStatus::Full => "SÍ (1.0)",
        ChecklistStatus::Partial => "PARCIAL (0.5)",
        ChecklistStatus::None => "NO",
    }
}

/// Greedy word wrap by character count. Words longer than `max_chars` get
/// a line of their own rather than being split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[derive(Clone, Copy)]
enum TextStyle {
    Title,
    Heading,
    Body,
    BodyBold,
    Cell,
    CellBold,
}

struct ReportWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Cursor, measured down from the top of the current page.
    y: Mm,
}

impl ReportWriter {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page, layer) = PdfDocument::new(title, PAGE_WIDTH, PAGE_HEIGHT, "Capa 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: TOP_START,
        })
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| ExportError::Pdf(e.to_string()))
    }

    /// Start a fresh page if `lines` more body lines would cross the
    /// bottom limit.
    fn ensure_space(&mut self, lines: usize) {
        let needed = lines as f64 * 5.0;
        if f64::from(self.y.0) + needed > f64::from(BOTTOM_LIMIT.0) {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Capa 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP_START;
        }
    }

    /// Write one line at the left margin and advance the cursor.
    fn line(&mut self, text: &str, style: TextStyle) {
        self.ensure_space(1);
        self.put(text, MARGIN_LEFT, style);
        self.advance(style);
    }

    /// Write text at an arbitrary x without moving the cursor.
    fn put(&self, text: &str, x: Mm, style: TextStyle) {
        let (font, size) = match style {
            TextStyle::Title => (&self.bold, 16.0),
            TextStyle::Heading => (&self.bold, 12.0),
            TextStyle::Body => (&self.regular, 10.0),
            TextStyle::BodyBold => (&self.bold, 10.0),
            TextStyle::Cell => (&self.regular, 9.0),
            TextStyle::CellBold => (&self.bold, 9.0),
        };
        self.layer
            .use_text(text, size, x, Mm(PAGE_HEIGHT.0 - self.y.0), font);
    }

    fn advance(&mut self, style: TextStyle) {
        self.y.0 += match style {
            TextStyle::Title => 9.0,
            TextStyle::Heading => 7.0,
            _ => 5.0,
        };
    }

    fn gap(&mut self) {
        self.y.0 += 3.0;
    }

    /// A heading followed by wrapped body text; empty content prints as
    /// "N/A".
    fn section(&mut self, heading: &str, body: &str) {
        self.gap();
        self.ensure_space(3);
        self.line(heading, TextStyle::Heading);
        let body = if body.trim().is_empty() { "N/A" } else { body };
        for wrapped in wrap_text(body, BODY_WRAP) {
            self.line(&wrapped, TextStyle::Body);
        }
    }

    /// A heading followed by "- " bullets; an empty list prints as "N/A".
    fn bullet_section(&mut self, heading: &str, items: &[String]) {
        self.gap();
        self.ensure_space(3);
        self.line(heading, TextStyle::Heading);
        if items.is_empty() {
            self.line("N/A", TextStyle::Body);
            return;
        }
        for item in items {
            for (i, wrapped) in wrap_text(item, BODY_WRAP - 2).into_iter().enumerate() {
                if i == 0 {
                    self.line(&format!("- {wrapped}"), TextStyle::Body);
                } else {
                    self.line(&format!("  {wrapped}"), TextStyle::Body);
                }
            }
        }
    }

    fn checklist_table(&mut self, case: &ClinicalCase, evaluation: &EvaluationState) {
        self.gap();
        self.ensure_space(3);
        self.line("Lista de Chequeo", TextStyle::Heading);

        self.ensure_space(2);
        self.put("Categoría", COL_CATEGORY, TextStyle::CellBold);
        self.put("Ítem Evaluado", COL_ITEM, TextStyle::CellBold);
        self.put("Realizado", COL_STATUS, TextStyle::CellBold);
        self.advance(TextStyle::CellBold);
        self.gap();

        for item in &case.checklist {
            let status = evaluation
                .checklist
                .get(&item.id)
                .copied()
                .unwrap_or(ChecklistStatus::None);
            let text_lines = wrap_text(&item.text, ITEM_WRAP);
            let row_height = text_lines.len().max(1);
            self.ensure_space(row_height);

            self.put(item.category.as_str(), COL_CATEGORY, TextStyle::Cell);
            self.put(status_label(status), COL_STATUS, TextStyle::Cell);
            if text_lines.is_empty() {
                self.advance(TextStyle::Cell);
            } else {
                for text_line in &text_lines {
                    self.put(text_line, COL_ITEM, TextStyle::Cell);
                    self.advance(TextStyle::Cell);
                }
            }
        }
    }
}
