//! PDF export of an analysis.
//!
//! Layout is expressed in millimetres from the top-left corner of an A4 page
//! and converted to PDF points when drawn.

pub mod encoding;
mod pdf;

use std::path::Path;

use campaign_core::{AnalysisResult, CampaignError, CampaignResult, StageOutcome};
use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::{debug, error};

use encoding::{encode, text_width, Face};
use pdf::{PageContent, PAGE_HEIGHT_PT};

/// Title printed at the top of the first page.
pub const REPORT_TITLE: &str = "Rapport d'Analyse Marketing";

/// Points per millimetre.
const K: f64 = 72.0 / 25.4;

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN: f64 = 10.0;
const CELL_MARGIN: f64 = 1.0;
const BREAK_AT: f64 = PAGE_HEIGHT - MARGIN - 10.0;

const LOGO_X: f64 = 10.0;
const LOGO_Y: f64 = 8.0;
const LOGO_WIDTH: f64 = 40.0;
/// Embedded logos are downscaled to this many pixels wide.
const LOGO_MAX_PIXELS: u32 = 240;

const TITLE_SIZE: f64 = 16.0;
const TITLE_Y: f64 = 10.0;
const BODY_TOP: f64 = 30.0;
const BODY_SIZE: f64 = 12.0;
const LINE_HEIGHT: f64 = 10.0;

/// Writes analysis text to a paginated A4 PDF.
#[derive(Debug, Clone, Default)]
pub struct ReportExporter {
    logo: Option<RgbImage>,
}

impl ReportExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print a logo in the top-left corner of the first page.
    pub fn with_logo(mut self, logo: RgbImage) -> Self {
        let logo = if logo.width() > LOGO_MAX_PIXELS {
            let height = (logo.height() * LOGO_MAX_PIXELS / logo.width()).max(1);
            imageops::resize(&logo, LOGO_MAX_PIXELS, height, FilterType::Triangle)
        } else {
            logo
        };
        self.logo = Some(logo);
        self
    }

    /// Build the document. The output depends only on `text` and the logo.
    pub fn render(&self, text: &str) -> CampaignResult<Vec<u8>> {
        if text.trim().is_empty() {
            return Err(CampaignError::render("aucun texte à exporter"));
        }

        let mut pages = vec![PageContent::default()];
        self.draw_header(&mut pages[0]);

        let mut y = BODY_TOP;
        let max_width = (PAGE_WIDTH - 2.0 * MARGIN - 2.0 * CELL_MARGIN) * K;
        for paragraph in text.split('\n') {
            for line in wrap(&encode(paragraph), max_width, Face::Regular, BODY_SIZE) {
                if y + LINE_HEIGHT > BREAK_AT {
                    pages.push(PageContent::default());
                    y = MARGIN;
                }
                if let Some(page) = pages.last_mut() {
                    page.text(
                        "F1",
                        BODY_SIZE,
                        (MARGIN + CELL_MARGIN) * K,
                        baseline(y, LINE_HEIGHT, BODY_SIZE),
                        &line,
                    );
                }
                y += LINE_HEIGHT;
            }
        }

        debug!(pages = pages.len(), logo = self.logo.is_some(), "Report laid out");
        Ok(pdf::assemble(&pages, self.logo.as_ref()))
    }

    /// Build the document, turning failures into a user-facing outcome.
    pub fn export(&self, text: &str) -> StageOutcome<Vec<u8>> {
        match self.render(text) {
            Ok(bytes) => StageOutcome::Success(bytes),
            Err(e) => {
                error!(error = %e, "PDF export failed");
                StageOutcome::failed(format!("Erreur lors de la création du PDF : {}", e))
            }
        }
    }

    /// Build the document and write it to `path`.
    pub fn export_to(&self, text: &str, path: &Path) -> CampaignResult<()> {
        let bytes = self.render(text)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn draw_header(&self, page: &mut PageContent) {
        if let Some(logo) = &self.logo {
            let height = LOGO_WIDTH * f64::from(logo.height()) / f64::from(logo.width());
            page.image(
                LOGO_X * K,
                (PAGE_HEIGHT - LOGO_Y - height) * K,
                LOGO_WIDTH * K,
                height * K,
            );
        }

        let title = encode(REPORT_TITLE);
        let width = text_width(&title, Face::Bold, TITLE_SIZE) / K;
        page.text(
            "F2",
            TITLE_SIZE,
            (PAGE_WIDTH / 2.0 - width / 2.0) * K,
            baseline(TITLE_Y, LINE_HEIGHT, TITLE_SIZE),
            &title,
        );
    }
}

/// Text of the report for an analysis: the main text, then the premium
/// insights when present.
pub fn report_text(result: &AnalysisResult) -> String {
    match &result.premium_text {
        Some(premium) => format!(
            "{}\n\nInsights Premium\n\n{}",
            result.generated_text, premium
        ),
        None => result.generated_text.clone(),
    }
}

/// Baseline in points for a cell at `y` mm, text vertically centered.
fn baseline(y: f64, height: f64, size: f64) -> f64 {
    PAGE_HEIGHT_PT - (y + 0.5 * height + 0.3 * size / K) * K
}

/// Greedy word wrap on encoded bytes. Words wider than a line are split by
/// character. An empty paragraph yields one empty line.
fn wrap(bytes: &[u8], max_width: f64, face: Face, size: f64) -> Vec<Vec<u8>> {
    let fits = |line: &[u8]| text_width(line, face, size) <= max_width;
    let mut lines = Vec::new();
    let mut current: Vec<u8> = Vec::new();

    for word in bytes.split(|b| *b == b' ') {
        let mut candidate = current.clone();
        if !candidate.is_empty() {
            candidate.push(b' ');
        }
        candidate.extend_from_slice(word);
        if fits(&candidate) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if fits(word) {
            current = word.to_vec();
            continue;
        }
        for &b in word {
            current.push(b);
            if !fits(&current) && current.len() > 1 {
                current.pop();
                lines.push(std::mem::replace(&mut current, vec![b]));
            }
        }
    }
    lines.push(current);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    const SAMPLE: &str = "## Analyse\n\nLe ROI élevé et un CPA optimisé pour 15\u{a0}000 €.\n\n- Point 1\n- Point 2";

    #[test]
    fn test_export_is_byte_identical() {
        let exporter = ReportExporter::new();
        let first = exporter.render(SAMPLE).unwrap();
        let second = exporter.render(SAMPLE).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with(b"%PDF-1.4"));
        assert!(first.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn test_title_and_body_present() {
        let pdf = ReportExporter::new().render(SAMPLE).unwrap();
        assert_eq!(count(&pdf, REPORT_TITLE.as_bytes()), 1);
        assert_eq!(count(&pdf, b"/BaseFont /Helvetica-Bold"), 1);
        // NBSP became a plain space, the euro sign is WinAnsi 0x80.
        assert_eq!(count(&pdf, b"15 000 \x80."), 1);
    }

    #[test]
    fn test_unencodable_characters_become_question_marks() {
        let pdf = ReportExporter::new().render("Objectif 🚀 atteint").unwrap();
        assert_eq!(count(&pdf, b"(Objectif ? atteint)"), 1);
    }

    #[test]
    fn test_long_text_spans_pages() {
        let text = (0..80)
            .map(|i| format!("Ligne {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let pdf = ReportExporter::new().render(&text).unwrap();
        // 24 lines fit on the first page, 26 on the next ones.
        assert_eq!(count(&pdf, b"/Type /Page /Parent"), 4);
        assert_eq!(count(&pdf, b"/Count 4"), 1);
    }

    #[test]
    fn test_logo_is_embedded_downscaled() {
        let logo = RgbImage::from_pixel(600, 300, image::Rgb([1, 2, 3]));
        let pdf = ReportExporter::new().with_logo(logo).render(SAMPLE).unwrap();
        assert_eq!(count(&pdf, b"/Subtype /Image /Width 240 /Height 120"), 1);
        assert_eq!(count(&pdf, b"/Im1 Do"), 1);
    }

    #[test]
    fn test_empty_text_is_a_failed_outcome() {
        let outcome = ReportExporter::new().export("   ");
        assert!(matches!(outcome, StageOutcome::Failed { .. }));
    }

    #[test]
    fn test_wrapped_lines_fit_width() {
        let max = 100.0;
        let text = encode(&"campagne rentable ".repeat(30));
        let lines = wrap(&text, max, Face::Regular, BODY_SIZE);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, Face::Regular, BODY_SIZE) <= max);
        }
        let rejoined: Vec<u8> = lines.join(&b' ');
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_overlong_word_is_split() {
        let word = vec![b'W'; 40];
        let lines = wrap(&word, 60.0, Face::Regular, BODY_SIZE);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_empty_paragraph_is_blank_line() {
        assert_eq!(wrap(b"", 100.0, Face::Regular, BODY_SIZE), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rapport_mode.pdf");
        ReportExporter::new().export_to(SAMPLE, &path).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }
}
