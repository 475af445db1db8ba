//! Turns a manuscript into a styled, paginated DOCX buffer.

use crate::error::BookError;
use crate::models::{BookManuscript, Language};
use crate::services::docx::{Alignment, DocxWriter, ParagraphStyle};

/// MIME type of the rendered artifact.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const PAGE_WIDTH_IN: f64 = 5.5;
const PAGE_HEIGHT_IN: f64 = 8.5;
const MARGIN_IN: f64 = 0.8;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Space after each body paragraph, in points. Observed values: 0 or 6.
    pub paragraph_spacing_pt: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            paragraph_spacing_pt: 6,
        }
    }
}

/// Renders the manuscript. Reads a snapshot only; re-rendering the same
/// manuscript yields byte-identical output.
pub fn render(manuscript: &BookManuscript, options: &RenderOptions) -> Result<Vec<u8>, BookError> {
    if manuscript.title.trim().is_empty() {
        return Err(BookError::Render("manuscript has no title".to_string()));
    }
    if manuscript.chapters.is_empty() {
        return Err(BookError::Render("manuscript has no units".to_string()));
    }

    let language = manuscript.language;
    let mut doc = DocxWriter::new();
    doc.set_page_geometry(PAGE_WIDTH_IN, PAGE_HEIGHT_IN, MARGIN_IN);

    doc.add_paragraph(
        &format_title(&manuscript.title, language),
        &ParagraphStyle {
            size_pt: 14,
            bold: true,
            alignment: Alignment::Center,
            spacing_after_pt: 0,
        },
    );

    if let Some(author) = filled(&manuscript.author_name) {
        doc.add_paragraph(
            author,
            &ParagraphStyle {
                size_pt: 12,
                bold: false,
                alignment: Alignment::Center,
                spacing_after_pt: 0,
            },
        );
        doc.add_page_break();
    }

    let body_style = ParagraphStyle {
        size_pt: 11,
        bold: false,
        alignment: Alignment::Justified,
        spacing_after_pt: options.paragraph_spacing_pt,
    };

    if let Some(bio) = filled(&manuscript.author_bio) {
        let heading = match language {
            Language::English => "Author Information",
            Language::Spanish => "Información del autor",
        };
        doc.add_heading(heading, 2);
        doc.add_paragraph(bio, &body_style);
        doc.add_page_break();
    }

    for chapter in &manuscript.chapters {
        doc.add_heading(&format_title(&chapter.label, language), 1);
        for paragraph in split_paragraphs(&chapter.body) {
            doc.add_paragraph(&paragraph, &body_style);
        }
        doc.add_page_break();
    }

    doc.save().map_err(|e| BookError::Render(e.to_string()))
}

/// Casing rule for titles and headings.
///
/// English title-cases every word. Spanish sentence-cases: the first word is
/// capitalized, every other word is lowercased only when it is already all
/// lowercase and otherwise kept as written. No proper-noun detection.
pub fn format_title(text: &str, language: Language) -> String {
    let words = text.split_whitespace();
    let cased: Vec<String> = match language {
        Language::Spanish => words
            .enumerate()
            .map(|(i, word)| {
                if i == 0 {
                    capitalize_first(word)
                } else if word.chars().any(char::is_uppercase) {
                    word.to_string()
                } else {
                    word.to_lowercase()
                }
            })
            .collect(),
        Language::English => words.map(title_case_word).collect(),
    };
    cased.join(" ")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Blank-line-delimited paragraphs with embedded newlines collapsed to
/// single spaces.
fn split_paragraphs(body: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in body.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line.trim());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
