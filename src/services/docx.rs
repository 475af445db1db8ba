//! Minimal DOCX writer.
//!
//! A .docx file is a ZIP package whose text lives in
//! `word/document.xml` as WordprocessingML. This writer assembles that
//! package directly: paragraphs, headings, page breaks, page geometry, and a
//! footer carrying a dynamic PAGE field. ZIP entries use a fixed timestamp so
//! the same input always produces the same bytes.

use std::io::{Cursor, Write};

use anyhow::Result;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const TWIPS_PER_INCH: f64 = 1440.0;
const SERIF_FONT: &str = "Times New Roman";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Justified,
}

impl Alignment {
    fn as_val(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Justified => "both",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParagraphStyle {
    pub size_pt: u32,
    pub bold: bool,
    pub alignment: Alignment,
    /// Space after the paragraph, in points.
    pub spacing_after_pt: u32,
}

pub struct DocxWriter {
    body: String,
    page_width: u32,
    page_height: u32,
    margin: u32,
}

impl DocxWriter {
    pub fn new() -> Self {
        DocxWriter {
            body: String::new(),
            // US Letter with one-inch margins until told otherwise.
            page_width: 12240,
            page_height: 15840,
            margin: 1440,
        }
    }

    /// Page size and uniform margins, in inches.
    pub fn set_page_geometry(&mut self, width_in: f64, height_in: f64, margin_in: f64) {
        self.page_width = (width_in * TWIPS_PER_INCH).round() as u32;
        self.page_height = (height_in * TWIPS_PER_INCH).round() as u32;
        self.margin = (margin_in * TWIPS_PER_INCH).round() as u32;
    }

    pub fn add_paragraph(&mut self, text: &str, style: &ParagraphStyle) {
        let bold = if style.bold { "<w:b/>" } else { "" };
        let half_points = style.size_pt * 2;
        let spacing = style.spacing_after_pt * 20;
        self.body.push_str(&format!(
            "<w:p><w:pPr><w:jc w:val=\"{align}\"/><w:spacing w:after=\"{spacing}\"/></w:pPr>\
             <w:r><w:rPr><w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\"/>{bold}\
             <w:sz w:val=\"{half_points}\"/><w:szCs w:val=\"{half_points}\"/></w:rPr>\
             <w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p>",
            align = style.alignment.as_val(),
            font = SERIF_FONT,
            text = xml_escape(text),
        ));
    }

    /// Heading paragraph: bold 12pt serif, tagged with the Heading{level}
    /// style.
    pub fn add_heading(&mut self, text: &str, level: u8) {
        self.body.push_str(&format!(
            "<w:p><w:pPr><w:pStyle w:val=\"Heading{level}\"/><w:spacing w:after=\"0\"/></w:pPr>\
             <w:r><w:rPr><w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\"/><w:b/>\
             <w:sz w:val=\"24\"/><w:szCs w:val=\"24\"/></w:rPr>\
             <w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p>",
            font = SERIF_FONT,
            text = xml_escape(text),
        ));
    }

    pub fn add_page_break(&mut self) {
        self.body
            .push_str("<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>");
    }

    /// Finishes the package and returns the DOCX bytes.
    pub fn save(self) -> Result<Vec<u8>> {
        let document = format!(
            "{XML_DECL}\
             <w:document xmlns:w=\"{NS_MAIN}\" xmlns:r=\"{NS_REL}\"><w:body>{body}\
             <w:sectPr><w:footerReference w:type=\"default\" r:id=\"rId2\"/>\
             <w:pgSz w:w=\"{width}\" w:h=\"{height}\"/>\
             <w:pgMar w:top=\"{margin}\" w:right=\"{margin}\" w:bottom=\"{margin}\" \
w:left=\"{margin}\" w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/>\
             </w:sectPr></w:body></w:document>",
            body = self.body,
            width = self.page_width,
            height = self.page_height,
            margin = self.margin,
        );

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        for (name, content) in [
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", PACKAGE_RELS),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS),
            ("word/document.xml", document.as_str()),
            ("word/styles.xml", STYLES),
            ("word/footer1.xml", FOOTER),
        ] {
            zip.start_file(name, options)?;
            zip.write_all(content.as_bytes())?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn xml_escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>";
const NS_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
<Override PartName=\"/word/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>\
<Override PartName=\"/word/footer1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml\"/>\
</Types>";

const PACKAGE_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
</Relationships>";

const DOCUMENT_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>\
<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer\" Target=\"footer1.xml\"/>\
</Relationships>";

const STYLES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<w:styles xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
<w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\"><w:name w:val=\"Normal\"/>\
<w:rPr><w:rFonts w:ascii=\"Times New Roman\" w:hAnsi=\"Times New Roman\"/></w:rPr></w:style>\
<w:style w:type=\"paragraph\" w:styleId=\"Heading1\"><w:name w:val=\"heading 1\"/><w:basedOn w:val=\"Normal\"/></w:style>\
<w:style w:type=\"paragraph\" w:styleId=\"Heading2\"><w:name w:val=\"heading 2\"/><w:basedOn w:val=\"Normal\"/></w:style>\
</w:styles>";

// Centered footer whose page number is a live PAGE field, re-evaluated per
// page by the reader.
const FOOTER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<w:ftr xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr>\
<w:r><w:fldChar w:fldCharType=\"begin\"/></w:r>\
<w:r><w:instrText xml:space=\"preserve\"> PAGE </w:instrText></w:r>\
<w:r><w:fldChar w:fldCharType=\"separate\"/></w:r>\
<w:r><w:t>1</w:t></w:r>\
<w:r><w:fldChar w:fldCharType=\"end\"/></w:r>\
</w:p></w:ftr>";
