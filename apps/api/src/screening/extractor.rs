//! Text Extractor — converts uploaded resume bytes into normalized plain text.
//!
//! Pure transform over the input bytes. The caller owns the upload and any
//! temporary file behind it.

use std::collections::HashSet;
use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;
use thiserror::Error;

use super::contact::{EMAIL_RE, PHONE_RE};

/// Anything shorter is treated as a corrupt, empty, or placeholder document.
pub const MIN_EXTRACTED_CHARS: usize = 20;
/// Shortest text the validator accepts as a plausible resume.
pub const MIN_VALID_CHARS: usize = 50;
/// Distinct resume markers the validator requires.
pub const MIN_KEYWORD_MATCHES: usize = 3;

/// Shortest printable run kept when scraping legacy Word binaries.
const MIN_LEGACY_RUN: usize = 4;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

const RESUME_KEYWORDS: &[&str] = &[
    // section headers
    "experience",
    "education",
    "skills",
    "summary",
    "objective",
    "projects",
    "certifications",
    "employment",
    "achievements",
    "responsibilities",
    "references",
    "languages",
    "qualifications",
    // roles and credentials
    "engineer",
    "developer",
    "manager",
    "analyst",
    "designer",
    "consultant",
    "intern",
    "specialist",
    "university",
    "college",
    "degree",
    "bachelor",
    "master",
    // contact markers
    "email",
    "phone",
    "linkedin",
    "github",
    "address",
];

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file type '{0}'")]
    UnsupportedKind(String),

    #[error("text could not be extracted ({0})")]
    ExtractionFailed(String),

    #[error("extracted text does not look like a resume")]
    ContentImplausible,
}

/// Upload formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    /// Office Open XML (`.docx`).
    WordDocument,
    /// Legacy binary Word (`.doc`), handled best-effort.
    LegacyWordDocument,
}

impl DocumentKind {
    /// Resolves the kind from the declared content type, falling back to the
    /// file extension when the client sent a generic or missing type.
    pub fn from_upload(
        content_type: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<Self, ExtractionError> {
        let mime = content_type
            .map(|ct| ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
            .unwrap_or_default();

        match mime.as_str() {
            "application/pdf" => return Ok(DocumentKind::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                return Ok(DocumentKind::WordDocument)
            }
            "application/msword" => return Ok(DocumentKind::LegacyWordDocument),
            "text/plain" => return Ok(DocumentKind::PlainText),
            "" | "application/octet-stream" => {}
            other => return Err(ExtractionError::UnsupportedKind(other.to_string())),
        }

        let extension = file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::WordDocument),
            "doc" => Ok(DocumentKind::LegacyWordDocument),
            "txt" | "text" => Ok(DocumentKind::PlainText),
            "" => Err(ExtractionError::UnsupportedKind("unknown".to_string())),
            other => Err(ExtractionError::UnsupportedKind(format!(".{other}"))),
        }
    }
}

/// Normalized resume text plus the validator's verdict.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedDocument {
    pub text: String,
    pub is_valid: bool,
}

/// Extracts, normalizes, and validates the text of one uploaded document.
///
/// Fails with `ExtractionFailed` when the format cannot be parsed or when the
/// normalized text is shorter than `MIN_EXTRACTED_CHARS`, whatever the kind.
pub fn extract(bytes: &[u8], kind: DocumentKind) -> Result<ExtractedDocument, ExtractionError> {
    let raw = match kind {
        DocumentKind::PlainText => String::from_utf8_lossy(bytes).into_owned(),
        DocumentKind::Pdf => extract_pdf_text(bytes)?,
        DocumentKind::WordDocument => extract_docx_text(bytes)?,
        DocumentKind::LegacyWordDocument => extract_legacy_doc_text(bytes)?,
    };

    let text = normalize_text(&raw);
    let length = text.chars().count();
    if length < MIN_EXTRACTED_CHARS {
        return Err(ExtractionError::ExtractionFailed(format!(
            "only {length} characters of text found"
        )));
    }

    let is_valid = validate_content(&text);
    Ok(ExtractedDocument { text, is_valid })
}

/// Collapses whitespace runs within each line to single spaces, collapses
/// runs of blank lines to one, and trims the result.
pub fn normalize_text(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = true;

    for line in raw.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !previous_blank {
                lines.push(String::new());
            }
            previous_blank = true;
        } else {
            lines.push(collapsed);
            previous_blank = false;
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// True when the text is long enough and carries enough resume markers.
pub fn validate_content(text: &str) -> bool {
    text.chars().count() >= MIN_VALID_CHARS && keyword_matches(text) >= MIN_KEYWORD_MATCHES
}

/// Counts distinct vocabulary words present, plus one each for a detected
/// email address and phone number.
pub fn keyword_matches(text: &str) -> usize {
    let lower = text.to_lowercase();
    let words: HashSet<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let vocabulary = RESUME_KEYWORDS
        .iter()
        .filter(|keyword| words.contains(*keyword))
        .count();
    let contact = usize::from(EMAIL_RE.is_match(text)) + usize::from(PHONE_RE.is_match(text));
    vocabulary + contact
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    // pdf-extract panics on some malformed inputs
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractionError::ExtractionFailed(format!("PDF parse error: {e}"))),
        Err(_) => Err(ExtractionError::ExtractionFailed(
            "PDF parser aborted on malformed input".to_string(),
        )),
    }
}

fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    read_docx_paragraphs(bytes)
        .map_err(|e| ExtractionError::ExtractionFailed(format!("Word parse error: {e}")))
}

fn read_docx_paragraphs(bytes: &[u8]) -> anyhow::Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    let mut document_file = archive.by_name("word/document.xml")?;
    let mut xml = String::new();
    document_file.read_to_string(&mut xml)?;

    // whitespace inside runs is significant: "Work " + "experience"
    let mut reader = Reader::from_str(&xml);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut paragraphs = Vec::new();
    let mut in_paragraph = false;
    // only w:t carries visible text; w:instrText and w:delText are skipped
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"w:t" => in_text = in_paragraph,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                // tabs and line breaks inside a run
                if in_paragraph && matches!(e.name().as_ref(), b"w:tab" | b"w:br") {
                    current.push(' ');
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:p" => {
                    paragraphs.push(current.trim().to_string());
                    current.clear();
                    in_paragraph = false;
                    in_text = false;
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    current.push_str(&e.xml_content()?);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if in_text {
                    if let Some(c) = e.resolve_char_ref()? {
                        current.push(c);
                    } else {
                        let name = e.decode()?;
                        match resolve_predefined_entity(&name) {
                            Some(resolved) => current.push_str(resolved),
                            None => anyhow::bail!("unknown entity '&{name};'"),
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.into()),
            _ => {}
        }

        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}

/// Scrapes printable text out of a legacy Word binary. Word stores body text
/// either as 8-bit or UTF-16LE, so both decodings are tried and the one with
/// more letters wins.
fn extract_legacy_doc_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    if bytes.starts_with(ZIP_MAGIC) {
        // mislabelled .docx
        return extract_docx_text(bytes);
    }
    if !bytes.starts_with(OLE_MAGIC) {
        return Err(ExtractionError::ExtractionFailed(
            "not a Word document".to_string(),
        ));
    }

    let narrow = printable_runs(bytes.iter().map(|&b| u16::from(b)));
    let wide = printable_runs(
        bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]])),
    );

    let letters = |s: &str| s.chars().filter(|c| c.is_alphabetic()).count();
    Ok(if letters(&wide) > letters(&narrow) {
        wide
    } else {
        narrow
    })
}

fn printable_runs(units: impl Iterator<Item = u16>) -> String {
    let mut out = String::new();
    let mut run = String::new();

    let mut flush = |run: &mut String| {
        if run.trim().chars().count() >= MIN_LEGACY_RUN {
            out.push_str(run.trim());
            out.push('\n');
        }
        run.clear();
    };

    for unit in units {
        match char::from_u32(u32::from(unit)) {
            Some('\r') => run.push('\n'),
            Some(c) if c == '\t' || c == '\n' || (' '..='~').contains(&c) => run.push(c),
            _ => flush(&mut run),
        }
    }
    flush(&mut run);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const RESUME_TEXT: &str = "Jane Doe\njane@example.com\n\nExperience\nSenior Software Engineer at Acme, 2019-2024.\n\nEducation\nBSc Computer Science\n\nSkills\nRust, PostgreSQL, Kubernetes";

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            let options = zip::write::SimpleFileOptions::default();
            zip.start_file("word/document.xml", options).unwrap();
            zip.write_all(document_xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_kind_from_mime() {
        assert_eq!(
            DocumentKind::from_upload(Some("application/pdf"), None).unwrap(),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::from_upload(Some("text/plain; charset=utf-8"), None).unwrap(),
            DocumentKind::PlainText
        );
        assert_eq!(
            DocumentKind::from_upload(Some("application/msword"), Some("cv.doc")).unwrap(),
            DocumentKind::LegacyWordDocument
        );
    }

    #[test]
    fn test_kind_falls_back_to_extension_for_octet_stream() {
        assert_eq!(
            DocumentKind::from_upload(Some("application/octet-stream"), Some("CV.DOCX")).unwrap(),
            DocumentKind::WordDocument
        );
    }

    #[test]
    fn test_kind_rejects_images() {
        let err = DocumentKind::from_upload(Some("image/png"), Some("cv.png")).unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedKind(ref k) if k == "image/png"));
    }

    #[test]
    fn test_kind_rejects_unknown_extension() {
        let err = DocumentKind::from_upload(None, Some("cv.rtf")).unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedKind(_)));
    }

    #[test]
    fn test_normalize_collapses_spaces_and_blank_lines() {
        let raw = "  Jane   Doe \r\n\n\n\n\tExperience\t\tEngineer  \n\n";
        assert_eq!(normalize_text(raw), "Jane Doe\n\nExperience Engineer");
    }

    #[test]
    fn test_normalize_empty_input() {
        assert_eq!(normalize_text(" \n\t\n "), "");
    }

    #[test]
    fn test_plain_text_resume_is_valid() {
        let doc = extract(RESUME_TEXT.as_bytes(), DocumentKind::PlainText).unwrap();
        assert!(doc.is_valid);
        assert!(doc.text.starts_with("Jane Doe"));
    }

    #[test]
    fn test_short_text_fails_extraction() {
        let err = extract(b"short", DocumentKind::PlainText).unwrap_err();
        assert!(matches!(err, ExtractionError::ExtractionFailed(_)));
    }

    #[test]
    fn test_short_after_normalization_fails_extraction() {
        // 30 bytes of whitespace padding around 5 characters
        let raw = format!("{}short{}", " ".repeat(15), "\n".repeat(15));
        assert!(extract(raw.as_bytes(), DocumentKind::PlainText).is_err());
    }

    #[test]
    fn test_prose_without_markers_is_not_valid() {
        let text = "The quick brown fox jumps over the lazy dog while the cat sleeps soundly.";
        let doc = extract(text.as_bytes(), DocumentKind::PlainText).unwrap();
        assert!(!doc.is_valid);
    }

    #[test]
    fn test_validate_requires_minimum_length() {
        // three markers but under 50 characters
        assert!(!validate_content("Experience Education Skills"));
    }

    #[test]
    fn test_keyword_matches_counts_words_not_substrings() {
        // "network" must not count as "work"-like partials; "skills" counts once
        assert_eq!(keyword_matches("networking skills skills"), 1);
    }

    #[test]
    fn test_keyword_matches_counts_contact_markers() {
        assert_eq!(keyword_matches("reach me at jane@example.com or 555-123-4567"), 2);
    }

    #[test]
    fn test_docx_paragraphs_extracted() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
    <w:p><w:r><w:t>Experience</w:t></w:r></w:p>
    <w:p><w:r><w:t>Software Engineer at Acme</w:t></w:r><w:r><w:tab/><w:t>2019</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let doc = extract(&docx_bytes(xml), DocumentKind::WordDocument).unwrap();
        assert_eq!(doc.text, "Jane Doe\nExperience\nSoftware Engineer at Acme 2019");
    }

    #[test]
    fn test_docx_keeps_spaces_between_split_runs() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t xml:space="preserve">Senior </w:t></w:r><w:r><w:t>Engineer at AT&amp;T</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Work </w:t></w:r><w:r><w:t>experience and R&amp;D skills</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let doc = extract(&docx_bytes(xml), DocumentKind::WordDocument).unwrap();
        assert_eq!(
            doc.text,
            "Senior Engineer at AT&T\nWork experience and R&D skills"
        );
    }

    #[test]
    fn test_docx_resolves_entities() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:t>Skills: C&lt;T&gt; templates &amp; &quot;generics&quot; &#8212; Rust&#x21;</w:t></w:r></w:p>
</w:body></w:document>"#;
        let doc = extract(&docx_bytes(xml), DocumentKind::WordDocument).unwrap();
        assert_eq!(doc.text, "Skills: C<T> templates & \"generics\" \u{2014} Rust!");
    }

    #[test]
    fn test_docx_skips_field_codes_and_deleted_text() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:instrText xml:space="preserve"> HYPERLINK "https://example.com" </w:instrText></w:r><w:r><w:t>Portfolio site</w:t></w:r><w:del><w:r><w:delText>old draft</w:delText></w:r></w:del></w:p>
</w:body></w:document>"#;
        let doc = extract(&docx_bytes(xml), DocumentKind::WordDocument).unwrap();
        assert_eq!(doc.text, "Portfolio site");
    }

    #[test]
    fn test_split_run_docx_resume_passes_validation() {
        // every marker word sits at a run boundary
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:t xml:space="preserve">Work </w:t></w:r><w:r><w:t>experience</w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">Formal </w:t></w:r><w:r><w:t>education</w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">Core </w:t></w:r><w:r><w:t>skills</w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">Lead </w:t></w:r><w:r><w:t>developer on data pipelines</w:t></w:r></w:p>
</w:body></w:document>"#;
        let doc = extract(&docx_bytes(xml), DocumentKind::WordDocument).unwrap();
        assert!(doc.text.contains("Work experience"));
        assert!(keyword_matches(&doc.text) >= MIN_KEYWORD_MATCHES);
        assert!(doc.is_valid);
    }

    #[test]
    fn test_corrupt_docx_fails_extraction() {
        let err = extract(b"definitely not a zip archive", DocumentKind::WordDocument).unwrap_err();
        assert!(matches!(err, ExtractionError::ExtractionFailed(_)));
    }

    #[test]
    fn test_corrupt_pdf_fails_extraction() {
        let err = extract(b"%PDF-1.4 garbage garbage garbage", DocumentKind::Pdf).unwrap_err();
        assert!(matches!(err, ExtractionError::ExtractionFailed(_)));
    }

    #[test]
    fn test_legacy_doc_requires_ole_header() {
        let err = extract(RESUME_TEXT.as_bytes(), DocumentKind::LegacyWordDocument).unwrap_err();
        assert!(matches!(err, ExtractionError::ExtractionFailed(_)));
    }

    #[test]
    fn test_legacy_doc_scrapes_utf16_text() {
        let mut bytes = OLE_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 8]);
        for unit in RESUME_TEXT.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes.extend_from_slice(&[0u8, 0u8]);

        let doc = extract(&bytes, DocumentKind::LegacyWordDocument).unwrap();
        assert!(doc.text.contains("Senior Software Engineer at Acme"));
        assert!(doc.is_valid);
    }
}
