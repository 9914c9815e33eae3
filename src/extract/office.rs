use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use zip::ZipArchive;

use super::ExtractError;

const DOCX_BODY: &str = "word/document.xml";
const PPTX_SLIDE_PREFIX: &str = "ppt/slides/slide";

/// Paragraph text of a Word document, one paragraph per line.
pub fn read_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = open_archive("docx", bytes)?;
    let xml = read_part(&mut archive, "docx", DOCX_BODY)?;
    let paragraphs = docx_paragraphs(&xml)?;
    Ok(paragraphs.join("\n"))
}

/// Text of every text-bearing shape, slide by slide, one shape per line.
pub fn read_pptx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = open_archive("pptx", bytes)?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort_by_key(|(n, _)| *n);

    let mut texts = Vec::new();
    for (_, part) in &slides {
        let xml = read_part(&mut archive, "pptx", part)?;
        texts.extend(slide_shape_texts(part, &xml)?);
    }

    tracing::debug!("Read {} slides, {} text shapes", slides.len(), texts.len());
    Ok(texts.join("\n"))
}

fn open_archive<'a>(
    kind: &'static str,
    bytes: &'a [u8],
) -> Result<ZipArchive<Cursor<&'a [u8]>>, ExtractError> {
    ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Archive {
        kind,
        reason: e.to_string(),
    })
}

fn read_part(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    kind: &'static str,
    part: &str,
) -> Result<String, ExtractError> {
    let mut file = archive.by_name(part).map_err(|e| match e {
        zip::result::ZipError::FileNotFound => ExtractError::MissingPart {
            kind,
            part: part.to_string(),
        },
        other => ExtractError::Archive {
            kind,
            reason: other.to_string(),
        },
    })?;

    let mut xml = String::new();
    file.read_to_string(&mut xml)?;
    Ok(xml)
}

/// `ppt/slides/slide12.xml` -> 12. Layouts, masters and `_rels` don't match.
fn slide_number(name: &str) -> Option<u32> {
    name.strip_prefix(PPTX_SLIDE_PREFIX)?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

fn xml_error(part: &str, e: impl std::fmt::Display) -> ExtractError {
    ExtractError::Xml {
        part: part.to_string(),
        reason: e.to_string(),
    }
}

fn docx_paragraphs(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().map_err(|e| xml_error(DOCX_BODY, e))?;
                current.push_str(&text);
            }
            Ok(Event::CData(t)) if in_text => {
                current.push_str(&String::from_utf8_lossy(&t.into_inner()));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(DOCX_BODY, e)),
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Text of each `<p:sp>` that carries a text body, paragraphs joined by `\n`.
fn slide_shape_texts(part: &str, xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut shapes = Vec::new();

    let mut shape_depth = 0usize;
    let mut has_body = false;
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"p:sp" => {
                    shape_depth += 1;
                    has_body = false;
                    paragraphs.clear();
                    current.clear();
                }
                b"p:txBody" if shape_depth > 0 => has_body = true,
                b"a:t" if shape_depth > 0 => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"a:t" => in_text = false,
                b"a:p" if shape_depth > 0 => paragraphs.push(std::mem::take(&mut current)),
                b"p:sp" if shape_depth > 0 => {
                    shape_depth -= 1;
                    if has_body {
                        shapes.push(paragraphs.join("\n"));
                    }
                    has_body = false;
                    paragraphs.clear();
                }
                _ => {}
            },
            Ok(Event::Empty(e)) if shape_depth > 0 => match e.name().as_ref() {
                b"a:p" => paragraphs.push(String::new()),
                b"a:br" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().map_err(|e| xml_error(part, e))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(part, e)),
            _ => {}
        }
    }

    Ok(shapes)
}
