use std::io::{Cursor, Read};

use crate::extract::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Text of every `w:t` run in the main document part. Each paragraph is
/// followed by a single space; tabs and breaks inside runs become `\t` / `\n`.
///
/// The decompressed part is capped at `max_bytes`.
pub fn extract_docx_text(bytes: &[u8], max_bytes: usize) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::UnreadableDocument(format!("invalid DOCX archive: {e}")))?;

    let part = archive.by_name(DOCUMENT_PART).map_err(|_| {
        ExtractError::UnreadableDocument(format!("DOCX is missing {DOCUMENT_PART}"))
    })?;

    let too_large = || {
        ExtractError::UnreadableDocument(format!("{DOCUMENT_PART} exceeds {max_bytes} bytes"))
    };
    // Declared size is attacker-controlled; the bounded read below is the real guard.
    if part.size() > max_bytes as u64 {
        return Err(too_large());
    }

    let mut raw = Vec::new();
    part.take(max_bytes as u64 + 1)
        .read_to_end(&mut raw)
        .map_err(|e| ExtractError::UnreadableDocument(format!("unreadable {DOCUMENT_PART}: {e}")))?;
    if raw.len() > max_bytes {
        return Err(too_large());
    }

    let xml = String::from_utf8(raw).map_err(|_| {
        ExtractError::UnreadableDocument(format!("{DOCUMENT_PART} is not valid UTF-8"))
    })?;

    Ok(text_from_document_xml(&xml))
}

fn text_from_document_xml(xml: &str) -> String {
    let mut text = String::new();
    let mut in_run = false;
    let mut in_text_run = false;
    let mut rest = xml;

    while let Some(open) = rest.find('<') {
        if in_text_run {
            text.push_str(&decode_entities(&rest[..open]));
        }
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let tag = &rest[open + 1..open + close];
        rest = &rest[open + close + 1..];

        let self_closing = tag.ends_with('/');
        let (is_end, name) = match tag.strip_prefix('/') {
            Some(name) => (true, name),
            None => (false, tag),
        };
        let name = name
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default();

        match (name, is_end) {
            ("w:r", false) => in_run = !self_closing,
            ("w:r", true) => {
                in_run = false;
                in_text_run = false;
            }
            ("w:t", false) => in_text_run = !self_closing,
            ("w:t", true) => in_text_run = false,
            // <w:p/> is an empty paragraph and still gets its separator
            ("w:p", false) if self_closing => text.push(' '),
            ("w:p", true) => text.push(' '),
            // w:tab also appears as a tab-stop definition under w:pPr/w:tabs
            ("w:tab", false) if in_run => text.push('\t'),
            ("w:br" | "w:cr", false) if in_run => text.push('\n'),
            _ => {}
        }
    }

    text
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').and_then(|semi| {
            let entity = &rest[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// In-memory DOCX with `body` as the contents of `w:body`.
#[cfg(test)]
pub(crate) fn build_docx(body: &str) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let document_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("[Content_Types].xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"<?xml version=\"1.0\"?><Types/>").unwrap();
    writer
        .start_file(DOCUMENT_PART, SimpleFileOptions::default())
        .unwrap();
    writer.write_all(document_xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const LIMIT: usize = 1024 * 1024;

    #[test]
    fn test_paragraphs_joined_with_space() {
        let body = concat!(
            r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Jane Doe</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t xml:space="preserve">Python </w:t></w:r><w:r><w:t>and Docker</w:t></w:r></w:p>"#,
        );
        let text = extract_docx_text(&build_docx(body), LIMIT).unwrap();
        assert_eq!(text, "Jane Doe Python and Docker ");
    }

    #[test]
    fn test_entities_decoded() {
        let body = r#"<w:p><w:r><w:t>C&amp;C++ &lt;dev&gt; &#x41;&#66;</w:t></w:r></w:p>"#;
        let text = extract_docx_text(&build_docx(body), LIMIT).unwrap();
        assert_eq!(text, "C&C++ <dev> AB ");
    }

    #[test]
    fn test_tabs_breaks_and_non_text_tags() {
        let body = r#"<w:p><w:r><w:t>Skills</w:t><w:tab/><w:t>ci/cd</w:t><w:br/><w:t>sql</w:t></w:r><w:r><w:tbl/></w:r></w:p>"#;
        let text = extract_docx_text(&build_docx(body), LIMIT).unwrap();
        assert_eq!(text, "Skills\tci/cd\nsql ");
    }

    #[test]
    fn test_empty_body_yields_blank_text() {
        let text = extract_docx_text(&build_docx("<w:p/>"), LIMIT).unwrap();
        assert!(text.trim().is_empty());
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            extract_docx_text(b"plain text", LIMIT),
            Err(ExtractError::UnreadableDocument(_))
        ));
    }

    #[test]
    fn test_zip_without_document_part() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        let err = extract_docx_text(&bytes, LIMIT).unwrap_err();
        assert!(err.to_string().contains(DOCUMENT_PART));
    }

    #[test]
    fn test_unknown_entity_left_verbatim() {
        assert_eq!(decode_entities("R&D &nbsp; a&b"), "R&D &nbsp; a&b");
    }

    #[test]
    fn test_tab_stop_definitions_are_not_text() {
        let body = concat!(
            r#"<w:p><w:r><w:t>machine</w:t></w:r></w:p>"#,
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>"#,
            r#"<w:r><w:t>learning</w:t></w:r></w:p>"#,
        );
        let text = extract_docx_text(&build_docx(body), LIMIT).unwrap();
        assert_eq!(text, "machine learning ");
        assert!(text.contains("machine learning"));
    }

    #[test]
    fn test_empty_paragraphs_still_separate() {
        let body = r#"<w:p><w:r><w:t>sql</w:t></w:r></w:p><w:p/><w:p></w:p><w:p><w:r><w:t>git</w:t></w:r></w:p>"#;
        let text = extract_docx_text(&build_docx(body), LIMIT).unwrap();
        assert_eq!(text, "sql   git ");
    }

    #[test]
    fn test_compressed_bomb_rejected() {
        // ~4 MiB of spaces deflates to a few KiB
        let filler = " ".repeat(4 * 1024 * 1024);
        let bytes = build_docx(&format!("<w:p><w:r><w:t>{filler}</w:t></w:r></w:p>"));
        assert!(bytes.len() < 64 * 1024, "fixture compressed to {}", bytes.len());

        let err = extract_docx_text(&bytes, LIMIT).unwrap_err();
        assert!(matches!(err, ExtractError::UnreadableDocument(ref m) if m.contains("exceeds")));
    }

    #[test]
    fn test_part_exactly_at_limit_is_read() {
        let bytes = build_docx("<w:p><w:r><w:t>rust</w:t></w:r></w:p>");
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let size = archive.by_name(DOCUMENT_PART).unwrap().size() as usize;
        drop(archive);

        assert_eq!(extract_docx_text(&bytes, size).unwrap(), "rust ");
        assert!(extract_docx_text(&bytes, size - 1).is_err());
    }
}
