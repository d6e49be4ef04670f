//! Uploaded files are embedded directly into a record's `url` as a base64
//! `data:` URL; there is no separate file store.

use base64::prelude::*;
use std::fs;
use std::path::Path;

use crate::error::{WorkspaceError, WorkspaceResult};

pub const PDF_MIME: &str = "application/pdf";
const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PdfLocation {
    /// `http(s)://` link opened in the browser.
    External,
    /// File embedded in the record.
    Embedded,
    /// Anything else, such as the `#` placeholder.
    Other,
}

impl PdfLocation {
    pub fn classify(url: &str) -> Self {
        if url.starts_with("http://") || url.starts_with("https://") {
            PdfLocation::External
        } else if url.starts_with("data:") {
            PdfLocation::Embedded
        } else {
            PdfLocation::Other
        }
    }
}

pub struct Attachment {
    /// Default display name: the file name without its extension.
    pub name: String,
    pub data_url: String,
}

pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", BASE64_STANDARD.encode(bytes))
}

pub fn decode_data_url(url: &str) -> WorkspaceResult<Vec<u8>> {
    let invalid = || WorkspaceError::InvalidDataUrl(preview(url));
    let rest = url.strip_prefix("data:").ok_or_else(invalid)?;
    let (meta, payload) = rest.split_once(',').ok_or_else(invalid)?;
    if !meta.ends_with(";base64") {
        return Err(invalid());
    }
    BASE64_STANDARD.decode(payload.trim()).map_err(|_| invalid())
}

pub fn read_file_as_data_url(path: &Path) -> WorkspaceResult<Attachment> {
    let bytes = fs::read(path)?;
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    let mime = if is_pdf { PDF_MIME } else { FALLBACK_MIME };
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Untitled")
        .to_string();
    Ok(Attachment {
        name,
        data_url: encode_data_url(&bytes, mime),
    })
}

fn preview(url: &str) -> String {
    const MAX: usize = 32;
    match url.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &url[..idx]),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embeds_pdf_with_stem_as_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Striver SDE Sheet.pdf");
        fs::write(&path, b"%PDF-1.4 sheet").unwrap();

        let attachment = read_file_as_data_url(&path).unwrap();
        assert_eq!(attachment.name, "Striver SDE Sheet");
        assert!(attachment.data_url.starts_with("data:application/pdf;base64,"));
        assert_eq!(PdfLocation::classify(&attachment.data_url), PdfLocation::Embedded);
        assert_eq!(decode_data_url(&attachment.data_url).unwrap(), b"%PDF-1.4 sheet");
    }

    #[test]
    fn test_rejects_links_and_plain_data_urls() {
        assert!(matches!(
            decode_data_url("https://example.com/a.pdf"),
            Err(WorkspaceError::InvalidDataUrl(_))
        ));
        assert!(decode_data_url("data:text/plain,hello").is_err());
        assert_eq!(PdfLocation::classify("https://x.dev"), PdfLocation::External);
        assert_eq!(PdfLocation::classify("#"), PdfLocation::Other);
    }
}
