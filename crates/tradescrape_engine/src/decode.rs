use chardetng::EncodingDetector;
use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};
use tradescrape_logging::scrape_debug;

/// Declared encodings of the two site families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteEncoding {
    /// PC site.
    ShiftJis,
    /// Mobile site.
    Utf8,
}

impl SiteEncoding {
    pub fn label(self) -> &'static str {
        self.encoding().name()
    }

    pub fn encoding(self) -> &'static Encoding {
        match self {
            SiteEncoding::ShiftJis => SHIFT_JIS,
            SiteEncoding::Utf8 => UTF_8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub text: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
    #[error("unknown encoding label {label:?}")]
    UnknownLabel { label: String },
}

/// Decode a page: BOM first, then the declared label, then (when allowed)
/// chardetng detection for labels `encoding_rs` does not know.
pub fn decode_page(
    bytes: &[u8],
    declared: &str,
    detect_unknown: bool,
) -> Result<DecodedPage, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        scrape_debug!("BOM overrides declared encoding {declared:?}");
        return decode_with(bytes, encoding);
    }

    if let Some(encoding) = Encoding::for_label(declared.trim().as_bytes()) {
        return decode_with(bytes, encoding);
    }

    if !detect_unknown {
        return Err(DecodeError::UnknownLabel {
            label: declared.to_string(),
        });
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    scrape_debug!(
        "unknown label {declared:?}, detector guessed {}",
        encoding.name()
    );
    decode_with(bytes, encoding)
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<DecodedPage, DecodeError> {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: used.name().to_string(),
            message: "malformed byte sequence".into(),
        });
    }
    Ok(DecodedPage {
        text: text.into_owned(),
        encoding_label: used.name().to_string(),
    })
}
