use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use crate::types::PortalError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub text: String,
    pub encoding_label: String,
}

/// Decodes raw page bytes into UTF-8.
///
/// Order: BOM -> Content-Type charset -> chardetng detection. The portal still
/// serves legacy EUC-KR on some skins, so detection is not optional. The
/// detection fallback decodes lossily; only an explicitly declared encoding
/// that fails to decode is an error.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedPage, PortalError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_strict(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(header_charset) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return decode_strict(bytes, encoding);
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (text, _, _) = encoding.decode(bytes);
    Ok(DecodedPage {
        text: text.into_owned(),
        encoding_label: encoding.name().to_string(),
    })
}

fn header_charset(content_type: &str) -> Option<String> {
    content_type.split(';').map(str::trim).find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim_matches([' ', '"', '\''].as_ref()).to_string())
        } else {
            None
        }
    })
}

fn decode_strict(bytes: &[u8], encoding: &'static Encoding) -> Result<DecodedPage, PortalError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(PortalError::Decode {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(DecodedPage {
        text: text.into_owned(),
        encoding_label: encoding.name().to_string(),
    })
}
