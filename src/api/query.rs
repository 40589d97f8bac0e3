/*!
 * Strict parsing of the `/api/translate` query string.
 *
 * Values are percent-decoded as UTF-8 without replacement: a value that
 * does not decode is reported as a field error instead of being passed on
 * with substitution characters.
 */

use percent_encoding::percent_decode;
use std::borrow::Cow;

use crate::translation::{FieldError, FieldErrorKind, TranslationRequest};

/// Decode one form-encoded component (`+` is a space)
fn decode_component(raw: &str) -> Option<String> {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };

    percent_decode(spaced.as_bytes())
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}

/// Store a decoded value, reporting malformed and repeated fields
fn assign(slot: &mut Option<String>, field: &str, raw: &str, problems: &mut Vec<FieldError>) {
    if slot.is_some() {
        problems.push(FieldError::new(
            field,
            "Field given more than once",
            FieldErrorKind::Duplicate,
        ));
        return;
    }

    match decode_component(raw) {
        Some(value) => *slot = Some(value),
        None => {
            let kind = if field == "text" {
                FieldErrorKind::InvalidInput
            } else {
                FieldErrorKind::InvalidLanguage
            };
            problems.push(FieldError::new(field, "Value is not valid UTF-8", kind));
        }
    }
}

/// Parse a raw query string into a translation request
///
/// Unknown parameters are ignored.
pub fn parse_translate_query(raw: Option<&str>) -> Result<TranslationRequest, Vec<FieldError>> {
    let mut request = TranslationRequest::default();
    let mut problems = Vec::new();

    for pair in raw.unwrap_or_default().split('&').filter(|pair| !pair.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));

        match decode_component(raw_key).as_deref() {
            Some("text") => assign(&mut request.text, "text", raw_value, &mut problems),
            Some("target_lang") => {
                assign(&mut request.target_lang, "target_lang", raw_value, &mut problems)
            }
            _ => {}
        }
    }

    if problems.is_empty() {
        Ok(request)
    } else {
        Err(problems)
    }
}
