use crate::utils::error::{Result, SandboxError};
use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything outside RFC 5987 `attr-char`.
const EXT_VALUE_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispositionType {
    Attachment,
    Inline,
}

impl DispositionType {
    fn as_str(self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Inline => "inline",
        }
    }
}

/// Builds a `Content-Disposition` value for `filename`.
///
/// Only the final path segment is used. Names outside printable ASCII get a
/// `?`-substituted fallback plus an RFC 5987 `filename*` parameter.
pub fn content_disposition(kind: DispositionType, filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    if name.is_empty() {
        return kind.as_str().to_string();
    }

    let printable_ascii = name.chars().all(|c| (' '..='~').contains(&c));
    if printable_ascii {
        return format!("{}; filename=\"{}\"", kind.as_str(), quote_escape(name));
    }

    let fallback: String = name
        .chars()
        .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
        .collect();

    format!(
        "{}; filename=\"{}\"; filename*=UTF-8''{}",
        kind.as_str(),
        quote_escape(&fallback),
        encode_ext_value(name)
    )
}

fn quote_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn encode_ext_value(value: &str) -> String {
    utf8_percent_encode(value, EXT_VALUE_ESCAPES).to_string()
}

/// `302 Found` pointing at `location`, passed through verbatim.
pub fn found(location: &str) -> Result<Response> {
    let value = HeaderValue::from_str(location)
        .map_err(|_| SandboxError::bad_request(format!("invalid redirect target: {location}")))?;

    Ok((StatusCode::FOUND, [(LOCATION, value)]).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_filename() {
        assert_eq!(
            content_disposition(DispositionType::Attachment, "10_items.json"),
            "attachment; filename=\"10_items.json\""
        );
        assert_eq!(
            content_disposition(DispositionType::Inline, "/srv/public/docs/a.pdf"),
            "inline; filename=\"a.pdf\""
        );
    }

    #[test]
    fn test_quotes_are_escaped() {
        assert_eq!(
            content_disposition(DispositionType::Attachment, "say \"hi\".txt"),
            "attachment; filename=\"say \\\"hi\\\".txt\""
        );
    }

    #[test]
    fn test_unicode_filename() {
        assert_eq!(
            content_disposition(DispositionType::Attachment, "résumé.txt"),
            "attachment; filename=\"r?sum?.txt\"; filename*=UTF-8''r%C3%A9sum%C3%A9.txt"
        );
    }

    #[test]
    fn test_found_sets_location() {
        let response = found("https://example.com/done").unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "https://example.com/done"
        );
        assert!(found("bad\ntarget").is_err());
    }
}
