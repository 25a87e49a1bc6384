//! Boundary-call marker parsing.
//!
//! A marker's argument text names the registry identifier the method
//! claims to implement, in the form `id = "Lookup"` (quotes optional).
//! Anything else is a malformed marker: reported with the marker's source
//! location and excluded from downstream passes, while the scan continues
//! for other declarations.

use hostcall_core::{ScanError, Span};

/// Parse a marker's argument text into the claimed identifier name.
pub fn parse_marker(args: &str, span: Span) -> Result<String, ScanError> {
    let text = args.trim();
    if text.is_empty() {
        return Err(malformed("missing identifier reference", span));
    }

    let (key, value) = match text.split_once('=') {
        Some((key, value)) => (key.trim(), value.trim()),
        None => return Err(malformed("expected `id = <name>`", span)),
    };

    if key != "id" {
        return Err(malformed(
            format!("unrecognized marker argument '{key}'"),
            span,
        ));
    }
    if value.is_empty() {
        return Err(malformed("missing identifier value", span));
    }

    let name = unquote(value).ok_or_else(|| malformed("unterminated quote", span))?;
    if !is_identifier(name) {
        return Err(malformed(
            format!("'{name}' is not a valid identifier"),
            span,
        ));
    }
    Ok(name.to_string())
}

fn malformed(detail: impl Into<String>, span: Span) -> ScanError {
    ScanError::MalformedMarker {
        detail: detail.into(),
        span,
    }
}

/// Strip one matching pair of double quotes, if present.
fn unquote(value: &str) -> Option<&str> {
    let bytes = value.as_bytes();
    if bytes.first() == Some(&b'"') {
        if bytes.len() >= 2 && bytes.last() == Some(&b'"') {
            Some(&value[1..value.len() - 1])
        } else {
            None
        }
    } else if bytes.last() == Some(&b'"') {
        None
    } else {
        Some(value)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
