/// Embeds already base64-encoded bytes in a `data:` URI.
pub fn data_uri(mime_type: &str, bytes_base64: &str) -> String {
    format!("data:{};base64,{}", mime_type, bytes_base64)
}

/// Trimmed value, or `None` when blank.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Escapes text for use in HTML bodies and double-quoted attributes.
pub fn html(text: &str) -> String {
    escaper::encode_minimal(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_data_uri() {
        assert_eq!(data_uri("image/jpeg", "AAAA"), "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn blank_values_are_dropped() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(" key ".into())), Some("key".into()));
    }

    #[test]
    fn escapes_markup() {
        let escaped = html(r#"<b>"Tom & Jerry"</b>"#);
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('"'));
        assert!(escaped.contains("&amp;"));
    }
}
