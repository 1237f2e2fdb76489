use ammonia::Builder;

/// Trims, strips every HTML tag, and entity-encodes the remaining text so
/// stored values are inert when echoed into markup. Both quote styles are
/// encoded.
pub fn sanitize_input(input: &str) -> String {
    let stripped = Builder::empty().clean(input.trim()).to_string();
    stripped.replace('"', "&quot;").replace('\'', "&#39;")
}

/// Sanitizes only when a value was supplied.
pub fn sanitize_opt(input: Option<&str>) -> Option<String> {
    input.map(sanitize_input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_keeps_text() {
        assert_eq!(sanitize_input("<b>hello</b> world"), "hello world");
        assert_eq!(sanitize_input("<script>alert(1)</script>safe"), "safe");
    }

    #[test]
    fn encodes_quotes_and_angle_brackets() {
        assert_eq!(sanitize_input("a \"b\" 'c'"), "a &quot;b&quot; &#39;c&#39;");
        assert!(sanitize_input("1 < 2 > 0").contains("&lt;"));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(sanitize_input("  plain  "), "plain");
        assert_eq!(sanitize_input(""), "");
    }
}
