//! Title extraction from free-form memo content.

use crate::defaults::TITLE_MARKER;

/// Split content into a title and body.
///
/// When the trimmed first line starts with `"# "`, that line (minus the marker
/// and surrounding whitespace) is the title and everything after the first
/// newline, with leading newlines stripped, is the body. Otherwise the title
/// is empty and the body is the content unchanged.
pub fn split_title(content: &str) -> (&str, &str) {
    let (first_line, rest) = match content.split_once('\n') {
        Some((first, rest)) => (first, Some(rest)),
        None => (content, None),
    };

    match first_line.trim().strip_prefix(TITLE_MARKER) {
        Some(heading) => {
            let body = rest.map(|r| r.trim_start_matches('\n')).unwrap_or("");
            (heading.trim(), body)
        }
        None => ("", content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_becomes_title() {
        let (title, body) = split_title("# My Title\nSome body\nmore");
        assert_eq!(title, "My Title");
        assert_eq!(body, "Some body\nmore");
    }

    #[test]
    fn test_leading_newlines_stripped_from_body() {
        let (title, body) = split_title("# Heading\n\n\nBody");
        assert_eq!(title, "Heading");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_indented_heading_with_trailing_space() {
        let (title, body) = split_title("   #   Spaced out   \nbody");
        assert_eq!(title, "Spaced out");
        assert_eq!(body, "body");
    }

    #[test]
    fn test_heading_without_body() {
        assert_eq!(split_title("# Only a title"), ("Only a title", ""));
    }

    #[test]
    fn test_plain_content_is_unchanged() {
        let content = "just a thought\n# not a heading here";
        assert_eq!(split_title(content), ("", content));
    }

    #[test]
    fn test_second_level_heading_is_not_a_title() {
        let content = "## Subheading\nbody";
        assert_eq!(split_title(content), ("", content));
    }

    #[test]
    fn test_marker_without_space_is_not_a_title() {
        let content = "#hashtag at start";
        assert_eq!(split_title(content), ("", content));
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(split_title(""), ("", ""));
    }

    #[test]
    fn test_body_keeps_inner_whitespace() {
        let (_, body) = split_title("# T\n  indented\n\ntrailing\n");
        assert_eq!(body, "  indented\n\ntrailing\n");
    }
}
