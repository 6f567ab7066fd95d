//! Plain-text approximation of an HTML body.

/// Convert HTML to a single line of plain text.
///
/// - Removes `<style>` and `<script>` blocks (case-insensitive, across lines)
/// - Replaces every remaining tag with a space
/// - Collapses whitespace runs to one space and trims
pub fn html_to_text(html: &str) -> String {
    let mut text = remove_tag_block(html, "style");
    text = remove_tag_block(&text, "script");

    strip_tags(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove every complete `<tag ...>…</tag>` block.
///
/// An opening tag with no matching close is left in place.
fn remove_tag_block(html: &str, tag: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    let mut result = String::with_capacity(html.len());
    let mut pos = 0;

    while let Some(rel) = lower[pos..].find(&open) {
        let start = pos + rel;
        let Some(open_end) = lower[start..].find('>').map(|i| start + i + 1) else {
            break;
        };
        let Some(close_start) = lower[open_end..].find(&close).map(|i| open_end + i) else {
            break;
        };
        result.push_str(&html[pos..start]);
        pos = close_start + close.len();
    }

    result.push_str(&html[pos..]);
    result
}

/// Replace each `<...>` tag (at least one character inside) with a space.
fn strip_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut remaining = html;

    while let Some(start) = remaining.find('<') {
        let after = &remaining[start + 1..];
        match after.find('>') {
            Some(end) if end > 0 => {
                result.push_str(&remaining[..start]);
                result.push(' ');
                remaining = &after[end + 1..];
            }
            _ => {
                result.push_str(&remaining[..=start]);
                remaining = after;
            }
        }
    }

    result.push_str(remaining);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_removed_and_whitespace_collapsed() {
        let html = "<style>.a{}</style><p>Hi  <b>there</b></p>";
        assert_eq!(html_to_text(html), "Hi there");
    }

    #[test]
    fn test_script_removed_case_insensitive_multiline() {
        let html = "Before<SCRIPT type=\"text/javascript\">\nalert('x');\n</Script>After";
        assert_eq!(html_to_text(html), "BeforeAfter");
    }

    #[test]
    fn test_multiple_style_blocks() {
        let html = "<style>a{}</style>one<style media=\"x\">b{}</style>two";
        assert_eq!(html_to_text(html), "onetwo");
    }

    #[test]
    fn test_unclosed_style_is_kept_as_text() {
        assert_eq!(html_to_text("<style>body{} text"), "body{} text");
    }

    #[test]
    fn test_tags_become_spaces() {
        assert_eq!(html_to_text("<p>Hello</p><p>World</p>"), "Hello World");
    }

    #[test]
    fn test_lone_angle_brackets_kept() {
        assert_eq!(html_to_text("a < b"), "a < b");
        assert_eq!(html_to_text("x <> y"), "x <> y");
    }

    #[test]
    fn test_entities_pass_through() {
        assert_eq!(html_to_text("<p>a &amp; b</p>"), "a &amp; b");
        assert_eq!(html_to_text("Tom&nbsp;&lt;3&gt;"), "Tom&nbsp;&lt;3&gt;");
    }

    #[test]
    fn test_non_ascii_offsets() {
        assert_eq!(
            html_to_text("<b>İstanbul</b><style>x</style> ünïcode"),
            "İstanbul ünïcode"
        );
    }
}
