use crmview_core::Item;
use crmview_data::RequestContext;

/// Detail-page URL of `item`.
///
/// Items of other content types keep `default`. External items link to
/// `{base}?id={id}`, or nowhere when no base URL is configured.
pub fn resolve_href(default: String, item: &Item, ctx: &RequestContext) -> String {
    if !item.is_external() {
        return default;
    }
    match ctx.base_url() {
        Some(base) => format!("{base}?id={}", item.id_text()),
        None => String::new(),
    }
}

/// Link markup of `item`, with the `href` attribute removed when external
/// items have no detail page.
pub fn link_html(html: String, item: &Item, ctx: &RequestContext) -> String {
    if !item.is_external() || ctx.base_url().is_some() {
        return html;
    }
    strip_href(&html)
}

/// Remove every `href` attribute from `html`.
///
/// Only `href` used as an attribute name is touched; the word elsewhere in
/// attribute values or text is kept.
pub fn strip_href(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(pos) = rest.find("href") {
        let (before, tail) = rest.split_at(pos);
        let after_name = &tail["href".len()..];
        let is_attribute = before.ends_with(|c: char| c.is_ascii_whitespace());
        match attribute_value_len(after_name).filter(|_| is_attribute) {
            Some(len) => {
                out.push_str(before.trim_end_matches(|c: char| c.is_ascii_whitespace()));
                rest = &after_name[len..];
            }
            None => {
                out.push_str(before);
                out.push_str("href");
                rest = after_name;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Length of the `= value` part that follows an attribute name.
fn attribute_value_len(s: &str) -> Option<usize> {
    let value = s.trim_start().strip_prefix('=')?.trim_start();
    let value_len = match value.chars().next() {
        Some(quote @ ('"' | '\'')) => value[1..].find(quote)? + 2,
        _ => value
            .find(|c: char| c.is_ascii_whitespace() || c == '>')
            .unwrap_or(value.len()),
    };
    Some(s.len() - value.len() + value_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_quoted_href() {
        assert_eq!(
            strip_href(r#"<a href="https://crm.example.org/contact?id=3" class="pt-cv-href-thumbnail">Jane</a>"#),
            r#"<a class="pt-cv-href-thumbnail">Jane</a>"#
        );
        assert_eq!(strip_href("<a  href = 'x' >y</a>"), "<a >y</a>");
    }

    #[test]
    fn test_strip_unquoted_href() {
        assert_eq!(strip_href("<a href=/contact?id=3>Jane</a>"), "<a>Jane</a>");
    }

    #[test]
    fn test_keep_href_word() {
        let html = "<a title=\"href\">see href</a>";
        assert_eq!(strip_href(html), html);
        assert_eq!(strip_href("<a href=\"unterminated>x</a>"), "<a href=\"unterminated>x</a>");
    }
}
