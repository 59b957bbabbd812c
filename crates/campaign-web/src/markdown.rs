//! Markdown to HTML for model output.

use pulldown_cmark::{html, Event, Options, Parser};

/// Render model markdown. Raw HTML in the input is shown as text, never
/// passed through.
pub fn render_markdown(text: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_and_lists() {
        let out = render_markdown("### Stratégie\n\n- Canal 1 (40% du budget)\n- **Canal 2**");
        assert!(out.contains("<h3>Stratégie</h3>"));
        assert!(out.contains("<li>Canal 1 (40% du budget)</li>"));
        assert!(out.contains("<strong>Canal 2</strong>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let out = render_markdown("<script>alert(1)</script>\n\nTexte <b>gras</b>");
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
        assert!(!out.contains("<b>"));
    }

    #[test]
    fn test_tables() {
        let out = render_markdown("| KPI | Cible |\n|---|---|\n| ROI | 15% |");
        assert!(out.contains("<table>"));
        assert!(out.contains("<td>15%</td>"));
    }
}
