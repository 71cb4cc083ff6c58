//! HTML escaping for text inserted as markup.

/// Escape `&`, `<`, `>` and `"` so `text` can be embedded in element content
/// or a double-quoted attribute value. Every other character passes through.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&lt;/a&gt;"
        );
    }

    #[test]
    fn leaves_other_text_alone() {
        assert_eq!(escape("it's 100% café — ok"), "it's 100% café — ok");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn escaped_output_has_no_raw_specials() {
        let inputs = ["<<>>", "&&amp;", "\"quoted\"", "a<b>&\"c\"", "&lt;"];
        for input in inputs {
            let out = escape(input);
            assert!(!out.contains('<') && !out.contains('>') && !out.contains('"'));
            // Every ampersand left in the output starts an entity we produced.
            let stripped = out
                .replace("&amp;", "")
                .replace("&lt;", "")
                .replace("&gt;", "")
                .replace("&quot;", "");
            assert!(!stripped.contains('&'), "raw ampersand in {out}");
        }
    }

    #[test]
    fn html_parser_recovers_original_text() {
        let sel = Selector::parse("p").unwrap();
        for input in [
            "<script>alert(1)</script>",
            "Tom & \"Jerry\"",
            "&amp; literal",
            "1 < 2 > 0",
        ] {
            let html = Html::parse_fragment(&format!("<p>{}</p>", escape(input)));
            let text: String = html.select(&sel).next().unwrap().text().collect();
            assert_eq!(text, input);
        }
    }
}
