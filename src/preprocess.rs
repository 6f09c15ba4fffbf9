//! Strip embedded base64 payloads from `pdftohtml` output.
//!
//! The converter inlines background images and fonts as `data:` URLs, which
//! makes the HTML unwieldy to inspect. Cleaning is optional: the tokenizer
//! ignores style blocks and image sources either way.

use std::sync::LazyLock;

use regex::Regex;

/// `url(data:image/...)` and `url(data:application/...)` inside CSS.
static CSS_DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*["']?data:(?:image|application)/[^)]*\)"#).unwrap()
});

/// `@font-face` blocks whose `src` no longer points anywhere.
static EMPTY_FONT_FACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@font-face\s*\{[^}]*src:\s*url\(\s*(?:""|'')?\s*\)[^}]*\}"#).unwrap()
});

/// Inline `src="data:..."` attributes.
static SRC_DATA_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src="data:[^"]*""#).unwrap());

/// What [`clean_html`] removed. Sizes are in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CleanStats {
    pub original_size: usize,
    pub final_size: usize,
    pub data_urls_removed: usize,
    pub font_faces_removed: usize,
}

impl CleanStats {
    /// Size reduction in percent, rounded to one decimal. Zero for empty input.
    pub fn reduction_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        let ratio = 1.0 - self.final_size as f64 / self.original_size as f64;
        (ratio * 1000.0).round() / 10.0
    }
}

/// Remove base64 data URLs and the font-face blocks they leave empty.
pub fn clean_html(html: &str) -> (String, CleanStats) {
    let mut stats = CleanStats {
        original_size: html.len(),
        ..CleanStats::default()
    };

    stats.data_urls_removed += CSS_DATA_URL.find_iter(html).count();
    let out = CSS_DATA_URL.replace_all(html, r#"url("")"#);

    stats.font_faces_removed = EMPTY_FONT_FACE.find_iter(&out).count();
    let out = EMPTY_FONT_FACE.replace_all(&out, "");

    stats.data_urls_removed += SRC_DATA_ATTR.find_iter(&out).count();
    let out = SRC_DATA_ATTR.replace_all(&out, r#"src="""#).into_owned();

    stats.final_size = out.len();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        data_urls = stats.data_urls_removed,
        font_faces = stats.font_faces_removed,
        "cleaned html"
    );

    (out, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_data_urls_replaced() {
        let html = r#"<div style="background-image:url(data:image/png;base64,iVBORw0KGgo=)"></div>"#;
        let (out, stats) = clean_html(html);
        assert_eq!(out, r#"<div style="background-image:url("")"></div>"#);
        assert_eq!(stats.data_urls_removed, 1);
        assert_eq!(stats.font_faces_removed, 0);
    }

    #[test]
    fn test_font_face_with_embedded_font_removed() {
        let html = "<style>@font-face { font-family: f0; src: url(\"data:application/octet-stream;base64,AAEAAA\"); }\n.p{top:1px}</style>";
        let (out, stats) = clean_html(html);
        assert_eq!(out, "<style>\n.p{top:1px}</style>");
        assert_eq!(stats.data_urls_removed, 1);
        assert_eq!(stats.font_faces_removed, 1);
    }

    #[test]
    fn test_font_face_with_real_url_kept() {
        let html = "<style>@font-face { font-family: f1; src: url(f1.woff); }</style>";
        let (out, stats) = clean_html(html);
        assert_eq!(out, html);
        assert_eq!(stats.font_faces_removed, 0);
    }

    #[test]
    fn test_img_src_attribute_emptied() {
        let html = r#"<img width="10" src="data:image/jpeg;base64,/9j/4AAQ" alt=""/><b>0</b>"#;
        let (out, stats) = clean_html(html);
        assert_eq!(out, r#"<img width="10" src="" alt=""/><b>0</b>"#);
        assert_eq!(stats.data_urls_removed, 1);
        assert!(stats.final_size < stats.original_size);
    }

    #[test]
    fn test_plain_html_untouched() {
        let html = "<html><body><b>Ryby</b><br/>losos<br/></body></html>";
        let (out, stats) = clean_html(html);
        assert_eq!(out, html);
        assert_eq!(stats.reduction_percent(), 0.0);
    }

    #[test]
    fn test_reduction_percent() {
        let stats = CleanStats {
            original_size: 1000,
            final_size: 333,
            ..CleanStats::default()
        };
        assert_eq!(stats.reduction_percent(), 66.7);
        assert_eq!(CleanStats::default().reduction_percent(), 0.0);
    }
}
