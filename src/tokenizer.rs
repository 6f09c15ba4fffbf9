use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;

use crate::token::Token;

/// Elements dropped entirely, together with their text.
const SKIP_TAGS: &[&str] = &["a", "img", "br"];

/// Replace no-break spaces with regular spaces and trim.
pub(crate) fn normalize_text(text: &str) -> String {
    text.replace('\u{00A0}', " ").trim().to_string()
}

/// Text of `node` if it is a text node, or an element whose only child
/// (recursively) is a single text node.
fn single_string<'a>(node: NodeRef<'a, Node>) -> Option<&'a str> {
    match node.value() {
        Node::Text(text) => Some(text.text.as_ref()),
        Node::Element(_) => {
            let mut children = node.children();
            let only = children.next()?;
            if children.next().is_some() {
                return None;
            }
            single_string(only)
        }
        _ => None,
    }
}

/// All descendant text of `node`, concatenated in document order.
fn text_content(node: NodeRef<Node>) -> String {
    node.descendants()
        .filter_map(|n| match n.value() {
            Node::Text(text) => Some(text.text.as_ref()),
            _ => None,
        })
        .collect()
}

fn find_body(doc: &Html) -> Option<NodeRef<'_, Node>> {
    doc.tree.root().descendants().find(|n| {
        n.value()
            .as_element()
            .is_some_and(|el| el.name() == "body")
    })
}

/// Flatten the direct children of `<body>` into tokens, in document order.
///
/// - `<b>` becomes an emphasized token with its full text content.
/// - `<a>`, `<img>` and `<br>` are dropped.
/// - Bare text, and elements wrapping exactly one string, become plain tokens;
///   empty plain tokens are dropped.
/// - Comments and elements with mixed content are dropped.
pub fn tokenize_document(doc: &Html) -> Vec<Token> {
    let Some(body) = find_body(doc) else {
        return Vec::new();
    };

    let mut tokens = Vec::new();
    for child in body.children() {
        match child.value() {
            Node::Element(el) if el.name() == "b" => {
                tokens.push(Token::emphasized(normalize_text(&text_content(child))));
            }
            Node::Element(el) if SKIP_TAGS.contains(&el.name()) => {}
            Node::Element(_) | Node::Text(_) => {
                if let Some(text) = single_string(child) {
                    let text = normalize_text(text);
                    if !text.is_empty() {
                        tokens.push(Token::plain(text));
                    }
                }
            }
            _ => {}
        }
    }
    tokens
}

/// Parse `html` and flatten its body into tokens.
pub fn tokenize(html: &str) -> Vec<Token> {
    let doc = Html::parse_document(html);
    tokenize_document(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn kinds_and_texts(html: &str) -> Vec<(TokenKind, String)> {
        tokenize(html)
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_empty_body() {
        assert!(tokenize("<html><body></body></html>").is_empty());
    }

    #[test]
    fn test_pdftohtml_lines() {
        let html = concat!(
            "<html><body>",
            "<a name=1></a><b>Živočíšne potraviny</b><br/>\n",
            "<b>Vajcia</b><br/>\n",
            "<b>0</b><br/>\n",
            "vajce prepeličie<br/>\n",
            "</body></html>"
        );
        assert_eq!(
            kinds_and_texts(html),
            vec![
                (TokenKind::Emphasized, "Živočíšne potraviny".to_string()),
                (TokenKind::Emphasized, "Vajcia".to_string()),
                (TokenKind::Emphasized, "0".to_string()),
                (TokenKind::Plain, "vajce prepeličie".to_string()),
            ]
        );
    }

    #[test]
    fn test_links_and_images_dropped() {
        let html = concat!(
            "<html><body>",
            "<a href=\"https://example.com\">link text</a>",
            "<img src=\"x.png\" alt=\"image\"/>",
            "kept",
            "</body></html>"
        );
        assert_eq!(
            kinds_and_texts(html),
            vec![(TokenKind::Plain, "kept".to_string())]
        );
    }

    #[test]
    fn test_no_break_space_normalized() {
        let html = "<html><body><b>2\u{00A0}H\u{00A0}L\u{00A0}</b>\u{00A0}avokádo\u{00A0}</body></html>";
        assert_eq!(
            kinds_and_texts(html),
            vec![
                (TokenKind::Emphasized, "2 H L".to_string()),
                (TokenKind::Plain, "avokádo".to_string()),
            ]
        );
    }

    #[test]
    fn test_bold_keeps_nested_text() {
        let html = "<html><body><b>Mliečne <i>výrobky</i></b></body></html>";
        assert_eq!(
            kinds_and_texts(html),
            vec![(TokenKind::Emphasized, "Mliečne výrobky".to_string())]
        );
    }

    #[test]
    fn test_single_string_wrapper_is_plain() {
        let html = "<html><body><span><i>syr feta</i></span><div>a<i>b</i></div></body></html>";
        // The div has mixed content and no single string.
        assert_eq!(
            kinds_and_texts(html),
            vec![(TokenKind::Plain, "syr feta".to_string())]
        );
    }

    #[test]
    fn test_comments_dropped() {
        let html = "<html><body><!-- page 2 -->text</body></html>";
        assert_eq!(
            kinds_and_texts(html),
            vec![(TokenKind::Plain, "text".to_string())]
        );
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("\u{00A0} a\u{00A0}b \n"), "a b");
        assert_eq!(normalize_text("   "), "");
    }
}
