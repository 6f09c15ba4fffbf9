/// Markup kind of a flattened text fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bold text: category, subcategory, and histamine-level headings.
    Emphasized,
    /// Everything else: food names and notes.
    Plain,
}

/// A labeled text fragment from the document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Trimmed text with no-break spaces replaced by regular spaces.
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn emphasized(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Emphasized, text)
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Plain, text)
    }

    pub fn is_emphasized(&self) -> bool {
        self.kind == TokenKind::Emphasized
    }

    pub fn is_plain(&self) -> bool {
        self.kind == TokenKind::Plain
    }
}
