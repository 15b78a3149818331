//! Rendered sentence tokens

use serde::{Deserialize, Serialize};

/// One run of sentence text; variable tokens carry color and hover metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub is_variable: bool,
    pub color: Option<String>,
    pub hover_title: Option<String>,
    pub hover_summary: Option<String>,
}

impl Token {
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_variable: false,
            color: None,
            hover_title: None,
            hover_summary: None,
        }
    }

    pub fn variable(
        text: impl Into<String>,
        color: impl Into<String>,
        hover_title: Option<String>,
        hover_summary: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            is_variable: true,
            color: Some(color.into()),
            hover_title,
            hover_summary,
        }
    }
}

fn attaches_left(text: &str) -> bool {
    matches!(
        text.chars().next(),
        Some(',' | '.' | ';' | ':' | '!' | '?' | ')' | '\'' | '\u{2019}')
    )
}

/// Join tokens with single spaces, without a space before closing
/// punctuation or after an opening parenthesis
///
/// Only literal text attaches to the left. A variable always stands as its
/// own word, whatever its value starts with.
pub fn render_text(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let text = token.text.trim();
        if text.is_empty() {
            continue;
        }
        let attaches = !token.is_variable && attaches_left(text);
        if !out.is_empty() && !attaches && !out.ends_with('(') {
            out.push(' ');
        }
        out.push_str(text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_spacing() {
        let tokens = vec![
            Token::literal("Your"),
            Token::variable("Sun", "#FFD54F", None, None),
            Token::literal("'s light ("),
            Token::variable("Leo", "#FF7043", None, None),
            Token::literal(") burns"),
            Token::variable("clearly", "#FFFFFF", None, None),
            Token::literal("."),
        ];
        assert_eq!(render_text(&tokens), "Your Sun's light (Leo) burns clearly.");
    }

    #[test]
    fn test_variable_punctuation_keeps_its_space() {
        let tokens = vec![
            Token::variable("?", "#FFFFFF", None, None),
            Token::literal("moves through"),
            Token::variable("?", "#FFFFFF", None, None),
            Token::literal("."),
        ];
        assert_eq!(render_text(&tokens), "? moves through ?.");

        let tokens = vec![
            Token::literal("A quiet"),
            Token::variable("!important", "#FFFFFF", None, None),
            Token::literal("("),
            Token::variable(",", "#FFFFFF", None, None),
            Token::literal(")"),
        ];
        assert_eq!(render_text(&tokens), "A quiet !important (,)");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_text(&[]), "");
        assert_eq!(render_text(&[Token::literal("  ")]), "");
    }
}
