//! Formula tokenizing.
//!
//! Formula text is split at every boundary next to one of `+ - * / ( )`.
//! Each of those characters becomes its own [`Token::Symbol`]; the text
//! between them is trimmed and kept as a [`Token::Operand`] when non-empty.
//! Operands are not validated here: `12`, `var1` and `two words` are all
//! operands.

use std::fmt;

/// An arithmetic operator or a parenthesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
}

impl Symbol {
    pub fn from_char(c: char) -> Option<Symbol> {
        match c {
            '+' => Some(Symbol::Plus),
            '-' => Some(Symbol::Minus),
            '*' => Some(Symbol::Star),
            '/' => Some(Symbol::Slash),
            '(' => Some(Symbol::Open),
            ')' => Some(Symbol::Close),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::Plus => '+',
            Symbol::Minus => '-',
            Symbol::Star => '*',
            Symbol::Slash => '/',
            Symbol::Open => '(',
            Symbol::Close => ')',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Symbol(Symbol),
    Operand(String),
}

impl Token {
    pub fn operand(text: &str) -> Token {
        Token::Operand(text.to_string())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Symbol(s) => write!(f, "{}", s.as_char()),
            Token::Operand(text) => f.write_str(text),
        }
    }
}

/// Whether `text` contains any operator or parenthesis character.
pub fn has_symbol(text: &str) -> bool {
    text.chars().any(|c| Symbol::from_char(c).is_some())
}

/// Split formula text (leading `=` already stripped) into tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut operand_start = 0;

    for (i, c) in text.char_indices() {
        let Some(symbol) = Symbol::from_char(c) else {
            continue;
        };
        push_operand(&mut tokens, &text[operand_start..i]);
        tokens.push(Token::Symbol(symbol));
        operand_start = i + c.len_utf8();
    }
    push_operand(&mut tokens, &text[operand_start..]);

    tracing::debug!("Tokenized {:?} into {} tokens", text, tokens.len());
    tokens
}

fn push_operand(tokens: &mut Vec<Token>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        tokens.push(Token::operand(trimmed));
    }
}

/// Concatenate tokens back into expression text.
pub fn join_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(Token::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<String> {
        tokens.iter().map(Token::to_string).collect()
    }

    #[test]
    fn test_tokenize_digits() {
        let tokens = tokenize("1+2*3/4-(5+6)");
        assert_eq!(
            texts(&tokens),
            vec!["1", "+", "2", "*", "3", "/", "4", "-", "(", "5", "+", "6", ")"]
        );
    }

    #[test]
    fn test_tokenize_trims_spaces() {
        let tokens = tokenize("1 +  2 *  3 / 4  -  ( 5 +  6 ) ");
        assert_eq!(
            texts(&tokens),
            vec!["1", "+", "2", "*", "3", "/", "4", "-", "(", "5", "+", "6", ")"]
        );
    }

    #[test]
    fn test_tokenize_cell_names() {
        let tokens = tokenize("cell1 + cell1 * (cell1 + cell1)");
        assert_eq!(tokens[0], Token::operand("cell1"));
        assert_eq!(tokens[1], Token::Symbol(Symbol::Plus));
        assert_eq!(tokens.len(), 9);
    }

    #[test]
    fn test_tokenize_keeps_inner_whitespace() {
        assert_eq!(tokenize(" two words "), vec![Token::operand("two words")]);
    }

    #[test]
    fn test_tokenize_empty_and_blank() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_tokenize_adjacent_symbols() {
        assert_eq!(texts(&tokenize("-(-1)")), vec!["-", "(", "-", "1", ")"]);
    }

    #[test]
    fn test_has_symbol() {
        assert!(has_symbol("a+b"));
        assert!(has_symbol("(x)"));
        assert!(!has_symbol("hello"));
        assert!(!has_symbol("3.5"));
    }
}
