//! Lexer for formula term bodies.
//!
//! Operates on a single signless term after whitespace stripping and
//! shorthand normalization. The token set is deliberately small — the
//! parser in [`crate::compiler`] matches the token sequence against the
//! dice grammar and falls back to a lone numeric literal.

use logos::Logos;

/// A token inside a formula term body.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    /// Keep-highest marker `kh`.
    #[token("kh", ignore(ascii_case))]
    KeepHigh,

    /// Keep-lowest marker `kl`.
    #[token("kl", ignore(ascii_case))]
    KeepLow,

    /// Drop-highest marker `dh`.
    #[token("dh", ignore(ascii_case))]
    DropHigh,

    /// Drop-lowest marker `dl`.
    #[token("dl", ignore(ascii_case))]
    DropLow,

    /// Dice separator `d` between count and faces.
    #[token("d", ignore(ascii_case))]
    Die,

    /// Reroll marker `r`.
    #[token("r", ignore(ascii_case))]
    Reroll,

    /// Comparison `<=`.
    #[token("<=")]
    LessEq,

    /// Comparison `>=`.
    #[token(">=")]
    GreaterEq,

    /// Comparison `<`.
    #[token("<")]
    Less,

    /// Comparison `>`.
    #[token(">")]
    Greater,

    /// Comparison `=`.
    #[token("=")]
    Equal,

    /// Exploding-dice marker `!`.
    #[token("!")]
    Bang,

    /// Decimal literal (digits on both sides of the point).
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Decimal(f64),

    /// Integer literal.
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    Integer(u64),
}

/// Tokenize a term body.
///
/// Returns `None` if any part of the body fails to lex; the caller reports
/// the whole term as unrecognized.
pub fn lex(body: &str) -> Option<Vec<Token>> {
    Token::lexer(body).collect::<Result<Vec<_>, _>>().ok()
}
