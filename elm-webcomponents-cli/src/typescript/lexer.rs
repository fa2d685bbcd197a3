//! TypeScript tokenizer.
//!
//! Only the distinctions the declaration parser needs are made. Operators
//! that never occur in type positions collapse into [`Token::Operator`], and
//! `>` is always a single token so nested type arguments close cleanly.

use logos::{Filter, Lexer, Logos};
use std::ops::Range;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // Comments
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    /// A `/** ... */` comment, cleaned up. Other block comments are skipped.
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/", block_comment)]
    DocComment(String),

    // Literals
    #[regex(r#""([^"\\\n]|\\.)*""#, string_literal)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#, string_literal)]
    String(String),

    #[regex(r"`([^`\\]|\\.)*`")]
    Template,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?", decimal)]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", decimal)]
    #[regex(r"0[xX][0-9a-fA-F_]+", hexadecimal)]
    Number(f64),

    #[regex(r"[0-9][0-9_]*n")]
    BigInt,

    // Identifiers
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r"#[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice().to_string())]
    PrivateName(String),

    // Delimiters
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    // Punctuation
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("?")]
    Question,
    #[token("=")]
    Eq,
    #[token("=>")]
    FatArrow,
    #[token("|")]
    Pipe,
    #[token("&")]
    Amp,
    #[token("@")]
    At,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,

    /// Any other operator. Never starts with `>`.
    #[regex(r"===?|!==?|<=|<<=?|&&=?|\|\|=?|\?\?=?|\?\.|\+\+|--|\*\*=?|[+\-*/%&|^]=|[+/%!~^]")]
    Operator,
}

fn block_comment(lex: &mut Lexer<Token>) -> Filter<String> {
    let text = lex.slice();
    if text.starts_with("/**") && text != "/**/" {
        Filter::Emit(clean_doc_comment(text))
    } else {
        Filter::Skip
    }
}

/// Strip the comment markers and leading `*` gutters, and drop JSDoc tag
/// sections (`@param` and friends).
pub fn clean_doc_comment(text: &str) -> String {
    let body = text.strip_prefix("/**").unwrap_or(text);
    let body = body.strip_suffix("*/").unwrap_or(body).trim_end_matches('*');

    let mut lines = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        let line = line.strip_prefix('*').unwrap_or(line);
        let line = line.strip_prefix(' ').unwrap_or(line).trim_end();
        if line.starts_with('@') {
            break;
        }
        lines.push(line);
    }

    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

fn string_literal(lex: &mut Lexer<Token>) -> String {
    let s = lex.slice();
    unescape(&s[1..s.len() - 1])
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn decimal(lex: &mut Lexer<Token>) -> Option<f64> {
    lex.slice().replace('_', "").parse().ok()
}

fn hexadecimal(lex: &mut Lexer<Token>) -> Option<f64> {
    let digits = lex.slice()[2..].replace('_', "");
    u64::from_str_radix(&digits, 16).ok().map(|n| n as f64)
}

/// A token with its byte range and layout information.
#[derive(Debug, Clone)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Range<usize>,
    /// A line break separates this token from the previous one.
    pub newline_before: bool,
    /// Doc comment directly preceding this token.
    pub doc: Option<String>,
}

pub type SpannedToken = Spanned<Token>;

/// A character sequence no token matches.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub span: Range<usize>,
    pub text: String,
}

/// Tokenize a TypeScript source file.
///
/// Doc comments do not appear in the output; each one is attached to the
/// token that follows it.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    let mut previous_end = 0;
    let mut doc = None;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(Token::DocComment(text)) => doc = Some(text),
            Ok(token) => {
                let newline_before = source[previous_end..span.start].contains('\n');
                previous_end = span.end;
                tokens.push(Spanned {
                    value: token,
                    span,
                    newline_before,
                    doc: doc.take(),
                });
            }
            Err(_) => {
                return Err(LexError {
                    text: source[span.clone()].to_string(),
                    span,
                })
            }
        }
    }

    Ok(tokens)
}

/// 1-based line and column of a byte offset.
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before.chars().count(), |i| before[i + 1..].chars().count())
        + 1;
    (line, column)
}
