//! Elm lexical helpers: identifiers, string literals, parenthesization.

/// Words that can never be used as Elm identifiers.
const RESERVED_WORDS: &[&str] = &[
    "if", "then", "else", "case", "of", "let", "in", "type", "module", "where", "import",
    "exposing", "as", "port", "alias", "infix", "effect",
];

/// True for Elm keywords.
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// True for identifiers usable as values, functions and record fields.
pub fn is_lower_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_lower = matches!(chars.next(), Some(c) if c.is_ascii_lowercase());
    starts_lower
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !is_reserved_word(name)
}

/// True for identifiers usable as type and module segment names.
pub fn is_upper_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// True for dotted module names such as `Components.MyElement`.
pub fn is_module_name(name: &str) -> bool {
    name.split('.').all(is_upper_identifier)
}

/// Render a double-quoted Elm string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Wrap an expression in parentheses unless it is already atomic.
///
/// Atomic means a single token (qualified names, field accesses, list and
/// record literals count) or an expression that is already parenthesized as
/// a whole.
pub fn arg(expr: &str) -> String {
    if is_atomic(expr) {
        expr.to_string()
    } else {
        format!("({expr})")
    }
}

fn is_atomic(expr: &str) -> bool {
    let bytes = expr.as_bytes();
    if bytes.is_empty() {
        return false;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => {
                depth = depth.saturating_sub(1);
                // A closing bracket before the end means the outer group
                // does not span the whole expression.
                if depth == 0 && i + 1 != bytes.len() && is_group_start(bytes[0]) {
                    return false;
                }
            }
            b' ' | b'\n' if depth == 0 => return false,
            _ => {}
        }
    }
    true
}

fn is_group_start(b: u8) -> bool {
    matches!(b, b'(' | b'[' | b'{')
}
