//! Recursive-descent parser for TypeScript declarations.
//!
//! The parser understands type aliases, interfaces, enums, namespaces and
//! classes with decorators, plus the full type expression grammar. Any
//! other statement is skipped by bracket matching and automatic semicolon
//! insertion, so ordinary component modules (imports, helper functions,
//! method bodies) parse without the reader having to understand them.

use super::ast::{
    ClassDecl, ClassProperty, Decorator, EnumDecl, Expr, Interface, Item, Keyword, Module,
    PropertySignature, TypeAlias, TypeExpr, TypeParam,
};
use super::lexer::{tokenize, SpannedToken, Token};

/// A syntax error at a byte offset.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub offset: usize,
    pub message: String,
}

type ParseResult<T> = Result<T, SyntaxError>;

/// Parse a whole source file.
pub fn parse(source: &str) -> ParseResult<Module> {
    let tokens = tokenize(source).map_err(|e| SyntaxError {
        offset: e.span.start,
        message: format!("unexpected character '{}'", e.text),
    })?;
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
    };
    let items = parser.parse_items(false)?;
    Ok(Module { items })
}

/// Class member modifiers. Each is only a modifier when a member name
/// follows; `get: string` declares a property called `get`.
const MEMBER_MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "static",
    "readonly",
    "abstract",
    "override",
    "declare",
    "accessor",
    "async",
    "get",
    "set",
];

/// Parsed body of an object type or interface.
struct ObjectBody {
    members: Vec<PropertySignature>,
    index_signature: bool,
    call_signature: bool,
}

impl ObjectBody {
    /// Why the body cannot be read as a plain record, if it cannot.
    fn opaque_reason(&self) -> Option<&'static str> {
        if self.index_signature {
            Some("object type with index signature")
        } else if self.call_signature {
            Some("callable object type")
        } else {
            None
        }
    }
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl<'a> Parser<'a> {
    // =========================================================================
    // Token helpers
    // =========================================================================

    fn peek(&self) -> Option<&Token> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|t| &t.value)
    }

    fn at(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn ident_at(&self, offset: usize) -> Option<&str> {
        match self.peek_at(offset) {
            Some(Token::Ident(name)) => Some(name),
            _ => None,
        }
    }

    fn at_ident(&self, word: &str) -> bool {
        self.ident_at(0) == Some(word)
    }

    /// Source text of the current token.
    fn text(&self) -> &'a str {
        match self.tokens.get(self.pos) {
            Some(t) => &self.source[t.span.clone()],
            None => "",
        }
    }

    fn newline_before(&self) -> bool {
        self.tokens.get(self.pos).is_some_and(|t| t.newline_before)
    }

    fn doc(&self) -> String {
        self.tokens
            .get(self.pos)
            .and_then(|t| t.doc.clone())
            .unwrap_or_default()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|t| t.value.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.at(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_ident(&mut self, word: &str) -> bool {
        if self.at_ident(word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, what: &str) -> ParseResult<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn expect_ident(&mut self, what: &str) -> ParseResult<String> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        let offset = self
            .tokens
            .get(self.pos)
            .map_or(self.source.len(), |t| t.span.start);
        SyntaxError {
            offset,
            message: message.into(),
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        if self.at_end() {
            self.error(format!("expected {expected}, found end of file"))
        } else {
            self.error(format!("expected {expected}, found '{}'", self.text()))
        }
    }

    /// True when the previous token can end a statement.
    fn previous_ends_statement(&self) -> bool {
        let Some(previous) = self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) else {
            return false;
        };
        matches!(
            previous.value,
            Token::Ident(_)
                | Token::PrivateName(_)
                | Token::String(_)
                | Token::Template
                | Token::Number(_)
                | Token::BigInt
                | Token::RBrace
                | Token::RParen
                | Token::RBracket
        )
    }

    /// True when the current token continues the previous expression even
    /// across a line break.
    fn continues_expression(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::Dot
                    | Token::Operator
                    | Token::Eq
                    | Token::FatArrow
                    | Token::Question
                    | Token::Colon
                    | Token::Pipe
                    | Token::Amp
                    | Token::Comma
                    | Token::Lt
                    | Token::Gt
                    | Token::Star
                    | Token::LParen
                    | Token::LBracket
            )
        )
    }

    /// Automatic semicolon insertion point.
    fn at_line_break(&self) -> bool {
        self.newline_before() && self.previous_ends_statement() && !self.continues_expression()
    }

    /// Index of the bracket closing the one at `open`.
    fn matching_close(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            match token.value {
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Skip a bracketed group starting at the current token.
    fn skip_balanced(&mut self) -> ParseResult<()> {
        match self.matching_close(self.pos) {
            Some(close) => {
                self.pos = close + 1;
                Ok(())
            }
            None => Err(self.error(format!("unclosed '{}'", self.text()))),
        }
    }

    /// Skip `<...>` by counting angle brackets.
    fn skip_angle_brackets(&mut self) -> ParseResult<()> {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token {
                Token::Lt => depth += 1,
                Token::Gt => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.pos += 1;
                        return Ok(());
                    }
                }
                Token::LParen | Token::LBracket | Token::LBrace => {
                    self.skip_balanced()?;
                    continue;
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(self.unexpected("'>'"))
    }

    /// Skip an expression up to (not including) a `,` `;` or unbalanced
    /// closing bracket, or an automatic semicolon insertion point.
    fn skip_expression(&mut self) -> ParseResult<()> {
        let start = self.pos;
        while let Some(token) = self.peek() {
            match token {
                Token::Comma | Token::Semi | Token::RParen | Token::RBracket | Token::RBrace => {
                    return Ok(())
                }
                Token::LParen | Token::LBracket | Token::LBrace => self.skip_balanced()?,
                _ if self.pos > start && self.at_line_break() => return Ok(()),
                _ => self.pos += 1,
            }
        }
        Ok(())
    }

    /// Skip a statement the reader does not model.
    fn skip_statement(&mut self) -> ParseResult<()> {
        let start = self.pos;
        while let Some(token) = self.peek() {
            match token {
                Token::Semi => {
                    self.pos += 1;
                    return Ok(());
                }
                Token::RParen | Token::RBracket | Token::RBrace => break,
                Token::LParen | Token::LBracket | Token::LBrace => self.skip_balanced()?,
                _ if self.pos > start && self.at_line_break() => return Ok(()),
                _ => self.pos += 1,
            }
        }
        if self.pos == start {
            return Err(self.error(format!("unexpected '{}'", self.text())));
        }
        Ok(())
    }

    /// Consume the end of a declaration: `;`, a line break or a closing `}`.
    fn end_of_member(&mut self, what: &str) -> ParseResult<()> {
        if self.eat(&Token::Semi) || self.eat(&Token::Comma) {
            return Ok(());
        }
        if self.at(&Token::RBrace) || self.at_end() || self.newline_before() {
            return Ok(());
        }
        Err(self.unexpected(what))
    }

    // =========================================================================
    // Items
    // =========================================================================

    fn parse_items(&mut self, in_block: bool) -> ParseResult<Vec<Item>> {
        let mut items = Vec::new();
        loop {
            if self.at_end() {
                if in_block {
                    return Err(self.unexpected("'}'"));
                }
                break;
            }
            if in_block && self.eat(&Token::RBrace) {
                break;
            }
            self.parse_item(&mut items)?;
        }
        Ok(items)
    }

    fn parse_item(&mut self, items: &mut Vec<Item>) -> ParseResult<()> {
        if self.eat(&Token::Semi) {
            return Ok(());
        }

        let doc = self.doc();
        let decorators = self.parse_decorators()?;

        loop {
            match self.ident_at(0) {
                Some("export" | "declare" | "default") => self.pos += 1,
                Some("abstract") if self.ident_at(1) == Some("class") => self.pos += 1,
                Some("const") if self.ident_at(1) == Some("enum") => self.pos += 1,
                _ => break,
            }
        }

        let next_is_name = matches!(self.peek_at(1), Some(Token::Ident(_)));
        match self.ident_at(0) {
            Some("class") => {
                let class = self.parse_class(doc, decorators)?;
                items.push(Item::Class(class));
                return Ok(());
            }
            _ if !decorators.is_empty() => {
                return Err(self.unexpected("a class after decorators"));
            }
            Some("type") if next_is_name => {
                let alias = self.parse_type_alias()?;
                items.push(Item::TypeAlias(alias));
            }
            Some("interface") if next_is_name => {
                let interface = self.parse_interface()?;
                items.push(Item::Interface(interface));
            }
            Some("enum") if next_is_name => {
                let decl = self.parse_enum()?;
                items.push(Item::Enum(decl));
            }
            Some("namespace" | "module" | "global") if self.starts_namespace() => {
                items.extend(self.parse_namespace()?);
            }
            _ => self.skip_statement()?,
        }
        Ok(())
    }

    fn starts_namespace(&self) -> bool {
        let mut offset = 1;
        while let Some(token) = self.peek_at(offset) {
            match token {
                Token::Ident(_) | Token::String(_) | Token::Dot => offset += 1,
                Token::LBrace => return true,
                _ => return false,
            }
        }
        false
    }

    /// Namespace members are flattened into the enclosing scope.
    fn parse_namespace(&mut self) -> ParseResult<Vec<Item>> {
        while !self.eat(&Token::LBrace) {
            self.pos += 1;
        }
        self.parse_items(true)
    }

    fn parse_type_alias(&mut self) -> ParseResult<TypeAlias> {
        self.expect_ident("'type'")?;
        let name = self.expect_ident("a type name")?;
        let params = self.parse_type_params()?;
        self.expect(&Token::Eq, "'='")?;
        let ty = self.parse_type()?;
        self.end_of_member("';'")?;
        Ok(TypeAlias { name, params, ty })
    }

    fn parse_interface(&mut self) -> ParseResult<Interface> {
        self.expect_ident("'interface'")?;
        let name = self.expect_ident("an interface name")?;
        let params = self.parse_type_params()?;

        let mut extends = Vec::new();
        if self.eat_ident("extends") {
            loop {
                extends.push(self.parse_type()?);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }

        self.expect(&Token::LBrace, "'{'")?;
        let body = self.parse_object_body()?;
        let opaque = body.opaque_reason().map(str::to_string);
        Ok(Interface {
            name,
            params,
            extends,
            members: body.members,
            opaque,
        })
    }

    fn parse_enum(&mut self) -> ParseResult<EnumDecl> {
        self.expect_ident("'enum'")?;
        let name = self.expect_ident("an enum name")?;
        self.expect(&Token::LBrace, "'{'")?;

        let mut members = Vec::new();
        while !self.eat(&Token::RBrace) {
            match self.bump() {
                Some(Token::Ident(member) | Token::String(member)) => members.push(member),
                _ => {
                    self.pos = self.pos.saturating_sub(1);
                    return Err(self.unexpected("an enum member"));
                }
            }
            if self.eat(&Token::Eq) {
                self.skip_expression()?;
            }
            if !self.eat(&Token::Comma) && !self.at(&Token::RBrace) {
                return Err(self.unexpected("',' or '}'"));
            }
        }
        Ok(EnumDecl { name, members })
    }

    // =========================================================================
    // Classes
    // =========================================================================

    fn parse_decorators(&mut self) -> ParseResult<Vec<Decorator>> {
        let mut decorators = Vec::new();
        while self.eat(&Token::At) {
            let mut name = self.expect_ident("a decorator name")?;
            while self.eat(&Token::Dot) {
                name = self.expect_ident("a decorator name")?;
            }
            let mut arguments = Vec::new();
            if self.eat(&Token::LParen) {
                while !self.eat(&Token::RParen) {
                    arguments.push(self.parse_expr()?);
                    if !self.eat(&Token::Comma) && !self.at(&Token::RParen) {
                        return Err(self.unexpected("',' or ')'"));
                    }
                }
            }
            decorators.push(Decorator { name, arguments });
        }
        Ok(decorators)
    }

    fn parse_class(&mut self, doc: String, decorators: Vec<Decorator>) -> ParseResult<ClassDecl> {
        self.expect_ident("'class'")?;
        let name = match self.ident_at(0) {
            Some("extends" | "implements") | None => String::new(),
            Some(name) => {
                let name = name.to_string();
                self.pos += 1;
                name
            }
        };
        let params = self.parse_type_params()?;

        let extends = if self.eat_ident("extends") {
            Some(self.parse_heritage()?)
        } else {
            None
        };
        if self.eat_ident("implements") {
            loop {
                self.parse_type()?;
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }

        self.expect(&Token::LBrace, "'{'")?;
        let mut members = Vec::new();
        while !self.eat(&Token::RBrace) {
            if self.at_end() {
                return Err(self.unexpected("'}'"));
            }
            if let Some(member) = self.parse_class_member()? {
                members.push(member);
            }
        }

        Ok(ClassDecl {
            name,
            doc,
            decorators,
            params,
            extends,
            members,
        })
    }

    /// `extends Base<Args>`, read as a type reference.
    fn parse_heritage(&mut self) -> ParseResult<TypeExpr> {
        if !matches!(self.peek(), Some(Token::Ident(_))) {
            self.skip_expression()?;
            return Ok(TypeExpr::Other("computed base class".to_string()));
        }
        let name = self.parse_entity_name()?;
        let args = if self.at(&Token::Lt) {
            self.parse_type_args()?
        } else {
            Vec::new()
        };
        if self.at(&Token::LParen) {
            self.skip_balanced()?;
            return Ok(TypeExpr::Other(format!("computed base class {name}(...)")));
        }
        Ok(TypeExpr::Reference { name, args })
    }

    fn starts_member_name(&self, offset: usize) -> bool {
        let Some(token) = self.tokens.get(self.pos + offset) else {
            return false;
        };
        matches!(
            token.value,
            Token::Ident(_)
                | Token::PrivateName(_)
                | Token::String(_)
                | Token::Number(_)
                | Token::LBracket
                | Token::Star
                | Token::LBrace
        )
    }

    fn parse_class_member(&mut self) -> ParseResult<Option<ClassProperty>> {
        if self.eat(&Token::Semi) {
            return Ok(None);
        }

        let doc = self.doc();
        let decorators = self.parse_decorators()?;

        let mut is_getter = false;
        let mut is_setter = false;
        while let Some(word) = self.ident_at(0) {
            if !MEMBER_MODIFIERS.contains(&word) || !self.starts_member_name(1) {
                break;
            }
            is_getter |= word == "get";
            is_setter |= word == "set";
            self.pos += 1;
        }

        // static initialization block
        if self.at(&Token::LBrace) {
            self.skip_balanced()?;
            return Ok(None);
        }
        self.eat(&Token::Star);

        let name = match self.peek().cloned() {
            Some(Token::Ident(name) | Token::PrivateName(name) | Token::String(name)) => {
                self.pos += 1;
                name
            }
            Some(Token::Number(n)) => {
                self.pos += 1;
                n.to_string()
            }
            Some(Token::LBracket) => {
                self.skip_balanced()?;
                String::new()
            }
            _ => return Err(self.unexpected("a class member")),
        };

        // optional `?` or definite assignment `!`
        if !self.eat(&Token::Question) && self.at(&Token::Operator) && self.text() == "!" {
            self.pos += 1;
        }

        if self.at(&Token::LParen) || self.at(&Token::Lt) {
            let return_type = self.skip_method()?;
            if is_getter && !name.is_empty() {
                return Ok(Some(ClassProperty {
                    name,
                    doc,
                    decorators,
                    ty: return_type,
                    initializer: None,
                }));
            }
            return Ok(None);
        }
        if is_setter {
            return Err(self.unexpected("'('"));
        }

        let ty = if self.eat(&Token::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let initializer = if self.eat(&Token::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.end_of_member("';'")?;

        if name.is_empty() {
            return Ok(None);
        }
        Ok(Some(ClassProperty {
            name,
            doc,
            decorators,
            ty,
            initializer,
        }))
    }

    /// Skip a method's signature and body, returning its declared return type.
    fn skip_method(&mut self) -> ParseResult<Option<TypeExpr>> {
        if self.at(&Token::Lt) {
            self.skip_angle_brackets()?;
        }
        if !self.at(&Token::LParen) {
            return Err(self.unexpected("'('"));
        }
        self.skip_balanced()?;
        let return_type = if self.eat(&Token::Colon) {
            Some(self.parse_return_type()?)
        } else {
            None
        };
        if self.at(&Token::LBrace) {
            self.skip_balanced()?;
        } else {
            self.end_of_member("a method body")?;
        }
        Ok(return_type)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Read a literal expression; anything else is skipped as [`Expr::Other`].
    fn parse_expr(&mut self) -> ParseResult<Expr> {
        let start = self.pos;
        let value = self.parse_literal()?;
        let at_end = matches!(
            self.peek(),
            None | Some(
                Token::Comma | Token::Semi | Token::RParen | Token::RBracket | Token::RBrace
            )
        ) || self.at_line_break();

        if at_end {
            return Ok(value);
        }
        if self.pos == start {
            self.pos += 1;
        }
        self.skip_expression()?;
        Ok(Expr::Other)
    }

    fn parse_literal(&mut self) -> ParseResult<Expr> {
        let value = match self.peek() {
            None
            | Some(Token::Comma | Token::Semi | Token::RParen | Token::RBracket | Token::RBrace) => {
                return Ok(Expr::Other)
            }
            Some(Token::String(s)) => Expr::String(s.clone()),
            Some(Token::Number(n)) => Expr::Number(*n),
            Some(Token::Minus) => {
                if let Some(Token::Number(n)) = self.peek_at(1) {
                    let n = -*n;
                    self.pos += 2;
                    return Ok(Expr::Number(n));
                }
                return Ok(Expr::Other);
            }
            Some(Token::Ident(word)) => match word.as_str() {
                "true" => Expr::Bool(true),
                "false" => Expr::Bool(false),
                "null" => Expr::Null,
                "undefined" => Expr::Undefined,
                _ => Expr::Other,
            },
            Some(Token::LBrace) => return self.parse_object_literal(),
            Some(Token::LBracket) => return self.parse_array_literal(),
            Some(Token::LParen) => {
                self.skip_balanced()?;
                return Ok(Expr::Other);
            }
            _ => Expr::Other,
        };
        self.pos += 1;
        Ok(value)
    }

    fn parse_object_literal(&mut self) -> ParseResult<Expr> {
        self.expect(&Token::LBrace, "'{'")?;
        let mut entries = Vec::new();
        while !self.eat(&Token::RBrace) {
            let key = match self.peek() {
                Some(Token::Ident(key) | Token::String(key)) => Some(key.clone()),
                Some(Token::Number(n)) => Some(n.to_string()),
                _ => None,
            };
            match key {
                Some(key) if self.peek_at(1) == Some(&Token::Colon) => {
                    self.pos += 2;
                    entries.push((key, self.parse_expr()?));
                }
                // shorthand, spread, method or computed key
                _ => {
                    if self.at(&Token::LBracket) {
                        self.skip_balanced()?;
                    }
                    self.skip_expression()?;
                    if self.at(&Token::LBrace) {
                        self.skip_balanced()?;
                    }
                }
            }
            if !self.eat(&Token::Comma) && !self.at(&Token::RBrace) {
                return Err(self.unexpected("',' or '}'"));
            }
        }
        Ok(Expr::Object(entries))
    }

    fn parse_array_literal(&mut self) -> ParseResult<Expr> {
        self.expect(&Token::LBracket, "'['")?;
        let mut elements = Vec::new();
        while !self.eat(&Token::RBracket) {
            elements.push(self.parse_expr()?);
            if !self.eat(&Token::Comma) && !self.at(&Token::RBracket) {
                return Err(self.unexpected("',' or ']'"));
            }
        }
        Ok(Expr::Array(elements))
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_type_params(&mut self) -> ParseResult<Vec<TypeParam>> {
        let mut params = Vec::new();
        if !self.eat(&Token::Lt) {
            return Ok(params);
        }
        while !self.eat(&Token::Gt) {
            while matches!(self.ident_at(0), Some("in" | "out" | "const"))
                && matches!(self.peek_at(1), Some(Token::Ident(_)))
            {
                self.pos += 1;
            }
            let name = self.expect_ident("a type parameter")?;
            if self.eat_ident("extends") {
                self.parse_type()?;
            }
            let default = if self.eat(&Token::Eq) {
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(TypeParam { name, default });
            if !self.eat(&Token::Comma) && !self.at(&Token::Gt) {
                return Err(self.unexpected("',' or '>'"));
            }
        }
        Ok(params)
    }

    fn parse_type_args(&mut self) -> ParseResult<Vec<TypeExpr>> {
        self.expect(&Token::Lt, "'<'")?;
        let mut args = Vec::new();
        while !self.eat(&Token::Gt) {
            args.push(self.parse_type()?);
            if !self.eat(&Token::Comma) && !self.at(&Token::Gt) {
                return Err(self.unexpected("',' or '>'"));
            }
        }
        Ok(args)
    }

    fn parse_entity_name(&mut self) -> ParseResult<String> {
        let mut name = self.expect_ident("a name")?;
        while self.at(&Token::Dot) && matches!(self.peek_at(1), Some(Token::Ident(_))) {
            self.pos += 1;
            name.push('.');
            name.push_str(&self.expect_ident("a name")?);
        }
        Ok(name)
    }

    pub(crate) fn parse_type(&mut self) -> ParseResult<TypeExpr> {
        let ty = self.parse_union()?;
        if self.at_ident("extends") && !self.newline_before() {
            self.pos += 1;
            self.parse_union()?;
            self.expect(&Token::Question, "'?'")?;
            self.parse_type()?;
            self.expect(&Token::Colon, "':'")?;
            self.parse_type()?;
            return Ok(TypeExpr::Other("conditional type".to_string()));
        }
        Ok(ty)
    }

    /// A return type, which may be a type predicate (`x is T`).
    fn parse_return_type(&mut self) -> ParseResult<TypeExpr> {
        if self.at_ident("asserts") && matches!(self.peek_at(1), Some(Token::Ident(_))) {
            self.pos += 2;
            if self.eat_ident("is") {
                self.parse_type()?;
            }
            return Ok(TypeExpr::Keyword(Keyword::Void));
        }
        if matches!(self.peek(), Some(Token::Ident(_))) && self.ident_at(1) == Some("is") {
            self.pos += 2;
            self.parse_type()?;
            return Ok(TypeExpr::Keyword(Keyword::Boolean));
        }
        self.parse_type()
    }

    fn parse_union(&mut self) -> ParseResult<TypeExpr> {
        self.eat(&Token::Pipe);
        let mut members = vec![self.parse_intersection()?];
        while self.eat(&Token::Pipe) {
            members.push(self.parse_intersection()?);
        }
        Ok(if members.len() == 1 {
            members.remove(0)
        } else {
            TypeExpr::Union(members)
        })
    }

    fn parse_intersection(&mut self) -> ParseResult<TypeExpr> {
        self.eat(&Token::Amp);
        let mut members = vec![self.parse_postfix()?];
        while self.eat(&Token::Amp) {
            members.push(self.parse_postfix()?);
        }
        Ok(if members.len() == 1 {
            members.remove(0)
        } else {
            TypeExpr::Intersection(members)
        })
    }

    fn parse_postfix(&mut self) -> ParseResult<TypeExpr> {
        let mut ty = self.parse_primary()?;
        while self.at(&Token::LBracket) && !self.newline_before() {
            if self.peek_at(1) == Some(&Token::RBracket) {
                self.pos += 2;
                ty = TypeExpr::Array(Box::new(ty));
            } else {
                self.pos += 1;
                self.parse_type()?;
                self.expect(&Token::RBracket, "']'")?;
                ty = TypeExpr::Other(format!("indexed access type {ty}[...]"));
            }
        }
        Ok(ty)
    }

    fn starts_function_type(&self) -> bool {
        match self.peek() {
            Some(Token::Lt) => true,
            Some(Token::LParen) => self
                .matching_close(self.pos)
                .is_some_and(|close| {
                    self.tokens.get(close + 1).map(|t| &t.value) == Some(&Token::FatArrow)
                }),
            Some(Token::Ident(word)) => match word.as_str() {
                "new" => true,
                "abstract" => self.ident_at(1) == Some("new"),
                _ => false,
            },
            _ => false,
        }
    }

    fn skip_function_type(&mut self) -> ParseResult<()> {
        self.eat_ident("abstract");
        self.eat_ident("new");
        if self.at(&Token::Lt) {
            self.skip_angle_brackets()?;
        }
        if !self.at(&Token::LParen) {
            return Err(self.unexpected("'('"));
        }
        self.skip_balanced()?;
        self.expect(&Token::FatArrow, "'=>'")?;
        self.parse_return_type()?;
        Ok(())
    }

    fn parse_primary(&mut self) -> ParseResult<TypeExpr> {
        if self.starts_function_type() {
            self.skip_function_type()?;
            return Ok(TypeExpr::Function);
        }

        let ty = match self.peek().cloned() {
            Some(Token::LParen) => {
                self.pos += 1;
                let inner = self.parse_type()?;
                self.expect(&Token::RParen, "')'")?;
                inner
            }
            Some(Token::LBrace) => self.parse_object_type()?,
            Some(Token::LBracket) => self.parse_tuple_type()?,
            Some(Token::String(s)) => {
                self.pos += 1;
                TypeExpr::StringLiteral(s)
            }
            Some(Token::Number(n)) => {
                self.pos += 1;
                TypeExpr::NumberLiteral(n)
            }
            Some(Token::Minus) => {
                self.pos += 1;
                match self.bump() {
                    Some(Token::Number(n)) => TypeExpr::NumberLiteral(-n),
                    _ => {
                        self.pos -= 1;
                        return Err(self.unexpected("a number"));
                    }
                }
            }
            Some(Token::BigInt) => {
                self.pos += 1;
                TypeExpr::Other("bigint literal type".to_string())
            }
            Some(Token::Template) => {
                self.pos += 1;
                TypeExpr::Other("template literal type".to_string())
            }
            Some(Token::Ident(word)) => self.parse_named_type(&word)?,
            _ => return Err(self.unexpected("a type")),
        };
        Ok(ty)
    }

    fn parse_named_type(&mut self, word: &str) -> ParseResult<TypeExpr> {
        match word {
            "typeof" => {
                self.pos += 1;
                let name = self.parse_entity_name()?;
                if self.at(&Token::Lt) {
                    self.skip_angle_brackets()?;
                }
                Ok(TypeExpr::Other(format!("typeof {name}")))
            }
            "keyof" => {
                self.pos += 1;
                let inner = self.parse_postfix()?;
                Ok(TypeExpr::Other(format!("keyof {inner}")))
            }
            "readonly" => {
                self.pos += 1;
                self.parse_postfix()
            }
            "unique" if self.ident_at(1) == Some("symbol") => {
                self.pos += 2;
                Ok(TypeExpr::Keyword(Keyword::Symbol))
            }
            "infer" => {
                self.pos += 1;
                let name = self.expect_ident("a type parameter")?;
                Ok(TypeExpr::Other(format!("infer {name}")))
            }
            "true" | "false" => {
                self.pos += 1;
                Ok(TypeExpr::BooleanLiteral(word == "true"))
            }
            "this" => {
                self.pos += 1;
                Ok(TypeExpr::Other("this type".to_string()))
            }
            _ => {
                if let Some(keyword) = Keyword::from_name(word) {
                    self.pos += 1;
                    return Ok(TypeExpr::Keyword(keyword));
                }
                let name = self.parse_entity_name()?;
                let args = if self.at(&Token::Lt) && !self.newline_before() {
                    self.parse_type_args()?
                } else {
                    Vec::new()
                };
                Ok(TypeExpr::Reference { name, args })
            }
        }
    }

    fn parse_tuple_type(&mut self) -> ParseResult<TypeExpr> {
        self.expect(&Token::LBracket, "'['")?;
        let mut elements = Vec::new();
        while !self.eat(&Token::RBracket) {
            self.eat(&Token::Ellipsis);
            // named element: `label: T` or `label?: T`
            let named = matches!(self.peek(), Some(Token::Ident(_)))
                && (self.peek_at(1) == Some(&Token::Colon)
                    || (self.peek_at(1) == Some(&Token::Question)
                        && self.peek_at(2) == Some(&Token::Colon)));
            if named {
                self.pos += 1;
                self.eat(&Token::Question);
                self.pos += 1;
            }
            elements.push(self.parse_type()?);
            self.eat(&Token::Question);
            if !self.eat(&Token::Comma) && !self.at(&Token::RBracket) {
                return Err(self.unexpected("',' or ']'"));
            }
        }
        Ok(TypeExpr::Tuple(elements))
    }

    fn starts_mapped_type(&self) -> bool {
        let mut offset = 1;
        if matches!(self.peek_at(offset), Some(Token::Operator | Token::Minus)) {
            offset += 1;
        }
        if self.ident_at(offset) == Some("readonly") {
            offset += 1;
        }
        self.peek_at(offset) == Some(&Token::LBracket)
            && matches!(self.peek_at(offset + 1), Some(Token::Ident(_)))
            && self.ident_at(offset + 2) == Some("in")
    }

    fn parse_object_type(&mut self) -> ParseResult<TypeExpr> {
        if self.starts_mapped_type() {
            self.skip_balanced()?;
            return Ok(TypeExpr::Other("mapped type".to_string()));
        }
        self.expect(&Token::LBrace, "'{'")?;
        let body = self.parse_object_body()?;
        if body.call_signature && body.members.is_empty() && !body.index_signature {
            return Ok(TypeExpr::Function);
        }
        if let Some(reason) = body.opaque_reason() {
            return Ok(TypeExpr::Other(reason.to_string()));
        }
        Ok(TypeExpr::Object(body.members))
    }

    /// Members up to and including the closing `}`.
    fn parse_object_body(&mut self) -> ParseResult<ObjectBody> {
        let mut body = ObjectBody {
            members: Vec::new(),
            index_signature: false,
            call_signature: false,
        };

        while !self.eat(&Token::RBrace) {
            if self.at_end() {
                return Err(self.unexpected("'}'"));
            }
            let doc = self.doc();

            if self.at_ident("readonly") && self.starts_member_name(1) {
                self.pos += 1;
            }

            if self.at(&Token::LParen)
                || self.at(&Token::Lt)
                || (self.at_ident("new") && matches!(self.peek_at(1), Some(Token::LParen | Token::Lt)))
            {
                self.eat_ident("new");
                self.skip_method()?;
                body.call_signature = true;
                continue;
            }

            if self.at(&Token::LBracket) {
                self.skip_balanced()?;
                self.eat(&Token::Question);
                if self.at(&Token::LParen) || self.at(&Token::Lt) {
                    self.skip_method()?;
                    continue;
                }
                self.expect(&Token::Colon, "':'")?;
                self.parse_type()?;
                self.end_of_member("';'")?;
                body.index_signature = true;
                continue;
            }

            let name = match self.bump() {
                Some(Token::Ident(name) | Token::String(name)) => name,
                Some(Token::Number(n)) => n.to_string(),
                _ => {
                    self.pos = self.pos.saturating_sub(1);
                    return Err(self.unexpected("a property name"));
                }
            };
            let optional = self.eat(&Token::Question);

            let ty = if self.at(&Token::LParen) || self.at(&Token::Lt) {
                self.skip_method()?;
                TypeExpr::Function
            } else {
                self.expect(&Token::Colon, "':'")?;
                let ty = self.parse_type()?;
                self.end_of_member("';'")?;
                ty
            };

            body.members.push(PropertySignature {
                name,
                doc,
                optional,
                ty,
            });
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_type_text(text: &str) -> TypeExpr {
        let source = format!("type T = {text};");
        match parse(&source).unwrap().items.remove(0) {
            Item::TypeAlias(alias) => alias.ty,
            other => panic!("expected alias, got {other:?}"),
        }
    }

    fn class(source: &str) -> ClassDecl {
        parse(source)
            .unwrap()
            .items
            .into_iter()
            .find_map(|item| match item {
                Item::Class(class) => Some(class),
                _ => None,
            })
            .expect("a class")
    }

    #[test]
    fn test_type_expressions_round_trip_through_display() {
        for text in [
            "string",
            "number[]",
            "Array<Array<number>>",
            "{ foo: string; bar?: number[] }",
            "\"a\" | \"b\" | null",
            "(string | number)[]",
            "A & B",
            "[string, number]",
            "Map<string, { a: boolean }>",
            "-1",
        ] {
            assert_eq!(parse_type_text(text).to_string(), text);
        }
    }

    #[test]
    fn test_unmodelled_types() {
        assert_eq!(parse_type_text("(a: string) => void"), TypeExpr::Function);
        assert_eq!(parse_type_text("new () => Foo"), TypeExpr::Function);
        assert_eq!(
            parse_type_text("keyof Foo"),
            TypeExpr::Other("keyof Foo".to_string())
        );
        assert_eq!(
            parse_type_text("T extends string ? A : B"),
            TypeExpr::Other("conditional type".to_string())
        );
        assert_eq!(
            parse_type_text("{ [K in Keys]: string }"),
            TypeExpr::Other("mapped type".to_string())
        );
        assert_eq!(
            parse_type_text("{ [key: string]: number }"),
            TypeExpr::Other("object type with index signature".to_string())
        );
        assert_eq!(
            parse_type_text("Foo[\"bar\"]"),
            TypeExpr::Other("indexed access type Foo[...]".to_string())
        );
    }

    #[test]
    fn test_object_members_without_semicolons() {
        let ty = parse_type_text("{\n  /** foo comment */\n  Rendered: { foo: string }\n  other: number\n}");
        let TypeExpr::Object(members) = ty else {
            panic!("expected object");
        };
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "Rendered");
        assert_eq!(members[0].doc, "foo comment");
        assert_eq!(members[1].name, "other");
    }

    #[test]
    fn test_declarations() {
        let module = parse(
            r#"
import { component } from "./component";
import "./side-effect"

export interface Base<T = string> { id: T }
export interface Foo extends Base<number> {
  bar: string;
  baz?: number
}
export const enum Color { Red, Green = "green", }
namespace Ui { export type Size = "s" | "m" }
export function helper<T>(value: T): T[] {
  return [value];
}
const x = 1
"#,
        )
        .unwrap();

        let names: Vec<&str> = module.items.iter().map(Item::name).collect();
        assert_eq!(names, vec!["Base", "Foo", "Color", "Size"]);

        let Item::Interface(foo) = &module.items[1] else {
            panic!("expected interface");
        };
        assert_eq!(foo.extends.len(), 1);
        assert!(foo.members[1].optional);

        let Item::Enum(color) = &module.items[2] else {
            panic!("expected enum");
        };
        assert_eq!(color.members, vec!["Red", "Green"]);
    }

    #[test]
    fn test_component_class() {
        let decl = class(
            r#"
/**
 * Some doc comment
 */
@component("my-element")
export class MyElement extends CustomElement<{
  optionalEvents: {
    /** foo comment */
    Rendered: { foo: string };
  };
  htmlContent: { header: { mode: "single" } };
}> {
  static styles = css`:host { display: block; }`;
  #root: Root;

  /** Some more comments */
  @api() accessor myProp: string = "default value";

  /** Some comments */
  @api({ required: true, renderAfterSet: false })
  accessor otherProp: Foo;

  count = 0
  label = 'x'

  constructor() {
    super();
    this.#root = createRoot(this.shadowRoot!);
  }

  @api() get computed(): number {
    return this.count * 2;
  }

  render() {
    if (this.count > 1) { return; }
    this.dispatchEvent(new CustomEvent("Rendered", { detail: { foo: `x` } }));
  }
}
"#,
        );

        assert_eq!(decl.name, "MyElement");
        assert_eq!(decl.doc, "Some doc comment");
        assert_eq!(
            decl.decorators,
            vec![Decorator {
                name: "component".to_string(),
                arguments: vec![Expr::String("my-element".to_string())],
            }]
        );
        assert!(matches!(
            &decl.extends,
            Some(TypeExpr::Reference { name, args }) if name == "CustomElement" && args.len() == 1
        ));

        let names: Vec<&str> = decl.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["styles", "#root", "myProp", "otherProp", "count", "label", "computed"]
        );

        let my_prop = &decl.members[2];
        assert_eq!(my_prop.doc, "Some more comments");
        assert_eq!(my_prop.ty, Some(TypeExpr::Keyword(Keyword::String)));
        assert_eq!(
            my_prop.initializer,
            Some(Expr::String("default value".to_string()))
        );

        let other = &decl.members[3];
        assert_eq!(
            other.decorators[0].arguments,
            vec![Expr::Object(vec![
                ("required".to_string(), Expr::Bool(true)),
                ("renderAfterSet".to_string(), Expr::Bool(false)),
            ])]
        );

        assert_eq!(decl.members[4].initializer, Some(Expr::Number(0.0)));
        assert_eq!(
            decl.members[6].ty,
            Some(TypeExpr::Keyword(Keyword::Number))
        );
    }

    #[test]
    fn test_decorator_requires_class() {
        let error = parse("@component(\"x\")\nconst a = 1;").unwrap_err();
        assert!(error.message.contains("a class after decorators"));
    }

    #[test]
    fn test_syntax_error_offset() {
        let source = "type A = {\n  foo: ;\n}";
        let error = parse(source).unwrap_err();
        assert_eq!(error.offset, source.find(';').unwrap());
        assert_eq!(error.message, "expected a type, found ';'");
    }
}
