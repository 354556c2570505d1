//! Recursive-descent parser over the token stream.
//!
//! Subgraphs are flattened into the enclosing graph. A subgraph used as an
//! edge endpoint stands for every node mentioned inside it, so
//! `a -> { b c }` yields the edges `a -> b` and `a -> c`.

use indexmap::IndexSet;

use super::error::DotError;
use super::lexer::{Token, TokenKind};
use super::{DotEdge, DotGraph};

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

/// Accumulates the statements of one graph across nested subgraphs.
#[derive(Default)]
struct Builder {
    nodes: IndexSet<String>,
    edges: Vec<DotEdge>,
}

fn is_keyword(kind: &TokenKind, keyword: &str) -> bool {
    matches!(kind, TokenKind::Id { text, quoted: false } if text.eq_ignore_ascii_case(keyword))
}

fn is_any_keyword(kind: &TokenKind) -> bool {
    ["strict", "graph", "digraph", "node", "edge", "subgraph"]
        .iter()
        .any(|k| is_keyword(kind, k))
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Id { text, .. } => format!("`{text}`"),
        TokenKind::LBrace => "`{`".to_string(),
        TokenKind::RBrace => "`}`".to_string(),
        TokenKind::LBracket => "`[`".to_string(),
        TokenKind::RBracket => "`]`".to_string(),
        TokenKind::Semi => "`;`".to_string(),
        TokenKind::Comma => "`,`".to_string(),
        TokenKind::Colon => "`:`".to_string(),
        TokenKind::Equals => "`=`".to_string(),
        TokenKind::Arrow => "`->`".to_string(),
        TokenKind::DashDash => "`--`".to_string(),
    }
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn peek_second(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos + 1).map(|t| &t.kind)
    }

    fn bump(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn error(&self, message: &str) -> DotError {
        match self.tokens.get(self.pos) {
            Some(token) => DotError::syntax(
                token.line,
                token.column,
                format!("{message}, found {}", describe(&token.kind)),
            ),
            None => {
                let (line, column) = self
                    .tokens
                    .last()
                    .map_or((1, 1), |t| (t.line, t.column));
                DotError::syntax(
                    line,
                    column,
                    format!("{message}, found end of input"),
                )
            }
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek().is_some_and(|k| is_keyword(k, keyword)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<(), DotError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(&format!("expected {what}")))
        }
    }

    /// Consumes an identifier that is not a bare keyword.
    fn expect_id(&mut self, what: &str) -> Result<String, DotError> {
        match self.peek() {
            Some(kind @ TokenKind::Id { text, .. }) if !is_any_keyword(kind) => {
                let text = text.clone();
                self.pos += 1;
                Ok(text)
            }
            _ => Err(self.error(&format!("expected {what}"))),
        }
    }

    /// `graph : [ strict ] ( graph | digraph ) [ ID ] '{' stmt_list '}'`
    pub(crate) fn parse_graph(&mut self) -> Result<DotGraph, DotError> {
        let strict = self.eat_keyword("strict");
        let directed = if self.eat_keyword("digraph") {
            true
        } else if self.eat_keyword("graph") {
            false
        } else {
            return Err(self.error("expected `graph` or `digraph`"));
        };
        let name = match self.peek() {
            Some(TokenKind::LBrace) => None,
            _ => Some(self.expect_id("a graph name or `{`")?),
        };

        self.expect(&TokenKind::LBrace, "`{`")?;
        let mut builder = Builder::default();
        self.parse_stmt_list(&mut builder, directed)?;
        self.expect(&TokenKind::RBrace, "`}`")?;

        Ok(DotGraph {
            name,
            strict,
            directed,
            nodes: builder.nodes,
            edges: builder.edges,
        })
    }

    /// Parses statements up to (not including) the closing `}` and returns
    /// every node mentioned in them.
    fn parse_stmt_list(
        &mut self,
        builder: &mut Builder,
        directed: bool,
    ) -> Result<IndexSet<String>, DotError> {
        let mut mentioned = IndexSet::new();
        while !matches!(self.peek(), Some(TokenKind::RBrace) | None) {
            self.parse_stmt(builder, directed, &mut mentioned)?;
            self.eat(&TokenKind::Semi);
        }
        Ok(mentioned)
    }

    fn parse_stmt(
        &mut self,
        builder: &mut Builder,
        directed: bool,
        mentioned: &mut IndexSet<String>,
    ) -> Result<(), DotError> {
        let Some(kind) = self.peek() else {
            return Err(self.error("expected a statement"));
        };

        // attr_stmt: graph/node/edge defaults carry nothing we encode.
        if ["graph", "node", "edge"].iter().any(|k| is_keyword(kind, k)) {
            self.bump();
            if self.peek() != Some(&TokenKind::LBracket) {
                return Err(self.error("expected `[`"));
            }
            self.parse_attr_lists()?;
            return Ok(());
        }

        // ID '=' ID
        if matches!(kind, TokenKind::Id { .. })
            && !is_any_keyword(kind)
            && self.peek_second() == Some(&TokenKind::Equals)
        {
            self.bump();
            self.bump();
            self.expect_id("a value after `=`")?;
            return Ok(());
        }

        let first = self.parse_endpoint(builder, directed, mentioned)?;
        if matches!(self.peek(), Some(TokenKind::Arrow | TokenKind::DashDash)) {
            return self.parse_edge_chain(builder, directed, mentioned, first);
        }

        match first {
            Endpoint::Node(name) => {
                self.parse_attr_lists()?;
                builder.nodes.insert(name);
            }
            // A bare subgraph statement has already been flattened.
            Endpoint::Subgraph(_) => {}
        }
        Ok(())
    }

    fn parse_edge_chain(
        &mut self,
        builder: &mut Builder,
        directed: bool,
        mentioned: &mut IndexSet<String>,
        first: Endpoint,
    ) -> Result<(), DotError> {
        let mut left = first.into_nodes();
        while let Some(op) = self.peek() {
            match (op, directed) {
                (TokenKind::Arrow, true) | (TokenKind::DashDash, false) => {}
                (TokenKind::Arrow, false) => {
                    return Err(self.error("`->` used in an undirected graph"));
                }
                (TokenKind::DashDash, true) => {
                    return Err(self.error("`--` used in a directed graph"));
                }
                _ => break,
            }
            self.bump();
            let right =
                self.parse_endpoint(builder, directed, mentioned)?.into_nodes();
            for from in &left {
                for to in &right {
                    builder.edges.push(DotEdge {
                        from: from.clone(),
                        to: to.clone(),
                    });
                }
            }
            left = right;
        }
        if self.peek() == Some(&TokenKind::LBracket) {
            self.parse_attr_lists()?;
        }
        Ok(())
    }

    /// `node_id | subgraph`
    fn parse_endpoint(
        &mut self,
        builder: &mut Builder,
        directed: bool,
        mentioned: &mut IndexSet<String>,
    ) -> Result<Endpoint, DotError> {
        let is_subgraph = match self.peek() {
            Some(TokenKind::LBrace) => true,
            Some(kind) => is_keyword(kind, "subgraph"),
            None => false,
        };
        if is_subgraph {
            if self.eat_keyword("subgraph")
                && self.peek() != Some(&TokenKind::LBrace)
            {
                self.expect_id("a subgraph name or `{`")?;
            }
            self.expect(&TokenKind::LBrace, "`{`")?;
            let nested = self.parse_stmt_list(builder, directed)?;
            self.expect(&TokenKind::RBrace, "`}`")?;
            mentioned.extend(nested.iter().cloned());
            return Ok(Endpoint::Subgraph(nested.into_iter().collect()));
        }

        let name = self.expect_id("a node name")?;
        // Ports (`node:port:compass`) address parts of a node's shape.
        if self.eat(&TokenKind::Colon) {
            self.expect_id("a port")?;
            if self.eat(&TokenKind::Colon) {
                self.expect_id("a compass point")?;
            }
        }
        mentioned.insert(name.clone());
        Ok(Endpoint::Node(name))
    }

    /// `attr_list : '[' [ a_list ] ']' [ attr_list ]`, checked and dropped.
    /// Does nothing when the next token is not `[`.
    fn parse_attr_lists(&mut self) -> Result<(), DotError> {
        while self.eat(&TokenKind::LBracket) {
            while !self.eat(&TokenKind::RBracket) {
                self.expect_id("an attribute name or `]`")?;
                if self.eat(&TokenKind::Equals) {
                    self.expect_id("an attribute value")?;
                }
                if !self.eat(&TokenKind::Comma) {
                    self.eat(&TokenKind::Semi);
                }
            }
        }
        Ok(())
    }
}

enum Endpoint {
    Node(String),
    Subgraph(Vec<String>),
}

impl Endpoint {
    fn into_nodes(self) -> Vec<String> {
        match self {
            Endpoint::Node(name) => vec![name],
            Endpoint::Subgraph(nodes) => nodes,
        }
    }
}
