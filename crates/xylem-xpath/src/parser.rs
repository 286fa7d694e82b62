//! Path expression parser.

use crate::ast::*;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unclosed string literal")]
    UnclosedString,
    #[error("empty location step")]
    EmptyStep,
    #[error("invalid number")]
    InvalidNumber,
}

/// Path expression parser.
pub struct PathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> PathParser<'a> {
    /// Parse a path expression.
    pub fn parse(input: &'a str) -> Result<PathExpr, ParseError> {
        let mut parser = Self { input, pos: 0 };
        let path = parser.parse_path()?;
        Ok(path)
    }

    fn parse_path(&mut self) -> Result<PathExpr, ParseError> {
        let mut absolute = false;
        let mut descendant = false;
        if self.peek() == Some('/') {
            self.advance();
            absolute = true;
            if self.peek() == Some('/') {
                self.advance();
                descendant = true;
            }
        }

        let mut steps = Vec::new();
        if self.is_at_end() {
            // "/" selects the root; "" and "//" select nothing meaningful
            if absolute && !descendant {
                return Ok(PathExpr { absolute, steps });
            }
            return Err(ParseError::EmptyStep);
        }

        loop {
            steps.push(self.parse_step(descendant)?);
            descendant = false;
            match self.peek() {
                None => break,
                Some('/') => {
                    self.advance();
                    if self.peek() == Some('/') {
                        self.advance();
                        descendant = true;
                    }
                }
                Some(other) => return Err(ParseError::UnexpectedChar(other)),
            }
        }
        Ok(PathExpr { absolute, steps })
    }

    fn parse_step(&mut self, descendant: bool) -> Result<Step, ParseError> {
        let test = if self.peek() == Some('*') {
            self.advance();
            NameTest::Wildcard
        } else {
            NameTest::Name(self.parse_name()?)
        };
        let mut predicates = Vec::new();
        while self.peek() == Some('[') {
            predicates.push(self.parse_predicate()?);
        }
        Ok(Step {
            descendant,
            test,
            predicates,
        })
    }

    fn parse_predicate(&mut self) -> Result<Predicate, ParseError> {
        self.expect('[')?;
        self.skip_whitespace();
        let expr = self.parse_or_expr()?;
        self.skip_whitespace();
        self.expect(']')?;
        Ok(expr)
    }

    fn parse_or_expr(&mut self) -> Result<Predicate, ParseError> {
        let mut left = self.parse_and_expr()?;
        loop {
            self.skip_whitespace();
            if !self.eat_keyword("or") {
                break;
            }
            let right = self.parse_and_expr()?;
            left = Predicate::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and_expr(&mut self) -> Result<Predicate, ParseError> {
        let mut left = self.parse_primary()?;
        loop {
            self.skip_whitespace();
            if !self.eat_keyword("and") {
                break;
            }
            let right = self.parse_primary()?;
            left = Predicate::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Predicate, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(c) = self.peek() {
                    if !c.is_ascii_digit() {
                        break;
                    }
                    digits.push(c);
                    self.advance();
                }
                let position = digits.parse().map_err(|_| ParseError::InvalidNumber)?;
                Ok(Predicate::Position(position))
            }
            Some('@') => {
                self.advance();
                let name = self.parse_name()?;
                let op = self.parse_op()?;
                let literal = self.parse_literal()?;
                Ok(Predicate::Compare {
                    target: CompareTarget::Attribute(name),
                    op,
                    literal,
                })
            }
            Some(_) => {
                let name = self.parse_name()?;
                if (name == "last" || name == "text") && self.peek() == Some('(') {
                    self.advance();
                    self.skip_whitespace();
                    self.expect(')')?;
                    if name == "last" {
                        return Ok(Predicate::Last);
                    }
                    let op = self.parse_op()?;
                    let literal = self.parse_literal()?;
                    return Ok(Predicate::Compare {
                        target: CompareTarget::Text,
                        op,
                        literal,
                    });
                }
                let op = self.parse_op()?;
                let literal = self.parse_literal()?;
                Ok(Predicate::Compare {
                    target: CompareTarget::Child(name),
                    op,
                    literal,
                })
            }
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn parse_op(&mut self) -> Result<CompareOp, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some('=') => {
                self.advance();
                Ok(CompareOp::Eq)
            }
            Some('!') => {
                self.advance();
                self.expect('=')?;
                Ok(CompareOp::Ne)
            }
            Some(other) => Err(ParseError::UnexpectedChar(other)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn parse_literal(&mut self) -> Result<String, ParseError> {
        self.skip_whitespace();
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            Some(other) => return Err(ParseError::UnexpectedChar(other)),
            None => return Err(ParseError::UnexpectedEnd),
        };
        self.advance();
        let mut literal = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(literal);
                }
                Some(c) => {
                    literal.push(c);
                    self.advance();
                }
                None => return Err(ParseError::UnclosedString),
            }
        }
    }

    fn parse_name(&mut self) -> Result<String, ParseError> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if !is_name_char(c) {
                break;
            }
            name.push(c);
            self.advance();
        }
        if name.is_empty() {
            return match self.peek() {
                Some(c) => Err(ParseError::UnexpectedChar(c)),
                None => Err(ParseError::UnexpectedEnd),
            };
        }
        Ok(name)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = &self.input[self.pos..];
        if !rest.starts_with(keyword) {
            return false;
        }
        if rest[keyword.len()..].chars().next().is_some_and(is_name_char) {
            return false;
        }
        self.pos += keyword.len();
        true
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(other) => Err(ParseError::UnexpectedChar(other)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}
