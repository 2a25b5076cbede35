use std::fmt;
use std::mem;

use crate::ast::{ComparisonOperator, Expr, Literal, Token};
use crate::lexer::{LexError, Lexer};

/// Errors produced while parsing a token stream into an AST.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The lexer rejected the input
    Lex(LexError),

    /// A token that does not fit the grammar at this point
    Unexpected {
        expected: &'static str,
        found: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lex(e) => write!(f, "{}", e),
            ParseError::Unexpected { expected, found } => {
                write!(f, "Expected {}, got {}", expected, found)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Lex(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError::Lex(e)
    }
}

/// Parse a query string into an AST.
///
/// # Examples
///
/// ```
/// use tql_lang::parser;
///
/// let expr = parser::parse("age > 30 and (status = 'active' or status is null)").unwrap();
/// assert_eq!(
///     expr.to_query_string(),
///     "age > 30 and (status = 'active' or status is null)",
/// );
/// ```
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    Parser::new(Lexer::new(input))?.parse()
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    // Takes the current token, leaving Eof behind; the caller advances.
    fn take(&mut self) -> Token {
        mem::replace(&mut self.current_token, Token::Eof)
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(what));
        }
        self.advance()
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::Unexpected {
            expected,
            found: format!("{:?}", self.current_token),
        }
    }

    /// Parse a complete query; trailing input is an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if !self.check(&Token::Eof) {
            return Err(self.unexpected("end of query"));
        }
        Ok(expr)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    // Single operands stay bare instead of wrapping in a one-child
    // composite, so renderings reparse to structurally equal trees.
    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_and()?;
        if !self.check(&Token::Or) {
            return Ok(first);
        }

        let mut children = vec![first];
        while self.check(&Token::Or) {
            self.advance()?;
            children.push(self.parse_and()?);
        }
        Ok(Expr::Or(children))
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_unary()?;
        if !self.check(&Token::And) {
            return Ok(first);
        }

        let mut children = vec![first];
        while self.check(&Token::And) {
            self.advance()?;
            children.push(self.parse_unary()?);
        }
        Ok(Expr::And(children))
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.check(&Token::Not) {
            self.advance()?;
            self.expect(Token::LParen, "'(' after 'not'")?;
            let expr = self.parse_expression()?;
            self.expect(Token::RParen, "')'")?;
            Ok(Expr::Not(Box::new(expr)))
        } else if self.check(&Token::LParen) {
            self.advance()?;
            let expr = self.parse_expression()?;
            self.expect(Token::RParen, "')'")?;
            Ok(expr)
        } else {
            self.parse_atom()
        }
    }

    /// Parse one field predicate: a field path followed by an operator.
    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let field = self.parse_field()?;

        match &self.current_token {
            Token::Eq => self.parse_comparison(field, ComparisonOperator::Eq),
            Token::Neq => self.parse_comparison(field, ComparisonOperator::Neq),
            Token::Lt => self.parse_comparison(field, ComparisonOperator::Lt),
            Token::Gt => self.parse_comparison(field, ComparisonOperator::Gt),
            Token::Lte => self.parse_comparison(field, ComparisonOperator::Lte),
            Token::Gte => self.parse_comparison(field, ComparisonOperator::Gte),
            Token::In => self.parse_in(field),
            Token::Is => self.parse_is(field),
            Token::Between => self.parse_between(field),
            Token::Contains => {
                self.advance()?;
                let value = self.parse_quoted()?;
                Ok(Expr::Contains {
                    field,
                    value,
                    case_sensitive: true,
                })
            }
            Token::ContainsIgnoreCase => {
                self.advance()?;
                let value = self.parse_quoted()?;
                Ok(Expr::Contains {
                    field,
                    value,
                    case_sensitive: false,
                })
            }
            Token::Tilde => {
                self.advance()?;
                let regex = self.parse_quoted()?;
                Ok(Expr::Matches { field, regex })
            }
            Token::Complies => {
                self.advance()?;
                let pattern = self.parse_quoted()?;
                Ok(Expr::Complies { field, pattern })
            }
            Token::WordComplies => {
                self.advance()?;
                let pattern = self.parse_quoted()?;
                Ok(Expr::WordComplies { field, pattern })
            }
            _ => Err(self.unexpected("a predicate operator")),
        }
    }

    fn parse_comparison(
        &mut self,
        field: String,
        op: ComparisonOperator,
    ) -> Result<Expr, ParseError> {
        self.advance()?;
        let value = self.parse_literal()?;
        Ok(Expr::Comparison { field, op, value })
    }

    fn parse_in(&mut self, field: String) -> Result<Expr, ParseError> {
        self.advance()?; // consume 'in'
        self.expect(Token::LBracket, "'['")?;

        let mut values = vec![self.parse_literal()?];
        while self.check(&Token::Comma) {
            self.advance()?;
            values.push(self.parse_literal()?);
        }

        self.expect(Token::RBracket, "']'")?;
        Ok(Expr::In { field, values })
    }

    fn parse_is(&mut self, field: String) -> Result<Expr, ParseError> {
        self.advance()?; // consume 'is'
        match &self.current_token {
            Token::Null => {
                self.advance()?;
                Ok(Expr::IsNull { field })
            }
            Token::Empty => {
                self.advance()?;
                Ok(Expr::IsEmpty { field })
            }
            _ => Err(self.unexpected("'null' or 'empty' after 'is'")),
        }
    }

    fn parse_between(&mut self, field: String) -> Result<Expr, ParseError> {
        self.advance()?; // consume 'between'

        // ]a, b] is open below, [a, b[ open above.
        let lower_open = match &self.current_token {
            Token::LBracket => false,
            Token::RBracket => true,
            _ => return Err(self.unexpected("'[' or ']'")),
        };
        self.advance()?;

        let lower = self.parse_literal()?;
        self.expect(Token::Comma, "','")?;
        let upper = self.parse_literal()?;

        let upper_open = match &self.current_token {
            Token::RBracket => false,
            Token::LBracket => true,
            _ => return Err(self.unexpected("'[' or ']'")),
        };
        self.advance()?;

        Ok(Expr::Between {
            field,
            lower,
            upper,
            lower_open,
            upper_open,
        })
    }

    /// Parse a dotted field path.
    fn parse_field(&mut self) -> Result<String, ParseError> {
        let mut path = match self.take() {
            Token::Identifier(name) => name,
            other => {
                self.current_token = other;
                return Err(self.unexpected("a field path"));
            }
        };
        self.advance()?;

        while self.check(&Token::Dot) {
            self.advance()?;
            match self.take() {
                Token::Identifier(segment) => {
                    path.push('.');
                    path.push_str(&segment);
                }
                other => {
                    self.current_token = other;
                    return Err(self.unexpected("a field path segment after '.'"));
                }
            }
            self.advance()?;
        }

        Ok(path)
    }

    fn parse_literal(&mut self) -> Result<Literal, ParseError> {
        let literal = match self.take() {
            Token::Quoted(s) => Literal::Quoted(s),
            Token::Int(n) => Literal::Int(n),
            Token::Decimal(d) => Literal::Decimal(d),
            Token::Boolean(b) => Literal::Boolean(b),
            other => {
                self.current_token = other;
                return Err(self.unexpected("a literal"));
            }
        };
        self.advance()?;
        Ok(literal)
    }

    fn parse_quoted(&mut self) -> Result<String, ParseError> {
        match self.take() {
            Token::Quoted(s) => {
                self.advance()?;
                Ok(s)
            }
            other => {
                self.current_token = other;
                Err(self.unexpected("a quoted string"))
            }
        }
    }
}
