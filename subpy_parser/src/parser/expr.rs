//! Expression parsing.
//!
//! Prefix forms and atoms are handled in [`ExprParser::parse_prefix`], trailers
//! (calls, subscripts, attributes) in [`ExprParser::parse_postfix`], and binary
//! operators by precedence climbing in [`ExprParser::parse`].

use super::{Parser, Precedence};
use crate::ast::{
    Arg, Arguments, BinOp, BoolOp, CmpOp, Comprehension, Expr, ExprKind, Keyword as KeywordArg,
    StringLiteral, UnaryOp,
};
use crate::token::{Keyword, TokenKind};
use subpy_core::SubpyResult;

/// Expression parser entry points.
pub struct ExprParser;

impl ExprParser {
    /// Parse an expression with operators binding at least as tight as `min_prec`.
    ///
    /// # Errors
    /// Fails past [`MAX_NESTING`](super::MAX_NESTING) levels of nesting.
    pub fn parse(p: &mut Parser<'_>, min_prec: Precedence) -> SubpyResult<Expr> {
        let depth = p.depth();
        let result = Self::parse_nested(p, min_prec);
        p.restore_depth(depth);
        result
    }

    fn parse_nested(p: &mut Parser<'_>, min_prec: Precedence) -> SubpyResult<Expr> {
        p.descend()?;
        let start = p.start_span();
        let mut left = Self::parse_prefix(p)?;

        loop {
            let Some(prec) = Self::infix_precedence(p) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            // Each fold wraps `left` one level deeper.
            p.descend()?;
            left = Self::parse_infix(p, left, prec, start)?;
        }

        Ok(left)
    }

    /// Parse a comma-separated list at `min_prec`, producing a `Tuple` when a
    /// comma is present. A trailing comma is allowed.
    pub fn parse_tuple(p: &mut Parser<'_>, min_prec: Precedence) -> SubpyResult<Expr> {
        let start = p.start_span();
        let first = Self::parse(p, min_prec)?;
        if !p.check(TokenKind::Comma) {
            return Ok(first);
        }

        let mut elts = vec![first];
        while p.match_token(TokenKind::Comma) {
            if !Self::starts_expression(p) {
                break;
            }
            elts.push(Self::parse(p, min_prec)?);
        }
        Ok(Expr::new(ExprKind::Tuple(elts), p.span_from(start)))
    }

    /// Parse an assignment or loop target list. Stops before `in` and `=`.
    pub fn parse_target_list(p: &mut Parser<'_>) -> SubpyResult<Expr> {
        Self::parse_tuple(p, Precedence::BitwiseOr)
    }

    /// Check if the current token can begin an expression.
    pub fn starts_expression(p: &Parser<'_>) -> bool {
        matches!(
            p.current().kind,
            TokenKind::Int(_)
                | TokenKind::BigInt(_)
                | TokenKind::Float(_)
                | TokenKind::Complex(_)
                | TokenKind::String(_)
                | TokenKind::Bytes(_)
                | TokenKind::Ident(_)
                | TokenKind::Keyword(
                    Keyword::True
                        | Keyword::False
                        | Keyword::None
                        | Keyword::Not
                        | Keyword::Lambda
                        | Keyword::Await
                        | Keyword::Yield
                )
                | TokenKind::LeftParen
                | TokenKind::LeftBracket
                | TokenKind::LeftBrace
                | TokenKind::Minus
                | TokenKind::Plus
                | TokenKind::Tilde
                | TokenKind::Star
                | TokenKind::Ellipsis
        )
    }

    // =========================================================================
    // Prefix
    // =========================================================================

    fn parse_prefix(p: &mut Parser<'_>) -> SubpyResult<Expr> {
        let start = p.start_span();

        let unary = match &p.current().kind {
            TokenKind::Minus => Some((UnaryOp::USub, Precedence::Unary)),
            TokenKind::Plus => Some((UnaryOp::UAdd, Precedence::Unary)),
            TokenKind::Tilde => Some((UnaryOp::Invert, Precedence::Unary)),
            TokenKind::Keyword(Keyword::Not) => Some((UnaryOp::Not, Precedence::Not)),
            _ => None,
        };
        if let Some((op, prec)) = unary {
            p.advance();
            let operand = Self::parse(p, prec)?;
            return Ok(Expr::new(
                ExprKind::UnaryOp {
                    op,
                    operand: Box::new(operand),
                },
                p.span_from(start),
            ));
        }

        match &p.current().kind {
            TokenKind::Keyword(Keyword::Lambda) => Self::parse_lambda(p),
            TokenKind::Keyword(Keyword::Yield) => Self::parse_yield(p),
            TokenKind::Keyword(Keyword::Await) => {
                p.advance();
                let value = Self::parse(p, Precedence::Await)?;
                Ok(Expr::new(
                    ExprKind::Await(Box::new(value)),
                    p.span_from(start),
                ))
            }
            TokenKind::Star => {
                p.advance();
                let value = Self::parse(p, Precedence::BitwiseOr)?;
                Ok(Expr::new(
                    ExprKind::Starred(Box::new(value)),
                    p.span_from(start),
                ))
            }
            _ => {
                let atom = Self::parse_atom(p)?;
                Self::parse_postfix(p, atom, start)
            }
        }
    }

    fn parse_atom(p: &mut Parser<'_>) -> SubpyResult<Expr> {
        let start = p.start_span();
        let kind = match p.current().kind.clone() {
            TokenKind::Int(n) => ExprKind::Int(n),
            TokenKind::BigInt(s) => ExprKind::BigInt(s),
            TokenKind::Float(n) => ExprKind::Float(n),
            TokenKind::Complex(n) => ExprKind::Complex(n),
            TokenKind::Ident(name) => ExprKind::Name(name),
            TokenKind::Keyword(Keyword::True) => ExprKind::Bool(true),
            TokenKind::Keyword(Keyword::False) => ExprKind::Bool(false),
            TokenKind::Keyword(Keyword::None) => ExprKind::None,
            TokenKind::Ellipsis => ExprKind::Ellipsis,
            TokenKind::String(_) | TokenKind::Bytes(_) => return Self::parse_strings(p),
            TokenKind::LeftParen => return Self::parse_paren(p),
            TokenKind::LeftBracket => return Self::parse_list(p),
            TokenKind::LeftBrace => return Self::parse_brace(p),
            _ => return Err(p.error_at_current("expected expression")),
        };
        p.advance();
        Ok(Expr::new(kind, p.span_from(start)))
    }

    /// Adjacent literals are joined; mixing bytes and text is an error.
    fn parse_strings(p: &mut Parser<'_>) -> SubpyResult<Expr> {
        let start = p.start_span();
        let mut text: Option<String> = None;
        let mut bytes: Option<Vec<u8>> = None;

        loop {
            match p.current().kind.clone() {
                TokenKind::String(s) if bytes.is_none() => {
                    text.get_or_insert_with(String::new).push_str(&s);
                }
                TokenKind::Bytes(b) if text.is_none() => {
                    bytes.get_or_insert_with(Vec::new).extend_from_slice(&b);
                }
                TokenKind::String(_) | TokenKind::Bytes(_) => {
                    return Err(p.error_at_current("cannot mix bytes and nonbytes literals"));
                }
                _ => break,
            }
            p.advance();
        }

        let kind = match bytes {
            Some(b) => ExprKind::Bytes(b),
            None => ExprKind::String(StringLiteral::new(text.unwrap_or_default())),
        };
        Ok(Expr::new(kind, p.span_from(start)))
    }

    fn parse_paren(p: &mut Parser<'_>) -> SubpyResult<Expr> {
        let start = p.start_span();
        p.advance();

        if p.match_token(TokenKind::RightParen) {
            return Ok(Expr::new(ExprKind::Tuple(Vec::new()), p.span_from(start)));
        }
        if p.check_keyword(Keyword::Yield) {
            let value = Self::parse_yield(p)?;
            p.expect(TokenKind::RightParen, "expected ')'")?;
            return Ok(value);
        }

        let first = Self::parse(p, Precedence::Lowest)?;
        if Self::at_comprehension(p) {
            let generators = Self::parse_comprehensions(p)?;
            p.expect(TokenKind::RightParen, "expected ')'")?;
            return Ok(Expr::new(
                ExprKind::GeneratorExp {
                    elt: Box::new(first),
                    generators,
                },
                p.span_from(start),
            ));
        }
        if !p.check(TokenKind::Comma) {
            p.expect(TokenKind::RightParen, "expected ')'")?;
            return Ok(first);
        }

        let mut elts = vec![first];
        while p.match_token(TokenKind::Comma) {
            if p.check(TokenKind::RightParen) {
                break;
            }
            elts.push(Self::parse(p, Precedence::Lowest)?);
        }
        p.expect(TokenKind::RightParen, "expected ')'")?;
        Ok(Expr::new(ExprKind::Tuple(elts), p.span_from(start)))
    }

    fn parse_list(p: &mut Parser<'_>) -> SubpyResult<Expr> {
        let start = p.start_span();
        p.advance();

        if p.match_token(TokenKind::RightBracket) {
            return Ok(Expr::new(ExprKind::List(Vec::new()), p.span_from(start)));
        }

        let first = Self::parse(p, Precedence::Lowest)?;
        if Self::at_comprehension(p) {
            let generators = Self::parse_comprehensions(p)?;
            p.expect(TokenKind::RightBracket, "expected ']'")?;
            return Ok(Expr::new(
                ExprKind::ListComp {
                    elt: Box::new(first),
                    generators,
                },
                p.span_from(start),
            ));
        }

        let mut elts = vec![first];
        while p.match_token(TokenKind::Comma) {
            if p.check(TokenKind::RightBracket) {
                break;
            }
            elts.push(Self::parse(p, Precedence::Lowest)?);
        }
        p.expect(TokenKind::RightBracket, "expected ']'")?;
        Ok(Expr::new(ExprKind::List(elts), p.span_from(start)))
    }

    fn parse_brace(p: &mut Parser<'_>) -> SubpyResult<Expr> {
        let start = p.start_span();
        p.advance();

        if p.match_token(TokenKind::RightBrace) {
            return Ok(Expr::new(
                ExprKind::Dict {
                    keys: Vec::new(),
                    values: Vec::new(),
                },
                p.span_from(start),
            ));
        }

        if p.check(TokenKind::DoubleStar) {
            return Self::parse_dict_rest(p, start, Vec::new(), Vec::new());
        }

        let first = Self::parse(p, Precedence::Lowest)?;

        if p.match_token(TokenKind::Colon) {
            let value = Self::parse(p, Precedence::Conditional)?;
            if Self::at_comprehension(p) {
                let generators = Self::parse_comprehensions(p)?;
                p.expect(TokenKind::RightBrace, "expected '}'")?;
                return Ok(Expr::new(
                    ExprKind::DictComp {
                        key: Box::new(first),
                        value: Box::new(value),
                        generators,
                    },
                    p.span_from(start),
                ));
            }
            return Self::parse_dict_rest(p, start, vec![Some(first)], vec![value]);
        }

        if Self::at_comprehension(p) {
            let generators = Self::parse_comprehensions(p)?;
            p.expect(TokenKind::RightBrace, "expected '}'")?;
            return Ok(Expr::new(
                ExprKind::SetComp {
                    elt: Box::new(first),
                    generators,
                },
                p.span_from(start),
            ));
        }

        let mut elts = vec![first];
        while p.match_token(TokenKind::Comma) {
            if p.check(TokenKind::RightBrace) {
                break;
            }
            elts.push(Self::parse(p, Precedence::Lowest)?);
        }
        p.expect(TokenKind::RightBrace, "expected '}'")?;
        Ok(Expr::new(ExprKind::Set(elts), p.span_from(start)))
    }

    /// Continue a dict display after its first entry (if any).
    fn parse_dict_rest(
        p: &mut Parser<'_>,
        start: u32,
        mut keys: Vec<Option<Expr>>,
        mut values: Vec<Expr>,
    ) -> SubpyResult<Expr> {
        let mut first = keys.is_empty();
        loop {
            if !first && !p.match_token(TokenKind::Comma) {
                break;
            }
            first = false;
            if p.check(TokenKind::RightBrace) {
                break;
            }
            if p.match_token(TokenKind::DoubleStar) {
                keys.push(None);
                values.push(Self::parse(p, Precedence::BitwiseOr)?);
            } else {
                keys.push(Some(Self::parse(p, Precedence::Conditional)?));
                p.expect(TokenKind::Colon, "expected ':' in dict display")?;
                values.push(Self::parse(p, Precedence::Conditional)?);
            }
        }
        p.expect(TokenKind::RightBrace, "expected '}'")?;
        Ok(Expr::new(ExprKind::Dict { keys, values }, p.span_from(start)))
    }

    fn parse_lambda(p: &mut Parser<'_>) -> SubpyResult<Expr> {
        let start = p.start_span();
        p.expect_keyword(Keyword::Lambda, "expected 'lambda'")?;
        let args = Self::parse_parameters(p, TokenKind::Colon, false)?;
        p.expect(TokenKind::Colon, "expected ':' after lambda parameters")?;
        let body = Self::parse(p, Precedence::Conditional)?;
        Ok(Expr::new(
            ExprKind::Lambda {
                args: Box::new(args),
                body: Box::new(body),
            },
            p.span_from(start),
        ))
    }

    fn parse_yield(p: &mut Parser<'_>) -> SubpyResult<Expr> {
        let start = p.start_span();
        p.expect_keyword(Keyword::Yield, "expected 'yield'")?;

        if p.match_keyword(Keyword::From) {
            let value = Self::parse(p, Precedence::Conditional)?;
            return Ok(Expr::new(
                ExprKind::YieldFrom(Box::new(value)),
                p.span_from(start),
            ));
        }

        let value = if Self::starts_expression(p) {
            Some(Box::new(Self::parse_tuple(p, Precedence::Conditional)?))
        } else {
            None
        };
        Ok(Expr::new(ExprKind::Yield(value), p.span_from(start)))
    }

    // =========================================================================
    // Postfix
    // =========================================================================

    fn parse_postfix(p: &mut Parser<'_>, mut expr: Expr, start: u32) -> SubpyResult<Expr> {
        loop {
            match p.current().kind {
                TokenKind::LeftParen => {
                    p.descend()?;
                    p.advance();
                    let (args, keywords) = Self::parse_call_args(p)?;
                    expr = Expr::new(
                        ExprKind::Call {
                            func: Box::new(expr),
                            args,
                            keywords,
                        },
                        p.span_from(start),
                    );
                }
                TokenKind::LeftBracket => {
                    p.descend()?;
                    p.advance();
                    let slice = Self::parse_subscript(p)?;
                    p.expect(TokenKind::RightBracket, "expected ']'")?;
                    expr = Expr::new(
                        ExprKind::Subscript {
                            value: Box::new(expr),
                            slice: Box::new(slice),
                        },
                        p.span_from(start),
                    );
                }
                TokenKind::Dot => {
                    p.descend()?;
                    p.advance();
                    let attr = p.expect_identifier("expected attribute name")?;
                    expr = Expr::new(
                        ExprKind::Attribute {
                            value: Box::new(expr),
                            attr,
                        },
                        p.span_from(start),
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Parse call arguments after `(` through the closing `)`.
    pub fn parse_call_args(p: &mut Parser<'_>) -> SubpyResult<(Vec<Expr>, Vec<KeywordArg>)> {
        let mut args = Vec::new();
        let mut keywords = Vec::new();

        while !p.check(TokenKind::RightParen) {
            let start = p.start_span();

            if p.match_token(TokenKind::DoubleStar) {
                let value = Self::parse(p, Precedence::Conditional)?;
                keywords.push(KeywordArg {
                    arg: None,
                    value,
                    span: p.span_from(start),
                });
            } else if matches!(p.current().kind, TokenKind::Ident(_))
                && matches!(p.peek().kind, TokenKind::Equal)
            {
                let name = p.expect_identifier("expected keyword name")?;
                p.advance();
                let value = Self::parse(p, Precedence::Conditional)?;
                keywords.push(KeywordArg {
                    arg: Some(name),
                    value,
                    span: p.span_from(start),
                });
            } else {
                let value = Self::parse(p, Precedence::Lowest)?;
                if Self::at_comprehension(p) {
                    let generators = Self::parse_comprehensions(p)?;
                    args.push(Expr::new(
                        ExprKind::GeneratorExp {
                            elt: Box::new(value),
                            generators,
                        },
                        p.span_from(start),
                    ));
                } else {
                    args.push(value);
                }
            }

            if !p.match_token(TokenKind::Comma) {
                break;
            }
        }

        p.expect(TokenKind::RightParen, "expected ')' after arguments")?;
        Ok((args, keywords))
    }

    /// Parse the inside of `[...]`: an index, a slice, or a tuple of them.
    fn parse_subscript(p: &mut Parser<'_>) -> SubpyResult<Expr> {
        let start = p.start_span();
        let first = Self::parse_slice_item(p)?;
        if !p.check(TokenKind::Comma) {
            return Ok(first);
        }

        let mut elts = vec![first];
        while p.match_token(TokenKind::Comma) {
            if p.check(TokenKind::RightBracket) {
                break;
            }
            elts.push(Self::parse_slice_item(p)?);
        }
        Ok(Expr::new(ExprKind::Tuple(elts), p.span_from(start)))
    }

    fn parse_slice_item(p: &mut Parser<'_>) -> SubpyResult<Expr> {
        let start = p.start_span();

        let lower = if p.check(TokenKind::Colon) {
            None
        } else {
            let expr = Self::parse(p, Precedence::Lowest)?;
            if !p.check(TokenKind::Colon) {
                return Ok(expr);
            }
            Some(Box::new(expr))
        };

        p.expect(TokenKind::Colon, "expected ':'")?;
        let upper = Self::parse_slice_bound(p)?;
        let step = if p.match_token(TokenKind::Colon) {
            Self::parse_slice_bound(p)?
        } else {
            None
        };

        Ok(Expr::new(
            ExprKind::Slice { lower, upper, step },
            p.span_from(start),
        ))
    }

    fn parse_slice_bound(p: &mut Parser<'_>) -> SubpyResult<Option<Box<Expr>>> {
        if matches!(
            p.current().kind,
            TokenKind::Colon | TokenKind::Comma | TokenKind::RightBracket
        ) {
            return Ok(None);
        }
        Ok(Some(Box::new(Self::parse(p, Precedence::Conditional)?)))
    }

    // =========================================================================
    // Comprehensions
    // =========================================================================

    fn at_comprehension(p: &mut Parser<'_>) -> bool {
        p.check_keyword(Keyword::For)
            || (p.check_keyword(Keyword::Async)
                && matches!(p.peek().kind, TokenKind::Keyword(Keyword::For)))
    }

    fn parse_comprehensions(p: &mut Parser<'_>) -> SubpyResult<Vec<Comprehension>> {
        let mut generators = Vec::new();
        while Self::at_comprehension(p) {
            let is_async = p.match_keyword(Keyword::Async);
            p.expect_keyword(Keyword::For, "expected 'for'")?;
            let target = Self::parse_target_list(p)?;
            p.expect_keyword(Keyword::In, "expected 'in' in comprehension")?;
            let iter = Self::parse(p, Precedence::Or)?;

            let mut ifs = Vec::new();
            while p.match_keyword(Keyword::If) {
                ifs.push(Self::parse(p, Precedence::Or)?);
            }

            generators.push(Comprehension {
                target,
                iter,
                ifs,
                is_async,
            });
        }
        Ok(generators)
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Parse a parameter list up to (not including) `closing`.
    ///
    /// `annotations` enables `name: expr` (function definitions only).
    pub fn parse_parameters(
        p: &mut Parser<'_>,
        closing: TokenKind,
        annotations: bool,
    ) -> SubpyResult<Arguments> {
        let mut args = Arguments::default();
        let mut keyword_only = false;

        while !p.check(closing.clone()) {
            if p.match_token(TokenKind::Slash) {
                if keyword_only || !args.posonlyargs.is_empty() || args.args.is_empty() {
                    return Err(p.error_at_previous("misplaced '/'"));
                }
                args.posonlyargs = std::mem::take(&mut args.args);
            } else if p.match_token(TokenKind::DoubleStar) {
                args.kwarg = Some(Self::parse_param(p, annotations)?);
                p.match_token(TokenKind::Comma);
                break;
            } else if p.match_token(TokenKind::Star) {
                if keyword_only {
                    return Err(p.error_at_previous("duplicate '*' in parameters"));
                }
                keyword_only = true;
                if matches!(p.current().kind, TokenKind::Ident(_)) {
                    args.vararg = Some(Self::parse_param(p, annotations)?);
                }
            } else {
                let param = Self::parse_param(p, annotations)?;
                let default = if p.match_token(TokenKind::Equal) {
                    Some(Self::parse(p, Precedence::Conditional)?)
                } else {
                    None
                };

                if keyword_only {
                    args.kwonlyargs.push(param);
                    args.kw_defaults.push(default);
                } else {
                    match default {
                        Some(default) => args.defaults.push(default),
                        None if !args.defaults.is_empty() => {
                            return Err(p.error_at_previous(
                                "non-default argument follows default argument",
                            ));
                        }
                        None => {}
                    }
                    args.args.push(param);
                }
            }

            if !p.match_token(TokenKind::Comma) {
                break;
            }
        }

        Ok(args)
    }

    fn parse_param(p: &mut Parser<'_>, annotations: bool) -> SubpyResult<Arg> {
        let start = p.start_span();
        let arg = p.expect_identifier("expected parameter name")?;
        let annotation = if annotations && p.match_token(TokenKind::Colon) {
            Some(Box::new(Self::parse(p, Precedence::Conditional)?))
        } else {
            None
        };
        Ok(Arg {
            arg,
            annotation,
            span: p.span_from(start),
        })
    }

    // =========================================================================
    // Infix
    // =========================================================================

    fn infix_precedence(p: &mut Parser<'_>) -> Option<Precedence> {
        if p.check_keyword(Keyword::Not) {
            return matches!(p.peek().kind, TokenKind::Keyword(Keyword::In))
                .then_some(Precedence::Comparison);
        }
        let prec = match &p.current().kind {
            TokenKind::ColonEqual => Precedence::NamedExpr,
            TokenKind::Keyword(Keyword::If) => Precedence::Conditional,
            TokenKind::Keyword(Keyword::Or) => Precedence::Or,
            TokenKind::Keyword(Keyword::And) => Precedence::And,
            TokenKind::Keyword(Keyword::In | Keyword::Is) => Precedence::Comparison,
            kind if kind.is_comparison() => Precedence::Comparison,
            TokenKind::Pipe => Precedence::BitwiseOr,
            TokenKind::Caret => Precedence::BitwiseXor,
            TokenKind::Ampersand => Precedence::BitwiseAnd,
            TokenKind::LeftShift | TokenKind::RightShift => Precedence::Shift,
            TokenKind::Plus | TokenKind::Minus => Precedence::Additive,
            TokenKind::Star
            | TokenKind::Slash
            | TokenKind::DoubleSlash
            | TokenKind::Percent
            | TokenKind::At => Precedence::Multiplicative,
            TokenKind::DoubleStar => Precedence::Power,
            _ => return None,
        };
        Some(prec)
    }

    fn parse_infix(
        p: &mut Parser<'_>,
        left: Expr,
        prec: Precedence,
        start: u32,
    ) -> SubpyResult<Expr> {
        match prec {
            Precedence::NamedExpr => {
                if !matches!(left.kind, ExprKind::Name(_)) {
                    return Err(p.error_at_current("cannot use assignment expression here"));
                }
                p.advance();
                let value = Self::parse(p, Precedence::Conditional)?;
                Ok(Expr::new(
                    ExprKind::NamedExpr {
                        target: Box::new(left),
                        value: Box::new(value),
                    },
                    p.span_from(start),
                ))
            }
            Precedence::Conditional => {
                p.advance();
                let test = Self::parse(p, Precedence::Or)?;
                p.expect_keyword(Keyword::Else, "expected 'else' in conditional expression")?;
                let orelse = Self::parse(p, Precedence::Conditional)?;
                Ok(Expr::new(
                    ExprKind::IfExp {
                        test: Box::new(test),
                        body: Box::new(left),
                        orelse: Box::new(orelse),
                    },
                    p.span_from(start),
                ))
            }
            Precedence::Or | Precedence::And => {
                let (op, kw) = if prec == Precedence::Or {
                    (BoolOp::Or, Keyword::Or)
                } else {
                    (BoolOp::And, Keyword::And)
                };
                let mut values = vec![left];
                while p.match_keyword(kw) {
                    values.push(Self::parse(p, prec.next())?);
                }
                Ok(Expr::new(ExprKind::BoolOp { op, values }, p.span_from(start)))
            }
            Precedence::Comparison => {
                let mut ops = Vec::new();
                let mut comparators = Vec::new();
                while let Some(op) = Self::comparison_op(p) {
                    ops.push(op);
                    comparators.push(Self::parse(p, Precedence::BitwiseOr)?);
                }
                Ok(Expr::new(
                    ExprKind::Compare {
                        left: Box::new(left),
                        ops,
                        comparators,
                    },
                    p.span_from(start),
                ))
            }
            _ => {
                let op = Self::binary_op(&p.current().kind)
                    .ok_or_else(|| p.error_at_current("expected binary operator"))?;
                p.advance();
                let rhs_prec = if op == BinOp::Pow {
                    Precedence::Unary
                } else {
                    prec.next()
                };
                let right = Self::parse(p, rhs_prec)?;
                Ok(Expr::new(
                    ExprKind::BinOp {
                        left: Box::new(left),
                        op,
                        right: Box::new(right),
                    },
                    p.span_from(start),
                ))
            }
        }
    }

    /// Consume one comparison operator, if present.
    fn comparison_op(p: &mut Parser<'_>) -> Option<CmpOp> {
        if p.match_keyword(Keyword::Is) {
            return Some(if p.match_keyword(Keyword::Not) {
                CmpOp::IsNot
            } else {
                CmpOp::Is
            });
        }
        if p.check_keyword(Keyword::Not) {
            if !matches!(p.peek().kind, TokenKind::Keyword(Keyword::In)) {
                return None;
            }
            p.advance();
            p.advance();
            return Some(CmpOp::NotIn);
        }

        let op = match &p.current().kind {
            TokenKind::EqualEqual => CmpOp::Eq,
            TokenKind::NotEqual => CmpOp::NotEq,
            TokenKind::Less => CmpOp::Lt,
            TokenKind::LessEqual => CmpOp::LtE,
            TokenKind::Greater => CmpOp::Gt,
            TokenKind::GreaterEqual => CmpOp::GtE,
            TokenKind::Keyword(Keyword::In) => CmpOp::In,
            _ => return None,
        };
        p.advance();
        Some(op)
    }

    fn binary_op(kind: &TokenKind) -> Option<BinOp> {
        let op = match kind {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mult,
            TokenKind::At => BinOp::MatMult,
            TokenKind::Slash => BinOp::Div,
            TokenKind::DoubleSlash => BinOp::FloorDiv,
            TokenKind::Percent => BinOp::Mod,
            TokenKind::DoubleStar => BinOp::Pow,
            TokenKind::LeftShift => BinOp::LShift,
            TokenKind::RightShift => BinOp::RShift,
            TokenKind::Pipe => BinOp::BitOr,
            TokenKind::Caret => BinOp::BitXor,
            TokenKind::Ampersand => BinOp::BitAnd,
            _ => return None,
        };
        Some(op)
    }
}
