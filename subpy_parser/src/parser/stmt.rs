//! Statement parsing.

use super::expr::ExprParser;
use super::{Parser, Precedence};
use crate::ast::{
    Alias, AugOp, ExceptHandler, Expr, ExprKind, Keyword as KeywordArg, Stmt, StmtKind, WithItem,
};
use crate::token::{Keyword, TokenKind};
use subpy_core::SubpyResult;

/// Statement parser entry points.
pub struct StmtParser;

impl StmtParser {
    /// Parse one line of simple statements or one compound statement into `out`.
    pub fn parse(p: &mut Parser<'_>, out: &mut Vec<Stmt>) -> SubpyResult<()> {
        let compound = match &p.current().kind {
            TokenKind::At => true,
            TokenKind::Keyword(kw) => matches!(
                kw,
                Keyword::If
                    | Keyword::While
                    | Keyword::For
                    | Keyword::Try
                    | Keyword::With
                    | Keyword::Def
                    | Keyword::Class
                    | Keyword::Async
            ),
            _ => false,
        };

        if compound {
            out.push(Self::parse_compound(p)?);
            Ok(())
        } else {
            Self::parse_simple_line(p, out)
        }
    }

    /// Parse an indented block or the simple statements after a `:`.
    fn parse_block(p: &mut Parser<'_>) -> SubpyResult<Vec<Stmt>> {
        p.expect(TokenKind::Colon, "expected ':'")?;
        let mut body = Vec::new();

        if !p.match_token(TokenKind::Newline) {
            Self::parse_simple_line(p, &mut body)?;
            return Ok(body);
        }

        p.expect(TokenKind::Indent, "expected an indented block")?;
        while !p.check(TokenKind::Dedent) && !p.is_at_end() {
            Self::parse(p, &mut body)?;
        }
        p.match_token(TokenKind::Dedent);
        Ok(body)
    }

    // =========================================================================
    // Simple Statements
    // =========================================================================

    fn parse_simple_line(p: &mut Parser<'_>, out: &mut Vec<Stmt>) -> SubpyResult<()> {
        loop {
            out.push(Self::parse_simple(p)?);
            if !p.match_token(TokenKind::Semicolon) {
                break;
            }
            if p.check(TokenKind::Newline) || p.is_at_end() {
                break;
            }
        }

        if p.is_at_end() {
            return Ok(());
        }
        p.expect(TokenKind::Newline, "expected end of statement")?;
        Ok(())
    }

    fn parse_simple(p: &mut Parser<'_>) -> SubpyResult<Stmt> {
        let start = p.start_span();

        let kind = match p.current().kind.clone() {
            TokenKind::Keyword(Keyword::Pass) => {
                p.advance();
                StmtKind::Pass
            }
            TokenKind::Keyword(Keyword::Break) => {
                p.advance();
                StmtKind::Break
            }
            TokenKind::Keyword(Keyword::Continue) => {
                p.advance();
                StmtKind::Continue
            }
            TokenKind::Keyword(Keyword::Return) => {
                p.advance();
                let value = if ExprParser::starts_expression(p) {
                    Some(Box::new(ExprParser::parse_tuple(p, Precedence::NamedExpr)?))
                } else {
                    None
                };
                StmtKind::Return(value)
            }
            TokenKind::Keyword(Keyword::Raise) => Self::parse_raise(p)?,
            TokenKind::Keyword(Keyword::Assert) => {
                p.advance();
                let test = ExprParser::parse(p, Precedence::Conditional)?;
                let msg = if p.match_token(TokenKind::Comma) {
                    Some(Box::new(ExprParser::parse(p, Precedence::Conditional)?))
                } else {
                    None
                };
                StmtKind::Assert {
                    test: Box::new(test),
                    msg,
                }
            }
            TokenKind::Keyword(Keyword::Del) => {
                p.advance();
                let targets = match ExprParser::parse_target_list(p)? {
                    Expr {
                        kind: ExprKind::Tuple(elts),
                        ..
                    } => elts,
                    single => vec![single],
                };
                StmtKind::Delete(targets)
            }
            TokenKind::Keyword(Keyword::Global) => {
                p.advance();
                StmtKind::Global(Self::parse_name_list(p)?)
            }
            TokenKind::Keyword(Keyword::Nonlocal) => {
                p.advance();
                StmtKind::Nonlocal(Self::parse_name_list(p)?)
            }
            TokenKind::Keyword(Keyword::Import) => Self::parse_import(p)?,
            TokenKind::Keyword(Keyword::From) => Self::parse_from_import(p)?,
            TokenKind::Ident(name) if name == "print" && Self::at_print_statement(p) => {
                Self::parse_print(p)?
            }
            TokenKind::Ident(name) if name == "exec" && Self::at_exec_statement(p) => {
                Self::parse_exec(p)?
            }
            _ => Self::parse_expression_statement(p)?,
        };

        Ok(Stmt::new(kind, p.span_from(start)))
    }

    fn parse_name_list(p: &mut Parser<'_>) -> SubpyResult<Vec<String>> {
        let mut names = vec![p.expect_identifier("expected name")?];
        while p.match_token(TokenKind::Comma) {
            names.push(p.expect_identifier("expected name")?);
        }
        Ok(names)
    }

    fn parse_raise(p: &mut Parser<'_>) -> SubpyResult<StmtKind> {
        p.advance();
        if !ExprParser::starts_expression(p) {
            return Ok(StmtKind::Raise {
                exc: None,
                cause: None,
            });
        }
        let exc = ExprParser::parse(p, Precedence::Conditional)?;
        let cause = if p.match_keyword(Keyword::From) {
            Some(Box::new(ExprParser::parse(p, Precedence::Conditional)?))
        } else {
            None
        };
        Ok(StmtKind::Raise {
            exc: Some(Box::new(exc)),
            cause,
        })
    }

    /// Assignment, augmented or annotated assignment, or a bare expression.
    fn parse_expression_statement(p: &mut Parser<'_>) -> SubpyResult<StmtKind> {
        let first = ExprParser::parse_tuple(p, Precedence::NamedExpr)?;

        if let Some(op) = Self::aug_op(&p.current().kind) {
            p.advance();
            let value = Self::parse_assigned_value(p)?;
            return Ok(StmtKind::AugAssign {
                target: Box::new(first),
                op,
                value: Box::new(value),
            });
        }

        if p.match_token(TokenKind::Colon) {
            let annotation = ExprParser::parse(p, Precedence::Conditional)?;
            let value = if p.match_token(TokenKind::Equal) {
                Some(Box::new(Self::parse_assigned_value(p)?))
            } else {
                None
            };
            let simple = matches!(first.kind, ExprKind::Name(_));
            return Ok(StmtKind::AnnAssign {
                target: Box::new(first),
                annotation: Box::new(annotation),
                value,
                simple,
            });
        }

        if !p.check(TokenKind::Equal) {
            return Ok(StmtKind::Expr(Box::new(first)));
        }

        let mut targets = vec![first];
        let mut value = None;
        while p.match_token(TokenKind::Equal) {
            if let Some(previous) = value.replace(Self::parse_assigned_value(p)?) {
                targets.push(previous);
            }
        }
        let value = value.ok_or_else(|| p.error_at_current("expected value"))?;
        Ok(StmtKind::Assign {
            targets,
            value: Box::new(value),
        })
    }

    fn parse_assigned_value(p: &mut Parser<'_>) -> SubpyResult<Expr> {
        if p.check_keyword(Keyword::Yield) {
            return ExprParser::parse(p, Precedence::Lowest);
        }
        ExprParser::parse_tuple(p, Precedence::NamedExpr)
    }

    fn aug_op(kind: &TokenKind) -> Option<AugOp> {
        let op = match kind {
            TokenKind::PlusEqual => AugOp::Add,
            TokenKind::MinusEqual => AugOp::Sub,
            TokenKind::StarEqual => AugOp::Mult,
            TokenKind::AtEqual => AugOp::MatMult,
            TokenKind::SlashEqual => AugOp::Div,
            TokenKind::DoubleSlashEqual => AugOp::FloorDiv,
            TokenKind::PercentEqual => AugOp::Mod,
            TokenKind::DoubleStarEqual => AugOp::Pow,
            TokenKind::LeftShiftEqual => AugOp::LShift,
            TokenKind::RightShiftEqual => AugOp::RShift,
            TokenKind::PipeEqual => AugOp::BitOr,
            TokenKind::CaretEqual => AugOp::BitXor,
            TokenKind::AmpersandEqual => AugOp::BitAnd,
            _ => return None,
        };
        Some(op)
    }

    // =========================================================================
    // Legacy print / exec
    // =========================================================================

    /// `print` starts a statement when followed by an operand, `>>`, or nothing.
    fn at_print_statement(p: &mut Parser<'_>) -> bool {
        let next = &p.peek().kind;
        next.starts_print_operand()
            || matches!(
                next,
                TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof
            )
    }

    /// `exec` starts a statement when followed by a name or a string.
    fn at_exec_statement(p: &mut Parser<'_>) -> bool {
        matches!(
            p.peek().kind,
            TokenKind::Ident(_) | TokenKind::String(_) | TokenKind::Bytes(_)
        )
    }

    fn parse_print(p: &mut Parser<'_>) -> SubpyResult<StmtKind> {
        p.advance();

        let dest = if p.match_token(TokenKind::RightShift) {
            let dest = ExprParser::parse(p, Precedence::Conditional)?;
            if !p.match_token(TokenKind::Comma) {
                return Ok(StmtKind::Print {
                    dest: Some(Box::new(dest)),
                    values: Vec::new(),
                    nl: true,
                });
            }
            Some(Box::new(dest))
        } else {
            None
        };

        let mut values = Vec::new();
        let mut nl = true;
        while ExprParser::starts_expression(p) {
            values.push(ExprParser::parse(p, Precedence::Conditional)?);
            nl = !p.match_token(TokenKind::Comma);
            if nl {
                break;
            }
        }

        Ok(StmtKind::Print { dest, values, nl })
    }

    fn parse_exec(p: &mut Parser<'_>) -> SubpyResult<StmtKind> {
        p.advance();
        let body = ExprParser::parse(p, Precedence::BitwiseOr)?;

        let (globals, locals) = if p.match_keyword(Keyword::In) {
            let globals = ExprParser::parse(p, Precedence::Conditional)?;
            let locals = if p.match_token(TokenKind::Comma) {
                Some(Box::new(ExprParser::parse(p, Precedence::Conditional)?))
            } else {
                None
            };
            (Some(Box::new(globals)), locals)
        } else {
            (None, None)
        };

        Ok(StmtKind::Exec {
            body: Box::new(body),
            globals,
            locals,
        })
    }

    // =========================================================================
    // Imports
    // =========================================================================

    fn parse_import(p: &mut Parser<'_>) -> SubpyResult<StmtKind> {
        p.advance();
        let mut names = vec![Self::parse_alias(p, true)?];
        while p.match_token(TokenKind::Comma) {
            names.push(Self::parse_alias(p, true)?);
        }
        Ok(StmtKind::Import(names))
    }

    fn parse_from_import(p: &mut Parser<'_>) -> SubpyResult<StmtKind> {
        p.advance();

        let mut level = 0;
        loop {
            if p.match_token(TokenKind::Dot) {
                level += 1;
            } else if p.match_token(TokenKind::Ellipsis) {
                level += 3;
            } else {
                break;
            }
        }

        let module = if matches!(p.current().kind, TokenKind::Ident(_)) {
            Some(Self::parse_dotted_name(p)?)
        } else {
            None
        };
        if module.is_none() && level == 0 {
            return Err(p.error_at_current("expected module name"));
        }

        p.expect_keyword(Keyword::Import, "expected 'import'")?;

        let star_start = p.start_span();
        if p.match_token(TokenKind::Star) {
            let names = vec![Alias {
                name: "*".to_string(),
                asname: None,
                span: p.span_from(star_start),
            }];
            return Ok(StmtKind::ImportFrom {
                module,
                names,
                level,
            });
        }

        let parenthesized = p.match_token(TokenKind::LeftParen);
        let mut names = vec![Self::parse_alias(p, false)?];
        while p.match_token(TokenKind::Comma) {
            if parenthesized && p.check(TokenKind::RightParen) {
                break;
            }
            names.push(Self::parse_alias(p, false)?);
        }
        if parenthesized {
            p.expect(TokenKind::RightParen, "expected ')'")?;
        }

        Ok(StmtKind::ImportFrom {
            module,
            names,
            level,
        })
    }

    fn parse_alias(p: &mut Parser<'_>, dotted: bool) -> SubpyResult<Alias> {
        let start = p.start_span();
        let name = if dotted {
            Self::parse_dotted_name(p)?
        } else {
            p.expect_identifier("expected name to import")?
        };
        let asname = if p.match_keyword(Keyword::As) {
            Some(p.expect_identifier("expected name after 'as'")?)
        } else {
            None
        };
        Ok(Alias {
            name,
            asname,
            span: p.span_from(start),
        })
    }

    fn parse_dotted_name(p: &mut Parser<'_>) -> SubpyResult<String> {
        let mut name = p.expect_identifier("expected module name")?;
        while p.match_token(TokenKind::Dot) {
            name.push('.');
            name.push_str(&p.expect_identifier("expected name after '.'")?);
        }
        Ok(name)
    }

    // =========================================================================
    // Compound Statements
    // =========================================================================

    fn parse_compound(p: &mut Parser<'_>) -> SubpyResult<Stmt> {
        if p.check(TokenKind::At) {
            return Self::parse_decorated(p);
        }

        let start = p.start_span();
        let kind = match p.current().kind {
            TokenKind::Keyword(Keyword::If) => Self::parse_if(p)?,
            TokenKind::Keyword(Keyword::While) => Self::parse_while(p)?,
            TokenKind::Keyword(Keyword::For) => Self::parse_for(p, false)?,
            TokenKind::Keyword(Keyword::Try) => Self::parse_try(p)?,
            TokenKind::Keyword(Keyword::With) => Self::parse_with(p, false)?,
            TokenKind::Keyword(Keyword::Def) => Self::parse_def(p, false, Vec::new())?,
            TokenKind::Keyword(Keyword::Class) => Self::parse_class(p, Vec::new())?,
            TokenKind::Keyword(Keyword::Async) => {
                p.advance();
                match p.current().kind {
                    TokenKind::Keyword(Keyword::Def) => Self::parse_def(p, true, Vec::new())?,
                    TokenKind::Keyword(Keyword::For) => Self::parse_for(p, true)?,
                    TokenKind::Keyword(Keyword::With) => Self::parse_with(p, true)?,
                    _ => return Err(p.error_at_current("expected 'def', 'for' or 'with'")),
                }
            }
            _ => return Err(p.error_at_current("expected compound statement")),
        };
        Ok(Stmt::new(kind, p.span_from(start)))
    }

    /// Decorators, then the definition. The span starts at `def`/`class`.
    fn parse_decorated(p: &mut Parser<'_>) -> SubpyResult<Stmt> {
        let mut decorators = Vec::new();
        while p.match_token(TokenKind::At) {
            decorators.push(ExprParser::parse(p, Precedence::NamedExpr)?);
            p.expect(TokenKind::Newline, "expected newline after decorator")?;
        }

        let start = p.start_span();
        let kind = match p.current().kind {
            TokenKind::Keyword(Keyword::Def) => Self::parse_def(p, false, decorators)?,
            TokenKind::Keyword(Keyword::Class) => Self::parse_class(p, decorators)?,
            TokenKind::Keyword(Keyword::Async) => {
                p.advance();
                Self::parse_def(p, true, decorators)?
            }
            _ => return Err(p.error_at_current("expected 'def' or 'class' after decorator")),
        };
        Ok(Stmt::new(kind, p.span_from(start)))
    }

    fn parse_if(p: &mut Parser<'_>) -> SubpyResult<StmtKind> {
        p.advance();
        let test = ExprParser::parse(p, Precedence::Lowest)?;
        let body = Self::parse_block(p)?;

        let orelse = if p.check_keyword(Keyword::Elif) {
            let start = p.start_span();
            let kind = Self::parse_if(p)?;
            vec![Stmt::new(kind, p.span_from(start))]
        } else if p.match_keyword(Keyword::Else) {
            Self::parse_block(p)?
        } else {
            Vec::new()
        };

        Ok(StmtKind::If {
            test: Box::new(test),
            body,
            orelse,
        })
    }

    fn parse_while(p: &mut Parser<'_>) -> SubpyResult<StmtKind> {
        p.advance();
        let test = ExprParser::parse(p, Precedence::Lowest)?;
        let body = Self::parse_block(p)?;
        let orelse = Self::parse_else(p)?;
        Ok(StmtKind::While {
            test: Box::new(test),
            body,
            orelse,
        })
    }

    fn parse_for(p: &mut Parser<'_>, is_async: bool) -> SubpyResult<StmtKind> {
        p.expect_keyword(Keyword::For, "expected 'for'")?;
        let target = Box::new(ExprParser::parse_target_list(p)?);
        p.expect_keyword(Keyword::In, "expected 'in'")?;
        let iter = Box::new(ExprParser::parse_tuple(p, Precedence::NamedExpr)?);
        let body = Self::parse_block(p)?;
        let orelse = Self::parse_else(p)?;

        Ok(if is_async {
            StmtKind::AsyncFor {
                target,
                iter,
                body,
                orelse,
            }
        } else {
            StmtKind::For {
                target,
                iter,
                body,
                orelse,
            }
        })
    }

    fn parse_else(p: &mut Parser<'_>) -> SubpyResult<Vec<Stmt>> {
        if p.match_keyword(Keyword::Else) {
            Self::parse_block(p)
        } else {
            Ok(Vec::new())
        }
    }

    fn parse_try(p: &mut Parser<'_>) -> SubpyResult<StmtKind> {
        p.advance();
        let body = Self::parse_block(p)?;

        let mut handlers = Vec::new();
        while p.check_keyword(Keyword::Except) {
            let start = p.start_span();
            p.advance();
            let (typ, name) = if p.check(TokenKind::Colon) {
                (None, None)
            } else {
                let typ = ExprParser::parse(p, Precedence::Conditional)?;
                let name = if p.match_keyword(Keyword::As) {
                    Some(p.expect_identifier("expected name after 'as'")?)
                } else {
                    None
                };
                (Some(typ), name)
            };
            let body = Self::parse_block(p)?;
            handlers.push(ExceptHandler {
                typ,
                name,
                body,
                span: p.span_from(start),
            });
        }

        let orelse = if !handlers.is_empty() {
            Self::parse_else(p)?
        } else {
            Vec::new()
        };
        let finalbody = if p.match_keyword(Keyword::Finally) {
            Self::parse_block(p)?
        } else {
            Vec::new()
        };

        if handlers.is_empty() && finalbody.is_empty() {
            return Err(p.error_at_current("expected 'except' or 'finally' block"));
        }

        Ok(StmtKind::Try {
            body,
            handlers,
            orelse,
            finalbody,
        })
    }

    fn parse_with(p: &mut Parser<'_>, is_async: bool) -> SubpyResult<StmtKind> {
        p.expect_keyword(Keyword::With, "expected 'with'")?;

        let mut items = Vec::new();
        loop {
            let context_expr = ExprParser::parse(p, Precedence::Conditional)?;
            let optional_vars = if p.match_keyword(Keyword::As) {
                Some(ExprParser::parse(p, Precedence::BitwiseOr)?)
            } else {
                None
            };
            items.push(WithItem {
                context_expr,
                optional_vars,
            });
            if !p.match_token(TokenKind::Comma) {
                break;
            }
        }

        let body = Self::parse_block(p)?;
        Ok(if is_async {
            StmtKind::AsyncWith { items, body }
        } else {
            StmtKind::With { items, body }
        })
    }

    fn parse_def(
        p: &mut Parser<'_>,
        is_async: bool,
        decorator_list: Vec<Expr>,
    ) -> SubpyResult<StmtKind> {
        p.expect_keyword(Keyword::Def, "expected 'def'")?;
        let name = p.expect_identifier("expected function name")?;
        p.expect(TokenKind::LeftParen, "expected '(' after function name")?;
        let args = Box::new(ExprParser::parse_parameters(
            p,
            TokenKind::RightParen,
            true,
        )?);
        p.expect(TokenKind::RightParen, "expected ')' after parameters")?;

        let returns = if p.match_token(TokenKind::Arrow) {
            Some(Box::new(ExprParser::parse(p, Precedence::Conditional)?))
        } else {
            None
        };
        let body = Self::parse_block(p)?;

        Ok(if is_async {
            StmtKind::AsyncFunctionDef {
                name,
                args,
                body,
                decorator_list,
                returns,
            }
        } else {
            StmtKind::FunctionDef {
                name,
                args,
                body,
                decorator_list,
                returns,
            }
        })
    }

    fn parse_class(p: &mut Parser<'_>, decorator_list: Vec<Expr>) -> SubpyResult<StmtKind> {
        p.expect_keyword(Keyword::Class, "expected 'class'")?;
        let name = p.expect_identifier("expected class name")?;

        let (bases, keywords): (Vec<Expr>, Vec<KeywordArg>) =
            if p.match_token(TokenKind::LeftParen) {
                ExprParser::parse_call_args(p)?
            } else {
                (Vec::new(), Vec::new())
            };
        let body = Self::parse_block(p)?;

        Ok(StmtKind::ClassDef {
            name,
            bases,
            keywords,
            body,
            decorator_list,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::parse;

    fn stmts(source: &str) -> Vec<Stmt> {
        parse(source).unwrap().body
    }

    fn first(source: &str) -> StmtKind {
        stmts(source).remove(0).kind
    }

    #[test]
    fn test_simple_statements_on_one_line() {
        let body = stmts("x = 1; y = 2; pass\n");
        assert_eq!(body.len(), 3);
        assert!(matches!(body[2].kind, StmtKind::Pass));
    }

    #[test]
    fn test_chained_assignment() {
        let StmtKind::Assign { targets, value } = first("a = b = 3\n") else {
            panic!("expected Assign");
        };
        assert_eq!(targets.len(), 2);
        assert!(matches!(value.kind, ExprKind::Int(3)));
    }

    #[test]
    fn test_tuple_assignment() {
        let StmtKind::Assign { targets, value } = first("a, b = 1, 2\n") else {
            panic!("expected Assign");
        };
        assert!(matches!(targets[0].kind, ExprKind::Tuple(_)));
        assert!(matches!(value.kind, ExprKind::Tuple(_)));
    }

    #[test]
    fn test_aug_and_ann_assign() {
        assert!(matches!(first("x += 1\n"), StmtKind::AugAssign { op: AugOp::Add, .. }));
        assert!(matches!(
            first("x: int = 1\n"),
            StmtKind::AnnAssign { simple: true, .. }
        ));
    }

    #[test]
    fn test_print_statement_forms() {
        let StmtKind::Print { dest, values, nl } = first("print 'a', b\n") else {
            panic!("expected Print");
        };
        assert!(dest.is_none());
        assert_eq!(values.len(), 2);
        assert!(nl);

        let StmtKind::Print { dest, values, nl } = first("print >>f, x,\n") else {
            panic!("expected Print");
        };
        assert!(dest.is_some());
        assert_eq!(values.len(), 1);
        assert!(!nl);

        assert!(matches!(first("print\n"), StmtKind::Print { .. }));
    }

    #[test]
    fn test_print_call_stays_expression() {
        let StmtKind::Expr(value) = first("print('x')\n") else {
            panic!("expected Expr");
        };
        assert!(matches!(value.kind, ExprKind::Call { .. }));
        assert!(matches!(first("print = 3\n"), StmtKind::Assign { .. }));
    }

    #[test]
    fn test_exec_statement() {
        let StmtKind::Exec { globals, locals, .. } = first("exec code in g, l\n") else {
            panic!("expected Exec");
        };
        assert!(globals.is_some());
        assert!(locals.is_some());
        assert!(matches!(first("exec('x')\n"), StmtKind::Expr(_)));
    }

    #[test]
    fn test_imports() {
        let StmtKind::Import(names) = first("import os.path as p, sys\n") else {
            panic!("expected Import");
        };
        assert_eq!(names[0].name, "os.path");
        assert_eq!(names[0].asname.as_deref(), Some("p"));

        let StmtKind::ImportFrom { module, names, level } = first("from ..pkg import (a, b,)\n")
        else {
            panic!("expected ImportFrom");
        };
        assert_eq!(module.as_deref(), Some("pkg"));
        assert_eq!(level, 2);
        assert_eq!(names.len(), 2);

        let StmtKind::ImportFrom { module, names, level } = first("from . import *\n") else {
            panic!("expected ImportFrom");
        };
        assert!(module.is_none());
        assert_eq!(level, 1);
        assert_eq!(names[0].name, "*");
    }

    #[test]
    fn test_if_elif_else() {
        let StmtKind::If { orelse, .. } = first("if a:\n    x\nelif b:\n    y\nelse:\n    z\n")
        else {
            panic!("expected If");
        };
        let StmtKind::If { orelse: inner, .. } = &orelse[0].kind else {
            panic!("expected nested If");
        };
        assert_eq!(inner.len(), 1);
    }

    #[test]
    fn test_for_with_tuple_target() {
        let StmtKind::For { target, iter, orelse, .. } =
            first("for i, x in enumerate(xs):\n    pass\nelse:\n    pass\n")
        else {
            panic!("expected For");
        };
        assert!(matches!(target.kind, ExprKind::Tuple(_)));
        assert!(matches!(iter.kind, ExprKind::Call { .. }));
        assert_eq!(orelse.len(), 1);
    }

    #[test]
    fn test_try_statement() {
        let source = "try:\n    x\nexcept ValueError as e:\n    pass\nexcept:\n    pass\nelse:\n    y\nfinally:\n    z\n";
        let StmtKind::Try { handlers, orelse, finalbody, .. } = first(source) else {
            panic!("expected Try");
        };
        assert_eq!(handlers.len(), 2);
        assert_eq!(handlers[0].name.as_deref(), Some("e"));
        assert!(handlers[1].typ.is_none());
        assert_eq!(orelse.len(), 1);
        assert_eq!(finalbody.len(), 1);

        assert!(parse("try:\n    x\n").is_err());
    }

    #[test]
    fn test_with_items() {
        let StmtKind::With { items, .. } = first("with open(a) as f, lock:\n    pass\n") else {
            panic!("expected With");
        };
        assert_eq!(items.len(), 2);
        assert!(items[0].optional_vars.is_some());
        assert!(items[1].optional_vars.is_none());
    }

    #[test]
    fn test_decorated_def_span_starts_at_def() {
        let source = "@dec\ndef f(a, b=1, *args, **kw) -> int:\n    return a\n";
        let stmt = stmts(source).remove(0);
        assert_eq!(stmt.span.start, 5);
        let StmtKind::FunctionDef { decorator_list, args, returns, .. } = stmt.kind else {
            panic!("expected FunctionDef");
        };
        assert_eq!(decorator_list.len(), 1);
        assert_eq!(args.args.len(), 2);
        assert!(args.vararg.is_some() && args.kwarg.is_some());
        assert!(returns.is_some());
    }

    #[test]
    fn test_class_with_bases_and_keywords() {
        let StmtKind::ClassDef { bases, keywords, body, .. } =
            first("class A(B, C, metaclass=M):\n    x = 1\n    def f(self): pass\n")
        else {
            panic!("expected ClassDef");
        };
        assert_eq!(bases.len(), 2);
        assert_eq!(keywords[0].arg.as_deref(), Some("metaclass"));
        assert_eq!(body.len(), 2);
    }

    #[test]
    fn test_async_statements() {
        let source = "async def f():\n    async for x in y:\n        pass\n    async with a:\n        pass\n";
        let StmtKind::AsyncFunctionDef { body, .. } = first(source) else {
            panic!("expected AsyncFunctionDef");
        };
        assert!(matches!(body[0].kind, StmtKind::AsyncFor { .. }));
        assert!(matches!(body[1].kind, StmtKind::AsyncWith { .. }));
    }

    #[test]
    fn test_nested_blocks_and_dedent() {
        let body = stmts("def f():\n    if x:\n        return 1\n    return 2\ny = f()\n");
        assert_eq!(body.len(), 2);
        let StmtKind::FunctionDef { body: inner, .. } = &body[0].kind else {
            panic!("expected FunctionDef");
        };
        assert_eq!(inner.len(), 2);
    }

    #[test]
    fn test_yield_statement_and_value() {
        let body = stmts("def g():\n    yield 1\n    x = yield\n    yield from h()\n");
        let StmtKind::FunctionDef { body, .. } = &body[0].kind else {
            panic!("expected FunctionDef");
        };
        assert_eq!(body.len(), 3);
        assert!(matches!(&body[1].kind, StmtKind::Assign { value, .. }
            if matches!(value.kind, ExprKind::Yield(None))));
    }

    #[test]
    fn test_statement_line_numbers_via_spans() {
        let body = stmts("a = 1\n\nb = 2\n");
        assert_eq!(body[1].span.start, 7);
    }
}
