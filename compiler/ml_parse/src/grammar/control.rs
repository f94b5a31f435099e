//! Statements, blocks and the block-bodied constructs.
//!
//! `IF`, `FOR`, `WHILE` and `FUN` each come in two shapes. A body on the
//! same line as `THEN` (or after `->`) is a single statement whose value
//! the construct yields. A body starting on the next line is a block
//! closed by `END`, and the construct evaluates to null.

use ml_ir::{ExprId, ExprKind, ExprRange, IfBranch};
use ml_lexer::TokenKind;

use crate::{ParseError, Parser};

/// Tokens that close a block body.
const BLOCK_END: &[TokenKind] = &[TokenKind::End];
const IF_BLOCK_END: &[TokenKind] = &[TokenKind::End, TokenKind::Elif, TokenKind::Else];

impl Parser<'_> {
    /// Whole-file statement list. Returns the top-level statement range.
    pub(crate) fn module(&mut self) -> Result<ExprRange, ParseError> {
        let statements = self.statement_list(&[])?;
        if !self.cursor.is_at_end() {
            return Err(self.cursor.unexpected("newline or end of file"));
        }
        Ok(self.arena.alloc_expr_list(statements))
    }

    /// Statements separated by newlines, stopping before any of `stop` or
    /// end of file.
    fn statement_list(&mut self, stop: &[TokenKind]) -> Result<Vec<ExprId>, ParseError> {
        let mut statements = Vec::new();
        self.cursor.skip_newlines();
        while !self.cursor.is_at_end() && !self.cursor.check_any(stop) {
            statements.push(self.statement()?);
            if !self.check(TokenKind::Newline) {
                break;
            }
            self.cursor.skip_newlines();
        }
        Ok(statements)
    }

    /// A block body; the caller consumes the closing token.
    fn block(&mut self, stop: &[TokenKind]) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        let statements = self.statement_list(stop)?;
        let range = self.arena.alloc_expr_list(statements);
        let span = if range.is_empty() {
            start
        } else {
            self.span_from(start)
        };
        Ok(self.alloc(ExprKind::Block(range), span))
    }

    pub(crate) fn statement(&mut self) -> Result<ExprId, ParseError> {
        let token = self.cursor.current();
        match token.kind {
            TokenKind::Return => {
                self.cursor.advance();
                let value = if self.starts_expression() {
                    Some(self.expr()?)
                } else {
                    None
                };
                Ok(self.alloc(ExprKind::Return(value), self.span_from(token.span)))
            }
            TokenKind::Continue => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Continue, token.span))
            }
            TokenKind::Break => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Break, token.span))
            }
            _ => self.expr(),
        }
    }

    fn starts_expression(&self) -> bool {
        !self.cursor.check_any(&[
            TokenKind::Newline,
            TokenKind::Eof,
            TokenKind::End,
            TokenKind::Elif,
            TokenKind::Else,
        ])
    }

    /// Body after `THEN`: a block closed by `END`, or one statement.
    /// Returns the body and whether the construct yields its value.
    fn body(&mut self) -> Result<(ExprId, bool), ParseError> {
        if self.check(TokenKind::Newline) {
            let body = self.block(BLOCK_END)?;
            self.cursor.expect(TokenKind::End)?;
            Ok((body, false))
        } else {
            Ok((self.statement()?, true))
        }
    }

    pub(crate) fn if_expr(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.expect(TokenKind::If)?.span;
        let mut branches = Vec::new();
        let mut else_branch = None;
        let mut yields = true;

        loop {
            let condition = self.expr()?;
            self.cursor.expect(TokenKind::Then)?;

            let body = if self.check(TokenKind::Newline) {
                yields = false;
                self.block(IF_BLOCK_END)?
            } else {
                self.statement()?
            };
            branches.push(IfBranch { condition, body });

            if self.cursor.eat(TokenKind::Elif) {
                continue;
            }
            if self.cursor.eat(TokenKind::Else) {
                let (body, inline) = self.body()?;
                yields &= inline;
                else_branch = Some(body);
            } else if !yields {
                self.cursor.expect(TokenKind::End)?;
            }
            break;
        }

        let branches = self.arena.alloc_branches(branches);
        Ok(self.alloc(
            ExprKind::If {
                branches,
                else_branch,
                yields,
            },
            self.span_from(start),
        ))
    }

    /// `FOR var = start TO end [STEP step] THEN body`
    pub(crate) fn for_expr(&mut self) -> Result<ExprId, ParseError> {
        let start_span = self.cursor.expect(TokenKind::For)?.span;
        let var = self.cursor.expect_ident()?;
        self.cursor.expect(TokenKind::Eq)?;
        let start = self.expr()?;
        self.cursor.expect(TokenKind::To)?;
        let end = self.expr()?;
        let step = if self.cursor.eat(TokenKind::Step) {
            Some(self.expr()?)
        } else {
            None
        };
        self.cursor.expect(TokenKind::Then)?;
        let (body, yields) = self.body()?;
        Ok(self.alloc(
            ExprKind::For {
                var,
                start,
                end,
                step,
                body,
                yields,
            },
            self.span_from(start_span),
        ))
    }

    pub(crate) fn while_expr(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.expect(TokenKind::While)?.span;
        let condition = self.expr()?;
        self.cursor.expect(TokenKind::Then)?;
        let (body, yields) = self.body()?;
        Ok(self.alloc(
            ExprKind::While {
                condition,
                body,
                yields,
            },
            self.span_from(start),
        ))
    }

    /// `FUN [name](params) -> expr` or `FUN [name](params)` NEWLINE block `END`.
    pub(crate) fn function(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.expect(TokenKind::Fun)?.span;
        let name = match self.cursor.current_kind() {
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Some(name)
            }
            _ => None,
        };

        self.cursor.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.cursor.eat(TokenKind::RParen) {
            loop {
                let param_span = self.cursor.current_span();
                let param = self.cursor.expect_ident()?;
                if params.contains(&param) {
                    return Err(ParseError::new("duplicate parameter name", param_span));
                }
                params.push(param);
                if self.cursor.eat(TokenKind::Comma) {
                    continue;
                }
                self.cursor.expect(TokenKind::RParen)?;
                break;
            }
        }
        let params = self.arena.alloc_params(params);

        let (body, auto_return) = if self.cursor.eat(TokenKind::Arrow) {
            (self.expr()?, true)
        } else if self.check(TokenKind::Newline) {
            let body = self.block(BLOCK_END)?;
            self.cursor.expect(TokenKind::End)?;
            (body, false)
        } else {
            return Err(self.cursor.unexpected("'->' or newline"));
        };

        Ok(self.alloc(
            ExprKind::Function {
                name,
                params,
                body,
                auto_return,
            },
            self.span_from(start),
        ))
    }
}
