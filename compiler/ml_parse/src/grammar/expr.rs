//! Expression productions, lowest precedence first.
//!
//! ```text
//! expr       : VAR IDENT '=' expr | logic (PIPE call)*
//! logic      : comparison ((AND | OR) comparison)*
//! comparison : NOT comparison | arith (cmp-op arith)*
//! arith      : term (('+' | '-') term)*
//! term       : factor (('*' | '/') factor)*
//! factor     : ('+' | '-') factor | power
//! power      : call ('^' factor)*
//! call       : atom ('(' args ')' | '[' expr ']')*
//! ```

use ml_ir::stack::ensure_sufficient_stack;
use ml_ir::{BinaryOp, ExprId, ExprKind, Name, UnaryOp};
use ml_lexer::TokenKind;

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn expr(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.expr_inner())
    }

    fn expr_inner(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();

        if self.cursor.eat(TokenKind::Var) {
            let name = self.cursor.expect_ident()?;
            self.cursor.expect(TokenKind::Eq)?;
            let value = self.expr()?;
            return Ok(self.alloc(ExprKind::Assign { name, value }, self.span_from(start)));
        }

        let mut left = self.logic()?;
        while self.cursor.eat(TokenKind::Pipe) {
            let right = self.call()?;
            left = self.alloc(ExprKind::Pipe { left, right }, self.span_from(start));
        }
        Ok(left)
    }

    fn logic(&mut self) -> Result<ExprId, ParseError> {
        self.binary_level(Self::comparison, |kind| match kind {
            TokenKind::And => Some(BinaryOp::And),
            TokenKind::Or => Some(BinaryOp::Or),
            _ => None,
        })
    }

    fn comparison(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        if self.cursor.eat(TokenKind::Not) {
            let operand = ensure_sufficient_stack(|| self.comparison())?;
            return Ok(self.alloc(
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    operand,
                },
                self.span_from(start),
            ));
        }
        self.binary_level(Self::arith, |kind| match kind {
            TokenKind::EqEq => Some(BinaryOp::Eq),
            TokenKind::NotEq => Some(BinaryOp::NotEq),
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::LtEq => Some(BinaryOp::LtEq),
            TokenKind::GtEq => Some(BinaryOp::GtEq),
            _ => None,
        })
    }

    fn arith(&mut self) -> Result<ExprId, ParseError> {
        self.binary_level(Self::term, |kind| match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn term(&mut self) -> Result<ExprId, ParseError> {
        self.binary_level(Self::factor, |kind| match kind {
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            _ => None,
        })
    }

    fn factor(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        if self.cursor.eat(TokenKind::Plus) {
            return ensure_sufficient_stack(|| self.factor());
        }
        if self.cursor.eat(TokenKind::Minus) {
            let operand = ensure_sufficient_stack(|| self.factor())?;
            return Ok(self.alloc(
                ExprKind::Unary {
                    op: UnaryOp::Neg,
                    operand,
                },
                self.span_from(start),
            ));
        }
        self.power()
    }

    fn power(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.call()?;
        while self.cursor.eat(TokenKind::Caret) {
            let right = ensure_sufficient_stack(|| self.factor())?;
            let span = self.span_of(left).merge(self.span_of(right));
            left = self.alloc(
                ExprKind::Binary {
                    op: BinaryOp::Pow,
                    left,
                    right,
                },
                span,
            );
        }
        Ok(left)
    }

    /// Left-associative binary level: `operand (op operand)*`.
    fn binary_level(
        &mut self,
        operand: fn(&mut Self) -> Result<ExprId, ParseError>,
        op_for: fn(TokenKind) -> Option<BinaryOp>,
    ) -> Result<ExprId, ParseError> {
        let mut left = operand(self)?;
        while let Some(op) = op_for(self.cursor.current_kind()) {
            self.cursor.advance();
            let right = operand(self)?;
            let span = self.span_of(left).merge(self.span_of(right));
            left = self.alloc(ExprKind::Binary { op, left, right }, span);
        }
        Ok(left)
    }

    /// An atom followed by any number of call or index suffixes.
    pub(crate) fn call(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        let mut expr = self.atom()?;
        loop {
            if self.cursor.eat(TokenKind::LParen) {
                let args = self.comma_list(TokenKind::RParen)?;
                let args = self.arena.alloc_expr_list(args);
                expr = self.alloc(ExprKind::Call { callee: expr, args }, self.span_from(start));
            } else if self.cursor.eat(TokenKind::LBracket) {
                let index = self.expr()?;
                self.cursor.expect(TokenKind::RBracket)?;
                expr = self.alloc(
                    ExprKind::Index {
                        target: expr,
                        index,
                    },
                    self.span_from(start),
                );
            } else {
                return Ok(expr);
            }
        }
    }

    fn atom(&mut self) -> Result<ExprId, ParseError> {
        let token = self.cursor.current();
        match token.kind {
            TokenKind::Number(value) => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Number(value), token.span))
            }
            TokenKind::Text(name) => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Text(name), token.span))
            }
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Ident(name), token.span))
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.expr()?;
                self.cursor.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                self.cursor.advance();
                let elements = self.comma_list(TokenKind::RBracket)?;
                let elements = self.arena.alloc_expr_list(elements);
                Ok(self.alloc(ExprKind::List(elements), self.span_from(token.span)))
            }
            TokenKind::If => self.if_expr(),
            TokenKind::For => self.for_expr(),
            TokenKind::While => self.while_expr(),
            TokenKind::Fun => self.function(),
            TokenKind::Embed => self.embed_expr(),
            TokenKind::Ai => self.ai_expr(),
            _ => Err(self.cursor.unexpected(
                "number, string, identifier, '(', '[', 'IF', 'FOR', 'WHILE', 'FUN', 'EMBED' or 'AI'",
            )),
        }
    }

    /// Comma-separated expressions up to and including `close`. Newlines
    /// are allowed between elements.
    pub(crate) fn comma_list(&mut self, close: TokenKind) -> Result<Vec<ExprId>, ParseError> {
        let mut items = Vec::new();
        self.cursor.skip_newlines();
        if self.cursor.eat(close) {
            return Ok(items);
        }
        loop {
            items.push(self.expr()?);
            self.cursor.skip_newlines();
            if self.cursor.eat(TokenKind::Comma) {
                self.cursor.skip_newlines();
                continue;
            }
            self.cursor.expect(close)?;
            return Ok(items);
        }
    }

    /// `EMBED text [WITH model]`; the model is an identifier or string.
    fn embed_expr(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.expect(TokenKind::Embed)?.span;
        let text = self.expr()?;
        let model = if self.cursor.eat(TokenKind::With) {
            Some(self.model_name()?)
        } else {
            None
        };
        Ok(self.alloc(ExprKind::Embed { text, model }, self.span_from(start)))
    }

    /// `AI model(args...)`
    fn ai_expr(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.expect(TokenKind::Ai)?.span;
        let model = self.model_name()?;
        self.cursor.expect(TokenKind::LParen)?;
        let args = self.comma_list(TokenKind::RParen)?;
        let args = self.arena.alloc_expr_list(args);
        Ok(self.alloc(ExprKind::AiCall { model, args }, self.span_from(start)))
    }

    fn model_name(&mut self) -> Result<Name, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Ident(name) | TokenKind::Text(name) => {
                self.cursor.advance();
                Ok(name)
            }
            _ => Err(self.cursor.unexpected("model name")),
        }
    }
}
