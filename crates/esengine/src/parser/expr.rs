//! Expression grammar (spec §4.3, precedence-climbing binary operators,
//! cover-grammar arrow-head and destructuring-assignment detection).
//!
//! Grounded on the teacher's `parse_expr.rs`, which climbs precedence using
//! a single numeric table the way `Punctuator::binary_precedence` does
//! here, and resolves ambiguous heads by a speculative parse guarded by a
//! saved position — the same shape as this file's `try_parse_arrow_function`.

use crate::ast::{AssignmentOp, BinaryOp, LogicalOp, NodeShape, UnaryOp, UpdateOp};
use crate::errors::{Diagnostic, ParseResult};
use crate::intern::WellKnown;
use crate::scanner::{Keyword, Punctuator, TokenKind};
use crate::span::ExtendedNodeLoc;

use super::pattern::ParamListShape;
use super::{ASTBuilder, ParseTracer, Parser};

impl<Tr: ParseTracer, B: ASTBuilder> Parser<'_, Tr, B> {
    /// `Expression` production: a comma-separated sequence collapses to a
    /// single `SequenceExpression` when more than one element is present.
    pub(super) fn parse_expression(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        let first = self.parse_assignment_expression()?;
        if !self.at_punct(Punctuator::Comma) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat_punct(Punctuator::Comma)? {
            expressions.push(self.parse_assignment_expression()?);
        }
        Ok(self.make(NodeShape::SequenceExpression { expressions }, start))
    }

    pub(super) fn parse_assignment_expression(&mut self) -> ParseResult<B::Handle> {
        self.guard_recursion(Self::parse_assignment_expression_inner)
    }

    fn parse_assignment_expression_inner(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();

        if self.context.allow_yield && self.at_keyword(Keyword::Yield) {
            return self.parse_yield_expression();
        }

        if let Some(arrow) = self.try_parse_arrow_function(start)? {
            return Ok(arrow);
        }

        if let Some(assignment) = self.try_parse_destructuring_assignment(start)? {
            return Ok(assignment);
        }

        let left = self.parse_conditional_expression()?;

        if let Some(op) = self.cur.as_punctuator().and_then(assignment_op_of) {
            self.advance()?;
            let right = self.parse_assignment_expression()?;
            return Ok(self.make(NodeShape::AssignmentExpression { op, left, right }, start));
        }

        Ok(left)
    }

    fn parse_yield_expression(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.advance()?; // `yield`
        let delegate = self.eat_punct(Punctuator::Star)?;
        let can_have_argument = !self.cur.has_line_terminator_before
            && !matches!(
                self.cur.as_punctuator(),
                Some(Punctuator::Semicolon | Punctuator::RParen | Punctuator::RBrace | Punctuator::RBracket | Punctuator::Comma | Punctuator::Colon)
            )
            && self.cur.kind != TokenKind::Eof;
        let argument = if delegate || can_have_argument {
            Some(self.parse_assignment_expression()?)
        } else {
            None
        };
        Ok(self.make(NodeShape::YieldExpression { argument, delegate }, start))
    }

    /// Speculatively parses `async`? (`ident` | `(` params `)`) `=>` ...
    /// (spec's cover grammar for arrow-function heads). A failed trial
    /// restores the scanner to `cp` and falls through to ordinary
    /// expression parsing, which is always still valid from that point:
    /// `async`, a bare identifier, or a parenthesized expression.
    fn try_parse_arrow_function(&mut self, start: ExtendedNodeLoc) -> ParseResult<Option<B::Handle>> {
        if !matches!(self.cur.kind, TokenKind::Identifier) && !self.at_punct(Punctuator::LParen) {
            return Ok(None);
        }
        let cp = self.checkpoint();
        let mut is_async = false;
        if self.cur.kind == TokenKind::Identifier
            && self.cur.identifier_name().is_some_and(|n| self.interner.is_well_known(n, WellKnown::Async))
        {
            let after_async = self.checkpoint();
            if self.advance().is_ok()
                && !self.cur.has_line_terminator_before
                && (self.cur.kind == TokenKind::Identifier || self.at_punct(Punctuator::LParen))
            {
                is_async = true;
            } else {
                self.restore(after_async);
            }
        }

        let shape = if self.cur.kind == TokenKind::Identifier {
            let name = self.cur.identifier_name().expect("checked above");
            let id_start = self.loc();
            self.advance()?;
            let identifier = self.make(NodeShape::Identifier { name }, id_start);
            Some(ParamListShape { params: vec![identifier], bound_names: vec![name], is_simple: true })
        } else if self.at_punct(Punctuator::LParen) {
            self.parse_parameter_list_shape().ok()
        } else {
            None
        };

        let Some(shape) = shape else {
            self.restore(cp);
            return Ok(None);
        };

        if !self.at_punct(Punctuator::Arrow) || self.cur.has_line_terminator_before {
            self.restore(cp);
            return Ok(None);
        }
        self.advance()?; // `=>`
        Ok(Some(self.finish_arrow_function(start, shape, is_async)?))
    }

    fn finish_arrow_function(&mut self, start: ExtendedNodeLoc, shape: ParamListShape<B::Handle>, is_async: bool) -> ParseResult<B::Handle> {
        let saved_context = self.context.clone();
        let mut new_context = self.context.for_arrow_body();
        if is_async {
            new_context.allow_await = true;
        }
        self.context = new_context;
        self.scope.enter_function(None);
        for name in &shape.bound_names {
            self.scope.current().params.push(*name);
        }
        if !shape.is_simple {
            self.scope.current().has_simple_parameter_list = false;
        }
        self.scope.current().is_arrow = true;
        self.scope.current().is_async = is_async;

        let (body, is_expression_body) = if self.at_punct(Punctuator::LBrace) {
            (self.parse_function_body_block()?, false)
        } else {
            (self.parse_assignment_expression()?, true)
        };

        let child = self.scope.exit_function();
        self.scope.adopt_child(child);
        self.context = saved_context;

        Ok(self.make(NodeShape::ArrowFunctionExpression { params: shape.params, body, is_expression_body, is_async }, start))
    }

    /// Speculatively parses `[pattern] = expr` / `{pattern} = expr`
    /// (spec's cover grammar for destructuring assignment). Only plain
    /// `=` is handled this way; compound assignment to an array/object
    /// literal is never valid so no ambiguity exists there.
    fn try_parse_destructuring_assignment(&mut self, start: ExtendedNodeLoc) -> ParseResult<Option<B::Handle>> {
        if !matches!(self.cur.as_punctuator(), Some(Punctuator::LBracket | Punctuator::LBrace)) {
            return Ok(None);
        }
        let cp = self.checkpoint();
        match self.parse_assignment_target_pattern() {
            Ok(pattern) if self.at_punct(Punctuator::Assign) => {
                self.advance()?;
                let right = self.parse_assignment_expression()?;
                Ok(Some(self.make(NodeShape::AssignmentExpression { op: AssignmentOp::Assign, left: pattern, right }, start)))
            }
            _ => {
                self.restore(cp);
                Ok(None)
            }
        }
    }

    pub(super) fn parse_conditional_expression(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        let test = self.parse_binary_expression(0)?;
        if self.eat_punct(Punctuator::QuestionMark)? {
            let consequent = self.parse_assignment_expression()?;
            self.expect_punct(Punctuator::Colon)?;
            let alternate = self.parse_assignment_expression()?;
            return Ok(self.make(NodeShape::ConditionalExpression { test, consequent, alternate }, start));
        }
        Ok(test)
    }

    /// Precedence-climbing binary/logical operator parse, grounded on
    /// `Punctuator::binary_precedence`'s table; `in`/`instanceof` are
    /// keyword operators folded into the same ladder at precedence 7.
    fn parse_binary_expression(&mut self, min_precedence: u8) -> ParseResult<B::Handle> {
        let start = self.loc();
        let mut left = self.parse_unary_expression()?;
        loop {
            let Some((precedence, op)) = self.peek_binary_operator() else { break };
            if precedence < min_precedence {
                break;
            }
            self.advance()?;
            let right = self.parse_binary_expression(precedence + 1)?;
            left = match op {
                BinOrLogical::Binary(op) => self.make(NodeShape::BinaryExpression { op, left, right }, start),
                BinOrLogical::Logical(op) => self.make(NodeShape::LogicalExpression { op, left, right }, start),
            };
        }
        Ok(left)
    }

    fn peek_binary_operator(&self) -> Option<(u8, BinOrLogical)> {
        if self.at_keyword(Keyword::In) && !self.context.in_parameter_parsing {
            return Some((7, BinOrLogical::Binary(BinaryOp::In)));
        }
        if self.at_keyword(Keyword::InstanceOf) {
            return Some((7, BinOrLogical::Binary(BinaryOp::InstanceOf)));
        }
        let p = self.cur.as_punctuator()?;
        let precedence = p.binary_precedence()?;
        let op = match p {
            Punctuator::And => BinOrLogical::Logical(LogicalOp::And),
            Punctuator::Or => BinOrLogical::Logical(LogicalOp::Or),
            Punctuator::QuestionQuestion => BinOrLogical::Logical(LogicalOp::NullishCoalescing),
            other => BinOrLogical::Binary(binary_op_of(other)?),
        };
        Some((precedence, op))
    }

    fn parse_unary_expression(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        let op = match self.cur.as_punctuator() {
            Some(Punctuator::Plus) => Some(UnaryOp::Plus),
            Some(Punctuator::Minus) => Some(UnaryOp::Minus),
            Some(Punctuator::Not) => Some(UnaryOp::Not),
            Some(Punctuator::BitNot) => Some(UnaryOp::BitNot),
            _ => match self.cur.as_keyword() {
                Some(Keyword::TypeOf) => Some(UnaryOp::TypeOf),
                Some(Keyword::Void) => Some(UnaryOp::Void),
                Some(Keyword::Delete) => Some(UnaryOp::Delete),
                _ => None,
            },
        };
        if let Some(op) = op {
            self.advance()?;
            let argument = self.parse_unary_expression()?;
            return Ok(self.make(NodeShape::UnaryExpression { op, argument }, start));
        }
        if self.context.allow_await && self.at_keyword(Keyword::Await) {
            self.advance()?;
            if !self.context.in_function_body {
                self.has_top_level_await = true;
            }
            let argument = self.parse_unary_expression()?;
            return Ok(self.make(NodeShape::AwaitExpression { argument }, start));
        }
        if matches!(self.cur.as_punctuator(), Some(Punctuator::PlusPlus | Punctuator::MinusMinus)) {
            let op = if self.at_punct(Punctuator::PlusPlus) { UpdateOp::Increment } else { UpdateOp::Decrement };
            self.advance()?;
            let argument = self.parse_unary_expression()?;
            return Ok(self.make(NodeShape::UpdateExpression { op, argument, prefix: true }, start));
        }
        self.parse_postfix_expression()
    }

    fn parse_postfix_expression(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        let expr = self.parse_left_hand_side_expression()?;
        if !self.cur.has_line_terminator_before
            && matches!(self.cur.as_punctuator(), Some(Punctuator::PlusPlus | Punctuator::MinusMinus))
        {
            let op = if self.at_punct(Punctuator::PlusPlus) { UpdateOp::Increment } else { UpdateOp::Decrement };
            self.advance()?;
            return Ok(self.make(NodeShape::UpdateExpression { op, argument: expr, prefix: false }, start));
        }
        Ok(expr)
    }

    /// `new`/member/call chains, including optional chaining. A chain that
    /// contains any `?.` link is wrapped in a `ChainExpression` (spec's
    /// optional-chaining node), matching how short-circuiting must stop at
    /// the chain's outer boundary.
    pub(super) fn parse_left_hand_side_expression(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        let mut expr = if self.at_keyword(Keyword::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        let mut saw_optional = false;
        loop {
            if self.eat_punct(Punctuator::Dot)? {
                let property = self.parse_member_property_name()?;
                expr = self.make(NodeShape::MemberExpression { object: expr, property, computed: false, optional: false }, start);
            } else if self.at_punct(Punctuator::QuestionDot) {
                self.advance()?;
                saw_optional = true;
                if self.at_punct(Punctuator::LParen) {
                    let arguments = self.parse_arguments()?;
                    expr = self.make(NodeShape::CallExpression { callee: expr, arguments, optional: true }, start);
                } else if self.eat_punct(Punctuator::LBracket)? {
                    let property = self.parse_expression()?;
                    self.expect_punct(Punctuator::RBracket)?;
                    expr = self.make(NodeShape::MemberExpression { object: expr, property, computed: true, optional: true }, start);
                } else {
                    let property = self.parse_member_property_name()?;
                    expr = self.make(NodeShape::MemberExpression { object: expr, property, computed: false, optional: true }, start);
                }
            } else if self.eat_punct(Punctuator::LBracket)? {
                let property = self.parse_expression()?;
                self.expect_punct(Punctuator::RBracket)?;
                expr = self.make(NodeShape::MemberExpression { object: expr, property, computed: true, optional: false }, start);
            } else if self.at_punct(Punctuator::LParen) {
                let arguments = self.parse_arguments()?;
                expr = self.make(NodeShape::CallExpression { callee: expr, arguments, optional: false }, start);
            } else if self.cur.kind == TokenKind::Template {
                let quasi = self.parse_template_literal(true)?;
                let site_id = self.next_inline_cache_site_id();
                expr = self.make(NodeShape::TaggedTemplateExpression { tag: expr, quasi, site_id }, start);
            } else {
                break;
            }
        }
        if saw_optional {
            expr = self.make(NodeShape::ChainExpression { expression: expr }, start);
        }
        Ok(expr)
    }

    fn next_inline_cache_site_id(&mut self) -> u32 {
        // Call-site ids for tagged templates (spec §4.4's "site" field on
        // `CallExpression`-like opcodes); a per-parse monotonic counter
        // handed to the emitter to size its inline-cache arena.
        let id = self.tagged_template_site_counter;
        self.tagged_template_site_counter += 1;
        id
    }

    fn parse_new_expression(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.advance()?; // `new`
        if self.at_punct(Punctuator::Dot) {
            self.advance()?;
            if !self.at_identifier_named("target") {
                return Err(Diagnostic::syntax("Expected 'new.target'", self.loc()));
            }
            self.advance()?;
            if !self.context.allow_new_target {
                return Err(Diagnostic::syntax("'new.target' is not allowed here", start));
            }
            // `NodeShape` has no dedicated meta-property variant; represented
            // as an identifier carrying the interned text `new.target`,
            // which can never collide with a source-level binding.
            let name = self.interner.intern("new.target");
            return Ok(self.make(NodeShape::Identifier { name }, start));
        }
        let callee = if self.at_keyword(Keyword::New) { self.parse_new_expression()? } else { self.parse_member_expression_no_call()? };
        let arguments = if self.at_punct(Punctuator::LParen) { self.parse_arguments()? } else { Vec::new() };
        Ok(self.make(NodeShape::NewExpression { callee, arguments }, start))
    }

    /// `MemberExpression` restricted to dot/bracket access (no calls),
    /// used for `new`'s callee so `new a.b.c(...)` attaches the call to
    /// the whole chain rather than an inner member.
    fn parse_member_expression_no_call(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        let mut expr = self.parse_primary_expression()?;
        loop {
            if self.eat_punct(Punctuator::Dot)? {
                let property = self.parse_member_property_name()?;
                expr = self.make(NodeShape::MemberExpression { object: expr, property, computed: false, optional: false }, start);
            } else if self.eat_punct(Punctuator::LBracket)? {
                let property = self.parse_expression()?;
                self.expect_punct(Punctuator::RBracket)?;
                expr = self.make(NodeShape::MemberExpression { object: expr, property, computed: true, optional: false }, start);
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<B::Handle>> {
        self.expect_punct(Punctuator::LParen)?;
        let mut args = Vec::new();
        while !self.at_punct(Punctuator::RParen) {
            let start = self.loc();
            if self.eat_punct(Punctuator::DotDotDot)? {
                let argument = self.parse_assignment_expression()?;
                args.push(self.make(NodeShape::SpreadElement { argument }, start));
            } else {
                args.push(self.parse_assignment_expression()?);
            }
            if !self.eat_punct(Punctuator::Comma)? {
                break;
            }
        }
        self.expect_punct(Punctuator::RParen)?;
        Ok(args)
    }

    /// `.`-accessed property name: either an ordinary identifier name or,
    /// for private-name access (spec §4.3.5, `o.#p`), a `PrivateIdentifier`.
    fn parse_member_property_name(&mut self) -> ParseResult<B::Handle> {
        if self.at_punct(Punctuator::Hash) {
            let start = self.loc();
            self.advance()?; // `#`
            let name = self.expect_binding_identifier_text()?;
            return Ok(self.make(NodeShape::PrivateIdentifier { name }, start));
        }
        self.parse_identifier_name_as_property()
    }

    fn parse_identifier_name_as_property(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        let name = match self.cur.kind {
            TokenKind::Identifier => self.cur.identifier_name().expect("identifier token carries a name"),
            TokenKind::Keyword => {
                let kw = self.cur.as_keyword().expect("keyword token carries a keyword");
                self.interner.intern(crate::scanner::keyword_text(kw))
            }
            _ => return Err(Diagnostic::syntax("Expected property name", self.loc())),
        };
        self.advance()?;
        Ok(self.make(NodeShape::Identifier { name }, start))
    }

    pub(super) fn parse_primary_expression(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        match self.cur.kind {
            TokenKind::NumericLiteral => {
                let crate::scanner::TokenPayload::Numeric(p) = self.cur.payload else { unreachable!() };
                self.advance()?;
                if p.is_bigint {
                    let raw = self.interner.intern(&p.value.to_string());
                    return Ok(self.make(NodeShape::BigIntLiteral { raw }, start));
                }
                Ok(self.make(NodeShape::NumericLiteral { value: p.value }, start))
            }
            TokenKind::StringLiteral => {
                let crate::scanner::TokenPayload::StringLit { value } = self.cur.payload else { unreachable!() };
                self.advance()?;
                Ok(self.make(NodeShape::StringLiteral { value }, start))
            }
            TokenKind::BooleanLiteral => {
                let crate::scanner::TokenPayload::Boolean(value) = self.cur.payload else { unreachable!() };
                self.advance()?;
                Ok(self.make(NodeShape::BooleanLiteral { value }, start))
            }
            TokenKind::NullLiteral => {
                self.advance()?;
                Ok(self.make(NodeShape::NullLiteral, start))
            }
            TokenKind::Template => self.parse_template_literal(false),
            TokenKind::Identifier => self.parse_identifier_reference(),
            TokenKind::Keyword if self.yield_reinterprets_as_identifier() => self.parse_identifier_reference(),
            TokenKind::Keyword => self.parse_keyword_primary(start),
            TokenKind::Punctuator => self.parse_punctuator_primary(start),
            TokenKind::RegularExpression => {
                let crate::scanner::TokenPayload::RegExp(r) = self.cur.payload else { unreachable!() };
                self.advance()?;
                Ok(self.make(NodeShape::RegExpLiteral { pattern: r.pattern, flags: r.flags }, start))
            }
            TokenKind::Eof | TokenKind::Invalid => Err(Diagnostic::syntax("Unexpected end of input", self.loc())),
        }
    }

    fn parse_keyword_primary(&mut self, start: ExtendedNodeLoc) -> ParseResult<B::Handle> {
        match self.cur.as_keyword() {
            Some(Keyword::This) => {
                self.advance()?;
                Ok(self.make(NodeShape::ThisExpression, start))
            }
            Some(Keyword::Super) => {
                self.advance()?;
                Ok(self.make(NodeShape::Super, start))
            }
            Some(Keyword::Function) => self.parse_function_expression(false),
            Some(Keyword::Class) => self.parse_class_expression(),
            _ => Err(Diagnostic::syntax("Unexpected keyword", self.loc())),
        }
    }

    fn parse_punctuator_primary(&mut self, start: ExtendedNodeLoc) -> ParseResult<B::Handle> {
        match self.cur.as_punctuator() {
            Some(Punctuator::LParen) => self.parse_parenthesized_expression(),
            Some(Punctuator::LBracket) => self.parse_array_literal(),
            Some(Punctuator::LBrace) => self.parse_object_literal(),
            Some(Punctuator::Slash | Punctuator::SlashAssign) => self.parse_regex_literal(),
            _ => Err(Diagnostic::syntax(format!("Unexpected token at {}:{}", start.line, start.column), self.loc())),
        }
    }

    /// Rewinds to the scanner position just before the `/`/`/=` punctuator
    /// currently in `cur` and re-lexes it as a regex literal (spec §4.2.3's
    /// controlled rewind: the scanner never guesses at a leading `/`).
    fn parse_regex_literal(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.scanner.restore(self.before_cur);
        let (kind, payload) = self.scanner.rescan_regex(&mut self.interner)?;
        debug_assert_eq!(kind, TokenKind::RegularExpression);
        let crate::scanner::TokenPayload::RegExp(r) = payload else { unreachable!() };
        self.before_cur = self.scanner.checkpoint();
        self.cur = self.scanner.next_token(&mut self.interner)?;
        Ok(self.make(NodeShape::RegExpLiteral { pattern: r.pattern, flags: r.flags }, start))
    }

    fn parse_identifier_reference(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        let name = self.identifier_like_name().expect("checked by caller");
        if self.interner.is_well_known(name, WellKnown::Async) && self.peek_is_async_function_start() {
            self.advance()?; // consume `async`
            return self.parse_function_expression(true);
        }
        self.advance()?;
        self.record_using_name(name);
        Ok(self.make(NodeShape::Identifier { name }, start))
    }

    /// One-token-ahead check for `async function` with no line terminator
    /// between the two keywords (spec: ASI would otherwise split `async`
    /// onto its own `ExpressionStatement`). `cur` is restored afterward
    /// regardless of the result.
    fn peek_is_async_function_start(&mut self) -> bool {
        let cp = self.checkpoint();
        let is_match = self.advance().is_ok() && self.at_keyword(Keyword::Function) && !self.cur.has_line_terminator_before;
        self.restore(cp);
        is_match
    }

    fn parse_parenthesized_expression(&mut self) -> ParseResult<B::Handle> {
        self.expect_punct(Punctuator::LParen)?;
        let expr = self.parse_expression()?;
        self.expect_punct(Punctuator::RParen)?;
        Ok(expr)
    }

    fn parse_array_literal(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.expect_punct(Punctuator::LBracket)?;
        let mut elements = Vec::new();
        while !self.at_punct(Punctuator::RBracket) {
            if self.at_punct(Punctuator::Comma) {
                self.advance()?;
                continue;
            }
            let el_start = self.loc();
            if self.eat_punct(Punctuator::DotDotDot)? {
                let argument = self.parse_assignment_expression()?;
                elements.push(self.make(NodeShape::SpreadElement { argument }, el_start));
            } else {
                elements.push(self.parse_assignment_expression()?);
            }
            if !self.at_punct(Punctuator::RBracket) {
                self.expect_punct(Punctuator::Comma)?;
            }
        }
        self.expect_punct(Punctuator::RBracket)?;
        Ok(self.make(NodeShape::ArrayExpression { elements }, start))
    }

    fn parse_object_literal(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.expect_punct(Punctuator::LBrace)?;
        let mut properties = Vec::new();
        while !self.at_punct(Punctuator::RBrace) {
            properties.push(self.parse_object_literal_property()?);
            if !self.eat_punct(Punctuator::Comma)? {
                break;
            }
        }
        self.expect_punct(Punctuator::RBrace)?;
        Ok(self.make(NodeShape::ObjectExpression { properties }, start))
    }

    fn parse_object_literal_property(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        if self.eat_punct(Punctuator::DotDotDot)? {
            let argument = self.parse_assignment_expression()?;
            return Ok(self.make(NodeShape::SpreadElement { argument }, start));
        }
        let is_get = self.at_identifier_named("get") && !self.peek_starts_property_terminator();
        let is_set = self.at_identifier_named("set") && !self.peek_starts_property_terminator();
        if is_get || is_set {
            self.advance()?;
            let (key, computed) = self.parse_property_key()?;
            let value = self.parse_method_body(false, false)?;
            let kind = if is_get { crate::ast::PropertyKind::Get } else { crate::ast::PropertyKind::Set };
            return Ok(self.make(NodeShape::Property { key, value, computed, shorthand: false, kind }, start));
        }
        let is_async = self.at_identifier_named("async") && !self.peek_starts_property_terminator();
        if is_async {
            self.advance()?;
        }
        let is_generator = self.eat_punct(Punctuator::Star)?;
        let (key, computed) = self.parse_property_key()?;
        if self.at_punct(Punctuator::LParen) {
            let value = self.parse_method_body(is_generator, is_async)?;
            return Ok(self.make(
                NodeShape::Property { key, value, computed, shorthand: false, kind: crate::ast::PropertyKind::Init },
                start,
            ));
        }
        if self.eat_punct(Punctuator::Colon)? {
            let value = self.parse_assignment_expression()?;
            return Ok(self.make(
                NodeShape::Property { key, value, computed, shorthand: false, kind: crate::ast::PropertyKind::Init },
                start,
            ));
        }
        // Shorthand `{ x }` / `{ x = default }` (the latter only valid when
        // this object literal is later reinterpreted as a pattern).
        if self.eat_punct(Punctuator::Assign)? {
            let right = self.parse_assignment_expression()?;
            let value = self.make(NodeShape::AssignmentPattern { left: key, right }, start);
            return Ok(self.make(
                NodeShape::Property { key, value, computed: false, shorthand: true, kind: crate::ast::PropertyKind::Init },
                start,
            ));
        }
        Ok(self.make(
            NodeShape::Property { key, value: key, computed: false, shorthand: true, kind: crate::ast::PropertyKind::Init },
            start,
        ))
    }

    fn peek_starts_property_terminator(&self) -> bool {
        matches!(self.cur.as_punctuator(), Some(Punctuator::Colon | Punctuator::Comma | Punctuator::RBrace | Punctuator::LParen | Punctuator::Assign))
    }

    pub(super) fn parse_property_key(&mut self) -> ParseResult<(B::Handle, bool)> {
        let start = self.loc();
        if self.eat_punct(Punctuator::LBracket)? {
            let key = self.parse_assignment_expression()?;
            self.expect_punct(Punctuator::RBracket)?;
            return Ok((key, true));
        }
        let key = match self.cur.kind {
            TokenKind::StringLiteral => {
                let crate::scanner::TokenPayload::StringLit { value } = self.cur.payload else { unreachable!() };
                self.advance()?;
                self.make(NodeShape::StringLiteral { value }, start)
            }
            TokenKind::NumericLiteral => {
                let crate::scanner::TokenPayload::Numeric(p) = self.cur.payload else { unreachable!() };
                self.advance()?;
                self.make(NodeShape::NumericLiteral { value: p.value }, start)
            }
            _ => self.parse_identifier_name_as_property()?,
        };
        Ok((key, false))
    }

    /// A method body shared by object-literal methods/getters/setters
    /// (class methods build their own via `class.rs`, which has access to
    /// private-name and `super` bookkeeping this shared helper doesn't need).
    pub(super) fn parse_method_body(&mut self, is_generator: bool, is_async: bool) -> ParseResult<B::Handle> {
        let start = self.loc();
        let saved_context = self.context.clone();
        self.context = self.context.for_function_body(is_generator, is_async);
        self.scope.enter_function(None);
        self.scope.current().is_generator = is_generator;
        self.scope.current().is_async = is_async;
        let params = self.parse_formal_parameters()?;
        let body = self.parse_function_body_block()?;
        let child = self.scope.exit_function();
        self.scope.adopt_child(child);
        self.context = saved_context;
        Ok(self.make(NodeShape::FunctionExpression { id: None, params, body, is_generator, is_async }, start))
    }

    fn parse_template_literal(&mut self, is_tagged: bool) -> ParseResult<B::Handle> {
        let start = self.loc();
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        loop {
            let crate::scanner::TokenPayload::Template(t) = self.cur.payload else {
                return Err(Diagnostic::syntax("Expected template literal", self.loc()));
            };
            if t.deferred_error.is_some() && !is_tagged {
                let msg = self.interner.get(t.deferred_error.expect("checked Some above")).to_owned();
                return Err(Diagnostic::syntax(msg, self.loc()));
            }
            let el_start = self.loc();
            quasis.push(self.make(NodeShape::TemplateElement { cooked: t.cooked, raw: t.raw, tail: t.tail }, el_start));
            let tail = t.tail;
            self.advance()?;
            if tail {
                break;
            }
            expressions.push(self.parse_expression()?);
            if !self.at_punct(Punctuator::RBrace) {
                return Err(Diagnostic::syntax("Expected '}' in template literal", self.loc()));
            }
            let (kind, payload) = self.scanner.rescan_template_tail(&mut self.interner)?;
            let loc = self.loc();
            self.before_cur = self.scanner.checkpoint();
            self.cur = crate::scanner::Token {
                kind,
                range: (loc.index, loc.index),
                loc,
                has_line_terminator_before: false,
                payload,
            };
        }
        Ok(self.make(NodeShape::TemplateLiteral { quasis, expressions }, start))
    }
}

enum BinOrLogical {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

fn binary_op_of(p: Punctuator) -> Option<BinaryOp> {
    Some(match p {
        Punctuator::Plus => BinaryOp::Add,
        Punctuator::Minus => BinaryOp::Sub,
        Punctuator::Star => BinaryOp::Mul,
        Punctuator::Slash => BinaryOp::Div,
        Punctuator::Percent => BinaryOp::Mod,
        Punctuator::StarStar => BinaryOp::Pow,
        Punctuator::Eq => BinaryOp::Eq,
        Punctuator::NotEq => BinaryOp::NotEq,
        Punctuator::StrictEq => BinaryOp::StrictEq,
        Punctuator::StrictNotEq => BinaryOp::StrictNotEq,
        Punctuator::Lt => BinaryOp::Lt,
        Punctuator::LtEq => BinaryOp::LtEq,
        Punctuator::Gt => BinaryOp::Gt,
        Punctuator::GtEq => BinaryOp::GtEq,
        Punctuator::ShiftLeft => BinaryOp::ShiftLeft,
        Punctuator::ShiftRight => BinaryOp::ShiftRight,
        Punctuator::UnsignedShiftRight => BinaryOp::UnsignedShiftRight,
        Punctuator::BitOr => BinaryOp::BitOr,
        Punctuator::BitXor => BinaryOp::BitXor,
        Punctuator::BitAnd => BinaryOp::BitAnd,
        _ => return None,
    })
}

fn assignment_op_of(p: Punctuator) -> Option<AssignmentOp> {
    Some(match p {
        Punctuator::Assign => AssignmentOp::Assign,
        Punctuator::PlusAssign => AssignmentOp::Binary(BinaryOp::Add),
        Punctuator::MinusAssign => AssignmentOp::Binary(BinaryOp::Sub),
        Punctuator::StarAssign => AssignmentOp::Binary(BinaryOp::Mul),
        Punctuator::SlashAssign => AssignmentOp::Binary(BinaryOp::Div),
        Punctuator::PercentAssign => AssignmentOp::Binary(BinaryOp::Mod),
        Punctuator::StarStarAssign => AssignmentOp::Binary(BinaryOp::Pow),
        Punctuator::ShiftLeftAssign => AssignmentOp::Binary(BinaryOp::ShiftLeft),
        Punctuator::ShiftRightAssign => AssignmentOp::Binary(BinaryOp::ShiftRight),
        Punctuator::UnsignedShiftRightAssign => AssignmentOp::Binary(BinaryOp::UnsignedShiftRight),
        Punctuator::BitAndAssign => AssignmentOp::Binary(BinaryOp::BitAnd),
        Punctuator::BitOrAssign => AssignmentOp::Binary(BinaryOp::BitOr),
        Punctuator::BitXorAssign => AssignmentOp::Binary(BinaryOp::BitXor),
        Punctuator::AndAssign => AssignmentOp::Logical(LogicalOp::And),
        Punctuator::OrAssign => AssignmentOp::Logical(LogicalOp::Or),
        Punctuator::QuestionQuestionAssign => AssignmentOp::Logical(LogicalOp::NullishCoalescing),
        _ => return None,
    })
}
