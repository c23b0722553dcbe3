//! Statement grammar (spec §4.3.2, §4.3.5's ASI-sensitive productions).
//!
//! Grounded on the teacher's `parse_stmt.rs`: one method per production,
//! threading the same `ParserContext` bundle this crate's `context.rs`
//! carries (`in_iteration`/`in_switch`/labels) through nested statement
//! parses by value rather than a mutable "current statement kind" stack.

use crate::ast::{NodeShape, VariableKind};
use crate::errors::{Diagnostic, ParseResult};
use crate::intern::StringId;
use crate::scanner::{Keyword, Punctuator, TokenKind};
use crate::span::ExtendedNodeLoc;

use super::pattern::DeclareKind;
use super::{ASTBuilder, ParseTracer, Parser, SourceType};

impl<Tr: ParseTracer, B: ASTBuilder> Parser<'_, Tr, B> {
    /// `StatementListItem`: a declaration (function/class/lexical/import/
    /// export) or an ordinary statement.
    pub(super) fn parse_statement_list_item(&mut self) -> ParseResult<B::Handle> {
        match self.cur.as_keyword() {
            Some(Keyword::Function) => return self.parse_function_declaration(false),
            Some(Keyword::Class) => return self.parse_class_declaration(),
            Some(Keyword::Const) => return self.parse_variable_statement(VariableKind::Const),
            Some(Keyword::Let) => return self.parse_variable_statement(VariableKind::Let),
            Some(Keyword::Import) if matches!(self.source_type, SourceType::Module) => {
                return self.parse_import_declaration();
            }
            Some(Keyword::Export) if matches!(self.source_type, SourceType::Module) => {
                return self.parse_export_declaration();
            }
            _ => {}
        }
        if self.at_let_declaration() {
            return self.parse_variable_statement(VariableKind::Let);
        }
        if self.at_identifier_named("async") {
            let cp = self.checkpoint();
            self.advance()?;
            if self.at_keyword(Keyword::Function) && !self.cur.has_line_terminator_before {
                return self.parse_function_declaration(true);
            }
            self.restore(cp);
        }
        self.parse_statement()
    }

    fn at_let_declaration(&mut self) -> bool {
        if !self.at_identifier_named("let") {
            return false;
        }
        let cp = self.checkpoint();
        let is_decl = self.advance().is_ok()
            && (self.cur.kind == TokenKind::Identifier
                || matches!(self.cur.as_punctuator(), Some(Punctuator::LBracket | Punctuator::LBrace)));
        self.restore(cp);
        is_decl
    }

    pub(super) fn parse_statement(&mut self) -> ParseResult<B::Handle> {
        self.guard_recursion(Self::parse_statement_inner)
    }

    fn parse_statement_inner(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        if self.at_punct(Punctuator::LBrace) {
            return self.parse_block_statement();
        }
        if self.eat_punct(Punctuator::Semicolon)? {
            return Ok(self.make(NodeShape::EmptyStatement, start));
        }
        match self.cur.as_keyword() {
            Some(Keyword::Var) => return self.parse_variable_statement(VariableKind::Var),
            Some(Keyword::If) => return self.parse_if_statement(),
            Some(Keyword::For) => return self.parse_for_statement(),
            Some(Keyword::While) => return self.parse_while_statement(),
            Some(Keyword::Do) => return self.parse_do_while_statement(),
            Some(Keyword::Switch) => return self.parse_switch_statement(),
            Some(Keyword::Try) => return self.parse_try_statement(),
            Some(Keyword::Return) => return self.parse_return_statement(),
            Some(Keyword::Throw) => return self.parse_throw_statement(),
            Some(Keyword::Break) => return self.parse_break_statement(),
            Some(Keyword::Continue) => return self.parse_continue_statement(),
            Some(Keyword::Debugger) => {
                self.advance()?;
                self.expect_semicolon()?;
                // No dedicated debugger-statement shape; the hint has no
                // observable effect downstream so it collapses to a no-op.
                return Ok(self.make(NodeShape::EmptyStatement, start));
            }
            _ => {}
        }
        if self.cur.kind == TokenKind::Identifier {
            let cp = self.checkpoint();
            let name = self.cur.identifier_name().expect("checked above");
            self.advance()?;
            if self.eat_punct(Punctuator::Colon)? {
                let body = self.parse_statement()?;
                return Ok(self.make(NodeShape::LabeledStatement { label: name, body }, start));
            }
            self.restore(cp);
        }
        self.parse_expression_statement()
    }

    fn parse_block_statement(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.expect_punct(Punctuator::LBrace)?;
        let block_index = self.enter_block_scope();
        let mut body = Vec::new();
        while !self.at_punct(Punctuator::RBrace) && !self.cur.is_eof() {
            body.push(self.parse_statement_list_item()?);
        }
        self.expect_punct(Punctuator::RBrace)?;
        self.exit_block_scope();
        Ok(self.make(NodeShape::BlockStatement { body, block_index }, start))
    }

    fn parse_expression_statement(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        let expression = self.parse_expression()?;
        self.expect_semicolon()?;
        Ok(self.make(NodeShape::ExpressionStatement { expression }, start))
    }

    fn parse_if_statement(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.advance()?; // `if`
        self.expect_punct(Punctuator::LParen)?;
        let test = self.parse_expression()?;
        self.expect_punct(Punctuator::RParen)?;
        let consequent = self.parse_statement()?;
        let alternate = if self.eat_keyword(Keyword::Else)? { Some(self.parse_statement()?) } else { None };
        Ok(self.make(NodeShape::IfStatement { test, consequent, alternate }, start))
    }

    fn parse_while_statement(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.advance()?; // `while`
        self.expect_punct(Punctuator::LParen)?;
        let test = self.parse_expression()?;
        self.expect_punct(Punctuator::RParen)?;
        let body = self.parse_loop_body()?;
        Ok(self.make(NodeShape::WhileStatement { test, body }, start))
    }

    fn parse_do_while_statement(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.advance()?; // `do`
        let body = self.parse_loop_body()?;
        self.expect_keyword(Keyword::While)?;
        self.expect_punct(Punctuator::LParen)?;
        let test = self.parse_expression()?;
        self.expect_punct(Punctuator::RParen)?;
        // The trailing `;` is optional even without a preceding line
        // terminator (spec's do-while ASI special case).
        let _ = self.eat_punct(Punctuator::Semicolon)?;
        Ok(self.make(NodeShape::DoWhileStatement { body, test }, start))
    }

    fn parse_loop_body(&mut self) -> ParseResult<B::Handle> {
        let saved = self.context.in_iteration;
        self.context.in_iteration = true;
        let body = self.parse_statement();
        self.context.in_iteration = saved;
        body
    }

    fn parse_for_statement(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.advance()?; // `for`
        let is_await = self.context.allow_await && self.eat_keyword(Keyword::Await)?;
        self.expect_punct(Punctuator::LParen)?;

        if self.eat_punct(Punctuator::Semicolon)? {
            return self.finish_c_style_for(start, None);
        }

        let decl_kind = match self.cur.as_keyword() {
            Some(Keyword::Var) => Some(VariableKind::Var),
            Some(Keyword::Const) => Some(VariableKind::Const),
            Some(Keyword::Let) => Some(VariableKind::Let),
            _ if self.at_let_declaration() => Some(VariableKind::Let),
            _ => None,
        };

        if let Some(kind) = decl_kind {
            let decl_start = self.loc();
            self.advance()?; // var/let/const
            let declare_as = declare_kind_for(kind);
            // Suppress `in` as a binary operator while scanning the head so
            // `for (x in y)` isn't misread as `for (x_in_y ; ; )`.
            let saved = self.context.in_parameter_parsing;
            self.context.in_parameter_parsing = true;
            let (target, bound_names) = self.parse_binding_pattern_collecting(declare_as)?;
            let has_init = self.at_punct(Punctuator::Assign);
            let first_init = if has_init {
                self.advance()?;
                Some(self.parse_assignment_expression()?)
            } else {
                None
            };
            self.context.in_parameter_parsing = saved;

            if !has_init && self.at_keyword(Keyword::In) {
                self.advance()?;
                let right = self.parse_expression()?;
                self.expect_punct(Punctuator::RParen)?;
                self.pending_loop_using_names.extend(bound_names);
                let body = self.parse_loop_body()?;
                self.pending_loop_using_names.clear();
                let declarator = self.make(NodeShape::VariableDeclarator { id: target, init: None }, decl_start);
                let left = self.make(NodeShape::VariableDeclaration { kind, declarations: vec![declarator] }, decl_start);
                return Ok(self.make(NodeShape::ForInStatement { left, right, body }, start));
            }
            if !has_init && self.at_identifier_named("of") {
                self.advance()?;
                let right = self.parse_assignment_expression()?;
                self.expect_punct(Punctuator::RParen)?;
                self.pending_loop_using_names.extend(bound_names);
                let body = self.parse_loop_body()?;
                self.pending_loop_using_names.clear();
                let declarator = self.make(NodeShape::VariableDeclarator { id: target, init: None }, decl_start);
                let left = self.make(NodeShape::VariableDeclaration { kind, declarations: vec![declarator] }, decl_start);
                return Ok(self.make(NodeShape::ForOfStatement { left, right, body, is_await }, start));
            }

            let mut declarations = vec![self.make(NodeShape::VariableDeclarator { id: target, init: first_init }, decl_start)];
            while self.eat_punct(Punctuator::Comma)? {
                declarations.push(self.parse_variable_declarator_with_kind(kind)?);
            }
            let init = self.make(NodeShape::VariableDeclaration { kind, declarations }, decl_start);
            self.expect_punct(Punctuator::Semicolon)?;
            return self.finish_c_style_for(start, Some(init));
        }

        let saved = self.context.in_parameter_parsing;
        self.context.in_parameter_parsing = true;
        let head = if matches!(self.cur.as_punctuator(), Some(Punctuator::LBracket | Punctuator::LBrace)) {
            let cp = self.checkpoint();
            match self.parse_assignment_target_pattern() {
                Ok(pattern) if self.at_keyword(Keyword::In) || self.at_identifier_named("of") => pattern,
                _ => {
                    self.restore(cp);
                    self.parse_expression()?
                }
            }
        } else {
            self.parse_expression()?
        };
        self.context.in_parameter_parsing = saved;

        if self.at_keyword(Keyword::In) {
            self.advance()?;
            let right = self.parse_expression()?;
            self.expect_punct(Punctuator::RParen)?;
            let body = self.parse_loop_body()?;
            return Ok(self.make(NodeShape::ForInStatement { left: head, right, body }, start));
        }
        if self.at_identifier_named("of") {
            self.advance()?;
            let right = self.parse_assignment_expression()?;
            self.expect_punct(Punctuator::RParen)?;
            let body = self.parse_loop_body()?;
            return Ok(self.make(NodeShape::ForOfStatement { left: head, right, body, is_await }, start));
        }
        self.expect_punct(Punctuator::Semicolon)?;
        self.finish_c_style_for(start, Some(head))
    }

    fn finish_c_style_for(&mut self, start: ExtendedNodeLoc, init: Option<B::Handle>) -> ParseResult<B::Handle> {
        let test = if self.at_punct(Punctuator::Semicolon) { None } else { Some(self.parse_expression()?) };
        self.expect_punct(Punctuator::Semicolon)?;
        let update = if self.at_punct(Punctuator::RParen) { None } else { Some(self.parse_expression()?) };
        self.expect_punct(Punctuator::RParen)?;
        let body = self.parse_loop_body()?;
        Ok(self.make(NodeShape::ForStatement { init, test, update, body }, start))
    }

    fn parse_switch_statement(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.advance()?; // `switch`
        self.expect_punct(Punctuator::LParen)?;
        let discriminant = self.parse_expression()?;
        self.expect_punct(Punctuator::RParen)?;
        self.expect_punct(Punctuator::LBrace)?;
        self.enter_block_scope();
        let saved = self.context.in_switch;
        self.context.in_switch = true;
        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.at_punct(Punctuator::RBrace) {
            let case_start = self.loc();
            let test = if self.eat_keyword(Keyword::Case)? {
                let t = self.parse_expression()?;
                self.expect_punct(Punctuator::Colon)?;
                Some(t)
            } else {
                self.expect_keyword(Keyword::Default)?;
                if seen_default {
                    return Err(Diagnostic::syntax("More than one default clause in switch statement", case_start));
                }
                seen_default = true;
                self.expect_punct(Punctuator::Colon)?;
                None
            };
            let mut consequent = Vec::new();
            while !matches!(self.cur.as_keyword(), Some(Keyword::Case | Keyword::Default)) && !self.at_punct(Punctuator::RBrace) {
                consequent.push(self.parse_statement_list_item()?);
            }
            cases.push(self.make(NodeShape::SwitchCase { test, consequent }, case_start));
        }
        self.context.in_switch = saved;
        self.expect_punct(Punctuator::RBrace)?;
        self.exit_block_scope();
        Ok(self.make(NodeShape::SwitchStatement { discriminant, cases }, start))
    }

    fn parse_try_statement(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.advance()?; // `try`
        let block = self.parse_block_statement()?;
        let handler = if self.eat_keyword(Keyword::Catch)? {
            let catch_start = self.loc();
            let block_index = self.enter_block_scope();
            let param = if self.eat_punct(Punctuator::LParen)? {
                let declare_as = if self.cur.kind == TokenKind::Identifier { DeclareKind::CatchSimple } else { DeclareKind::Let };
                let p = self.parse_binding_pattern(declare_as)?;
                self.expect_punct(Punctuator::RParen)?;
                Some(p)
            } else {
                None
            };
            let saved = self.context.in_catch_clause;
            self.context.in_catch_clause = true;
            self.expect_punct(Punctuator::LBrace)?;
            let mut body = Vec::new();
            while !self.at_punct(Punctuator::RBrace) && !self.cur.is_eof() {
                body.push(self.parse_statement_list_item()?);
            }
            self.expect_punct(Punctuator::RBrace)?;
            self.context.in_catch_clause = saved;
            self.exit_block_scope();
            let body_node = self.make(NodeShape::BlockStatement { body, block_index }, catch_start);
            Some(self.make(NodeShape::CatchClause { param, body: body_node }, catch_start))
        } else {
            None
        };
        let finalizer = if self.eat_keyword(Keyword::Finally)? { Some(self.parse_block_statement()?) } else { None };
        if handler.is_none() && finalizer.is_none() {
            return Err(Diagnostic::syntax("Missing catch or finally after try", start));
        }
        Ok(self.make(NodeShape::TryStatement { block, handler, finalizer }, start))
    }

    fn parse_return_statement(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.advance()?; // `return`
        let argument = if self.cur.has_line_terminator_before
            || matches!(self.cur.as_punctuator(), Some(Punctuator::Semicolon | Punctuator::RBrace))
            || self.cur.is_eof()
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_semicolon()?;
        Ok(self.make(NodeShape::ReturnStatement { argument }, start))
    }

    fn parse_throw_statement(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.advance()?; // `throw`
        if self.cur.has_line_terminator_before {
            return Err(Diagnostic::syntax("Illegal newline after 'throw'", self.loc()));
        }
        let argument = self.parse_expression()?;
        self.expect_semicolon()?;
        Ok(self.make(NodeShape::ThrowStatement { argument }, start))
    }

    fn parse_break_statement(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.advance()?; // `break`
        let label = self.parse_optional_label()?;
        self.expect_semicolon()?;
        Ok(self.make(NodeShape::BreakStatement { label }, start))
    }

    fn parse_continue_statement(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.advance()?; // `continue`
        let label = self.parse_optional_label()?;
        self.expect_semicolon()?;
        Ok(self.make(NodeShape::ContinueStatement { label }, start))
    }

    fn parse_optional_label(&mut self) -> ParseResult<Option<StringId>> {
        if !self.cur.has_line_terminator_before && self.cur.kind == TokenKind::Identifier {
            let name = self.cur.identifier_name().expect("checked above");
            self.advance()?;
            Ok(Some(name))
        } else {
            Ok(None)
        }
    }

    fn parse_variable_statement(&mut self, kind: VariableKind) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.advance()?; // `var`/`const`, or the `let` identifier
        let mut declarations = vec![self.parse_variable_declarator_with_kind(kind)?];
        while self.eat_punct(Punctuator::Comma)? {
            declarations.push(self.parse_variable_declarator_with_kind(kind)?);
        }
        self.expect_semicolon()?;
        Ok(self.make(NodeShape::VariableDeclaration { kind, declarations }, start))
    }

    fn parse_variable_declarator_with_kind(&mut self, kind: VariableKind) -> ParseResult<B::Handle> {
        let start = self.loc();
        let id = self.parse_binding_pattern(declare_kind_for(kind))?;
        let init = if self.eat_punct(Punctuator::Assign)? { Some(self.parse_assignment_expression()?) } else { None };
        Ok(self.make(NodeShape::VariableDeclarator { id, init }, start))
    }

    pub(super) fn expect_binding_identifier_text(&mut self) -> ParseResult<StringId> {
        let name = self.identifier_like_name().ok_or_else(|| Diagnostic::syntax("Expected identifier", self.loc()))?;
        self.advance()?;
        Ok(name)
    }

    pub(super) fn parse_function_declaration(&mut self, is_async: bool) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.expect_keyword(Keyword::Function)?;
        let is_generator = self.eat_punct(Punctuator::Star)?;
        let name = self.expect_binding_identifier_text()?;
        let id = self.make(NodeShape::Identifier { name }, start);
        self.declare_binding_name(name, DeclareKind::FunctionDeclaration)?;
        self.enter_function_scope(Some(name));
        self.scope.current().is_generator = is_generator;
        self.scope.current().is_async = is_async;
        let saved_context = self.context.clone();
        self.context = self.context.for_function_body(is_generator, is_async);
        let params = self.parse_formal_parameters()?;
        let body = self.parse_function_body_block()?;
        self.context = saved_context;
        let child = self.exit_function_scope();
        self.scope.adopt_child(child);
        Ok(self.make(NodeShape::FunctionDeclaration { id, params, body, is_generator, is_async }, start))
    }

    pub(super) fn parse_function_expression(&mut self, is_async: bool) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.expect_keyword(Keyword::Function)?;
        let is_generator = self.eat_punct(Punctuator::Star)?;
        let name = if self.cur.kind == TokenKind::Identifier { Some(self.expect_binding_identifier_text()?) } else { None };
        self.enter_function_scope(name);
        self.scope.current().is_generator = is_generator;
        self.scope.current().is_async = is_async;
        let saved_context = self.context.clone();
        self.context = self.context.for_function_body(is_generator, is_async);
        let params = self.parse_formal_parameters()?;
        let body = self.parse_function_body_block()?;
        self.context = saved_context;
        let child = self.exit_function_scope();
        self.scope.adopt_child(child);
        let id = name.map(|n| self.make(NodeShape::Identifier { name: n }, start));
        Ok(self.make(NodeShape::FunctionExpression { id, params, body, is_generator, is_async }, start))
    }

    /// A `{` ... `}` function body, shared by declarations, expressions,
    /// methods, and non-expression-bodied arrow functions.
    pub(super) fn parse_function_body_block(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.expect_punct(Punctuator::LBrace)?;
        let block_index = self.enter_block_scope();
        let mut body = Vec::new();
        while !self.at_punct(Punctuator::RBrace) && !self.cur.is_eof() {
            body.push(self.parse_statement_list_item()?);
        }
        self.expect_punct(Punctuator::RBrace)?;
        self.exit_block_scope();
        Ok(self.make(NodeShape::BlockStatement { body, block_index }, start))
    }
}

fn declare_kind_for(kind: VariableKind) -> DeclareKind {
    match kind {
        VariableKind::Var => DeclareKind::Var,
        VariableKind::Let => DeclareKind::Let,
        VariableKind::Const => DeclareKind::Const,
        VariableKind::Using => DeclareKind::Using,
        VariableKind::AwaitUsing => DeclareKind::AwaitUsing,
    }
}
