//! Class grammar: `ClassDeclaration`/`ClassExpression` and their bodies.
//!
//! Grounded on the teacher's method/def parsing, generalized to the
//! get/set/async/generator/static modifier combinations a class method can
//! carry. `NodeShape` has no static-initializer-block variant, so `static {
//! }` is reported as unsupported rather than inventing a shape for it.
//! Public (non-private) field declarations are likewise out of scope and
//! are reported the same way; private fields (`#p;`, spec §4.3.5) build a
//! `PropertyDefinition` with a `PrivateIdentifier` key, since private-name
//! resolution is mandatory regardless.

use crate::ast::{MethodKind, NodeShape};
use crate::errors::{Diagnostic, ParseResult};
use crate::scanner::{Keyword, Punctuator, TokenKind};

use super::pattern::DeclareKind;
use super::{ASTBuilder, ParseTracer, Parser};

impl<Tr: ParseTracer, B: ASTBuilder> Parser<'_, Tr, B> {
    pub(super) fn parse_class_declaration(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.expect_keyword(Keyword::Class)?;
        let name = self.expect_binding_identifier_text()?;
        let id = self.make(NodeShape::Identifier { name }, start);
        self.declare_binding_name(name, DeclareKind::Let)?;
        let (super_class, body) = self.parse_class_tail()?;
        Ok(self.make(NodeShape::ClassDeclaration { id, super_class, body }, start))
    }

    pub(super) fn parse_class_expression(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.expect_keyword(Keyword::Class)?;
        let id = if self.cur.kind == TokenKind::Identifier {
            let name = self.expect_binding_identifier_text()?;
            Some(self.make(NodeShape::Identifier { name }, start))
        } else {
            None
        };
        let (super_class, body) = self.parse_class_tail()?;
        Ok(self.make(NodeShape::ClassExpression { id, super_class, body }, start))
    }

    fn parse_class_tail(&mut self) -> ParseResult<(Option<B::Handle>, B::Handle)> {
        let super_class = if self.eat_keyword(Keyword::Extends)? { Some(self.parse_left_hand_side_expression()?) } else { None };
        let body_start = self.loc();
        self.expect_punct(Punctuator::LBrace)?;
        let saved_strict = self.context.strict;
        self.context.strict = true; // class bodies are always strict, per-clause or not
        let mut members = Vec::new();
        let mut seen_constructor = false;
        while !self.at_punct(Punctuator::RBrace) && !self.cur.is_eof() {
            if self.eat_punct(Punctuator::Semicolon)? {
                continue;
            }
            members.push(self.parse_class_member(&mut seen_constructor)?);
        }
        self.expect_punct(Punctuator::RBrace)?;
        self.context.strict = saved_strict;
        let body = self.make(NodeShape::ClassBody { body: members }, body_start);
        Ok((super_class, body))
    }

    fn parse_class_member(&mut self, seen_constructor: &mut bool) -> ParseResult<B::Handle> {
        let start = self.loc();

        let is_static = self.try_eat_modifier("static")?;
        if is_static && self.at_punct(Punctuator::LBrace) {
            return Err(Diagnostic::syntax("Static initialization blocks are not supported", start));
        }

        let is_async = self.try_eat_modifier("async")?;
        let is_generator = self.eat_punct(Punctuator::Star)?;
        let is_get = !is_async && !is_generator && self.try_eat_modifier("get")?;
        let is_set = !is_async && !is_generator && !is_get && self.try_eat_modifier("set")?;

        if self.eat_punct(Punctuator::Hash)? {
            let name = self.expect_binding_identifier_text()?;
            let key = self.make(NodeShape::PrivateIdentifier { name }, start);
            if self.at_punct(Punctuator::LParen) {
                return self.finish_method(start, key, false, is_static, is_async, is_generator, is_get, is_set, seen_constructor);
            }
            if is_async || is_generator || is_get || is_set {
                return Err(Diagnostic::syntax("Unexpected modifier on a private field declaration", start));
            }
            return self.finish_field(start, key, is_static);
        }

        let (key, computed) = self.parse_property_key()?;

        if !computed && is_static && self.builder.identifier_name(key).is_some_and(|n| self.interner.get(n) == "prototype") {
            return Err(Diagnostic::syntax("Classes may not have a static property named 'prototype'", start));
        }

        if !self.at_punct(Punctuator::LParen) {
            return Err(Diagnostic::syntax("Class field declarations are not supported", start));
        }

        self.finish_method(start, key, computed, is_static, is_async, is_generator, is_get, is_set, seen_constructor)
    }

    fn finish_field(&mut self, start: crate::span::ExtendedNodeLoc, key: B::Handle, is_static: bool) -> ParseResult<B::Handle> {
        let value = if self.eat_punct(Punctuator::Assign)? { Some(self.parse_assignment_expression()?) } else { None };
        self.expect_semicolon()?;
        Ok(self.make(NodeShape::PropertyDefinition { key, value, is_static, computed: false }, start))
    }

    #[allow(clippy::too_many_arguments)]
    fn finish_method(
        &mut self,
        start: crate::span::ExtendedNodeLoc,
        key: B::Handle,
        computed: bool,
        is_static: bool,
        is_async: bool,
        is_generator: bool,
        is_get: bool,
        is_set: bool,
        seen_constructor: &mut bool,
    ) -> ParseResult<B::Handle> {
        let named_constructor = !is_static
            && !computed
            && self.builder.identifier_name(key).is_some_and(|n| self.interner.get(n) == "constructor");

        if named_constructor && (is_async || is_generator || is_get || is_set) {
            return Err(Diagnostic::syntax("Class constructor may not be a generator, async method, or accessor", start));
        }

        let kind = if named_constructor {
            if *seen_constructor {
                return Err(Diagnostic::syntax("A class may only have one constructor", start));
            }
            *seen_constructor = true;
            MethodKind::Constructor
        } else if is_get {
            MethodKind::Get
        } else if is_set {
            MethodKind::Set
        } else {
            MethodKind::Method
        };

        let value = self.parse_method_body(is_generator, is_async)?;
        Ok(self.make(NodeShape::MethodDefinition { key, value, kind, is_static, computed }, start))
    }

    /// Consumes a contextual modifier keyword (`static`/`async`/`get`/`set`)
    /// only when the next token can't be read as the modifier word itself
    /// being the member's name (e.g. `static() {}`, a method named `static`).
    fn try_eat_modifier(&mut self, text: &str) -> ParseResult<bool> {
        if !self.at_identifier_named(text) {
            return Ok(false);
        }
        let cp = self.checkpoint();
        self.advance()?;
        if self.cur.has_line_terminator_before
            || matches!(
                self.cur.as_punctuator(),
                Some(Punctuator::LParen | Punctuator::Assign | Punctuator::Semicolon | Punctuator::RBrace)
            )
        {
            self.restore(cp);
            Ok(false)
        } else {
            Ok(true)
        }
    }
}
