//! Binding and assignment-target patterns (spec §4.3.1, §3.4).
//!
//! Two families of pattern live here. Binding patterns (function
//! parameters, `var`/`let`/`const` declarators, catch parameters,
//! `for`-`in`/`for`-`of` left-hand sides declared fresh) always know their
//! grammar up front, so they parse directly with no cover-grammar
//! reinterpretation. Assignment-target patterns (the left side of a
//! destructuring assignment) are reached only after the parser has
//! speculatively confirmed a `[`/`{` is followed by a bare `=`; see
//! `expr.rs`'s `try_parse_destructuring_assignment`.
//!
//! Binding declarations are recorded into the scope tree as each identifier
//! is consumed, not by walking the finished node afterward — `ASTBuilder`
//! handles are opaque to `SyntaxChecker`, so there is nothing to walk back
//! over once a pattern is built.

use crate::ast::{ASTBuilder, NodeShape, PropertyKind};
use crate::errors::{Diagnostic, ParseResult};
use crate::intern::StringId;
use crate::scanner::Punctuator;
use crate::scope::VarKind;
use crate::trace::ParseTracer;

use super::Parser;

/// How a name bound by a pattern should be recorded, chosen by the caller
/// based on which production is parsing the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DeclareKind {
    Param,
    Var,
    Let,
    Const,
    Using,
    AwaitUsing,
    /// A function declaration nested in a block (Annex B), which also
    /// hoists to the enclosing function scope under sloppy mode.
    FunctionDeclaration,
    /// A catch clause's simple-identifier parameter: lexically bound in the
    /// catch block, and tracked separately so the catch body's own `var`
    /// declarations can be checked against it (spec's catch/`var` clash
    /// rule for a simple catch parameter).
    CatchSimple,
    /// An assignment-target pattern's leaves reference existing bindings;
    /// nothing is declared.
    None,
}

/// The result of a parameter-list shape parse before any scope declaration
/// has happened (spec's cover-grammar arrow-head detection needs this: the
/// shape must be buildable and then discardable with zero scope sideffects
/// if the trailing `=>` doesn't show up).
pub(super) struct ParamListShape<H> {
    pub params: Vec<H>,
    pub bound_names: Vec<StringId>,
    pub is_simple: bool,
}

impl<Tr: ParseTracer, B: ASTBuilder> Parser<'_, Tr, B> {
    pub(super) fn declare_binding_name(&mut self, name: StringId, declare_as: DeclareKind) -> ParseResult<()> {
        match declare_as {
            DeclareKind::Param => self.scope.current().params.push(name),
            DeclareKind::Var => self.scope.current().declare_var(name),
            DeclareKind::FunctionDeclaration => {
                let block = self.scope.current_block();
                self.scope.current().declare_function_name(block, name);
            }
            DeclareKind::Let | DeclareKind::Const | DeclareKind::Using | DeclareKind::AwaitUsing => {
                let block = self.scope.current_block();
                let kind = match declare_as {
                    DeclareKind::Let => VarKind::Let,
                    DeclareKind::Const => VarKind::Const,
                    DeclareKind::Using => VarKind::Using,
                    _ => VarKind::Using,
                };
                if !self.scope.current().declare_lexical(block, name, kind) {
                    return Err(Diagnostic::syntax(
                        format!("Identifier '{}' has already been declared", self.interner.get(name)),
                        self.loc(),
                    ));
                }
            }
            DeclareKind::CatchSimple => {
                let block = self.scope.current_block();
                self.scope.current().declare_lexical(block, name, VarKind::Let);
                self.context.catch_clause_simply_declared_names.insert(name);
            }
            DeclareKind::None => {}
        }
        // `export <declaration>` wants the set of names a declaration binds
        // without ever walking its (possibly opaque) handle after the fact;
        // `module.rs` opens this collector before delegating to the normal
        // declaration parse and drains it once the declaration returns.
        if matches!(
            declare_as,
            DeclareKind::Var | DeclareKind::Let | DeclareKind::Const | DeclareKind::Using | DeclareKind::AwaitUsing | DeclareKind::FunctionDeclaration
        ) {
            if let Some(collector) = self.pending_export_names.as_mut() {
                collector.push(name);
            }
        }
        Ok(())
    }

    /// A full binding pattern (identifier, array pattern, or object
    /// pattern), declaring every bound name as it is reached.
    pub(super) fn parse_binding_pattern(&mut self, declare_as: DeclareKind) -> ParseResult<B::Handle> {
        let (handle, _names) = self.parse_binding_pattern_collecting(declare_as)?;
        Ok(handle)
    }

    /// Like `parse_binding_pattern`, but also returns every name bound by
    /// the pattern. Used by `for`-head parsing, which needs the declared
    /// names to seed the loop body block's using-names (spec §3.4).
    pub(super) fn parse_binding_pattern_collecting(&mut self, declare_as: DeclareKind) -> ParseResult<(B::Handle, Vec<StringId>)> {
        let mut names = Vec::new();
        let handle = self.parse_binding_target_shape(&mut names)?;
        for name in &names {
            self.declare_binding_name(*name, declare_as)?;
        }
        Ok((handle, names))
    }

    /// Parses one binding target without declaring it, collecting every
    /// bound name into `out` instead. Used directly by real parameter
    /// lists (declared immediately after) and, crucially, by the
    /// speculative arrow-head trial (declared only if the trial commits).
    fn parse_binding_target_shape(&mut self, out: &mut Vec<StringId>) -> ParseResult<B::Handle> {
        let start = self.loc();
        if self.at_punct(Punctuator::LBracket) {
            self.advance()?;
            let mut elements = Vec::new();
            while !self.at_punct(Punctuator::RBracket) {
                if self.eat_punct(Punctuator::Comma)? {
                    continue; // elision; spec's array patterns allow holes, not represented as a node here
                }
                let el_start = self.loc();
                if self.eat_punct(Punctuator::DotDotDot)? {
                    let argument = self.parse_binding_target_shape(out)?;
                    elements.push(self.make(NodeShape::RestElement { argument }, el_start));
                    break;
                }
                let target = self.parse_binding_target_shape(out)?;
                let element = if self.eat_punct(Punctuator::Assign)? {
                    let right = self.parse_assignment_expression()?;
                    self.make(NodeShape::AssignmentPattern { left: target, right }, el_start)
                } else {
                    target
                };
                elements.push(element);
                if !self.at_punct(Punctuator::RBracket) {
                    self.expect_punct(Punctuator::Comma)?;
                }
            }
            self.expect_punct(Punctuator::RBracket)?;
            return Ok(self.make(NodeShape::ArrayPattern { elements }, start));
        }
        if self.at_punct(Punctuator::LBrace) {
            self.advance()?;
            let mut properties = Vec::new();
            while !self.at_punct(Punctuator::RBrace) {
                let el_start = self.loc();
                if self.eat_punct(Punctuator::DotDotDot)? {
                    let name = self.expect_plain_identifier()?;
                    out.push(name);
                    let argument = self.make(NodeShape::Identifier { name }, el_start);
                    properties.push(self.make(NodeShape::RestElement { argument }, el_start));
                    break;
                }
                let (key, computed) = self.parse_property_key()?;
                let prop = if self.eat_punct(Punctuator::Colon)? {
                    let value = self.parse_binding_target_shape(out)?;
                    let value = if self.eat_punct(Punctuator::Assign)? {
                        let right = self.parse_assignment_expression()?;
                        self.make(NodeShape::AssignmentPattern { left: value, right }, el_start)
                    } else {
                        value
                    };
                    self.make(
                        NodeShape::Property { key, value, computed, shorthand: false, kind: PropertyKind::Init },
                        el_start,
                    )
                } else {
                    if let Some(name) = self.builder.identifier_name(key) {
                        out.push(name);
                    }
                    let value = if self.eat_punct(Punctuator::Assign)? {
                        let right = self.parse_assignment_expression()?;
                        self.make(NodeShape::AssignmentPattern { left: key, right }, el_start)
                    } else {
                        key
                    };
                    self.make(
                        NodeShape::Property { key, value, computed: false, shorthand: true, kind: PropertyKind::Init },
                        el_start,
                    )
                };
                properties.push(prop);
                if !self.eat_punct(Punctuator::Comma)? {
                    break;
                }
            }
            self.expect_punct(Punctuator::RBrace)?;
            return Ok(self.make(NodeShape::ObjectPattern { properties }, start));
        }
        let name = self.expect_plain_identifier()?;
        out.push(name);
        Ok(self.make(NodeShape::Identifier { name }, start))
    }

    fn expect_plain_identifier(&mut self) -> ParseResult<StringId> {
        let name = self.identifier_like_name().ok_or_else(|| Diagnostic::syntax("Expected binding identifier", self.loc()))?;
        self.advance()?;
        Ok(name)
    }

    /// Parses `(` ... `)`, the shared grammar for real formal-parameter
    /// lists and speculative arrow-function heads, declaring nothing.
    pub(super) fn parse_parameter_list_shape(&mut self) -> ParseResult<ParamListShape<B::Handle>> {
        self.expect_punct(Punctuator::LParen)?;
        let saved = self.context.in_parameter_parsing;
        self.context.in_parameter_parsing = true;
        let mut params = Vec::new();
        let mut bound_names = Vec::new();
        let mut is_simple = true;
        while !self.at_punct(Punctuator::RParen) {
            let start = self.loc();
            if self.eat_punct(Punctuator::DotDotDot)? {
                is_simple = false;
                let argument = self.parse_binding_target_shape(&mut bound_names)?;
                params.push(self.make(NodeShape::RestElement { argument }, start));
                break;
            }
            let target = self.parse_binding_target_shape(&mut bound_names)?;
            let param = if self.eat_punct(Punctuator::Assign)? {
                is_simple = false;
                let right = self.parse_assignment_expression()?;
                self.make(NodeShape::AssignmentPattern { left: target, right }, start)
            } else {
                target
            };
            params.push(param);
            if !self.eat_punct(Punctuator::Comma)? {
                break;
            }
        }
        self.context.in_parameter_parsing = saved;
        self.expect_punct(Punctuator::RParen)?;
        Ok(ParamListShape { params, bound_names, is_simple })
    }

    /// Real (non-speculative) formal-parameter list: parses the shape and
    /// immediately declares every bound name into the (already-entered)
    /// current function scope.
    pub(super) fn parse_formal_parameters(&mut self) -> ParseResult<Vec<B::Handle>> {
        let shape = self.parse_parameter_list_shape()?;
        for name in &shape.bound_names {
            self.scope.current().params.push(*name);
        }
        if !shape.is_simple {
            self.scope.current().has_simple_parameter_list = false;
        }
        Ok(shape.params)
    }

    /// Speculative destructuring-assignment target: array/object patterns
    /// whose leaves are arbitrary `LeftHandSideExpression`s (member
    /// expressions included), since assignment targets reference existing
    /// bindings rather than declaring new ones.
    pub(super) fn parse_assignment_target_pattern(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        if self.at_punct(Punctuator::LBracket) {
            self.advance()?;
            let mut elements = Vec::new();
            while !self.at_punct(Punctuator::RBracket) {
                if self.eat_punct(Punctuator::Comma)? {
                    continue;
                }
                let el_start = self.loc();
                if self.eat_punct(Punctuator::DotDotDot)? {
                    let argument = self.parse_assignment_target()?;
                    elements.push(self.make(NodeShape::RestElement { argument }, el_start));
                    break;
                }
                let target = self.parse_assignment_target()?;
                let element = if self.eat_punct(Punctuator::Assign)? {
                    let right = self.parse_assignment_expression()?;
                    self.make(NodeShape::AssignmentPattern { left: target, right }, el_start)
                } else {
                    target
                };
                elements.push(element);
                if !self.at_punct(Punctuator::RBracket) {
                    self.expect_punct(Punctuator::Comma)?;
                }
            }
            self.expect_punct(Punctuator::RBracket)?;
            return Ok(self.make(NodeShape::ArrayPattern { elements }, start));
        }
        if self.at_punct(Punctuator::LBrace) {
            self.advance()?;
            let mut properties = Vec::new();
            while !self.at_punct(Punctuator::RBrace) {
                let el_start = self.loc();
                if self.eat_punct(Punctuator::DotDotDot)? {
                    let argument = self.parse_assignment_target()?;
                    properties.push(self.make(NodeShape::RestElement { argument }, el_start));
                    break;
                }
                let (key, computed) = self.parse_property_key()?;
                let prop = if self.eat_punct(Punctuator::Colon)? {
                    let value = self.parse_assignment_target()?;
                    let value = if self.eat_punct(Punctuator::Assign)? {
                        let right = self.parse_assignment_expression()?;
                        self.make(NodeShape::AssignmentPattern { left: value, right }, el_start)
                    } else {
                        value
                    };
                    self.make(
                        NodeShape::Property { key, value, computed, shorthand: false, kind: PropertyKind::Init },
                        el_start,
                    )
                } else {
                    let value = if self.eat_punct(Punctuator::Assign)? {
                        let right = self.parse_assignment_expression()?;
                        self.make(NodeShape::AssignmentPattern { left: key, right }, el_start)
                    } else {
                        key
                    };
                    self.make(
                        NodeShape::Property { key, value, computed: false, shorthand: true, kind: PropertyKind::Init },
                        el_start,
                    )
                };
                properties.push(prop);
                if !self.eat_punct(Punctuator::Comma)? {
                    break;
                }
            }
            self.expect_punct(Punctuator::RBrace)?;
            return Ok(self.make(NodeShape::ObjectPattern { properties }, start));
        }
        self.parse_assignment_target()
    }

    fn parse_assignment_target(&mut self) -> ParseResult<B::Handle> {
        if matches!(self.cur.as_punctuator(), Some(Punctuator::LBracket | Punctuator::LBrace)) {
            return self.parse_assignment_target_pattern();
        }
        self.parse_left_hand_side_expression()
    }
}
