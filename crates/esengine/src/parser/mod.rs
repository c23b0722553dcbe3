//! The recursive-descent parser (spec §4.3, component C3): generic over
//! an [`ASTBuilder`] so the same grammar methods serve both real AST
//! construction and allocation-free syntax checking.
//!
//! Grounded on the teacher's `parse.rs`: a single `Parser` struct holding
//! the token stream, scope-building state, and a context bundle, with
//! statement/expression grammar split across files the way the teacher
//! splits `parse_expr.rs`/`parse_stmt.rs` from its main `parse.rs`.

mod class;
mod context;
mod expr;
mod module;
mod pattern;
mod stmt;

pub use context::SourceType;

use crate::ast::{ASTBuilder, NodeArena, NodeBuilder, NodeId, NodeKind, NodeTag};
use crate::errors::{Diagnostic, ParseResult};
use crate::intern::{Interner, StringId};
use crate::module_record::ModuleRecord;
use crate::scanner::{Keyword, Punctuator, Scanner, Token, TokenKind};
use crate::scope::{BlockIndex, FunctionScopeContext, ScopeTree};
use crate::span::ExtendedNodeLoc;
use crate::trace::{NoopTracer, ParseTracer};

use context::ParserContext;

/// Configuration a parse is started with (spec §6: flags an embedder
/// supplies about the surrounding program, beyond the script/module goal).
#[derive(Debug, Clone, Copy)]
pub struct ParserConfig {
    pub source_type: SourceType,
    /// Treat the source as strict-mode even absent a `"use strict"`
    /// directive, e.g. when parsing text known to be spliced into an
    /// already-strict enclosing program.
    pub strict_from_outside: bool,
    /// The source will execute inside a `with` statement's environment.
    pub in_with: bool,
    /// `super(...)` is syntactically valid at the top level of this parse
    /// (e.g. parsing the body of a derived class constructor in isolation).
    pub allow_super_call: bool,
    /// `super.prop`/`super[expr]` is syntactically valid at the top level.
    pub allow_super_property: bool,
    /// `new.target` is syntactically valid at the top level.
    pub allow_new_target: bool,
    /// `arguments` is syntactically valid at the top level.
    pub allow_arguments: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            source_type: SourceType::Script,
            strict_from_outside: false,
            in_with: false,
            allow_super_call: false,
            allow_super_property: false,
            allow_new_target: false,
            allow_arguments: false,
        }
    }
}

/// Parser-visible flags surfaced to an embedder after parsing, independent
/// of the AST shape itself (spec §4.1: "whether the source used strict
/// mode throughout, whether any `await`/`yield` escaped to top level").
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserFlags {
    pub is_strict: bool,
    pub has_top_level_await: bool,
}

/// Everything a completed parse produces (spec §4.1's integration level):
/// the root node, the scope tree built alongside it, and — for a module
/// goal — its import/export surface.
pub struct ParseOutput<H> {
    pub root: H,
    pub scope_tree: ScopeTree,
    pub module_record: Option<ModuleRecord>,
    pub flags: ParserFlags,
}

/// Per-function scope-building state, one entry per function currently
/// being parsed (innermost last). `FunctionScopeContext` owns its
/// children directly, so finishing a nested function pops its context and
/// appends it onto the parent's `children`.
struct ScopeBuilder {
    stack: Vec<(FunctionScopeContext, Vec<BlockIndex>)>,
}

impl ScopeBuilder {
    fn new(is_module: bool) -> Self {
        let mut top = FunctionScopeContext::new(None);
        top.is_strict = is_module;
        let root = top.root_block();
        Self { stack: vec![(top, vec![root])] }
    }

    fn current(&mut self) -> &mut FunctionScopeContext {
        &mut self.stack.last_mut().expect("scope stack never empties mid-parse").0
    }

    fn current_block(&self) -> BlockIndex {
        *self
            .stack
            .last()
            .expect("scope stack never empties mid-parse")
            .1
            .last()
            .expect("function scope always has at least its root block active")
    }

    fn enter_block(&mut self) -> BlockIndex {
        let parent = self.current_block();
        let (scope, blocks) = self.stack.last_mut().expect("scope stack never empties mid-parse");
        let index = scope.push_block(parent);
        blocks.push(index);
        index
    }

    fn exit_block(&mut self) {
        self.stack.last_mut().expect("scope stack never empties mid-parse").1.pop();
    }

    fn enter_function(&mut self, name: Option<StringId>) {
        let scope = FunctionScopeContext::new(name);
        let root = scope.root_block();
        self.stack.push((scope, vec![root]));
    }

    fn exit_function(&mut self) -> FunctionScopeContext {
        self.stack.pop().expect("enter_function/exit_function are balanced").0
    }

    fn adopt_child(&mut self, child: FunctionScopeContext) {
        self.current().children.push(child);
    }

    fn finish(mut self) -> ScopeTree {
        let (mut top, _) = self.stack.pop().expect("top-level scope always present");
        top.collapse_empty_blocks();
        ScopeTree { top_level: top }
    }
}

/// A saved parser position for the speculative re-parses the grammar needs
/// (arrow-function-head detection, destructuring-assignment detection).
/// Scope-building state is deliberately NOT included: every speculative
/// trial in this parser is confined to parsing a parameter/pattern list,
/// which never declares scope bindings on its own, so no scope rollback is
/// ever required.
struct ParserCheckpoint {
    scanner: crate::scanner::ScannerCheckpoint,
    cur: Token,
}

pub struct Parser<'a, Tr: ParseTracer, B: ASTBuilder> {
    scanner: Scanner<'a>,
    interner: Interner,
    builder: B,
    tracer: Tr,
    cur: Token,
    /// Scanner position as it stood immediately before `cur` was scanned,
    /// so a `/`/`/=` token can be rewound and re-lexed as a regex literal
    /// once the parser knows from grammatical context that a regex was
    /// meant (spec §4.2.3's controlled rewind).
    before_cur: crate::scanner::ScannerCheckpoint,
    context: ParserContext,
    scope: ScopeBuilder,
    module_record: ModuleRecord,
    source_type: SourceType,
    has_top_level_await: bool,
    /// Monotonic id handed to each tagged-template call site, so an
    /// emitter can size a per-site cooked/raw array cache (spec §4.3.5).
    tagged_template_site_counter: u32,
    /// Open only while `module.rs` is parsing the declaration under an
    /// `export` keyword; collects the names that declaration binds as
    /// `declare_binding_name` records them, so the export entries can be
    /// built without re-inspecting the (possibly opaque) declaration handle.
    pending_export_names: Option<Vec<StringId>>,
    /// Names a `for`-head declaration just bound, waiting to be folded into
    /// the loop body's block as using-names (spec §3.4) as soon as that
    /// block is entered. Drained by the next `parse_block_statement`.
    pending_loop_using_names: Vec<StringId>,
    /// Current recursive-descent nesting depth, guarded by `enter_recursion`
    /// around expression/statement entry points (spec §4.3.6: a parse must
    /// raise a `RangeError` on pathologically deep nesting instead of
    /// overflowing the native stack).
    recursion_depth: u32,
}

/// Maximum recursive-descent nesting depth before a parse gives up with a
/// `RangeError` rather than risking a native stack overflow.
const MAX_RECURSION_DEPTH: u32 = 2000;

impl<'a, Tr: ParseTracer, B: ASTBuilder> Parser<'a, Tr, B> {
    pub fn new(source: &'a str, config: ParserConfig, builder: B, tracer: Tr) -> ParseResult<Self> {
        let source_type = config.source_type;
        let is_module = matches!(source_type, SourceType::Module);
        let mut scanner = Scanner::new(source, is_module);
        scanner.strict_mode |= config.strict_from_outside;
        let mut interner = Interner::new();
        let before_cur = scanner.checkpoint();
        let cur = scanner.next_token(&mut interner)?;
        Ok(Self {
            scanner,
            interner,
            builder,
            tracer,
            cur,
            before_cur,
            context: ParserContext::for_config(&config),
            scope: ScopeBuilder::new(is_module),
            module_record: ModuleRecord::new(),
            source_type,
            has_top_level_await: false,
            tagged_template_site_counter: 0,
            pending_export_names: None,
            pending_loop_using_names: Vec::new(),
            recursion_depth: 0,
        })
    }

    fn checkpoint(&self) -> ParserCheckpoint {
        ParserCheckpoint { scanner: self.scanner.checkpoint(), cur: self.cur }
    }

    fn restore(&mut self, cp: ParserCheckpoint) {
        self.scanner.restore(cp.scanner);
        self.cur = cp.cur;
    }

    fn loc(&self) -> ExtendedNodeLoc {
        self.cur.loc
    }

    fn advance(&mut self) -> ParseResult<()> {
        self.tracer.on_token(token_kind_name(self.cur.kind), self.cur.loc);
        self.before_cur = self.scanner.checkpoint();
        self.cur = self.scanner.next_token(&mut self.interner)?;
        Ok(())
    }

    fn make(&mut self, shape: crate::ast::NodeShape<B::Handle>, at: ExtendedNodeLoc) -> B::Handle {
        self.builder.make(shape, at)
    }

    /// Enters a new function scope and reports it to the tracer, the way
    /// the teacher's parser logs scope transitions alongside the grammar.
    pub(super) fn enter_function_scope(&mut self, name: Option<StringId>) {
        match name {
            Some(n) => {
                let text = self.interner.get(n).to_owned();
                self.tracer.on_enter_function_scope(Some(&text));
            }
            None => self.tracer.on_enter_function_scope(None),
        }
        self.scope.enter_function(name);
    }

    pub(super) fn exit_function_scope(&mut self) -> FunctionScopeContext {
        self.tracer.on_exit_function_scope();
        self.scope.exit_function()
    }

    pub(super) fn enter_block_scope(&mut self) -> BlockIndex {
        let index = self.scope.enter_block();
        self.tracer.on_enter_block(index.0);
        for name in self.pending_loop_using_names.drain(..) {
            self.scope.current().record_using_name(index, name);
        }
        index
    }

    pub(super) fn exit_block_scope(&mut self) {
        self.scope.exit_block();
    }

    /// Guards a recursive-descent entry point: increments the nesting
    /// counter, runs `f`, then decrements it regardless of outcome. Raises
    /// `Diagnostic::range` instead of recursing once `MAX_RECURSION_DEPTH`
    /// is reached (spec §4.3.6).
    pub(super) fn guard_recursion<F>(&mut self, f: F) -> ParseResult<B::Handle>
    where
        F: FnOnce(&mut Self) -> ParseResult<B::Handle>,
    {
        if self.recursion_depth >= MAX_RECURSION_DEPTH {
            return Err(Diagnostic::range("Maximum expression/statement nesting depth exceeded", self.loc()));
        }
        self.recursion_depth += 1;
        let result = f(self);
        self.recursion_depth -= 1;
        result
    }

    /// Records that `name` was referenced as an identifier inside the
    /// innermost active block (spec §3.4's using-names).
    pub(super) fn record_using_name(&mut self, name: StringId) {
        let block = self.scope.current_block();
        self.scope.current().record_using_name(block, name);
    }

    /// `yield` lexes as a keyword unconditionally, since the scanner has no
    /// notion of generator-body context; this is true exactly when the
    /// surrounding grammar isn't actually treating it as the `yield`
    /// operator, so it may be reinterpreted as a plain identifier (spec
    /// §4.3.4's one exception among the strict-mode-reserved words).
    pub(super) fn yield_reinterprets_as_identifier(&self) -> bool {
        matches!(self.cur.as_keyword(), Some(Keyword::Yield)) && !self.context.strict && !self.context.allow_yield
    }

    /// Like `Token::identifier_name`, but also accepts a reinterpretable
    /// `yield` keyword token, returning its text as an ordinary name.
    pub(super) fn identifier_like_name(&mut self) -> Option<StringId> {
        if let Some(name) = self.cur.identifier_name() {
            return Some(name);
        }
        if self.yield_reinterprets_as_identifier() {
            return Some(self.interner.intern(crate::scanner::keyword_text(Keyword::Yield)));
        }
        None
    }

    fn tag_of(kind: &NodeKind) -> NodeTag {
        std::mem::discriminant(kind)
    }

    fn at_punct(&self, p: Punctuator) -> bool {
        self.cur.as_punctuator() == Some(p)
    }

    fn at_keyword(&self, k: Keyword) -> bool {
        self.cur.as_keyword() == Some(k)
    }

    fn at_identifier_named(&self, text: &str) -> bool {
        self.cur.kind == TokenKind::Identifier && self.cur.identifier_name().is_some_and(|n| self.interner.get(n) == text)
    }

    fn eat_punct(&mut self, p: Punctuator) -> ParseResult<bool> {
        if self.at_punct(p) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_punct(&mut self, p: Punctuator) -> ParseResult<()> {
        if self.eat_punct(p)? {
            Ok(())
        } else {
            Err(Diagnostic::syntax(format!("Unexpected token, expected '{p:?}'"), self.loc()))
        }
    }

    fn eat_keyword(&mut self, k: Keyword) -> ParseResult<bool> {
        if self.at_keyword(k) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_keyword(&mut self, k: Keyword) -> ParseResult<()> {
        if self.at_keyword(k) {
            self.advance()
        } else {
            Err(Diagnostic::syntax(format!("Unexpected token, expected keyword {k:?}"), self.loc()))
        }
    }

    /// Automatic Semicolon Insertion (spec §4.3.5, §8 property 11): a
    /// semicolon is required unless the next token is `}`, EOF, or
    /// preceded by a line terminator.
    fn expect_semicolon(&mut self) -> ParseResult<()> {
        if self.eat_punct(Punctuator::Semicolon)? {
            return Ok(());
        }
        if self.cur.is_eof() || self.at_punct(Punctuator::RBrace) || self.cur.has_line_terminator_before {
            return Ok(());
        }
        Err(Diagnostic::syntax("Unexpected token; expected ';'", self.loc()))
    }

    /// Top-level entry point: parses a full program (spec §4.1). Hands back
    /// the interner alongside the output since every name in the result
    /// (identifiers, the scope tree's bindings, the module record) is a
    /// `StringId` into it.
    pub fn parse(mut self) -> ParseResult<(ParseOutput<B::Handle>, Interner)> {
        let start = self.loc();
        let is_module = matches!(self.source_type, SourceType::Module);
        let mut body = Vec::new();
        while !self.cur.is_eof() {
            body.push(self.parse_statement_list_item()?);
        }
        let root = self.make(crate::ast::NodeShape::Program { body, is_module }, start);
        let scope_tree = self.scope.finish();
        let module_record = is_module.then_some(self.module_record);
        let output = ParseOutput {
            root,
            scope_tree,
            module_record,
            flags: ParserFlags { is_strict: self.context.strict, has_top_level_await: self.has_top_level_await },
        };
        Ok((output, self.interner))
    }
}

fn token_kind_name(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Eof => "eof",
        TokenKind::Identifier => "identifier",
        TokenKind::BooleanLiteral => "boolean",
        TokenKind::Keyword => "keyword",
        TokenKind::NullLiteral => "null",
        TokenKind::NumericLiteral => "numeric",
        TokenKind::Punctuator => "punctuator",
        TokenKind::StringLiteral => "string",
        TokenKind::RegularExpression => "regexp",
        TokenKind::Template => "template",
        TokenKind::Invalid => "invalid",
    }
}

/// Convenience entry point for parsing directly into a real AST.
pub fn parse(source: &str, config: ParserConfig) -> ParseResult<(NodeArena, ParseOutput<NodeId>, Interner)> {
    let mut arena = NodeArena::new();
    // SAFETY-free two-step: build the parser borrowing `arena` mutably via
    // `NodeBuilder`, then hand the arena back out alongside the output.
    let (output, interner) = {
        let builder = NodeBuilder::new(&mut arena);
        let parser = Parser::new(source, config, builder, NoopTracer)?;
        parser.parse()?
    };
    Ok((arena, output, interner))
}
