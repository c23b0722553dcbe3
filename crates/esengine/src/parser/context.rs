//! Per-production parsing context (spec §4.3.2): the independent boolean
//! flags that change how certain tokens parse depending on where the
//! parser currently sits in the grammar (inside a generator body, inside
//! a loop, inside a `with` statement, and so on).
//!
//! Grounded on the teacher's `parse.rs::ParserState`, which threads a
//! similar bundle of flags (`in_loop`, `in_function`, ...) through its
//! recursive-descent methods by value rather than via a context object on
//! the heap; we follow the same cheap-to-copy, stack-like discipline, using
//! `clippy::struct_excessive_bools` (already allowed crate-wide) since each
//! flag genuinely is independent rather than an enum-able state machine.

use ahash::AHashSet;

use crate::intern::StringId;

use super::ParserConfig;

/// The grammar goal a parse was started for (spec §4.1's module/script
/// split; only a module goal allows `import`/`export` declarations and
/// implies strict mode throughout).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Script,
    Module,
}

/// Flags that change token-level and statement-level parsing decisions.
/// Cloned (cheaply — all `Copy` except the label set) at each nested
/// function/loop/switch entry and restored on exit, the way the teacher's
/// parser threads its own state bundle through recursive calls.
#[derive(Debug, Clone)]
pub struct ParserContext {
    pub strict: bool,
    pub allow_yield: bool,
    pub allow_await: bool,
    pub in_arrow_function: bool,
    pub in_function_body: bool,
    pub in_iteration: bool,
    pub in_switch: bool,
    pub in_with: bool,
    pub in_catch_clause: bool,
    pub in_loop: bool,
    pub in_parameter_parsing: bool,
    pub allow_lexical_declaration: bool,
    pub allow_new_target: bool,
    pub allow_super_call: bool,
    pub allow_super_property: bool,
    pub allow_arguments: bool,
    pub allow_strict_directive: bool,
    pub label_set: AHashSet<StringId>,
    /// Names this catch clause's parameter pattern declared, checked
    /// against the catch body's own `var`/function declarations (spec's
    /// "catch parameter may not be re-declared by a `var` in the catch
    /// body when it is a simple identifier" restriction).
    pub catch_clause_simply_declared_names: AHashSet<StringId>,
}

impl Default for ParserContext {
    fn default() -> Self {
        Self {
            strict: false,
            allow_yield: false,
            allow_await: false,
            in_arrow_function: false,
            in_function_body: false,
            in_iteration: false,
            in_switch: false,
            in_with: false,
            in_catch_clause: false,
            in_loop: false,
            in_parameter_parsing: false,
            allow_lexical_declaration: true,
            allow_new_target: false,
            allow_super_call: false,
            allow_super_property: false,
            allow_arguments: false,
            allow_strict_directive: true,
            label_set: AHashSet::new(),
            catch_clause_simply_declared_names: AHashSet::new(),
        }
    }
}

impl ParserContext {
    #[must_use]
    pub fn for_source_type(source_type: SourceType) -> Self {
        let mut ctx = Self::default();
        if matches!(source_type, SourceType::Module) {
            ctx.strict = true;
            ctx.allow_await = true;
        }
        ctx
    }

    /// Builds the top-level context for a parse, folding in an embedder's
    /// `ParserConfig` flags (spec §6) on top of whatever `source_type`
    /// already implies.
    #[must_use]
    pub fn for_config(config: &ParserConfig) -> Self {
        let mut ctx = Self::for_source_type(config.source_type);
        ctx.strict |= config.strict_from_outside;
        ctx.in_with = config.in_with;
        ctx.allow_super_call = config.allow_super_call;
        ctx.allow_super_property = config.allow_super_property;
        ctx.allow_new_target = config.allow_new_target;
        ctx.allow_arguments = config.allow_arguments;
        ctx
    }

    /// The context a nested (non-arrow) function body parses under: fresh
    /// iteration/switch/label state, but `strict` is inherited since a
    /// directive prologue can only ever add strictness, never remove it.
    #[must_use]
    pub fn for_function_body(&self, is_generator: bool, is_async: bool) -> Self {
        Self {
            strict: self.strict,
            allow_yield: is_generator,
            allow_await: is_async,
            in_arrow_function: false,
            in_function_body: true,
            in_iteration: false,
            in_switch: false,
            in_with: false,
            in_catch_clause: false,
            in_loop: false,
            in_parameter_parsing: false,
            allow_lexical_declaration: true,
            allow_new_target: true,
            allow_super_call: self.allow_super_call,
            allow_super_property: self.allow_super_property,
            allow_arguments: true,
            allow_strict_directive: true,
            label_set: AHashSet::new(),
            catch_clause_simply_declared_names: AHashSet::new(),
        }
    }

    /// The context an arrow function body parses under: unlike a regular
    /// function, `yield`/`await`/`this`/`arguments`/`new.target` are all
    /// inherited from the enclosing scope (spec: arrow functions have no
    /// own binding for any of these).
    #[must_use]
    pub fn for_arrow_body(&self) -> Self {
        Self {
            in_arrow_function: true,
            in_function_body: true,
            in_iteration: false,
            in_switch: false,
            in_with: false,
            in_catch_clause: false,
            in_loop: false,
            in_parameter_parsing: false,
            allow_lexical_declaration: true,
            ..self.clone()
        }
    }
}
