//! Scope tree construction (spec §3.4, component inside C3).
//!
//! Grounded on the teacher's approach to building up scope information
//! alongside the AST walk (`parse.rs` builds a flat symbol table per
//! function while lowering ruff's tree); the shape here instead follows
//! spec §3.4 directly: a per-function `FunctionScopeContext` owning a tree
//! of `BlockScopeContext`s, built while the parser descends and collapsed
//! once a function body is fully parsed.

use ahash::AHashMap;

use crate::intern::StringId;

/// Index of a block scope within its owning function's block table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockIndex(pub u16);

/// How a binding was declared, which drives hoisting and TDZ behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// `var`/function-scoped, hoisted to the nearest function scope.
    Var,
    /// `let`, block-scoped, TDZ until its declaration executes.
    Let,
    /// `const`, block-scoped, TDZ, immutable after initialization.
    Const,
    /// A function declaration inside a block (Annex B), hoistable to the
    /// function scope under sloppy-mode Annex B semantics.
    FunctionDeclaration,
    /// A `using`/`await using` declaration (spec §3.4's "using names").
    Using,
}

/// A single binding recorded in a block or function scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub name: StringId,
    pub kind: VarKind,
}

/// One lexical block inside a function body.
#[derive(Debug, Clone, Default)]
pub struct BlockScopeContext {
    pub index: BlockIndex,
    pub parent: Option<BlockIndex>,
    /// `let`/`const`/`using` names declared directly in this block.
    pub lexical_names: Vec<Binding>,
    /// Function declarations directly in this block (Annex B candidates).
    pub function_names: Vec<StringId>,
    /// Names referenced (not declared) directly inside this block (spec
    /// §3.4's using-names, built via `insertUsingName`). Recording a
    /// reference does not affect `collapsible`: collapse is driven purely
    /// by declarations, and a collapsing block's using-names are folded
    /// into its surviving ancestor by `collapse_empty_blocks`.
    pub using_names: Vec<StringId>,
    /// Whether this block can be collapsed into its parent once parsing
    /// finishes — set to true at creation and cleared as soon as anything
    /// is recorded into it (spec §3.4: "empty blocks with no lexical or
    /// function declarations are removed").
    pub collapsible: bool,
}

impl BlockScopeContext {
    #[must_use]
    pub fn new(index: BlockIndex, parent: Option<BlockIndex>) -> Self {
        Self {
            index,
            parent,
            lexical_names: Vec::new(),
            function_names: Vec::new(),
            using_names: Vec::new(),
            collapsible: true,
        }
    }

    fn mark_non_collapsible(&mut self) {
        self.collapsible = false;
    }
}

/// One function scope, spanning its parameter list and body.
#[derive(Debug, Clone)]
pub struct FunctionScopeContext {
    pub name: Option<StringId>,
    pub params: Vec<StringId>,
    pub is_strict: bool,
    pub is_generator: bool,
    pub is_async: bool,
    pub is_arrow: bool,
    pub has_simple_parameter_list: bool,
    /// `var`-scoped names hoisted to this function, from every nested
    /// block.
    pub var_names: Vec<Binding>,
    pub blocks: Vec<BlockScopeContext>,
    pub children: Vec<FunctionScopeContext>,
}

impl FunctionScopeContext {
    #[must_use]
    pub fn new(name: Option<StringId>) -> Self {
        let root = BlockScopeContext::new(BlockIndex(0), None);
        Self {
            name,
            params: Vec::new(),
            is_strict: false,
            is_generator: false,
            is_async: false,
            is_arrow: false,
            has_simple_parameter_list: true,
            var_names: Vec::new(),
            blocks: vec![root],
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn root_block(&self) -> BlockIndex {
        BlockIndex(0)
    }

    pub fn push_block(&mut self, parent: BlockIndex) -> BlockIndex {
        let index = BlockIndex(u16::try_from(self.blocks.len()).expect("block index overflow"));
        self.blocks.push(BlockScopeContext::new(index, Some(parent)));
        index
    }

    /// Declares a name in `block`, returning an error if it collides with
    /// an existing lexical declaration in the same block (spec §8's
    /// redeclaration invariants; `SyntaxError`/`Identifier '%s' has already
    /// been declared` is raised by the caller using the returned bool).
    pub fn declare_lexical(&mut self, block: BlockIndex, name: StringId, kind: VarKind) -> bool {
        let b = &mut self.blocks[block.0 as usize];
        if b.lexical_names.iter().any(|d| d.name == name) {
            return false;
        }
        b.lexical_names.push(Binding { name, kind });
        b.mark_non_collapsible();
        true
    }

    pub fn declare_function_name(&mut self, block: BlockIndex, name: StringId) {
        let b = &mut self.blocks[block.0 as usize];
        b.function_names.push(name);
        b.mark_non_collapsible();
    }

    pub fn declare_var(&mut self, name: StringId) {
        if !self.var_names.iter().any(|d| d.name == name) {
            self.var_names.push(Binding { name, kind: VarKind::Var });
        }
    }

    /// Records that `name` was referenced inside `block` (spec §3.4's
    /// `insertUsingName`). Does not mark the block non-collapsible: a
    /// block made of only references and no declarations still collapses,
    /// with its using-names carried onto the surviving ancestor.
    pub fn record_using_name(&mut self, block: BlockIndex, name: StringId) {
        let b = &mut self.blocks[block.0 as usize];
        if !b.using_names.contains(&name) {
            b.using_names.push(name);
        }
    }

    /// Removes empty blocks with no declarations of their own, re-parenting
    /// their children onto the nearest surviving ancestor (spec §3.4 block
    /// collapse). Run once after a function body finishes parsing.
    pub fn collapse_empty_blocks(&mut self) {
        let mut redirect: AHashMap<BlockIndex, BlockIndex> = AHashMap::new();
        for i in 0..self.blocks.len() {
            let idx = BlockIndex(i as u16);
            if idx == self.root_block() {
                continue;
            }
            if self.blocks[i].collapsible {
                let mut target = self.blocks[i].parent.unwrap_or(self.root_block());
                while let Some(&redirected) = redirect.get(&target) {
                    target = redirected;
                }
                redirect.insert(idx, target);
            }
        }
        for (&idx, &target) in &redirect {
            let using_names = std::mem::take(&mut self.blocks[idx.0 as usize].using_names);
            for name in using_names {
                let t = &mut self.blocks[target.0 as usize];
                if !t.using_names.contains(&name) {
                    t.using_names.push(name);
                }
            }
        }
        for block in &mut self.blocks {
            if let Some(parent) = block.parent {
                let mut resolved = parent;
                while let Some(&redirected) = redirect.get(&resolved) {
                    resolved = redirected;
                }
                block.parent = Some(resolved);
            }
        }
        for child in &mut self.children {
            child.collapse_empty_blocks();
        }
    }
}

/// Top-level handle for a parse's full scope structure: the program/module
/// scope plus every nested function scope, keyed by function scope for
/// lookups from the bytecode builder.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    pub top_level: FunctionScopeContext,
}

impl ScopeTree {
    #[must_use]
    pub fn new(is_module: bool) -> Self {
        let mut top_level = FunctionScopeContext::new(None);
        top_level.is_strict = is_module;
        Self { top_level }
    }

    pub fn finish(&mut self) {
        self.top_level.collapse_empty_blocks();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> StringId {
        // Tests only care about distinctness, not interner round-tripping.
        crate::intern::StringId::from(n)
    }

    #[test]
    fn redeclaring_lexical_name_in_same_block_fails() {
        let mut f = FunctionScopeContext::new(None);
        let block = f.root_block();
        assert!(f.declare_lexical(block, id(1), VarKind::Let));
        assert!(!f.declare_lexical(block, id(1), VarKind::Const));
    }

    #[test]
    fn empty_child_blocks_collapse_into_parent() {
        let mut f = FunctionScopeContext::new(None);
        let root = f.root_block();
        let empty_child = f.push_block(root);
        let grandchild = f.push_block(empty_child);
        f.declare_lexical(grandchild, id(1), VarKind::Let);
        f.collapse_empty_blocks();
        assert_eq!(f.blocks[grandchild.0 as usize].parent, Some(root));
    }

    #[test]
    fn var_names_dedupe_across_declarations() {
        let mut f = FunctionScopeContext::new(None);
        f.declare_var(id(1));
        f.declare_var(id(1));
        assert_eq!(f.var_names.len(), 1);
    }
}
