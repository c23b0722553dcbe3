//! Module grammar (spec §6): `import`/`export` declarations, populating
//! `self.module_record` alongside the AST the way the teacher's parser
//! builds up its own whole-file bookkeeping (symbol tables, in its case)
//! as a side effect of an ordinary recursive descent.
//!
//! `from`/`as` are contextual, not reserved words (no `Keyword::From`/`As`
//! variant exists, matching the scanner's treatment of `of` in `for`-`of`),
//! so they're matched by identifier text rather than token kind.

use crate::ast::NodeShape;
use crate::errors::{Diagnostic, ParseResult};
use crate::intern::StringId;
use crate::module_record::{ExportEntry, ImportEntry};
use crate::scanner::{Keyword, Punctuator, TokenKind};
use crate::span::ExtendedNodeLoc;

use super::pattern::DeclareKind;
use super::{ASTBuilder, ParseTracer, Parser};

impl<Tr: ParseTracer, B: ASTBuilder> Parser<'_, Tr, B> {
    pub(super) fn parse_import_declaration(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.expect_keyword(Keyword::Import)?;

        if self.cur.kind == TokenKind::StringLiteral {
            let source = self.expect_string_literal_text()?;
            self.expect_semicolon()?;
            return Ok(self.make(NodeShape::ImportDeclaration { specifiers: Vec::new(), source }, start));
        }

        let mut specifiers = Vec::new();
        let mut entries: Vec<(Option<StringId>, StringId, ExtendedNodeLoc)> = Vec::new();

        if self.cur.kind == TokenKind::Identifier {
            let spec_start = self.loc();
            let local = self.expect_binding_identifier_text()?;
            self.declare_binding_name(local, DeclareKind::Let)?;
            specifiers.push(self.make(NodeShape::ImportDefaultSpecifier { local }, spec_start));
            entries.push((None, local, spec_start));
            if !self.eat_punct(Punctuator::Comma)? {
                return self.finish_import(start, specifiers, entries);
            }
        }

        if self.eat_punct(Punctuator::Star)? {
            let spec_start = self.loc();
            self.expect_as()?;
            let local = self.expect_binding_identifier_text()?;
            self.declare_binding_name(local, DeclareKind::Let)?;
            specifiers.push(self.make(NodeShape::ImportNamespaceSpecifier { local }, spec_start));
            entries.push((None, local, spec_start));
        } else {
            self.expect_punct(Punctuator::LBrace)?;
            while !self.at_punct(Punctuator::RBrace) {
                let spec_start = self.loc();
                let imported = self.expect_identifier_name_text()?;
                let local = if self.eat_as()? { self.expect_binding_identifier_text()? } else { imported };
                self.declare_binding_name(local, DeclareKind::Let)?;
                specifiers.push(self.make(NodeShape::ImportSpecifier { imported, local }, spec_start));
                entries.push((Some(imported), local, spec_start));
                if !self.eat_punct(Punctuator::Comma)? {
                    break;
                }
            }
            self.expect_punct(Punctuator::RBrace)?;
        }

        self.finish_import(start, specifiers, entries)
    }

    fn finish_import(
        &mut self,
        start: ExtendedNodeLoc,
        specifiers: Vec<B::Handle>,
        entries: Vec<(Option<StringId>, StringId, ExtendedNodeLoc)>,
    ) -> ParseResult<B::Handle> {
        self.expect_from()?;
        let source = self.expect_string_literal_text()?;
        self.expect_semicolon()?;
        for (imported_name, local_name, at) in entries {
            self.module_record.add_import(ImportEntry { module_request: source, imported_name, local_name, at });
        }
        Ok(self.make(NodeShape::ImportDeclaration { specifiers, source }, start))
    }

    pub(super) fn parse_export_declaration(&mut self) -> ParseResult<B::Handle> {
        let start = self.loc();
        self.expect_keyword(Keyword::Export)?;

        if self.eat_keyword(Keyword::Default)? {
            return self.parse_export_default(start);
        }
        if self.eat_punct(Punctuator::Star)? {
            return self.parse_export_all(start);
        }
        if self.at_punct(Punctuator::LBrace) {
            return self.parse_export_named_list(start);
        }
        self.parse_export_declaration_clause(start)
    }

    fn parse_export_default(&mut self, start: ExtendedNodeLoc) -> ParseResult<B::Handle> {
        let declaration = match self.cur.as_keyword() {
            Some(Keyword::Function) => self.parse_function_declaration(false)?,
            Some(Keyword::Class) => self.parse_class_declaration()?,
            _ if self.at_identifier_named("async") => {
                let cp = self.checkpoint();
                self.advance()?;
                if self.at_keyword(Keyword::Function) && !self.cur.has_line_terminator_before {
                    self.parse_function_declaration(true)?
                } else {
                    self.restore(cp);
                    let expr = self.parse_assignment_expression()?;
                    self.expect_semicolon()?;
                    expr
                }
            }
            _ => {
                let expr = self.parse_assignment_expression()?;
                self.expect_semicolon()?;
                expr
            }
        };
        let default_name = self.interner.intern("default");
        self.module_record.add_local_export(ExportEntry {
            export_name: Some(default_name),
            module_request: None,
            import_name: None,
            local_name: None,
            at: start,
        });
        Ok(self.make(NodeShape::ExportDefaultDeclaration { declaration }, start))
    }

    fn parse_export_all(&mut self, start: ExtendedNodeLoc) -> ParseResult<B::Handle> {
        let exported = if self.eat_as()? { Some(self.expect_identifier_name_text()?) } else { None };
        self.expect_from()?;
        let source = self.expect_string_literal_text()?;
        self.expect_semicolon()?;
        self.module_record.add_star_export(ExportEntry {
            export_name: exported,
            module_request: Some(source),
            import_name: None,
            local_name: None,
            at: start,
        });
        Ok(self.make(NodeShape::ExportAllDeclaration { exported, source }, start))
    }

    fn parse_export_named_list(&mut self, start: ExtendedNodeLoc) -> ParseResult<B::Handle> {
        self.advance()?; // `{`
        let mut specifiers = Vec::new();
        let mut entries: Vec<(StringId, StringId, ExtendedNodeLoc)> = Vec::new();
        while !self.at_punct(Punctuator::RBrace) {
            let spec_start = self.loc();
            let local = self.expect_identifier_name_text()?;
            let exported = if self.eat_as()? { self.expect_identifier_name_text()? } else { local };
            specifiers.push(self.make(NodeShape::ExportSpecifier { local, exported }, spec_start));
            entries.push((local, exported, spec_start));
            if !self.eat_punct(Punctuator::Comma)? {
                break;
            }
        }
        self.expect_punct(Punctuator::RBrace)?;
        let source = if self.at_identifier_named("from") {
            self.advance()?;
            Some(self.expect_string_literal_text()?)
        } else {
            None
        };
        self.expect_semicolon()?;
        for (local_name, export_name, at) in entries {
            if let Some(source) = source {
                self.module_record.add_indirect_export(ExportEntry {
                    export_name: Some(export_name),
                    module_request: Some(source),
                    import_name: Some(local_name),
                    local_name: None,
                    at,
                });
            } else {
                self.module_record.add_local_export(ExportEntry {
                    export_name: Some(export_name),
                    module_request: None,
                    import_name: None,
                    local_name: Some(local_name),
                    at,
                });
            }
        }
        Ok(self.make(NodeShape::ExportNamedDeclaration { declaration: None, specifiers, source }, start))
    }

    /// `export` directly followed by a declaration (`function`/`class`/
    /// `var`/`let`/`const`): every name the declaration binds is exported
    /// under its own name.
    fn parse_export_declaration_clause(&mut self, start: ExtendedNodeLoc) -> ParseResult<B::Handle> {
        let decl_start = self.loc();
        let outer_collector = self.pending_export_names.replace(Vec::new());
        let declaration = self.parse_statement_list_item()?;
        let names = self.pending_export_names.take().unwrap_or_default();
        self.pending_export_names = outer_collector;
        for name in names {
            self.module_record.add_local_export(ExportEntry {
                export_name: Some(name),
                module_request: None,
                import_name: None,
                local_name: Some(name),
                at: decl_start,
            });
        }
        Ok(self.make(NodeShape::ExportNamedDeclaration { declaration: Some(declaration), specifiers: Vec::new(), source: None }, start))
    }

    fn expect_identifier_name_text(&mut self) -> ParseResult<StringId> {
        let name = match self.cur.kind {
            TokenKind::Identifier => self.cur.identifier_name().expect("identifier token carries a name"),
            TokenKind::Keyword => {
                let kw = self.cur.as_keyword().expect("keyword token carries a keyword");
                self.interner.intern(crate::scanner::keyword_text(kw))
            }
            _ => return Err(Diagnostic::syntax("Expected an identifier name", self.loc())),
        };
        self.advance()?;
        Ok(name)
    }

    fn expect_string_literal_text(&mut self) -> ParseResult<StringId> {
        if self.cur.kind != TokenKind::StringLiteral {
            return Err(Diagnostic::syntax("Expected a string literal module specifier", self.loc()));
        }
        let crate::scanner::TokenPayload::StringLit { value } = self.cur.payload else { unreachable!() };
        self.advance()?;
        Ok(value)
    }

    fn eat_as(&mut self) -> ParseResult<bool> {
        if self.at_identifier_named("as") {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_as(&mut self) -> ParseResult<()> {
        if self.eat_as()? {
            Ok(())
        } else {
            Err(Diagnostic::syntax("Expected 'as'", self.loc()))
        }
    }

    fn expect_from(&mut self) -> ParseResult<()> {
        if self.at_identifier_named("from") {
            self.advance()
        } else {
            Err(Diagnostic::syntax("Expected 'from'", self.loc()))
        }
    }
}
