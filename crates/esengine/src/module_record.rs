//! Module records (spec §6): the import/export bookkeeping a module-goal
//! parse produces once parsing finishes, independent of linking/evaluation
//! (both out of scope, spec §1).
//!
//! No analog exists in the teacher, which parses a single Python module
//! with no import/export surface of its own; this is grounded directly on
//! spec §6's field list and named the way ECMA-262's abstract Source Text
//! Module Records are, translated into plain Rust structs.

use crate::intern::StringId;
use crate::span::ExtendedNodeLoc;

/// One `import` clause's binding of a local name to a name in another
/// module (or `None` for a namespace/default import, where the imported
/// name doesn't apply the same way).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    pub module_request: StringId,
    /// `None` for a namespace import (`import * as ns from "m"`); the local
    /// name binds the whole namespace object instead of a single export.
    pub imported_name: Option<StringId>,
    pub local_name: StringId,
    pub at: ExtendedNodeLoc,
}

/// One `export` clause's binding, covering local, indirect (`export ... from`),
/// and star-re-export forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub export_name: Option<StringId>,
    /// Set when this export re-exports a name from another module
    /// (`export { x } from "m"` / `export * from "m"`).
    pub module_request: Option<StringId>,
    pub import_name: Option<StringId>,
    pub local_name: Option<StringId>,
    pub at: ExtendedNodeLoc,
}

/// The accumulated import/export surface of a single module-goal parse.
/// Spec §6: "importEntries, localExportEntries, indirectExportEntries,
/// starExportEntries, requestedModules".
#[derive(Debug, Clone, Default)]
pub struct ModuleRecord {
    pub requested_modules: Vec<StringId>,
    pub import_entries: Vec<ImportEntry>,
    pub local_export_entries: Vec<ExportEntry>,
    pub indirect_export_entries: Vec<ExportEntry>,
    pub star_export_entries: Vec<ExportEntry>,
}

impl ModuleRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn request(&mut self, module: StringId) {
        if !self.requested_modules.contains(&module) {
            self.requested_modules.push(module);
        }
    }

    pub fn add_import(&mut self, entry: ImportEntry) {
        self.request(entry.module_request);
        self.import_entries.push(entry);
    }

    pub fn add_local_export(&mut self, entry: ExportEntry) {
        self.local_export_entries.push(entry);
    }

    pub fn add_indirect_export(&mut self, entry: ExportEntry) {
        if let Some(module) = entry.module_request {
            self.request(module);
        }
        self.indirect_export_entries.push(entry);
    }

    pub fn add_star_export(&mut self, entry: ExportEntry) {
        if let Some(module) = entry.module_request {
            self.request(module);
        }
        self.star_export_entries.push(entry);
    }

    /// Every name this module exports, for duplicate-export-name
    /// validation (spec §6 invariant: export names must be unique).
    pub fn exported_names(&self) -> impl Iterator<Item = StringId> + '_ {
        self.local_export_entries
            .iter()
            .chain(&self.indirect_export_entries)
            .filter_map(|e| e.export_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> StringId {
        StringId::from(n)
    }

    fn loc() -> ExtendedNodeLoc {
        ExtendedNodeLoc::new(1, 1, 0)
    }

    #[test]
    fn importing_from_a_module_requests_it_once() {
        let mut record = ModuleRecord::new();
        record.add_import(ImportEntry {
            module_request: id(1),
            imported_name: Some(id(2)),
            local_name: id(2),
            at: loc(),
        });
        record.add_import(ImportEntry {
            module_request: id(1),
            imported_name: Some(id(3)),
            local_name: id(3),
            at: loc(),
        });
        assert_eq!(record.requested_modules, vec![id(1)]);
        assert_eq!(record.import_entries.len(), 2);
    }

    #[test]
    fn star_export_requests_its_module() {
        let mut record = ModuleRecord::new();
        record.add_star_export(ExportEntry {
            export_name: None,
            module_request: Some(id(5)),
            import_name: None,
            local_name: None,
            at: loc(),
        });
        assert_eq!(record.requested_modules, vec![id(5)]);
    }

    #[test]
    fn exported_names_covers_local_and_indirect() {
        let mut record = ModuleRecord::new();
        record.add_local_export(ExportEntry {
            export_name: Some(id(1)),
            module_request: None,
            import_name: None,
            local_name: Some(id(1)),
            at: loc(),
        });
        record.add_indirect_export(ExportEntry {
            export_name: Some(id(2)),
            module_request: Some(id(9)),
            import_name: Some(id(2)),
            local_name: None,
            at: loc(),
        });
        let names: Vec<_> = record.exported_names().collect();
        assert_eq!(names, vec![id(1), id(2)]);
    }
}
