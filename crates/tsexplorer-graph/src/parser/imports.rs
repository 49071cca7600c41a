//! Static import specifier extraction.

use oxc_ast::ast::{
    Argument, CallExpression, ExportAllDeclaration, ExportNamedDeclaration, Expression,
    ImportDeclaration, ImportExpression, Program, TSImportEqualsDeclaration, TSModuleReference,
};
use oxc_ast_visit::{Visit, walk};
use rustc_hash::FxHashSet;

/// Collects every statically declared module specifier in a program.
///
/// Covers `import`/`export ... from`, `import x = require()`, and
/// `import()`/`require()` calls whose argument is a string literal.
#[derive(Debug, Default)]
pub struct ImportCollector {
    seen: FxHashSet<String>,
    specifiers: Vec<String>,
}

impl ImportCollector {
    /// Collect specifiers in first-occurrence order, without duplicates.
    pub fn collect(program: &Program<'_>) -> Vec<String> {
        let mut collector = Self::default();
        collector.visit_program(program);
        collector.specifiers
    }

    fn push(&mut self, specifier: &str) {
        if self.seen.insert(specifier.to_string()) {
            self.specifiers.push(specifier.to_string());
        }
    }
}

impl<'a> Visit<'a> for ImportCollector {
    fn visit_import_declaration(&mut self, import: &ImportDeclaration<'a>) {
        self.push(import.source.value.as_str());
        walk::walk_import_declaration(self, import);
    }

    fn visit_export_named_declaration(&mut self, export: &ExportNamedDeclaration<'a>) {
        if let Some(source) = &export.source {
            self.push(source.value.as_str());
        }
        walk::walk_export_named_declaration(self, export);
    }

    fn visit_export_all_declaration(&mut self, export: &ExportAllDeclaration<'a>) {
        self.push(export.source.value.as_str());
        walk::walk_export_all_declaration(self, export);
    }

    fn visit_ts_import_equals_declaration(&mut self, decl: &TSImportEqualsDeclaration<'a>) {
        if let TSModuleReference::ExternalModuleReference(reference) = &decl.module_reference {
            self.push(reference.expression.value.as_str());
        }
        walk::walk_ts_import_equals_declaration(self, decl);
    }

    fn visit_import_expression(&mut self, expr: &ImportExpression<'a>) {
        if let Expression::StringLiteral(literal) = &expr.source {
            self.push(literal.value.as_str());
        }
        walk::walk_import_expression(self, expr);
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if let Expression::Identifier(ident) = &call.callee {
            if ident.name.as_str() == "require" && call.arguments.len() == 1 {
                if let Some(Argument::StringLiteral(literal)) = call.arguments.first() {
                    self.push(literal.value.as_str());
                }
            }
        }
        walk::walk_call_expression(self, call);
    }
}
