//! Flattening a syntax tree into hash-linked node records.
//!
//! ```text
//! Program                         (not emitted)
//! ├── ImportDeclaration  A        parent: None   (root set)
//! │   └── StringLiteral  B        parent: A
//! └── VariableDeclaration C       parent: None   (root set)
//!     └── VariableDeclarator D    parent: C
//! ```
//!
//! Nodes are emitted in pre-order. A node's identity is
//! `hash(kind, text, start, end)`; within one file the first occurrence of a
//! hash wins.

use oxc_ast::{AstKind, ast::Program};
use oxc_ast_visit::Visit;
use oxc_span::GetSpan;
use rustc_hash::FxHashSet;

use crate::hash::{NodeHash, hash_node};
use crate::types::SourceNode;

/// Pre-order flattener over every AST node kind.
pub struct NodeWalker<'s> {
    source: &'s str,
    stack: Vec<NodeHash>,
    seen: FxHashSet<NodeHash>,
    root_hashes: FxHashSet<NodeHash>,
    nodes: Vec<SourceNode>,
}

impl<'s> NodeWalker<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            stack: Vec::new(),
            seen: FxHashSet::default(),
            root_hashes: FxHashSet::default(),
            nodes: Vec::new(),
        }
    }

    /// Flatten `program`, whose spans index into `source`.
    pub fn flatten(program: &Program<'_>, source: &'s str) -> Vec<SourceNode> {
        let mut walker = Self::new(source);
        walker.visit_program(program);
        walker.finish()
    }

    fn finish(self) -> Vec<SourceNode> {
        let Self {
            root_hashes,
            mut nodes,
            ..
        } = self;

        // Root membership is decided by hash, not by position
        for node in &mut nodes {
            if root_hashes.contains(&node.hash) {
                node.parent_hash = None;
            }
        }
        nodes
    }
}

impl<'a> Visit<'a> for NodeWalker<'_> {
    fn enter_node(&mut self, kind: AstKind<'a>) {
        if matches!(kind, AstKind::Program(_)) {
            return;
        }

        let span = kind.span();
        let text = span.source_text(self.source);
        let kind_name = format!("{:?}", kind.ty());
        let hash = hash_node(&kind_name, text, span.start, span.end);

        let parent_hash = self.stack.last().cloned();
        if parent_hash.is_none() {
            self.root_hashes.insert(hash.clone());
        }

        if self.seen.insert(hash.clone()) {
            self.nodes.push(SourceNode {
                hash: hash.clone(),
                start: span.start,
                end: span.end,
                text: text.to_string(),
                kind: kind_name,
                parent_hash,
            });
        }

        // Pushed even for repeats so children still link to a known hash
        self.stack.push(hash);
    }

    fn leave_node(&mut self, kind: AstKind<'a>) {
        if !matches!(kind, AstKind::Program(_)) {
            self.stack.pop();
        }
    }
}
