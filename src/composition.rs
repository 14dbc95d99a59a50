//! Parent resolution for template composition.
//!
//! A template lists the templates it builds on under `parents`. Parents are
//! fully applied, in declared order, before the template's own files. The
//! [`AncestorStack`] holds the templates on the current call path and is what
//! stops a template from being expanded into its own ancestry.

use log::warn;
use std::path::Path;

use crate::applier::TemplateApplier;
use crate::error::Result;

/// Names of the templates currently being applied, outermost first.
///
/// One stack is created per top-level application and threaded through the
/// recursion by reference; a name is pushed when its application starts and
/// popped when it ends.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AncestorStack {
    names: Vec<String>,
}

impl AncestorStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str) {
        self.names.push(name.to_string());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.names.pop()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|active| active == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Applies each parent in order.
///
/// A parent that is already on the stack closes a cycle; it is reported and
/// not applied on this path. A parent that cannot be found is reported and
/// skipped as well. Anything fatal is propagated.
pub fn apply_parents(
    applier: &TemplateApplier<'_>,
    parents: &[String],
    dest_dir: &Path,
    stack: &mut AncestorStack,
) -> Result<()> {
    for parent in parents {
        if stack.contains(parent) {
            warn!(
                "Cycle detected: {} -> {}. Skipping '{}'.",
                stack.names().join(" -> "),
                parent,
                parent
            );
            continue;
        }
        match applier.apply(parent, dest_dir, stack) {
            Err(e) if !e.is_fatal() => warn!("{e}"),
            other => other?,
        }
    }
    Ok(())
}
