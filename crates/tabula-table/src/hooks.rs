//! Post-write callbacks.
//!
//! A [`TableAccessor`](crate::TableAccessor) runs the matching hook after a
//! successful insert, update or delete (and after any reload the operation
//! performed). Hooks observe; they cannot veto or alter the write.

use std::fmt;

use tabula_core::Row;

/// What a hook sees after a write.
#[derive(Debug, Clone, Copy)]
pub struct HookEvent<'a> {
    pub table: &'a str,
    /// Key of the row written, when one is known.
    pub key: Option<i64>,
    /// The accessor's working row after the write.
    pub row: &'a Row,
}

/// The write that triggered a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Insert,
    Update,
    Delete,
}

pub type Hook = Box<dyn FnMut(&HookEvent<'_>) + Send>;

/// Optional callbacks, one per write kind. All absent by default.
#[derive(Default)]
pub struct Hooks {
    insert: Option<Hook>,
    update: Option<Hook>,
    delete: Option<Hook>,
}

impl Hooks {
    pub fn set(&mut self, kind: HookKind, hook: Hook) {
        *self.slot(kind) = Some(hook);
    }

    /// Remove and return the hook for `kind`.
    pub fn take(&mut self, kind: HookKind) -> Option<Hook> {
        self.slot(kind).take()
    }

    pub fn is_set(&self, kind: HookKind) -> bool {
        match kind {
            HookKind::Insert => self.insert.is_some(),
            HookKind::Update => self.update.is_some(),
            HookKind::Delete => self.delete.is_some(),
        }
    }

    pub(crate) fn run(&mut self, kind: HookKind, event: &HookEvent<'_>) {
        if let Some(hook) = self.slot(kind) {
            tracing::trace!(table = event.table, kind = ?kind, "Running hook");
            hook(event);
        }
    }

    fn slot(&mut self, kind: HookKind) -> &mut Option<Hook> {
        match kind {
            HookKind::Insert => &mut self.insert,
            HookKind::Update => &mut self.update,
            HookKind::Delete => &mut self.delete,
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("insert", &self.insert.is_some())
            .field("update", &self.update.is_some())
            .field("delete", &self.delete.is_some())
            .finish()
    }
}
