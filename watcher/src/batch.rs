use std::collections::BTreeSet;
use std::path::PathBuf;

/// A coalesced set of filesystem changes observed within one debounce
/// window (spec §4.12/§5). A path present in both sets means it was
/// removed and then recreated within the same window; callers should
/// treat it as `changed`, not `removed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    pub changed: BTreeSet<PathBuf>,
    pub removed: BTreeSet<PathBuf>,
}

impl ChangeBatch {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty()
    }

    pub(crate) fn mark_changed(&mut self, path: PathBuf) {
        self.removed.remove(&path);
        self.changed.insert(path);
    }

    pub(crate) fn mark_removed(&mut self, path: PathBuf) {
        self.changed.remove(&path);
        self.removed.insert(path);
    }
}
