//! In-memory mirror of the latest store snapshot.

use crate::model::contact::Contact;
use crate::store::Snapshot;
use arc_swap::ArcSwap;

/// Read-mostly copy of the contact list shown by the screen.
///
/// Replacement swaps the whole snapshot pointer, so a reader holding a
/// loaded snapshot keeps a consistent list while a newer one lands.
pub struct ContactMirror {
    rows: ArcSwap<Vec<Contact>>,
}

impl Default for ContactMirror {
    fn default() -> Self {
        Self {
            rows: ArcSwap::from_pointee(Vec::new()),
        }
    }
}

impl ContactMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the mirrored list with `snapshot`.
    pub fn replace(&self, snapshot: Snapshot) {
        self.rows.store(snapshot);
    }

    /// Returns the currently mirrored list.
    pub fn load(&self) -> Snapshot {
        self.rows.load_full()
    }

    pub fn len(&self) -> usize {
        self.rows.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.load().is_empty()
    }

    /// Returns a clone of the row at `index`, if it is still mirrored.
    pub fn row(&self, index: usize) -> Option<Contact> {
        self.rows.load().get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::ContactMirror;
    use crate::model::contact::Contact;
    use std::sync::Arc;

    #[test]
    fn replace_does_not_touch_loaded_snapshot() {
        let mirror = ContactMirror::new();
        mirror.replace(Arc::new(vec![Contact::with_id(1, "Ana", "a@x.com")]));
        let held = mirror.load();

        mirror.replace(Arc::new(Vec::new()));

        assert_eq!(held.len(), 1);
        assert!(mirror.is_empty());
        assert_eq!(mirror.row(0), None);
    }
}
