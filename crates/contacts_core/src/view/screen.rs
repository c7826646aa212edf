//! Contacts screen view-model.
//!
//! # Responsibility
//! - Own the add-contact form and the mirrored list for one screen.
//! - Keep the mirror in sync with the store while the screen is active.
//! - Dispatch upsert/delete as detached background tasks.
//!
//! # Invariants
//! - At most one subscription task runs per screen.
//! - Teardown cancels the subscription task but not in-flight writes.
//! - Deletes carry the mirrored field values of the row; rows leave the
//!   mirror only when the store publishes a snapshot without them.

use crate::model::contact::{Contact, ContactId};
use crate::store::{ContactStore, Snapshot};
use crate::view::form::ContactForm;
use crate::view::mirror::ContactMirror;
use crate::worker::{runtime_handle, spawn_detached};
use log::{debug, info};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Result of a submit action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Both fields were filled; an upsert was dispatched.
    Dispatched,
    /// At least one field was blank; nothing was dispatched.
    Rejected,
    /// No background runtime was available; the inputs were put back.
    Unavailable,
}

/// One rendered list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowModel {
    pub id: ContactId,
    pub name: String,
    pub email: String,
}

/// Everything a UI shell needs to draw the screen once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenModel {
    pub name: String,
    pub email: String,
    pub name_valid: bool,
    pub email_valid: bool,
    pub error: Option<&'static str>,
    pub rows: Vec<RowModel>,
}

/// View-model behind the add-and-list contacts screen.
pub struct ContactScreen {
    store: ContactStore,
    form: ContactForm,
    mirror: Arc<ContactMirror>,
    subscription: Option<JoinHandle<()>>,
}

impl ContactScreen {
    /// Creates an inactive screen over `store`.
    pub fn new(store: ContactStore) -> Self {
        Self {
            store,
            form: ContactForm::new(),
            mirror: Arc::new(ContactMirror::new()),
            subscription: None,
        }
    }

    /// Subscribes to the live contact list and starts mirroring it.
    ///
    /// Calling this on an active screen does nothing.
    ///
    /// # Errors
    /// - Returns an I/O error when no runtime is available for the
    ///   subscription task.
    pub fn activate(&mut self) -> std::io::Result<()> {
        if self.is_active() {
            return Ok(());
        }

        let handle = runtime_handle()?;
        let mut subscription = self.store.list_all();
        let mirror = Arc::clone(&self.mirror);
        self.subscription = Some(handle.spawn(async move {
            while let Some(snapshot) = subscription.next().await {
                debug!(
                    "event=mirror_replace module=view status=ok contacts={}",
                    snapshot.len()
                );
                mirror.replace(snapshot);
            }
            debug!("event=subscription_end module=view status=ok");
        }));
        info!("event=screen_activate module=view status=ok");
        Ok(())
    }

    /// Cancels the subscription task; the mirror keeps its last snapshot.
    pub fn deactivate(&mut self) {
        if let Some(task) = self.subscription.take() {
            task.abort();
            info!("event=screen_deactivate module=view status=ok");
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.form.set_name(value);
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.form.set_email(value);
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    /// Returns the mirrored contact list.
    pub fn rows(&self) -> Snapshot {
        self.mirror.load()
    }

    /// Validates the form and dispatches an upsert when it passes.
    ///
    /// Buffers are cleared right away, before the write completes. When the
    /// upsert cannot be spawned at all they are put back.
    pub fn submit(&mut self) -> SubmitOutcome {
        let Some(contact) = self.form.submit() else {
            debug!(
                "event=contact_submit module=view status=rejected name_valid={} email_valid={}",
                self.form.is_name_valid(),
                self.form.is_email_valid()
            );
            return SubmitOutcome::Rejected;
        };

        let store = self.store.clone();
        let task = contact.clone();
        let spawned = spawn_detached("contact_upsert", async move { store.upsert(task).await });
        self.finish_submit(contact, spawned.is_some())
    }

    fn finish_submit(&mut self, contact: Contact, spawned: bool) -> SubmitOutcome {
        if spawned {
            return SubmitOutcome::Dispatched;
        }
        self.form.restore(contact);
        SubmitOutcome::Unavailable
    }

    /// Dispatches a delete carrying `contact`'s current field values.
    ///
    /// Returns `false` when the delete could not be spawned.
    pub fn delete(&self, contact: &Contact) -> bool {
        let store = self.store.clone();
        let contact = contact.clone();
        spawn_detached("contact_delete", async move { store.delete(contact).await }).is_some()
    }

    /// Dispatches a delete for the mirrored row at `index`.
    ///
    /// Returns `false` when no such row is mirrored or the delete could not
    /// be spawned.
    pub fn delete_row(&self, index: usize) -> bool {
        self.mirror
            .row(index)
            .is_some_and(|contact| self.delete(&contact))
    }

    /// Builds the render model from the form and the current mirror.
    pub fn render(&self) -> ScreenModel {
        let rows = self
            .mirror
            .load()
            .iter()
            .map(|contact| RowModel {
                id: contact.id,
                name: contact.name.clone(),
                email: contact.email.clone(),
            })
            .collect();

        ScreenModel {
            name: self.form.name().to_string(),
            email: self.form.email().to_string(),
            name_valid: self.form.is_name_valid(),
            email_valid: self.form.is_email_valid(),
            error: self.form.error_message(),
            rows,
        }
    }
}

impl Drop for ContactScreen {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactScreen, SubmitOutcome};
    use crate::model::contact::Contact;
    use crate::store::ContactStore;

    #[test]
    fn unspawned_upsert_puts_inputs_back() {
        let mut screen = ContactScreen::new(ContactStore::open_in_memory().unwrap());
        let contact = Contact::new("Ana", "ana@x.com");

        let outcome = screen.finish_submit(contact, false);

        assert_eq!(outcome, SubmitOutcome::Unavailable);
        assert_eq!(screen.form().name(), "Ana");
        assert_eq!(screen.form().email(), "ana@x.com");
        assert_eq!(screen.form().error_message(), None);
    }

    #[test]
    fn spawned_upsert_is_dispatched() {
        let mut screen = ContactScreen::new(ContactStore::open_in_memory().unwrap());

        let outcome = screen.finish_submit(Contact::new("Ana", "ana@x.com"), true);

        assert_eq!(outcome, SubmitOutcome::Dispatched);
        assert_eq!(screen.form().name(), "");
    }
}
