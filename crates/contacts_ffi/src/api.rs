//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the contacts screen as stable, use-case-level functions to Dart
//!   via FRB.
//! - Own the process-wide screen instance backed by the shared store.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Writes are fire-and-forget; callers poll `contacts_snapshot` to see
//!   their effect.

use contacts_core::db::resolve_db_path as resolve_configured_db_path;
use contacts_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Contact, ContactScreen, ContactStore, ScreenModel, SubmitOutcome,
};
use log::error;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::OnceLock;

static CONTACTS_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SCREEN: OnceCell<Mutex<ContactScreen>> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row of the contact list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    /// Store-assigned contact ID.
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Contact list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    /// Mirrored contacts in store order.
    pub items: Vec<ContactItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Form state envelope returned by form actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormResponse {
    /// Whether an upsert was dispatched by this call.
    pub ok: bool,
    /// Current name buffer (empty after a dispatched submit).
    pub name: String,
    /// Current email buffer (empty after a dispatched submit).
    pub email: String,
    pub name_valid: bool,
    pub email_valid: bool,
    /// Inline error text to show under the inputs, if any.
    pub error: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl FormResponse {
    fn from_model(ok: bool, model: ScreenModel, message: impl Into<String>) -> Self {
        Self {
            ok,
            name: model.name,
            email: model.email,
            name_valid: model.name_valid,
            email_valid: model.email_valid,
            error: model.error.map(str::to_string),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            name: String::new(),
            email: String::new(),
            name_valid: true,
            email_valid: true,
            error: None,
            message: message.into(),
        }
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the action was dispatched.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Returns the mirrored contact list of the screen.
///
/// # FFI contract
/// - Sync call; opens the store on first use.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_snapshot() -> ContactListResponse {
    match with_screen(|screen| screen.render()) {
        Ok(model) => {
            let items = model
                .rows
                .into_iter()
                .map(|row| ContactItem {
                    id: row.id,
                    name: row.name,
                    email: row.email,
                })
                .collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No contacts.".to_string()
            } else {
                format!("{} contact(s).", items.len())
            };
            ContactListResponse { items, message }
        }
        Err(err) => ContactListResponse {
            items: Vec::new(),
            message: format!("contacts_snapshot failed: {err}"),
        },
    }
}

/// Returns the current form state without changing it.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_form() -> FormResponse {
    match with_screen(|screen| screen.render()) {
        Ok(model) => FormResponse::from_model(false, model, "Form state."),
        Err(err) => FormResponse::failure(format!("contacts_form failed: {err}")),
    }
}

/// Fills the form with `name` and `email`, then submits it.
///
/// # FFI contract
/// - Sync call; the upsert itself runs in the background.
/// - `ok == false` with `error` set means validation failed.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_submit(name: String, email: String) -> FormResponse {
    let result = with_screen(|screen| {
        screen.set_name(name);
        screen.set_email(email);
        let outcome = screen.submit();
        (outcome, screen.render())
    });

    match result {
        Ok((SubmitOutcome::Dispatched, model)) => {
            FormResponse::from_model(true, model, "Contact submitted.")
        }
        Ok((SubmitOutcome::Rejected, model)) => {
            FormResponse::from_model(false, model, "Contact not submitted.")
        }
        Ok((SubmitOutcome::Unavailable, model)) => FormResponse::from_model(
            false,
            model,
            "Contact not submitted: background runtime unavailable.",
        ),
        Err(err) => FormResponse::failure(format!("contacts_submit failed: {err}")),
    }
}

/// Deletes the contact whose fields all equal the given values.
///
/// # FFI contract
/// - Sync call; the delete runs in the background.
/// - A row that no longer matches is left alone without error.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_delete(id: i64, name: String, email: String) -> ActionResponse {
    let contact = Contact::with_id(id, name, email);
    match with_screen(|screen| screen.delete(&contact)) {
        Ok(true) => ActionResponse {
            ok: true,
            message: "Delete dispatched.".to_string(),
        },
        Ok(false) => ActionResponse {
            ok: false,
            message: "contacts_delete failed: background runtime unavailable".to_string(),
        },
        Err(err) => ActionResponse {
            ok: false,
            message: format!("contacts_delete failed: {err}"),
        },
    }
}

fn resolve_db_path() -> PathBuf {
    CONTACTS_DB_PATH
        .get_or_init(|| resolve_configured_db_path(None))
        .clone()
}

fn with_screen<T>(f: impl FnOnce(&mut ContactScreen) -> T) -> Result<T, String> {
    let screen = SCREEN.get_or_try_init(|| {
        let store = ContactStore::shared(resolve_db_path()).map_err(|err| {
            error!("event=screen_init module=ffi status=error error_code=store_open_failed error={err}");
            format!("contacts store open failed: {err}")
        })?;
        let mut screen = ContactScreen::new(store);
        screen
            .activate()
            .map_err(|err| format!("contacts screen activation failed: {err}"))?;
        Ok::<_, String>(Mutex::new(screen))
    })?;

    Ok(f(&mut screen.lock()))
}
