//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `contacts_core` linkage.
//! - Open a contacts store and print its rows as JSON lines.
//!
//! Usage: `contacts_cli [db_path]`; without an argument the path comes from
//! `CONTACTS_DB_PATH`, falling back to the temp directory.

use contacts_core::db::resolve_db_path;
use contacts_core::ContactStore;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("contacts_core ping={}", contacts_core::ping());
    println!("contacts_core version={}", contacts_core::core_version());

    let path = resolve_db_path(std::env::args().nth(1).as_deref());
    let store = match ContactStore::open(&path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to open `{}`: {err}", path.display());
            return ExitCode::FAILURE;
        }
    };

    let snapshot = store.snapshot();
    println!("contacts_core store={} contacts={}", store.location(), snapshot.len());
    for contact in snapshot.iter() {
        match serde_json::to_string(contact) {
            Ok(line) => println!("{line}"),
            Err(err) => {
                eprintln!("failed to encode contact {}: {err}", contact.id);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
