//! Presentation layer for the contacts screen.
//!
//! # Responsibility
//! - Hold form input, validity flags and the mirrored contact list.
//! - Turn user actions into fire-and-forget store writes.
//! - Produce an immutable render model for the UI shell.
//!
//! # Invariants
//! - The mirror is only replaced by the subscription task, never edited.
//! - Writes are dispatched in the background; the view never waits on them.

pub mod form;
pub mod mirror;
pub mod screen;
