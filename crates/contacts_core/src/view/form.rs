//! Add-contact form state and validation.

use crate::model::contact::{is_filled, Contact};

/// Inline error shown while either field is flagged invalid.
pub const FILL_ALL_FIELDS_MESSAGE: &str = "Fill in all fields!";

/// Two text buffers plus one validity flag per buffer.
///
/// Flags start valid so no error shows before the first submit. Only
/// `submit` changes them; editing a buffer leaves them untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    name: String,
    email: String,
    name_valid: bool,
    email_valid: bool,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            name_valid: true,
            email_valid: true,
        }
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_name_valid(&self) -> bool {
        self.name_valid
    }

    pub fn is_email_valid(&self) -> bool {
        self.email_valid
    }

    /// Returns the shared inline error while any field is flagged invalid.
    pub fn error_message(&self) -> Option<&'static str> {
        if self.name_valid && self.email_valid {
            None
        } else {
            Some(FILL_ALL_FIELDS_MESSAGE)
        }
    }

    /// Validates both buffers and, when both are filled, takes them.
    ///
    /// On success the buffers are cleared and the returned contact carries
    /// the typed values unchanged with an unassigned id. On failure the
    /// buffers are left as they were.
    pub fn submit(&mut self) -> Option<Contact> {
        self.name_valid = is_filled(&self.name);
        self.email_valid = is_filled(&self.email);

        if !(self.name_valid && self.email_valid) {
            return None;
        }

        let name = std::mem::take(&mut self.name);
        let email = std::mem::take(&mut self.email);
        Some(Contact::new(name, email))
    }

    /// Puts a taken contact's values back into the buffers.
    pub(crate) fn restore(&mut self, contact: Contact) {
        self.name = contact.name;
        self.email = contact.email;
    }
}
