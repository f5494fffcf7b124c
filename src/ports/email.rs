// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email capability trait definition.
//!
//! An [`EmailSender`] delivers messages from a fixed sender address. Like file
//! storage writes, sending reports success as a boolean and logs failures.

use serde::Serialize;
use std::fmt;

/// An email address with an optional display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmailAddress {
    /// The address itself, e.g. `noreply@example.com`
    pub email: String,
    /// Display name shown alongside the address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EmailAddress {
    /// Creates an address without a display name.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl fmt::Display for EmailAddress {
    /// Formats as `Name <email>`, or the bare address without a name.
    ///
    /// # Examples
    ///
    /// ```
    /// use plite::ports::EmailAddress;
    ///
    /// let from = EmailAddress::new("noreply@example.com").with_name("Demo");
    /// assert_eq!(from.to_string(), "Demo <noreply@example.com>");
    /// assert_eq!(EmailAddress::new("a@b.c").to_string(), "a@b.c");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.email),
            None => f.write_str(&self.email),
        }
    }
}

/// An outgoing message with an HTML body and a plain text alternative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    /// Recipient
    pub to: EmailAddress,
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html_body: String,
    /// Plain text alternative body
    pub text_body: String,
}

impl EmailMessage {
    /// Creates a message with empty bodies.
    pub fn new(to: EmailAddress, subject: impl Into<String>) -> Self {
        Self {
            to,
            subject: subject.into(),
            html_body: String::new(),
            text_body: String::new(),
        }
    }

    /// Sets the HTML body.
    pub fn with_html(mut self, body: impl Into<String>) -> Self {
        self.html_body = body.into();
        self
    }

    /// Sets the plain text body.
    pub fn with_text(mut self, body: impl Into<String>) -> Self {
        self.text_body = body.into();
        self
    }
}

/// A handle that sends email for one application.
pub trait EmailSender: Send + Sync {
    /// Short name of the backend, e.g. `local`.
    fn name(&self) -> &str;

    /// The address messages are sent from.
    fn sender(&self) -> &EmailAddress;

    /// Sends `message`, returning `false` (after logging) on failure.
    fn send(&self, message: &EmailMessage) -> bool;
}
