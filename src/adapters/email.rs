// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email sender adapters.
//!
//! [`LocalOutbox`] writes each message as a JSON file into a directory, for
//! development machines without a mail service. [`CloudEmail`] hands messages
//! to a remote delivery service.

use crate::ports::email::{EmailAddress, EmailMessage, EmailSender};
use crate::ports::EmailClient;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Serialize)]
struct OutboxEntry<'a> {
    from: &'a EmailAddress,
    #[serde(flatten)]
    message: &'a EmailMessage,
}

/// Email sender that drops messages into a local directory.
///
/// Files are named `<unix millis>-<sequence>.json` so a directory listing
/// shows them in sending order.
#[derive(Debug)]
pub struct LocalOutbox {
    dir: PathBuf,
    from: EmailAddress,
    sequence: AtomicU64,
}

impl LocalOutbox {
    /// Creates an outbox writing into `dir`. The directory is created on the
    /// first send.
    pub fn new(dir: impl Into<PathBuf>, from: EmailAddress) -> Self {
        Self {
            dir: dir.into(),
            from,
            sequence: AtomicU64::new(0),
        }
    }

    /// Returns the outbox directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn try_send(&self, message: &EmailMessage) -> std::io::Result<PathBuf> {
        let entry = OutboxEntry {
            from: &self.from,
            message,
        };
        let body = serde_json::to_string_pretty(&entry)?;

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}-{:04}.json", millis, seq));
        fs::write(&path, body)?;
        Ok(path)
    }
}

impl EmailSender for LocalOutbox {
    fn name(&self) -> &str {
        "local"
    }

    fn sender(&self) -> &EmailAddress {
        &self.from
    }

    fn send(&self, message: &EmailMessage) -> bool {
        match self.try_send(message) {
            Ok(path) => {
                tracing::debug!("Queued email to {} at {}", message.to, path.display());
                true
            }
            Err(e) => {
                tracing::error!(
                    "Could not send email to {} via {}: {}",
                    message.to,
                    self.dir.display(),
                    e
                );
                false
            }
        }
    }
}

/// Email sender backed by a remote delivery service.
pub struct CloudEmail {
    client: Arc<dyn EmailClient>,
    from: EmailAddress,
}

impl CloudEmail {
    /// Creates a sender using `client`, sending from `from`.
    pub fn new(client: Arc<dyn EmailClient>, from: EmailAddress) -> Self {
        Self { client, from }
    }
}

impl std::fmt::Debug for CloudEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudEmail")
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

impl EmailSender for CloudEmail {
    fn name(&self) -> &str {
        "cloud"
    }

    fn sender(&self) -> &EmailAddress {
        &self.from
    }

    fn send(&self, message: &EmailMessage) -> bool {
        match self.client.send_email(&self.from, message) {
            Ok(id) => {
                tracing::info!("Email sent to {}, message id {}", message.to, id);
                true
            }
            Err(e) => {
                tracing::error!("Could not send email to {}: {}", message.to, e);
                false
            }
        }
    }
}
