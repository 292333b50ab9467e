//! Sending selected files as email attachments

use std::fs;
use std::path::{Path, PathBuf};

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;

use crate::pipeline::Assembled;
use crate::report::display_name;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid email address '{address}': {detail}")]
    Address { address: String, detail: String },

    #[error("Could not build message: {0}")]
    Build(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// SMTP account used for outgoing mail
#[derive(Clone)]
pub struct MailSettings {
    pub server: String,
    pub port: u16,
    pub sender: String,
    pub password: String,
}

impl std::fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<AttachmentFile>,
}

impl Outgoing {
    pub fn with_files(from: &str, to: &str, attachments: Vec<AttachmentFile>) -> Self {
        let names: Vec<String> = attachments
            .iter()
            .map(|a| format!("'{}'", a.name))
            .collect();
        Self {
            from: from.to_string(),
            to: to.to_string(),
            subject: format!("Smart Assistant - {} file(s) attached", attachments.len()),
            body: format!("Attached file(s): [{}]", names.join(", ")),
            attachments,
        }
    }
}

pub trait Mailer {
    fn send(&self, message: &Outgoing) -> Result<(), MailError>;
}

/// STARTTLS relay with login credentials
pub struct SmtpMailer {
    settings: MailSettings,
}

impl SmtpMailer {
    pub fn new(settings: MailSettings) -> Self {
        Self { settings }
    }

    pub fn sender(&self) -> &str {
        &self.settings.sender
    }
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse::<Mailbox>().map_err(|e| MailError::Address {
        address: address.to_string(),
        detail: e.to_string(),
    })
}

impl Mailer for SmtpMailer {
    fn send(&self, outgoing: &Outgoing) -> Result<(), MailError> {
        let octet_stream = ContentType::parse("application/octet-stream")
            .map_err(|e| MailError::Build(e.to_string()))?;

        let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(outgoing.body.clone()));
        for file in &outgoing.attachments {
            multipart = multipart.singlepart(
                Attachment::new(file.name.clone()).body(file.bytes.clone(), octet_stream.clone()),
            );
        }

        let message = Message::builder()
            .from(mailbox(&outgoing.from)?)
            .to(mailbox(&outgoing.to)?)
            .subject(outgoing.subject.clone())
            .multipart(multipart)
            .map_err(|e| MailError::Build(e.to_string()))?;

        let transport = SmtpTransport::starttls_relay(&self.settings.server)
            .map_err(|e| MailError::Delivery(e.to_string()))?
            .port(self.settings.port)
            .credentials(Credentials::new(
                self.settings.sender.clone(),
                self.settings.password.clone(),
            ))
            .build();

        tracing::info!(
            server = %self.settings.server,
            port = self.settings.port,
            attachments = outgoing.attachments.len(),
            "sending email"
        );
        transport.send(&message).map_err(|err| {
            let auth_rejected = err
                .status()
                .map(|code| code.to_string().starts_with("53"))
                .unwrap_or(false);
            if auth_rejected {
                MailError::Authentication(err.to_string())
            } else {
                MailError::Delivery(err.to_string())
            }
        })?;
        Ok(())
    }
}

/// Attach every readable file in `files` to one message and send it.
///
/// Files that cannot be read are left out and reported as rejected. Nothing
/// is sent when none of them could be read.
pub fn send_files(
    mailer: &dyn Mailer,
    sender: &str,
    receiver: &str,
    files: &[PathBuf],
) -> Result<Assembled, MailError> {
    let mut assembled = Assembled::default();
    let mut attachments = Vec::new();

    for file in files {
        match read_attachment(file) {
            Ok(attachment) => {
                attachments.push(attachment);
                assembled.included.push(file.clone());
            }
            Err(err) => assembled.rejected.push((file.clone(), err.to_string())),
        }
    }
    if attachments.is_empty() {
        return Ok(assembled);
    }

    mailer.send(&Outgoing::with_files(sender, receiver, attachments))?;
    Ok(assembled)
}

fn read_attachment(path: &Path) -> std::io::Result<AttachmentFile> {
    Ok(AttachmentFile {
        name: display_name(path),
        bytes: fs::read(path)?,
    })
}
