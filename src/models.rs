//! Public data models returned by the client.

use crate::Error;
use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of logins produced by [`Mailbox::random`].
const RANDOM_LOGIN_LEN: usize = 10;

/// Summary of a message as returned by the mailbox listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageItem {
    /// Message identifier, used by [`Client::read_message`](crate::Client::read_message).
    pub id: i64,
    /// Sender address.
    pub from: String,
    /// Subject line.
    pub subject: String,
    /// Receive date as formatted by the service (`YYYY-MM-DD HH:MM:SS`).
    pub date: String,
}

/// Full message content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub from: String,
    pub subject: String,
    pub date: String,
    /// Attachment metadata, in the order the service lists them.
    pub attachments: Vec<Attachment>,
    /// Body as the service renders it (HTML when available, otherwise text).
    pub body: String,
    /// Plaintext part.
    pub text_body: String,
    /// HTML part.
    pub html_body: String,
}

/// Attachment metadata attached to a [`Message`].
///
/// Fetch the content with [`Client::download_attachment`](crate::Client::download_attachment).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Attachment {
    pub content_type: String,
    pub filename: String,
    /// Size in bytes.
    pub size: i64,
}

/// A mailbox address, `login@domain`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mailbox {
    pub login: String,
    pub domain: String,
}

impl Mailbox {
    pub fn new(login: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            domain: domain.into(),
        }
    }

    /// Build a mailbox with a random lowercase alphanumeric login on `domain`.
    ///
    /// 1secmail accepts mail for any login on its domains, so no network call is
    /// needed. Use [`Client::gen_random_mailbox`](crate::Client::gen_random_mailbox)
    /// to let the service pick instead.
    pub fn random(domain: impl Into<String>) -> Self {
        let login: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(RANDOM_LOGIN_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        Self::new(login, domain)
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.login, self.domain)
    }
}

impl FromStr for Mailbox {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('@') {
            Some((login, domain))
                if !login.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self::new(login, domain))
            }
            _ => Err(Error::InvalidMailbox(s.to_string())),
        }
    }
}
