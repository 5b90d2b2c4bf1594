//! Identity anonymisation and caller context.
//!
//! Raw emails never leave this module in persisted form: the store only sees
//! [`IdentityHandle`] values, the lowercase hex SHA-256 digest of the trimmed,
//! lowercased address. Free text passes through [`redact_pii`] before it is
//! written or exported.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::Role;

/// Marker substituted for every detected PII span.
pub const REDACTION_TOKEN: &str = "[REDACTED]";

/// Department recorded when the caller's claims carry none.
pub const DEFAULT_DEPARTMENT: &str = "unknown";

/// Maximum accepted email length in characters.
pub const EMAIL_MAX: usize = 254;

const HANDLE_HEX_LEN: usize = 64;

static EMAIL_SHAPE_RE: OnceLock<Regex> = OnceLock::new();
static EMBEDDED_EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn compile(slot: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    slot.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("identity regex {pattern} failed to compile: {error}"))
    })
}

fn email_shape_regex() -> &'static Regex {
    compile(&EMAIL_SHAPE_RE, r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
}

fn embedded_email_regex() -> &'static Regex {
    compile(
        &EMBEDDED_EMAIL_RE,
        r"\b[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}\b",
    )
}

fn phone_regex() -> &'static Regex {
    compile(
        &PHONE_RE,
        r"\b(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b",
    )
}

/// Replace email- and phone-shaped spans with [`REDACTION_TOKEN`].
///
/// Applying the function twice yields the same text as applying it once.
///
/// # Examples
/// ```
/// use backend::domain::redact_pii;
///
/// let redacted = redact_pii("call me at 555-123-4567 or x@y.com");
/// assert_eq!(redacted, "call me at [REDACTED] or [REDACTED]");
/// ```
#[must_use]
pub fn redact_pii(text: &str) -> String {
    let without_emails = embedded_email_regex().replace_all(text, REDACTION_TOKEN);
    phone_regex()
        .replace_all(&without_emails, REDACTION_TOKEN)
        .into_owned()
}

/// Hash an email into its pseudonymous handle.
///
/// # Examples
/// ```
/// use backend::domain::hash_identity;
///
/// assert_eq!(hash_identity(" A@B.com "), hash_identity("a@b.com"));
/// ```
#[must_use]
pub fn hash_identity(email: &str) -> IdentityHandle {
    let normalised = email.trim().to_lowercase();
    let digest = Sha256::digest(normalised.as_bytes());
    IdentityHandle(hex::encode(digest))
}

/// Errors raised when an identity value fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    /// The email was blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// The email exceeded [`EMAIL_MAX`].
    #[error("email must be at most {max} characters")]
    EmailTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The email did not look like `local@domain.tld`.
    #[error("email address is not well formed")]
    MalformedEmail,
    /// A stored handle was not a 64-character lowercase hex digest.
    #[error("identity handle must be 64 lowercase hex characters")]
    MalformedHandle,
}

/// Pseudonymous, non-reversible identity key derived from an email.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityHandle(String);

impl IdentityHandle {
    /// Borrow the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for IdentityHandle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for IdentityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for IdentityHandle {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let well_formed = value.len() == HANDLE_HEX_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        if !well_formed {
            return Err(IdentityValidationError::MalformedHandle);
        }
        Ok(Self(value))
    }
}

impl From<IdentityHandle> for String {
    fn from(value: IdentityHandle) -> Self {
        value.0
    }
}

/// Trimmed, shape-checked email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an email address.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::EmailAddress;
    ///
    /// let email = EmailAddress::parse("  Ada@Example.com ").expect("valid email");
    /// assert_eq!(email.as_str(), "Ada@Example.com");
    /// assert!(EmailAddress::parse("not-an-email").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, IdentityValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(IdentityValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_shape_regex().is_match(trimmed) {
            return Err(IdentityValidationError::MalformedEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the trimmed address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Pseudonymous handle for this address.
    #[must_use]
    pub fn handle(&self) -> IdentityHandle {
        hash_identity(&self.0)
    }

    /// Case-insensitive comparison used for the self-review check.
    #[must_use]
    pub fn same_mailbox(&self, other: &Self) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

/// Identity claims supplied by the upstream gateway for one request.
///
/// Claims are trusted as-is and never persisted. Blank values are treated as
/// absent.
///
/// # Examples
/// ```
/// use backend::domain::{CallerIdentity, Role};
///
/// let caller = CallerIdentity::new(
///     Some("Ada".into()),
///     Some("ada@example.com".into()),
///     None,
///     vec!["employees".into(), "managers".into()],
/// );
/// assert_eq!(caller.role(), Some(Role::Manager));
/// assert_eq!(caller.department(), "unknown");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallerIdentity {
    name: Option<String>,
    email: Option<String>,
    department: Option<String>,
    groups: Vec<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

impl CallerIdentity {
    /// Build a caller identity from raw claim values.
    #[must_use]
    pub fn new(
        name: Option<String>,
        email: Option<String>,
        department: Option<String>,
        groups: Vec<String>,
    ) -> Self {
        Self {
            name: non_blank(name),
            email: non_blank(email),
            department: non_blank(department),
            groups,
        }
    }

    /// Display name claim, if present.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Email claim, if present.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Department claim, or [`DEFAULT_DEPARTMENT`] when absent.
    #[must_use]
    pub fn department(&self) -> &str {
        self.department.as_deref().unwrap_or(DEFAULT_DEPARTMENT)
    }

    /// Raw group memberships.
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Highest-privilege role among the caller's groups.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        Role::resolve(&self.groups)
    }

    /// Fill missing name and email from another source.
    ///
    /// Used by the development identity fallback; claims always win.
    #[must_use]
    pub fn with_fallback(mut self, name: Option<String>, email: Option<String>) -> Self {
        if self.name.is_none() {
            self.name = non_blank(name);
        }
        if self.email.is_none() {
            self.email = non_blank(email);
        }
        self
    }
}
