//! Submission validation.
//!
//! Converts raw caller claims and body fields into a [`ValidatedSubmission`]
//! or a [`SubmissionError`] naming the offending field.

use serde_json::json;

use crate::domain::{CallerIdentity, EmailAddress, Error, IdentityValidationError};

/// Maximum accepted length for submitter and target names.
pub const NAME_MAX: usize = 100;

/// Maximum accepted message length.
pub const MESSAGE_MAX: usize = 2000;

/// Raw feedback submission as received from an inbound adapter.
#[derive(Debug, Clone, Default)]
pub struct FeedbackSubmission {
    /// Identity claims for the submitter.
    pub caller: CallerIdentity,
    /// Free-text message.
    pub message: Option<String>,
    /// Peer-review target display name.
    pub target_name: Option<String>,
    /// Peer-review target email.
    pub target_email: Option<String>,
}

/// Peer-review target after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTarget {
    /// Trimmed display name.
    pub name: String,
    /// Trimmed email.
    pub email: EmailAddress,
}

/// Submission that passed every validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    /// Trimmed submitter name.
    pub name: String,
    /// Trimmed submitter email.
    pub email: EmailAddress,
    /// Department scope.
    pub department: String,
    /// Trimmed message, not yet redacted.
    pub message: String,
    /// Present iff both target fields were supplied.
    pub target: Option<ValidatedTarget>,
}

/// Validation failures for a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// Name, email, or message missing.
    #[error("name, email, and message are required")]
    MissingRequired {
        /// First missing field.
        field: &'static str,
    },
    /// A name exceeded [`NAME_MAX`].
    #[error("{field} must be ≤ {max} characters")]
    NameTooLong {
        /// Offending field.
        field: &'static str,
        /// Maximum allowed length.
        max: usize,
    },
    /// The submitter email failed validation.
    #[error("Invalid submitter email")]
    InvalidSubmitterEmail(#[source] IdentityValidationError),
    /// The message exceeded [`MESSAGE_MAX`].
    #[error("message must be ≤ {max} characters")]
    MessageTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The target email failed validation.
    #[error("Invalid target email address")]
    InvalidTargetEmail(#[source] IdentityValidationError),
    /// The target email is the submitter's own address.
    #[error("You cannot submit a peer review about yourself")]
    SelfReview,
}

impl SubmissionError {
    fn field(&self) -> &'static str {
        match self {
            Self::MissingRequired { field } | Self::NameTooLong { field, .. } => *field,
            Self::InvalidSubmitterEmail(_) => "email",
            Self::MessageTooLong { .. } => "message",
            Self::InvalidTargetEmail(_) | Self::SelfReview => "targetEmail",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::MissingRequired { .. } => "required",
            Self::NameTooLong { .. } | Self::MessageTooLong { .. } => "too_long",
            Self::InvalidSubmitterEmail(_) | Self::InvalidTargetEmail(_) => "invalid_email",
            Self::SelfReview => "self_review",
        }
    }
}

impl From<SubmissionError> for Error {
    fn from(value: SubmissionError) -> Self {
        Error::invalid_request(value.to_string()).with_details(json!({
            "field": value.field(),
            "code": value.code(),
        }))
    }
}

fn trimmed(value: Option<&str>) -> &str {
    value.map_or("", str::trim)
}

fn within(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

impl FeedbackSubmission {
    /// Apply the submission rules in order, stopping at the first failure.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{CallerIdentity, FeedbackSubmission};
    ///
    /// let submission = FeedbackSubmission {
    ///     caller: CallerIdentity::new(
    ///         Some("Ada".into()),
    ///         Some("ada@example.com".into()),
    ///         None,
    ///         Vec::new(),
    ///     ),
    ///     message: Some("  Ship smaller PRs  ".into()),
    ///     target_name: None,
    ///     target_email: None,
    /// };
    /// let validated = submission.validate().expect("valid submission");
    /// assert_eq!(validated.message, "Ship smaller PRs");
    /// assert!(validated.target.is_none());
    /// ```
    pub fn validate(&self) -> Result<ValidatedSubmission, SubmissionError> {
        let name = trimmed(self.caller.name());
        let email = trimmed(self.caller.email());
        let message = trimmed(self.message.as_deref());

        for (field, value) in [("name", name), ("email", email), ("message", message)] {
            if value.is_empty() {
                return Err(SubmissionError::MissingRequired { field });
            }
        }
        if !within(name, NAME_MAX) {
            return Err(SubmissionError::NameTooLong {
                field: "name",
                max: NAME_MAX,
            });
        }
        let email = EmailAddress::parse(email).map_err(SubmissionError::InvalidSubmitterEmail)?;
        if !within(message, MESSAGE_MAX) {
            return Err(SubmissionError::MessageTooLong { max: MESSAGE_MAX });
        }

        let target = self.validate_target(&email)?;

        Ok(ValidatedSubmission {
            name: name.to_owned(),
            email,
            department: self.caller.department().to_owned(),
            message: message.to_owned(),
            target,
        })
    }

    fn validate_target(
        &self,
        submitter: &EmailAddress,
    ) -> Result<Option<ValidatedTarget>, SubmissionError> {
        let target_name = trimmed(self.target_name.as_deref());
        let target_email = trimmed(self.target_email.as_deref());
        if target_name.is_empty() || target_email.is_empty() {
            return Ok(None);
        }

        if !within(target_name, NAME_MAX) {
            return Err(SubmissionError::NameTooLong {
                field: "targetName",
                max: NAME_MAX,
            });
        }
        let email =
            EmailAddress::parse(target_email).map_err(SubmissionError::InvalidTargetEmail)?;
        if email.same_mailbox(submitter) {
            return Err(SubmissionError::SelfReview);
        }

        Ok(Some(ValidatedTarget {
            name: target_name.to_owned(),
            email,
        }))
    }
}
