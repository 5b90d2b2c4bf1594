//! Role resolution from group memberships.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Access role, ordered from lowest to highest privilege.
///
/// The derived ordering is the sole basis for access decisions.
///
/// # Examples
/// ```
/// use backend::domain::Role;
///
/// assert!(Role::SuperAdmin > Role::HrAdmin);
/// assert!(Role::HrAdmin > Role::Manager);
/// assert!(Role::Manager > Role::Employee);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum Role {
    /// Baseline member of staff.
    #[serde(rename = "employees")]
    Employee,
    /// Line manager; sees their own department only.
    #[serde(rename = "managers")]
    Manager,
    /// HR administrator; sees the whole organisation.
    #[serde(rename = "hr-admins")]
    HrAdmin,
    /// Unrestricted administrator.
    #[serde(rename = "super-admins")]
    SuperAdmin,
}

impl Role {
    /// Map a single group name to a role.
    ///
    /// Both singular and plural group names are accepted; surrounding
    /// whitespace is ignored and matching is otherwise exact.
    #[must_use]
    pub fn from_group(group: &str) -> Option<Self> {
        match group.trim() {
            "super-admin" | "super-admins" => Some(Self::SuperAdmin),
            "hr-admin" | "hr-admins" => Some(Self::HrAdmin),
            "manager" | "managers" => Some(Self::Manager),
            "employee" | "employees" => Some(Self::Employee),
            _ => None,
        }
    }

    /// Resolve the highest-privilege role present in `groups`.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Role;
    ///
    /// let groups = ["employees", "hr-admins", "unrelated"];
    /// assert_eq!(Role::resolve(groups), Some(Role::HrAdmin));
    /// assert_eq!(Role::resolve(["guests"]), None);
    /// ```
    pub fn resolve<I, S>(groups: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        groups
            .into_iter()
            .filter_map(|group| Self::from_group(group.as_ref()))
            .max()
    }

    /// Wire name reported to clients.
    #[must_use]
    pub const fn as_group(self) -> &'static str {
        match self {
            Self::Employee => "employees",
            Self::Manager => "managers",
            Self::HrAdmin => "hr-admins",
            Self::SuperAdmin => "super-admins",
        }
    }

    /// Whether the role may read aggregate insights at all.
    #[must_use]
    pub const fn can_view_insights(self) -> bool {
        !matches!(self, Self::Employee)
    }

    /// Whether the role sees the whole organisation rather than one
    /// department.
    #[must_use]
    pub const fn sees_organisation(self) -> bool {
        matches!(self, Self::HrAdmin | Self::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_group())
    }
}
