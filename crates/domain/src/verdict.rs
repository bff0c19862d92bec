use std::str::FromStr;

use ringmate_core::AppError;
use serde::{Deserialize, Serialize};

/// Why an evaluation denied.
///
/// Closed enum so callers and tests assert on the decision path, not on
/// free text. An oracle failure is not a deny reason: it propagates as an
/// error so callers can distinguish "denied" from "undecidable" and fail
/// closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// No subject was supplied.
    AuthenticationRequired,
    /// The subject's account is deactivated.
    InactiveSubject,
    /// The subject's role does not carry the permission.
    RoleDenied,
    /// The required resource relationship does not hold, or the
    /// permission needs a resource and none was given.
    ResourceScopeDenied,
    /// A domain override rejected an otherwise-allowed verdict.
    OverrideDenied,
    /// No resolution rule applies to the permission/resource pairing.
    NoApplicableGrant,
}

impl DenyReason {
    /// Returns a stable storage value for this reason.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationRequired => "authentication_required",
            Self::InactiveSubject => "inactive_subject",
            Self::RoleDenied => "role_denied",
            Self::ResourceScopeDenied => "resource_scope_denied",
            Self::OverrideDenied => "override_denied",
            Self::NoApplicableGrant => "no_applicable_grant",
        }
    }

    /// Returns a human-readable description of this reason.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::AuthenticationRequired => "authentication required",
            Self::InactiveSubject => "account inactive",
            Self::RoleDenied => "role lacks permission",
            Self::ResourceScopeDenied => "no qualifying relationship to the resource",
            Self::OverrideDenied => "denied by domain override",
            Self::NoApplicableGrant => "no applicable grant",
        }
    }
}

impl FromStr for DenyReason {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "authentication_required" => Ok(Self::AuthenticationRequired),
            "inactive_subject" => Ok(Self::InactiveSubject),
            "role_denied" => Ok(Self::RoleDenied),
            "resource_scope_denied" => Ok(Self::ResourceScopeDenied),
            "override_denied" => Ok(Self::OverrideDenied),
            "no_applicable_grant" => Ok(Self::NoApplicableGrant),
            _ => Err(AppError::Validation(format!(
                "unknown deny reason value '{value}'"
            ))),
        }
    }
}

/// Outcome of one authorization evaluation.
///
/// Verdicts are pure functions of the subject, permission, resource and
/// the relationship facts current at evaluation time; they are never
/// mutated, only recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The operation is allowed.
    Allow,
    /// The operation is denied for the given reason.
    Deny(DenyReason),
}

impl Verdict {
    /// Returns whether the verdict allows the operation.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns the deny reason, if the verdict is a denial.
    #[must_use]
    pub fn reason(&self) -> Option<DenyReason> {
        match self {
            Self::Allow => None,
            Self::Deny(reason) => Some(*reason),
        }
    }
}
