//! Verb routing and outcome types shared by the pet and reservation
//! mutation pipelines.
//!
//! A request's method is resolved exactly once into a [`MutationVerb`]. The
//! inbound adapter then decodes the form into a typed [`Mutation`] and hands
//! it to a domain service, which reports a single [`MutationOutcome`] or a
//! domain [`Error`](crate::domain::Error).

use std::fmt;

use serde_json::json;
use uuid::Uuid;

use crate::domain::{AvatarPath, Error};

/// The three supported mutation strategies.
///
/// # Examples
/// ```
/// use pawsplay::domain::MutationVerb;
///
/// assert_eq!(MutationVerb::from_method("PUT").unwrap(), MutationVerb::Update);
/// assert!(MutationVerb::from_method("PATCH").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationVerb {
    /// `POST`: insert a new record.
    Create,
    /// `PUT`: replace the mutable fields of an existing record.
    Update,
    /// `DELETE`: remove a record by id.
    Delete,
}

/// Raised for any method other than `POST`, `PUT` or `DELETE`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("method {method} is not allowed")]
pub struct UnsupportedVerb {
    method: String,
}

impl UnsupportedVerb {
    /// The rejected method name.
    pub fn method(&self) -> &str {
        &self.method
    }
}

impl From<UnsupportedVerb> for Error {
    fn from(value: UnsupportedVerb) -> Self {
        Error::method_not_allowed(value.to_string()).with_details(json!({
            "method": value.method,
            "allowed": ["POST", "PUT", "DELETE"],
        }))
    }
}

impl MutationVerb {
    /// Resolve an HTTP method name. Matching is exact, as methods are
    /// case-sensitive.
    pub fn from_method(method: &str) -> Result<Self, UnsupportedVerb> {
        match method {
            "POST" => Ok(Self::Create),
            "PUT" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            other => Err(UnsupportedVerb {
                method: other.to_owned(),
            }),
        }
    }

    /// Whether this verb targets an existing record and so needs an `id`.
    pub fn requires_id(self) -> bool {
        matches!(self, Self::Update | Self::Delete)
    }
}

/// A decoded mutation request for some draft type.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<D> {
    /// Insert a new record built from the draft.
    Create(D),
    /// Replace the record `id` with the draft.
    Update {
        /// Target record.
        id: Uuid,
        /// Replacement values.
        draft: D,
    },
    /// Remove the record `id`.
    Delete {
        /// Target record.
        id: Uuid,
    },
}

impl<D> Mutation<D> {
    /// The verb this mutation was decoded from.
    pub fn verb(&self) -> MutationVerb {
        match self {
            Self::Create(_) => MutationVerb::Create,
            Self::Update { .. } => MutationVerb::Update,
            Self::Delete { .. } => MutationVerb::Delete,
        }
    }
}

/// Backend report for a delete-by-id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    /// A row owned by the caller was removed.
    Deleted,
    /// No owned row matched the id.
    Missing,
}

/// What a successful mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationAction {
    /// A record was inserted.
    Created,
    /// A record was replaced.
    Updated,
    /// A record was removed.
    Deleted,
}

impl MutationAction {
    /// Stable lowercase label used in response bodies and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal success for one mutation request.
///
/// Only produced once every step of the pipeline has completed, so an
/// outcome with `avatar_path` set means the record is fully provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    /// What happened.
    pub action: MutationAction,
    /// The affected record.
    pub id: Uuid,
    /// Linked avatar, when this request attached one.
    pub avatar_path: Option<AvatarPath>,
}

impl MutationOutcome {
    /// Outcome for a record without an attachment step.
    pub fn new(action: MutationAction, id: Uuid) -> Self {
        Self {
            action,
            id,
            avatar_path: None,
        }
    }

    /// Attach the linked avatar path.
    pub fn with_avatar(mut self, path: AvatarPath) -> Self {
        self.avatar_path = Some(path);
        self
    }
}

/// Step of the attachment saga that failed after the primary write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentStage {
    /// Writing the file to the blob store.
    Upload,
    /// Patching the record with the uploaded path.
    Link,
}

impl AttachmentStage {
    /// Stable label used in error details.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Link => "link",
        }
    }
}

/// Build the error reported when the record persisted but its avatar step
/// did not complete.
///
/// The details carry the record id so the client can retry through the
/// repair endpoint.
pub fn attachment_failure(
    action: MutationAction,
    record_id: Uuid,
    stage: AttachmentStage,
    reason: impl fmt::Display,
) -> Error {
    Error::attachment_failed(format!(
        "record {action} but avatar {} failed: {reason}",
        stage.as_str()
    ))
    .with_details(json!({
        "recordId": record_id,
        "action": action.as_str(),
        "stage": stage.as_str(),
        "provisioned": false,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("POST", MutationVerb::Create)]
    #[case("PUT", MutationVerb::Update)]
    #[case("DELETE", MutationVerb::Delete)]
    fn resolves_supported_methods(#[case] method: &str, #[case] expected: MutationVerb) {
        assert_eq!(MutationVerb::from_method(method), Ok(expected));
    }

    #[rstest]
    #[case("PATCH")]
    #[case("GET")]
    #[case("post")]
    #[case("OPTIONS")]
    fn rejects_other_methods(#[case] method: &str) {
        let err = MutationVerb::from_method(method).expect_err("unsupported");
        assert_eq!(err.method(), method);
        let error = Error::from(err);
        assert_eq!(error.code(), ErrorCode::MethodNotAllowed);
    }

    #[rstest]
    fn only_update_and_delete_need_an_id() {
        assert!(!MutationVerb::Create.requires_id());
        assert!(MutationVerb::Update.requires_id());
        assert!(MutationVerb::Delete.requires_id());
    }

    #[rstest]
    fn mutation_reports_its_verb() {
        let id = Uuid::new_v4();
        assert_eq!(Mutation::Create(()).verb(), MutationVerb::Create);
        assert_eq!(Mutation::Update { id, draft: () }.verb(), MutationVerb::Update);
        assert_eq!(Mutation::<()>::Delete { id }.verb(), MutationVerb::Delete);
    }

    #[rstest]
    fn attachment_failure_carries_record_and_stage() {
        let id = Uuid::new_v4();
        let error = attachment_failure(MutationAction::Created, id, AttachmentStage::Link, "boom");
        assert_eq!(error.code(), ErrorCode::AttachmentFailed);
        let details = error.details().expect("details present");
        assert_eq!(details["recordId"], serde_json::json!(id));
        assert_eq!(details["stage"], "link");
        assert_eq!(details["provisioned"], false);
    }
}
