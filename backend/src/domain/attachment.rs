//! Avatar attachment primitives.
//!
//! Avatars live at a path derived purely from identity:
//! `<owner id>/<entity id>/avatar`. The uploaded file name never influences
//! the key, so replacing an avatar overwrites the previous object in place
//! and no orphaned files accumulate.

use std::fmt;

use uuid::Uuid;

use crate::domain::UserId;

const AVATAR_SEGMENT: &str = "avatar";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Validation errors for attachment values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachmentValidationError {
    /// The stored path does not follow `<owner>/<entity>/avatar`.
    #[error("avatar path must look like <owner>/<entity>/avatar, got {path}")]
    MalformedPath { path: String },
    /// The uploaded file had no content.
    #[error("avatar file must not be empty")]
    EmptyFile,
}

/// Storage key for an entity's avatar.
///
/// # Examples
/// ```
/// use pawsplay::domain::{AvatarPath, UserId};
/// use uuid::Uuid;
///
/// let owner = UserId::new("00000000-0000-0000-0000-0000000000a1").unwrap();
/// let pet = Uuid::parse_str("00000000-0000-0000-0000-0000000000b2").unwrap();
/// let path = AvatarPath::for_entity(&owner, &pet);
/// assert_eq!(
///     path.as_str(),
///     "00000000-0000-0000-0000-0000000000a1/00000000-0000-0000-0000-0000000000b2/avatar"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AvatarPath(String);

impl AvatarPath {
    /// Derive the deterministic path for `entity` owned by `owner`.
    pub fn for_entity(owner: &UserId, entity: &Uuid) -> Self {
        Self(format!("{owner}/{entity}/{AVATAR_SEGMENT}"))
    }

    /// Accept a previously stored path, checking its shape.
    pub fn parse(raw: impl Into<String>) -> Result<Self, AttachmentValidationError> {
        let raw = raw.into();
        let mut segments = raw.split('/');
        let well_formed = matches!(
            (segments.next(), segments.next(), segments.next(), segments.next()),
            (Some(owner), Some(entity), Some(AVATAR_SEGMENT), None)
                if !owner.is_empty() && !entity.is_empty()
        );
        if well_formed {
            Ok(Self(raw))
        } else {
            Err(AttachmentValidationError::MalformedPath { path: raw })
        }
    }

    /// Borrow the path text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AvatarPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AvatarPath> for String {
    fn from(value: AvatarPath) -> Self {
        value.0
    }
}

/// An avatar file received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    bytes: Vec<u8>,
    content_type: String,
    file_name: Option<String>,
}

impl AvatarUpload {
    /// Build an upload, rejecting empty content.
    ///
    /// A missing content type falls back to `application/octet-stream`.
    pub fn new(
        bytes: Vec<u8>,
        content_type: Option<String>,
        file_name: Option<String>,
    ) -> Result<Self, AttachmentValidationError> {
        if bytes.is_empty() {
            return Err(AttachmentValidationError::EmptyFile);
        }
        let content_type = content_type
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned());
        Ok(Self {
            bytes,
            content_type,
            file_name,
        })
    }

    /// Raw file content.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type reported by the client.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Original file name, kept for logging only.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; uploads are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
