//! Port for the blob store holding avatar images.

use async_trait::async_trait;

use crate::domain::{AvatarPath, AvatarUpload};

use super::define_port_error;

define_port_error! {
    /// Errors raised by avatar store adapters.
    pub enum AvatarStoreError {
        /// The store refused the object (size, type or permission).
        Rejected { message: String } => "avatar store rejected upload: {message}",
        /// The request timed out.
        Timeout { message: String } => "avatar store timed out: {message}",
        /// Network or I/O failure talking to the store.
        Transport { message: String } => "avatar store transport failed: {message}",
    }
}

/// Path-addressed upload with overwrite-always semantics.
///
/// Adapters must treat an existing object at `path` as something to replace,
/// never as a conflict.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// Write `upload` to `path`, replacing any previous object.
    async fn upload(&self, path: &AvatarPath, upload: &AvatarUpload)
    -> Result<(), AvatarStoreError>;
}

/// Fixture implementation that accepts and discards every upload.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAvatarStore;

#[async_trait]
impl AvatarStore for FixtureAvatarStore {
    async fn upload(
        &self,
        _path: &AvatarPath,
        _upload: &AvatarUpload,
    ) -> Result<(), AvatarStoreError> {
        Ok(())
    }
}
