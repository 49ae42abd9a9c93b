//! Local filesystem avatar store for development.
//!
//! Objects land at `{root}/{owner}/{entity}/avatar`. Each write goes to its
//! own uniquely named sibling temp file, which is synced then renamed over the
//! target. Readers never see a half-written image, and concurrent uploads for
//! one entity resolve to whichever rename lands last.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{AvatarStore, AvatarStoreError};
use crate::domain::{AvatarPath, AvatarUpload};

/// Avatar store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct FilesystemAvatarStore {
    root: PathBuf,
}

impl FilesystemAvatarStore {
    /// Store objects below `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute location for `path`.
    pub fn object_path(&self, path: &AvatarPath) -> PathBuf {
        path.as_str()
            .split('/')
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }
}

fn io_error(action: &str, target: &Path, error: std::io::Error) -> AvatarStoreError {
    warn!(target = %target.display(), error = %error, "avatar store {action} failed");
    AvatarStoreError::transport(format!("{action} {}: {error}", target.display()))
}

#[async_trait]
impl AvatarStore for FilesystemAvatarStore {
    async fn upload(
        &self,
        path: &AvatarPath,
        upload: &AvatarUpload,
    ) -> Result<(), AvatarStoreError> {
        let target = self.object_path(path);
        debug!(target = %target.display(), bytes = upload.len(), "writing avatar");

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| io_error("create_dir_all", parent, err))?;
        }

        let temp = temp_path(&target);
        let written = write_synced(&temp, upload.bytes()).await;
        let result = match written {
            Ok(()) => fs::rename(&temp, &target)
                .await
                .map_err(|err| io_error("rename", &target, err)),
            Err(err) => Err(err),
        };
        if result.is_err() {
            discard(&temp).await;
        }
        result
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
}

async fn write_synced(temp: &Path, bytes: &[u8]) -> Result<(), AvatarStoreError> {
    let mut file = fs::File::create(temp)
        .await
        .map_err(|err| io_error("create", temp, err))?;
    file.write_all(bytes)
        .await
        .map_err(|err| io_error("write", temp, err))?;
    file.sync_all()
        .await
        .map_err(|err| io_error("sync", temp, err))
}

async fn discard(temp: &Path) {
    match fs::remove_file(temp).await {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => warn!(temp = %temp.display(), error = %err, "leftover avatar temp file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use futures_util::future::join_all;
    use rstest::rstest;

    fn upload(bytes: &[u8]) -> AvatarUpload {
        AvatarUpload::new(bytes.to_vec(), Some("image/png".to_owned()), None)
            .expect("non-empty upload")
    }

    #[rstest]
    #[tokio::test]
    async fn writes_to_the_owner_entity_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FilesystemAvatarStore::new(dir.path());
        let owner = UserId::random();
        let entity = Uuid::new_v4();
        let path = AvatarPath::for_entity(&owner, &entity);

        store.upload(&path, &upload(b"png")).await.expect("upload");

        let expected = dir
            .path()
            .join(owner.to_string())
            .join(entity.to_string())
            .join("avatar");
        assert_eq!(store.object_path(&path), expected);
        assert_eq!(fs::read(&expected).await.expect("read back"), b"png");
    }

    #[rstest]
    #[tokio::test]
    async fn repeat_upload_overwrites() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FilesystemAvatarStore::new(dir.path());
        let path = AvatarPath::for_entity(&UserId::random(), &Uuid::new_v4());

        store.upload(&path, &upload(b"first")).await.expect("first");
        store.upload(&path, &upload(b"second")).await.expect("second");

        let target = store.object_path(&path);
        assert_eq!(fs::read(&target).await.expect("read back"), b"second");
        assert_eq!(entries(target.parent().expect("parent")), vec!["avatar"]);
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("list dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_uploads_for_one_entity_all_succeed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FilesystemAvatarStore::new(dir.path());
        let path = AvatarPath::for_entity(&UserId::random(), &Uuid::new_v4());
        let payloads: Vec<Vec<u8>> = (0..8u8).map(|n| vec![n; 64 * 1024]).collect();

        for _ in 0..20 {
            let handles = payloads.iter().map(|bytes| {
                let store = store.clone();
                let path = path.clone();
                let upload = upload(bytes);
                tokio::spawn(async move { store.upload(&path, &upload).await })
            });
            for result in join_all(handles).await {
                result.expect("task joins").expect("upload succeeds");
            }
        }

        let target = store.object_path(&path);
        let written = fs::read(&target).await.expect("read back");
        assert!(payloads.contains(&written), "avatar holds one whole payload");
        assert_eq!(entries(target.parent().expect("parent")), vec!["avatar"]);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FilesystemAvatarStore::new(dir.path());
        let path = AvatarPath::for_entity(&UserId::random(), &Uuid::new_v4());
        let target = store.object_path(&path);
        fs::create_dir_all(target.join("occupied"))
            .await
            .expect("directory squats on the target");

        let err = store
            .upload(&path, &upload(b"png"))
            .await
            .expect_err("rename over a non-empty directory fails");

        assert!(matches!(err, AvatarStoreError::Transport { .. }));
        assert_eq!(entries(target.parent().expect("parent")), vec!["avatar"]);
    }

    #[rstest]
    #[tokio::test]
    async fn unwritable_root_is_a_transport_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").await.expect("seed file");
        let store = FilesystemAvatarStore::new(&blocker);
        let path = AvatarPath::for_entity(&UserId::random(), &Uuid::new_v4());

        let err = store
            .upload(&path, &upload(b"png"))
            .await
            .expect_err("root is a file");

        assert!(matches!(err, AvatarStoreError::Transport { .. }));
    }
}
