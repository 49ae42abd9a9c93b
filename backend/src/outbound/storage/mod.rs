//! Avatar store adapters.
//!
//! `HttpAvatarStore` targets hosted object storage; `FilesystemAvatarStore`
//! keeps images on local disk when no storage URL is configured.

mod filesystem_avatar_store;
mod http_avatar_store;

pub use filesystem_avatar_store::FilesystemAvatarStore;
pub use http_avatar_store::HttpAvatarStore;
