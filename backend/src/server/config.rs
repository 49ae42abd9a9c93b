//! Start-up configuration.
//!
//! [`AppSettings`] is loaded through OrthoConfig from `PAWSPLAY_*`
//! environment variables, CLI flags or a config file. [`ServerConfig`] is the
//! validated bundle handed to [`super::create_server`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use pawsplay::inbound::http::health::StoreBackend;
use pawsplay::inbound::http::session_config::{
    BuildMode, SessionSettings, session_settings_from_env,
};
use pawsplay::inbound::http::state::DEFAULT_MAX_AVATAR_BYTES;
use pawsplay::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_STORAGE_BUCKET: &str = "pet-photos";
const DEFAULT_AVATAR_DIR: &str = "./var/avatars";

/// Settings read at start-up.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PAWSPLAY")]
pub struct AppSettings {
    /// Listen address, `0.0.0.0:8080` when unset.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the server runs on in-memory fixtures.
    pub database_url: Option<String>,
    /// Object storage base URL, e.g. `https://<project>.supabase.co/storage/v1`.
    pub storage_url: Option<String>,
    /// Bucket holding avatars.
    pub storage_bucket: Option<String>,
    /// API key sent as both `apikey` and bearer token.
    pub storage_key: Option<String>,
    /// Local avatar directory used when no storage URL is configured.
    pub avatar_dir: Option<PathBuf>,
    /// Largest accepted avatar in bytes.
    #[ortho_config(default = 5_242_880)]
    pub max_avatar_bytes: usize,
    /// Upload timeout in seconds.
    #[ortho_config(default = 10)]
    pub storage_timeout_secs: u64,
    /// Accept the development `admin`/`password` login outside debug builds.
    #[ortho_config(default = false)]
    pub allow_fixture_login: bool,
}

impl AppSettings {
    /// Parse the listen address, `0.0.0.0:8080` when unset.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::ErrorKind::InvalidInput`] for an unparsable address.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid PAWSPLAY_BIND_ADDR '{raw}': {err}"),
            )
        })
    }

    /// Trimmed database URL, ignoring blank values.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_deref())
    }

    /// Trimmed storage URL, ignoring blank values.
    #[must_use]
    pub fn storage_url(&self) -> Option<&str> {
        non_blank(self.storage_url.as_deref())
    }

    /// Bucket name, `pet-photos` when unset or blank.
    #[must_use]
    pub fn storage_bucket(&self) -> &str {
        non_blank(self.storage_bucket.as_deref()).unwrap_or(DEFAULT_STORAGE_BUCKET)
    }

    /// Local avatar directory, `./var/avatars` when unset.
    #[must_use]
    pub fn avatar_dir(&self) -> PathBuf {
        self.avatar_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_AVATAR_DIR))
    }

    /// Largest accepted avatar in bytes.
    #[must_use]
    pub fn max_avatar_bytes(&self) -> usize {
        self.max_avatar_bytes
    }

    /// Upload timeout for the object-storage client.
    #[must_use]
    pub fn storage_timeout(&self) -> Duration {
        Duration::from_secs(self.storage_timeout_secs)
    }

    /// Whether the development login is wired in.
    ///
    /// Debug builds always accept it. Release builds only do so when
    /// `PAWSPLAY_ALLOW_FIXTURE_LOGIN` is set.
    #[must_use]
    pub fn fixture_login(&self, mode: BuildMode) -> bool {
        self.allow_fixture_login || matches!(mode, BuildMode::Debug)
    }
}

/// Session cookie settings read from the process environment.
///
/// # Errors
///
/// Returns [`std::io::Error`] when a release build finds the session
/// environment missing or malformed.
pub fn session_settings(mode: BuildMode) -> std::io::Result<SessionSettings> {
    session_settings_from_env(&DefaultEnv::new(), mode).map_err(std::io::Error::other)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Where avatars are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarBackend {
    /// Remote object storage bucket.
    Http {
        /// Storage API root, ending in `/storage/v1`.
        base: url::Url,
        bucket: String,
        api_key: Option<String>,
        timeout: Duration,
    },
    /// Local directory.
    Filesystem {
        /// Directory holding `<owner>/<entity>/avatar` objects.
        root: PathBuf,
    },
}

impl AvatarBackend {
    /// Choose the backend from settings.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::ErrorKind::InvalidInput`] when the storage URL does
    /// not parse.
    pub fn from_settings(settings: &AppSettings) -> std::io::Result<Self> {
        let Some(raw) = settings.storage_url() else {
            return Ok(Self::Filesystem {
                root: settings.avatar_dir(),
            });
        };
        let base = url::Url::parse(raw).map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid PAWSPLAY_STORAGE_URL '{raw}': {err}"),
            )
        })?;
        Ok(Self::Http {
            base,
            bucket: settings.storage_bucket().to_owned(),
            api_key: settings.storage_key.clone(),
            timeout: settings.storage_timeout(),
        })
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) avatars: AvatarBackend,
    pub(crate) max_avatar_bytes: usize,
    pub(crate) fixture_login: bool,
}

impl ServerConfig {
    /// Construct a server configuration with filesystem avatars and fixture
    /// persistence.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            avatars: AvatarBackend::Filesystem {
                root: PathBuf::from(DEFAULT_AVATAR_DIR),
            },
            max_avatar_bytes: DEFAULT_MAX_AVATAR_BYTES,
            fixture_login: false,
        }
    }

    /// Attach a database connection pool; pets and reservations then persist
    /// to PostgreSQL instead of fixtures.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Choose where avatars are written.
    #[must_use]
    pub fn with_avatars(mut self, avatars: AvatarBackend) -> Self {
        self.avatars = avatars;
        self
    }

    /// Cap the size of uploaded avatars.
    #[must_use]
    pub fn with_max_avatar_bytes(mut self, max_avatar_bytes: usize) -> Self {
        self.max_avatar_bytes = max_avatar_bytes;
        self
    }

    /// Accept the development `admin`/`password` login. Off by default, in
    /// which case every login attempt is refused.
    #[must_use]
    pub fn with_fixture_login(mut self, enabled: bool) -> Self {
        self.fixture_login = enabled;
        self
    }

    /// Backend reported by the health probes.
    #[must_use]
    pub fn store_backend(&self) -> StoreBackend {
        if self.db_pool.is_some() {
            StoreBackend::Postgres
        } else {
            StoreBackend::Fixtures
        }
    }
}
