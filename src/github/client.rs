use std::sync::{Arc, Once};
use std::time::Duration;

use anyhow::{Context, Result};
use octocrab::Octocrab;

/// Applied to connect and read on every request; the CLI is interactive.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

static CRYPTO_PROVIDER: Once = Once::new();

/// Install the rustls `CryptoProvider` before any TLS client is constructed.
///
/// reqwest 0.13 / rustls 0.23 no longer auto-install a provider.
pub fn install_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        // Err means another provider is already installed, which is fine.
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
    });
}

/// A GitHub REST client for one invocation.
///
/// Unauthenticated clients can read public issues and repositories, which is
/// all the dry-run path needs.
#[derive(Clone)]
pub struct GitHubClient {
    octocrab: Arc<Octocrab>,
}

impl GitHubClient {
    /// Build a client against `api_url` (default `https://api.github.com`).
    pub fn new(api_url: Option<&str>, token: Option<String>) -> Result<Self> {
        install_crypto_provider();

        let mut builder = Octocrab::builder()
            .set_connect_timeout(Some(REQUEST_TIMEOUT))
            .set_read_timeout(Some(REQUEST_TIMEOUT));
        if let Some(token) = token {
            builder = builder.personal_token(token);
        }
        if let Some(api_url) = api_url {
            builder = builder
                .base_uri(api_url.trim_end_matches('/').to_owned())
                .context("setting GitHub API base URI")?;
        }

        let octocrab = builder.build().context("building octocrab instance")?;
        Ok(Self {
            octocrab: Arc::new(octocrab),
        })
    }

    pub fn octocrab(&self) -> &Arc<Octocrab> {
        &self.octocrab
    }
}
