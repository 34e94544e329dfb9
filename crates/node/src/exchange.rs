//! Pull shares from neighbors.
use crate::{
    protocol::{ShareResponse, SEND_SHARE},
    Error, Result,
};
use async_trait::async_trait;
use edgefed_core::Share;
use futures::future::join_all;
use http::StatusCode;
use std::{fmt, sync::Arc, time::Duration};
use tracing::instrument;
use url::Url;

/// Transport used to pull a share from a neighbor.
#[async_trait]
pub trait PeerClient: Send + Sync {
    /// Pull the share `neighbor` serves, giving up after `timeout`.
    async fn fetch_share(
        &self,
        neighbor: &Url,
        timeout: Duration,
    ) -> Result<Share>;
}

/// Shared peer client.
pub type BoxedPeerClient = Arc<dyn PeerClient + 'static>;

/// Result of pulling from one neighbor.
pub struct PeerOutcome {
    /// Neighbor that was asked.
    pub neighbor: Url,
    /// Share or the reason the pull failed.
    pub result: Result<Share>,
}

/// Pull from every neighbor concurrently, one call per neighbor.
///
/// Outcomes are returned in neighbor order whatever order the
/// responses arrive in. Each call is bounded by `timeout` even if
/// the client does not enforce it.
pub async fn gather_shares(
    client: &dyn PeerClient,
    neighbors: &[Url],
    timeout: Duration,
) -> Vec<PeerOutcome> {
    let calls = neighbors.iter().map(|neighbor| async move {
        let result = match tokio::time::timeout(
            timeout,
            client.fetch_share(neighbor, timeout),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(Error::PeerTimeout(neighbor.clone())),
        };
        PeerOutcome {
            neighbor: neighbor.clone(),
            result,
        }
    });
    join_all(calls).await
}

/// URL of the share route on `neighbor`.
///
/// A trailing slash on the neighbor address is optional.
pub fn share_url(neighbor: &Url) -> Result<Url> {
    let mut url = neighbor.clone();
    url.path_segments_mut()
        .map_err(|_| Error::BaseUrl(neighbor.clone()))?
        .pop_if_empty()
        .push(SEND_SHARE);
    Ok(url)
}

/// Client that pulls shares over HTTP(S).
#[derive(Clone)]
pub struct HttpPeerClient {
    client: reqwest::Client,
}

impl fmt::Debug for HttpPeerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPeerClient").finish()
    }
}

impl HttpPeerClient {
    /// Create a new client.
    pub fn new() -> Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .connect_timeout(Duration::from_millis(5000))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PeerClient for HttpPeerClient {
    #[instrument(skip(self))]
    async fn fetch_share(
        &self,
        neighbor: &Url,
        timeout: Duration,
    ) -> Result<Share> {
        let url = share_url(neighbor)?;
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::ResponseCode(status));
        }
        let body: ShareResponse = response.json().await?;
        Ok(Share::from_hex(&body.share)?)
    }
}
