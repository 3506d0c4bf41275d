use crate::artifacts::protocol::advertisement::AdvertisedRefs;
use crate::artifacts::protocol::transport::Transport;
use crate::artifacts::protocol::{UPLOAD_PACK_REQUEST_TYPE, UPLOAD_PACK_SERVICE, upload_request};
use crate::error::{Error, Result};
use bytes::Bytes;
use tracing::{debug, info};

/// Ref discovery and pack fetch against a remote repository URL
#[derive(Debug)]
pub struct PackProtocolClient<T: Transport> {
    transport: T,
}

impl<T: Transport> PackProtocolClient<T> {
    pub fn new(transport: T) -> Self {
        PackProtocolClient { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn discover_refs(&self, url: &str) -> Result<AdvertisedRefs> {
        let discovery_failed = |reason: String| Error::RefDiscoveryFailed {
            url: url.to_string(),
            reason,
        };

        let endpoint = format!(
            "{}/info/refs?service={UPLOAD_PACK_SERVICE}",
            url.trim_end_matches('/')
        );
        let response = self
            .transport
            .get(&endpoint)
            .map_err(|e| discovery_failed(e.to_string()))?;
        let refs = AdvertisedRefs::parse(&response).map_err(|e| discovery_failed(e.to_string()))?;

        info!(url, refs = refs.len(), "discovered refs");
        Ok(refs)
    }

    /// Fetch every advertised object as one pack, envelope stripped
    pub fn fetch(&self, url: &str, refs: &AdvertisedRefs) -> Result<Bytes> {
        let fetch_failed = |reason: String| Error::FetchFailed {
            url: url.to_string(),
            reason,
        };

        if refs.is_empty() {
            return Err(fetch_failed("remote advertised no refs".to_string()));
        }

        let request = upload_request::build_fetch_request(refs);
        let endpoint = format!("{}/{UPLOAD_PACK_SERVICE}", url.trim_end_matches('/'));
        debug!(url, request = request.len(), "sending fetch request");

        let response = self
            .transport
            .post(&endpoint, UPLOAD_PACK_REQUEST_TYPE, request)
            .map_err(|e| fetch_failed(e.to_string()))?;
        let pack = upload_request::unwrap_pack_response(&response)
            .map_err(|e| fetch_failed(e.to_string()))?;
        let pack = response.slice_ref(pack);

        info!(url, response = response.len(), pack = pack.len(), "fetched pack");
        Ok(pack)
    }
}
