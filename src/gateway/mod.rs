// Gateway module - Pingora ProxyHttp implementation
// Serves static images, resizing and caching on demand; everything else is
// proxied to the configured upstream origin.

pub mod context;
pub mod helpers;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use pingora_core::upstreams::peer::HttpPeer;
use pingora_core::Result;
use pingora_http::ResponseHeader;
use pingora_proxy::{ProxyHttp, Session};

pub use context::RequestContext;

use crate::cache::{CacheOrchestrator, FileStore, TokioFileStore};
use crate::config::Config;
use crate::params::TransformParams;
use crate::resolve::resolve;
use crate::transform::{ResizeEngine, TransformEngine};

/// Outcome of the per-request decision: terminate the chain with a file
/// response, or defer to the upstream origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Send the file at this path and end the chain
    Send(PathBuf),
    /// Pass the request through to the upstream origin
    Defer,
}

/// ThumbGate implements the Pingora ProxyHttp trait
///
/// `request_filter` either serves a file itself (original or resized
/// derivative) or lets the request continue to the upstream peer.
pub struct ThumbGate {
    config: Arc<Config>,
    store: Arc<dyn FileStore>,
    orchestrator: CacheOrchestrator,
}

impl ThumbGate {
    /// Create a gateway with the production filesystem and transform engine
    pub fn new(config: Config) -> Self {
        Self::with_collaborators(
            config,
            Arc::new(TokioFileStore::new()),
            Arc::new(ResizeEngine::new()),
        )
    }

    /// Create a gateway with injected collaborators
    pub fn with_collaborators(
        config: Config,
        store: Arc<dyn FileStore>,
        engine: Arc<dyn TransformEngine>,
    ) -> Self {
        let orchestrator = CacheOrchestrator::new(store.clone(), engine);
        Self {
            config: Arc::new(config),
            store,
            orchestrator,
        }
    }

    /// Decide how to answer one request
    ///
    /// `raw_path` is the URI path (query excluded, still percent-encoded);
    /// `query` holds the decoded query parameters. Exactly one of
    /// send-file or defer is produced per request, and no failure on this
    /// path escapes as an error.
    pub async fn dispatch(
        &self,
        request_id: &str,
        raw_path: &str,
        query: &HashMap<String, String>,
    ) -> Dispatch {
        let decoded = helpers::decode_path(raw_path);
        let params = TransformParams::from_query(query);
        let resolved = resolve(&self.config.mount, &decoded, &params.cache_segment());

        let source_meta = match self.store.metadata(&resolved.source).await {
            Ok(meta) => meta,
            Err(e) => {
                tracing::debug!(
                    request_id = %request_id,
                    path = %decoded,
                    error = %e,
                    "Source not found, deferring"
                );
                return Dispatch::Defer;
            }
        };

        if !source_meta.is_file {
            tracing::debug!(
                request_id = %request_id,
                path = %decoded,
                "Not a regular file, deferring"
            );
            return Dispatch::Defer;
        }

        let should_resize = !helpers::is_resize_exempt(&decoded) && params.wants_resize();

        let found = if should_resize {
            match self
                .orchestrator
                .lookup(
                    source_meta.modified,
                    &resolved.source,
                    &resolved.cache,
                    &params,
                )
                .await
            {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(
                        request_id = %request_id,
                        path = %decoded,
                        error = %e,
                        "Cache lookup failed"
                    );
                    None
                }
            }
        } else {
            None
        };

        if let Some(path) = found {
            Dispatch::Send(path)
        } else if !should_resize && self.config.mount.serve_static {
            Dispatch::Send(resolved.source)
        } else {
            Dispatch::Defer
        }
    }

    /// Write the file at `path` as the response, ending the chain
    ///
    /// If the file disappeared between the stat and the read, the request
    /// falls through to the upstream instead of failing.
    async fn send_file(
        &self,
        session: &mut Session,
        ctx: &RequestContext,
        path: &Path,
    ) -> Result<bool> {
        let body = match self.store.read(path).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    file = %path.display(),
                    error = %e,
                    "Failed to read file, deferring"
                );
                return Ok(false);
            }
        };

        let mut header = ResponseHeader::build(200, None)?;
        header.insert_header("Content-Type", helpers::content_type_for(path))?;
        header.insert_header("Content-Length", body.len().to_string())?;

        session
            .write_response_header(Box::new(header), false)
            .await?;
        session.write_response_body(Some(body), true).await?;

        tracing::debug!(
            request_id = %ctx.request_id(),
            file = %path.display(),
            elapsed_ms = ctx.elapsed().as_millis() as u64,
            "Served file"
        );

        Ok(true)
    }
}

#[async_trait]
impl ProxyHttp for ThumbGate {
    type CTX = RequestContext;

    fn new_ctx(&self) -> Self::CTX {
        RequestContext::new()
    }

    /// Filter and process incoming requests
    async fn request_filter(&self, session: &mut Session, ctx: &mut Self::CTX) -> Result<bool> {
        let req = session.req_header();
        let raw_path = req.uri.path().to_string();
        let query = helpers::extract_query_params(req);

        match self.dispatch(ctx.request_id(), &raw_path, &query).await {
            Dispatch::Send(path) => self.send_file(session, ctx, &path).await,
            Dispatch::Defer => {
                tracing::debug!(
                    request_id = %ctx.request_id(),
                    path = %raw_path,
                    "Deferring to upstream"
                );
                Ok(false)
            }
        }
    }

    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        let upstream = &self.config.server.upstream;
        let peer = Box::new(HttpPeer::new(
            (upstream.address.clone(), upstream.port),
            upstream.tls,
            upstream.sni(),
        ));
        Ok(peer)
    }
}
