// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request dispatcher (spec §4.5): resolves a language, gets-or-creates
//! its pool, and runs one client request against a checked-out worker
//! under the caller's deadline.
//!
//! A deadline firing while a worker is mid-call does not just abandon the
//! request: the dispatcher grants a grace period, then force-kills the
//! worker so a hung driver can't pin a slot forever (spec §4.4 "grace-kill
//! escalation", §7 "Deadline expiry surfaces as a cancellation error").

use crate::detect::LanguageDetector;
use crate::error::DaemonError;
use crate::registry::{PoolFactoryProvider, Registry};
use drv_core::normalize;
use drv_engine::{PoolError, PoolHandle, PoolWorker};
use drv_storage::ImageStore;
use drv_wire::{
    ClientRequest, ClientResponse, LanguageInfo, NativeParseRequest, NativeParseResponse,
    ParseRequest, ParseResponse, VersionInfo,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{instrument, warn};

/// How long a worker gets after its deadline before the dispatcher kills
/// it outright (spec §4.4 "a small grace period (default 1 s)").
const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(1);

pub struct Dispatcher {
    registry: Arc<Registry>,
    provider: Arc<dyn PoolFactoryProvider>,
    detector: Arc<dyn LanguageDetector>,
    store: Arc<ImageStore>,
    version: VersionInfo,
    grace_period: Duration,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<Registry>,
        provider: Arc<dyn PoolFactoryProvider>,
        detector: Arc<dyn LanguageDetector>,
        store: Arc<ImageStore>,
    ) -> Self {
        Self {
            registry,
            provider,
            detector,
            store,
            version: VersionInfo {
                version: env!("CARGO_PKG_VERSION").to_string(),
                build_time: chrono::Utc::now().to_rfc3339(),
            },
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }

    #[cfg(test)]
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Empty content short-circuits without touching any pool (spec §4.5
    /// "Reject rules"); non-UTF-8 content fails the same way (spec §8
    /// boundary behavior) before a worker is ever involved.
    #[instrument(skip(self, request), fields(filename = %request.filename))]
    pub async fn parse(&self, request: ParseRequest) -> Result<ParseResponse, DaemonError> {
        if request.content.is_empty() {
            return Ok(ParseResponse {
                tree: Vec::new(),
                language: request.language.clone().unwrap_or_default(),
                errors: Vec::new(),
                elapsed_ms: 0,
            });
        }
        std::str::from_utf8(&request.content).map_err(|_| DaemonError::UnknownEncoding)?;

        let language = self.resolve_language(&request.filename, &request.content, request.language.as_deref())?;
        let pool = self.registry.get_or_create(&language, self.provider.as_ref()).await?;

        let timeout = request.timeout_ms.map(Duration::from_millis);
        let wire_request = ClientRequest::Parse(ParseRequest { language: Some(language), ..request });

        let start = Instant::now();
        let response = self.call_with_deadline(&pool, wire_request, timeout).await?;
        match response {
            ClientResponse::Parse(mut parsed) => {
                parsed.elapsed_ms = start.elapsed().as_millis() as u64;
                Ok(parsed)
            }
            ClientResponse::Error { kind, message } => Err(DaemonError::WireError { kind, message }),
            other => Err(DaemonError::Unexpected(format!("unexpected response to Parse: {other:?}"))),
        }
    }

    #[instrument(skip(self, request), fields(filename = %request.filename))]
    pub async fn native_parse(&self, request: NativeParseRequest) -> Result<NativeParseResponse, DaemonError> {
        if request.content.is_empty() {
            return Ok(NativeParseResponse {
                ast: String::new(),
                language: request.language.clone().unwrap_or_default(),
                errors: Vec::new(),
                elapsed_ms: 0,
            });
        }
        std::str::from_utf8(&request.content).map_err(|_| DaemonError::UnknownEncoding)?;

        let language = self.resolve_language(&request.filename, &request.content, request.language.as_deref())?;
        let pool = self.registry.get_or_create(&language, self.provider.as_ref()).await?;

        let wire_request = ClientRequest::NativeParse(NativeParseRequest { language: Some(language), ..request });
        let start = Instant::now();
        let response = self.call_with_deadline(&pool, wire_request, None).await?;
        match response {
            ClientResponse::NativeParse(mut parsed) => {
                parsed.elapsed_ms = start.elapsed().as_millis() as u64;
                Ok(parsed)
            }
            ClientResponse::Error { kind, message } => Err(DaemonError::WireError { kind, message }),
            other => Err(DaemonError::Unexpected(format!("unexpected response to NativeParse: {other:?}"))),
        }
    }

    pub fn version(&self) -> VersionInfo {
        self.version.clone()
    }

    /// Reports one entry per installed image, regardless of whether a
    /// pool has been created for it yet (spec §4.6 `SupportedLanguages`).
    pub async fn supported_languages(&self) -> Result<Vec<LanguageInfo>, DaemonError> {
        let store = Arc::clone(&self.store);
        let statuses = tokio::task::spawn_blocking(move || store.list())
            .await
            .map_err(|err| DaemonError::Unexpected(format!("listing images panicked: {err}")))??;
        Ok(statuses
            .into_iter()
            .map(|status| LanguageInfo {
                name: status.manifest.language.clone(),
                language: status.manifest.language,
                version: status.manifest.version,
                status: status.manifest.status.to_string(),
                features: status.manifest.features,
                runtime: status.manifest.runtime,
            })
            .collect())
    }

    fn resolve_language(
        &self,
        filename: &str,
        content: &[u8],
        explicit: Option<&str>,
    ) -> Result<String, DaemonError> {
        let raw = match explicit.filter(|lang| !lang.is_empty()) {
            Some(lang) => lang.to_string(),
            None => self.detector.detect(filename, content).ok_or(DaemonError::LanguageDetection)?,
        };
        Ok(normalize(&raw))
    }

    /// Runs one request against a checked-out worker, propagating
    /// `timeout` as the caller's deadline. If the deadline fires while
    /// the worker is still computing, waits `grace_period` more before
    /// forcibly killing it and returning a cancellation error.
    async fn call_with_deadline(
        &self,
        pool: &PoolHandle,
        request: ClientRequest,
        timeout: Option<Duration>,
    ) -> Result<ClientResponse, DaemonError> {
        let cancel = CancellationToken::new();
        let checked_out: Arc<Mutex<Option<Arc<dyn PoolWorker>>>> = Arc::new(Mutex::new(None));
        let capture = Arc::clone(&checked_out);

        let exec_cancel = cancel.clone();
        let fut = pool.execute(exec_cancel, move |worker| {
            *capture.lock() = Some(Arc::clone(&worker));
            async move { worker.call(request).await }
        });
        tokio::pin!(fut);

        let Some(deadline) = timeout else {
            return fut.await.map_err(DaemonError::from);
        };

        if let Ok(result) = tokio::time::timeout(deadline, &mut fut).await {
            return result.map_err(DaemonError::from);
        }
        warn!(?deadline, "request exceeded its deadline; granting a grace period before kill");

        if let Ok(result) = tokio::time::timeout(self.grace_period, &mut fut).await {
            return result.map_err(DaemonError::from);
        }

        warn!("grace period elapsed; force-killing the worker");
        cancel.cancel();
        if let Some(worker) = checked_out.lock().take() {
            worker.kill().await;
        }
        let _ = fut.await;
        Err(PoolError::Cancelled.into())
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
