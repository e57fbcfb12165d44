use crate::adapters::network::{self, ChannelSink, DEFAULT_CHANNEL_CAPACITY};
use crate::core::listener::{EventListener, ThrottledListener};
use crate::core::progress_body::ProgressRequestBody;
use crate::domain::model::{ProgressEvent, RequestHead, UploadRequest, UploadResponse};
use crate::domain::ports::{Interceptor, ProgressListener, RequestBody};
use crate::utils::error::Result;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Sends request bodies through an interceptor chain and then to the network,
/// reporting upload progress along the way.
pub struct UploadClient {
    client: Client,
    interceptors: Vec<Arc<dyn Interceptor>>,
    channel_capacity: usize,
    next_request_id: AtomicU64,
}

impl UploadClient {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            interceptors: Vec::new(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            next_request_id: AtomicU64::new(1),
        }
    }

    /// Interceptors run in the order they were added, before the network write.
    pub fn interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Number of written chunks allowed in flight ahead of the transport.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub fn next_request_id(&self) -> u64 {
        self.next_request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Uploads and publishes throttled [`ProgressEvent`]s under a fresh
    /// request id. Returns the id with the response.
    pub async fn upload_with_events(
        &self,
        request: UploadRequest,
        events: UnboundedSender<ProgressEvent>,
        interval: Duration,
    ) -> Result<(u64, UploadResponse)> {
        let request_id = self.next_request_id();
        let listener = ThrottledListener::new(EventListener::new(request_id, events), interval);
        let response = self.upload(request, listener).await?;
        Ok((request_id, response))
    }

    pub async fn upload<L>(&self, request: UploadRequest, listener: L) -> Result<UploadResponse>
    where
        L: ProgressListener + 'static,
    {
        let UploadRequest { head, body } = request;
        let body = ProgressRequestBody::new(body, listener);

        let content_type = body.content_type().map(str::to_string);
        let content_length = body.content_length()?;

        tracing::info!(
            "⬆️  {} {} ({})",
            head.method,
            head.url,
            content_length
                .map(|n| format!("{} bytes", n))
                .unwrap_or_else(|| "unknown length".to_string())
        );

        let (sink, chunks) = network::channel(self.channel_capacity);
        let interceptors = self.interceptors.clone();
        let writer_head = head.clone();
        let writer = tokio::task::spawn_blocking(move || {
            write_body(&interceptors, &writer_head, &body, sink)
        });

        // 構建請求
        let mut request = self.client.request(head.method.clone(), head.url.clone());
        for (name, value) in &head.headers {
            request = request.header(name, value);
        }
        if let Some(content_type) = &content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }
        if let Some(length) = content_length {
            request = request.header(CONTENT_LENGTH, length);
        }
        if let Some(timeout) = head.timeout {
            request = request.timeout(timeout);
        }

        let sent = async {
            let response = request
                .body(reqwest::Body::wrap_stream(chunks))
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(UploadResponse { status, body })
        }
        .await;
        let written = writer.await?;

        match (written, sent) {
            (Err(e), _) if e.kind() != io::ErrorKind::BrokenPipe => {
                tracing::debug!("Request body write failed: {}", e);
                Err(e.into())
            }
            (_, Ok(response)) => {
                tracing::info!("✅ {} {} -> {}", head.method, head.url, response.status);
                Ok(response)
            }
            (_, Err(e)) => Err(e.into()),
        }
    }
}

impl Default for UploadClient {
    fn default() -> Self {
        Self::new()
    }
}

fn write_body(
    interceptors: &[Arc<dyn Interceptor>],
    head: &RequestHead,
    body: &dyn RequestBody,
    mut sink: ChannelSink,
) -> io::Result<()> {
    let result = interceptors
        .iter()
        .try_for_each(|interceptor| interceptor.intercept(head, body))
        .and_then(|()| body.write_to(&mut sink));

    if let Err(e) = &result {
        sink.abort(e);
    }
    result
}
