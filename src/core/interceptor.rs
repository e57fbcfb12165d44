use crate::domain::model::RequestHead;
use crate::domain::ports::{Interceptor, RequestBody};
use std::io;

const DEFAULT_PREVIEW_BYTES: usize = 256;

/// Logs each outgoing request body at debug level.
///
/// Serializes the whole body into memory to do so, which makes it the typical
/// case of a body being written more than once per request. One-shot bodies
/// are skipped.
pub struct BodyLoggingInterceptor {
    preview_bytes: usize,
}

impl BodyLoggingInterceptor {
    pub fn new(preview_bytes: usize) -> Self {
        Self { preview_bytes }
    }
}

impl Default for BodyLoggingInterceptor {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_BYTES)
    }
}

impl Interceptor for BodyLoggingInterceptor {
    fn intercept(&self, request: &RequestHead, body: &dyn RequestBody) -> io::Result<()> {
        if body.is_one_shot() {
            tracing::debug!(
                "--> {} {} (one-shot body omitted)",
                request.method,
                request.url
            );
            return Ok(());
        }

        let mut buffer = Vec::new();
        body.write_to(&mut buffer)?;

        let preview = &buffer[..buffer.len().min(self.preview_bytes)];
        tracing::debug!(
            "--> {} {} ({} bytes, {})",
            request.method,
            request.url,
            buffer.len(),
            body.content_type().unwrap_or("no content type")
        );
        match std::str::from_utf8(preview) {
            Ok(text) => tracing::debug!("{}", text),
            Err(_) => tracing::debug!("(binary body omitted)"),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::body::{BytesBody, ReaderBody};
    use crate::core::progress_body::ProgressRequestBody;
    use std::sync::{Arc, Mutex};

    fn head() -> RequestHead {
        RequestHead {
            method: reqwest::Method::POST,
            url: url::Url::parse("http://localhost/upload").unwrap(),
            headers: Vec::new(),
            timeout: None,
        }
    }

    #[test]
    fn test_writes_the_body_through_the_progress_decorator() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let body = ProgressRequestBody::new(
            BytesBody::from_text("{\"a\":1}", "application/json"),
            move |written: u64, _total: Option<u64>, done: bool| {
                sink.lock().unwrap().push((written, done))
            },
        );

        BodyLoggingInterceptor::default()
            .intercept(&head(), &body)
            .unwrap();

        assert_eq!(*calls.lock().unwrap(), vec![(7, true)]);
    }

    #[test]
    fn test_leaves_one_shot_bodies_untouched() {
        let body = ReaderBody::new(&b"once"[..], Some(4), None);
        BodyLoggingInterceptor::default()
            .intercept(&head(), &body)
            .unwrap();

        let mut out = Vec::new();
        body.write_to(&mut out).unwrap();
        assert_eq!(out, b"once");
    }
}
