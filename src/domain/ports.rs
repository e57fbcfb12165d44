use crate::domain::model::RequestHead;
use std::io::{self, Write};

/// The payload of an outgoing request.
///
/// `write_to` may be called more than once for the same request (interceptors
/// often serialize the body before the network write does), each time with a
/// different sink. Implementations must write the whole payload on every call
/// unless they are one-shot.
pub trait RequestBody: Send {
    fn content_type(&self) -> Option<&str>;

    /// `Ok(None)` when the length is not known up front.
    fn content_length(&self) -> io::Result<Option<u64>>;

    fn write_to(&self, sink: &mut dyn Write) -> io::Result<()>;

    /// One-shot bodies can be written at most once.
    fn is_one_shot(&self) -> bool {
        false
    }
}

impl<B: RequestBody + ?Sized> RequestBody for Box<B> {
    fn content_type(&self) -> Option<&str> {
        (**self).content_type()
    }

    fn content_length(&self) -> io::Result<Option<u64>> {
        (**self).content_length()
    }

    fn write_to(&self, sink: &mut dyn Write) -> io::Result<()> {
        (**self).write_to(sink)
    }

    fn is_one_shot(&self) -> bool {
        (**self).is_one_shot()
    }
}

/// Receives upload progress. Called inline on the writing thread after every
/// write that reaches the network sink.
pub trait ProgressListener: Send + Sync {
    fn on_progress(&self, bytes_written: u64, content_length: Option<u64>, done: bool);
}

impl<F> ProgressListener for F
where
    F: Fn(u64, Option<u64>, bool) + Send + Sync,
{
    fn on_progress(&self, bytes_written: u64, content_length: Option<u64>, done: bool) {
        self(bytes_written, content_length, done)
    }
}

/// A step in the call pipeline that runs before the network write.
pub trait Interceptor: Send + Sync {
    fn intercept(&self, request: &RequestHead, body: &dyn RequestBody) -> io::Result<()>;
}
