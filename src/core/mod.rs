pub mod client;
pub mod counting;
pub mod interceptor;
pub mod listener;
pub mod progress_body;

pub use crate::domain::model::{ProgressEvent, RequestHead, UploadRequest, UploadResponse};
pub use crate::domain::ports::{Interceptor, ProgressListener, RequestBody};
pub use crate::utils::error::Result;
pub use listener::{EventListener, ThrottledListener};
