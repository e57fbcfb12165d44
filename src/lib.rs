pub mod adapters;
#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{profile::UploadProfile, UploadConfig};

pub use adapters::body::{BytesBody, FileBody, ReaderBody};
pub use crate::core::{
    client::UploadClient, interceptor::BodyLoggingInterceptor,
    progress_body::ProgressRequestBody, EventListener, ThrottledListener,
};
pub use domain::model::{ProgressEvent, RequestHead, UploadRequest, UploadResponse};
pub use domain::ports::{Interceptor, ProgressListener, RequestBody};
pub use utils::error::{Result, UploadError};
