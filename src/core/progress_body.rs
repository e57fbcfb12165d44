use crate::core::counting::CountingWriter;
use crate::domain::ports::{ProgressListener, RequestBody};
use std::cell::Cell;
use std::io::{self, BufWriter, Write};

#[derive(Debug, Clone, Copy)]
enum CachedLength {
    Unset,
    Known(Option<u64>),
}

/// Wraps a [`RequestBody`] and reports upload progress to a listener while the
/// body is written.
///
/// Every `write_to` call builds its own buffered, counting sink on top of the
/// sink it is given. Interceptors may write the body into their own buffers
/// before the network write happens, so a sink kept from an earlier call would
/// point at the wrong destination. The byte count therefore restarts with each
/// call; only the content length is remembered.
///
/// A cached length of zero counts as "not computed yet" and is asked for again.
pub struct ProgressRequestBody<B, L> {
    inner: B,
    listener: L,
    content_length: Cell<CachedLength>,
}

impl<B, L> ProgressRequestBody<B, L>
where
    B: RequestBody,
    L: ProgressListener,
{
    pub fn new(inner: B, listener: L) -> Self {
        Self {
            inner,
            listener,
            content_length: Cell::new(CachedLength::Unset),
        }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    pub fn into_inner(self) -> B {
        self.inner
    }

    fn send_progress_update(&self, bytes_written: u64) -> io::Result<()> {
        let content_length = self.content_length()?;
        self.listener.on_progress(
            bytes_written,
            content_length,
            Some(bytes_written) == content_length,
        );
        Ok(())
    }
}

impl<B, L> RequestBody for ProgressRequestBody<B, L>
where
    B: RequestBody,
    L: ProgressListener,
{
    fn content_type(&self) -> Option<&str> {
        self.inner.content_type()
    }

    fn content_length(&self) -> io::Result<Option<u64>> {
        match self.content_length.get() {
            CachedLength::Known(length) => Ok(length),
            CachedLength::Unset => {
                let length = self.inner.content_length()?;
                if length != Some(0) {
                    self.content_length.set(CachedLength::Known(length));
                }
                Ok(length)
            }
        }
    }

    fn write_to(&self, sink: &mut dyn Write) -> io::Result<()> {
        let counting = CountingWriter::new(sink, |bytes_written| {
            self.send_progress_update(bytes_written)
        });
        let mut progress_sink = BufWriter::new(counting);

        // 串流型 body 開始寫入後長度可能改變，先取得長度
        self.content_length()?;

        match self.inner.write_to(&mut progress_sink) {
            Ok(()) => progress_sink.flush(),
            Err(e) => {
                // 失敗時丟棄緩衝區，不要讓 Drop 把殘留資料送出
                let _ = progress_sink.into_parts();
                Err(e)
            }
        }
    }

    fn is_one_shot(&self) -> bool {
        self.inner.is_one_shot()
    }
}
