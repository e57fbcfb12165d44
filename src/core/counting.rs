use std::io::{self, Write};

/// A sink that counts the bytes accepted by the wrapped writer and calls a
/// hook with the running total after every write.
///
/// Writes of any size go through the hook, single bytes included. An error
/// returned by the hook fails the write that triggered it.
pub struct CountingWriter<W, F> {
    inner: W,
    count: u64,
    on_write: F,
}

impl<W, F> CountingWriter<W, F>
where
    W: Write,
    F: FnMut(u64) -> io::Result<()>,
{
    pub fn new(inner: W, on_write: F) -> Self {
        Self {
            inner,
            count: 0,
            on_write,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W, F> Write for CountingWriter<W, F>
where
    W: Write,
    F: FnMut(u64) -> io::Result<()>,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.count += written as u64;
        (self.on_write)(self.count)?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
