//! Captured output stream.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

#[derive(Debug, Default)]
struct Captured {
    bytes: Vec<u8>,
    writes: usize,
}

/// A cloneable in-memory `Write` sink.
///
/// Hand one clone to a [`ScreenBuffer`](crate::render::ScreenBuffer) and keep
/// the other to inspect exactly what was written.
#[derive(Debug, Clone, Default)]
pub struct SharedOutput {
    inner: Rc<RefCell<Captured>>,
}

impl SharedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, as lossy UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.borrow().bytes).into_owned()
    }

    /// Return and forget everything written so far.
    pub fn take(&self) -> String {
        let mut inner = self.inner.borrow_mut();
        inner.writes = 0;
        String::from_utf8_lossy(&std::mem::take(&mut inner.bytes)).into_owned()
    }

    pub fn clear(&self) {
        self.take();
    }

    /// Number of non-empty `write` calls since the last clear.
    pub fn write_count(&self) -> usize {
        self.inner.borrow().writes
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.inner.borrow_mut();
        if !buf.is_empty() {
            inner.writes += 1;
        }
        inner.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_contents() {
        let out = SharedOutput::new();
        let mut writer = out.clone();
        writer.write_all(b"abc").unwrap();
        writer.write_all(b"").unwrap();
        assert_eq!(out.contents(), "abc");
        assert_eq!(out.write_count(), 1);
        assert_eq!(out.take(), "abc");
        assert_eq!(out.contents(), "");
        assert_eq!(out.write_count(), 0);
    }
}
