//! Buffered access to the package's singleton core-properties part.
//!
//! The container model may open the core-properties stream several times
//! while a package is open. Streams over this part never touch the backing
//! file when they close: the bytes of the last writable stream are kept in a
//! [`PropertiesBuffer`] and reach disk only through [`PropertiesBuffer::flush`],
//! which the package's flush/close sequence calls.

use crate::dirpkg::options::{FileAccess, FileMode};
use crate::opc::error::Result;
use parking_lot::Mutex;
use std::fs;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Buffer handle shared between a package and the streams it hands out.
pub type SharedPropertiesBuffer = Arc<Mutex<PropertiesBuffer>>;

/// Single-slot buffer holding the latest unflushed write of the
/// core-properties part.
#[derive(Debug)]
pub struct PropertiesBuffer {
    /// Backing file of the core-properties part
    path: PathBuf,

    /// Bytes captured from the last closed writable stream
    pending: Option<Vec<u8>>,

    /// Set once the part is deleted; later captures are dropped
    retired: bool,
}

impl PropertiesBuffer {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            pending: None,
            retired: false,
        }
    }

    /// Create a shareable buffer for the part stored at `path`.
    pub fn shared(path: PathBuf) -> SharedPropertiesBuffer {
        Arc::new(Mutex::new(Self::new(path)))
    }

    /// Backing file of the buffered part.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a write is waiting to be flushed.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Bytes waiting to be flushed, if any.
    pub fn pending(&self) -> Option<&[u8]> {
        self.pending.as_deref()
    }

    /// Drop any unflushed write and ignore streams that close afterwards.
    ///
    /// Called when the part is deleted, so a stream left open over it
    /// cannot bring the file back on the next flush.
    pub fn retire(&mut self) {
        self.pending = None;
        self.retired = true;
    }

    pub fn is_retired(&self) -> bool {
        self.retired
    }

    /// Write the pending bytes to the backing file, replacing its contents.
    ///
    /// Returns false without touching disk when nothing is pending. On
    /// failure the bytes stay pending.
    pub fn flush(&mut self) -> Result<bool> {
        let Some(bytes) = self.pending.take() else {
            return Ok(false);
        };

        if let Err(e) = fs::write(&self.path, &bytes) {
            self.pending = Some(bytes);
            return Err(e.into());
        }

        tracing::debug!(path = %self.path.display(), len = bytes.len(), "flushed core properties");
        Ok(true)
    }
}

/// Open a stream over the buffered core-properties part.
///
/// Readable opens that keep existing content start from the pending bytes, or
/// from the file when nothing is pending. Write-only and truncating opens
/// start empty. Append opens are positioned at the end.
pub fn open_stream(
    buffer: &SharedPropertiesBuffer,
    mode: FileMode,
    access: FileAccess,
) -> Result<PropertiesStream> {
    let keeps_content = matches!(
        mode,
        FileMode::Open | FileMode::OpenOrCreate | FileMode::Append
    );

    let initial = if keeps_content && (access.can_read() || mode == FileMode::Append) {
        let guard = buffer.lock();
        match guard.pending() {
            Some(bytes) => bytes.to_vec(),
            None => match fs::read(guard.path()) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
                Err(e) => return Err(e.into()),
            },
        }
    } else {
        Vec::new()
    };

    let mut cursor = Cursor::new(initial);
    if mode == FileMode::Append {
        cursor.seek(SeekFrom::End(0))?;
    }

    Ok(PropertiesStream {
        cursor,
        buffer: Arc::clone(buffer),
        access,
        closed: false,
    })
}

/// In-memory stream over the core-properties part.
///
/// Closing (explicitly or by drop) a writable stream stores its bytes as the
/// buffer's pending write. Nothing is written to disk.
#[derive(Debug)]
pub struct PropertiesStream {
    cursor: Cursor<Vec<u8>>,
    buffer: SharedPropertiesBuffer,
    access: FileAccess,
    closed: bool,
}

impl PropertiesStream {
    /// Close the stream, capturing its bytes if it was writable.
    pub fn close(mut self) {
        self.capture();
    }

    fn capture(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if !self.access.can_write() {
            return;
        }
        let mut buffer = self.buffer.lock();
        if buffer.retired {
            tracing::debug!(path = %buffer.path.display(), "dropping write to deleted core properties");
            return;
        }
        buffer.pending = Some(std::mem::take(self.cursor.get_mut()));
    }
}

impl Read for PropertiesStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.access.can_read() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "stream was opened write-only",
            ));
        }
        self.cursor.read(buf)
    }
}

impl Write for PropertiesStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.access.can_write() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "stream was opened read-only",
            ));
        }
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for PropertiesStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl Drop for PropertiesStream {
    fn drop(&mut self) {
        self.capture();
    }
}
