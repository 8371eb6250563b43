//! The storage contract a container model drives to persist its parts.

use crate::dirpkg::options::{FileAccess, FileMode, PackageOptions};
use crate::dirpkg::properties::PropertiesStream;
use crate::opc::error::Result;
use crate::opc::packuri::PackURI;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A part as seen by the container model.
///
/// Records are projections computed on every query from "a file exists at
/// the path" and "a content type resolves for the partname"; they are never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartRecord {
    partname: PackURI,
    content_type: String,
    path: PathBuf,
}

impl PartRecord {
    pub fn new(partname: PackURI, content_type: String, path: PathBuf) -> Self {
        Self {
            partname,
            content_type,
            path,
        }
    }

    /// Get the partname of this part.
    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Get the content type of this part.
    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Get the file backing this part.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Operations a container model needs from a physical package.
///
/// Relationships and package properties are ordinary parts to a backend;
/// the container model serializes them itself and stores them through this
/// contract. Part-level absence is `Ok(None)`, never an error.
pub trait PartStorageBackend {
    /// Stream type handed out by [`open_stream`](Self::open_stream).
    type Stream: Read + Write + Seek;

    /// Open or create the package at `root`.
    fn open(root: &Path, options: PackageOptions) -> Result<Self>
    where
        Self: Sized;

    /// Create an empty part and register its content type.
    fn create_part(&mut self, partname: &PackURI, content_type: &str) -> Result<PartRecord>;

    /// Look up a part.
    fn get_part(&self, partname: &PackURI) -> Result<Option<PartRecord>>;

    /// Delete a part and forget its override entry.
    fn delete_part(&mut self, partname: &PackURI) -> Result<()>;

    /// Enumerate every part in the package.
    fn list_parts(&self) -> Result<Vec<PartRecord>>;

    /// Open the content of a part.
    fn open_stream(
        &mut self,
        partname: &PackURI,
        mode: FileMode,
        access: FileAccess,
    ) -> Result<Self::Stream>;

    /// Persist buffered package state without closing.
    fn flush(&mut self) -> Result<()>;

    /// Flush and release the package. Further calls are no-ops.
    fn close(&mut self) -> Result<()>;
}

/// Byte stream over the content of a part.
#[derive(Debug)]
pub enum PartStream {
    /// Direct access to the part's backing file
    File(File),
    /// Buffered access to the core-properties part
    Properties(PropertiesStream),
}

impl PartStream {
    /// Close the stream.
    ///
    /// For the core-properties part this captures the written bytes; they
    /// reach disk on the package's next flush.
    pub fn close(self) -> io::Result<()> {
        match self {
            PartStream::File(mut file) => file.flush(),
            PartStream::Properties(stream) => {
                stream.close();
                Ok(())
            },
        }
    }
}

impl Read for PartStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            PartStream::File(file) => file.read(buf),
            PartStream::Properties(stream) => stream.read(buf),
        }
    }
}

impl Write for PartStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            PartStream::File(file) => file.write(buf),
            PartStream::Properties(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            PartStream::File(file) => file.flush(),
            PartStream::Properties(stream) => stream.flush(),
        }
    }
}

impl Seek for PartStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            PartStream::File(file) => file.seek(pos),
            PartStream::Properties(stream) => stream.seek(pos),
        }
    }
}
