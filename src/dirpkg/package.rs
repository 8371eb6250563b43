//! Directory-backed OPC packages.
//!
//! A [`DirPackage`] stores each part as a plain file under a root directory,
//! mirroring the segments of its partname, with `[Content_Types].xml` and the
//! `[Package].lock` resource at the root.

use crate::dirpkg::backend::{PartRecord, PartStorageBackend, PartStream};
use crate::dirpkg::lock::PackageLock;
use crate::dirpkg::options::{FileAccess, FileMode, PackageOptions};
use crate::dirpkg::properties::{self, PropertiesBuffer, SharedPropertiesBuffer};
use crate::dirpkg::store::PartStore;
use crate::opc::constants::content_type as ct;
use crate::opc::content_types::ContentTypesTable;
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::PackURI;
use std::path::{Path, PathBuf};

/// An open directory package.
///
/// Holds the package lock from [`open`](DirPackage::open) until
/// [`close`](DirPackage::close) or drop. The content-types table is read once
/// at open; changes made by other handles afterwards are not seen.
///
/// A handle is not synchronized: callers sharing one across threads must
/// serialize access themselves.
///
/// # Example
///
/// ```no_run
/// use opc_dirpkg::{DirPackage, FileAccess, FileMode, PackURI, PackageOptions};
/// use std::io::Write;
///
/// let mut pkg = DirPackage::open("out/document", PackageOptions::create())?;
/// let part = PackURI::new("/word/document.xml")?;
/// pkg.create_part(&part, "application/xml")?;
/// let mut stream = pkg.open_stream(&part, FileMode::Create, FileAccess::Write)?;
/// stream.write_all(b"<document/>")?;
/// stream.close()?;
/// pkg.close()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct DirPackage {
    options: PackageOptions,

    /// Cleared by `close`
    lock: Option<PackageLock>,

    store: PartStore,

    /// Created on first open of the core-properties part
    properties: Option<SharedPropertiesBuffer>,
}

impl DirPackage {
    /// Open a package directory.
    ///
    /// | mode | directory exists | directory missing |
    /// |---|---|---|
    /// | `CreateNew` | `AlreadyExists` | created |
    /// | `Create` | emptied | created |
    /// | `Open` | loaded | `NotFound` |
    /// | `OpenOrCreate` | loaded | created |
    ///
    /// Lookups see the existing content-types document only when
    /// `options.access` permits reading. A write-only handle still merges its
    /// registrations into that document when it flushes.
    pub fn open<P: AsRef<Path>>(root: P, options: PackageOptions) -> Result<Self> {
        let root = root.as_ref();
        if root.as_os_str().is_empty() {
            return Err(OpcError::InvalidArgument("empty package path".to_string()));
        }
        if !options.mode.valid_for_package() {
            return Err(OpcError::InvalidArgument(format!(
                "{:?} is not a valid package open mode",
                options.mode
            )));
        }
        if !options.access.can_write()
            && matches!(options.mode, FileMode::CreateNew | FileMode::Create)
        {
            return Err(OpcError::InvalidArgument(format!(
                "{:?} requires write access",
                options.mode
            )));
        }

        let lock = PackageLock::acquire(root, &options)?;
        let root = root.to_path_buf();
        let store = if options.access.can_read() {
            PartStore::load(root)?
        } else {
            PartStore::load_write_only(root)?
        };

        tracing::info!(
            root = %store.root().display(),
            mode = ?options.mode,
            access = ?options.access,
            share = ?options.share,
            "opened package"
        );
        Ok(Self {
            options,
            lock: Some(lock),
            store,
            properties: None,
        })
    }

    /// Get the root directory of this package.
    #[inline]
    pub fn root(&self) -> &Path {
        self.store.root()
    }

    /// Get the options this package was opened with.
    #[inline]
    pub fn options(&self) -> &PackageOptions {
        &self.options
    }

    /// Whether the package has been closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.lock.is_none()
    }

    /// Get the content-types table.
    #[inline]
    pub fn content_types(&self) -> &ContentTypesTable {
        self.store.content_types()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(OpcError::PackageClosed);
        }
        Ok(())
    }

    fn ensure_writable(&self, what: &PackURI) -> Result<()> {
        self.ensure_open()?;
        if !self.options.access.can_write() {
            return Err(OpcError::ReadOnly(what.to_string()));
        }
        Ok(())
    }

    /// Create an empty part with the given content type.
    pub fn create_part(&mut self, partname: &PackURI, content_type: &str) -> Result<PartRecord> {
        self.ensure_writable(partname)?;
        self.store.create_part(partname, content_type)
    }

    /// Look up a part. Returns `None` if it does not exist.
    pub fn get_part(&self, partname: &PackURI) -> Result<Option<PartRecord>> {
        self.ensure_open()?;
        self.store.get_part(partname)
    }

    /// Delete a part. Deleting a missing part is not an error.
    pub fn delete_part(&mut self, partname: &PackURI) -> Result<()> {
        self.ensure_writable(partname)?;
        let path = self.store.path_for(partname)?;
        let buffered = self
            .properties
            .as_ref()
            .is_some_and(|buffer| buffer.lock().path() == path);
        if buffered && let Some(buffer) = self.properties.take() {
            buffer.lock().retire();
        }
        self.store.delete_part(partname)
    }

    /// Enumerate every part, sorted by partname.
    pub fn list_parts(&self) -> Result<Vec<PartRecord>> {
        self.ensure_open()?;
        self.store.list_parts()
    }

    /// Open a stream over a part's content.
    ///
    /// The core-properties part is served from an in-memory buffer whose
    /// latest write reaches disk on [`flush`](Self::flush) or
    /// [`close`](Self::close); every other part is opened directly.
    ///
    /// Read-only access is accepted only with [`FileMode::Open`]; every other
    /// mode may create or modify the part.
    pub fn open_stream(
        &mut self,
        partname: &PackURI,
        mode: FileMode,
        access: FileAccess,
    ) -> Result<PartStream> {
        self.ensure_open()?;
        if !access.can_write() && mode != FileMode::Open {
            return Err(OpcError::InvalidArgument(format!(
                "{:?} requires write access to '{}'",
                mode, partname
            )));
        }
        if access.can_write() {
            self.ensure_writable(partname)?;
        }

        if let Some(buffer) = self.properties_buffer_for(partname)? {
            return Ok(PartStream::Properties(properties::open_stream(
                &buffer, mode, access,
            )?));
        }

        let file = self.store.open_file(partname, mode, access)?;
        Ok(PartStream::File(file))
    }

    /// Get the properties buffer if `partname` is the core-properties part.
    fn properties_buffer_for(&mut self, partname: &PackURI) -> Result<Option<SharedPropertiesBuffer>> {
        let Some(record) = self.store.get_part(partname)? else {
            return Ok(None);
        };
        if !record.content_type().eq_ignore_ascii_case(ct::OPC_CORE_PROPERTIES) {
            return Ok(None);
        }

        match &self.properties {
            Some(buffer) if buffer.lock().path() == record.path() => Ok(Some(buffer.clone())),
            Some(_) => {
                tracing::warn!(%partname, "second core-properties part is not buffered");
                Ok(None)
            },
            None => {
                let buffer = PropertiesBuffer::shared(PathBuf::from(record.path()));
                self.properties = Some(buffer.clone());
                Ok(Some(buffer))
            },
        }
    }

    /// Persist the content-types table (if changed) and the buffered
    /// core-properties part (if written).
    pub fn flush(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.flush_unchecked()
    }

    /// Flush and release the package lock.
    ///
    /// The lock is released even when flushing fails; the flush error is
    /// returned afterwards. Closing a closed package does nothing.
    pub fn close(&mut self) -> Result<()> {
        let Some(mut lock) = self.lock.take() else {
            return Ok(());
        };

        let flushed = self.flush_unchecked();
        lock.release();

        tracing::info!(root = %self.root().display(), ok = flushed.is_ok(), "closed package");
        flushed
    }

    fn flush_unchecked(&mut self) -> Result<()> {
        self.store.flush_content_types()?;
        if let Some(buffer) = &self.properties {
            buffer.lock().flush()?;
        }
        Ok(())
    }
}

impl PartStorageBackend for DirPackage {
    type Stream = PartStream;

    fn open(root: &Path, options: PackageOptions) -> Result<Self> {
        DirPackage::open(root, options)
    }

    fn create_part(&mut self, partname: &PackURI, content_type: &str) -> Result<PartRecord> {
        DirPackage::create_part(self, partname, content_type)
    }

    fn get_part(&self, partname: &PackURI) -> Result<Option<PartRecord>> {
        DirPackage::get_part(self, partname)
    }

    fn delete_part(&mut self, partname: &PackURI) -> Result<()> {
        DirPackage::delete_part(self, partname)
    }

    fn list_parts(&self) -> Result<Vec<PartRecord>> {
        DirPackage::list_parts(self)
    }

    fn open_stream(
        &mut self,
        partname: &PackURI,
        mode: FileMode,
        access: FileAccess,
    ) -> Result<PartStream> {
        DirPackage::open_stream(self, partname, mode, access)
    }

    fn flush(&mut self) -> Result<()> {
        DirPackage::flush(self)
    }

    fn close(&mut self) -> Result<()> {
        DirPackage::close(self)
    }
}

impl Drop for DirPackage {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(root = %self.root().display(), "failed to close package: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dirpkg::options::FileShare;
    use crate::opc::constants::reserved;
    use crate::opc::error::ErrorKind;
    use std::fs;
    use std::io::{Read, Write};
    use tempfile::tempdir;

    fn uri(s: &str) -> PackURI {
        PackURI::new(s).unwrap()
    }

    fn write_part(pkg: &mut DirPackage, partname: &PackURI, bytes: &[u8]) {
        let mut stream = pkg
            .open_stream(partname, FileMode::Create, FileAccess::Write)
            .unwrap();
        stream.write_all(bytes).unwrap();
        stream.close().unwrap();
    }

    fn read_part(pkg: &mut DirPackage, partname: &PackURI) -> Vec<u8> {
        let mut stream = pkg
            .open_stream(partname, FileMode::Open, FileAccess::Read)
            .unwrap();
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_round_trip_across_reopen() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("pkg");
        let part = uri("/word/document.xml");

        let mut pkg = DirPackage::open(&root, PackageOptions::create()).unwrap();
        pkg.create_part(&part, ct::XML).unwrap();
        write_part(&mut pkg, &part, b"<document/>");
        pkg.close().unwrap();

        let mut pkg = DirPackage::open(&root, PackageOptions::read_only()).unwrap();
        let record = pkg.get_part(&part).unwrap().unwrap();
        assert_eq!(record.partname(), &part);
        assert_eq!(record.content_type(), ct::XML);
        assert_eq!(read_part(&mut pkg, &part), b"<document/>");
    }

    #[test]
    fn test_default_override_law_persists() {
        let dir = tempdir().unwrap();
        let a = uri("/a.ext");
        let b = uri("/b.ext");

        let mut pkg = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
        pkg.create_part(&a, ct::TEXT).unwrap();
        pkg.create_part(&b, ct::JPEG).unwrap();
        pkg.close().unwrap();

        let mut pkg = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
        assert_eq!(pkg.get_part(&a).unwrap().unwrap().content_type(), ct::TEXT);
        assert_eq!(pkg.get_part(&b).unwrap().unwrap().content_type(), ct::JPEG);

        pkg.delete_part(&b).unwrap();
        assert!(pkg.content_types().override_for(&b).is_none());
        let c = uri("/c.ext");
        pkg.create_part(&c, ct::TEXT).unwrap();
        assert!(pkg.content_types().override_for(&c).is_none());
        pkg.close().unwrap();

        let xml = fs::read_to_string(dir.path().join(reserved::CONTENT_TYPES)).unwrap();
        assert!(xml.contains(r#"<Default Extension="ext" ContentType="text/plain"/>"#));
        assert!(!xml.contains("<Override"));
    }

    #[test]
    fn test_extensionless_part_is_override() {
        let dir = tempdir().unwrap();
        let part = uri("/docProps/thumbnail");
        let mut pkg = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
        pkg.create_part(&part, ct::PNG).unwrap();
        pkg.close().unwrap();

        let xml = fs::read_to_string(dir.path().join(reserved::CONTENT_TYPES)).unwrap();
        assert!(xml.contains(r#"<Override PartName="/docProps/thumbnail" ContentType="image/png"/>"#));
        assert!(!xml.contains("<Default"));
    }

    #[test]
    fn test_delete_then_list() {
        let dir = tempdir().unwrap();
        let keep = uri("/keep.xml");
        let gone = uri("/sub/gone.xml");

        let mut pkg = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
        pkg.create_part(&keep, ct::XML).unwrap();
        let record = pkg.create_part(&gone, ct::XML).unwrap();
        assert_eq!(pkg.list_parts().unwrap().len(), 2);

        pkg.delete_part(&gone).unwrap();
        let parts = pkg.list_parts().unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].partname(), &keep);
        assert!(!record.path().exists());
    }

    #[test]
    fn test_lock_exclusivity() {
        let dir = tempdir().unwrap();
        let _writer = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();

        let err = DirPackage::open(dir.path(), PackageOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LockConflict);

        let err = DirPackage::open(dir.path(), PackageOptions::read_only()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LockConflict);
    }

    #[test]
    fn test_shared_readers() {
        let dir = tempdir().unwrap();
        DirPackage::open(dir.path(), PackageOptions::default())
            .unwrap()
            .close()
            .unwrap();

        let first = DirPackage::open(dir.path(), PackageOptions::read_only()).unwrap();
        let second = DirPackage::open(
            dir.path(),
            PackageOptions::read_only().with_share(FileShare::ReadWrite),
        )
        .unwrap();
        assert!(!first.is_closed());
        assert!(!second.is_closed());
    }

    #[test]
    fn test_close_releases_lock() {
        let dir = tempdir().unwrap();
        let mut pkg = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
        pkg.close().unwrap();
        pkg.close().unwrap();
        assert!(pkg.is_closed());
        assert_eq!(
            pkg.list_parts().unwrap_err().kind(),
            ErrorKind::PackageClosed
        );

        let mut again = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
        again.close().unwrap();
    }

    #[test]
    fn test_drop_releases_lock() {
        let dir = tempdir().unwrap();
        {
            let mut pkg = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
            pkg.create_part(&uri("/a.xml"), ct::XML).unwrap();
        }
        let pkg = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
        assert!(pkg.get_part(&uri("/a.xml")).unwrap().is_some());
    }

    #[test]
    fn test_open_matrix() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("pkg");

        let err = DirPackage::open(&root, PackageOptions::read_only()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let mut pkg = DirPackage::open(
            &root,
            PackageOptions::default().with_mode(FileMode::CreateNew),
        )
        .unwrap();
        pkg.create_part(&uri("/a.xml"), ct::XML).unwrap();
        pkg.close().unwrap();

        let err = DirPackage::open(
            &root,
            PackageOptions::default().with_mode(FileMode::CreateNew),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        let pkg = DirPackage::open(&root, PackageOptions::default()).unwrap();
        assert_eq!(pkg.list_parts().unwrap().len(), 1);
        drop(pkg);

        let pkg = DirPackage::open(&root, PackageOptions::create()).unwrap();
        assert!(pkg.list_parts().unwrap().is_empty());
        assert!(!root.join("a.xml").exists());
    }

    #[test]
    fn test_invalid_open_options() {
        let dir = tempdir().unwrap();
        for options in [
            PackageOptions::default().with_mode(FileMode::Truncate),
            PackageOptions::default().with_mode(FileMode::Append),
            PackageOptions::create().with_access(FileAccess::Read),
        ] {
            let err = DirPackage::open(dir.path(), options).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
        assert!(!dir.path().join(reserved::LOCK).exists());
    }

    #[test]
    fn test_untouched_package_writes_no_content_types() {
        let dir = tempdir().unwrap();
        let mut pkg = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
        pkg.close().unwrap();
        assert!(!dir.path().join(reserved::CONTENT_TYPES).exists());
    }

    #[test]
    fn test_malformed_content_types_fails_open_and_releases_lock() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(reserved::CONTENT_TYPES),
            b"<Types><Default></Override></Types>",
        )
        .unwrap();

        let err = DirPackage::open(dir.path(), PackageOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);

        let write_only = PackageOptions::default().with_access(FileAccess::Write);
        let err = DirPackage::open(dir.path(), write_only).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);

        fs::write(dir.path().join(reserved::CONTENT_TYPES), b"<Types/>").unwrap();
        assert!(DirPackage::open(dir.path(), PackageOptions::default()).is_ok());
    }

    #[test]
    fn test_write_only_session_keeps_existing_parts() {
        let dir = tempdir().unwrap();
        let mut pkg = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
        pkg.create_part(&uri("/old.bin"), "application/x-old").unwrap();
        pkg.close().unwrap();

        let write_only = PackageOptions::default()
            .with_mode(FileMode::Open)
            .with_access(FileAccess::Write);
        let mut pkg = DirPackage::open(dir.path(), write_only).unwrap();
        pkg.create_part(&uri("/new.xml"), ct::XML).unwrap();
        pkg.close().unwrap();

        let pkg = DirPackage::open(dir.path(), PackageOptions::read_only()).unwrap();
        let names: Vec<_> = pkg
            .list_parts()
            .unwrap()
            .into_iter()
            .map(|p| p.partname().to_string())
            .collect();
        assert_eq!(names, vec!["/new.xml", "/old.bin"]);
        assert_eq!(
            pkg.get_part(&uri("/old.bin")).unwrap().unwrap().content_type(),
            "application/x-old"
        );
    }

    #[test]
    fn test_close_releases_lock_when_flush_fails() {
        let dir = tempdir().unwrap();
        let mut pkg = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
        pkg.create_part(&uri("/a.xml"), ct::XML).unwrap();
        fs::create_dir(dir.path().join(reserved::CONTENT_TYPES)).unwrap();

        let err = pkg.close().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(pkg.is_closed());
        assert!(pkg.close().is_ok());

        assert!(PackageLock::acquire(dir.path(), &PackageOptions::default()).is_ok());
    }

    #[test]
    fn test_read_only_handle_rejects_mutation() {
        let dir = tempdir().unwrap();
        let part = uri("/a.xml");
        let mut pkg = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
        pkg.create_part(&part, ct::XML).unwrap();
        pkg.close().unwrap();

        let mut pkg = DirPackage::open(dir.path(), PackageOptions::read_only()).unwrap();
        assert_eq!(
            pkg.create_part(&uri("/b.xml"), ct::XML).unwrap_err().kind(),
            ErrorKind::ReadOnly
        );
        assert_eq!(pkg.delete_part(&part).unwrap_err().kind(), ErrorKind::ReadOnly);
        assert_eq!(
            pkg.open_stream(&part, FileMode::Create, FileAccess::Write)
                .unwrap_err()
                .kind(),
            ErrorKind::ReadOnly
        );
        assert!(read_part(&mut pkg, &part).is_empty());
    }

    #[test]
    fn test_read_access_requires_open_mode() {
        let dir = tempdir().unwrap();
        let part = uri("/a.xml");
        let mut pkg = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
        pkg.create_part(&part, ct::XML).unwrap();
        pkg.close().unwrap();

        for options in [PackageOptions::read_only(), PackageOptions::default()] {
            let mut pkg = DirPackage::open(dir.path(), options).unwrap();
            for mode in [FileMode::OpenOrCreate, FileMode::Create, FileMode::Truncate] {
                let err = pkg.open_stream(&part, mode, FileAccess::Read).unwrap_err();
                assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{:?}", mode);
            }
            assert!(pkg.open_stream(&part, FileMode::Open, FileAccess::Read).is_ok());
        }
    }

    #[test]
    fn test_invalid_partnames_fail_before_io() {
        let dir = tempdir().unwrap();
        let mut pkg = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
        for name in ["/[Content_Types].xml", "/[package].LOCK", "/a/../b.xml"] {
            let err = pkg.create_part(&uri(name), ct::XML).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{}", name);
            assert_eq!(
                pkg.get_part(&uri(name)).unwrap_err().kind(),
                ErrorKind::InvalidArgument
            );
        }
    }

    #[test]
    fn test_properties_part_buffers_until_flush() {
        let dir = tempdir().unwrap();
        let core = uri("/docProps/core.xml");
        let path = dir.path().join("docProps").join("core.xml");

        let mut pkg = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
        pkg.create_part(&core, ct::OPC_CORE_PROPERTIES).unwrap();

        write_part(&mut pkg, &core, b"<first-and-longer/>");
        write_part(&mut pkg, &core, b"<second/>");
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
        assert_eq!(read_part(&mut pkg, &core), b"<second/>");

        pkg.flush().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"<second/>");

        write_part(&mut pkg, &core, b"<third/>");
        pkg.close().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"<third/>");
    }

    #[test]
    fn test_deleting_properties_part_discards_pending_write() {
        let dir = tempdir().unwrap();
        let core = uri("/docProps/core.xml");

        let mut pkg = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
        pkg.create_part(&core, ct::OPC_CORE_PROPERTIES).unwrap();
        write_part(&mut pkg, &core, b"<props/>");
        pkg.delete_part(&core).unwrap();
        pkg.close().unwrap();

        assert!(!dir.path().join("docProps").join("core.xml").exists());
    }

    #[test]
    fn test_stream_open_across_delete_does_not_restore_part() {
        let dir = tempdir().unwrap();
        let core = uri("/docProps/core.xml");

        let mut pkg = DirPackage::open(dir.path(), PackageOptions::default()).unwrap();
        pkg.create_part(&core, ct::OPC_CORE_PROPERTIES).unwrap();
        let mut stream = pkg
            .open_stream(&core, FileMode::Create, FileAccess::Write)
            .unwrap();
        pkg.delete_part(&core).unwrap();
        stream.write_all(b"<late/>").unwrap();
        stream.close().unwrap();

        pkg.flush().unwrap();
        assert!(!dir.path().join("docProps").exists());

        pkg.create_part(&core, ct::OPC_CORE_PROPERTIES).unwrap();
        write_part(&mut pkg, &core, b"<fresh/>");
        pkg.close().unwrap();
        assert_eq!(
            fs::read(dir.path().join("docProps").join("core.xml")).unwrap(),
            b"<fresh/>"
        );
    }

    #[test]
    fn test_backend_contract_is_object_agnostic() {
        fn exercise<B: PartStorageBackend>(backend: &mut B) -> Result<usize> {
            let part = PackURI::new("/_rels/.rels").map_err(OpcError::InvalidArgument)?;
            backend.create_part(&part, ct::OPC_RELATIONSHIPS)?;
            let mut stream = backend.open_stream(&part, FileMode::Create, FileAccess::Write)?;
            stream.write_all(b"<Relationships/>")?;
            drop(stream);
            backend.flush()?;
            let count = backend.list_parts()?.len();
            backend.close()?;
            Ok(count)
        }

        let dir = tempdir().unwrap();
        let mut pkg =
            <DirPackage as PartStorageBackend>::open(dir.path(), PackageOptions::default()).unwrap();
        assert_eq!(exercise(&mut pkg).unwrap(), 1);
        assert!(pkg.is_closed());
    }
}
