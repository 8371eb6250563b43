//! The lock resource that arbitrates concurrent opens of one package.
//!
//! Every open package holds an advisory OS lock on `[Package].lock` at its
//! root for its whole lifetime. Writers and non-sharing readers take the lock
//! exclusively, sharing readers take it shared. A contended lock fails the
//! open immediately with [`OpcError::LockConflict`].
//!
//! The lock file itself is never deleted: removing it while another handle
//! holds it would let a third opener lock a fresh file and bypass the check.

use crate::dirpkg::options::{FileMode, PackageOptions};
use crate::opc::constants::reserved;
use crate::opc::error::{OpcError, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Kind of advisory lock held on the lock resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockKind {
    Shared,
    Exclusive,
}

impl LockKind {
    /// Pick the lock kind for a set of open options.
    pub fn for_options(options: &PackageOptions) -> Self {
        if options.access.can_write() || !options.share.allows_readers() {
            LockKind::Exclusive
        } else {
            LockKind::Shared
        }
    }
}

/// A held lock on a package root.
///
/// The lock is released by [`PackageLock::release`] or when this value is
/// dropped, whichever comes first.
#[derive(Debug)]
pub struct PackageLock {
    /// The lock file handle (kept open to maintain the lock)
    file: Option<File>,

    /// Package root the lock guards
    root: PathBuf,

    kind: LockKind,
}

impl PackageLock {
    /// Prepare the package root for `options.mode` and lock it.
    ///
    /// A directory created here is left in place if locking then fails.
    pub fn acquire(root: &Path, options: &PackageOptions) -> Result<Self> {
        Self::prepare_root(root, options.mode)?;

        let lock_path = root.join(reserved::LOCK);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        let kind = LockKind::for_options(options);
        let locked = match kind {
            LockKind::Exclusive => FileExt::try_lock_exclusive(&file),
            LockKind::Shared => FileExt::try_lock_shared(&file),
        };
        if let Err(e) = locked {
            return Err(if is_contended(&e) {
                tracing::debug!(root = %root.display(), ?kind, "package lock contended");
                OpcError::LockConflict {
                    path: root.to_path_buf(),
                    source: e,
                }
            } else {
                OpcError::IoError(e)
            });
        }

        let lock = Self {
            file: Some(file),
            root: root.to_path_buf(),
            kind,
        };

        if options.mode == FileMode::Create {
            lock.clear_root()?;
        }

        tracing::debug!(root = %root.display(), ?kind, "package lock acquired");
        Ok(lock)
    }

    /// Apply the directory half of the open matrix.
    fn prepare_root(root: &Path, mode: FileMode) -> Result<()> {
        match mode {
            FileMode::CreateNew => {
                if root.exists() {
                    return Err(OpcError::AlreadyExists(root.display().to_string()));
                }
                if let Some(parent) = root.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::create_dir(root).map_err(|e| match e.kind() {
                    io::ErrorKind::AlreadyExists => {
                        OpcError::AlreadyExists(root.display().to_string())
                    },
                    _ => OpcError::IoError(e),
                })
            },
            FileMode::Create | FileMode::OpenOrCreate => Ok(fs::create_dir_all(root)?),
            FileMode::Open => {
                if root.is_dir() {
                    Ok(())
                } else {
                    Err(OpcError::NotFound(root.to_path_buf()))
                }
            },
            FileMode::Truncate | FileMode::Append => Err(OpcError::InvalidArgument(format!(
                "{:?} is not a valid package open mode",
                mode
            ))),
        }
    }

    /// Remove everything under the root except the lock file.
    ///
    /// Runs only while the exclusive lock is held, so an existing package is
    /// never wiped out from under another open handle.
    fn clear_root(&self) -> Result<()> {
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_name() == reserved::LOCK {
                continue;
            }
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(entry.path())?;
            } else {
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }

    /// Release the lock. Calling this again is a no-op.
    pub fn release(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(e) = FileExt::unlock(&file) {
                // Closing the handle below drops the lock regardless.
                tracing::warn!(root = %self.root.display(), "failed to unlock package: {}", e);
            }
            tracing::debug!(root = %self.root.display(), "package lock released");
        }
    }

    /// Whether the lock is still held.
    #[inline]
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    #[inline]
    pub fn kind(&self) -> LockKind {
        self.kind
    }
}

impl Drop for PackageLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// Whether a lock error means another handle holds an incompatible lock.
fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
