//! Filesystem-directory storage for OPC packages.
//!
//! A drop-in alternative to zip-archive storage: each part is a plain file
//! under the package root, the content-types table is kept in
//! `[Content_Types].xml`, and an advisory lock on `[Package].lock` keeps
//! concurrent opens of the same directory compatible.
//!
//! The pieces, leaf first:
//!
//! - `mapper`: partname validation and partname/path conversion
//! - `lock`: the package lock held for a handle's lifetime
//! - `store`: part files plus content-type bookkeeping
//! - `properties`: buffered writes of the core-properties part
//! - `package`: [`DirPackage`], the open/flush/close sequence
//! - `backend`: the [`PartStorageBackend`] contract a container model drives

pub mod backend;
pub mod lock;
pub mod mapper;
pub mod options;
pub mod package;
pub mod properties;
pub mod store;

pub use backend::{PartRecord, PartStorageBackend, PartStream};
pub use lock::{LockKind, PackageLock};
pub use options::{FileAccess, FileMode, FileShare, PackageOptions};
pub use package::DirPackage;
