//! Open parameters for packages and part streams.

use crate::opc::error::{OpcError, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;

/// How a package directory or a part file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileMode {
    /// Create; fail if the target already exists
    CreateNew,
    /// Create; replace the target if it already exists
    Create,
    /// Open; fail if the target is missing
    Open,
    /// Open the target, creating it if missing
    OpenOrCreate,
    /// Open an existing file and truncate it (streams only)
    Truncate,
    /// Open or create a file and seek to its end (streams only)
    Append,
}

impl FileMode {
    /// Whether this mode may create the target.
    pub fn creates(self) -> bool {
        matches!(
            self,
            FileMode::CreateNew | FileMode::Create | FileMode::OpenOrCreate | FileMode::Append
        )
    }

    /// Whether this mode is accepted when opening a package.
    pub fn valid_for_package(self) -> bool {
        matches!(
            self,
            FileMode::CreateNew | FileMode::Create | FileMode::Open | FileMode::OpenOrCreate
        )
    }
}

/// Read/write access requested by a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileAccess {
    Read,
    Write,
    ReadWrite,
}

impl FileAccess {
    #[inline]
    pub fn can_read(self) -> bool {
        matches!(self, FileAccess::Read | FileAccess::ReadWrite)
    }

    #[inline]
    pub fn can_write(self) -> bool {
        matches!(self, FileAccess::Write | FileAccess::ReadWrite)
    }
}

/// Access other handles may hold on the same package concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileShare {
    None,
    Read,
    Write,
    ReadWrite,
}

impl FileShare {
    /// Whether other handles may read while this one is open.
    #[inline]
    pub fn allows_readers(self) -> bool {
        matches!(self, FileShare::Read | FileShare::ReadWrite)
    }
}

/// Configuration for opening a [`DirPackage`](super::DirPackage).
///
/// Defaults to `OpenOrCreate` with read-write access and no sharing.
///
/// # Example
///
/// ```
/// use opc_dirpkg::{FileAccess, FileMode, FileShare, PackageOptions};
///
/// let options = PackageOptions::default()
///     .with_mode(FileMode::Open)
///     .with_access(FileAccess::Read)
///     .with_share(FileShare::Read);
/// assert_eq!(options, PackageOptions::read_only());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageOptions {
    pub mode: FileMode,
    pub access: FileAccess,
    pub share: FileShare,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            mode: FileMode::OpenOrCreate,
            access: FileAccess::ReadWrite,
            share: FileShare::None,
        }
    }
}

impl PackageOptions {
    /// Open an existing package for reading, sharing it with other readers.
    pub fn read_only() -> Self {
        Self {
            mode: FileMode::Open,
            access: FileAccess::Read,
            share: FileShare::Read,
        }
    }

    /// Create a fresh package, replacing any existing one.
    pub fn create() -> Self {
        Self {
            mode: FileMode::Create,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: FileMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_access(mut self, access: FileAccess) -> Self {
        self.access = access;
        self
    }

    pub fn with_share(mut self, share: FileShare) -> Self {
        self.share = share;
        self
    }

    /// Parse options from YAML. Missing keys keep their default value.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml)
            .map_err(|e| OpcError::InvalidArgument(format!("Invalid package options: {}", e)))
    }

    /// Serialize options to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).map_err(|e| {
            OpcError::InvalidArgument(format!("Failed to serialize package options: {}", e))
        })
    }
}

/// Translate a stream mode and access into `std::fs::OpenOptions`.
pub(crate) fn file_open_options(mode: FileMode, access: FileAccess) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.read(access.can_read()).write(access.can_write());
    match mode {
        FileMode::CreateNew => {
            options.create_new(true);
        },
        FileMode::Create => {
            options.create(true).truncate(true);
        },
        FileMode::Open => {},
        FileMode::OpenOrCreate => {
            options.create(true);
        },
        FileMode::Truncate => {
            options.truncate(true);
        },
        FileMode::Append => {
            options.append(true).create(true);
        },
    }
    options
}
