//! opc-dirpkg - Directory-backed storage for Open Packaging Convention packages
//!
//! This library stores the parts of an OPC container (the packaging used by
//! .docx, .xlsx and .pptx files) as plain files in a directory instead of a
//! zip archive, keeping the `[Content_Types].xml` table consistent and
//! arbitrating concurrent opens of the same directory.
//!
//! Relationships and package properties are not interpreted here: a
//! container model serializes them itself and stores them as ordinary parts
//! through the [`PartStorageBackend`] contract.
//!
//! # Example - Writing and reading a package
//!
//! ```no_run
//! use opc_dirpkg::{DirPackage, FileAccess, FileMode, PackURI, PackageOptions};
//! use std::io::{Read, Write};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let part = PackURI::new("/word/document.xml")?;
//!
//! let mut pkg = DirPackage::open("report", PackageOptions::create())?;
//! pkg.create_part(&part, "application/xml")?;
//! let mut stream = pkg.open_stream(&part, FileMode::Create, FileAccess::Write)?;
//! stream.write_all(b"<document/>")?;
//! stream.close()?;
//! pkg.close()?;
//!
//! let mut pkg = DirPackage::open("report", PackageOptions::read_only())?;
//! for record in pkg.list_parts()? {
//!     println!("{} ({})", record.partname(), record.content_type());
//! }
//! let mut xml = String::new();
//! pkg.open_stream(&part, FileMode::Open, FileAccess::Read)?
//!     .read_to_string(&mut xml)?;
//! # Ok(())
//! # }
//! ```

/// Shared helpers
pub mod common;

/// Directory package storage
pub mod dirpkg;

/// OPC part names, content types and errors
pub mod opc;

// Re-export commonly used types for convenience
pub use dirpkg::{
    DirPackage, FileAccess, FileMode, FileShare, PackageOptions, PartRecord, PartStorageBackend,
    PartStream,
};
pub use opc::{ContentTypesTable, ErrorKind, OpcError, PackURI, Result};
