//! Part files and content-type bookkeeping under a package root.

use crate::dirpkg::backend::PartRecord;
use crate::dirpkg::mapper;
use crate::dirpkg::options::{FileAccess, FileMode, file_open_options};
use crate::opc::constants::reserved;
use crate::opc::content_types::ContentTypesTable;
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::PackURI;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Maps part operations onto files under a root directory, keeping the
/// content-types table in step with the files.
///
/// A file counts as a part only while a content type resolves for its
/// partname; files without one are invisible to lookup and enumeration.
#[derive(Debug)]
pub struct PartStore {
    root: PathBuf,
    content_types: ContentTypesTable,

    /// Full on-disk table kept alongside a write-only session's table.
    /// Receives the same mutations and is what gets persisted, so entries
    /// the session cannot see survive its flush.
    persisted: Option<ContentTypesTable>,
}

impl PartStore {
    /// Create a store with an empty content-types table.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            content_types: ContentTypesTable::new(),
            persisted: None,
        }
    }

    /// Create a store and load the content-types document under `root`.
    ///
    /// A missing or empty document loads as an empty table.
    pub fn load(root: PathBuf) -> Result<Self> {
        let content_types = read_content_types(&root)?;
        Ok(Self {
            root,
            content_types,
            persisted: None,
        })
    }

    /// Create a store for a session that cannot read the package.
    ///
    /// Lookups see only parts registered through this store, but flushing
    /// writes them on top of the document already on disk.
    pub fn load_write_only(root: PathBuf) -> Result<Self> {
        let persisted = read_content_types(&root)?;
        Ok(Self {
            root,
            content_types: ContentTypesTable::new(),
            persisted: Some(persisted),
        })
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn content_types(&self) -> &ContentTypesTable {
        &self.content_types
    }

    /// Get the backing path of a valid partname.
    pub fn path_for(&self, partname: &PackURI) -> Result<PathBuf> {
        mapper::validate(partname)?;
        Ok(mapper::to_path(&self.root, partname))
    }

    /// Create an empty part file and register its content type.
    ///
    /// Intermediate directories are created as needed. A stray file at the
    /// path that is not a part (no content type resolves) is truncated.
    pub fn create_part(&mut self, partname: &PackURI, content_type: &str) -> Result<PartRecord> {
        let path = self.path_for(partname)?;
        if content_type.is_empty() {
            return Err(OpcError::InvalidArgument(format!(
                "no content type given for '{}'",
                partname
            )));
        }
        if self.get_part(partname)?.is_some() {
            return Err(OpcError::AlreadyExists(partname.to_string()));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        File::create(&path)?;
        self.content_types.add_content_type(partname, content_type);
        if let Some(persisted) = &mut self.persisted {
            persisted.add_content_type(partname, content_type);
        }

        tracing::debug!(%partname, content_type, "created part");
        Ok(PartRecord::new(
            partname.clone(),
            content_type.to_string(),
            path,
        ))
    }

    /// Look up a part by partname.
    pub fn get_part(&self, partname: &PackURI) -> Result<Option<PartRecord>> {
        let path = self.path_for(partname)?;
        if !path.is_file() {
            return Ok(None);
        }

        Ok(self
            .content_types
            .content_type(partname)
            .map(|ct| PartRecord::new(partname.clone(), ct.to_string(), path)))
    }

    /// Delete a part's file and its override entry.
    ///
    /// The override is removed even when no file existed. Directories left
    /// empty by the deletion are pruned, up to the package root.
    pub fn delete_part(&mut self, partname: &PackURI) -> Result<()> {
        let path = self.path_for(partname)?;

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(%partname, "deleted part");
                self.prune_empty_dirs(&path);
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {},
            Err(e) => return Err(e.into()),
        }

        self.content_types.delete_override(partname);
        if let Some(persisted) = &mut self.persisted {
            persisted.delete_override(partname);
        }
        Ok(())
    }

    fn prune_empty_dirs(&self, path: &Path) {
        let mut dir = path.parent();
        while let Some(current) = dir {
            if current == self.root || !current.starts_with(&self.root) {
                break;
            }
            if fs::remove_dir(current).is_err() {
                break;
            }
            dir = current.parent();
        }
    }

    /// Enumerate every part, sorted by partname.
    pub fn list_parts(&self) -> Result<Vec<PartRecord>> {
        let mut parts = Vec::new();

        for entry in WalkDir::new(&self.root).min_depth(1) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.depth() == 1
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(mapper::is_reserved_name)
            {
                continue;
            }

            let Some(partname) = mapper::to_partname(&self.root, entry.path()) else {
                continue;
            };
            if mapper::validate(&partname).is_err() {
                continue;
            }
            if let Some(record) = self.get_part(&partname)? {
                parts.push(record);
            }
        }

        parts.sort_by(|a, b| a.partname().cmp(b.partname()));
        Ok(parts)
    }

    /// Open a part's backing file directly.
    pub fn open_file(&self, partname: &PackURI, mode: FileMode, access: FileAccess) -> Result<File> {
        let path = self.path_for(partname)?;
        if mode.creates()
            && let Some(parent) = path.parent()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(file_open_options(mode, access).open(&path)?)
    }

    /// Write the content-types document if the table changed.
    ///
    /// Returns true if the document was written.
    pub fn flush_content_types(&mut self) -> Result<bool> {
        let table = match &mut self.persisted {
            Some(persisted) => persisted,
            None => &mut self.content_types,
        };
        let Some(xml) = table.serialize() else {
            return Ok(false);
        };

        fs::write(self.root.join(reserved::CONTENT_TYPES), xml)?;
        table.mark_clean();
        tracing::debug!(
            defaults = table.default_count(),
            overrides = table.override_count(),
            "wrote content types"
        );
        self.content_types.mark_clean();
        Ok(true)
    }
}

fn read_content_types(root: &Path) -> Result<ContentTypesTable> {
    match fs::read(root.join(reserved::CONTENT_TYPES)) {
        Ok(xml) => ContentTypesTable::from_xml(&xml),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ContentTypesTable::new()),
        Err(e) => Err(e.into()),
    }
}
