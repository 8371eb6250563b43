//! The content-types table of a package.
//!
//! Implements the OPC content type discovery algorithm using Default and
//! Override entries, and reads and writes the `[Content_Types].xml` document
//! that persists them.

use crate::common::xml::escape_attr;
use crate::opc::constants::namespace;
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::{PackURI, normalize_key};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Content type table for looking up content types by part name or extension.
///
/// Both maps are keyed by [`normalize_key`]; the value keeps the name as it
/// was first registered so the document round-trips with its original casing.
#[derive(Debug, Default)]
pub struct ContentTypesTable {
    /// Maps file extensions to (extension, default content type)
    defaults: HashMap<String, (String, String)>,

    /// Maps specific partnames to (partname, override content type)
    overrides: HashMap<String, (String, String)>,

    /// Set whenever an entry is added, changed or removed since load/flush
    dirty: bool,
}

impl ContentTypesTable {
    /// Create a new empty content type table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from `[Content_Types].xml` bytes.
    ///
    /// Empty input yields an empty table. The returned table is clean.
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut table = Self::new();
        table.load(xml)?;
        Ok(table)
    }

    /// Replace the contents of this table with the entries of a document.
    ///
    /// Uses quick-xml for streaming parsing. `Default` and `Override`
    /// elements missing a required attribute are skipped.
    pub fn load(&mut self, xml: &[u8]) -> Result<()> {
        self.defaults.clear();
        self.overrides.clear();
        self.dirty = false;

        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut seen_root = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let name = e.local_name();
                    if !seen_root {
                        if name.as_ref() != b"Types" {
                            return Err(OpcError::MalformedDocument(format!(
                                "unexpected root element <{}>",
                                String::from_utf8_lossy(name.as_ref())
                            )));
                        }
                        seen_root = true;
                    } else {
                        match name.as_ref() {
                            b"Default" => {
                                match Self::read_pair(&reader, e, b"Extension")? {
                                    Some((ext, ct)) if !ext.is_empty() => {
                                        self.defaults.insert(normalize_key(&ext), (ext, ct));
                                    },
                                    _ => tracing::warn!("skipping incomplete Default entry"),
                                }
                            },
                            b"Override" => match Self::read_pair(&reader, e, b"PartName")? {
                                Some((partname, ct)) => {
                                    self.overrides
                                        .insert(normalize_key(&partname), (partname, ct));
                                },
                                None => tracing::warn!("skipping incomplete Override entry"),
                            },
                            _ => {},
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::MalformedDocument(format!(
                        "Content types parse error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        tracing::debug!(
            defaults = self.defaults.len(),
            overrides = self.overrides.len(),
            "loaded content types"
        );
        Ok(())
    }

    /// Read the key attribute and `ContentType` attribute of an entry element.
    fn read_pair(
        reader: &Reader<&[u8]>,
        e: &BytesStart<'_>,
        key_attr: &[u8],
    ) -> Result<Option<(String, String)>> {
        let mut key = None;
        let mut content_type = None;

        for attr in e.attributes() {
            let attr = attr?;
            let value = attr
                .decode_and_unescape_value(reader.decoder())
                .map_err(|e| OpcError::MalformedDocument(e.to_string()))?;
            match attr.key.as_ref() {
                k if k == key_attr => key = Some(value.into_owned()),
                b"ContentType" => content_type = Some(value.into_owned()),
                _ => {},
            }
        }

        Ok(key.zip(content_type))
    }

    /// Register the content type of a part.
    ///
    /// Extensionless parts always get an override. Otherwise the first content
    /// type seen for an extension becomes its default, and a part whose type
    /// differs from that default gets an override.
    pub fn add_content_type(&mut self, partname: &PackURI, content_type: &str) {
        let ext = partname.ext();
        if ext.is_empty() {
            self.set_override(partname, content_type);
            return;
        }

        let ext_key = normalize_key(ext);
        match self.defaults.get(&ext_key) {
            Some((_, existing)) if normalize_key(existing) != normalize_key(content_type) => {
                self.set_override(partname, content_type);
            },
            Some(_) => {
                self.delete_override(partname);
            },
            None => {
                self.defaults
                    .insert(ext_key, (ext.to_string(), content_type.to_string()));
                self.dirty = true;
                self.delete_override(partname);
            },
        }
    }

    fn set_override(&mut self, partname: &PackURI, content_type: &str) {
        let key = partname.key();
        if let Some((_, existing)) = self.overrides.get(&key)
            && existing == content_type
        {
            return;
        }
        self.overrides.insert(
            key,
            (partname.as_str().to_string(), content_type.to_string()),
        );
        self.dirty = true;
    }

    /// Get the content type for a partname.
    ///
    /// First checks for an override, then falls back to the default
    /// based on file extension.
    pub fn content_type(&self, partname: &PackURI) -> Option<&str> {
        if let Some((_, ct)) = self.overrides.get(&partname.key()) {
            return Some(ct);
        }

        let ext = partname.ext();
        if ext.is_empty() {
            return None;
        }
        self.defaults.get(&normalize_key(ext)).map(|(_, ct)| ct.as_str())
    }

    /// Get the default content type registered for an extension.
    pub fn default_for(&self, ext: &str) -> Option<&str> {
        self.defaults.get(&normalize_key(ext)).map(|(_, ct)| ct.as_str())
    }

    /// Get the override content type registered for a partname.
    pub fn override_for(&self, partname: &PackURI) -> Option<&str> {
        self.overrides.get(&partname.key()).map(|(_, ct)| ct.as_str())
    }

    /// Remove the override entry of a partname, if any.
    ///
    /// Returns true if an entry was removed.
    pub fn delete_override(&mut self, partname: &PackURI) -> bool {
        let removed = self.overrides.remove(&partname.key()).is_some();
        self.dirty |= removed;
        removed
    }

    /// Whether the table changed since it was loaded or last flushed.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the table as persisted.
    #[inline]
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Number of default entries.
    pub fn default_count(&self) -> usize {
        self.defaults.len()
    }

    /// Number of override entries.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Serialize the table if it is dirty.
    ///
    /// Returns `None` for a clean table, in which case nothing needs writing.
    pub fn serialize(&self) -> Option<String> {
        self.dirty.then(|| self.to_xml())
    }

    /// Generate the XML for `[Content_Types].xml`.
    ///
    /// Defaults come before overrides, each sorted by key so the output is
    /// deterministic.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(
            256 + 96 * (self.defaults.len() + self.overrides.len()),
        );

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<Types xmlns=""#);
        xml.push_str(namespace::OPC_CONTENT_TYPES);
        xml.push_str(r#"">"#);
        xml.push('\n');

        let mut exts: Vec<_> = self.defaults.keys().collect();
        exts.sort();
        for key in exts {
            let (ext, content_type) = &self.defaults[key];
            xml.push_str(&format!(
                r#"  <Default Extension="{}" ContentType="{}"/>"#,
                escape_attr(ext),
                escape_attr(content_type)
            ));
            xml.push('\n');
        }

        let mut partnames: Vec<_> = self.overrides.keys().collect();
        partnames.sort();
        for key in partnames {
            let (partname, content_type) = &self.overrides[key];
            xml.push_str(&format!(
                r#"  <Override PartName="{}" ContentType="{}"/>"#,
                escape_attr(partname),
                escape_attr(content_type)
            ));
            xml.push('\n');
        }

        xml.push_str("</Types>");

        xml
    }
}
