//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! This module handles reading a package's members into memory and writing
//! them back out. Member order is preserved, so `[Content_Types].xml` stays
//! the first entry of a rewritten package.

use crate::ooxml::error::{OoxmlError, Result};
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// In-memory physical package: every member of the ZIP container, in
/// archive order.
#[derive(Debug, Clone, Default)]
pub struct PhysPkg {
    members: Vec<(String, Vec<u8>)>,
}

impl PhysPkg {
    /// Create an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an OPC package from a file path.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or isn't a valid ZIP file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(OoxmlError::PartNotFound(path.display().to_string()));
        }

        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Read an OPC package from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Read an OPC package from owned bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut members = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut blob = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut blob)?;
            members.push((name, blob));
        }

        Ok(Self { members })
    }

    /// Get the content of a member.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, blob)| blob.as_slice())
    }

    /// Get the content of a member, failing if it is absent.
    pub fn blob_for(&self, name: &str) -> Result<&[u8]> {
        self.get(name)
            .ok_or_else(|| OoxmlError::PartNotFound(name.to_string()))
    }

    /// Check if a specific member exists in the package.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Replace a member's content, appending the member if it is new.
    pub fn insert(&mut self, name: impl Into<String>, blob: Vec<u8>) {
        let name = name.into();
        match self.members.iter_mut().find(|(member, _)| *member == name) {
            Some((_, existing)) => *existing = blob,
            None => self.members.push((name, blob)),
        }
    }

    /// List all member names in archive order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(name, _)| name.as_str())
    }

    /// Get the number of members in the package.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the package is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Write every member with Deflate compression.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, blob) in &self.members {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(blob)?;
        }

        Ok(zip.finish()?)
    }

    /// Serialize the package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Write the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(std::io::BufWriter::new(file))?.flush()?;
        Ok(())
    }
}
