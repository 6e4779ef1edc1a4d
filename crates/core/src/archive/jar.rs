use super::{ArchiveContainer, ArchiveOpener};
use classpool_api::{ResolverError, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;
use zip::ZipArchive;

/// Opens jar/zip archives.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipOpener;

impl ArchiveOpener for ZipOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn ArchiveContainer>> {
        Ok(Box::new(ZipContainer::open(path)?))
    }
}

pub struct ZipContainer {
    path: PathBuf,
    archive: Mutex<Option<ZipArchive<File>>>,
}

impl ZipContainer {
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path).map_err(|e| ResolverError::io(path, e))?;

        // Detect format via magic bytes before handing the file to the zip reader
        let mut magic = [0u8; 4];
        let read = file
            .read(&mut magic)
            .map_err(|e| ResolverError::io(path, e))?;
        if read < 2 || magic[..2] != [0x50, 0x4B] {
            return Err(ResolverError::archive(path, "not a zip archive"));
        }
        file.seek(SeekFrom::Start(0))
            .map_err(|e| ResolverError::io(path, e))?;

        let archive = ZipArchive::new(file).map_err(|e| ResolverError::archive(path, e))?;
        debug!("Opened {} ({} entries)", path.display(), archive.len());

        Ok(Self {
            path: path.to_path_buf(),
            archive: Mutex::new(Some(archive)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Option<ZipArchive<File>>> {
        self.archive.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn closed(&self) -> std::io::Error {
        std::io::Error::other(format!("archive {} is closed", self.path.display()))
    }
}

impl ArchiveContainer for ZipContainer {
    fn path(&self) -> &Path {
        &self.path
    }

    fn entry_names(&self) -> std::io::Result<Vec<String>> {
        let mut guard = self.lock();
        let archive = guard.as_mut().ok_or_else(|| self.closed())?;

        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive.by_index(i).map_err(std::io::Error::other)?;
            if !entry.is_dir() {
                names.push(entry.name().to_string());
            }
        }
        Ok(names)
    }

    fn read_entry(&self, entry: &str) -> std::io::Result<Vec<u8>> {
        let mut guard = self.lock();
        let archive = guard.as_mut().ok_or_else(|| self.closed())?;

        let mut file = archive.by_name(entry).map_err(std::io::Error::other)?;
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn close(&self) -> std::io::Result<()> {
        // Dropping the archive closes the file descriptor
        if self.lock().take().is_some() {
            debug!("Closed {}", self.path.display());
        }
        Ok(())
    }
}
