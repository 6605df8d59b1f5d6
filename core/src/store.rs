use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tadisc_common::accessory::{AccessoryRecord, AccessoryStore};
use tracing::debug;

/// Plain-text accessory list, one `<host>: <attributes>` line per device.
pub struct FileAccessoryStore {
    path: PathBuf,
}

impl FileAccessoryStore {
    /// Opens the list at `path`, clearing whatever a previous run left there.
    pub fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path: PathBuf = path.into();
        File::create(&path)?;
        debug!("Cleared accessory file: {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AccessoryStore for FileAccessoryStore {
    fn append(&mut self, records: &[AccessoryRecord]) -> io::Result<()> {
        let file: File = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        for record in records {
            writeln!(writer, "{record}")?;
        }
        writer.flush()?;

        debug!("Wrote {} entries to {}", records.len(), self.path.display());
        Ok(())
    }
}
