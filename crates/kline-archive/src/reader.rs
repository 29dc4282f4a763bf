//! Single-entry zip archive reading.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use kline_types::{KlineError, Result, Trade};

use crate::TradeLines;

/// A daily trade archive: a zip holding exactly one CSV entry.
#[derive(Debug)]
pub struct TradeArchive {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
}

impl TradeArchive {
    /// Opens the archive at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened and
    /// [`KlineError::Structural`] if it is not a zip with exactly one entry.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let archive = ZipArchive::new(BufReader::new(file))
            .map_err(|e| KlineError::structural(path, e.to_string()))?;

        if archive.len() != 1 {
            return Err(KlineError::structural(
                path,
                format!("expected exactly one entry, found {}", archive.len()),
            ));
        }

        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    /// Returns the archive path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the name of the single entry.
    ///
    /// # Errors
    ///
    /// Returns [`KlineError::Structural`] if the entry cannot be read.
    pub fn entry_name(&mut self) -> Result<String> {
        let entry = self
            .archive
            .by_index(0)
            .map_err(|e| KlineError::structural(&self.path, e.to_string()))?;
        Ok(entry.name().to_string())
    }

    /// Streams the trades of the entry in file order.
    ///
    /// # Errors
    ///
    /// Returns [`KlineError::Structural`] if the entry cannot be opened.
    /// Line-level failures are reported by the iterator.
    pub fn trades(&mut self) -> Result<TradeLines<impl BufRead + '_>> {
        let source = self.path.display().to_string();
        let entry = self
            .archive
            .by_index(0)
            .map_err(|e| KlineError::structural(&self.path, e.to_string()))?;
        Ok(TradeLines::new(BufReader::new(entry), source))
    }

    /// Returns the last trade of the entry, or `None` if it holds no trade.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be read or its last line is
    /// malformed.
    pub fn last_trade(&mut self) -> Result<Option<Trade>> {
        self.trades()?.last_trade()
    }
}
