use super::Workbook;
use crate::error::{Result, SheetError};
use crate::storage::{MemoryStore, parse_cells, write_cells};
use cellcalc_engine::engine::ResolveOptions;
use std::path::{Path, PathBuf};

const MAX_SHEET_FILE_BYTES: u64 = 64 * 1_048_576; // 64 MiB

impl Workbook<MemoryStore> {
    /// Open a workbook bound to `path`.
    /// A missing file gives an empty workbook that will be created on save.
    pub fn open(path: &Path, options: ResolveOptions) -> Result<Self> {
        let mut workbook = Self::with_store(MemoryStore::new(), options);
        if path.exists() {
            workbook.load_file(path)?;
        } else {
            workbook.file_path = Some(path.to_path_buf());
        }
        Ok(workbook)
    }

    /// Replace the store contents with a .cells file.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_SHEET_FILE_BYTES {
            return Err(SheetError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Refusing to read {}: sheet file too large ({} bytes, max {})",
                    path.display(),
                    meta.len(),
                    MAX_SHEET_FILE_BYTES
                ),
            )));
        }

        // Parse fully before touching the current store.
        let store = parse_cells(path)?;
        tracing::info!("Loaded {} cells from {}", store.len(), path.display());

        self.store = store;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Save to the current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = &self.file_path else {
            return Err(SheetError::NoFilePath);
        };

        write_cells(path, &self.store)?;
        self.modified = false;
        Ok(path.clone())
    }
}
