use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{StoreError, StoreResult};

/// Where whole table files are read from and written to.
///
/// Tables are addressed by name (`"users"`, `"complaints"`, ...). A write
/// always replaces the full contents.
pub trait TableStorage {
    fn read_table(&self, table: &'static str) -> StoreResult<Vec<u8>>;
    fn write_table(&self, table: &'static str, contents: &[u8]) -> StoreResult<()>;
    fn exists(&self, table: &'static str) -> bool;
    fn describe(&self) -> String;
}

/// One CSV file per table inside a data directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", table))
    }

    pub fn create_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }
}

impl TableStorage for FileStorage {
    fn read_table(&self, table: &'static str) -> StoreResult<Vec<u8>> {
        let path = self.path_for(table);
        std::fs::read(&path).map_err(|source| StoreError::StorageUnavailable {
            table,
            path,
            source,
        })
    }

    fn write_table(&self, table: &'static str, contents: &[u8]) -> StoreResult<()> {
        let path = self.path_for(table);
        std::fs::write(&path, contents).map_err(|e| StoreError::PersistFailed {
            table,
            message: format!("{}: {}", path.display(), e),
        })
    }

    fn exists(&self, table: &'static str) -> bool {
        self.path_for(table).is_file()
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Table files kept in memory; used by tests and dry runs.
#[derive(Default)]
pub struct MemoryStorage {
    tables: RefCell<HashMap<&'static str, Vec<u8>>>,
    writes: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `write_table` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    #[cfg(test)]
    pub fn contents(&self, table: &'static str) -> Option<Vec<u8>> {
        self.tables.borrow().get(table).cloned()
    }

    pub fn insert(&self, table: &'static str, contents: impl Into<Vec<u8>>) {
        self.tables.borrow_mut().insert(table, contents.into());
    }

    /// Make every subsequent write fail.
    #[cfg(test)]
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl TableStorage for MemoryStorage {
    fn read_table(&self, table: &'static str) -> StoreResult<Vec<u8>> {
        self.tables
            .borrow()
            .get(table)
            .cloned()
            .ok_or_else(|| StoreError::StorageUnavailable {
                table,
                path: PathBuf::from(format!("memory://{}", table)),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }

    fn write_table(&self, table: &'static str, contents: &[u8]) -> StoreResult<()> {
        if self.fail_writes.get() {
            return Err(StoreError::PersistFailed {
                table,
                message: "writes disabled".to_string(),
            });
        }
        self.tables.borrow_mut().insert(table, contents.to_vec());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn exists(&self, table: &'static str) -> bool {
        self.tables.borrow().contains_key(table)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

impl<S: TableStorage + ?Sized> TableStorage for &S {
    fn read_table(&self, table: &'static str) -> StoreResult<Vec<u8>> {
        (**self).read_table(table)
    }

    fn write_table(&self, table: &'static str, contents: &[u8]) -> StoreResult<()> {
        (**self).write_table(table, contents)
    }

    fn exists(&self, table: &'static str) -> bool {
        (**self).exists(table)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
