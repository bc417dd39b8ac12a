use crate::error::{StoreError, StoreResult};
use crate::ident;
use crate::models::Record;

/// In-memory copy of one table, rows in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    rows: Vec<R>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R: Record> Table<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&R> {
        self.rows.iter().find(|r| r.id() == key)
    }

    pub fn next_identifier(&self) -> StoreResult<String> {
        ident::next_identifier(R::TABLE, R::PREFIX, self.rows.iter().map(|r| r.id()))
    }

    pub(crate) fn push(&mut self, record: R) {
        self.rows.push(record);
    }

    pub(crate) fn pop(&mut self) -> Option<R> {
        self.rows.pop()
    }

    /// Apply `field = value` to the first row whose key matches.
    /// Returns the row index and the row as it was before the change.
    pub(crate) fn update_field(
        &mut self,
        key: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<(usize, R)> {
        let index = self
            .rows
            .iter()
            .position(|r| r.id() == key)
            .ok_or_else(|| StoreError::key_not_found(R::TABLE, key))?;

        let previous = self.rows[index].clone();
        let mut updated = previous.clone();
        updated.set_field(field, value)?;
        self.rows[index] = updated;
        Ok((index, previous))
    }

    pub(crate) fn restore(&mut self, index: usize, row: R) {
        if let Some(slot) = self.rows.get_mut(index) {
            *slot = row;
        }
    }

    /// Parse a whole table file. An empty file is an empty table.
    ///
    /// The header row must hold exactly the columns in `R::HEADERS`, in any
    /// order. Extra columns are refused because `encode` could not write
    /// them back.
    pub fn decode(bytes: &[u8]) -> StoreResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);

        let headers = reader.headers().map_err(|e| corrupt::<R>(&e))?.clone();
        if !headers.is_empty() {
            for column in R::HEADERS {
                if !headers.iter().any(|h| h == *column) {
                    return Err(bad_header::<R>(format!("missing column '{}'", column)));
                }
            }
            if let Some(extra) = headers.iter().find(|h| !R::HEADERS.iter().any(|c| c == h)) {
                return Err(bad_header::<R>(format!("unexpected column '{}'", extra)));
            }
        }

        let rows = reader
            .deserialize::<R>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| corrupt::<R>(&e))?;
        Ok(Self { rows })
    }

    /// Render the whole table, header row first.
    pub fn encode(&self) -> StoreResult<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer.write_record(R::HEADERS).map_err(|e| persist::<R>(&e))?;
        for row in &self.rows {
            writer.serialize(row).map_err(|e| persist::<R>(&e))?;
        }
        writer
            .into_inner()
            .map_err(|e| persist::<R>(&e.to_string()))
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

fn corrupt<R: Record>(e: &csv::Error) -> StoreError {
    let message = match e.position() {
        Some(pos) => format!("line {}: {}", pos.line(), e),
        None => e.to_string(),
    };
    StoreError::CorruptTable {
        table: R::TABLE,
        message,
    }
}

fn bad_header<R: Record>(message: String) -> StoreError {
    StoreError::CorruptTable {
        table: R::TABLE,
        message,
    }
}

fn persist<R: Record>(e: &dyn std::fmt::Display) -> StoreError {
    StoreError::PersistFailed {
        table: R::TABLE,
        message: e.to_string(),
    }
}
