use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::models::{
    Complaint, ComplaintStatus, Priority, Product, Rating, Record, Review, Sentiment, User, Vendor,
};
use crate::storage::TableStorage;
use crate::table::Table;

/// State given to users created on the fly during a submission.
pub const DEFAULT_USER_STATE: &str = "Unknown";
/// Stored on a complaint when its product has no FSSAI licence number.
pub const MISSING_FSSAI_CODE: &str = "N/A";

/// The five entity tables, held together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    pub users: Table<User>,
    pub vendors: Table<Vendor>,
    pub products: Table<Product>,
    pub complaints: Table<Complaint>,
    pub reviews: Table<Review>,
}

/// Maps a record type to its slot in [`Tables`].
pub trait Stored: Record {
    fn slot(tables: &Tables) -> &Table<Self>;
    fn slot_mut(tables: &mut Tables) -> &mut Table<Self>;
}

macro_rules! stored {
    ($ty:ty, $field:ident) => {
        impl Stored for $ty {
            fn slot(tables: &Tables) -> &Table<Self> {
                &tables.$field
            }

            fn slot_mut(tables: &mut Tables) -> &mut Table<Self> {
                &mut tables.$field
            }
        }
    };
}

stored!(User, users);
stored!(Vendor, vendors);
stored!(Product, products);
stored!(Complaint, complaints);
stored!(Review, reviews);

pub const TABLE_NAMES: [&str; 5] = [
    User::TABLE,
    Vendor::TABLE,
    Product::TABLE,
    Complaint::TABLE,
    Review::TABLE,
];

/// Who a complaint or review is filed under.
#[derive(Debug, Clone, PartialEq)]
pub enum Submitter {
    /// An existing user id
    Existing(String),
    /// Register a new user with this name as part of the submission
    New(String),
}

#[derive(Debug, Clone)]
pub struct ComplaintForm {
    pub submitter: Submitter,
    pub product_id: String,
    pub text: String,
    pub priority: Priority,
    pub status: ComplaintStatus,
}

#[derive(Debug, Clone)]
pub struct ReviewForm {
    pub submitter: Submitter,
    pub product_id: String,
    pub rating: Rating,
    pub text: String,
    pub sentiment: Sentiment,
}

/// Owns the in-memory tables and writes each one back in full after every
/// change. Single writer only: nothing guards two stores allocating ids
/// from the same files at once.
pub struct RecordStore<S> {
    storage: S,
    tables: Tables,
}

impl<S: TableStorage> RecordStore<S> {
    /// Write a header-only file for every table that does not exist yet.
    /// Returns the names of the tables created.
    pub fn init(storage: &S) -> StoreResult<Vec<&'static str>> {
        let mut created = Vec::new();
        created.extend(init_table::<User, S>(storage)?);
        created.extend(init_table::<Vendor, S>(storage)?);
        created.extend(init_table::<Product, S>(storage)?);
        created.extend(init_table::<Complaint, S>(storage)?);
        created.extend(init_table::<Review, S>(storage)?);
        Ok(created)
    }

    /// Load all five tables. Any missing or unreadable table fails the open.
    pub fn open(storage: S) -> StoreResult<Self> {
        let mut store = Self {
            storage,
            tables: Tables::default(),
        };
        store.reload::<User>()?;
        store.reload::<Vendor>()?;
        store.reload::<Product>()?;
        store.reload::<Complaint>()?;
        store.reload::<Review>()?;
        debug!(storage = %store.storage.describe(), "record store opened");
        Ok(store)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn table<R: Stored>(&self) -> &Table<R> {
        R::slot(&self.tables)
    }

    /// Read one table fresh from storage, ignoring the in-memory copy.
    pub fn load<R: Stored>(&self) -> StoreResult<Table<R>> {
        load::<R, S>(&self.storage)
    }

    /// Replace the in-memory copy of one table with what is on storage.
    pub fn reload<R: Stored>(&mut self) -> StoreResult<()> {
        let fresh = self.load::<R>()?;
        *R::slot_mut(&mut self.tables) = fresh;
        Ok(())
    }

    pub fn next_identifier<R: Stored>(&self) -> StoreResult<String> {
        let id = self.table::<R>().next_identifier()?;
        debug!(table = R::TABLE, id = %id, "identifier allocated");
        Ok(id)
    }

    /// Add `record` as the last row and persist the whole table. If the
    /// write fails the row is taken back out before returning.
    pub fn append<R: Stored>(&mut self, record: R) -> StoreResult<&R> {
        R::slot_mut(&mut self.tables).push(record);
        if let Err(e) = self.persist::<R>() {
            R::slot_mut(&mut self.tables).pop();
            return Err(e);
        }

        let table = R::slot(&self.tables);
        let row = &table.rows()[table.len() - 1];
        info!(table = R::TABLE, id = %row.id(), "record appended");
        Ok(row)
    }

    /// Set one field on the record keyed `key` and persist the whole table.
    pub fn update_field<R: Stored>(
        &mut self,
        key: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<&R> {
        let (index, previous) = R::slot_mut(&mut self.tables).update_field(key, field, value)?;
        if let Err(e) = self.persist::<R>() {
            R::slot_mut(&mut self.tables).restore(index, previous);
            return Err(e);
        }

        info!(table = R::TABLE, key, field, value, "record updated");
        Ok(&R::slot(&self.tables).rows()[index])
    }

    fn persist<R: Stored>(&self) -> StoreResult<()> {
        let bytes = self.table::<R>().encode()?;
        self.storage.write_table(R::TABLE, &bytes).inspect_err(|e| {
            warn!(table = R::TABLE, error = %e, "persist failed");
        })
    }

    // --- Registration ---

    pub fn register_user(&mut self, name: &str, state: Option<&str>) -> StoreResult<User> {
        let name = required("user name", name)?;
        let state = state
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_USER_STATE);

        let user = User {
            user_id: self.next_identifier::<User>()?,
            name: name.to_string(),
            state: state.to_string(),
        };
        self.append(user).cloned()
    }

    pub fn register_vendor(&mut self, name: &str) -> StoreResult<Vendor> {
        let name = required("vendor name", name)?;
        let vendor = Vendor {
            vendor_id: self.next_identifier::<Vendor>()?,
            vendor_name: name.to_string(),
        };
        self.append(vendor).cloned()
    }

    pub fn register_product(
        &mut self,
        name: &str,
        vendor_id: &str,
        fssai_code: Option<&str>,
    ) -> StoreResult<Product> {
        let name = required("product name", name)?;
        if self.tables.vendors.get(vendor_id).is_none() {
            return Err(StoreError::key_not_found(Vendor::TABLE, vendor_id));
        }

        let product = Product {
            product_id: self.next_identifier::<Product>()?,
            product_name: name.to_string(),
            vendor_id: vendor_id.to_string(),
            fssai_code: fssai_code
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        };
        self.append(product).cloned()
    }

    // --- Submissions ---

    pub fn submit_complaint(
        &mut self,
        form: ComplaintForm,
        at: NaiveDateTime,
    ) -> StoreResult<Complaint> {
        self.check_submitter(&form.submitter)?;
        let product = self.product(&form.product_id)?.clone();
        let complaint_id = self.next_identifier::<Complaint>()?;
        let user_id = self.resolve_submitter(form.submitter)?;

        let complaint = Complaint {
            complaint_id,
            user_id,
            product_id: product.product_id,
            vendor_id: product.vendor_id,
            fssai_code: product
                .fssai_code
                .unwrap_or_else(|| MISSING_FSSAI_CODE.to_string()),
            complaint_text: form.text,
            complaint_status: form.status,
            complaint_priority: form.priority,
            complaint_date: at,
            complaint_image_url: String::new(),
        };
        self.append(complaint).cloned()
    }

    pub fn submit_review(&mut self, form: ReviewForm, at: NaiveDateTime) -> StoreResult<Review> {
        self.check_submitter(&form.submitter)?;
        let product = self.product(&form.product_id)?.clone();
        let review_id = self.next_identifier::<Review>()?;
        let user_id = self.resolve_submitter(form.submitter)?;

        let review = Review {
            review_id,
            user_id,
            product_id: product.product_id,
            vendor_id: product.vendor_id,
            rating: form.rating,
            review_text: form.text,
            review_date: at,
            review_sentiment: form.sentiment,
        };
        self.append(review).cloned()
    }

    pub fn set_complaint_status(
        &mut self,
        complaint_id: &str,
        status: ComplaintStatus,
    ) -> StoreResult<Complaint> {
        self.update_field::<Complaint>(complaint_id, "complaint_status", status.as_str())
            .cloned()
    }

    // --- Lookups ---

    pub fn product(&self, product_id: &str) -> StoreResult<&Product> {
        self.tables
            .products
            .get(product_id)
            .ok_or_else(|| StoreError::key_not_found(Product::TABLE, product_id))
    }

    /// First user with this exact name.
    pub fn user_by_name(&self, name: &str) -> Option<&User> {
        self.tables.users.iter().find(|u| u.name == name)
    }

    /// First product with this exact name.
    pub fn product_by_name(&self, name: &str) -> Option<&Product> {
        self.tables.products.iter().find(|p| p.product_name == name)
    }

    /// First vendor with this exact name.
    pub fn vendor_by_name(&self, name: &str) -> Option<&Vendor> {
        self.tables.vendors.iter().find(|v| v.vendor_name == name)
    }

    /// Validate without touching any table.
    fn check_submitter(&self, submitter: &Submitter) -> StoreResult<()> {
        match submitter {
            Submitter::Existing(user_id) => {
                if self.tables.users.get(user_id).is_none() {
                    return Err(StoreError::key_not_found(User::TABLE, user_id.as_str()));
                }
            }
            Submitter::New(name) => {
                required("user name", name)?;
                self.table::<User>().next_identifier()?;
            }
        }
        Ok(())
    }

    fn resolve_submitter(&mut self, submitter: Submitter) -> StoreResult<String> {
        match submitter {
            Submitter::Existing(user_id) => Ok(user_id),
            Submitter::New(name) => Ok(self.register_user(&name, None)?.user_id),
        }
    }
}

fn load<R: Stored, S: TableStorage>(storage: &S) -> StoreResult<Table<R>> {
    let bytes = storage.read_table(R::TABLE)?;
    let table = Table::<R>::decode(&bytes)?;
    debug!(table = R::TABLE, rows = table.len(), "table loaded");
    Ok(table)
}

fn init_table<R: Stored, S: TableStorage>(storage: &S) -> StoreResult<Option<&'static str>> {
    if storage.exists(R::TABLE) {
        return Ok(None);
    }
    let bytes = Table::<R>::default().encode()?;
    storage.write_table(R::TABLE, &bytes)?;
    info!(table = R::TABLE, "table created");
    Ok(Some(R::TABLE))
}

fn required<'a>(what: &str, value: &'a str) -> StoreResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::validation(format!("{} must not be empty", what)));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timestamp;
    use crate::storage::{FileStorage, MemoryStorage};
    use tempfile::tempdir;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, timestamp::FORMAT).unwrap()
    }

    fn empty_store(storage: &MemoryStorage) -> RecordStore<&MemoryStorage> {
        RecordStore::init(&storage).unwrap();
        RecordStore::open(storage).unwrap()
    }

    /// One vendor, two products (one without an FSSAI code), one user.
    fn seeded_store(storage: &MemoryStorage) -> RecordStore<&MemoryStorage> {
        let mut store = empty_store(storage);
        store.register_vendor("Amul").unwrap();
        store
            .register_product("Butter", "V001", Some("10012021000071"))
            .unwrap();
        store.register_product("Lassi", "V001", None).unwrap();
        store.register_user("Asha", Some("Kerala")).unwrap();
        store
    }

    fn complaint_form(submitter: Submitter) -> ComplaintForm {
        ComplaintForm {
            submitter,
            product_id: "P001".to_string(),
            text: "Packet arrived torn".to_string(),
            priority: Priority::Medium,
            status: ComplaintStatus::Pending,
        }
    }

    fn existing(user_id: &str) -> ComplaintForm {
        complaint_form(Submitter::Existing(user_id.to_string()))
    }

    fn review_form(submitter: Submitter) -> ReviewForm {
        ReviewForm {
            submitter,
            product_id: "P002".to_string(),
            rating: Rating::new(4).unwrap(),
            text: "Fresh and cold".to_string(),
            sentiment: Sentiment::Positive,
        }
    }

    #[test]
    fn test_open_fails_when_a_table_is_missing() {
        let storage = MemoryStorage::new();
        storage.insert("users", "user_id,name,state\n");
        let err = RecordStore::open(&storage).err().unwrap();
        assert!(matches!(err, StoreError::StorageUnavailable { table: "vendors", .. }));
    }

    #[test]
    fn test_init_keeps_existing_tables() {
        let storage = MemoryStorage::new();
        storage.insert("users", "user_id,name,state\nU001,Asha,Kerala\n");
        let created = RecordStore::init(&storage).unwrap();
        assert_eq!(created, vec!["vendors", "products", "complaints", "reviews"]);

        let store = RecordStore::open(&storage).unwrap();
        assert_eq!(store.table::<User>().len(), 1);
        assert!(RecordStore::init(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_complaint_ids_follow_on() {
        let storage = MemoryStorage::new();
        let mut store = seeded_store(&storage);

        assert_eq!(store.next_identifier::<Complaint>().unwrap(), "C001");
        let first = store
            .submit_complaint(existing("U001"), at("2024-05-01 10:00:00"))
            .unwrap();
        assert_eq!(first.complaint_id, "C001");
        assert_eq!(store.next_identifier::<Complaint>().unwrap(), "C002");
    }

    #[test]
    fn test_append_then_load_adds_last_row() {
        let storage = MemoryStorage::new();
        let mut store = seeded_store(&storage);
        let before = store.load::<Vendor>().unwrap();

        let vendor = store.register_vendor("Haldiram").unwrap();
        let after = store.load::<Vendor>().unwrap();

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after.rows()[..before.len()], before.rows());
        assert_eq!(after.rows().last(), Some(&vendor));
        assert_eq!(after, *store.table::<Vendor>());
    }

    #[test]
    fn test_load_persist_reload_is_identical() {
        let storage = MemoryStorage::new();
        let mut store = seeded_store(&storage);
        store
            .submit_complaint(existing("U001"), at("2024-05-01 10:00:00"))
            .unwrap();
        let raw = storage.contents("complaints").unwrap();

        let loaded = store.load::<Complaint>().unwrap();
        let bytes = loaded.encode().unwrap();
        assert_eq!(bytes, raw);
        storage.insert("complaints", bytes);
        assert_eq!(store.load::<Complaint>().unwrap(), loaded);
    }

    const COMPLAINT_HEADER: &str = "complaint_id,user_id,product_id,vendor_id,fssai_code,\
        complaint_text,complaint_status,complaint_priority,complaint_date,complaint_image_url\n";

    #[test]
    fn test_update_leaves_other_rows_byte_for_byte() {
        let storage = MemoryStorage::new();
        RecordStore::init(&storage).unwrap();
        let first = "C001,U001,P001,V001,N/A,late,Pending,Low,2024-01-02 08:00:00.123456,\n";
        let second = "C002,U001,P001,V001,N/A,cold,Pending,High,2024-01-03 09:30:00,\n";
        storage.insert("complaints", format!("{COMPLAINT_HEADER}{first}{second}"));
        let mut store = RecordStore::open(&storage).unwrap();

        store.set_complaint_status("C002", ComplaintStatus::Resolved).unwrap();

        let written = String::from_utf8(storage.contents("complaints").unwrap()).unwrap();
        let resolved = second.replace("Pending", "Resolved");
        assert_eq!(written, format!("{COMPLAINT_HEADER}{first}{resolved}"));
    }

    #[test]
    fn test_lowercase_status_in_file_opens_and_counts() {
        let storage = MemoryStorage::new();
        RecordStore::init(&storage).unwrap();
        let row = "C001,U001,P001,V001,N/A,late,resolved,medium,2024-01-02 08:00:00,\n";
        storage.insert("complaints", format!("{COMPLAINT_HEADER}{row}"));

        let store = RecordStore::open(&storage).unwrap();
        let complaint = &store.table::<Complaint>().rows()[0];
        assert_eq!(complaint.complaint_status, ComplaintStatus::Resolved);
        assert_eq!(complaint.complaint_priority, Priority::Medium);
    }

    #[test]
    fn test_extra_column_blocks_open_and_writes_nothing() {
        let storage = MemoryStorage::new();
        RecordStore::init(&storage).unwrap();
        let users = "user_id,name,state,email\nU001,Asha,Kerala,asha@example.in\n";
        storage.insert("users", users);
        let writes = storage.write_count();

        let err = RecordStore::open(&storage).err().unwrap();
        assert!(matches!(err, StoreError::CorruptTable { table: "users", .. }));
        assert_eq!(storage.write_count(), writes);
        assert_eq!(storage.contents("users").unwrap(), users.as_bytes());
    }

    #[test]
    fn test_complaint_copies_vendor_and_fssai_from_product() {
        let storage = MemoryStorage::new();
        let mut store = seeded_store(&storage);

        let with_code = store
            .submit_complaint(existing("U001"), at("2024-05-01 10:00:00"))
            .unwrap();
        assert_eq!(with_code.vendor_id, "V001");
        assert_eq!(with_code.fssai_code, "10012021000071");
        assert_eq!(with_code.complaint_image_url, "");

        let mut form = existing("U001");
        form.product_id = "P002".to_string();
        let without_code = store.submit_complaint(form, at("2024-05-01 11:00:00")).unwrap();
        assert_eq!(without_code.fssai_code, MISSING_FSSAI_CODE);
    }

    #[test]
    fn test_update_status_then_missing_key() {
        let storage = MemoryStorage::new();
        let mut store = seeded_store(&storage);
        store
            .submit_complaint(existing("U001"), at("2024-05-01 10:00:00"))
            .unwrap();

        let updated = store
            .update_field::<Complaint>("C001", "complaint_status", "Resolved")
            .unwrap()
            .clone();
        assert_eq!(updated.complaint_status, ComplaintStatus::Resolved);
        assert_eq!(store.load::<Complaint>().unwrap().rows()[0], updated);

        let before_bytes = storage.contents("complaints").unwrap();
        let writes = storage.write_count();
        let err = store.set_complaint_status("C999", ComplaintStatus::Pending).unwrap_err();
        assert!(matches!(err, StoreError::KeyNotFound { table: "complaints", .. }));
        assert_eq!(storage.write_count(), writes);
        assert_eq!(storage.contents("complaints").unwrap(), before_bytes);
    }

    #[test]
    fn test_status_changes_back_and_forth() {
        let storage = MemoryStorage::new();
        let mut store = seeded_store(&storage);
        store
            .submit_complaint(existing("U001"), at("2024-05-01 10:00:00"))
            .unwrap();

        store.set_complaint_status("C001", ComplaintStatus::Resolved).unwrap();
        let reopened = store.set_complaint_status("C001", ComplaintStatus::Pending).unwrap();
        assert_eq!(reopened.complaint_status, ComplaintStatus::Pending);
    }

    #[test]
    fn test_new_user_review_with_blank_name_is_rejected() {
        let storage = MemoryStorage::new();
        let mut store = seeded_store(&storage);
        let writes = storage.write_count();
        let users_before = store.table::<User>().clone();

        for name in ["", "   "] {
            let err = store
                .submit_review(
                    review_form(Submitter::New(name.to_string())),
                    at("2024-05-02 09:00:00"),
                )
                .unwrap_err();
            assert!(matches!(err, StoreError::ValidationFailure(_)));
        }

        assert_eq!(storage.write_count(), writes);
        assert_eq!(*store.table::<User>(), users_before);
        assert_eq!(store.next_identifier::<User>().unwrap(), "U002");
        assert!(store.table::<Review>().is_empty());
    }

    #[test]
    fn test_new_user_review_registers_user() {
        let storage = MemoryStorage::new();
        let mut store = seeded_store(&storage);

        let review = store
            .submit_review(
                review_form(Submitter::New("  Ravi ".to_string())),
                at("2024-05-02 09:00:00"),
            )
            .unwrap();
        assert_eq!(review.review_id, "R001");
        assert_eq!(review.user_id, "U002");
        assert_eq!(review.vendor_id, "V001");

        let ravi = store.table::<User>().get("U002").unwrap();
        assert_eq!(ravi.name, "Ravi");
        assert_eq!(ravi.state, DEFAULT_USER_STATE);
    }

    #[test]
    fn test_unknown_product_does_not_register_user() {
        let storage = MemoryStorage::new();
        let mut store = seeded_store(&storage);

        let mut form = complaint_form(Submitter::New("Meera".to_string()));
        form.product_id = "P404".to_string();
        let err = store.submit_complaint(form, at("2024-05-01 10:00:00")).unwrap_err();
        assert!(matches!(err, StoreError::KeyNotFound { table: "products", .. }));
        assert_eq!(store.table::<User>().len(), 1);
    }

    #[test]
    fn test_unknown_existing_user_is_rejected() {
        let storage = MemoryStorage::new();
        let mut store = seeded_store(&storage);
        let err = store
            .submit_complaint(existing("U777"), at("2024-05-01 10:00:00"))
            .unwrap_err();
        assert!(matches!(err, StoreError::KeyNotFound { table: "users", .. }));
    }

    #[test]
    fn test_product_requires_known_vendor() {
        let storage = MemoryStorage::new();
        let mut store = empty_store(&storage);
        let err = store.register_product("Ghee", "V001", None).unwrap_err();
        assert!(matches!(err, StoreError::KeyNotFound { table: "vendors", .. }));
        assert!(store.table::<Product>().is_empty());
    }

    #[test]
    fn test_malformed_identifier_blocks_allocation() {
        let storage = MemoryStorage::new();
        RecordStore::init(&storage).unwrap();
        storage.insert("vendors", "vendor_id,vendor_name\nV001,Amul\nVX,Broken\n");
        let mut store = RecordStore::open(&storage).unwrap();

        let err = store.register_vendor("Mother Dairy").unwrap_err();
        assert!(matches!(err, StoreError::MalformedIdentifier { table: "vendors", .. }));
        assert_eq!(store.table::<Vendor>().len(), 2);
    }

    #[test]
    fn test_failed_persist_rolls_back_append() {
        let storage = MemoryStorage::new();
        let mut store = seeded_store(&storage);

        storage.set_fail_writes(true);
        let err = store.register_vendor("Nestle").unwrap_err();
        assert!(matches!(err, StoreError::PersistFailed { table: "vendors", .. }));
        assert_eq!(store.table::<Vendor>().len(), 1);
        assert_eq!(store.next_identifier::<Vendor>().unwrap(), "V002");
    }

    #[test]
    fn test_failed_persist_rolls_back_update() {
        let storage = MemoryStorage::new();
        let mut store = seeded_store(&storage);
        store
            .submit_complaint(existing("U001"), at("2024-05-01 10:00:00"))
            .unwrap();

        storage.set_fail_writes(true);
        assert!(store.set_complaint_status("C001", ComplaintStatus::Resolved).is_err());
        assert_eq!(
            store.table::<Complaint>().rows()[0].complaint_status,
            ComplaintStatus::Pending
        );
    }

    #[test]
    fn test_reload_picks_up_external_writes() {
        let storage = MemoryStorage::new();
        let mut store = seeded_store(&storage);
        storage.insert("users", "user_id,name,state\nU001,Asha,Kerala\nU005,Dev,Goa\n");

        assert_eq!(store.next_identifier::<User>().unwrap(), "U002");
        store.reload::<User>().unwrap();
        assert_eq!(store.next_identifier::<User>().unwrap(), "U006");
    }

    #[test]
    fn test_file_backed_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        RecordStore::init(&storage).unwrap();

        {
            let mut store = RecordStore::open(&storage).unwrap();
            store.register_vendor("Amul").unwrap();
            store.register_product("Butter", "V001", None).unwrap();
            store
                .submit_complaint(
                    complaint_form(Submitter::New("Asha".into())),
                    at("2024-05-01 10:00:00"),
                )
                .unwrap();
        }

        let store = RecordStore::open(&storage).unwrap();
        let complaint = &store.table::<Complaint>().rows()[0];
        assert_eq!(complaint.complaint_id, "C001");
        assert_eq!(complaint.user_id, "U001");
        assert_eq!(complaint.complaint_date, at("2024-05-01 10:00:00"));

        let raw = std::fs::read_to_string(dir.path().join("users.csv")).unwrap();
        assert_eq!(raw, "user_id,name,state\nU001,Asha,Unknown\n");
    }
}
