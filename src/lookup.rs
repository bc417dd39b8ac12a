use anyhow::{anyhow, Result};

use crate::models::{Product, Record, User, Vendor};
use crate::storage::TableStorage;
use crate::store::RecordStore;

/// Minimum Jaro-Winkler similarity for a "did you mean" hint.
const SUGGEST_THRESHOLD: f64 = 0.8;

/// Accepts either an id (`P003`) or an exact product name.
pub fn find_product<'a, S: TableStorage>(
    store: &'a RecordStore<S>,
    query: &str,
) -> Result<&'a Product> {
    store
        .table::<Product>()
        .get(query)
        .or_else(|| store.product_by_name(query))
        .ok_or_else(|| {
            not_found(
                Product::TABLE,
                query,
                store.table::<Product>().iter().map(|p| p.product_name.as_str()),
            )
        })
}

pub fn find_vendor<'a, S: TableStorage>(
    store: &'a RecordStore<S>,
    query: &str,
) -> Result<&'a Vendor> {
    store
        .table::<Vendor>()
        .get(query)
        .or_else(|| store.vendor_by_name(query))
        .ok_or_else(|| {
            not_found(
                Vendor::TABLE,
                query,
                store.table::<Vendor>().iter().map(|v| v.vendor_name.as_str()),
            )
        })
}

pub fn find_user<'a, S: TableStorage>(store: &'a RecordStore<S>, query: &str) -> Result<&'a User> {
    store
        .table::<User>()
        .get(query)
        .or_else(|| store.user_by_name(query))
        .ok_or_else(|| {
            not_found(
                User::TABLE,
                query,
                store.table::<User>().iter().map(|u| u.name.as_str()),
            )
        })
}

/// Closest candidate to `query`, if any is close enough.
pub fn suggest<'a>(query: &str, candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let query = query.to_lowercase();
    candidates
        .map(|c| (c, strsim::jaro_winkler(&query, &c.to_lowercase())))
        .filter(|(_, score)| *score >= SUGGEST_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(c, _)| c)
}

fn not_found<'a>(
    table: &str,
    query: &str,
    candidates: impl Iterator<Item = &'a str>,
) -> anyhow::Error {
    match suggest(query, candidates) {
        Some(hint) => anyhow!("No entry '{}' in {} (did you mean '{}'?)", query, table, hint),
        None => anyhow!("No entry '{}' in {}", query, table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store(storage: &MemoryStorage) -> RecordStore<&MemoryStorage> {
        RecordStore::init(&storage).unwrap();
        let mut store = RecordStore::open(storage).unwrap();
        store.register_vendor("Haldiram").unwrap();
        store.register_product("Aloo Bhujia", "V001", None).unwrap();
        store.register_product("Moong Dal", "V001", None).unwrap();
        store.register_user("Asha", None).unwrap();
        store
    }

    #[test]
    fn test_find_by_id_or_name() {
        let storage = MemoryStorage::new();
        let store = store(&storage);
        assert_eq!(find_product(&store, "P002").unwrap().product_name, "Moong Dal");
        assert_eq!(find_product(&store, "Aloo Bhujia").unwrap().product_id, "P001");
        assert_eq!(find_vendor(&store, "Haldiram").unwrap().vendor_id, "V001");
        assert_eq!(find_user(&store, "U001").unwrap().name, "Asha");
    }

    #[test]
    fn test_not_found_suggests_close_name() {
        let storage = MemoryStorage::new();
        let store = store(&storage);
        let err = find_product(&store, "aloo bujia").unwrap_err().to_string();
        assert!(err.contains("did you mean 'Aloo Bhujia'"), "{err}");

        let err = find_vendor(&store, "Zzz").unwrap_err().to_string();
        assert!(!err.contains("did you mean"), "{err}");
    }

    #[test]
    fn test_suggest_picks_best_candidate() {
        let names = ["Paneer", "Paneer Tikka", "Ghee"];
        assert_eq!(suggest("paner", names.into_iter()), Some("Paneer"));
        assert_eq!(suggest("xyz", names.into_iter()), None);
    }
}
