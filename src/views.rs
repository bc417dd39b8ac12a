use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{Complaint, ComplaintStatus, Priority, Rating, Review, Sentiment};
use crate::store::Tables;

/// Shown wherever a stored id no longer resolves to a row.
pub const UNKNOWN_NAME: &str = "?";

/// id -> display name lookups, built fresh from the current tables.
pub struct Names<'a> {
    users: HashMap<&'a str, &'a str>,
    products: HashMap<&'a str, &'a str>,
    vendors: HashMap<&'a str, &'a str>,
}

impl<'a> Names<'a> {
    pub fn new(tables: &'a Tables) -> Self {
        // First row wins on duplicate ids.
        let mut users = HashMap::new();
        for u in &tables.users {
            users.entry(u.user_id.as_str()).or_insert(u.name.as_str());
        }
        let mut products = HashMap::new();
        for p in &tables.products {
            products
                .entry(p.product_id.as_str())
                .or_insert(p.product_name.as_str());
        }
        let mut vendors = HashMap::new();
        for v in &tables.vendors {
            vendors
                .entry(v.vendor_id.as_str())
                .or_insert(v.vendor_name.as_str());
        }
        Self {
            users,
            products,
            vendors,
        }
    }

    pub fn user(&self, id: &str) -> Option<&'a str> {
        self.users.get(id).copied()
    }

    pub fn product(&self, id: &str) -> Option<&'a str> {
        self.products.get(id).copied()
    }

    pub fn vendor(&self, id: &str) -> Option<&'a str> {
        self.vendors.get(id).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplaintRow {
    pub complaint_id: String,
    pub user_name: String,
    pub product_name: String,
    pub vendor_name: String,
    pub fssai_code: String,
    pub text: String,
    pub status: ComplaintStatus,
    pub priority: Priority,
    #[serde(with = "crate::models::timestamp")]
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRow {
    pub review_id: String,
    pub user_name: String,
    pub product_name: String,
    pub vendor_name: String,
    pub rating: Rating,
    pub text: String,
    pub sentiment: Sentiment,
    #[serde(with = "crate::models::timestamp")]
    pub date: NaiveDateTime,
}

impl ComplaintRow {
    pub fn resolve(complaint: &Complaint, names: &Names) -> Self {
        Self {
            complaint_id: complaint.complaint_id.clone(),
            user_name: or_unknown(names.user(&complaint.user_id)),
            product_name: or_unknown(names.product(&complaint.product_id)),
            vendor_name: or_unknown(names.vendor(&complaint.vendor_id)),
            fssai_code: complaint.fssai_code.clone(),
            text: complaint.complaint_text.clone(),
            status: complaint.complaint_status,
            priority: complaint.complaint_priority,
            date: complaint.complaint_date,
        }
    }
}

impl ReviewRow {
    pub fn resolve(review: &Review, names: &Names) -> Self {
        Self {
            review_id: review.review_id.clone(),
            user_name: or_unknown(names.user(&review.user_id)),
            product_name: or_unknown(names.product(&review.product_id)),
            vendor_name: or_unknown(names.vendor(&review.vendor_id)),
            rating: review.rating,
            text: review.review_text.clone(),
            sentiment: review.review_sentiment,
            date: review.review_date,
        }
    }
}

fn or_unknown(name: Option<&str>) -> String {
    name.unwrap_or(UNKNOWN_NAME).to_string()
}

/// All complaints in table order, optionally filtered by status.
pub fn complaint_rows(tables: &Tables, status: Option<ComplaintStatus>) -> Vec<ComplaintRow> {
    let names = Names::new(tables);
    tables
        .complaints
        .iter()
        .filter(|c| status.is_none_or(|s| c.complaint_status == s))
        .map(|c| ComplaintRow::resolve(c, &names))
        .collect()
}

pub fn review_rows(tables: &Tables) -> Vec<ReviewRow> {
    let names = Names::new(tables);
    tables
        .reviews
        .iter()
        .map(|r| ReviewRow::resolve(r, &names))
        .collect()
}

/// The `limit` newest complaints, newest first.
pub fn recent_complaints(tables: &Tables, limit: usize) -> Vec<ComplaintRow> {
    let mut rows = complaint_rows(tables, None);
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows.truncate(limit);
    rows
}

/// Complaints filed against a vendor, by the vendor id copied onto each
/// complaint when it was submitted.
pub fn vendor_complaints(tables: &Tables, vendor_id: &str) -> Vec<ComplaintRow> {
    let names = Names::new(tables);
    tables
        .complaints
        .iter()
        .filter(|c| c.vendor_id == vendor_id)
        .map(|c| ComplaintRow::resolve(c, &names))
        .collect()
}

pub fn vendor_reviews(tables: &Tables, vendor_id: &str) -> Vec<ReviewRow> {
    let names = Names::new(tables);
    tables
        .reviews
        .iter()
        .filter(|r| r.vendor_id == vendor_id)
        .map(|r| ReviewRow::resolve(r, &names))
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDateTime;

    use crate::models::{
        Complaint, ComplaintStatus, Priority, Product, Rating, Review, Sentiment, User, Vendor,
        timestamp,
    };
    use crate::store::Tables;
    use crate::table::Table;

    pub fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, timestamp::FORMAT).unwrap()
    }

    pub fn complaint(
        id: &str,
        user: &str,
        product: &str,
        vendor: &str,
        status: ComplaintStatus,
        date: &str,
    ) -> Complaint {
        Complaint {
            complaint_id: id.to_string(),
            user_id: user.to_string(),
            product_id: product.to_string(),
            vendor_id: vendor.to_string(),
            fssai_code: "N/A".to_string(),
            complaint_text: format!("complaint {}", id),
            complaint_status: status,
            complaint_priority: Priority::Medium,
            complaint_date: at(date),
            complaint_image_url: String::new(),
        }
    }

    pub fn review(id: &str, product: &str, vendor: &str, rating: u8) -> Review {
        Review {
            review_id: id.to_string(),
            user_id: "U001".to_string(),
            product_id: product.to_string(),
            vendor_id: vendor.to_string(),
            rating: Rating::new(rating).unwrap(),
            review_text: format!("review {}", id),
            review_date: at("2024-04-01 12:00:00"),
            review_sentiment: Sentiment::Neutral,
        }
    }

    pub fn user(id: &str, name: &str, state: &str) -> User {
        User {
            user_id: id.to_string(),
            name: name.to_string(),
            state: state.to_string(),
        }
    }

    pub fn vendor(id: &str, name: &str) -> Vendor {
        Vendor {
            vendor_id: id.to_string(),
            vendor_name: name.to_string(),
        }
    }

    pub fn product(id: &str, name: &str, vendor: &str) -> Product {
        Product {
            product_id: id.to_string(),
            product_name: name.to_string(),
            vendor_id: vendor.to_string(),
            fssai_code: None,
        }
    }

    /// Two vendors, three products, two users, a handful of complaints and
    /// reviews. C005 points at a user that does not exist.
    pub fn tables() -> Tables {
        use ComplaintStatus::{Pending, Resolved};

        Tables {
            users: Table::new(vec![
                user("U001", "Asha", "Kerala"),
                user("U002", "Ravi", "Punjab"),
            ]),
            vendors: Table::new(vec![
                vendor("V001", "Amul"),
                vendor("V002", "Haldiram"),
            ]),
            products: Table::new(vec![
                product("P001", "Butter", "V001"),
                product("P002", "Bhujia", "V002"),
                product("P003", "Lassi", "V001"),
            ]),
            complaints: Table::new(vec![
                complaint("C001", "U001", "P001", "V001", Pending, "2024-03-01 09:00:00"),
                complaint("C002", "U002", "P002", "V002", Resolved, "2024-03-04 09:00:00"),
                complaint("C003", "U001", "P001", "V001", Resolved, "2024-03-02 09:00:00"),
                complaint("C004", "U002", "P003", "V001", Pending, "2024-03-06 09:00:00"),
                complaint("C005", "U404", "P002", "V002", Pending, "2024-03-03 09:00:00"),
            ]),
            reviews: Table::new(vec![
                review("R001", "P001", "V001", 4),
                review("R002", "P002", "V002", 5),
                review("R003", "P001", "V001", 3),
                review("R004", "P003", "V001", 5),
            ]),
        }
    }
}
