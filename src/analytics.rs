use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{Complaint, ComplaintStatus, Review};
use crate::store::Tables;
use crate::views::Names;

/// Headline numbers for the whole store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_complaints: usize,
    pub resolved_complaints: usize,
    pub pending_complaints: usize,
    /// Mean review rating rounded to 2 places, 0 with no reviews
    pub average_rating: f64,
    pub total_users: usize,
    pub total_vendors: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorSummary {
    pub vendor_id: String,
    pub vendor_name: String,
    pub total_complaints: usize,
    pub resolved_complaints: usize,
    pub pending_complaints: usize,
    pub average_rating: f64,
}

/// One bar of a top-N chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    pub id: String,
    pub name: String,
    pub value: f64,
}

pub fn kpis(tables: &Tables) -> Kpis {
    let complaints = tables.complaints.rows();
    let (resolved, pending) = status_counts(complaints.iter());
    Kpis {
        total_complaints: complaints.len(),
        resolved_complaints: resolved,
        pending_complaints: pending,
        average_rating: average_rating(tables.reviews.iter()),
        total_users: tables.users.len(),
        total_vendors: tables.vendors.len(),
    }
}

pub fn vendor_summary(tables: &Tables, vendor_id: &str) -> Option<VendorSummary> {
    let vendor = tables.vendors.get(vendor_id)?;
    let complaints: Vec<&Complaint> = tables
        .complaints
        .iter()
        .filter(|c| c.vendor_id == vendor_id)
        .collect();
    let (resolved, _) = status_counts(complaints.iter().copied());

    Some(VendorSummary {
        vendor_id: vendor.vendor_id.clone(),
        vendor_name: vendor.vendor_name.clone(),
        total_complaints: complaints.len(),
        resolved_complaints: resolved,
        pending_complaints: complaints.len() - resolved,
        average_rating: average_rating(tables.reviews.iter().filter(|r| r.vendor_id == vendor_id)),
    })
}

pub fn top_products_by_complaints(tables: &Tables, limit: usize) -> Vec<Ranked> {
    let names = Names::new(tables);
    let counts = count_by(tables.complaints.iter().map(|c| c.product_id.as_str()));
    rank(counts, limit, |id| names.product(id))
}

pub fn top_vendors_by_complaints(tables: &Tables, limit: usize) -> Vec<Ranked> {
    let names = Names::new(tables);
    let counts = count_by(tables.complaints.iter().map(|c| c.vendor_id.as_str()));
    rank(counts, limit, |id| names.vendor(id))
}

/// Products by mean rating; products without reviews are not ranked.
pub fn top_products_by_rating(tables: &Tables, limit: usize) -> Vec<Ranked> {
    let names = Names::new(tables);
    let mut sums: Vec<(&str, (f64, usize))> = Vec::new();
    for review in &tables.reviews {
        let (_, entry) = slot(&mut sums, review.product_id.as_str(), (0.0, 0));
        entry.0 += f64::from(review.rating.value());
        entry.1 += 1;
    }
    let means = sums
        .into_iter()
        .map(|(id, (sum, n))| (id, sum / n as f64))
        .collect();
    rank(means, limit, |id| names.product(id))
}

fn status_counts<'a>(complaints: impl Iterator<Item = &'a Complaint>) -> (usize, usize) {
    complaints.fold((0, 0), |(resolved, pending), c| match c.complaint_status {
        ComplaintStatus::Resolved => (resolved + 1, pending),
        ComplaintStatus::Pending => (resolved, pending + 1),
    })
}

fn average_rating<'a>(reviews: impl Iterator<Item = &'a Review>) -> f64 {
    let (sum, n) = reviews.fold((0u64, 0u64), |(sum, n), r| {
        (sum + u64::from(r.rating.value()), n + 1)
    });
    if n == 0 {
        return 0.0;
    }
    round2(sum as f64 / n as f64)
}

/// Occurrences per key, keys in order of first appearance.
fn count_by<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(&'a str, f64)> {
    let mut counts = Vec::new();
    for key in keys {
        slot(&mut counts, key, 0.0).1 += 1.0;
    }
    counts
}

fn slot<'v, 'a, T>(
    entries: &'v mut Vec<(&'a str, T)>,
    key: &'a str,
    init: T,
) -> &'v mut (&'a str, T) {
    let index = match entries.iter().position(|(k, _)| *k == key) {
        Some(index) => index,
        None => {
            entries.push((key, init));
            entries.len() - 1
        }
    };
    &mut entries[index]
}

/// Highest value first; equal values keep first-seen order. The top `limit`
/// are taken before names are joined, and ids with no matching row are
/// dropped, so fewer than `limit` entries may come back.
fn rank<'a, F>(mut entries: Vec<(&str, f64)>, limit: usize, name_of: F) -> Vec<Ranked>
where
    F: Fn(&str) -> Option<&'a str>,
{
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    entries.truncate(limit);
    entries
        .into_iter()
        .filter_map(|(id, value)| {
            let name = name_of(id)?;
            Some(Ranked {
                id: id.to_string(),
                name: name.to_string(),
                value: round2(value),
            })
        })
        .collect()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
