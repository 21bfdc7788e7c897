//! Offerability rules.
//!
//! Pure functions over catalog records; nothing here performs I/O and
//! offerability is recomputed on every read rather than cached.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::records::{MedicineRecord, MedicineStatus};

/// A record recipients may request: approved, unexpired, in stock.
pub fn is_offerable(record: &MedicineRecord, today: NaiveDate) -> bool {
    record.status == MedicineStatus::Approved
        && record.expiry_date.map_or(false, |date| date > today)
        && record.quantity_available > 0
}

/// Offerable records in input order.
pub fn filter_offerable(records: &[MedicineRecord], today: NaiveDate) -> Vec<MedicineRecord> {
    records
        .iter()
        .filter(|record| is_offerable(record, today))
        .cloned()
        .collect()
}

/// Quantity of the first offerable record matching `medicine_name`
/// (trimmed, case-insensitive), or 0 when none is left.
pub fn max_requestable(records: &[MedicineRecord], medicine_name: &str, today: NaiveDate) -> i64 {
    let wanted = medicine_name.trim();
    records
        .iter()
        .find(|record| {
            is_offerable(record, today) && record.name.trim().eq_ignore_ascii_case(wanted)
        })
        .map_or(0, |record| record.quantity_available)
}

/// Catalog sort order
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Name, ascending
    Name,
    /// Soonest expiry first; undated records last
    ExpiryDate,
    /// Largest stock first
    QuantityAvailable,
}

/// Stable sort: ties keep their input order.
pub fn sort_by(records: &[MedicineRecord], key: SortKey) -> Vec<MedicineRecord> {
    let mut sorted = records.to_vec();
    match key {
        SortKey::Name => {
            sorted.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
        SortKey::ExpiryDate => {
            sorted.sort_by(|a, b| match (a.expiry_date, b.expiry_date) {
                (Some(left), Some(right)) => left.cmp(&right),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }
        SortKey::QuantityAvailable => {
            sorted.sort_by(|a, b| b.quantity_available.cmp(&a.quantity_available));
        }
    }
    sorted
}

/// Cities with at least one offerable record, for the catalog filter control.
pub fn distinct_cities(records: &[MedicineRecord], today: NaiveDate) -> BTreeSet<String> {
    records
        .iter()
        .filter(|record| is_offerable(record, today))
        .map(|record| record.city.trim())
        .filter(|city| !city.is_empty())
        .map(str::to_string)
        .collect()
}

/// Zero-based page of a record list; out-of-range pages are empty.
pub fn page(records: &[MedicineRecord], page: usize, per_page: usize) -> Vec<MedicineRecord> {
    if per_page == 0 {
        return Vec::new();
    }
    records
        .iter()
        .skip(page.saturating_mul(per_page))
        .take(per_page)
        .cloned()
        .collect()
}
