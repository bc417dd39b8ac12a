use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// A row type stored in its own table file.
///
/// `HEADERS` lists the columns in the order the fields are declared; the
/// header row is written from it, so the two must stay in sync.
pub trait Record: Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned {
    const TABLE: &'static str;
    const PREFIX: &'static str;
    const HEADERS: &'static [&'static str];

    fn id(&self) -> &str;

    /// Set a mutable column from its textual value.
    fn set_field(&mut self, field: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::validation(format!(
            "field '{}' of table '{}' cannot be updated",
            field,
            Self::TABLE
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub vendor_id: String,
    pub vendor_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub vendor_id: String,
    pub fssai_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub complaint_id: String,
    pub user_id: String,
    pub product_id: String,
    pub vendor_id: String, // copied from the product at submission time
    pub fssai_code: String,
    pub complaint_text: String,
    pub complaint_status: ComplaintStatus,
    pub complaint_priority: Priority,
    #[serde(with = "timestamp")]
    pub complaint_date: NaiveDateTime,
    pub complaint_image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: String,
    pub user_id: String,
    pub product_id: String,
    pub vendor_id: String, // copied from the product at submission time
    pub rating: Rating,
    pub review_text: String,
    #[serde(with = "timestamp")]
    pub review_date: NaiveDateTime,
    pub review_sentiment: Sentiment,
}

impl Record for User {
    const TABLE: &'static str = "users";
    const PREFIX: &'static str = "U";
    const HEADERS: &'static [&'static str] = &["user_id", "name", "state"];

    fn id(&self) -> &str {
        &self.user_id
    }
}

impl Record for Vendor {
    const TABLE: &'static str = "vendors";
    const PREFIX: &'static str = "V";
    const HEADERS: &'static [&'static str] = &["vendor_id", "vendor_name"];

    fn id(&self) -> &str {
        &self.vendor_id
    }
}

impl Record for Product {
    const TABLE: &'static str = "products";
    const PREFIX: &'static str = "P";
    const HEADERS: &'static [&'static str] =
        &["product_id", "product_name", "vendor_id", "fssai_code"];

    fn id(&self) -> &str {
        &self.product_id
    }
}

impl Record for Complaint {
    const TABLE: &'static str = "complaints";
    const PREFIX: &'static str = "C";
    const HEADERS: &'static [&'static str] = &[
        "complaint_id",
        "user_id",
        "product_id",
        "vendor_id",
        "fssai_code",
        "complaint_text",
        "complaint_status",
        "complaint_priority",
        "complaint_date",
        "complaint_image_url",
    ];

    fn id(&self) -> &str {
        &self.complaint_id
    }

    fn set_field(&mut self, field: &str, value: &str) -> StoreResult<()> {
        match field {
            "complaint_status" | "status" => {
                self.complaint_status = value.parse()?;
                Ok(())
            }
            _ => Err(StoreError::validation(format!(
                "field '{}' of table '{}' cannot be updated",
                field,
                Self::TABLE
            ))),
        }
    }
}

impl Record for Review {
    const TABLE: &'static str = "reviews";
    const PREFIX: &'static str = "R";
    const HEADERS: &'static [&'static str] = &[
        "review_id",
        "user_id",
        "product_id",
        "vendor_id",
        "rating",
        "review_text",
        "review_date",
        "review_sentiment",
    ];

    fn id(&self) -> &str {
        &self.review_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ComplaintStatus {
    Pending,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "Pending",
            ComplaintStatus::Resolved => "Resolved",
        }
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl FromStr for ComplaintStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ComplaintStatus::Pending),
            "resolved" => Ok(ComplaintStatus::Resolved),
            other => Err(StoreError::validation(format!(
                "unknown status '{}' (expected Pending or Resolved)",
                other
            ))),
        }
    }
}

impl FromStr for Priority {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(StoreError::validation(format!(
                "unknown priority '{}' (expected Low, Medium or High)",
                other
            ))),
        }
    }
}

impl FromStr for Sentiment {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(StoreError::validation(format!(
                "unknown sentiment '{}' (expected Positive, Neutral or Negative)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for ComplaintStatus {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Priority {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Sentiment {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Star rating, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> StoreResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Rating(value))
        } else {
            Err(StoreError::validation(format!(
                "rating {} out of range {}-{}",
                value,
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = StoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> u8 {
        rating.0
    }
}

impl FromStr for Rating {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u8>()
            .map_err(|_| StoreError::validation(format!("rating '{}' is not a number", s)))?;
        Rating::new(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamps are stored as local wall-clock time. Sub-second digits are
/// kept when a file carries them and omitted otherwise.
pub mod timestamp {
    use chrono::{NaiveDateTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    const FRACTIONAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let format = if value.nanosecond() == 0 {
            FORMAT
        } else {
            FRACTIONAL_FORMAT
        };
        serializer.serialize_str(&value.format(format).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let trimmed = raw.trim();
        NaiveDateTime::parse_from_str(trimmed, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(trimmed, FRACTIONAL_FORMAT))
            .map_err(serde::de::Error::custom)
    }
}
