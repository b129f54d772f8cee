use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ReportError, Result};

// ── Extraction method ─────────────────────────────────────────────────────────

/// How input files are turned into records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMethod {
    /// Structural parsing: HTML DOM for ranking pages, tag scanning for FIX logs.
    Parse,
    /// Regular-expression scan over the raw file contents.
    Regex,
}

impl FromStr for ExtractMethod {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "parse" => Ok(ExtractMethod::Parse),
            "regex" => Ok(ExtractMethod::Regex),
            other => Err(ReportError::InvalidMethod(other.to_string())),
        }
    }
}

impl fmt::Display for ExtractMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractMethod::Parse => f.write_str("parse"),
            ExtractMethod::Regex => f.write_str("regex"),
        }
    }
}

// ── Baby names ────────────────────────────────────────────────────────────────

/// Which ranking column a name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
}

impl Gender {
    /// Capitalised label used in report titles.
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// One row of a yearly ranking table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankRow {
    pub rank: u32,
    pub male: String,
    pub female: String,
}

/// All ranking rows extracted from a single year's page, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearTable {
    pub year: u16,
    pub rows: Vec<RankRow>,
}

/// A flattened `(gender, year, name, rank)` record, the unit stored in the
/// rank cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRankRecord {
    pub gender: Gender,
    pub year: u16,
    pub name: String,
    pub rank: u32,
}

// ── FIX order status ──────────────────────────────────────────────────────────

/// FIX 4.2 `OrdStatus` (tag 39) values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrdStatus {
    New,
    PartiallyFilled,
    Filled,
    DoneForDay,
    Canceled,
    Replaced,
    PendingCancel,
    Stopped,
    Rejected,
    Suspended,
    PendingNew,
    Calculated,
    Expired,
    AcceptedForBidding,
    PendingReplace,
}

impl OrdStatus {
    pub const ALL: [OrdStatus; 15] = [
        OrdStatus::New,
        OrdStatus::PartiallyFilled,
        OrdStatus::Filled,
        OrdStatus::DoneForDay,
        OrdStatus::Canceled,
        OrdStatus::Replaced,
        OrdStatus::PendingCancel,
        OrdStatus::Stopped,
        OrdStatus::Rejected,
        OrdStatus::Suspended,
        OrdStatus::PendingNew,
        OrdStatus::Calculated,
        OrdStatus::Expired,
        OrdStatus::AcceptedForBidding,
        OrdStatus::PendingReplace,
    ];

    /// The single-character wire value carried in tag 39.
    pub fn code(self) -> char {
        match self {
            OrdStatus::New => '0',
            OrdStatus::PartiallyFilled => '1',
            OrdStatus::Filled => '2',
            OrdStatus::DoneForDay => '3',
            OrdStatus::Canceled => '4',
            OrdStatus::Replaced => '5',
            OrdStatus::PendingCancel => '6',
            OrdStatus::Stopped => '7',
            OrdStatus::Rejected => '8',
            OrdStatus::Suspended => '9',
            OrdStatus::PendingNew => 'A',
            OrdStatus::Calculated => 'B',
            OrdStatus::Expired => 'C',
            OrdStatus::AcceptedForBidding => 'D',
            OrdStatus::PendingReplace => 'E',
        }
    }

    /// Look a status up by its wire value.
    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// The kebab-case name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            OrdStatus::New => "new",
            OrdStatus::PartiallyFilled => "partially-filled",
            OrdStatus::Filled => "filled",
            OrdStatus::DoneForDay => "done-for-day",
            OrdStatus::Canceled => "canceled",
            OrdStatus::Replaced => "replaced",
            OrdStatus::PendingCancel => "pending-cancel",
            OrdStatus::Stopped => "stopped",
            OrdStatus::Rejected => "rejected",
            OrdStatus::Suspended => "suspended",
            OrdStatus::PendingNew => "pending-new",
            OrdStatus::Calculated => "calculated",
            OrdStatus::Expired => "expired",
            OrdStatus::AcceptedForBidding => "accepted-for-bidding",
            OrdStatus::PendingReplace => "pending-replace",
        }
    }

    /// Human-readable label used in report rows.
    pub fn label(self) -> &'static str {
        match self {
            OrdStatus::New => "New",
            OrdStatus::PartiallyFilled => "Partially Filled",
            OrdStatus::Filled => "Filled",
            OrdStatus::DoneForDay => "Done For Day",
            OrdStatus::Canceled => "Canceled",
            OrdStatus::Replaced => "Replaced",
            OrdStatus::PendingCancel => "Pending Cancel",
            OrdStatus::Stopped => "Stopped",
            OrdStatus::Rejected => "Rejected",
            OrdStatus::Suspended => "Suspended",
            OrdStatus::PendingNew => "Pending New",
            OrdStatus::Calculated => "Calculated",
            OrdStatus::Expired => "Expired",
            OrdStatus::AcceptedForBidding => "Accepted For Bidding",
            OrdStatus::PendingReplace => "Pending Replace",
        }
    }

    /// The full `39=<code>` tag as it appears in a message.
    pub fn tag(self) -> String {
        format!("39={}", self.code())
    }
}

impl FromStr for OrdStatus {
    type Err = ReportError;

    /// Accepts the kebab-case name (case-insensitive, `_` allowed in place of
    /// `-`, `cancelled` as an alias) or the raw single-character code.
    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(status) = OrdStatus::from_code(c.to_ascii_uppercase()) {
                return Ok(status);
            }
        }

        let normalised = trimmed.to_lowercase().replace('_', "-");
        let normalised = if normalised == "cancelled" {
            "canceled".to_string()
        } else {
            normalised
        };
        Self::ALL
            .into_iter()
            .find(|s| s.name() == normalised)
            .ok_or_else(|| ReportError::InvalidStatus(value.to_string()))
    }
}

impl fmt::Display for OrdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Number of execution reports seen for one order status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCount {
    pub status: OrdStatus,
    pub count: u64,
}

/// The final cumulative quantity filled for a single order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFill {
    /// Tag 11 (`ClOrdID`).
    pub order_id: String,
    /// Largest tag 14 (`CumQty`) seen across the order's execution reports.
    pub cumulative_qty: u64,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_method_from_str() {
        assert_eq!("parse".parse::<ExtractMethod>().unwrap(), ExtractMethod::Parse);
        assert_eq!("REGEX".parse::<ExtractMethod>().unwrap(), ExtractMethod::Regex);
        assert!(matches!(
            "soup".parse::<ExtractMethod>(),
            Err(ReportError::InvalidMethod(_))
        ));
    }

    #[test]
    fn test_ord_status_codes_are_unique() {
        let mut codes: Vec<char> = OrdStatus::ALL.iter().map(|s| s.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), OrdStatus::ALL.len());
    }

    #[test]
    fn test_ord_status_from_name() {
        assert_eq!("filled".parse::<OrdStatus>().unwrap(), OrdStatus::Filled);
        assert_eq!(
            "Partially_Filled".parse::<OrdStatus>().unwrap(),
            OrdStatus::PartiallyFilled
        );
        assert_eq!("cancelled".parse::<OrdStatus>().unwrap(), OrdStatus::Canceled);
    }

    #[test]
    fn test_ord_status_from_code() {
        assert_eq!("2".parse::<OrdStatus>().unwrap(), OrdStatus::Filled);
        assert_eq!("a".parse::<OrdStatus>().unwrap(), OrdStatus::PendingNew);
        assert_eq!(OrdStatus::from_code('E'), Some(OrdStatus::PendingReplace));
        assert_eq!(OrdStatus::from_code('Z'), None);
    }

    #[test]
    fn test_ord_status_invalid() {
        let err = "bogus".parse::<OrdStatus>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid order status: bogus");
    }

    #[test]
    fn test_ord_status_tag() {
        assert_eq!(OrdStatus::Canceled.tag(), "39=4");
        assert_eq!(OrdStatus::Calculated.tag(), "39=B");
    }

    #[test]
    fn test_name_rank_record_serializes_gender_code() {
        let record = NameRankRecord {
            gender: Gender::Female,
            year: 1990,
            name: "Jessica".to_string(),
            rank: 1,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"gender\":\"f\""));
        let back: NameRankRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
