//! # Backup Document
//!
//! Export/import format for moving the shop's data between machines or
//! keeping a safety copy.
//!
//! ## Format
//! ```json
//! {
//!   "products":  [ ... ],
//!   "sales":     [ ... ],
//!   "purchases": [ ... ],
//!   "exportedAt": "2026-10-19T08:30:00Z",
//!   "version": "1.0"
//! }
//! ```
//!
//! ## Import Flow
//! ```text
//! file contents ──► Backup::from_json ──► (user confirms) ──► DataStore::import_backup
//!                        │
//!                        └── any of products/sales/purchases missing or not
//!                            an array → CoreError::InvalidBackup, nothing touched
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Product, Purchase, Sale};
use crate::BACKUP_VERSION;

const COLLECTION_KEYS: [&str; 3] = ["products", "sales", "purchases"];

/// A full snapshot of the three collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Backup {
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub purchases: Vec<Purchase>,
    /// Older or hand-made files may omit it.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    BACKUP_VERSION.to_string()
}

impl Backup {
    /// Snapshot taken at `exported_at`.
    pub fn new(
        products: Vec<Product>,
        sales: Vec<Sale>,
        purchases: Vec<Purchase>,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Backup {
            products,
            sales,
            purchases,
            exported_at: Some(exported_at),
            version: default_version(),
        }
    }

    /// Parses and validates an uploaded backup file.
    ///
    /// The three collection keys are checked before any typed parsing so the
    /// error names the missing piece.
    pub fn from_json(contents: &str) -> CoreResult<Self> {
        let value: Value = serde_json::from_str(contents)
            .map_err(|e| CoreError::InvalidBackup(format!("not valid JSON: {}", e)))?;

        let object = value
            .as_object()
            .ok_or_else(|| CoreError::InvalidBackup("expected a JSON object".to_string()))?;

        for key in COLLECTION_KEYS {
            match object.get(key) {
                Some(Value::Array(_)) => {}
                Some(_) => {
                    return Err(CoreError::InvalidBackup(format!(
                        "`{}` must be an array",
                        key
                    )))
                }
                None => {
                    return Err(CoreError::InvalidBackup(format!(
                        "missing `{}` collection",
                        key
                    )))
                }
            }
        }

        serde_json::from_value(value).map_err(|e| CoreError::InvalidBackup(e.to_string()))
    }

    /// Pretty-printed JSON, as offered for download.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Download name: `backup-<slug>-<YYYY-MM-DD>.json`.
    pub fn file_name(slug: &str, date: NaiveDate) -> String {
        format!("backup-{}-{}.json", slug, date.format("%Y-%m-%d"))
    }

    pub fn record_count(&self) -> usize {
        self.products.len() + self.sales.len() + self.purchases.len()
    }
}
