use serde::de::DeserializeOwned;
use serde_json::Value;

/// A search row that did not match the expected shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RowDecodeFailure {
    pub index: usize,
    pub reason: String,
}

/// Typed rows plus the ones that could not be decoded.
#[derive(Debug, Clone)]
pub struct DecodedRows<T> {
    pub rows: Vec<T>,
    pub failures: Vec<RowDecodeFailure>,
}

impl<T> DecodedRows<T> {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Decodes opaque search rows into `T`, keeping order.
///
/// Rows that fail to decode are reported in `failures` instead of being
/// dropped silently.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> DecodedRows<T> {
    let mut decoded = DecodedRows {
        rows: Vec::with_capacity(rows.len()),
        failures: Vec::new(),
    };

    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<T>(row) {
            Ok(value) => decoded.rows.push(value),
            Err(e) => {
                tracing::warn!(index, "row skipped: {}", e);
                decoded.failures.push(RowDecodeFailure {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    decoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CampaignRow;
    use serde_json::json;

    #[test]
    fn test_decode_rows_reports_malformed() {
        let rows = vec![
            json!({"campaign": {"id": "1", "name": "Brand"}}),
            json!({"campaign": {"id": 7, "name": ["not", "a", "string"]}}),
            json!({"campaign": {"id": "3", "name": "Generic"}}),
        ];

        let decoded = decode_rows::<CampaignRow>(rows);

        assert_eq!(decoded.rows.len(), 2);
        assert_eq!(decoded.rows[0].campaign.name, "Brand");
        assert_eq!(decoded.rows[1].campaign.id, "3");
        assert_eq!(decoded.failures.len(), 1);
        assert_eq!(decoded.failures[0].index, 1);
        assert!(!decoded.is_clean());
    }

    #[test]
    fn test_decode_rows_empty() {
        let decoded = decode_rows::<CampaignRow>(Vec::new());
        assert!(decoded.rows.is_empty());
        assert!(decoded.is_clean());
    }
}
