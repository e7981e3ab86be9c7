//! # Utility Functions
//!
//! Timestamp helpers shared by hosts and the CLI.

use crate::{error::Result, MarketError};

/// Format timestamp as human-readable string
pub fn format_timestamp(timestamp: u64) -> String {
    use chrono::DateTime;
    let dt = DateTime::from_timestamp(timestamp as i64, 0).unwrap_or_default();
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Parse timestamp from string
pub fn parse_timestamp(timestamp_str: &str) -> Result<u64> {
    timestamp_str
        .parse::<u64>()
        .map_err(|_| MarketError::Validation(format!("Invalid timestamp: {timestamp_str}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp(1735689600), "2025-01-01 00:00:00 UTC");
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("1735689600").unwrap(), 1735689600);
        assert!(parse_timestamp("not-a-number").is_err());
    }
}
