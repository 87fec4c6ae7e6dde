//! Input validation for the public wallet operations
//!
//! Everything here runs before a store connection is acquired.

use uuid::Uuid;

use crate::error::{WalletError, WalletResult};

/// Idempotency keys are opaque caller-supplied strings, capped at 255 bytes.
pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 255;

/// Parse a caller-supplied user id into the account id it names.
pub fn parse_user_id(user_id: &str) -> WalletResult<Uuid> {
    if user_id.trim().is_empty() {
        return Err(WalletError::validation("user_id must not be empty"));
    }
    Uuid::parse_str(user_id)
        .map_err(|_| WalletError::validation(format!("user_id is not a valid id: {}", user_id)))
}

pub fn validate_asset_code(asset_code: &str) -> WalletResult<()> {
    if asset_code.trim().is_empty() {
        return Err(WalletError::validation("asset_code must not be empty"));
    }
    Ok(())
}

pub fn validate_amount(amount: i64) -> WalletResult<()> {
    if amount <= 0 {
        return Err(WalletError::validation(format!(
            "amount must be a positive integer, got {}",
            amount
        )));
    }
    Ok(())
}

pub fn validate_idempotency_key(key: Option<&str>) -> WalletResult<()> {
    if let Some(key) = key
        && key.len() > MAX_IDEMPOTENCY_KEY_LEN
    {
        return Err(WalletError::validation(format!(
            "idempotency_key exceeds {} bytes",
            MAX_IDEMPOTENCY_KEY_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id_valid() {
        let id = Uuid::from_u128(0xDEADBEEF);
        assert_eq!(parse_user_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_parse_user_id_empty() {
        assert!(matches!(
            parse_user_id(""),
            Err(WalletError::Validation(_))
        ));
        assert!(matches!(
            parse_user_id("   "),
            Err(WalletError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_user_id_malformed() {
        assert!(matches!(
            parse_user_id("not-a-uuid"),
            Err(WalletError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_asset_code() {
        assert!(validate_asset_code("GOLD_COINS").is_ok());
        assert!(validate_asset_code("").is_err());
        assert!(validate_asset_code("  ").is_err());
    }

    #[test]
    fn test_validate_amount_rejects_zero_and_negative() {
        assert!(validate_amount(1).is_ok());
        assert!(validate_amount(i64::MAX).is_ok());
        assert!(validate_amount(0).is_err());
        assert!(validate_amount(-500).is_err());
    }

    #[test]
    fn test_validate_idempotency_key_boundary() {
        assert!(validate_idempotency_key(None).is_ok());
        assert!(validate_idempotency_key(Some(&"k".repeat(255))).is_ok());
        assert!(validate_idempotency_key(Some(&"k".repeat(256))).is_err());
    }
}
