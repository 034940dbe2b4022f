//! EVM address format check

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

static EVM_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("address pattern is valid"));

/// True iff `input` is `0x` followed by exactly 40 hex digits, nothing else.
pub fn is_valid_address(input: &str) -> bool {
    EVM_ADDRESS.is_match(input)
}

pub fn validate_address(input: &str) -> Result<(), ValidationError> {
    if is_valid_address(input) {
        Ok(())
    } else {
        Err(ValidationError::InvalidAddress {
            input: input.to_string(),
        })
    }
}
