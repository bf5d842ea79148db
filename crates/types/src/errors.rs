use std::fmt;
use thiserror::Error;

// ============================================================================
// Main Error Enum
// ============================================================================

/// Errors raised while decoding, encoding or checking token sale data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenSaleError {
    // ========================================================================
    // Account Layout Errors
    // ========================================================================

    /// Account buffer cannot hold a full sale record
    #[error("Account data too short: expected at least {expected} bytes, got {actual}")]
    AccountDataTooShort { expected: usize, actual: usize },

    /// Initialization flag byte is neither 0 nor 1
    #[error("Invalid is_initialized flag: {0}")]
    InvalidInitializedFlag(u8),

    /// Destination slice has the wrong size for packing
    #[error("Invalid destination length: expected {expected} bytes, got {actual}")]
    InvalidDestinationLength { expected: usize, actual: usize },

    // ========================================================================
    // Instruction Errors
    // ========================================================================

    /// Payload carried no opcode byte
    #[error("Empty instruction data")]
    EmptyInstruction,

    /// Opcode outside the known set
    #[error("Unknown opcode: {0}")]
    UnknownOpcode(u8),

    /// Opcode known to exist whose argument layout is undefined here
    #[error("Opcode {0} is reserved and has no defined payload")]
    ReservedOpcode(u8),

    /// Argument bytes do not match the opcode's shape
    #[error("Invalid instruction data for opcode {opcode}: expected {expected} argument bytes, got {actual}")]
    InvalidInstructionData { opcode: u8, expected: usize, actual: usize },

    // ========================================================================
    // Validation Errors
    // ========================================================================

    /// Decoded account does not match the expected record
    #[error("Sale account mismatch: {}", MismatchList(.0))]
    AccountMismatch(Vec<FieldMismatch>),
}

/// One field whose on-chain value differs from the expected value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMismatch {
    /// Field name as laid out in the account
    pub field: &'static str,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (expected {}, actual {})",
            self.field, self.expected, self.actual
        )
    }
}

struct MismatchList<'a>(&'a [FieldMismatch]);

impl fmt::Display for MismatchList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mismatch) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", mismatch)?;
        }
        Ok(())
    }
}

impl TokenSaleError {
    /// Create a short-buffer error for the sale account layout
    pub fn too_short(expected: usize, actual: usize) -> Self {
        Self::AccountDataTooShort { expected, actual }
    }

    /// Field names of a validation failure, empty for any other error
    pub fn mismatched_fields(&self) -> Vec<&'static str> {
        match self {
            Self::AccountMismatch(mismatches) => mismatches.iter().map(|m| m.field).collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_display_lists_every_field() {
        let err = TokenSaleError::AccountMismatch(vec![
            FieldMismatch {
                field: "price_per_token",
                expected: "7500000".to_string(),
                actual: "8000000".to_string(),
            },
            FieldMismatch {
                field: "phase_start_time",
                expected: "0".to_string(),
                actual: "1700000000".to_string(),
            },
        ]);

        assert_eq!(
            err.to_string(),
            "Sale account mismatch: price_per_token (expected 7500000, actual 8000000); \
             phase_start_time (expected 0, actual 1700000000)"
        );
        assert_eq!(
            err.mismatched_fields(),
            vec!["price_per_token", "phase_start_time"]
        );
    }

    #[test]
    fn test_too_short_display() {
        assert_eq!(
            TokenSaleError::too_short(113, 40).to_string(),
            "Account data too short: expected at least 113 bytes, got 40"
        );
    }
}
