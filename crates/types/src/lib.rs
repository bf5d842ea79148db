/// Shared types for the token sale client
///
/// This crate owns everything that has a defined binary format:
/// - the fixed 113-byte sale account layout
/// - the opcode-tagged instruction payloads
/// - field-by-field comparison of decoded sale state

pub mod account;
pub mod constants;
pub mod errors;
pub mod instruction;
pub mod validation;

// Re-export all public types
pub use account::*;
pub use constants::*;
pub use errors::*;
pub use instruction::*;
pub use validation::*;

/// Result type alias using the shared error type
pub type TokenSaleResult<T> = std::result::Result<T, TokenSaleError>;
