//! Instruction payloads understood by the token sale program
//!
//! Every payload is a one-byte opcode followed by zero or more little-endian
//! `u64` arguments. There is no length prefix or schema negotiation, so the
//! argument order must match what the program reads.

use crate::{
    constants::{OPCODE_LEN, U64_LEN},
    errors::TokenSaleError,
    TokenSaleResult,
};

/// Closed set of opcodes the program dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    StartSale = 0,
    /// Present on chain, payload shape not defined for this client
    Reserved1 = 1,
    Airdrop = 2,
    /// Present on chain, payload shape not defined for this client
    Reserved3 = 3,
}

impl Opcode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Number of `u64` arguments following the opcode, `None` when undefined
    pub fn arg_count(self) -> Option<usize> {
        match self {
            Self::StartSale => Some(4),
            Self::Airdrop => Some(1),
            Self::Reserved1 | Self::Reserved3 => None,
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = TokenSaleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::StartSale),
            1 => Ok(Self::Reserved1),
            2 => Ok(Self::Airdrop),
            3 => Ok(Self::Reserved3),
            other => Err(TokenSaleError::UnknownOpcode(other)),
        }
    }
}

/// Frame an opcode and its arguments
pub fn encode_instruction(opcode: Opcode, args: &[u64]) -> Vec<u8> {
    let mut data = Vec::with_capacity(OPCODE_LEN + args.len() * U64_LEN);
    data.push(opcode.as_u8());
    for arg in args {
        data.extend_from_slice(&arg.to_le_bytes());
    }
    data
}

/// Typed instruction payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSaleInstruction {
    /// Initialize a sale account and hand the escrow to the program
    StartSale {
        price_per_token: u64,
        max_token_price: u64,
        increase_token_price: u64,
        phase_delay_time: u64,
    },

    /// Send tokens from the escrow to the signer without payment
    Airdrop { token_amount: u64 },
}

impl TokenSaleInstruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::StartSale { .. } => Opcode::StartSale,
            Self::Airdrop { .. } => Opcode::Airdrop,
        }
    }

    /// Serialize into program instruction data
    pub fn pack(&self) -> Vec<u8> {
        match *self {
            Self::StartSale {
                price_per_token,
                max_token_price,
                increase_token_price,
                phase_delay_time,
            } => encode_instruction(
                Opcode::StartSale,
                &[
                    price_per_token,
                    max_token_price,
                    increase_token_price,
                    phase_delay_time,
                ],
            ),
            Self::Airdrop { token_amount } => encode_instruction(Opcode::Airdrop, &[token_amount]),
        }
    }

    /// Parse program instruction data
    pub fn unpack(input: &[u8]) -> TokenSaleResult<Self> {
        let (&tag, rest) = input
            .split_first()
            .ok_or(TokenSaleError::EmptyInstruction)?;
        let opcode = Opcode::try_from(tag)?;
        let arg_count = opcode
            .arg_count()
            .ok_or(TokenSaleError::ReservedOpcode(tag))?;

        let expected = arg_count * U64_LEN;
        if rest.len() != expected {
            return Err(TokenSaleError::InvalidInstructionData {
                opcode: tag,
                expected,
                actual: rest.len(),
            });
        }

        let args: Vec<u64> = rest
            .chunks_exact(U64_LEN)
            .map(|chunk| {
                let mut bytes = [0u8; U64_LEN];
                bytes.copy_from_slice(chunk);
                u64::from_le_bytes(bytes)
            })
            .collect();

        Ok(match opcode {
            Opcode::StartSale => Self::StartSale {
                price_per_token: args[0],
                max_token_price: args[1],
                increase_token_price: args[2],
                phase_delay_time: args[3],
            },
            Opcode::Airdrop => Self::Airdrop {
                token_amount: args[0],
            },
            Opcode::Reserved1 | Opcode::Reserved3 => {
                return Err(TokenSaleError::ReservedOpcode(tag))
            }
        })
    }
}
