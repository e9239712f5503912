// Raffle client - Contract ABI words
use arrayref::{array_ref, array_refs};
use solana_program::keccak;

use crate::{address::Address, raffle_error::RaffleClientError};

pub const WORD_LEN: usize = 32;
pub const SELECTOR_LEN: usize = 4;

/// First four bytes of keccak256 over the canonical function signature
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak::hash(signature.as_bytes()).to_bytes();
    *array_ref![hash, 0, SELECTOR_LEN]
}

/// Big-endian, left padded uint256 word
pub fn encode_uint(value: u128) -> [u8; 32] {
    let mut word = [0u8; WORD_LEN];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Address word: 12 zero bytes followed by the address
pub fn encode_address(address: &Address) -> [u8; 32] {
    let mut word = [0u8; WORD_LEN];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

fn first_word<'a>(data: &'a [u8], function: &'static str) -> Result<&'a [u8; 32], RaffleClientError> {
    if data.len() < WORD_LEN {
        return Err(RaffleClientError::InvalidReturnData { function });
    }
    Ok(array_ref![data, 0, WORD_LEN])
}

/// Decode a uint256 return word that must fit in a u128
pub fn decode_u128(data: &[u8], function: &'static str) -> Result<u128, RaffleClientError> {
    let word = first_word(data, function)?;
    let (high, low) = array_refs![word, 16, 16];
    if high.iter().any(|b| *b != 0) {
        return Err(RaffleClientError::ValueOutOfRange { function });
    }
    Ok(u128::from_be_bytes(*low))
}

/// Decode a uint256 return word that must fit in a u64
pub fn decode_u64(data: &[u8], function: &'static str) -> Result<u64, RaffleClientError> {
    let value = decode_u128(data, function)?;
    u64::try_from(value).map_err(|_| RaffleClientError::ValueOutOfRange { function })
}

/// Decode a uint8 (or enum) return word
pub fn decode_u8(data: &[u8], function: &'static str) -> Result<u8, RaffleClientError> {
    let value = decode_u128(data, function)?;
    u8::try_from(value).map_err(|_| RaffleClientError::ValueOutOfRange { function })
}

/// Decode an address return word; the 12 padding bytes must be zero
pub fn decode_address(data: &[u8], function: &'static str) -> Result<Address, RaffleClientError> {
    let word = first_word(data, function)?;
    let (padding, address) = array_refs![word, 12, 20];
    if padding.iter().any(|b| *b != 0) {
        return Err(RaffleClientError::InvalidReturnData { function });
    }
    Ok(Address::new(*address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_match_known_signatures() {
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn uint_word_overflow_is_rejected() {
        let mut word = [0u8; 32];
        word[0] = 1;
        assert_eq!(
            decode_u128(&word, "getEntranceFee"),
            Err(RaffleClientError::ValueOutOfRange { function: "getEntranceFee" })
        );
        assert_eq!(
            decode_u64(&encode_uint(u64::MAX as u128 + 1), "getInterval"),
            Err(RaffleClientError::ValueOutOfRange { function: "getInterval" })
        );
    }

    #[test]
    fn short_return_data_is_invalid() {
        assert!(matches!(
            decode_address(&[0u8; 31], "getPlayer"),
            Err(RaffleClientError::InvalidReturnData { .. })
        ));
    }

    #[test]
    fn dirty_address_padding_is_invalid() {
        let mut word = encode_address(&Address::new([7u8; 20]));
        assert_eq!(decode_address(&word, "getRecentWinner"), Ok(Address::new([7u8; 20])));
        word[0] = 1;
        assert!(decode_address(&word, "getRecentWinner").is_err());
    }
}
