// Raffle client - Addresses
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use solana_program::keccak;

use crate::raffle_error::RaffleClientError;

/// A 20 byte account or contract address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize)]
#[serde(try_from = "String")]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const LEN: usize = 20;

    /// The all-zero address, used on-chain as "no value set"
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// EIP-55 mixed-case rendering
    pub fn to_checksum(&self) -> String {
        let lower = hex_lower(&self.0);
        let hash = keccak::hash(lower.as_bytes()).to_bytes();

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl FromStr for Address {
    type Err = RaffleClientError;

    /// Accepts any letter case; the checksum is not enforced
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RaffleClientError::InvalidAddress(s.to_string());

        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(invalid)?;
        if digits.len() != Self::LEN * 2 {
            return Err(invalid());
        }

        let mut bytes = [0u8; 20];
        let raw = digits.as_bytes();
        for (i, byte) in bytes.iter_mut().enumerate() {
            let hi = hex_value(raw[2 * i]).ok_or_else(invalid)?;
            let lo = hex_value(raw[2 * i + 1]).ok_or_else(invalid)?;
            *byte = (hi << 4) | lo;
        }
        Ok(Address(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = RaffleClientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

pub(crate) fn hex_lower(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(DIGITS[(b >> 4) as usize] as char);
        out.push(DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_matches_eip55_vectors() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        ] {
            let address: Address = expected.to_lowercase().parse().unwrap();
            assert_eq!(address.to_checksum(), expected);
        }
    }

    #[test]
    fn parse_ignores_case() {
        let upper: Address = "0xAAAA00000000000000000000000000000000BBBB".parse().unwrap();
        let lower: Address = "0xaaaa00000000000000000000000000000000bbbb".parse().unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse::<Address>().is_err());
        assert!("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeA".parse::<Address>().is_err());
        assert!("0xZZAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse::<Address>().is_err());
    }
}
