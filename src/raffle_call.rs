use arrayref::array_ref;

use crate::abi::{self, SELECTOR_LEN, WORD_LEN};

/// Calls understood by the raffle contract
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleCall {
    /// Fixed payment, in wei, required for one entry
    GetEntranceFee,

    /// Number of entries in the current round
    GetNumberOfPlayers,

    /// Winner of the previous draw, or the zero address
    GetRecentWinner,

    /// 0 = OPEN, 1 = CALCULATING
    GetRaffleState,

    /// Unix time of the last draw
    GetLastTimeStamp,

    /// Seconds between draws
    GetInterval,

    /// Player at `index` in the current round
    GetPlayer {
        index: u64,
    },

    /// Payable entry; the transaction value must equal the entrance fee
    EnterRaffle,
}

impl RaffleCall {
    /// Canonical Solidity signature
    pub fn signature(&self) -> &'static str {
        match self {
            Self::GetEntranceFee => "getEntranceFee()",
            Self::GetNumberOfPlayers => "getNumberOfPlayers()",
            Self::GetRecentWinner => "getRecentWinner()",
            Self::GetRaffleState => "getRaffleState()",
            Self::GetLastTimeStamp => "getLastTimeStamp()",
            Self::GetInterval => "getInterval()",
            Self::GetPlayer { .. } => "getPlayer(uint256)",
            Self::EnterRaffle => "enterRaffle()",
        }
    }

    /// Function name, used in errors and logs
    pub fn name(&self) -> &'static str {
        let signature = self.signature();
        match signature.find('(') {
            Some(end) => &signature[..end],
            None => signature,
        }
    }

    pub fn selector(&self) -> [u8; 4] {
        abi::selector(self.signature())
    }

    pub fn is_read_only(&self) -> bool {
        !matches!(self, Self::EnterRaffle)
    }

    /// Packs the call into contract calldata
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(SELECTOR_LEN + WORD_LEN);
        buf.extend_from_slice(&self.selector());
        if let Self::GetPlayer { index } = *self {
            buf.extend_from_slice(&abi::encode_uint(index as u128));
        }
        buf
    }

    /// Unpacks contract calldata into a RaffleCall
    pub fn unpack(input: &[u8]) -> Option<Self> {
        if input.len() < SELECTOR_LEN {
            return None;
        }
        let (selector, rest) = input.split_at(SELECTOR_LEN);

        let call = Self::ALL_FIXED
            .iter()
            .copied()
            .find(|call| call.selector() == selector);
        if call.is_some() {
            return call;
        }

        let get_player = Self::GetPlayer { index: 0 };
        if selector == get_player.selector() {
            if rest.len() < WORD_LEN {
                return None;
            }
            let index = abi::decode_u64(array_ref![rest, 0, WORD_LEN], "getPlayer").ok()?;
            return Some(Self::GetPlayer { index });
        }
        None
    }

    const ALL_FIXED: [RaffleCall; 7] = [
        Self::GetEntranceFee,
        Self::GetNumberOfPlayers,
        Self::GetRecentWinner,
        Self::GetRaffleState,
        Self::GetLastTimeStamp,
        Self::GetInterval,
        Self::EnterRaffle,
    ];
}
