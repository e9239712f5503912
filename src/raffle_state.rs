use std::convert::TryFrom;

use crate::{address::Address, raffle_error::RaffleClientError};

/// Phase of the raffle contract
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleState {
    /// Accepting entries
    Open,
    /// Draw in progress, entries blocked
    Calculating,
}

impl TryFrom<u8> for RaffleState {
    type Error = RaffleClientError;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        match val {
            0 => Ok(RaffleState::Open),
            1 => Ok(RaffleState::Calculating),
            other => Err(RaffleClientError::InvalidRaffleState(other)),
        }
    }
}

impl From<RaffleState> for u8 {
    fn from(state: RaffleState) -> Self {
        match state {
            RaffleState::Open => 0,
            RaffleState::Calculating => 1,
        }
    }
}

/// One read of the contract's scalar state.
///
/// Every field is `None` until its read succeeds; a failed read leaves only
/// that field unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RaffleSnapshot {
    /// Entrance fee in wei
    pub entrance_fee: Option<u128>,
    pub number_of_players: Option<u64>,
    /// Raw on-chain value, may be the zero address
    pub recent_winner: Option<Address>,
    pub raffle_state: Option<RaffleState>,
    /// Unix time of the last draw
    pub last_time_stamp: Option<u64>,
    /// Seconds between draws
    pub interval: Option<u64>,
}

impl RaffleSnapshot {
    /// Previous winner; the zero address means no draw has happened yet
    pub fn winner(&self) -> Option<Address> {
        self.recent_winner.filter(|winner| !winner.is_zero())
    }

    pub fn is_open(&self) -> bool {
        self.raffle_state == Some(RaffleState::Open)
    }

    /// Countdown inputs, present only when both have loaded
    pub fn draw_schedule(&self) -> Option<(u64, u64)> {
        Some((self.last_time_stamp?, self.interval?))
    }
}

/// Players of the current round, in contract order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerRoster {
    players: Vec<Address>,
    derived_from: u64,
}

impl PlayerRoster {
    /// `players` must hold exactly `derived_from` entries
    pub(crate) fn new(players: Vec<Address>, derived_from: u64) -> Self {
        debug_assert_eq!(players.len() as u64, derived_from);
        Self {
            players,
            derived_from,
        }
    }

    /// Roster taken as-is, derived from its own length
    pub fn from_players(players: Vec<Address>) -> Self {
        let derived_from = players.len() as u64;
        Self::new(players, derived_from)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn players(&self) -> &[Address] {
        &self.players
    }

    /// Player count this roster was enumerated for
    pub fn derived_from(&self) -> u64 {
        self.derived_from
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Address comparison is over bytes, so letter case never matters
    pub fn contains(&self, account: &Address) -> bool {
        self.players.iter().any(|player| player == account)
    }
}

/// Whether `account` already holds an entry in `roster`
pub fn has_entered(roster: &PlayerRoster, account: Option<&Address>) -> bool {
    match account {
        Some(account) => roster.contains(account),
        None => false,
    }
}
