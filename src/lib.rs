// Raffle Client
// Reads an EVM raffle contract, enumerates its players, counts down to the
// next draw and submits entries through the user's wallet

// Core modules
pub mod abi;
pub mod address;
pub mod client;
pub mod network;
pub mod utils;

// Raffle modules
pub mod raffle_call;
pub mod raffle_countdown;
pub mod raffle_entry;
pub mod raffle_error;
pub mod raffle_players;
pub mod raffle_reader;
pub mod raffle_session;
pub mod raffle_state;

pub use address::Address;
pub use client::{ChainClient, Receipt, TransactionRequest, TxHash};
pub use network::{Network, NetworkRegistry};
pub use raffle_countdown::{Countdown, CountdownState, SystemClock, UnixClock};
pub use raffle_entry::{entry_gate, EntrySubmitter, TransactionStatus};
pub use raffle_error::{EntryBlocked, RaffleClientError};
pub use raffle_players::PlayerEnumerator;
pub use raffle_reader::ChainReader;
pub use raffle_session::{RaffleSession, RaffleView, SessionConfig};
pub use raffle_state::{has_entered, PlayerRoster, RaffleSnapshot, RaffleState};
