use thiserror::Error;

use crate::client::TxHash;

/// Reasons the entry action is disabled
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryBlocked {
    /// No contract deployment for the connected network
    #[error("no raffle contract on the connected network")]
    ContractUnresolved,

    /// No wallet account available to sign
    #[error("wallet is not connected")]
    WalletNotConnected,

    /// Raffle is calculating a winner, or its phase has not loaded
    #[error("raffle is not open")]
    RaffleNotOpen,

    /// Entrance fee has not loaded
    #[error("entrance fee is unknown")]
    FeeUnknown,

    /// A previous submission is still pending or confirming
    #[error("an entry is already being submitted")]
    SubmissionInFlight,

    /// Connected account is already in the player roster
    #[error("already entered this round")]
    AlreadyEntered,
}

/// Errors that may be returned by the raffle client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RaffleClientError {
    /// Connected chain is not in the network table or has no deployment
    #[error("unsupported network (chain id {0:?})")]
    UnsupportedNetwork(Option<u64>),

    /// No account is connected
    #[error("wallet is not connected")]
    WalletNotConnected,

    /// Node or wallet transport failed
    #[error("transport error: {0}")]
    Transport(String),

    /// User declined signing, or the wallet refused the request
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// Transaction was mined but reverted
    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    /// Contract returned data that does not decode as the expected type
    #[error("invalid return data from {function}")]
    InvalidReturnData {
        /// Contract function whose return data was malformed
        function: &'static str,
    },

    /// Read path was asked to issue a state-changing call
    #[error("{0} is not a read-only call")]
    NotReadOnly(&'static str),

    /// Integer word does not fit the target type
    #[error("value out of range for {function}")]
    ValueOutOfRange {
        /// Contract function whose return value overflowed
        function: &'static str,
    },

    /// String is not a 0x-prefixed 20 byte hex address
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Raffle state outside {OPEN, CALCULATING}
    #[error("invalid raffle state {0}")]
    InvalidRaffleState(u8),

    /// Network table could not be parsed
    #[error("invalid network config: {0}")]
    Config(String),

    /// Entry action is disabled
    #[error("entry blocked: {0}")]
    EntryBlocked(#[from] EntryBlocked),
}

impl From<serde_json::Error> for RaffleClientError {
    fn from(e: serde_json::Error) -> Self {
        RaffleClientError::Config(e.to_string())
    }
}
