// Raffle client - Wallet and node interface
use std::fmt;
use std::future::Future;

use crate::{
    address::{hex_lower, Address},
    raffle_error::RaffleClientError,
};

/// 32 byte transaction hash
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TxHash(pub [u8; 32]);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex_lower(&self.0))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self)
    }
}

/// A value-carrying contract call to be signed by the wallet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    /// Value in wei
    pub value: u128,
    pub data: Vec<u8>,
}

/// Outcome of a mined transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub hash: TxHash,
    pub block_number: u64,
    /// false if the transaction reverted
    pub success: bool,
}

/// The wallet and node the client talks through.
///
/// Implemented by the embedding application over whatever wallet library it
/// uses; the client only needs these calls.
pub trait ChainClient: Send + Sync + 'static {
    /// Chain id of the connected network, if any
    fn chain_id(&self) -> Option<u64>;

    /// Currently selected account, if connected
    fn account(&self) -> Option<Address>;

    /// Ask the wallet to connect and return the selected account
    fn connect(&self) -> impl Future<Output = Result<Address, RaffleClientError>> + Send;

    /// Read-only call against `contract`, returning the raw return data
    fn read_contract(
        &self,
        contract: Address,
        calldata: Vec<u8>,
    ) -> impl Future<Output = Result<Vec<u8>, RaffleClientError>> + Send;

    /// Native balance of `address` in wei
    fn balance(&self, address: Address) -> impl Future<Output = Result<u128, RaffleClientError>> + Send;

    /// Hand a transaction to the wallet; resolves once it is signed and broadcast
    fn send_transaction(
        &self,
        request: TransactionRequest,
    ) -> impl Future<Output = Result<TxHash, RaffleClientError>> + Send;

    /// Resolves once the transaction is mined
    fn wait_for_receipt(&self, hash: TxHash) -> impl Future<Output = Result<Receipt, RaffleClientError>> + Send;
}
