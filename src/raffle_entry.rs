use std::sync::{Arc, Mutex, PoisonError};

use log::{info, warn};
use tokio::{
    sync::{watch, Notify},
    task::JoinHandle,
};

use crate::{
    address::Address,
    client::{ChainClient, TransactionRequest, TxHash},
    raffle_call::RaffleCall,
    raffle_error::{EntryBlocked, RaffleClientError},
    raffle_reader::ChainReader,
    raffle_state::{has_entered, PlayerRoster, RaffleSnapshot},
};

/// Progress of an entry transaction
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Handed to the wallet for signing
    Pending,
    /// Broadcast, waiting to be mined
    Confirming(TxHash),
    /// Mined successfully
    Confirmed(TxHash),
    /// Rejected by the wallet, or reverted on-chain
    Failed(String),
}

impl TransactionStatus {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirming(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed(_) | Self::Failed(_))
    }
}

/// Checks every precondition of the entry action and returns the fee to pay
pub fn entry_gate(
    contract: Option<Address>,
    account: Option<&Address>,
    snapshot: &RaffleSnapshot,
    roster: &PlayerRoster,
    status: &TransactionStatus,
) -> Result<u128, EntryBlocked> {
    if contract.is_none() {
        return Err(EntryBlocked::ContractUnresolved);
    }
    if account.is_none() {
        return Err(EntryBlocked::WalletNotConnected);
    }
    if !snapshot.is_open() {
        return Err(EntryBlocked::RaffleNotOpen);
    }
    let fee = snapshot.entrance_fee.ok_or(EntryBlocked::FeeUnknown)?;
    if status.is_in_flight() {
        return Err(EntryBlocked::SubmissionInFlight);
    }
    if has_entered(roster, account) {
        return Err(EntryBlocked::AlreadyEntered);
    }
    Ok(fee)
}

/// Submits `enterRaffle()` and follows the transaction to confirmation
pub struct EntrySubmitter<C> {
    reader: ChainReader<C>,
    status: Arc<watch::Sender<TransactionStatus>>,
    refresh: Arc<Notify>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl<C: ChainClient> EntrySubmitter<C> {
    /// `refresh` is notified whenever an entry is confirmed
    pub fn new(reader: ChainReader<C>, refresh: Arc<Notify>) -> Self {
        let (status, _) = watch::channel(TransactionStatus::Idle);
        Self {
            reader,
            status: Arc::new(status),
            refresh,
            watcher: Mutex::new(None),
        }
    }

    pub fn status(&self) -> TransactionStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TransactionStatus> {
        self.status.subscribe()
    }

    /// Entry gate for the connected account against the given view of the raffle
    pub fn gate(&self, snapshot: &RaffleSnapshot, roster: &PlayerRoster) -> Result<u128, EntryBlocked> {
        let account = self.reader.client().account();
        entry_gate(
            self.reader.contract_address(),
            account.as_ref(),
            snapshot,
            roster,
            &self.status.borrow(),
        )
    }

    /// Gate, then submit with the snapshot's entrance fee
    pub async fn enter(&self, snapshot: &RaffleSnapshot, roster: &PlayerRoster) -> Result<TxHash, RaffleClientError> {
        let fee = self.gate(snapshot, roster)?;
        self.submit(fee).await
    }

    /// Sends `enterRaffle()` carrying exactly `entrance_fee`.
    ///
    /// Returns once the wallet has broadcast the transaction; confirmation is
    /// followed in the background.
    pub async fn submit(&self, entrance_fee: u128) -> Result<TxHash, RaffleClientError> {
        let client = Arc::clone(self.reader.client());
        let contract = self
            .reader
            .contract_address()
            .ok_or(RaffleClientError::UnsupportedNetwork(client.chain_id()))?;
        let from = client.account().ok_or(RaffleClientError::WalletNotConnected)?;

        let mut claimed = false;
        self.status.send_if_modified(|status| {
            if status.is_in_flight() {
                return false;
            }
            *status = TransactionStatus::Pending;
            claimed = true;
            true
        });
        if !claimed {
            return Err(EntryBlocked::SubmissionInFlight.into());
        }
        let mut pending = PendingGuard {
            status: &self.status,
            armed: true,
        };

        let request = TransactionRequest {
            from,
            to: contract,
            value: entrance_fee,
            data: RaffleCall::EnterRaffle.pack(),
        };
        let hash = match client.send_transaction(request).await {
            Ok(hash) => hash,
            Err(e) => {
                warn!("Entry rejected: {}", e);
                pending.armed = false;
                self.status.send_replace(TransactionStatus::Failed(e.to_string()));
                return Err(e);
            }
        };
        pending.armed = false;
        info!("Entry {} broadcast from {}, waiting for confirmation", hash, from);
        self.status.send_replace(TransactionStatus::Confirming(hash));

        let status = Arc::clone(&self.status);
        let refresh = Arc::clone(&self.refresh);
        let watcher = tokio::spawn(async move {
            let outcome = match client.wait_for_receipt(hash).await {
                Ok(receipt) if receipt.success => {
                    info!("Entry {} confirmed in block {}", hash, receipt.block_number);
                    TransactionStatus::Confirmed(hash)
                }
                Ok(_) => {
                    warn!("Entry {} reverted", hash);
                    TransactionStatus::Failed(RaffleClientError::Reverted(hash).to_string())
                }
                Err(e) => {
                    warn!("Entry {} could not be confirmed: {}", hash, e);
                    TransactionStatus::Failed(e.to_string())
                }
            };
            let confirmed = matches!(outcome, TransactionStatus::Confirmed(_));
            status.send_replace(outcome);
            if confirmed {
                refresh.notify_one();
            }
        });

        let mut slot = self.watcher.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(watcher) {
            previous.abort();
        }
        Ok(hash)
    }
}

impl<C> Drop for EntrySubmitter<C> {
    fn drop(&mut self) {
        let mut slot = self.watcher.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(watcher) = slot.take() {
            watcher.abort();
        }
    }
}

/// Fails a `Pending` submission whose future is dropped before the wallet
/// returns a hash
struct PendingGuard<'a> {
    status: &'a watch::Sender<TransactionStatus>,
    armed: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Entry cancelled before the wallet returned a hash");
            self.status
                .send_replace(TransactionStatus::Failed("entry cancelled before broadcast".to_string()));
        }
    }
}
