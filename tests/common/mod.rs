// In-memory raffle contract standing in for the wallet and node
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use raffle_client::{
    abi,
    network::{HARDHAT, HARDHAT_DEFAULT_DEPLOYMENT},
    raffle_call::RaffleCall,
    Address, ChainClient, ChainReader, NetworkRegistry, RaffleClientError, Receipt,
    TransactionRequest, TxHash,
};
use tokio::sync::Notify;

pub const FEE: u128 = 10_000_000_000_000_000; // 0.01 ETH
pub const LAST_TIME_STAMP: u64 = 1_700_000_000;
pub const INTERVAL: u64 = 30;

pub fn addr(s: &str) -> Address {
    s.parse().unwrap()
}

pub fn player_a() -> Address {
    addr("0xAaAa000000000000000000000000000000000001")
}

pub fn player_b() -> Address {
    addr("0xBbBb000000000000000000000000000000000002")
}

pub fn user() -> Address {
    addr("0xCcCc000000000000000000000000000000000003")
}

pub struct MockState {
    pub chain_id: Option<u64>,
    pub account: Option<Address>,
    pub entrance_fee: u128,
    pub players: Vec<Address>,
    pub recent_winner: Address,
    pub raffle_state: u8,
    pub last_time_stamp: u64,
    pub interval: u64,
    pub balance: u128,
    /// Functions whose reads fail
    pub failing: HashSet<&'static str>,
    /// getPlayer indices whose reads fail
    pub failing_players: HashSet<u64>,
    /// Per-index delay on getPlayer
    pub player_delays: HashMap<u64, Duration>,
    pub reject_send: Option<String>,
    /// Wallet never answers sends
    pub hang_send: bool,
    pub hold_receipts: bool,
    pub reads: usize,
    pub sent: Vec<TransactionRequest>,
    reverted: HashSet<TxHash>,
    next_hash: u8,
}

pub struct MockChain {
    state: Mutex<MockState>,
    receipts: Arc<Notify>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                chain_id: Some(HARDHAT),
                account: Some(user()),
                entrance_fee: FEE,
                players: vec![player_a(), player_b()],
                recent_winner: Address::ZERO,
                raffle_state: 0,
                last_time_stamp: LAST_TIME_STAMP,
                interval: INTERVAL,
                balance: 2 * FEE,
                failing: HashSet::new(),
                failing_players: HashSet::new(),
                player_delays: HashMap::new(),
                reject_send: None,
                hang_send: false,
                hold_receipts: false,
                reads: 0,
                sent: Vec::new(),
                reverted: HashSet::new(),
                next_hash: 0,
            }),
            receipts: Arc::new(Notify::new()),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Let one held receipt resolve
    pub fn release_receipt(&self) {
        self.receipts.notify_one();
    }
}

impl ChainClient for MockChain {
    fn chain_id(&self) -> Option<u64> {
        self.state().chain_id
    }

    fn account(&self) -> Option<Address> {
        self.state().account
    }

    fn connect(&self) -> impl Future<Output = Result<Address, RaffleClientError>> + Send {
        let mut state = self.state();
        let account = *state.account.get_or_insert_with(user);
        async move { Ok(account) }
    }

    fn read_contract(
        &self,
        contract: Address,
        calldata: Vec<u8>,
    ) -> impl Future<Output = Result<Vec<u8>, RaffleClientError>> + Send {
        let mut state = self.state();
        state.reads += 1;

        let mut delay = None;
        let result = match RaffleCall::unpack(&calldata) {
            _ if contract != HARDHAT_DEFAULT_DEPLOYMENT => {
                Err(RaffleClientError::Transport("no code at address".to_string()))
            }
            Some(call) if state.failing.contains(call.name()) => {
                Err(RaffleClientError::Transport(format!("{} timed out", call.name())))
            }
            Some(RaffleCall::GetEntranceFee) => Ok(abi::encode_uint(state.entrance_fee).to_vec()),
            Some(RaffleCall::GetNumberOfPlayers) => {
                Ok(abi::encode_uint(state.players.len() as u128).to_vec())
            }
            Some(RaffleCall::GetRecentWinner) => Ok(abi::encode_address(&state.recent_winner).to_vec()),
            Some(RaffleCall::GetRaffleState) => Ok(abi::encode_uint(state.raffle_state as u128).to_vec()),
            Some(RaffleCall::GetLastTimeStamp) => {
                Ok(abi::encode_uint(state.last_time_stamp as u128).to_vec())
            }
            Some(RaffleCall::GetInterval) => Ok(abi::encode_uint(state.interval as u128).to_vec()),
            Some(RaffleCall::GetPlayer { index }) => {
                delay = state.player_delays.get(&index).copied();
                if state.failing_players.contains(&index) {
                    Err(RaffleClientError::Transport(format!("getPlayer({}) failed", index)))
                } else {
                    match state.players.get(index as usize) {
                        Some(player) => Ok(abi::encode_address(player).to_vec()),
                        None => Err(RaffleClientError::Transport("execution reverted".to_string())),
                    }
                }
            }
            Some(RaffleCall::EnterRaffle) | None => {
                Err(RaffleClientError::Transport("execution reverted".to_string()))
            }
        };

        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        }
    }

    fn balance(&self, address: Address) -> impl Future<Output = Result<u128, RaffleClientError>> + Send {
        let state = self.state();
        let result = if address == HARDHAT_DEFAULT_DEPLOYMENT {
            Ok(state.balance)
        } else {
            Ok(0)
        };
        async move { result }
    }

    fn send_transaction(
        &self,
        request: TransactionRequest,
    ) -> impl Future<Output = Result<TxHash, RaffleClientError>> + Send {
        let mut state = self.state();
        state.sent.push(request.clone());

        let result = match state.reject_send.clone() {
            Some(reason) => Err(RaffleClientError::Rejected(reason)),
            None => {
                state.next_hash += 1;
                let hash = TxHash([state.next_hash; 32]);
                let valid = RaffleCall::unpack(&request.data) == Some(RaffleCall::EnterRaffle)
                    && request.value == state.entrance_fee
                    && state.raffle_state == 0;
                if valid {
                    state.players.push(request.from);
                    state.balance += request.value;
                } else {
                    state.reverted.insert(hash);
                }
                Ok(hash)
            }
        };
        let hang = state.hang_send;
        async move {
            if hang {
                std::future::pending::<()>().await;
            }
            result
        }
    }

    fn wait_for_receipt(&self, hash: TxHash) -> impl Future<Output = Result<Receipt, RaffleClientError>> + Send {
        let state = self.state();
        let receipt = Receipt {
            hash,
            block_number: 100 + state.next_hash as u64,
            success: !state.reverted.contains(&hash),
        };
        let gate = state.hold_receipts.then(|| Arc::clone(&self.receipts));
        async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            Ok(receipt)
        }
    }
}

pub fn setup() -> (Arc<MockChain>, ChainReader<MockChain>) {
    let chain = Arc::new(MockChain::new());
    let reader = ChainReader::new(Arc::clone(&chain), NetworkRegistry::default());
    (chain, reader)
}
