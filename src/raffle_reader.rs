use std::sync::Arc;

use log::{debug, warn};

use crate::{
    abi,
    address::Address,
    client::ChainClient,
    network::NetworkRegistry,
    raffle_call::RaffleCall,
    raffle_error::RaffleClientError,
    raffle_state::{RaffleSnapshot, RaffleState},
};

/// Read-only access to the raffle contract on the connected network
pub struct ChainReader<C> {
    client: Arc<C>,
    registry: Arc<NetworkRegistry>,
}

impl<C> Clone for ChainReader<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<C: ChainClient> ChainReader<C> {
    pub fn new(client: Arc<C>, registry: NetworkRegistry) -> Self {
        Self {
            client,
            registry: Arc::new(registry),
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn registry(&self) -> &NetworkRegistry {
        &self.registry
    }

    /// Contract for the currently connected chain, if any
    pub fn contract_address(&self) -> Option<Address> {
        self.registry.contract_address(self.client.chain_id())
    }

    fn require_contract(&self) -> Result<Address, RaffleClientError> {
        self.contract_address()
            .ok_or_else(|| RaffleClientError::UnsupportedNetwork(self.client.chain_id()))
    }

    /// Raw return data of a read-only call
    pub async fn call(&self, call: RaffleCall) -> Result<Vec<u8>, RaffleClientError> {
        if !call.is_read_only() {
            return Err(RaffleClientError::NotReadOnly(call.name()));
        }
        let contract = self.require_contract()?;
        self.client.read_contract(contract, call.pack()).await
    }

    pub async fn entrance_fee(&self) -> Result<u128, RaffleClientError> {
        let call = RaffleCall::GetEntranceFee;
        abi::decode_u128(&self.call(call).await?, call.name())
    }

    pub async fn number_of_players(&self) -> Result<u64, RaffleClientError> {
        let call = RaffleCall::GetNumberOfPlayers;
        abi::decode_u64(&self.call(call).await?, call.name())
    }

    /// Raw winner, including the zero sentinel
    pub async fn recent_winner(&self) -> Result<Address, RaffleClientError> {
        let call = RaffleCall::GetRecentWinner;
        abi::decode_address(&self.call(call).await?, call.name())
    }

    pub async fn raffle_state(&self) -> Result<RaffleState, RaffleClientError> {
        let call = RaffleCall::GetRaffleState;
        RaffleState::try_from(abi::decode_u8(&self.call(call).await?, call.name())?)
    }

    pub async fn last_time_stamp(&self) -> Result<u64, RaffleClientError> {
        let call = RaffleCall::GetLastTimeStamp;
        abi::decode_u64(&self.call(call).await?, call.name())
    }

    pub async fn interval(&self) -> Result<u64, RaffleClientError> {
        let call = RaffleCall::GetInterval;
        abi::decode_u64(&self.call(call).await?, call.name())
    }

    pub async fn player(&self, index: u64) -> Result<Address, RaffleClientError> {
        let call = RaffleCall::GetPlayer { index };
        abi::decode_address(&self.call(call).await?, call.name())
    }

    /// Contract balance in wei
    pub async fn prize_pool(&self) -> Option<u128> {
        let contract = self.contract_address()?;
        unset_on_error("prize pool", self.client.balance(contract).await)
    }

    /// Reads every scalar field concurrently; failed reads stay `None`
    pub async fn fetch_snapshot(&self) -> RaffleSnapshot {
        if self.contract_address().is_none() {
            debug!("No raffle contract for chain {:?}", self.client.chain_id());
            return RaffleSnapshot::default();
        }

        let (entrance_fee, number_of_players, recent_winner, raffle_state, last_time_stamp, interval) = tokio::join!(
            self.entrance_fee(),
            self.number_of_players(),
            self.recent_winner(),
            self.raffle_state(),
            self.last_time_stamp(),
            self.interval(),
        );

        let snapshot = RaffleSnapshot {
            entrance_fee: unset_on_error("getEntranceFee", entrance_fee),
            number_of_players: unset_on_error("getNumberOfPlayers", number_of_players),
            recent_winner: unset_on_error("getRecentWinner", recent_winner),
            raffle_state: unset_on_error("getRaffleState", raffle_state),
            last_time_stamp: unset_on_error("getLastTimeStamp", last_time_stamp),
            interval: unset_on_error("getInterval", interval),
        };
        debug!("Raffle snapshot: {:?}", snapshot);
        snapshot
    }
}

fn unset_on_error<T>(field: &str, result: Result<T, RaffleClientError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Read of {} failed: {}", field, e);
            None
        }
    }
}
