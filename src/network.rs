// Raffle client - Network table
use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{address::Address, raffle_error::RaffleClientError};

pub const MAINNET: u64 = 1;
pub const OPTIMISM: u64 = 10;
pub const POLYGON: u64 = 137;
pub const BASE: u64 = 8453;
pub const ARBITRUM: u64 = 42161;
pub const SEPOLIA: u64 = 11155111;
pub const HARDHAT: u64 = 31337;

/// Environment flag that adds public testnets to the default table
pub const ENABLE_TESTNETS_ENV: &str = "RAFFLE_ENABLE_TESTNETS";

/// First contract deployed by the default Hardhat account
pub const HARDHAT_DEFAULT_DEPLOYMENT: Address = Address::new([
    0x5f, 0xbd, 0xb2, 0x31, 0x56, 0x78, 0xaf, 0xec, 0xb3, 0x67, 0xf0, 0x32, 0xd9, 0x3f, 0x64, 0x2f,
    0x64, 0x18, 0x0a, 0xa3,
]);

/// A supported network
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Network {
    pub chain_id: u64,
    pub name: String,
    #[serde(default)]
    pub testnet: bool,
    #[serde(default)]
    pub rpc_url: Option<String>,
    /// Raffle contract deployed on this network
    #[serde(default)]
    pub contract: Option<Address>,
}

impl Network {
    fn new(chain_id: u64, name: &str) -> Self {
        Self {
            chain_id,
            name: name.to_string(),
            testnet: false,
            rpc_url: None,
            contract: None,
        }
    }
}

#[derive(Deserialize)]
struct NetworkTable {
    networks: Vec<Network>,
}

/// Immutable chain id -> network lookup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkRegistry {
    networks: BTreeMap<u64, Network>,
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::new(false)
    }
}

impl NetworkRegistry {
    /// Built-in table; Hardhat is always present, Sepolia only with testnets
    pub fn new(include_testnets: bool) -> Self {
        let mut hardhat = Network::new(HARDHAT, "Hardhat");
        hardhat.rpc_url = Some("http://127.0.0.1:8545".to_string());
        hardhat.contract = Some(HARDHAT_DEFAULT_DEPLOYMENT);

        let mut networks = vec![
            Network::new(MAINNET, "Ethereum"),
            Network::new(POLYGON, "Polygon"),
            Network::new(OPTIMISM, "OP Mainnet"),
            Network::new(ARBITRUM, "Arbitrum One"),
            Network::new(BASE, "Base"),
            hardhat,
        ];
        if include_testnets {
            let mut sepolia = Network::new(SEPOLIA, "Sepolia");
            sepolia.testnet = true;
            networks.push(sepolia);
        }

        Self::from_networks(networks)
    }

    /// Built-in table, with testnets when `RAFFLE_ENABLE_TESTNETS=true`
    pub fn from_env() -> Self {
        let include_testnets = std::env::var(ENABLE_TESTNETS_ENV)
            .map(|v| v == "true")
            .unwrap_or(false);
        Self::new(include_testnets)
    }

    /// Parse a `{"networks": [...]}` table
    pub fn from_json(json: &str) -> Result<Self, RaffleClientError> {
        let table: NetworkTable = serde_json::from_str(json)?;
        Ok(Self::from_networks(table.networks))
    }

    pub fn from_networks(networks: impl IntoIterator<Item = Network>) -> Self {
        Self {
            networks: networks.into_iter().map(|n| (n.chain_id, n)).collect(),
        }
    }

    /// Record a deployment; ignored for chains not in the table
    pub fn with_deployment(mut self, chain_id: u64, contract: Address) -> Self {
        if let Some(network) = self.networks.get_mut(&chain_id) {
            network.contract = Some(contract);
        }
        self
    }

    pub fn get(&self, chain_id: u64) -> Option<&Network> {
        self.networks.get(&chain_id)
    }

    pub fn is_supported(&self, chain_id: u64) -> bool {
        self.networks.contains_key(&chain_id)
    }

    /// Raffle contract for the given chain, if supported and deployed
    pub fn contract_address(&self, chain_id: Option<u64>) -> Option<Address> {
        chain_id
            .and_then(|id| self.networks.get(&id))
            .and_then(|network| network.contract)
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.networks.keys().copied()
    }
}
