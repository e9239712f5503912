use log::{debug, warn};
use tokio::task::JoinSet;

use crate::{
    address::Address,
    client::ChainClient,
    raffle_reader::ChainReader,
    raffle_state::PlayerRoster,
};

/// Largest player count that will be enumerated; anything above is treated
/// as a bad read
pub const MAX_PLAYERS: u64 = 10_000;

/// Builds the full player roster from indexed reads
pub struct PlayerEnumerator<C> {
    reader: ChainReader<C>,
}

impl<C> Clone for PlayerEnumerator<C> {
    fn clone(&self) -> Self {
        Self {
            reader: self.reader.clone(),
        }
    }
}

impl<C: ChainClient> PlayerEnumerator<C> {
    pub fn new(reader: ChainReader<C>) -> Self {
        Self { reader }
    }

    /// Reads players `0..count` concurrently.
    ///
    /// Returns the empty roster when the count is unset or zero, when the
    /// network has no contract, when the count exceeds `MAX_PLAYERS`, or
    /// when any single read fails.
    pub async fn enumerate(&self, count: Option<u64>) -> PlayerRoster {
        let count = match count {
            Some(count) if count > 0 => count,
            _ => return PlayerRoster::empty(),
        };
        if self.reader.contract_address().is_none() {
            return PlayerRoster::empty();
        }
        if count > MAX_PLAYERS {
            warn!("Player count {} exceeds {}, discarding roster", count, MAX_PLAYERS);
            return PlayerRoster::empty();
        }
        let len = count as usize;

        let mut reads = JoinSet::new();
        for index in 0..count {
            let reader = self.reader.clone();
            reads.spawn(async move { (index, reader.player(index).await) });
        }

        let mut slots: Vec<Option<Address>> = vec![None; len];
        while let Some(joined) = reads.join_next().await {
            match joined {
                Ok((index, Ok(player))) => slots[index as usize] = Some(player),
                Ok((index, Err(e))) => {
                    warn!("Read of player {} failed, discarding roster: {}", index, e);
                    reads.abort_all();
                    return PlayerRoster::empty();
                }
                Err(e) => {
                    warn!("Player read task failed, discarding roster: {}", e);
                    reads.abort_all();
                    return PlayerRoster::empty();
                }
            }
        }

        let players: Option<Vec<Address>> = slots.into_iter().collect();
        match players {
            Some(players) => {
                debug!("Enumerated {} players", players.len());
                PlayerRoster::new(players, count)
            }
            None => PlayerRoster::empty(),
        }
    }
}
