use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::{
    sync::{watch, Notify},
    task::JoinHandle,
    time::MissedTickBehavior,
};

use crate::{
    client::ChainClient,
    raffle_entry::EntrySubmitter,
    raffle_players::PlayerEnumerator,
    raffle_reader::ChainReader,
    raffle_state::{PlayerRoster, RaffleSnapshot},
};

/// Polling settings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Time between background refreshes
    pub poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(4),
        }
    }
}

/// Everything the page renders, replaced as a whole on each refresh
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RaffleView {
    pub snapshot: RaffleSnapshot,
    pub roster: PlayerRoster,
    /// Contract balance in wei
    pub prize_pool: Option<u128>,
    /// Incremented by every refresh; 0 until the first one completes
    pub revision: u64,
}

/// Keeps a `RaffleView` in sync with the chain.
///
/// Refreshes on a fixed interval and whenever the refresh signal fires. The
/// polling task is aborted when the session is dropped.
pub struct RaffleSession<C> {
    reader: ChainReader<C>,
    refresh: Arc<Notify>,
    submitter: Arc<EntrySubmitter<C>>,
    view: watch::Receiver<RaffleView>,
    poller: JoinHandle<()>,
}

impl<C: ChainClient> RaffleSession<C> {
    pub fn start(reader: ChainReader<C>, config: SessionConfig) -> Self {
        let refresh = Arc::new(Notify::new());
        let (sender, view) = watch::channel(RaffleView::default());

        let poller = tokio::spawn(poll(
            reader.clone(),
            PlayerEnumerator::new(reader.clone()),
            config,
            Arc::clone(&refresh),
            sender,
        ));

        let submitter = Arc::new(EntrySubmitter::new(reader.clone(), Arc::clone(&refresh)));

        Self {
            reader,
            refresh,
            submitter,
            view,
            poller,
        }
    }

    pub fn reader(&self) -> &ChainReader<C> {
        &self.reader
    }

    /// Latest published view
    pub fn view(&self) -> RaffleView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RaffleView> {
        self.view.clone()
    }

    /// Wake the poller for an immediate re-read
    pub fn request_refresh(&self) {
        self.refresh.notify_one();
    }

    /// The session's one entry submitter; every caller shares its status,
    /// and its confirmations refresh this session
    pub fn entry_submitter(&self) -> Arc<EntrySubmitter<C>> {
        Arc::clone(&self.submitter)
    }
}

impl<C> Drop for RaffleSession<C> {
    fn drop(&mut self) {
        self.poller.abort();
    }
}

async fn poll<C: ChainClient>(
    reader: ChainReader<C>,
    players: PlayerEnumerator<C>,
    config: SessionConfig,
    refresh: Arc<Notify>,
    sender: watch::Sender<RaffleView>,
) {
    let mut ticker = tokio::time::interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut revision = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = refresh.notified() => {
                debug!("Refresh requested");
            }
        }

        let snapshot = reader.fetch_snapshot().await;
        let (roster, prize_pool) = tokio::join!(players.enumerate(snapshot.number_of_players), reader.prize_pool());

        revision += 1;
        sender.send_replace(RaffleView {
            snapshot,
            roster,
            prize_pool,
            revision,
        });
    }
}
