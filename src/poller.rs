use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Interval, MissedTickBehavior};

use crate::net::api::GameService;
use crate::net::protocol::GameSnapshot;

#[derive(Debug, Clone)]
pub enum PollTarget {
	Presenter,
	Player(String),
}

/// Fixed-period snapshot fetch. Single-flight is structural: the fetch is
/// awaited inside the same call that awaited the tick, and missed ticks are
/// delayed rather than bursted, so at most one poll is in flight at a time
/// no matter how slow the server answers.
pub struct Poller {
	service: Arc<dyn GameService>,
	target: PollTarget,
	interval: Interval,
}

impl Poller {
	pub fn new(service: Arc<dyn GameService>, target: PollTarget, period: Duration) -> Self {
		let mut interval = time::interval(period);
		interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
		Self {
			service,
			target,
			interval,
		}
	}

	// Errors are not retried here; the next tick retries naturally.
	pub async fn next(&mut self) -> Result<GameSnapshot, String> {
		self.interval.tick().await;
		match &self.target {
			PollTarget::Presenter => self.service.presenter_state().await,
			PollTarget::Player(uuid) => self.service.player_state(uuid).await,
		}
	}
}
