use std::sync::Arc;
use std::time::Duration;

use crate::logging;
use crate::net::api::GameService;
use crate::net::protocol::Command;

// Sends are best-effort: a lost proceed is recovered by the next stage
// change, and the server treats duplicates as a level, not an edge.
pub struct CommandEmitter {
	service: Arc<dyn GameService>,
}

impl CommandEmitter {
	pub fn new(service: Arc<dyn GameService>) -> Self {
		Self { service }
	}

	pub async fn proceed(&self) {
		if let Err(e) = self.service.send_command(Command::Proceed).await {
			logging::net::error("proceed", &e);
		}
	}

	// The timer is never cancelled; the command goes out when it fires even
	// if the game has moved on by then.
	pub fn proceed_after(&self, delay: Duration) {
		let service = Arc::clone(&self.service);
		tokio::spawn(async move {
			tokio::time::sleep(delay).await;
			if let Err(e) = service.send_command(Command::Proceed).await {
				logging::net::error("proceed", &e);
			}
		});
	}

	pub async fn new_game(&self) {
		if let Err(e) = self.service.send_command(Command::NewGame).await {
			logging::net::error("newgame", &e);
		}
	}

	pub async fn submit_answer(&self, uuid: &str, answer: &str) {
		if let Err(e) = self.service.submit_answer(uuid, answer).await {
			logging::net::error("submit_answer", &e);
		}
	}
}
