use async_trait::async_trait;

use crate::logging;
use crate::net::protocol::{Ack, Command, GameSnapshot, RegisterResponse};

#[async_trait]
pub trait GameService: Send + Sync {
	async fn presenter_state(&self) -> Result<GameSnapshot, String>;

	async fn player_state(&self, uuid: &str) -> Result<GameSnapshot, String>;

	async fn send_command(&self, command: Command) -> Result<(), String>;

	async fn submit_answer(&self, uuid: &str, answer: &str) -> Result<(), String>;

	async fn register_player(&self, name: &str) -> Result<RegisterResponse, String>;
}

pub struct HttpGameService {
	base_url: String,
	client: reqwest::Client,
}

impl HttpGameService {
	pub fn new(base_url: &str) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			client: reqwest::Client::new(),
		}
	}

	fn url(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path.trim_start_matches('/'))
	}

	async fn get_snapshot(&self, path: &str) -> Result<GameSnapshot, String> {
		let url = self.url(path);
		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| format!("Failed to fetch {}: {}", url, e))?;

		if !response.status().is_success() {
			return Err(format!("Server returned {} for {}", response.status(), url));
		}

		response
			.json::<GameSnapshot>()
			.await
			.map_err(|e| format!("Bad snapshot from {}: {}", url, e))
	}

	async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<(), String> {
		let url = self.url(path);
		let response = self
			.client
			.post(&url)
			.form(form)
			.send()
			.await
			.map_err(|e| format!("Failed to post {}: {}", url, e))?;

		if !response.status().is_success() {
			return Err(format!("Server returned {} for {}", response.status(), url));
		}

		// The server acks with HTTP 200 either way and signals failure in the body.
		let ack = response
			.json::<Ack>()
			.await
			.map_err(|e| format!("Bad ack from {}: {}", url, e))?;

		if !ack.success {
			return Err(ack.error.unwrap_or_else(|| format!("Server rejected {}", url)));
		}

		Ok(())
	}
}

#[async_trait]
impl GameService for HttpGameService {
	async fn presenter_state(&self) -> Result<GameSnapshot, String> {
		self.get_snapshot("get_presenter_state/").await
	}

	async fn player_state(&self, uuid: &str) -> Result<GameSnapshot, String> {
		self.get_snapshot(&format!("get_player_state/{}", uuid)).await
	}

	async fn send_command(&self, command: Command) -> Result<(), String> {
		logging::net::sent(command.as_str());
		self.post_form("command", &[("command", command.as_str())]).await
	}

	async fn submit_answer(&self, uuid: &str, answer: &str) -> Result<(), String> {
		logging::net::sent("submit_answer");
		self.post_form("submit_answer", &[("uuid", uuid), ("answer", answer)])
			.await
	}

	async fn register_player(&self, name: &str) -> Result<RegisterResponse, String> {
		let url = self.url("register_player");
		let response = self
			.client
			.post(&url)
			.form(&[("name", name)])
			.send()
			.await
			.map_err(|e| format!("Failed to post {}: {}", url, e))?;

		if !response.status().is_success() {
			return Err(format!("Server returned {} for {}", response.status(), url));
		}

		response
			.json::<RegisterResponse>()
			.await
			.map_err(|e| format!("Bad registration response from {}: {}", url, e))
	}
}
