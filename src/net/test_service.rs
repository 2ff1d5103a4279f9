use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::net::api::GameService;
use crate::net::protocol::{Command, GameSnapshot, RegisterResponse};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
	PresenterState,
	PlayerState(String),
	Command(Command),
	Answer { uuid: String, answer: String },
	Register(String),
}

/// Stand-in game server: serves a scripted snapshot sequence, repeating the
/// last one like a server whose state has not advanced, and records every
/// call with its timestamp.
pub struct ScriptedService {
	snapshots: Mutex<VecDeque<GameSnapshot>>,
	last: Mutex<Option<GameSnapshot>>,
	register_response: Mutex<Option<RegisterResponse>>,
	calls: Mutex<Vec<(Instant, RecordedCall)>>,
}

impl ScriptedService {
	pub fn new() -> Self {
		Self {
			snapshots: Mutex::new(VecDeque::new()),
			last: Mutex::new(None),
			register_response: Mutex::new(None),
			calls: Mutex::new(Vec::new()),
		}
	}

	pub fn with_snapshots(self, snapshots: Vec<GameSnapshot>) -> Self {
		*self.snapshots.lock().unwrap() = snapshots.into();
		self
	}

	pub fn with_register_response(self, response: RegisterResponse) -> Self {
		*self.register_response.lock().unwrap() = Some(response);
		self
	}

	pub fn calls(&self) -> Vec<(Instant, RecordedCall)> {
		self.calls.lock().unwrap().clone()
	}

	pub fn commands(&self) -> Vec<(Instant, Command)> {
		self.calls()
			.into_iter()
			.filter_map(|(at, call)| match call {
				RecordedCall::Command(command) => Some((at, command)),
				_ => None,
			})
			.collect()
	}

	pub fn answers(&self) -> Vec<(String, String)> {
		self.calls()
			.into_iter()
			.filter_map(|(_, call)| match call {
				RecordedCall::Answer { uuid, answer } => Some((uuid, answer)),
				_ => None,
			})
			.collect()
	}

	fn record(&self, call: RecordedCall) {
		self.calls.lock().unwrap().push((Instant::now(), call));
	}

	fn next_snapshot(&self) -> Result<GameSnapshot, String> {
		if let Some(snapshot) = self.snapshots.lock().unwrap().pop_front() {
			*self.last.lock().unwrap() = Some(snapshot.clone());
			return Ok(snapshot);
		}
		self.last
			.lock()
			.unwrap()
			.clone()
			.ok_or_else(|| "No snapshot scripted".to_string())
	}
}

impl Default for ScriptedService {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl GameService for ScriptedService {
	async fn presenter_state(&self) -> Result<GameSnapshot, String> {
		self.record(RecordedCall::PresenterState);
		self.next_snapshot()
	}

	async fn player_state(&self, uuid: &str) -> Result<GameSnapshot, String> {
		self.record(RecordedCall::PlayerState(uuid.to_string()));
		self.next_snapshot()
	}

	async fn send_command(&self, command: Command) -> Result<(), String> {
		self.record(RecordedCall::Command(command));
		Ok(())
	}

	async fn submit_answer(&self, uuid: &str, answer: &str) -> Result<(), String> {
		self.record(RecordedCall::Answer {
			uuid: uuid.to_string(),
			answer: answer.to_string(),
		});
		Ok(())
	}

	async fn register_player(&self, name: &str) -> Result<RegisterResponse, String> {
		self.record(RecordedCall::Register(name.to_string()));
		self.register_response
			.lock()
			.unwrap()
			.clone()
			.ok_or_else(|| "No registration response scripted".to_string())
	}
}
