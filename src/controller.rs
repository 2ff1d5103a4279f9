use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::audio::{AudioGate, Narrator};
use crate::commands::CommandEmitter;
use crate::config::TimingConfig;
use crate::logging;
use crate::net::api::GameService;
use crate::net::protocol::GameSnapshot;
use crate::poller::Poller;
use crate::render;
use crate::screen::Screen;
use crate::session::ClientSession;
use crate::view::{Advance, Directive, Panel};

#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
	StartGame,
	NewGame,
	Answer(usize),
	Quit,
}

// A rejected registration is surfaced as the server's error text; the
// caller must not start polling on failure.
pub async fn register(service: &dyn GameService, name: &str) -> Result<String, String> {
	let response = service.register_player(name).await?;
	if !response.success {
		return Err(response
			.error
			.unwrap_or_else(|| "Registration rejected".to_string()));
	}
	response
		.uuid
		.ok_or_else(|| "Registration succeeded without an id".to_string())
}

/// Event loop for the shared screen. Poll ticks, audio completions and key
/// presses are serialized through one select; a tick's full render pass
/// finishes before the next event is looked at.
pub struct PresenterController {
	session: ClientSession,
	screen: Box<dyn Screen>,
	gate: AudioGate,
	audio_done: UnboundedReceiver<()>,
	emitter: CommandEmitter,
	timing: TimingConfig,
	actions: UnboundedReceiver<UserAction>,
}

impl PresenterController {
	pub fn new(
		service: Arc<dyn GameService>,
		narrator: Arc<dyn Narrator>,
		screen: Box<dyn Screen>,
		timing: TimingConfig,
		actions: UnboundedReceiver<UserAction>,
	) -> Self {
		let (gate, audio_done) = AudioGate::new(narrator);
		Self {
			session: ClientSession::new(),
			screen,
			gate,
			audio_done,
			emitter: CommandEmitter::new(service),
			timing,
			actions,
		}
	}

	pub async fn run(mut self, mut poller: Poller) -> Result<(), String> {
		loop {
			tokio::select! {
				snapshot = poller.next() => {
					match snapshot {
						Ok(snapshot) => self.handle_snapshot(&snapshot).await,
						Err(e) => logging::poller::failed(&e),
					}
					self.screen.draw()?;
				}
				Some(()) = self.audio_done.recv() => {
					self.handle_audio_finished();
				}
				action = self.actions.recv() => {
					let Some(action) = action else { return Ok(()) };
					if !self.handle_action(action).await {
						return Ok(());
					}
					self.screen.draw()?;
				}
			}
		}
	}

	pub async fn handle_snapshot(&mut self, snapshot: &GameSnapshot) {
		let previous_stage = self.session.last_stage;
		let pass = render::presenter::render(&mut self.session, snapshot, &self.timing);
		if self.session.last_stage != previous_stage {
			logging::render::stage(&format!("{:?}", snapshot.stage_key()));
		}

		self.screen.apply(&pass.directives);
		match pass.advance {
			Advance::Wait => {}
			Advance::Proceed => self.emitter.proceed().await,
			Advance::ProceedAfter(delay) => self.emitter.proceed_after(delay),
			Advance::Narrate(resource) => self.gate.request(&mut self.session, &resource),
		}
	}

	pub fn handle_audio_finished(&mut self) {
		self.session.audio_playing = false;
		logging::audio::finished();
		self.emitter.proceed_after(self.timing.post_audio_delay());
	}

	async fn handle_action(&mut self, action: UserAction) -> bool {
		match action {
			UserAction::StartGame => {
				self.emitter.proceed().await;
				true
			}
			UserAction::NewGame => {
				self.emitter.new_game().await;
				true
			}
			UserAction::Answer(_) => true,
			UserAction::Quit => false,
		}
	}
}

// Event loop for a personal device. The player never drives progression.
pub struct PlayerController {
	session: ClientSession,
	screen: Box<dyn Screen>,
	emitter: CommandEmitter,
	actions: UnboundedReceiver<UserAction>,
	options: Option<[String; 4]>,
}

impl PlayerController {
	pub fn new(
		service: Arc<dyn GameService>,
		participant_id: String,
		screen: Box<dyn Screen>,
		actions: UnboundedReceiver<UserAction>,
	) -> Self {
		Self {
			session: ClientSession::for_participant(participant_id),
			screen,
			emitter: CommandEmitter::new(service),
			actions,
			options: None,
		}
	}

	pub async fn run(mut self, mut poller: Poller) -> Result<(), String> {
		loop {
			tokio::select! {
				snapshot = poller.next() => {
					match snapshot {
						Ok(snapshot) => self.handle_snapshot(&snapshot),
						Err(e) => logging::poller::failed(&e),
					}
					self.screen.draw()?;
				}
				action = self.actions.recv() => {
					let Some(action) = action else { return Ok(()) };
					if !self.handle_action(action).await {
						return Ok(());
					}
					self.screen.draw()?;
				}
			}
		}
	}

	pub fn handle_snapshot(&mut self, snapshot: &GameSnapshot) {
		let pass = render::player::render(&mut self.session, snapshot);
		self.screen.apply(&pass.directives);

		// Selections are valid only while the answer panel is up.
		let showing_answers = pass
			.directives
			.iter()
			.any(|d| matches!(d, Directive::SetAnswerOptions(_)));
		self.options = if showing_answers {
			snapshot.four_options()
		} else {
			None
		};
	}

	pub async fn handle_action(&mut self, action: UserAction) -> bool {
		match action {
			UserAction::Answer(index) => {
				self.submit(index).await;
				true
			}
			UserAction::Quit => false,
			UserAction::StartGame | UserAction::NewGame => true,
		}
	}

	async fn submit(&mut self, index: usize) {
		if self.session.override_game {
			return;
		}
		let Some(options) = &self.options else {
			return;
		};
		let Some(answer) = options.get(index) else {
			return;
		};
		let Some(uuid) = self.session.participant_id.clone() else {
			return;
		};

		self.emitter.submit_answer(&uuid, answer).await;
		self.session.override_game = true;
		self.options = None;
		self.screen.apply(&[
			Directive::Hide(Panel::Answers),
			Directive::Show(Panel::LookAtTv),
		]);
	}
}
