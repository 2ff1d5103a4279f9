use crate::net::protocol::StageKey;

// Per-client mutable state; lives for the process lifetime, never persisted.
pub struct ClientSession {
	pub last_audio: Option<String>,
	pub audio_playing: bool,
	pub override_game: bool,
	pub participant_id: Option<String>,
	pub last_stage: Option<StageKey>,
}

impl ClientSession {
	pub fn new() -> Self {
		Self {
			last_audio: None,
			audio_playing: false,
			override_game: false,
			participant_id: None,
			last_stage: None,
		}
	}

	pub fn for_participant(uuid: impl Into<String>) -> Self {
		Self {
			participant_id: Some(uuid.into()),
			..Self::new()
		}
	}

	/// Records the rendered stage and reports whether it changed since the
	/// previous pass. Timer-driven progression arms only on a change, so
	/// polling an unchanged snapshot once a second never stacks timers.
	pub fn stage_changed(&mut self, key: StageKey) -> bool {
		if self.last_stage == Some(key) {
			return false;
		}
		self.last_stage = Some(key);
		true
	}
}

impl Default for ClientSession {
	fn default() -> Self {
		Self::new()
	}
}
