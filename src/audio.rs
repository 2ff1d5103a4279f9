use std::io::Cursor;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::logging;
use crate::session::ClientSession;

// Opaque playback handle; play() resolves when the narration stops sounding.
#[async_trait]
pub trait Narrator: Send + Sync {
	async fn play(&self, resource: &str) -> Result<(), String>;
}

/// Serializes all narration through one playback handle: at most one
/// resource plays at a time, and a resource identical to the immediately
/// preceding one is dropped. Completion is reported on the channel returned
/// by `new`.
pub struct AudioGate {
	narrator: Arc<dyn Narrator>,
	done: UnboundedSender<()>,
}

impl AudioGate {
	pub fn new(narrator: Arc<dyn Narrator>) -> (Self, UnboundedReceiver<()>) {
		let (done, done_rx) = mpsc::unbounded_channel();
		(Self { narrator, done }, done_rx)
	}

	pub fn request(&self, session: &mut ClientSession, resource: &str) {
		if session.audio_playing {
			return;
		}
		if session.last_audio.as_deref() == Some(resource) {
			return;
		}

		session.last_audio = Some(resource.to_string());
		session.audio_playing = true;
		logging::audio::play(resource);

		let narrator = Arc::clone(&self.narrator);
		let done = self.done.clone();
		let resource = resource.to_string();
		tokio::spawn(async move {
			if let Err(e) = narrator.play(&resource).await {
				logging::audio::error(&resource, &e);
			}
			// Failed playback still counts as finished
			let _ = done.send(());
		});
	}
}

pub struct RodioNarrator {
	base_url: String,
	client: reqwest::Client,
}

impl RodioNarrator {
	pub fn new(base_url: &str) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			client: reqwest::Client::new(),
		}
	}

	fn resource_url(&self, resource: &str) -> String {
		if resource.starts_with("http://") || resource.starts_with("https://") {
			return resource.to_string();
		}
		format!("{}/{}", self.base_url, resource.trim_start_matches('/'))
	}
}

#[async_trait]
impl Narrator for RodioNarrator {
	async fn play(&self, resource: &str) -> Result<(), String> {
		let url = self.resource_url(resource);
		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| format!("Failed to fetch narration {}: {}", url, e))?;

		if !response.status().is_success() {
			return Err(format!("Server returned {} for {}", response.status(), url));
		}

		let bytes = response
			.bytes()
			.await
			.map_err(|e| format!("Failed to read narration {}: {}", url, e))?;

		tokio::task::spawn_blocking(move || {
			let (_stream, handle) = rodio::OutputStream::try_default()
				.map_err(|e| format!("No audio output device: {}", e))?;
			let sink = rodio::Sink::try_new(&handle)
				.map_err(|e| format!("Failed to open audio sink: {}", e))?;
			let source = rodio::Decoder::new(Cursor::new(bytes.to_vec()))
				.map_err(|e| format!("Failed to decode narration: {}", e))?;
			sink.append(source);
			sink.sleep_until_end();
			Ok(())
		})
		.await
		.map_err(|e| format!("Narration playback thread failed: {}", e))?
	}
}

const MUTED_PLAYBACK: Duration = Duration::from_secs(2);

// Narrator for machines without a sound device; holds the playing state for
// a fixed interval so narrated stages still advance.
pub struct MutedNarrator;

#[async_trait]
impl Narrator for MutedNarrator {
	async fn play(&self, _resource: &str) -> Result<(), String> {
		tokio::time::sleep(MUTED_PLAYBACK).await;
		Ok(())
	}
}

// Test double: records requests, each one "sounds" for a fixed duration.
pub struct ScriptedNarrator {
	duration: Duration,
	plays: Mutex<Vec<String>>,
}

impl ScriptedNarrator {
	pub fn new() -> Self {
		Self {
			duration: Duration::ZERO,
			plays: Mutex::new(Vec::new()),
		}
	}

	pub fn with_duration(mut self, duration: Duration) -> Self {
		self.duration = duration;
		self
	}

	pub fn plays(&self) -> Vec<String> {
		self.plays.lock().unwrap().clone()
	}
}

impl Default for ScriptedNarrator {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Narrator for ScriptedNarrator {
	async fn play(&self, resource: &str) -> Result<(), String> {
		self.plays.lock().unwrap().push(resource.to_string());
		tokio::time::sleep(self.duration).await;
		Ok(())
	}
}
