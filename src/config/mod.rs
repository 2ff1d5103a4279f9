use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn config_paths(filename: &str) -> Vec<PathBuf> {
	let mut paths = Vec::new();

	if let Some(home) = std::env::var_os("HOME") {
		let user_config = PathBuf::from(home).join(".config/trivia-tv").join(filename);
		paths.push(user_config);
	}

	paths.push(PathBuf::from("config").join(filename));

	paths
}

fn find_config(filename: &str) -> Option<PathBuf> {
	config_paths(filename).into_iter().find(|p| p.exists())
}

pub fn resolve_config(filename: &str) -> Result<PathBuf, String> {
	find_config(filename).ok_or_else(|| {
		let searched: Vec<_> = config_paths(filename)
			.iter()
			.map(|p| p.display().to_string())
			.collect();
		format!("Config file '{}' not found. Searched: {}", filename, searched.join(", "))
	})
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
	#[serde(default = "default_poll_interval")]
	pub poll_interval_ms: u64,
	#[serde(default = "default_stage_advance_delay")]
	pub stage_advance_delay_ms: u64,
	#[serde(default = "default_post_audio_delay")]
	pub post_audio_delay_ms: u64,
}

fn default_poll_interval() -> u64 {
	1000
}

fn default_stage_advance_delay() -> u64 {
	5000
}

fn default_post_audio_delay() -> u64 {
	3000
}

impl Default for TimingConfig {
	fn default() -> Self {
		Self {
			poll_interval_ms: default_poll_interval(),
			stage_advance_delay_ms: default_stage_advance_delay(),
			post_audio_delay_ms: default_post_audio_delay(),
		}
	}
}

impl TimingConfig {
	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}

	pub fn stage_advance_delay(&self) -> Duration {
		Duration::from_millis(self.stage_advance_delay_ms)
	}

	pub fn post_audio_delay(&self) -> Duration {
		Duration::from_millis(self.post_audio_delay_ms)
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
	#[serde(default = "default_server_url")]
	pub server_url: String,
	#[serde(default)]
	pub timing: TimingConfig,
}

fn default_server_url() -> String {
	"http://127.0.0.1:8000".to_string()
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			server_url: default_server_url(),
			timing: TimingConfig::default(),
		}
	}
}

pub fn load_client<P: AsRef<Path>>(path: P) -> Result<ClientConfig, String> {
	let content = fs::read_to_string(&path)
		.map_err(|e| format!("Failed to read {}: {}", path.as_ref().display(), e))?;

	toml::from_str(&content)
		.map_err(|e| format!("Failed to parse client config: {}", e))
}

pub fn load_client_auto() -> Result<ClientConfig, String> {
	let path = resolve_config("client.toml")?;
	load_client(&path)
}
