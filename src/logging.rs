use std::fs::{self, OpenOptions};
use std::io::Write;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

struct LogState {
	file: Option<std::fs::File>,
	current_date: String,
	role: String,
}

static LOG_STATE: Mutex<LogState> = Mutex::new(LogState {
	file: None,
	current_date: String::new(),
	role: String::new(),
});

fn today() -> String {
	let secs = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap()
		.as_secs();
	let days = secs / 86400;
	let year = 1970 + (days / 365);
	let day_of_year = days % 365;
	let month = day_of_year / 30 + 1;
	let day = day_of_year % 30 + 1;
	format!("{:04}-{:02}-{:02}", year, month.min(12), day.min(31))
}

fn timestamp() -> String {
	let now = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap();
	let secs = now.as_secs();
	let millis = now.as_millis() % 1000;
	let hours = (secs / 3600) % 24;
	let mins = (secs / 60) % 60;
	let s = secs % 60;
	format!("{:02}:{:02}:{:02}.{:03}", hours, mins, s, millis)
}

fn ensure_log_file(state: &mut LogState) {
	let date = today();
	if state.current_date != date || state.file.is_none() {
		let _ = fs::create_dir_all("logs");
		let path = format!("logs/trivia-{}.log", date);
		if let Ok(file) = OpenOptions::new()
			.create(true)
			.append(true)
			.open(&path)
		{
			state.file = Some(file);
			state.current_date = date;
		}
	}
}

pub fn set_role(role: &str) {
	if let Ok(mut state) = LOG_STATE.lock() {
		state.role = role.to_string();
	}
}

pub fn log(module: &str, log_type: &str, message: &str) {
	if let Ok(mut state) = LOG_STATE.lock() {
		ensure_log_file(&mut state);

		let role = if state.role.is_empty() { "--------" } else { &state.role };
		let line = format!(
			"[{}][{}][{}:{}] {}\n",
			timestamp(),
			role,
			module,
			log_type,
			message
		);

		if let Some(ref mut file) = state.file {
			let _ = file.write_all(line.as_bytes());
			let _ = file.flush();
		}
	}
}

pub mod net {
	use super::log;

	pub fn sent(what: &str) {
		log("Net", "SENT", what);
	}

	pub fn error(what: &str, message: &str) {
		log("Net", "ERROR", &format!("{}: {}", what, message));
	}
}

pub mod poller {
	use super::log;

	pub fn failed(message: &str) {
		log("Poller", "FAILED", message);
	}
}

pub mod render {
	use super::log;

	pub fn stage(key: &str) {
		log("Render", "STAGE", key);
	}
}

pub mod audio {
	use super::log;

	pub fn play(resource: &str) {
		log("Audio", "PLAY", resource);
	}

	pub fn finished() {
		log("Audio", "FINISHED", "playback ended");
	}

	pub fn error(resource: &str, message: &str) {
		log("Audio", "ERROR", &format!("{}: {}", resource, message));
	}
}
