use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::view::{Directive, Panel, TextField};

// Accumulated UI state: which panels are visible and what the text fields
// say. The renderer only ever talks to it through directives.
#[derive(Debug, Clone, Default)]
pub struct ScreenState {
	visible: HashSet<Panel>,
	texts: HashMap<TextField, String>,
	answer_options: Option<[String; 4]>,
}

impl ScreenState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn apply(&mut self, directives: &[Directive]) {
		for directive in directives {
			match directive {
				Directive::Show(panel) => {
					self.visible.insert(*panel);
				}
				Directive::Hide(panel) => {
					self.visible.remove(panel);
				}
				Directive::SetText(field, text) => {
					self.texts.insert(*field, text.clone());
				}
				Directive::SetAnswerOptions(options) => {
					self.answer_options = Some(options.clone());
				}
			}
		}
	}

	pub fn is_visible(&self, panel: Panel) -> bool {
		self.visible.contains(&panel)
	}

	pub fn text(&self, field: TextField) -> &str {
		self.texts.get(&field).map(String::as_str).unwrap_or("")
	}

	pub fn answer_options(&self) -> Option<&[String; 4]> {
		self.answer_options.as_ref()
	}
}

pub trait Screen: Send {
	fn apply(&mut self, directives: &[Directive]);

	fn draw(&mut self) -> Result<(), String>;
}

// Screen with no output device; the shared handle lets tests inspect what
// the directives produced.
pub struct HeadlessScreen {
	state: Arc<Mutex<ScreenState>>,
}

impl HeadlessScreen {
	pub fn new() -> Self {
		Self {
			state: Arc::new(Mutex::new(ScreenState::new())),
		}
	}

	pub fn handle(&self) -> Arc<Mutex<ScreenState>> {
		Arc::clone(&self.state)
	}
}

impl Default for HeadlessScreen {
	fn default() -> Self {
		Self::new()
	}
}

impl Screen for HeadlessScreen {
	fn apply(&mut self, directives: &[Directive]) {
		self.state.lock().unwrap().apply(directives);
	}

	fn draw(&mut self) -> Result<(), String> {
		Ok(())
	}
}
