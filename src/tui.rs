use std::io::{self, stdout, Stdout};
use std::thread;
use std::time::Duration;

use crossterm::{
	event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
	execute,
	terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
	backend::CrosstermBackend,
	layout::{Constraint, Direction, Layout, Rect},
	style::{Color, Style},
	widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
	Frame, Terminal,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::controller::UserAction;
use crate::logging;
use crate::screen::{Screen, ScreenState};
use crate::view::{Panel, TextField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
	Presenter,
	Player,
}

pub fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
	enable_raw_mode()?;
	let mut out = stdout();
	execute!(out, EnterAlternateScreen)?;
	Terminal::new(CrosstermBackend::new(out))
}

pub fn restore_terminal() -> io::Result<()> {
	disable_raw_mode()?;
	execute!(stdout(), LeaveAlternateScreen)?;
	Ok(())
}

pub struct TuiScreen {
	terminal: Terminal<CrosstermBackend<Stdout>>,
	state: ScreenState,
	role: Role,
}

impl TuiScreen {
	pub fn new(terminal: Terminal<CrosstermBackend<Stdout>>, role: Role) -> Self {
		Self {
			terminal,
			state: ScreenState::new(),
			role,
		}
	}
}

impl Screen for TuiScreen {
	fn apply(&mut self, directives: &[crate::view::Directive]) {
		self.state.apply(directives);
	}

	fn draw(&mut self) -> Result<(), String> {
		let state = &self.state;
		let role = self.role;
		self.terminal
			.draw(|f| draw_screen(f, state, role))
			.map(|_| ())
			.map_err(|e| format!("Failed to draw screen: {}", e))
	}
}

// Key presses are read on a dedicated thread and forwarded as actions; the
// thread winds down when the receiving side goes away or quit is sent.
pub fn spawn_input_thread(role: Role) -> UnboundedReceiver<UserAction> {
	let (tx, rx) = mpsc::unbounded_channel();

	thread::spawn(move || {
		loop {
			let ready = match event::poll(Duration::from_millis(100)) {
				Ok(ready) => ready,
				Err(_) => break,
			};
			if !ready {
				if tx.is_closed() {
					break;
				}
				continue;
			}
			let Ok(Event::Key(key)) = event::read() else {
				continue;
			};
			if key.kind != KeyEventKind::Press {
				continue;
			}

			let action = if key.code == KeyCode::Char('c')
				&& key.modifiers.contains(KeyModifiers::CONTROL)
			{
				Some(UserAction::Quit)
			} else {
				map_key(role, key.code)
			};

			if let Some(action) = action {
				logging::log("Tui", "INPUT", &format!("{:?}", action));
				let quit = action == UserAction::Quit;
				if tx.send(action).is_err() || quit {
					break;
				}
			}
		}
	});

	rx
}

fn map_key(role: Role, key: KeyCode) -> Option<UserAction> {
	match (role, key) {
		(_, KeyCode::Char('q') | KeyCode::Esc) => Some(UserAction::Quit),
		(Role::Presenter, KeyCode::Char('s') | KeyCode::Enter) => Some(UserAction::StartGame),
		(Role::Presenter, KeyCode::Char('n')) => Some(UserAction::NewGame),
		(Role::Player, KeyCode::Char('1')) => Some(UserAction::Answer(0)),
		(Role::Player, KeyCode::Char('2')) => Some(UserAction::Answer(1)),
		(Role::Player, KeyCode::Char('3')) => Some(UserAction::Answer(2)),
		(Role::Player, KeyCode::Char('4')) => Some(UserAction::Answer(3)),
		_ => None,
	}
}

fn draw_screen(f: &mut Frame, state: &ScreenState, role: Role) {
	let chunks = Layout::default()
		.direction(Direction::Vertical)
		.constraints([
			Constraint::Length(3),
			Constraint::Min(10),
			Constraint::Length(3),
		])
		.split(f.area());

	let title = match role {
		Role::Presenter => "Trivia Night",
		Role::Player => "Trivia Night  -  Player",
	};
	let header = Paragraph::new(title)
		.style(Style::default().fg(Color::Green))
		.block(Block::default().borders(Borders::ALL));
	f.render_widget(header, chunks[0]);

	match role {
		Role::Presenter => draw_presenter_body(f, state, chunks[1]),
		Role::Player => draw_player_body(f, state, chunks[1]),
	}

	let help_text = match role {
		Role::Presenter => "S Start game  N New game  Q Quit",
		Role::Player => "1-4 Answer  Q Quit",
	};
	let help = Paragraph::new(help_text)
		.style(Style::default().fg(Color::DarkGray))
		.block(Block::default().borders(Borders::ALL));
	f.render_widget(help, chunks[2]);
}

fn draw_presenter_body(f: &mut Frame, state: &ScreenState, area: Rect) {
	let mut title = "Get Ready";
	let mut lines: Vec<String> = Vec::new();

	if state.is_visible(Panel::Results) {
		title = "Final Scores";
		lines.push(state.text(TextField::Scores).to_string());
	} else if state.is_visible(Panel::AnswerReveal) {
		title = "The Answer";
		lines.push(state.text(TextField::Answer).to_string());
		lines.push(String::new());
		lines.push(state.text(TextField::Context).to_string());
	} else if state.is_visible(Panel::Question) {
		title = "Question";
		lines.push(state.text(TextField::Question).to_string());
		if state.is_visible(Panel::AnsweredCount) {
			lines.push(String::new());
			lines.push(format!("Answers in: {}", state.text(TextField::AnsweredCount)));
		}
	} else if state.is_visible(Panel::PlayerIntro) {
		title = "Meet the Players";
		lines.push(state.text(TextField::PlayerIntro).to_string());
	} else if state.is_visible(Panel::Waiting) {
		title = "Waiting for Players";
		lines.push(format!("Players joined: {}", state.text(TextField::PlayerCount)));
		lines.push(String::new());
		lines.push("Press S to start the game".to_string());
	}

	let body = Paragraph::new(lines.join("\n"))
		.wrap(Wrap { trim: false })
		.block(Block::default().title(title).borders(Borders::ALL));
	f.render_widget(body, area);
}

fn draw_player_body(f: &mut Frame, state: &ScreenState, area: Rect) {
	if state.is_visible(Panel::Answers) {
		if let Some(options) = state.answer_options() {
			let items: Vec<ListItem> = options
				.iter()
				.enumerate()
				.map(|(i, option)| ListItem::new(format!("[{}] {}", i + 1, option)))
				.collect();
			let list = List::new(items)
				.block(Block::default().title("Your Answer").borders(Borders::ALL));
			f.render_widget(list, area);
			return;
		}
	}

	let text = if state.is_visible(Panel::Waiting) {
		"You are in! Waiting for the game to start..."
	} else {
		"Look at the TV!"
	};
	let body = Paragraph::new(text)
		.wrap(Wrap { trim: false })
		.block(Block::default().borders(Borders::ALL));
	f.render_widget(body, area);
}
