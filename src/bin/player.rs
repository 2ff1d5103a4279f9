use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;

use trivia_tv::config::{self, ClientConfig};
use trivia_tv::controller::{self, PlayerController};
use trivia_tv::defaults;
use trivia_tv::logging;
use trivia_tv::net::{GameService, HttpGameService};
use trivia_tv::poller::{PollTarget, Poller};
use trivia_tv::tui::{self, Role, TuiScreen};

#[derive(Parser)]
#[command(name = "player")]
#[command(about = "Personal answering device for a trivia night")]
struct Cli {
	#[arg(short, long, env = "TRIVIA_SERVER")]
	server: Option<String>,

	#[arg(short, long)]
	name: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
	let cli = Cli::parse();

	defaults::ensure_config();
	let mut config = config::load_client_auto().unwrap_or_else(|_| ClientConfig::default());
	if let Some(server) = cli.server {
		config.server_url = server;
	}

	logging::set_role("player");

	let service: Arc<dyn GameService> = Arc::new(HttpGameService::new(&config.server_url));

	let name = match cli.name {
		Some(name) => name,
		None => prompt_name()?,
	};

	println!("Joining the game as {}...", name);
	let participant_id = match controller::register(service.as_ref(), &name).await {
		Ok(uuid) => uuid,
		Err(error) => {
			eprintln!("Could not join the game: {}", error);
			std::process::exit(1);
		}
	};

	let terminal = tui::setup_terminal()
		.map_err(|e| format!("Failed to set up terminal: {}", e))?;
	let screen = Box::new(TuiScreen::new(terminal, Role::Player));
	let actions = tui::spawn_input_thread(Role::Player);

	let poller = Poller::new(
		Arc::clone(&service),
		PollTarget::Player(participant_id.clone()),
		config.timing.poll_interval(),
	);
	let controller = PlayerController::new(service, participant_id, screen, actions);

	let result = controller.run(poller).await;

	let _ = tui::restore_terminal();

	result
}

fn prompt_name() -> Result<String, String> {
	print!("Enter your name: ");
	io::stdout()
		.flush()
		.map_err(|e| format!("Failed to prompt for a name: {}", e))?;

	let mut name = String::new();
	io::stdin()
		.read_line(&mut name)
		.map_err(|e| format!("Failed to read name: {}", e))?;

	let name = name.trim().to_string();
	if name.is_empty() {
		return Err("A name is required to join the game".to_string());
	}
	Ok(name)
}
