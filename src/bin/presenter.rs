use std::sync::Arc;

use clap::Parser;

use trivia_tv::audio::{MutedNarrator, Narrator, RodioNarrator};
use trivia_tv::config::{self, ClientConfig};
use trivia_tv::controller::PresenterController;
use trivia_tv::defaults;
use trivia_tv::logging;
use trivia_tv::net::{GameService, HttpGameService};
use trivia_tv::poller::{PollTarget, Poller};
use trivia_tv::tui::{self, Role, TuiScreen};

#[derive(Parser)]
#[command(name = "presenter")]
#[command(about = "Shared-screen display and narrator for a trivia night")]
struct Cli {
	#[arg(short, long, env = "TRIVIA_SERVER")]
	server: Option<String>,

	/// Skip narration playback; narrated stages still advance on their own.
	#[arg(long)]
	mute: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
	let cli = Cli::parse();

	defaults::ensure_config();
	let mut config = config::load_client_auto().unwrap_or_else(|_| ClientConfig::default());
	if let Some(server) = cli.server {
		config.server_url = server;
	}

	logging::set_role("presenter");

	let service: Arc<dyn GameService> = Arc::new(HttpGameService::new(&config.server_url));
	let narrator: Arc<dyn Narrator> = if cli.mute {
		Arc::new(MutedNarrator)
	} else {
		Arc::new(RodioNarrator::new(&config.server_url))
	};

	let terminal = tui::setup_terminal()
		.map_err(|e| format!("Failed to set up terminal: {}", e))?;
	let screen = Box::new(TuiScreen::new(terminal, Role::Presenter));
	let actions = tui::spawn_input_thread(Role::Presenter);

	let poller = Poller::new(
		Arc::clone(&service),
		PollTarget::Presenter,
		config.timing.poll_interval(),
	);
	let controller =
		PresenterController::new(service, narrator, screen, config.timing.clone(), actions);

	let result = controller.run(poller).await;

	let _ = tui::restore_terminal();

	result
}
