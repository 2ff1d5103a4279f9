use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use trivia_tv::audio::{Narrator, ScriptedNarrator};
use trivia_tv::config::TimingConfig;
use trivia_tv::controller::{self, PlayerController, PresenterController, UserAction};
use trivia_tv::net::test_service::{RecordedCall, ScriptedService};
use trivia_tv::net::{Command, GameService, GameSnapshot, RegisterResponse};
use trivia_tv::poller::{PollTarget, Poller};
use trivia_tv::screen::HeadlessScreen;
use trivia_tv::view::Panel;

fn snapshot(json: &str) -> GameSnapshot {
	serde_json::from_str(json).expect("Test snapshot should parse")
}

fn presenter_fixture(
	service: &Arc<ScriptedService>,
	narrator: Arc<dyn Narrator>,
) -> (PresenterController, Poller, mpsc::UnboundedSender<UserAction>) {
	let (actions_tx, actions_rx) = mpsc::unbounded_channel();
	let screen = Box::new(HeadlessScreen::new());
	let timing = TimingConfig::default();
	let poller = Poller::new(
		Arc::clone(service) as Arc<dyn GameService>,
		PollTarget::Presenter,
		timing.poll_interval(),
	);
	let controller = PresenterController::new(
		Arc::clone(service) as Arc<dyn GameService>,
		narrator,
		screen,
		timing,
		actions_rx,
	);
	(controller, poller, actions_tx)
}

#[tokio::test(start_paused = true)]
async fn test_silent_question_advances_after_exactly_five_seconds() {
	let service = Arc::new(ScriptedService::new().with_snapshots(vec![snapshot(
		r#"{"game_stage":"GameInProgress","question_stage":"QuestionIntroduction",
		    "question":"What is the capital of France?","audio":null}"#,
	)]));
	let narrator = Arc::new(ScriptedNarrator::new());
	let (controller, poller, actions_tx) =
		presenter_fixture(&service, Arc::clone(&narrator) as Arc<dyn Narrator>);

	let started = Instant::now();
	let handle = tokio::spawn(controller.run(poller));
	tokio::time::sleep(Duration::from_secs(12)).await;
	actions_tx.send(UserAction::Quit).unwrap();
	handle.await.unwrap().unwrap();

	let commands = service.commands();
	assert_eq!(commands.len(), 1, "Repeated polls must not stack timers");
	assert_eq!(commands[0].1, Command::Proceed);
	assert_eq!(
		commands[0].0.duration_since(started),
		Duration::from_millis(5000),
		"Proceed should fire exactly at the stage delay"
	);
	assert!(narrator.plays().is_empty(), "No audio call for a silent stage");
}

#[tokio::test(start_paused = true)]
async fn test_narrated_question_advances_after_playback_plus_delay() {
	let service = Arc::new(ScriptedService::new().with_snapshots(vec![snapshot(
		r#"{"game_stage":"GameInProgress","question_stage":"QuestionIntroduction",
		    "question":"Who painted this?","audio":"audio/q1.mp3"}"#,
	)]));
	let narrator =
		Arc::new(ScriptedNarrator::new().with_duration(Duration::from_millis(2000)));
	let (controller, poller, actions_tx) =
		presenter_fixture(&service, Arc::clone(&narrator) as Arc<dyn Narrator>);

	let started = Instant::now();
	let handle = tokio::spawn(controller.run(poller));
	tokio::time::sleep(Duration::from_secs(12)).await;
	actions_tx.send(UserAction::Quit).unwrap();
	handle.await.unwrap().unwrap();

	// Playback is requested once even though the same snapshot was polled
	// every second the whole time.
	assert_eq!(narrator.plays(), vec!["audio/q1.mp3".to_string()]);
	let polls = service
		.calls()
		.iter()
		.filter(|(_, call)| *call == RecordedCall::PresenterState)
		.count();
	assert!(polls >= 10, "Expected steady polling, saw {}", polls);

	let commands = service.commands();
	assert_eq!(commands.len(), 1, "No timer may be armed for a narrated stage");
	assert_eq!(
		commands[0].0.duration_since(started),
		Duration::from_millis(5000),
		"Proceed should fire at playback end plus the post-audio delay"
	);
}

#[tokio::test(start_paused = true)]
async fn test_intro_without_narration_is_skipped_immediately() {
	let service = Arc::new(ScriptedService::new().with_snapshots(vec![snapshot(
		r#"{"game_stage":"IntroducePlayers","num_players":2,"audio":null,"tts_text":null}"#,
	)]));
	let narrator = Arc::new(ScriptedNarrator::new());
	let (controller, poller, actions_tx) =
		presenter_fixture(&service, Arc::clone(&narrator) as Arc<dyn Narrator>);

	let started = Instant::now();
	let handle = tokio::spawn(controller.run(poller));
	tokio::time::sleep(Duration::from_secs(5)).await;
	actions_tx.send(UserAction::Quit).unwrap();
	handle.await.unwrap().unwrap();

	let commands = service.commands();
	assert_eq!(commands.len(), 1, "The skip must not repeat on later polls");
	assert_eq!(commands[0].1, Command::Proceed);
	assert_eq!(commands[0].0.duration_since(started), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_answer_time_waits_for_the_server() {
	let service = Arc::new(ScriptedService::new().with_snapshots(vec![snapshot(
		r#"{"game_stage":"GameInProgress","question_stage":"QuestionAnswerTime",
		    "num_players_answered":"2","audio":null}"#,
	)]));
	let narrator = Arc::new(ScriptedNarrator::new());
	let (controller, poller, actions_tx) =
		presenter_fixture(&service, Arc::clone(&narrator) as Arc<dyn Narrator>);

	let handle = tokio::spawn(controller.run(poller));
	tokio::time::sleep(Duration::from_secs(10)).await;
	actions_tx.send(UserAction::Quit).unwrap();
	handle.await.unwrap().unwrap();

	assert!(
		service.commands().is_empty(),
		"Answer time ends only via a server-driven transition"
	);
}

#[tokio::test(start_paused = true)]
async fn test_waiting_screen_shows_player_count() {
	let service = Arc::new(ScriptedService::new().with_snapshots(vec![snapshot(
		r#"{"game_stage":"WaitingForPlayers","num_players":3}"#,
	)]));
	let narrator = Arc::new(ScriptedNarrator::new());
	let (actions_tx, actions_rx) = mpsc::unbounded_channel();
	let screen = HeadlessScreen::new();
	let screen_state = screen.handle();
	let timing = TimingConfig::default();
	let poller = Poller::new(
		Arc::clone(&service) as Arc<dyn GameService>,
		PollTarget::Presenter,
		timing.poll_interval(),
	);
	let controller = PresenterController::new(
		Arc::clone(&service) as Arc<dyn GameService>,
		narrator,
		Box::new(screen),
		timing,
		actions_rx,
	);

	let handle = tokio::spawn(controller.run(poller));
	tokio::time::sleep(Duration::from_secs(2)).await;
	actions_tx.send(UserAction::Quit).unwrap();
	handle.await.unwrap().unwrap();

	let state = screen_state.lock().unwrap();
	assert!(state.is_visible(Panel::Waiting));
	assert!(!state.is_visible(Panel::Results));
	assert_eq!(state.text(trivia_tv::view::TextField::PlayerCount), "3");
}

#[tokio::test(start_paused = true)]
async fn test_player_answer_round_trip() {
	let service = Arc::new(ScriptedService::new());
	let (_actions_tx, actions_rx) = mpsc::unbounded_channel();
	let screen = HeadlessScreen::new();
	let screen_state = screen.handle();
	let mut controller = PlayerController::new(
		Arc::clone(&service) as Arc<dyn GameService>,
		"abc-123".to_string(),
		Box::new(screen),
		actions_rx,
	);

	let open_question = snapshot(
		r#"{"game_stage":"GameInProgress","question_stage":"QuestionAnswerTime",
		    "answer_options":["Paris","London","Berlin","Madrid"]}"#,
	);

	controller.handle_snapshot(&open_question);
	assert!(screen_state.lock().unwrap().is_visible(Panel::Answers));

	controller.handle_action(UserAction::Answer(0)).await;
	assert_eq!(
		service.answers(),
		vec![("abc-123".to_string(), "Paris".to_string())]
	);
	{
		let state = screen_state.lock().unwrap();
		assert!(!state.is_visible(Panel::Answers));
		assert!(state.is_visible(Panel::LookAtTv));
	}

	// The same open question keeps the answer panel down and a second
	// press submits nothing.
	controller.handle_snapshot(&open_question);
	assert!(!screen_state.lock().unwrap().is_visible(Panel::Answers));
	controller.handle_action(UserAction::Answer(1)).await;
	assert_eq!(service.answers().len(), 1);

	// The next question opens the panel again.
	controller.handle_snapshot(&snapshot(
		r#"{"game_stage":"GameInProgress","question_stage":"QuestionFinished"}"#,
	));
	controller.handle_snapshot(&open_question);
	assert!(screen_state.lock().unwrap().is_visible(Panel::Answers));
	controller.handle_action(UserAction::Answer(1)).await;
	assert_eq!(service.answers().len(), 2);
	assert_eq!(service.answers()[1].1, "London");
}

#[tokio::test]
async fn test_rejected_registration_starts_no_polling() {
	let service = Arc::new(ScriptedService::new().with_register_response(RegisterResponse {
		success: false,
		uuid: None,
		error: Some("Player already registered".to_string()),
	}));

	let result = controller::register(service.as_ref(), "Alice").await;

	assert_eq!(result, Err("Player already registered".to_string()));
	let calls = service.calls();
	assert_eq!(calls.len(), 1);
	assert_eq!(calls[0].1, RecordedCall::Register("Alice".to_string()));
}

#[tokio::test]
async fn test_successful_registration_returns_identity() {
	let service = Arc::new(ScriptedService::new().with_register_response(RegisterResponse {
		success: true,
		uuid: Some("abc-123".to_string()),
		error: None,
	}));

	let result = controller::register(service.as_ref(), "Alice").await;

	assert_eq!(result, Ok("abc-123".to_string()));
}
