use crate::config::TimingConfig;
use crate::net::protocol::{GameSnapshot, GameStage, PlayerScore, QuestionStage};
use crate::session::ClientSession;
use crate::view::{Advance, Directive, Panel, RenderPass, TextField};

/// Maps one polled snapshot to the presenter's render pass. Directives are
/// recomputed on every pass and safe to reapply; a timed or immediate
/// proceed arms only when the stage key changed since the last pass, while
/// audio is requested every pass and deduplicated by the gate. A snapshot
/// missing a field its stage requires renders nothing and leaves the stage
/// key untouched.
pub fn render(
	session: &mut ClientSession,
	snapshot: &GameSnapshot,
	timing: &TimingConfig,
) -> RenderPass {
	match snapshot.game_stage {
		GameStage::WaitingForPlayers => {
			session.stage_changed(snapshot.stage_key());
			RenderPass {
				directives: vec![
					Directive::Hide(Panel::Results),
					Directive::SetText(TextField::PlayerCount, snapshot.num_players.to_string()),
					Directive::Show(Panel::Waiting),
				],
				advance: Advance::Wait,
			}
		}
		GameStage::IntroducePlayers => match (&snapshot.audio, &snapshot.tts_text) {
			// No narration was generated; nothing to show, skip the stage.
			(None, _) => {
				let entered = session.stage_changed(snapshot.stage_key());
				RenderPass {
					directives: Vec::new(),
					advance: if entered { Advance::Proceed } else { Advance::Wait },
				}
			}
			(Some(audio), Some(intro)) => {
				session.stage_changed(snapshot.stage_key());
				RenderPass {
					directives: vec![
						Directive::SetText(TextField::PlayerIntro, intro.clone()),
						Directive::Hide(Panel::Waiting),
						Directive::Show(Panel::PlayerIntro),
					],
					advance: Advance::Narrate(audio.clone()),
				}
			}
			(Some(_), None) => RenderPass::empty(),
		},
		GameStage::GameInProgress => {
			let Some(question_stage) = snapshot.question_stage else {
				return RenderPass::empty();
			};
			match question_stage {
				QuestionStage::QuestionIntroduction => {
					let Some(question) = &snapshot.question else {
						return RenderPass::empty();
					};
					let directives = vec![
						Directive::Hide(Panel::PlayerIntro),
						Directive::Hide(Panel::AnswerReveal),
						Directive::SetText(TextField::Question, question.clone()),
						Directive::Show(Panel::Question),
					];
					let entered = session.stage_changed(snapshot.stage_key());
					RenderPass {
						directives,
						advance: advance_for(snapshot, entered, timing),
					}
				}
				QuestionStage::QuestionAnswerTime => {
					let Some(answered) = snapshot.num_players_answered else {
						return RenderPass::empty();
					};
					session.stage_changed(snapshot.stage_key());
					// This stage ends only when the server says so.
					RenderPass {
						directives: vec![
							Directive::SetText(TextField::AnsweredCount, answered.to_string()),
							Directive::Show(Panel::AnsweredCount),
						],
						advance: Advance::Wait,
					}
				}
				QuestionStage::QuestionFinished => {
					let (Some(answer), Some(context)) = (&snapshot.answer, &snapshot.context)
					else {
						return RenderPass::empty();
					};
					let directives = vec![
						Directive::Hide(Panel::Question),
						Directive::Hide(Panel::AnsweredCount),
						Directive::SetText(TextField::Answer, answer.clone()),
						Directive::SetText(TextField::Context, context.clone()),
						Directive::Show(Panel::AnswerReveal),
					];
					let entered = session.stage_changed(snapshot.stage_key());
					RenderPass {
						directives,
						advance: advance_for(snapshot, entered, timing),
					}
				}
			}
		}
		GameStage::ResultsShow => {
			let directives = vec![
				Directive::Hide(Panel::Question),
				Directive::Hide(Panel::PlayerIntro),
				Directive::Hide(Panel::AnswerReveal),
				Directive::SetText(TextField::Scores, format_scores(&snapshot.scores)),
				Directive::Show(Panel::Results),
			];
			let entered = session.stage_changed(snapshot.stage_key());
			RenderPass {
				directives,
				advance: advance_for(snapshot, entered, timing),
			}
		}
	}
}

// Narration wins over the timer whenever the server attached audio.
fn advance_for(snapshot: &GameSnapshot, entered: bool, timing: &TimingConfig) -> Advance {
	match &snapshot.audio {
		Some(audio) => Advance::Narrate(audio.clone()),
		None if entered => Advance::ProceedAfter(timing.stage_advance_delay()),
		None => Advance::Wait,
	}
}

fn format_scores(scores: &[PlayerScore]) -> String {
	scores
		.iter()
		.enumerate()
		.map(|(place, score)| format!("{}. {}  {} pts", place + 1, score.player_name, score.points))
		.collect::<Vec<_>>()
		.join("\n")
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	fn snapshot(stage: GameStage) -> GameSnapshot {
		GameSnapshot {
			game_stage: stage,
			question_stage: None,
			num_players: 0,
			num_players_answered: None,
			tts_text: None,
			question: None,
			answer: None,
			context: None,
			scores: Vec::new(),
			answer_options: None,
			audio: None,
			question_number: None,
			question_start_time: None,
		}
	}

	fn question_snapshot(stage: QuestionStage) -> GameSnapshot {
		GameSnapshot {
			question_stage: Some(stage),
			question: Some("What is the capital of France?".to_string()),
			answer: Some("Paris".to_string()),
			context: Some("Since 508.".to_string()),
			num_players_answered: Some(0),
			..snapshot(GameStage::GameInProgress)
		}
	}

	#[test]
	fn test_waiting_shows_count_and_hides_results() {
		let mut session = ClientSession::new();
		let mut snap = snapshot(GameStage::WaitingForPlayers);
		snap.num_players = 3;

		let pass = render(&mut session, &snap, &TimingConfig::default());

		assert!(pass.directives.contains(&Directive::Show(Panel::Waiting)));
		assert!(pass.directives.contains(&Directive::Hide(Panel::Results)));
		assert!(pass
			.directives
			.contains(&Directive::SetText(TextField::PlayerCount, "3".to_string())));
		assert_eq!(pass.advance, Advance::Wait);
	}

	#[test]
	fn test_intro_without_audio_skips_stage_once() {
		let mut session = ClientSession::new();
		let snap = snapshot(GameStage::IntroducePlayers);
		let timing = TimingConfig::default();

		let first = render(&mut session, &snap, &timing);
		assert_eq!(first.advance, Advance::Proceed);

		let second = render(&mut session, &snap, &timing);
		assert_eq!(second.advance, Advance::Wait);
	}

	#[test]
	fn test_intro_with_audio_narrates_every_pass() {
		let mut session = ClientSession::new();
		let mut snap = snapshot(GameStage::IntroducePlayers);
		snap.audio = Some("audio/intro.mp3".to_string());
		snap.tts_text = Some("Welcome Alice and Bob!".to_string());
		let timing = TimingConfig::default();

		let first = render(&mut session, &snap, &timing);
		assert_eq!(first.advance, Advance::Narrate("audio/intro.mp3".to_string()));
		assert!(first.directives.contains(&Directive::Show(Panel::PlayerIntro)));
		assert!(first.directives.contains(&Directive::Hide(Panel::Waiting)));

		// The gate deduplicates; the renderer keeps asking.
		let second = render(&mut session, &snap, &timing);
		assert_eq!(second.advance, Advance::Narrate("audio/intro.mp3".to_string()));
	}

	#[test]
	fn test_question_intro_without_audio_arms_timer_once() {
		let mut session = ClientSession::new();
		let snap = question_snapshot(QuestionStage::QuestionIntroduction);
		let timing = TimingConfig::default();

		let first = render(&mut session, &snap, &timing);
		assert!(first.directives.contains(&Directive::Show(Panel::Question)));
		assert_eq!(first.advance, Advance::ProceedAfter(Duration::from_millis(5000)));

		let second = render(&mut session, &snap, &timing);
		assert_eq!(second.advance, Advance::Wait);
		assert!(second.directives.contains(&Directive::Show(Panel::Question)));
	}

	#[test]
	fn test_question_intro_with_audio_never_arms_timer() {
		let mut session = ClientSession::new();
		let mut snap = question_snapshot(QuestionStage::QuestionIntroduction);
		snap.audio = Some("audio/q1.mp3".to_string());

		let pass = render(&mut session, &snap, &TimingConfig::default());

		assert_eq!(pass.advance, Advance::Narrate("audio/q1.mp3".to_string()));
	}

	#[test]
	fn test_answer_time_shows_live_count_and_waits() {
		let mut session = ClientSession::new();
		let mut snap = question_snapshot(QuestionStage::QuestionAnswerTime);
		snap.num_players_answered = Some(2);

		let pass = render(&mut session, &snap, &TimingConfig::default());

		assert!(pass.directives.contains(&Directive::Show(Panel::AnsweredCount)));
		assert!(pass
			.directives
			.contains(&Directive::SetText(TextField::AnsweredCount, "2".to_string())));
		assert_eq!(pass.advance, Advance::Wait);
	}

	#[test]
	fn test_question_finished_reveals_answer() {
		let mut session = ClientSession::new();
		let snap = question_snapshot(QuestionStage::QuestionFinished);

		let pass = render(&mut session, &snap, &TimingConfig::default());

		assert!(pass.directives.contains(&Directive::Hide(Panel::Question)));
		assert!(pass.directives.contains(&Directive::Hide(Panel::AnsweredCount)));
		assert!(pass
			.directives
			.contains(&Directive::SetText(TextField::Answer, "Paris".to_string())));
		assert!(pass.directives.contains(&Directive::Show(Panel::AnswerReveal)));
		assert_eq!(pass.advance, Advance::ProceedAfter(Duration::from_millis(5000)));
	}

	#[test]
	fn test_results_formats_scores() {
		let mut session = ClientSession::new();
		let mut snap = snapshot(GameStage::ResultsShow);
		snap.scores = vec![
			PlayerScore {
				player_name: "Alice".to_string(),
				points: 4,
			},
			PlayerScore {
				player_name: "Bob".to_string(),
				points: 2,
			},
		];

		let pass = render(&mut session, &snap, &TimingConfig::default());

		assert!(pass.directives.contains(&Directive::SetText(
			TextField::Scores,
			"1. Alice  4 pts\n2. Bob  2 pts".to_string()
		)));
		assert!(pass.directives.contains(&Directive::Show(Panel::Results)));
	}

	#[test]
	fn test_in_progress_without_question_stage_renders_nothing() {
		let mut session = ClientSession::new();
		let snap = snapshot(GameStage::GameInProgress);

		let pass = render(&mut session, &snap, &TimingConfig::default());

		assert!(pass.is_empty());
	}

	#[test]
	fn test_missing_question_text_renders_nothing() {
		let mut session = ClientSession::new();
		let mut snap = question_snapshot(QuestionStage::QuestionIntroduction);
		snap.question = None;

		let pass = render(&mut session, &snap, &TimingConfig::default());

		assert!(pass.is_empty());
	}

	#[test]
	fn test_malformed_pass_does_not_consume_stage_entry() {
		let mut session = ClientSession::new();
		let timing = TimingConfig::default();

		let mut broken = question_snapshot(QuestionStage::QuestionIntroduction);
		broken.question = None;
		assert!(render(&mut session, &broken, &timing).is_empty());

		// The next complete snapshot of the same stage still arms the timer.
		let complete = question_snapshot(QuestionStage::QuestionIntroduction);
		let pass = render(&mut session, &complete, &timing);
		assert_eq!(pass.advance, Advance::ProceedAfter(Duration::from_millis(5000)));
	}

	#[test]
	fn test_stage_cycle_rearms_timer_for_next_question() {
		let mut session = ClientSession::new();
		let timing = TimingConfig::default();

		let intro = question_snapshot(QuestionStage::QuestionIntroduction);
		assert_eq!(
			render(&mut session, &intro, &timing).advance,
			Advance::ProceedAfter(Duration::from_millis(5000))
		);

		let mut answering = question_snapshot(QuestionStage::QuestionAnswerTime);
		answering.num_players_answered = Some(1);
		render(&mut session, &answering, &timing);

		let finished = question_snapshot(QuestionStage::QuestionFinished);
		assert_eq!(
			render(&mut session, &finished, &timing).advance,
			Advance::ProceedAfter(Duration::from_millis(5000))
		);

		// Next question comes back around to the introduction stage.
		let pass = render(&mut session, &intro, &timing);
		assert_eq!(pass.advance, Advance::ProceedAfter(Duration::from_millis(5000)));
	}
}
