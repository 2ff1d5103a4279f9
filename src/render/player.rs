use crate::net::protocol::{GameSnapshot, GameStage};
use crate::session::ClientSession;
use crate::view::{Advance, Directive, Panel, RenderPass};

/// Maps one polled snapshot to the player's render pass. `override_game` is
/// set by the controller when an answer goes out and cleared here whenever
/// the stage leaves the answerable set, so a player who answered keeps
/// seeing the placeholder until the next question opens.
pub fn render(session: &mut ClientSession, snapshot: &GameSnapshot) -> RenderPass {
	let directives = match snapshot.game_stage {
		GameStage::WaitingForPlayers => {
			session.override_game = false;
			vec![
				Directive::Hide(Panel::Answers),
				Directive::Hide(Panel::LookAtTv),
				Directive::Show(Panel::Waiting),
			]
		}
		GameStage::GameInProgress => {
			let Some(question_stage) = snapshot.question_stage else {
				return RenderPass::empty();
			};
			if !question_stage.answerable() {
				session.override_game = false;
				vec![
					Directive::Hide(Panel::Waiting),
					Directive::Hide(Panel::Answers),
					Directive::Show(Panel::LookAtTv),
				]
			} else if session.override_game {
				vec![
					Directive::Hide(Panel::Waiting),
					Directive::Hide(Panel::Answers),
					Directive::Show(Panel::LookAtTv),
				]
			} else {
				let Some(options) = snapshot.four_options() else {
					return RenderPass::empty();
				};
				vec![
					Directive::Hide(Panel::Waiting),
					Directive::Hide(Panel::LookAtTv),
					Directive::SetAnswerOptions(options),
					Directive::Show(Panel::Answers),
				]
			}
		}
		GameStage::IntroducePlayers | GameStage::ResultsShow => {
			session.override_game = false;
			vec![
				Directive::Hide(Panel::Waiting),
				Directive::Hide(Panel::Answers),
				Directive::Show(Panel::LookAtTv),
			]
		}
	};

	RenderPass {
		directives,
		advance: Advance::Wait,
	}
}
