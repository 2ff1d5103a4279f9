use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStage {
	WaitingForPlayers,
	IntroducePlayers,
	GameInProgress,
	ResultsShow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionStage {
	QuestionIntroduction,
	QuestionAnswerTime,
	QuestionFinished,
}

impl QuestionStage {
	pub fn answerable(&self) -> bool {
		matches!(self, QuestionStage::QuestionAnswerTime)
	}
}

pub type StageKey = (GameStage, Option<QuestionStage>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerScore {
	pub player_name: String,
	pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameSnapshot {
	pub game_stage: GameStage,
	#[serde(default)]
	pub question_stage: Option<QuestionStage>,
	#[serde(default)]
	pub num_players: u64,
	#[serde(default, deserialize_with = "count_field")]
	pub num_players_answered: Option<u64>,
	#[serde(default)]
	pub tts_text: Option<String>,
	#[serde(default)]
	pub question: Option<String>,
	#[serde(default)]
	pub answer: Option<String>,
	#[serde(default)]
	pub context: Option<String>,
	#[serde(default)]
	pub scores: Vec<PlayerScore>,
	#[serde(default)]
	pub answer_options: Option<Vec<String>>,
	#[serde(default)]
	pub audio: Option<String>,
	#[serde(default)]
	pub question_number: Option<u64>,
	#[serde(default)]
	pub question_start_time: Option<u64>,
}

impl GameSnapshot {
	pub fn stage_key(&self) -> StageKey {
		(self.game_stage, self.question_stage)
	}

	// The server always deals exactly four options; anything else is malformed.
	pub fn four_options(&self) -> Option<[String; 4]> {
		let options = self.answer_options.as_ref()?;
		if options.len() != 4 {
			return None;
		}
		Some([
			options[0].clone(),
			options[1].clone(),
			options[2].clone(),
			options[3].clone(),
		])
	}
}

// The server stringifies the answered count; older payloads carry a number.
fn count_field<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Number(u64),
		Text(String),
	}

	match Option::<Raw>::deserialize(deserializer)? {
		None => Ok(None),
		Some(Raw::Number(n)) => Ok(Some(n)),
		Some(Raw::Text(s)) => s
			.trim()
			.parse()
			.map(Some)
			.map_err(|e| serde::de::Error::custom(format!("bad count '{}': {}", s, e))),
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
	pub success: bool,
	#[serde(default)]
	pub uuid: Option<String>,
	#[serde(default)]
	pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
	pub success: bool,
	#[serde(default)]
	pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
	Proceed,
	NewGame,
}

impl Command {
	pub fn as_str(&self) -> &'static str {
		match self {
			Command::Proceed => "proceed",
			Command::NewGame => "newgame",
		}
	}
}
