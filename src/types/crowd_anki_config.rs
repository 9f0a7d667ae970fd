use serde::Serialize;
use uuid::Uuid;

/// Scheduling options shared by every deck of the export. The values are
/// fixed; nothing in the source document influences them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "__type__")]
pub struct DeckConfig {
	pub crowdanki_uuid: Uuid,
	pub name:           String,
	pub autoplay:       bool,

	#[serde(rename = "dyn")]
	pub is_dynamic: bool,

	pub lapse: LapseConfig,

	#[serde(rename = "maxTaken")]
	pub max_taken: i32,

	pub new:     NewConfig,
	pub replayq: bool,
	pub rev:     RevConfig,
	pub timer:   i32,

	#[serde(rename = "mod")]
	pub modified: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConfig {
	pub bury:           bool,
	pub delays:         Vec<i32>,
	pub initial_factor: i32,
	pub ints:           Vec<i32>,
	pub order:          i32,
	pub per_day:        i32,
	pub separate:       bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevConfig {
	pub bury:      bool,
	pub ease4:     f32,
	pub fuzz:      f32,
	pub ivl_fct:   i32,
	pub max_ivl:   i32,
	pub min_space: i32,
	pub per_day:   i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LapseConfig {
	pub delays:       Vec<i32>,
	pub leech_action: i32,
	pub leech_fails:  i32,
	pub min_int:      i32,
	pub mult:         i32,
}

impl DeckConfig {
	pub fn standard(crowdanki_uuid: Uuid) -> Self {
		Self {
			crowdanki_uuid,
			name: "Default".to_string(),
			autoplay: true,
			is_dynamic: false,
			lapse: LapseConfig { delays: vec![10], leech_action: 0, leech_fails: 8, min_int: 1, mult: 0 },
			max_taken: 60,
			new: NewConfig {
				bury:           true,
				delays:         vec![1, 10],
				initial_factor: 2500,
				ints:           vec![1, 4, 7],
				order:          1,
				per_day:        20,
				separate:       true,
			},
			replayq: true,
			rev: RevConfig {
				bury:      true,
				ease4:     1.3,
				fuzz:      0.05,
				ivl_fct:   1,
				max_ivl:   36500,
				min_space: 1,
				per_day:   200,
			},
			timer: 0,
			modified: 0,
		}
	}
}
