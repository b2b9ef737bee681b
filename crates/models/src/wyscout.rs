//! Wyscout event schema.
//!
//! Every sub-structure is typed. Top-level keys are strict, while shot,
//! ground duel and infraction leaves fall back to zero values because the
//! provider omits them freely.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::{decode_event, nullable, truthy};
use crate::error::Result;
use crate::record::{EventSchema, MatchEventRecord};

/// Match files shipped with the Wyscout export, by match id.
pub const MATCH_FILES: [&str; 4] = ["5574548", "5574557", "5662871", "5637448"];

/// Primary label plus secondary labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type {
    pub primary: String,
    pub secondary: Vec<String>,
}

/// Pitch coordinates on the provider's 0-100 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
    pub formation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: u64,
    pub name: String,
    pub position: String,
}

/// Aerial duel opponent: a player plus their height in centimetres.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerWithHeight {
    #[serde(flatten)]
    pub player: Player,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goalkeeper {
    pub id: u64,
    pub name: String,
}

/// Pass height is numeric in some exports and a label (`"high"`) in others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PassHeight {
    Numeric(f64),
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pass {
    pub accurate: bool,
    pub angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<PassHeight>,
    pub length: f64,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Player>,
    pub end_location: Location,
}

/// Shot outcome. Every leaf falls back to its zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shot {
    #[serde(default, deserialize_with = "nullable")]
    pub body_part: String,
    #[serde(default, deserialize_with = "nullable")]
    pub is_goal: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub on_target: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub goal_zone: String,
    #[serde(default, deserialize_with = "nullable")]
    pub xg: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub post_shot_xg: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub goalkeeper_action_id: u64,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub goalkeeper: Option<Goalkeeper>,
}

/// Ground duel. Only `opponent` is required; the flags are read in
/// camelCase with the snake_case spelling as a fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundDuel {
    pub opponent: Player,
    #[serde(default, deserialize_with = "nullable", alias = "duel_type")]
    pub duel_type: String,
    #[serde(default, deserialize_with = "nullable", alias = "kept_possession")]
    pub kept_possession: bool,
    #[serde(default, deserialize_with = "nullable", alias = "progressed_with_ball")]
    pub progressed_with_ball: bool,
    #[serde(default, alias = "stopped_progress", skip_serializing_if = "Option::is_none")]
    pub stopped_progress: Option<bool>,
    #[serde(default, alias = "recovered_possession", skip_serializing_if = "Option::is_none")]
    pub recovered_possession: Option<bool>,
    #[serde(default, deserialize_with = "nullable", alias = "take_on")]
    pub take_on: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(default, deserialize_with = "nullable", alias = "related_duel_id")]
    pub related_duel_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AerialDuel {
    pub opponent: PlayerWithHeight,
    #[serde(default, deserialize_with = "nullable", alias = "first_touch")]
    pub first_touch: bool,
    pub height: i32,
    pub related_duel_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Infraction {
    #[serde(default, deserialize_with = "nullable", alias = "yellow_card")]
    pub yellow_card: bool,
    #[serde(default, deserialize_with = "nullable", alias = "red_card")]
    pub red_card: bool,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub infraction_type: String,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub opponent: Option<Player>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carry {
    pub progression: f64,
    pub end_location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attack {
    pub with_shot: bool,
    pub with_shot_on_goal: bool,
    pub with_goal: bool,
    pub flank: String,
    pub xg: f64,
}

/// Possession sequence the event belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Possession {
    pub id: u64,
    pub duration: f64,
    pub types: Vec<String>,
    pub events_number: u32,
    pub event_index: u32,
    pub start_location: Location,
    pub end_location: Location,
    pub team: Team,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub attack: Option<Attack>,
}

/// One event in the Wyscout schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: u64,
    pub match_id: u64,
    pub match_period: String,
    pub minute: u32,
    pub second: u32,
    pub match_timestamp: String,
    pub video_timestamp: f64,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub related_event_id: Option<u64>,
    #[serde(rename = "type")]
    pub event_type: Type,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub team: Team,
    pub opponent_team: Team,
    pub player: Player,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub pass: Option<Pass>,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub shot: Option<Shot>,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub ground_duel: Option<GroundDuel>,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub aerial_duel: Option<AerialDuel>,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub infraction: Option<Infraction>,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub carry: Option<Carry>,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub possession: Option<Possession>,
}

impl Event {
    /// Paired duel event id from whichever duel section is present.
    pub fn related_duel_id(&self) -> Option<u64> {
        self.ground_duel
            .as_ref()
            .map(|d| d.related_duel_id)
            .or_else(|| self.aerial_duel.as_ref().map(|d| d.related_duel_id))
            .filter(|id| *id != 0)
    }

    pub fn is_goal(&self) -> bool {
        self.shot.as_ref().is_some_and(|s| s.is_goal)
    }
}

/// Marker for the Wyscout schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wyscout;

impl EventSchema for Wyscout {
    const NAME: &'static str = "wyscout";

    type Event = Event;
}

/// Parses one Wyscout event.
pub fn parse_event(value: &Value) -> Result<Event> {
    decode_event(value)
}

impl MatchEventRecord for Event {
    fn id(&self) -> u64 {
        self.id
    }

    fn match_id(&self) -> u64 {
        self.match_id
    }

    fn match_period(&self) -> &str {
        &self.match_period
    }

    fn minute(&self) -> u32 {
        self.minute
    }

    fn second(&self) -> u32 {
        self.second
    }

    fn match_timestamp(&self) -> &str {
        &self.match_timestamp
    }

    fn video_timestamp(&self) -> f64 {
        self.video_timestamp
    }

    fn related_event_id(&self) -> Option<u64> {
        self.related_event_id
    }

    fn primary_type(&self) -> &str {
        &self.event_type.primary
    }

    fn secondary_types(&self) -> &[String] {
        &self.event_type.secondary
    }

    fn team_id(&self) -> u64 {
        self.team.id
    }

    fn team_name(&self) -> &str {
        &self.team.name
    }

    fn opponent_team_id(&self) -> u64 {
        self.opponent_team.id
    }

    fn player_id(&self) -> u64 {
        self.player.id
    }

    fn player_name(&self) -> &str {
        &self.player.name
    }

    fn coordinates(&self) -> Option<(i32, i32)> {
        self.location.map(|l| (l.x, l.y))
    }

    fn possession_id(&self) -> Option<u64> {
        self.possession.as_ref().map(|p| p.id)
    }
}
