//! Provider-neutral event schema.
//!
//! Only passes and possessions are typed here. Shots, duels, infractions,
//! carries and possession attacks stay as raw JSON so the schema accepts
//! whatever shape a provider sends for them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::{decode_event, truthy};
use crate::error::Result;
use crate::record::{EventSchema, MatchEventRecord};

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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pass {
    pub accurate: bool,
    pub angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    pub length: f64,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Player>,
    pub end_location: Location,
}

/// Possession sequence the event belongs to. `attack` stays untyped.
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
    pub attack: Option<Value>,
}

/// One event in the provider-neutral schema.
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
    pub shot: Option<Value>,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub ground_duel: Option<Value>,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub aerial_duel: Option<Value>,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub infraction: Option<Value>,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub carry: Option<Value>,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub possession: Option<Possession>,
}

/// Marker for the provider-neutral schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct Generic;

impl EventSchema for Generic {
    const NAME: &'static str = "generic";

    type Event = Event;
}

/// Parses one generic event.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "id": 663_291_838,
            "matchId": 5_574_548,
            "matchPeriod": "1H",
            "minute": 0,
            "second": 1,
            "matchTimestamp": "00:00:01.530",
            "videoTimestamp": 2.530_553,
            "relatedEventId": 663_291_840,
            "type": {"primary": "pass", "secondary": ["short_or_medium_pass"]},
            "location": {"x": 50, "y": 50},
            "team": {"id": 3166, "name": "Bologna", "formation": "4-2-3-1"},
            "opponentTeam": {"id": 3315, "name": "Lazio", "formation": "4-3-3"},
            "player": {"id": 20_612, "name": "M. Arnautović", "position": "CF"},
            "pass": {
                "accurate": true,
                "angle": -162.0,
                "height": null,
                "length": 13.0,
                "recipient": {"id": 3426, "name": "N. Schouten", "position": "RDMF"},
                "endLocation": {"x": 40, "y": 54}
            },
            "shot": null,
            "groundDuel": {"duelType": "dribble"},
            "possession": {
                "id": 663_291_838,
                "duration": 12.6,
                "types": ["attack"],
                "eventsNumber": 6,
                "eventIndex": 0,
                "startLocation": {"x": 50, "y": 50},
                "endLocation": {"x": 30, "y": 70},
                "team": {"id": 3166, "name": "Bologna", "formation": "4-2-3-1"},
                "attack": {"withShot": false}
            }
        })
    }

    #[test]
    fn test_parse_full_event() {
        let event = parse_event(&sample()).unwrap();

        assert_eq!(event.id, 663_291_838);
        assert_eq!(event.match_id, 5_574_548);
        assert_eq!(event.related_event_id, Some(663_291_840));
        assert_eq!(event.event_type.secondary, vec!["short_or_medium_pass"]);
        assert_eq!(event.location, Some(Location { x: 50, y: 50 }));

        let pass = event.pass.as_ref().unwrap();
        assert!(pass.accurate);
        assert_eq!(pass.height, None);
        assert_eq!(pass.recipient.as_ref().unwrap().name, "N. Schouten");
        assert_eq!(pass.end_location, Location { x: 40, y: 54 });

        assert_eq!(event.shot, None);
        assert_eq!(event.ground_duel, Some(json!({"duelType": "dribble"})));
        assert_eq!(event.aerial_duel, None);

        let possession = event.possession.as_ref().unwrap();
        assert_eq!(possession.events_number, 6);
        assert_eq!(possession.attack, Some(json!({"withShot": false})));
    }

    #[test]
    fn test_location_is_optional() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("location");
        let event = parse_event(&value).unwrap();
        assert_eq!(event.location, None);
        assert_eq!(event.coordinates(), None);

        value["location"] = json!({});
        assert_eq!(parse_event(&value).unwrap().location, None);
    }

    #[test]
    fn test_location_needs_both_coordinates() {
        let mut value = sample();
        value["location"] = json!({"x": 50});
        match parse_event(&value).unwrap_err() {
            IngestError::MissingField { field, event_id } => {
                assert_eq!(field, "location.y");
                assert_eq!(event_id, Some(663_291_838));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_pass_missing_end_location_fails() {
        let mut value = sample();
        value["pass"].as_object_mut().unwrap().remove("endLocation");

        assert!(matches!(
            parse_event(&value),
            Err(IngestError::MissingField { field, .. }) if field == "pass.endLocation"
        ));
    }

    #[test]
    fn test_serialized_event_parses_back() {
        let event = parse_event(&sample()).unwrap();
        let reparsed = parse_event(&serde_json::to_value(&event).unwrap()).unwrap();
        assert_eq!(reparsed, event);
    }

    #[test]
    fn test_shared_accessors() {
        let event = parse_event(&sample()).unwrap();
        assert_eq!(event.primary_type(), "pass");
        assert!(event.has_secondary_type("short_or_medium_pass"));
        assert_eq!(event.coordinates(), Some((50, 50)));
        assert_eq!(event.clock_seconds(), 1);
        assert_eq!(event.possession_id(), Some(663_291_838));
    }

    #[test]
    fn test_clock_seconds_widens_long_clocks() {
        let mut value = sample();
        value["minute"] = json!(100_000_000);
        value["second"] = json!(59);
        let event = parse_event(&value).unwrap();
        assert_eq!(event.clock_seconds(), 6_000_000_059);

        value["minute"] = json!(u32::MAX);
        value["second"] = json!(u32::MAX);
        let event = parse_event(&value).unwrap();
        assert_eq!(event.clock_seconds(), u64::from(u32::MAX) * 61);
    }
}
