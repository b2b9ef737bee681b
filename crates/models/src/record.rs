use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::decode::decode_event;
use crate::error::Result;

/// Fields every event schema shares, so call sites that only need these
/// stay independent of the provider.
pub trait MatchEventRecord {
    /// Provider event id.
    fn id(&self) -> u64;
    /// Id of the match the event belongs to.
    fn match_id(&self) -> u64;
    /// Period label such as `1H` or `2H`.
    fn match_period(&self) -> &str;
    fn minute(&self) -> u32;
    fn second(&self) -> u32;
    /// Clock string as exported, e.g. `00:00:01.530`.
    fn match_timestamp(&self) -> &str;
    /// Offset into the match video, in seconds.
    fn video_timestamp(&self) -> f64;
    /// Linked event, if the export named a non-zero one.
    fn related_event_id(&self) -> Option<u64>;
    /// Primary event type label.
    fn primary_type(&self) -> &str;
    /// Secondary type labels, in export order.
    fn secondary_types(&self) -> &[String];
    /// Id of the acting team.
    fn team_id(&self) -> u64;
    /// Name of the acting team.
    fn team_name(&self) -> &str;
    /// Id of the opposing team.
    fn opponent_team_id(&self) -> u64;
    /// Id of the acting player.
    fn player_id(&self) -> u64;
    /// Name of the acting player.
    fn player_name(&self) -> &str;
    /// Pitch location as `(x, y)`, when the event has one.
    fn coordinates(&self) -> Option<(i32, i32)>;
    /// Id of the possession sequence the event belongs to.
    fn possession_id(&self) -> Option<u64>;

    /// Elapsed match clock in seconds.
    fn clock_seconds(&self) -> u64 {
        u64::from(self.minute()) * 60 + u64::from(self.second())
    }

    fn has_secondary_type(&self, label: &str) -> bool {
        self.secondary_types().iter().any(|t| t == label)
    }
}

/// One schema variant: its event type plus the parser producing it.
pub trait EventSchema {
    /// Name used in configuration (`EVENT_SCHEMA`).
    const NAME: &'static str;

    /// The record this schema produces.
    type Event: MatchEventRecord + DeserializeOwned + std::fmt::Debug + Clone + PartialEq;

    /// Parses one element of the `events` array.
    fn parse_event(value: &Value) -> Result<Self::Event> {
        decode_event(value)
    }
}
