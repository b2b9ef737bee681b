use std::collections::HashMap;

use matchlog_models::{wyscout, MatchEventRecord};

/// Id lookup over a loaded event sequence, used to follow the id-based
/// back-references events carry. Built after parsing; if ids repeat, the
/// first occurrence wins.
#[derive(Debug)]
pub struct EventIndex<'a, E> {
    events: &'a [E],
    positions: HashMap<u64, usize>,
}

impl<'a, E: MatchEventRecord> EventIndex<'a, E> {
    pub fn build(events: &'a [E]) -> Self {
        let mut positions = HashMap::with_capacity(events.len());
        for (position, event) in events.iter().enumerate() {
            positions.entry(event.id()).or_insert(position);
        }

        if positions.len() < events.len() {
            tracing::warn!(
                "⚠️  {} events share an id with an earlier event",
                events.len() - positions.len()
            );
        }

        Self { events, positions }
    }

    pub fn get(&self, id: u64) -> Option<&'a E> {
        self.position(id).map(|position| &self.events[position])
    }

    pub fn position(&self, id: u64) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// The event named by `relatedEventId`, if it is part of this sequence.
    pub fn related(&self, event: &E) -> Option<&'a E> {
        event.related_event_id().and_then(|id| self.get(id))
    }

    /// Events belonging to one possession, in source order.
    pub fn possession(&self, possession_id: u64) -> impl Iterator<Item = &'a E> {
        let events = self.events;
        events
            .iter()
            .filter(move |event| event.possession_id() == Some(possession_id))
    }

    /// Number of distinct ids. Duplicated ids count once, so this can be
    /// smaller than the slice the index was built over.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl<'a> EventIndex<'a, wyscout::Event> {
    /// The other half of a ground or aerial duel.
    pub fn related_duel(&self, event: &wyscout::Event) -> Option<&'a wyscout::Event> {
        event.related_duel_id().and_then(|id| self.get(id))
    }

    /// The goalkeeper's reaction to a shot.
    pub fn goalkeeper_action(&self, event: &wyscout::Event) -> Option<&'a wyscout::Event> {
        event
            .shot
            .as_ref()
            .map(|shot| shot.goalkeeper_action_id)
            .filter(|id| *id != 0)
            .and_then(|id| self.get(id))
    }
}
