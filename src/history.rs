use chrono::Utc;

use crate::models::{HistoryRow, Itinerary, TripRecord};

const SUMMARY_FALLBACK_CHARS: usize = 50;
const NOT_AVAILABLE: &str = "N/A";

/// Saved trips for one session, in insertion order
#[derive(Debug, Default, Clone)]
pub struct HistoryStore {
    trips: Vec<TripRecord>,
    /// Highest id ever issued; deleted ids are never handed out again
    last_id: u64,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a copy of the itinerary and return its id. Ids start at 1 and
    /// strictly increase for the life of the store, across deletions.
    pub fn save(
        &mut self,
        itinerary: &Itinerary,
        source: &str,
        destination: &str,
        date: &str,
    ) -> u64 {
        let max_present = self.trips.iter().map(|t| t.id).max().unwrap_or(0);
        let id = self.last_id.max(max_present) + 1;
        self.last_id = id;

        let record = TripRecord {
            id,
            source: source.to_string(),
            destination: destination.to_string(),
            date: date.to_string(),
            recommendation: or_not_available(&itinerary.recommendation),
            estimated_cost: or_not_available(&itinerary.estimated_total_cost),
            itinerary: itinerary.clone(),
            saved_at: Utc::now(),
        };

        tracing::info!(trip_id = id, %source, %destination, "Trip saved to history");
        self.trips.push(record);
        id
    }

    pub fn list(&self) -> &[TripRecord] {
        &self.trips
    }

    pub fn get(&self, id: u64) -> Option<&TripRecord> {
        self.trips.iter().find(|t| t.id == id)
    }

    /// Remove a trip. Returns false, leaving the list untouched, if the id is unknown.
    pub fn delete(&mut self, id: u64) -> bool {
        let Some(pos) = self.trips.iter().position(|t| t.id == id) else {
            tracing::debug!(trip_id = id, "Delete requested for unknown trip");
            return false;
        };
        self.trips.remove(pos);
        tracing::info!(trip_id = id, "Trip deleted from history");
        true
    }

    pub fn as_table(&self) -> Vec<HistoryRow> {
        self.trips
            .iter()
            .map(|t| HistoryRow {
                id: t.id,
                source: t.source.clone(),
                destination: t.destination.clone(),
                date: t.date.clone(),
                recommended: summarize_recommendation(&t.recommendation),
                estimated_cost: t.estimated_cost.clone(),
            })
            .collect()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.trips.iter().map(|t| t.id).collect()
    }

    /// Selector label, e.g. "Trip 3: Paris → Rome"
    pub fn label(&self, id: u64) -> Option<String> {
        self.get(id)
            .map(|t| format!("Trip {}: {} → {}", t.id, t.source, t.destination))
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

/// Text before the first "." when there is one, else the first 50 characters
pub fn summarize_recommendation(recommendation: &str) -> String {
    match recommendation.split_once('.') {
        Some((first, _)) => first.to_string(),
        None => recommendation.chars().take(SUMMARY_FALLBACK_CHARS).collect(),
    }
}

fn or_not_available(text: &str) -> String {
    if text.trim().is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        text.to_string()
    }
}
