use chrono::{DateTime, NaiveDate, Utc};
use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Accepts a string, number, bool or null where the model was asked for text.
/// Models regularly answer `"cost": 120` instead of `"cost": "$120"`.
fn deserialize_flexible_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleString {
        String(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Option::<FlexibleString>::deserialize(deserializer)? {
        Some(FlexibleString::String(s)) => s,
        Some(FlexibleString::Int(i)) => i.to_string(),
        Some(FlexibleString::Float(f)) => f.to_string(),
        Some(FlexibleString::Bool(b)) => b.to_string(),
        None => String::new(),
    })
}

/// Same as above for lists of text; a single string becomes a one-element list
fn deserialize_flexible_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleList {
        Many(Vec<serde_json::Value>),
        One(String),
    }

    let list = match Option::<FlexibleList>::deserialize(deserializer)? {
        Some(FlexibleList::Many(values)) => values,
        Some(FlexibleList::One(s)) => return Ok(vec![s]),
        None => return Ok(Vec::new()),
    };

    Ok(list
        .into_iter()
        .filter_map(|v| match v {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect())
}

/// A null list is an empty list
fn deserialize_nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ───────────────────────────────────────────────────────────────────────────────
// Trip request
// ───────────────────────────────────────────────────────────────────────────────

#[derive(EnumSetType, Debug)]
pub enum Preference {
    Fastest,
    Cheapest,
    MostComfortable,
    DirectRoutes,
    EcoFriendly,
    Luxury,
}

impl Preference {
    pub const ALL: [Preference; 6] = [
        Preference::Fastest,
        Preference::Cheapest,
        Preference::MostComfortable,
        Preference::DirectRoutes,
        Preference::EcoFriendly,
        Preference::Luxury,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            Preference::Fastest => "Fastest",
            Preference::Cheapest => "Cheapest",
            Preference::MostComfortable => "Most comfortable",
            Preference::DirectRoutes => "Direct routes",
            Preference::EcoFriendly => "Eco-friendly",
            Preference::Luxury => "Luxury",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Preference {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.to_ascii_lowercase().replace(['_', '-', ' '], "");
        match norm.as_str() {
            "fastest" => Ok(Preference::Fastest),
            "cheapest" => Ok(Preference::Cheapest),
            "mostcomfortable" => Ok(Preference::MostComfortable),
            "directroutes" => Ok(Preference::DirectRoutes),
            "ecofriendly" => Ok(Preference::EcoFriendly),
            "luxury" => Ok(Preference::Luxury),
            _ => Err(format!("unknown travel preference: {s}")),
        }
    }
}

/// Ordered set of preferences, serialized as a list of display labels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PreferenceSet(#[serde(with = "preference_set_serde")] pub EnumSet<Preference>);

impl Default for PreferenceSet {
    fn default() -> Self {
        PreferenceSet(EnumSet::only(Preference::Fastest))
    }
}

impl PreferenceSet {
    pub fn ordered(&self) -> impl Iterator<Item = Preference> + '_ {
        Preference::ALL.into_iter().filter(|p| self.0.contains(*p))
    }

    /// Comma-joined labels, the form used in prompts
    pub fn joined(&self) -> String {
        self.ordered()
            .map(|p| p.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<Preference> for PreferenceSet {
    fn from_iter<I: IntoIterator<Item = Preference>>(iter: I) -> Self {
        PreferenceSet(iter.into_iter().collect())
    }
}

mod preference_set_serde {
    use super::*;

    pub fn serialize<S>(set: &EnumSet<Preference>, s: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let v: Vec<&str> = Preference::ALL
            .into_iter()
            .filter(|p| set.contains(*p))
            .map(|p| p.label())
            .collect();
        v.serialize(s)
    }

    pub fn deserialize<'de, D>(d: D) -> Result<EnumSet<Preference>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v = Vec::<String>::deserialize(d)?;
        let mut out = EnumSet::empty();
        for s in v {
            let p = Preference::from_str(&s).map_err(serde::de::Error::custom)?;
            out.insert(p);
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BudgetTier {
    Budget,
    #[default]
    Moderate,
    Luxury,
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BudgetTier::Budget => "Budget",
            BudgetTier::Moderate => "Moderate",
            BudgetTier::Luxury => "Luxury",
        };
        f.write_str(s)
    }
}

fn default_travelers() -> u32 {
    1
}

/// One submission of the "Plan a Trip" form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripRequest {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub destination: String,
    pub date: NaiveDate,
    #[serde(default = "default_travelers")]
    pub travelers: u32,
    #[serde(default)]
    pub preferences: PreferenceSet,
    #[serde(default)]
    pub budget: BudgetTier,
}

impl TripRequest {
    /// Travel date in the `YYYY-MM-DD` form used by prompts and history
    pub fn date_text(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

// ───────────────────────────────────────────────────────────────────────────────
// Itinerary (model reply)
// ───────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Itinerary {
    #[serde(default)]
    pub travel_options: TravelOptions,
    #[serde(default)]
    pub destination_info: DestinationInfo,
    #[serde(default, deserialize_with = "deserialize_flexible_string")]
    pub recommendation: String,
    #[serde(default, deserialize_with = "deserialize_flexible_string")]
    pub estimated_total_cost: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportCategory {
    Flights,
    Trains,
    Buses,
    Cabs,
}

impl TransportCategory {
    pub const ALL: [TransportCategory; 4] = [
        TransportCategory::Flights,
        TransportCategory::Trains,
        TransportCategory::Buses,
        TransportCategory::Cabs,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            TransportCategory::Flights => "Flights",
            TransportCategory::Trains => "Trains",
            TransportCategory::Buses => "Buses",
            TransportCategory::Cabs => "Cabs",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TravelOptions {
    #[serde(default, deserialize_with = "deserialize_nullable_vec")]
    pub flights: Vec<TransportOption>,
    #[serde(default, deserialize_with = "deserialize_nullable_vec")]
    pub trains: Vec<TransportOption>,
    #[serde(default, deserialize_with = "deserialize_nullable_vec")]
    pub buses: Vec<TransportOption>,
    #[serde(default, deserialize_with = "deserialize_nullable_vec")]
    pub cabs: Vec<TransportOption>,
}

impl TravelOptions {
    pub fn get(&self, category: TransportCategory) -> &[TransportOption] {
        match category {
            TransportCategory::Flights => &self.flights,
            TransportCategory::Trains => &self.trains,
            TransportCategory::Buses => &self.buses,
            TransportCategory::Cabs => &self.cabs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TransportOption {
    #[serde(default, deserialize_with = "deserialize_flexible_string")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_flexible_string")]
    pub departure: String,
    #[serde(default, deserialize_with = "deserialize_flexible_string")]
    pub arrival: String,
    #[serde(default, deserialize_with = "deserialize_flexible_string")]
    pub duration: String,
    #[serde(default, deserialize_with = "deserialize_flexible_string")]
    pub cost: String,
    #[serde(default, deserialize_with = "deserialize_flexible_string")]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DestinationInfo {
    #[serde(default, deserialize_with = "deserialize_flexible_string")]
    pub weather: String,
    #[serde(default, deserialize_with = "deserialize_flexible_strings")]
    pub attractions: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_vec")]
    pub accommodations: Vec<Accommodation>,
    #[serde(default, deserialize_with = "deserialize_flexible_strings")]
    pub local_transport: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Accommodation {
    #[serde(default, deserialize_with = "deserialize_flexible_string")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "deserialize_flexible_string")]
    pub kind: String,
    #[serde(default, deserialize_with = "deserialize_flexible_string")]
    pub cost_per_night: String,
    #[serde(default, deserialize_with = "deserialize_flexible_string")]
    pub location: String,
}

/// Currency lookup reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CurrencyInfo {
    #[serde(default, deserialize_with = "deserialize_flexible_string")]
    pub local_currency: String,
    #[serde(default, deserialize_with = "deserialize_flexible_string")]
    pub exchange_rate: String,
}

// ───────────────────────────────────────────────────────────────────────────────
// History
// ───────────────────────────────────────────────────────────────────────────────

/// A saved itinerary in session history
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TripRecord {
    pub id: u64,
    pub source: String,
    pub destination: String,
    pub date: String,
    pub recommendation: String,
    pub estimated_cost: String,
    pub itinerary: Itinerary,
    pub saved_at: DateTime<Utc>,
}

/// Tabular projection of a [`TripRecord`]
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryRow {
    pub id: u64,
    pub source: String,
    pub destination: String,
    pub date: String,
    pub recommended: String,
    pub estimated_cost: String,
}

// ───────────────────────────────────────────────────────────────────────────────
// Gemini wire format
// ───────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

// Gemini generateContent request format
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

// Gemini generateContent response format
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if it has any
    pub fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        if text.is_empty() { None } else { Some(text) }
    }
}
