//! Prompt templates for the itinerary and currency calls.

use crate::models::TripRequest;

const ITINERARY_SKELETON: &str = r#"{
    "travel_options": {
        "flights": [
            { "name": "Airline name", "departure": "time", "arrival": "time", "duration": "hours", "cost": "price range", "notes": "any additional info" }
        ],
        "trains": [...],
        "buses": [...],
        "cabs": [...]
    },
    "destination_info": {
        "weather": "weather description",
        "attractions": ["attraction1", "attraction2", "attraction3"],
        "accommodations": [
            { "name": "hotel name", "type": "hotel/hostel/etc", "cost_per_night": "price", "location": "area" }
        ],
        "local_transport": ["option1", "option2"]
    },
    "recommendation": "your brief recommendation on best travel option",
    "estimated_total_cost": "estimated range for travel + 3 days accommodation"
}"#;

/// Instruction for the main itinerary call. Every request field lands verbatim
/// in its labelled slot; callers validate the fields beforehand.
pub fn build_itinerary_prompt(request: &TripRequest) -> String {
    format!(
        r#"You are a knowledgeable travel assistant that provides accurate and helpful travel information.

Based on the following details, provide detailed travel options with estimated costs:

Source: {source}
Destination: {destination}
Travel Date: {date}
Travelers: {travelers}
Preferences: {preferences}
Budget Range: {budget}

For each of the following transportation modes, provide available options, travel time, and estimated cost ranges:
1. Flights
2. Trains
3. Buses
4. Cabs/Taxis

Additionally, provide:
- Brief weather information for the destination on the travel date
- Top 3 attractions at the destination
- 2-3 accommodation options within the specified budget
- Local transportation options at the destination

Format your response as a properly formatted JSON object with the following structure:
{skeleton}

Only respond with a valid JSON. Do not include any other text, explanations, or invalid characters.
"#,
        source = request.source,
        destination = request.destination,
        date = request.date_text(),
        travelers = request.travelers,
        preferences = request.preferences.joined(),
        budget = request.budget,
        skeleton = ITINERARY_SKELETON,
    )
}

/// Instruction for the currency lookup
pub fn build_currency_prompt(destination: &str) -> String {
    format!(
        r#"Provide the current currency used in {destination} and the approximate exchange rate from USD.
Format as JSON: {{"local_currency": "Currency Name (CODE)", "exchange_rate": "1 USD = X Local Currency"}}
Only respond with a valid JSON.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_json;
    use crate::models::{BudgetTier, Preference, PreferenceSet};
    use chrono::NaiveDate;

    fn request() -> TripRequest {
        TripRequest {
            source: "New York".to_string(),
            destination: "Los Angeles".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
            travelers: 2,
            preferences: [Preference::Fastest, Preference::EcoFriendly]
                .into_iter()
                .collect::<PreferenceSet>(),
            budget: BudgetTier::Moderate,
        }
    }

    #[test]
    fn test_itinerary_prompt_fills_every_slot() {
        let prompt = build_itinerary_prompt(&request());

        assert!(prompt.contains("Source: New York\n"));
        assert!(prompt.contains("Destination: Los Angeles\n"));
        assert!(prompt.contains("Travel Date: 2025-01-01\n"));
        assert!(prompt.contains("Travelers: 2\n"));
        assert!(prompt.contains("Preferences: Fastest, Eco-friendly\n"));
        assert!(prompt.contains("Budget Range: Moderate\n"));

        for value in [
            "New York",
            "Los Angeles",
            "2025-01-01",
            "Fastest, Eco-friendly",
            "Moderate",
        ] {
            assert_eq!(prompt.matches(value).count(), 1, "{value} should appear once");
        }
    }

    #[test]
    fn test_itinerary_prompt_demands_json_only() {
        let prompt = build_itinerary_prompt(&request());
        assert!(prompt.contains("Only respond with a valid JSON"));
        assert!(prompt.contains("\"travel_options\""));
        assert!(prompt.contains("\"estimated_total_cost\""));
    }

    #[test]
    fn test_fields_are_not_validated() {
        let mut req = request();
        req.source = String::new();
        let prompt = build_itinerary_prompt(&req);
        assert!(prompt.contains("Source: \n"));
    }

    #[test]
    fn test_currency_prompt() {
        let prompt = build_currency_prompt("Tokyo, Japan");
        assert!(prompt.contains("currency used in Tokyo, Japan"));
        assert!(prompt.contains(
            r#"{"local_currency": "Currency Name (CODE)", "exchange_rate": "1 USD = X Local Currency"}"#
        ));

        // The embedded example is itself the expected reply shape
        let example = extract_json(&prompt).expect("example JSON is well formed");
        assert!(example.get("local_currency").is_some());
    }
}
