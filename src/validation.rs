use crate::error::{Result, TravelPlannerError};
use crate::models::TripRequest;

pub const MIN_TRAVELERS: u32 = 1;
pub const MAX_TRAVELERS: u32 = 10;

/// Checks run on a trip request before any model call is issued
#[derive(Debug, Default, Clone)]
pub struct InputValidator;

impl InputValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_trip_request(&self, request: &TripRequest) -> Result<()> {
        self.validate_location("source", &request.source)?;
        self.validate_location("destination", &request.destination)?;
        self.validate_travelers(request.travelers)?;
        Ok(())
    }

    fn validate_location(&self, field: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(TravelPlannerError::InvalidInput(format!(
                "Please enter both source and destination locations ({field} is empty)."
            )));
        }
        Ok(())
    }

    fn validate_travelers(&self, travelers: u32) -> Result<()> {
        if !(MIN_TRAVELERS..=MAX_TRAVELERS).contains(&travelers) {
            return Err(TravelPlannerError::InvalidInput(format!(
                "Number of travelers must be between {MIN_TRAVELERS} and {MAX_TRAVELERS}, got {travelers}."
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetTier, PreferenceSet};
    use chrono::NaiveDate;

    fn request(source: &str, destination: &str, travelers: u32) -> TripRequest {
        TripRequest {
            source: source.to_string(),
            destination: destination.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
            travelers,
            preferences: PreferenceSet::default(),
            budget: BudgetTier::Budget,
        }
    }

    #[test]
    fn test_valid_request() {
        let v = InputValidator::new();
        assert!(v.validate_trip_request(&request("New York", "Los Angeles", 2)).is_ok());
    }

    #[test]
    fn test_blank_locations_rejected() {
        let v = InputValidator::new();
        for (source, destination) in [("", "Rome"), ("Paris", "   "), ("", "")] {
            let err = v
                .validate_trip_request(&request(source, destination, 1))
                .expect_err("blank location");
            assert!(matches!(err, TravelPlannerError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_traveler_bounds() {
        let v = InputValidator::new();
        assert!(v.validate_trip_request(&request("A", "B", 0)).is_err());
        assert!(v.validate_trip_request(&request("A", "B", 10)).is_ok());
        assert!(v.validate_trip_request(&request("A", "B", 11)).is_err());
    }
}
