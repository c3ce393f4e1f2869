//! Advisor form state
//!
//! Both advisors share the same lifecycle: fill fields, validate, dispatch
//! one request, and display the returned markdown. A failed request leaves
//! any previously shown advice intact. Like the chat session, each form
//! tracks the id of the request it is waiting on and drops anything else.

use crate::api::types::{EventAdviceRequest, EventType, TravelAdviceRequest, VehicleType};
use crate::geo::{Coordinates, LocationState};
use chrono::NaiveDateTime;
use uuid::Uuid;

/// Accepted formats of the time fields
const TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

fn parse_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

fn validate_time_range(from_time: &str, to_time: &str) -> Result<(), String> {
    if from_time.trim().is_empty() || to_time.trim().is_empty() {
        return Err("Please select both start and end times.".to_string());
    }
    if parse_time(from_time).is_none() || parse_time(to_time).is_none() {
        return Err("Times must look like 2026-08-06T14:00.".to_string());
    }
    Ok(())
}

/// State of the event advisor page
#[derive(Debug)]
pub struct EventForm {
    pub location: LocationState,
    pub from_time: String,
    pub to_time: String,
    pub event_type: EventType,
    pub details: String,
    pub advice: Option<String>,
    inflight: Option<Uuid>,
}

impl EventForm {
    pub fn new(default_location: Coordinates) -> Self {
        Self {
            location: LocationState::new(default_location),
            from_time: String::new(),
            to_time: String::new(),
            event_type: EventType::Outdoor,
            details: String::new(),
            advice: None,
            inflight: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.inflight.is_some()
    }

    /// Validate and build the request. `Err` carries the validation notice;
    /// a submit while a request is in flight is silently rejected.
    pub fn submit(&mut self) -> Result<Option<(Uuid, EventAdviceRequest)>, String> {
        if self.inflight.is_some() {
            return Ok(None);
        }
        validate_time_range(&self.from_time, &self.to_time)?;

        let coordinates = self.location.coordinates();
        let request = EventAdviceRequest {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            from_time: self.from_time.trim().to_string(),
            to_time: self.to_time.trim().to_string(),
            event_type: self.event_type,
            event_details: self.details.clone(),
        };

        let request_id = Uuid::new_v4();
        self.inflight = Some(request_id);
        Ok(Some((request_id, request)))
    }

    pub fn advice_received(&mut self, request_id: Uuid, advice: String) -> bool {
        if self.inflight != Some(request_id) {
            return false;
        }
        self.inflight = None;
        self.advice = Some(advice);
        true
    }

    /// A failed request clears the loading state but keeps prior advice
    pub fn advice_failed(&mut self, request_id: Uuid) -> bool {
        if self.inflight != Some(request_id) {
            return false;
        }
        self.inflight = None;
        true
    }
}

/// State of the travel advisor page
#[derive(Debug)]
pub struct TravelForm {
    pub from_location: LocationState,
    pub to_location: LocationState,
    pub from_time: String,
    pub to_time: String,
    pub vehicle_type: VehicleType,
    pub details: String,
    pub advice: Option<String>,
    inflight: Option<Uuid>,
}

impl TravelForm {
    pub fn new(default_location: Coordinates) -> Self {
        Self {
            from_location: LocationState::new(default_location),
            to_location: LocationState::new(default_location),
            from_time: String::new(),
            to_time: String::new(),
            vehicle_type: VehicleType::Car,
            details: String::new(),
            advice: None,
            inflight: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.inflight.is_some()
    }

    pub fn submit(&mut self) -> Result<Option<(Uuid, TravelAdviceRequest)>, String> {
        if self.inflight.is_some() {
            return Ok(None);
        }
        validate_time_range(&self.from_time, &self.to_time)?;

        let from = self.from_location.coordinates();
        let to = self.to_location.coordinates();
        let request = TravelAdviceRequest {
            from_latitude: from.latitude,
            from_longitude: from.longitude,
            to_latitude: to.latitude,
            to_longitude: to.longitude,
            from_time: self.from_time.trim().to_string(),
            to_time: self.to_time.trim().to_string(),
            vehicle_type: self.vehicle_type,
            travel_details: self.details.clone(),
        };

        let request_id = Uuid::new_v4();
        self.inflight = Some(request_id);
        Ok(Some((request_id, request)))
    }

    pub fn advice_received(&mut self, request_id: Uuid, advice: String) -> bool {
        if self.inflight != Some(request_id) {
            return false;
        }
        self.inflight = None;
        self.advice = Some(advice);
        true
    }

    pub fn advice_failed(&mut self, request_id: Uuid) -> bool {
        if self.inflight != Some(request_id) {
            return false;
        }
        self.inflight = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_form() -> EventForm {
        EventForm::new(Coordinates::new(40.7128, -74.0060))
    }

    #[test]
    fn test_missing_times_block_submit() {
        let mut form = event_form();
        let error = form.submit().unwrap_err();
        assert!(error.contains("start and end times"));
        assert!(!form.is_loading());
    }

    #[test]
    fn test_malformed_times_block_submit() {
        let mut form = event_form();
        form.from_time = "next tuesday".to_string();
        form.to_time = "2026-08-06T18:00".to_string();
        assert!(form.submit().is_err());
    }

    #[test]
    fn test_submit_builds_request_from_state() {
        let mut form = event_form();
        form.from_time = "2026-08-06T10:00".to_string();
        form.to_time = "2026-08-06T18:00".to_string();
        form.event_type = EventType::Hybrid;
        form.details = "Rooftop meetup".to_string();

        let (request_id, request) = form.submit().unwrap().unwrap();
        assert_eq!(request.event_type, EventType::Hybrid);
        assert!((request.latitude - 40.7128).abs() < 1e-9);
        assert!(form.is_loading());

        // Second submit while in flight is a silent no-op
        assert!(form.submit().unwrap().is_none());

        assert!(form.advice_received(request_id, "Bring a tent.".to_string()));
        assert_eq!(form.advice.as_deref(), Some("Bring a tent."));
        assert!(!form.is_loading());
    }

    #[test]
    fn test_failure_keeps_previous_advice() {
        let mut form = event_form();
        form.from_time = "2026-08-06T10:00".to_string();
        form.to_time = "2026-08-06T18:00".to_string();

        let (first, _) = form.submit().unwrap().unwrap();
        form.advice_received(first, "Old advice".to_string());

        let (second, _) = form.submit().unwrap().unwrap();
        assert!(form.advice_failed(second));
        assert_eq!(form.advice.as_deref(), Some("Old advice"));
    }

    #[test]
    fn test_stale_advice_is_dropped() {
        let mut form = event_form();
        form.from_time = "2026-08-06T10:00".to_string();
        form.to_time = "2026-08-06T18:00".to_string();
        let _ = form.submit().unwrap().unwrap();

        assert!(!form.advice_received(Uuid::new_v4(), "from nowhere".to_string()));
        assert!(form.advice.is_none());
        assert!(form.is_loading());
    }

    #[test]
    fn test_travel_form_round_trip() {
        let mut form = TravelForm::new(Coordinates::new(40.7128, -74.0060));
        form.to_location.set(48.8566, 2.3522);
        form.from_time = "2026-08-06T08:00".to_string();
        form.to_time = "2026-08-07T20:00".to_string();
        form.vehicle_type = VehicleType::Flight;

        let (request_id, request) = form.submit().unwrap().unwrap();
        assert!((request.to_latitude - 48.8566).abs() < 1e-9);
        assert_eq!(request.vehicle_type, VehicleType::Flight);

        assert!(form.advice_received(request_id, "Pack light.".to_string()));
        assert_eq!(form.advice.as_deref(), Some("Pack light."));
    }
}
