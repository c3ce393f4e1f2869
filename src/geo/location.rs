//! Shared coordinate state behind the location pickers
//!
//! Three input paths feed the same coordinates: free-text search resolved by
//! the geocoding service, direct numeric entry, and programmatic sets (a map
//! click in the original interface). Last writer wins; a failed or empty
//! search leaves the coordinates untouched.

use uuid::Uuid;

/// A point on the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// State of one location picker
#[derive(Debug, Clone)]
pub struct LocationState {
    coordinates: Coordinates,
    /// Text shown in the latitude field; parsed on edit, invalid input
    /// falls back to 0
    pub latitude_text: String,
    pub longitude_text: String,
    pub search_query: String,
    inflight: Option<Uuid>,
}

impl LocationState {
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            latitude_text: format_coordinate(coordinates.latitude),
            longitude_text: format_coordinate(coordinates.longitude),
            search_query: String::new(),
            inflight: None,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn is_searching(&self) -> bool {
        self.inflight.is_some()
    }

    /// The single funnel every input path goes through
    pub fn set(&mut self, latitude: f64, longitude: f64) {
        self.coordinates = Coordinates::new(latitude, longitude);
        self.latitude_text = format_coordinate(latitude);
        self.longitude_text = format_coordinate(longitude);
    }

    /// Apply an edited latitude field; unparseable input becomes 0
    pub fn apply_latitude_text(&mut self) {
        let latitude = self.latitude_text.trim().parse::<f64>().unwrap_or(0.0);
        self.set(latitude, self.coordinates.longitude);
    }

    /// Apply an edited longitude field; unparseable input becomes 0
    pub fn apply_longitude_text(&mut self) {
        let longitude = self.longitude_text.trim().parse::<f64>().unwrap_or(0.0);
        self.set(self.coordinates.latitude, longitude);
    }

    /// Start a search for the current query.
    ///
    /// Returns the id and query to dispatch, or `None` for a blank query or
    /// while a search is already running.
    pub fn begin_search(&mut self) -> Option<(Uuid, String)> {
        let query = self.search_query.trim();
        if query.is_empty() || self.inflight.is_some() {
            return None;
        }

        let request_id = Uuid::new_v4();
        self.inflight = Some(request_id);
        Some((request_id, query.to_string()))
    }

    /// Deliver a search result. `None` (no match, or the service failed)
    /// leaves the coordinates unchanged. Results for a request this picker
    /// is not waiting on are ignored.
    pub fn search_resolved(&mut self, request_id: Uuid, result: Option<Coordinates>) -> bool {
        if self.inflight != Some(request_id) {
            return false;
        }

        self.inflight = None;
        if let Some(found) = result {
            self.set(found.latitude, found.longitude);
        }
        true
    }
}

fn format_coordinate(value: f64) -> String {
    format!("{:.4}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_york() -> LocationState {
        LocationState::new(Coordinates::new(40.7128, -74.0060))
    }

    #[test]
    fn test_numeric_entry_parse_or_zero() {
        let mut location = new_york();

        location.latitude_text = "48.8566".to_string();
        location.apply_latitude_text();
        assert!((location.coordinates().latitude - 48.8566).abs() < 1e-9);

        location.latitude_text = "not a number".to_string();
        location.apply_latitude_text();
        assert_eq!(location.coordinates().latitude, 0.0);
        // Longitude is untouched by a latitude edit
        assert!((location.coordinates().longitude - (-74.0060)).abs() < 1e-9);
    }

    #[test]
    fn test_last_writer_wins() {
        let mut location = new_york();

        location.set(10.0, 20.0);
        location.latitude_text = "33.0".to_string();
        location.apply_latitude_text();
        location.set(1.5, 2.5);

        assert_eq!(location.coordinates(), Coordinates::new(1.5, 2.5));
        assert_eq!(location.latitude_text, "1.5000");
    }

    #[test]
    fn test_blank_search_is_noop() {
        let mut location = new_york();
        location.search_query = "   ".to_string();
        assert!(location.begin_search().is_none());
        assert!(!location.is_searching());
    }

    #[test]
    fn test_search_without_result_keeps_coordinates() {
        let mut location = new_york();
        location.search_query = "Paris".to_string();

        let (request_id, query) = location.begin_search().unwrap();
        assert_eq!(query, "Paris");

        assert!(location.search_resolved(request_id, None));
        assert_eq!(location.coordinates(), Coordinates::new(40.7128, -74.0060));
        assert!(!location.is_searching());
    }

    #[test]
    fn test_search_result_updates_coordinates() {
        let mut location = new_york();
        location.search_query = "Paris".to_string();

        let (request_id, _) = location.begin_search().unwrap();
        assert!(location.search_resolved(
            request_id,
            Some(Coordinates::new(48.8566, 2.3522))
        ));
        assert_eq!(location.coordinates(), Coordinates::new(48.8566, 2.3522));
    }

    #[test]
    fn test_stale_search_result_is_ignored() {
        let mut location = new_york();
        location.search_query = "Paris".to_string();
        let _ = location.begin_search().unwrap();

        let stale = Uuid::new_v4();
        assert!(!location.search_resolved(stale, Some(Coordinates::new(0.0, 0.0))));
        assert_eq!(location.coordinates(), Coordinates::new(40.7128, -74.0060));
        assert!(location.is_searching());
    }

    #[test]
    fn test_second_search_waits_for_first() {
        let mut location = new_york();
        location.search_query = "Paris".to_string();
        let _ = location.begin_search().unwrap();

        location.search_query = "London".to_string();
        assert!(location.begin_search().is_none());
    }
}
