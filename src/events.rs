use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    GlobeHover,
    GlobeClick,
}

impl EventSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSource::GlobeHover => "globe-hover",
            EventSource::GlobeClick => "globe-click",
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventSource {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "globe-hover" => Ok(EventSource::GlobeHover),
            "globe-click" => Ok(EventSource::GlobeClick),
            other => Err(UnknownSource(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSource(pub String);

impl fmt::Display for UnknownSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event source '{}'", self.0)
    }
}

impl std::error::Error for UnknownSource {}

/// Hover/click payload as the charting component reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub points: Vec<EventPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPoint {
    #[serde(default)]
    pub hovertext: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl EventData {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            points: vec![EventPoint {
                hovertext: Some(label.into()),
                ..EventPoint::default()
            }],
        }
    }

    /// Anything that is not shaped like event data counts as no payload.
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        let value = value?;
        if value.is_null() {
            return None;
        }
        match serde_json::from_value(value.clone()) {
            Ok(data) => Some(data),
            Err(err) => {
                debug!("Ignoring malformed event payload: {}", err);
                None
            }
        }
    }

    pub fn from_slice(body: &[u8]) -> Option<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(Some(&value)),
            Err(err) => {
                debug!("Ignoring unparseable event body: {}", err);
                None
            }
        }
    }

    pub fn first_label(&self) -> Option<&str> {
        self.points.first()?.hovertext.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_point_label_is_used() {
        let value = json!({
            "points": [
                { "hovertext": "London", "lat": 51.47, "lon": -0.45, "curveNumber": 0 },
                { "hovertext": "Tokyo" }
            ]
        });
        let data = EventData::from_value(Some(&value)).unwrap();
        assert_eq!(data.first_label(), Some("London"));
        assert_eq!(data.points[0].lat, Some(51.47));
    }

    #[test]
    fn absent_or_null_payload_is_none() {
        assert_eq!(EventData::from_value(None), None);
        assert_eq!(EventData::from_value(Some(&Value::Null)), None);
    }

    #[test]
    fn wrong_shapes_degrade_to_none() {
        for value in [json!(42), json!("London"), json!([1, 2]), json!({ "points": "London" })] {
            assert_eq!(EventData::from_value(Some(&value)), None, "{}", value);
        }
    }

    #[test]
    fn missing_points_or_label_has_no_label() {
        let empty = EventData::from_value(Some(&json!({}))).unwrap();
        assert_eq!(empty.first_label(), None);

        let unlabelled = EventData::from_value(Some(&json!({ "points": [{ "lat": 1.0 }] }))).unwrap();
        assert_eq!(unlabelled.first_label(), None);
    }

    #[test]
    fn raw_bodies() {
        assert_eq!(EventData::from_slice(b""), None);
        assert_eq!(EventData::from_slice(b"  \n"), None);
        assert_eq!(EventData::from_slice(b"{not json"), None);
        assert_eq!(
            EventData::from_slice(br#"{"points":[{"hovertext":"Tokyo"}]}"#),
            Some(EventData::labelled("Tokyo"))
        );
    }

    #[test]
    fn sources_parse_by_name() {
        assert_eq!("globe-click".parse::<EventSource>(), Ok(EventSource::GlobeClick));
        assert_eq!(EventSource::GlobeHover.to_string(), "globe-hover");
        assert!("map-click".parse::<EventSource>().is_err());
    }
}
