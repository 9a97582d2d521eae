use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Classification of an event's raw type tag.
///
/// The tag set is open: logbooks written by newer releases may contain tags
/// this build does not know. Those decode as [`EventKind::Other`] carrying
/// the raw tag, and re-encode to exactly the same tag. Classification only
/// matters when rendering an event, never when storing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    BabyBottle,
    Weight,
    BreastfeedingLeft,
    BreastfeedingBoth,
    BreastfeedingRight,
    DiaperPoo,
    DiaperPee,
    Medicine,
    Enema,
    Note,
    Custom,
    Colic,
    Temperature,
    Food,
    /// Unrecognized tag, preserved verbatim.
    Other(String),
}

impl EventKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "BABY_BOTTLE" => EventKind::BabyBottle,
            "WEIGHT" => EventKind::Weight,
            "BREASTFEEDING_LEFT_NIPPLE" => EventKind::BreastfeedingLeft,
            "BREASTFEEDING_BOTH_NIPPLE" => EventKind::BreastfeedingBoth,
            "BREASTFEEDING_RIGHT_NIPPLE" => EventKind::BreastfeedingRight,
            "DIAPERCHANGE_POO" => EventKind::DiaperPoo,
            "DIAPERCHANGE_PEE" => EventKind::DiaperPee,
            "MEDICINE" => EventKind::Medicine,
            "ENEMA" => EventKind::Enema,
            "NOTE" => EventKind::Note,
            "CUSTOM" => EventKind::Custom,
            "COLIC" => EventKind::Colic,
            "TEMPERATURE" => EventKind::Temperature,
            "FOOD" => EventKind::Food,
            other => EventKind::Other(other.to_string()),
        }
    }

    /// The tag this kind is stored under.
    pub fn tag(&self) -> &str {
        match self {
            EventKind::BabyBottle => "BABY_BOTTLE",
            EventKind::Weight => "WEIGHT",
            EventKind::BreastfeedingLeft => "BREASTFEEDING_LEFT_NIPPLE",
            EventKind::BreastfeedingBoth => "BREASTFEEDING_BOTH_NIPPLE",
            EventKind::BreastfeedingRight => "BREASTFEEDING_RIGHT_NIPPLE",
            EventKind::DiaperPoo => "DIAPERCHANGE_POO",
            EventKind::DiaperPee => "DIAPERCHANGE_PEE",
            EventKind::Medicine => "MEDICINE",
            EventKind::Enema => "ENEMA",
            EventKind::Note => "NOTE",
            EventKind::Custom => "CUSTOM",
            EventKind::Colic => "COLIC",
            EventKind::Temperature => "TEMPERATURE",
            EventKind::Food => "FOOD",
            EventKind::Other(tag) => tag,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            EventKind::BabyBottle => "🍼",
            EventKind::Weight => "⚖️",
            EventKind::BreastfeedingLeft
            | EventKind::BreastfeedingBoth
            | EventKind::BreastfeedingRight => "🤱",
            EventKind::DiaperPoo => "💩",
            EventKind::DiaperPee => "💦",
            EventKind::Medicine => "💊",
            EventKind::Enema => "🚿",
            EventKind::Note => "📝",
            EventKind::Custom => "⭐",
            EventKind::Colic => "😿",
            EventKind::Temperature => "🌡️",
            EventKind::Food => "🍎",
            EventKind::Other(_) => "❓",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventKind::BabyBottle => "Bottle feeding",
            EventKind::Weight => "Weight measurement",
            EventKind::BreastfeedingLeft => "Breastfeeding (left)",
            EventKind::BreastfeedingBoth => "Breastfeeding (both)",
            EventKind::BreastfeedingRight => "Breastfeeding (right)",
            EventKind::DiaperPoo => "Diaper change (poo)",
            EventKind::DiaperPee => "Diaper change (pee)",
            EventKind::Medicine => "Medicine",
            EventKind::Enema => "Enema",
            EventKind::Note => "Note",
            EventKind::Custom => "Custom event",
            EventKind::Colic => "Colic",
            EventKind::Temperature => "Temperature",
            EventKind::Food => "Food",
            EventKind::Other(_) => "Unknown event",
        }
    }

    pub fn is_breastfeeding(&self) -> bool {
        matches!(
            self,
            EventKind::BreastfeedingLeft
                | EventKind::BreastfeedingBoth
                | EventKind::BreastfeedingRight
        )
    }
}

impl From<String> for EventKind {
    fn from(tag: String) -> Self {
        EventKind::from_tag(&tag)
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.tag().to_string()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A single logged occurrence.
///
/// An event is stored as a flexible keyed record rather than a fixed
/// structure: only `type` and `time` are mandatory, and keys this build does
/// not model are kept in [`Event::extra`] and written back untouched, so a
/// logbook written by a newer release stays loadable (and re-savable) here.
///
/// `quantity` semantics depend on the kind: milliliters for bottles, grams
/// for weight, milligrams for medicine, tenths of a degree for temperature,
/// seconds of duration for breastfeeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Seconds since epoch, UTC. User-editable, so not necessarily
    /// monotonic relative to insertion order.
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Fields present in the stored record that this build does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Creates an event of the given kind, timestamped now.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            time: Utc::now().timestamp(),
            quantity: None,
            notes: None,
            extra: Map::new(),
        }
    }

    /// Sets the quantity. Zero means "not set" and is normalized away.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        if quantity > 0 {
            self.quantity = Some(quantity);
        }
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_time(mut self, time: i64) -> Self {
        self.time = time;
        self
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time, 0)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} qty: ", self.kind.tag())?;
        match self.quantity {
            Some(qty) => write!(f, "{}", qty)?,
            None => write!(f, "-")?,
        }
        match self.timestamp() {
            Some(ts) => write!(f, " time: {}", ts),
            None => write!(f, " time: {}", self.time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_new() {
        let event = Event::new(EventKind::DiaperPee);
        assert_eq!(event.kind, EventKind::DiaperPee);
        assert!(event.time > 0);
        assert!(event.quantity.is_none());
        assert!(event.notes.is_none());
        assert!(event.extra.is_empty());
    }

    #[test]
    fn test_zero_quantity_means_unset() {
        let event = Event::new(EventKind::BabyBottle).with_quantity(0);
        assert!(event.quantity.is_none());

        let event = Event::new(EventKind::BabyBottle).with_quantity(120);
        assert_eq!(event.quantity, Some(120));
    }

    #[test]
    fn test_kind_tag_roundtrip() {
        for tag in [
            "BABY_BOTTLE",
            "WEIGHT",
            "BREASTFEEDING_LEFT_NIPPLE",
            "BREASTFEEDING_BOTH_NIPPLE",
            "BREASTFEEDING_RIGHT_NIPPLE",
            "DIAPERCHANGE_POO",
            "DIAPERCHANGE_PEE",
            "MEDICINE",
            "ENEMA",
            "NOTE",
            "CUSTOM",
            "COLIC",
            "TEMPERATURE",
            "FOOD",
            "SOMETHING_FROM_THE_FUTURE",
        ] {
            assert_eq!(EventKind::from_tag(tag).tag(), tag);
        }
    }

    #[test]
    fn test_unknown_tag_classifies_as_other() {
        let kind = EventKind::from_tag("PACIFIER");
        assert_eq!(kind, EventKind::Other("PACIFIER".to_string()));
        assert_eq!(kind.label(), "Unknown event");
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let event = Event::new(EventKind::Medicine)
            .with_quantity(5)
            .with_notes("vitamin D");

        let json = serde_json::to_string(&event).unwrap();
        let decoded: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_decode_minimal_record() {
        let decoded: Event = serde_json::from_str(r#"{"type":"NOTE","time":1700000000}"#).unwrap();
        assert_eq!(decoded.kind, EventKind::Note);
        assert_eq!(decoded.time, 1700000000);
        assert!(decoded.quantity.is_none());
        assert!(decoded.notes.is_none());
    }

    #[test]
    fn test_decode_preserves_extra_fields() {
        let stored = r#"{"type":"BABY_BOTTLE","time":1700000000,"quantity":120,"temperature_unit":"C","mood":"happy"}"#;
        let decoded: Event = serde_json::from_str(stored).unwrap();
        assert_eq!(decoded.extra.len(), 2);
        assert_eq!(
            decoded.extra.get("mood"),
            Some(&Value::String("happy".to_string()))
        );

        let reencoded = serde_json::to_value(&decoded).unwrap();
        assert_eq!(reencoded.get("temperature_unit").and_then(Value::as_str), Some("C"));
        assert_eq!(reencoded.get("mood").and_then(Value::as_str), Some("happy"));
        assert_eq!(reencoded.get("quantity").and_then(Value::as_u64), Some(120));
    }

    #[test]
    fn test_decode_unknown_type_succeeds() {
        let stored = r#"{"type":"HICCUPS","time":1700000000}"#;
        let decoded: Event = serde_json::from_str(stored).unwrap();
        assert_eq!(decoded.kind, EventKind::Other("HICCUPS".to_string()));

        // The raw tag must survive a re-encode untouched.
        let reencoded = serde_json::to_value(&decoded).unwrap();
        assert_eq!(reencoded.get("type").and_then(Value::as_str), Some("HICCUPS"));
    }

    #[test]
    fn test_decode_fails_without_time() {
        let result = serde_json::from_str::<Event>(r#"{"type":"NOTE"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_fails_without_type() {
        let result = serde_json::from_str::<Event>(r#"{"time":1700000000}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_stored_zero_quantity_roundtrips() {
        // A record that already says "quantity": 0 is re-encoded verbatim,
        // even though constructors never produce one.
        let stored = r#"{"type":"WEIGHT","time":1700000000,"quantity":0}"#;
        let decoded: Event = serde_json::from_str(stored).unwrap();
        assert_eq!(decoded.quantity, Some(0));

        let reencoded = serde_json::to_value(&decoded).unwrap();
        assert_eq!(reencoded.get("quantity").and_then(Value::as_u64), Some(0));
    }
}
