use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of pipe-delimited fields in a correlation alarm record.
pub const MIN_ALARM_FIELDS: usize = 11;

const DISPLAY_KEY_FIELD: usize = 4;
const SEVERITY_FIELD: usize = 10;

#[derive(Debug, Error)]
pub enum AlarmParseError {
    #[error("invalid alarm record: found {found} fields, expected at least 11")]
    TooFewFields { found: usize },
}

/// One decoded correlation alarm. Only the display key and the severity
/// text matter for rebalancing; the other fields are carried by the alarm
/// platform and ignored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmEvent {
    pub display_key: String,
    pub severity_text: String,
}

impl AlarmEvent {
    pub fn parse(raw: &str) -> Result<Self, AlarmParseError> {
        let fields: Vec<&str> = raw.split('|').collect();
        if fields.len() < MIN_ALARM_FIELDS {
            return Err(AlarmParseError::TooFewFields {
                found: fields.len(),
            });
        }
        Ok(Self {
            display_key: fields[DISPLAY_KEY_FIELD].to_string(),
            severity_text: fields[SEVERITY_FIELD].to_string(),
        })
    }

    /// Splits the display key into the switch element name and the raw
    /// interface descriptor. Display keys look like
    /// `SWITCH-01.Ethernet1/27/SPINE ...`; anything without both segments
    /// cannot be routed.
    pub fn display_key_parts(&self) -> Option<(&str, &str)> {
        let mut segments = self.display_key.split('.');
        let element = segments.next()?;
        let descriptor = segments.next()?;
        Some((element, descriptor))
    }
}

/// The two rebalancing variants an alarm can trigger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlarmAction {
    /// Utilization escalated above the threshold: degrade the link.
    EscalateCost,
    /// Utilization dropped below the threshold: restore the link.
    RecoverCost,
}

/// Severity phrases recognized in alarm text such as
/// `Escalated above 51.0 %` or `Dropped below 50.0 %`. The trailing
/// percentage is not parsed.
const SEVERITY_PHRASES: [(&str, AlarmAction); 2] = [
    ("escalated above", AlarmAction::EscalateCost),
    ("dropped below", AlarmAction::RecoverCost),
];

impl AlarmAction {
    /// Case-insensitive phrase lookup; first matching phrase wins. `None`
    /// means the alarm is not a cost alarm and the invocation is a no-op.
    pub fn from_severity_text(text: &str) -> Option<Self> {
        let normalized = text.to_ascii_lowercase();
        SEVERITY_PHRASES
            .iter()
            .find(|(phrase, _)| normalized.contains(phrase))
            .map(|(_, action)| *action)
    }
}

impl Display for AlarmAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::EscalateCost => "escalate",
            Self::RecoverCost => "recover",
        };
        write!(f, "{display}")
    }
}

#[cfg(test)]
mod tests {
    use super::{AlarmAction, AlarmEvent};

    fn record(display_key: &str, severity: &str) -> String {
        format!("1|2|3|4|{display_key}|6|7|8|9|10|{severity}")
    }

    #[test]
    fn parses_display_key_and_severity() {
        let raw = record("SW-01.Ethernet1/27/SPINE X-SPINE1-Eth1/6 10", "Escalated above 51.0 %");
        let event = AlarmEvent::parse(&raw).expect("failed to parse alarm");
        assert_eq!(
            event.display_key,
            "SW-01.Ethernet1/27/SPINE X-SPINE1-Eth1/6 10"
        );
        assert_eq!(event.severity_text, "Escalated above 51.0 %");
    }

    #[test]
    fn rejects_short_records() {
        let err = AlarmEvent::parse("a|b|c").unwrap_err();
        assert!(err.to_string().contains("3 fields"));
    }

    #[test]
    fn splits_display_key() {
        let raw = record("SW-01.Ethernet1/1/p2p to LEAF-01-eth1/49", "x");
        let event = AlarmEvent::parse(&raw).unwrap();
        let (element, descriptor) = event.display_key_parts().expect("missing segments");
        assert_eq!(element, "SW-01");
        assert_eq!(descriptor, "Ethernet1/1/p2p to LEAF-01-eth1/49");
    }

    #[test]
    fn display_key_without_descriptor_is_unroutable() {
        let event = AlarmEvent::parse(&record("SW-01", "x")).unwrap();
        assert!(event.display_key_parts().is_none());
    }

    #[test]
    fn recognizes_severity_phrases_case_insensitively() {
        assert_eq!(
            AlarmAction::from_severity_text("ESCALATED ABOVE 51.0 %"),
            Some(AlarmAction::EscalateCost)
        );
        assert_eq!(
            AlarmAction::from_severity_text("dropped BELOW 50.0 %"),
            Some(AlarmAction::RecoverCost)
        );
        assert_eq!(AlarmAction::from_severity_text("cleared"), None);
    }
}
