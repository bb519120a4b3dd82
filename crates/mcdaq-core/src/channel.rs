//! Channel identifiers and name parsing.
//!
//! Channels are addressed by the logical names the configuration uses
//! (`AI_0`..`AI_15` for analog inputs, `DI_0`..`DI_15` for digital
//! inputs). The continuous scan demux covers analog inputs only;
//! sequential polling reads every configured channel, digital
//! included.

use crate::error::DaqError;
use serde::{Deserialize, Serialize};

/// Highest valid channel index for either kind.
pub const MAX_CHANNEL_INDEX: u16 = 15;

/// Kind of input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    AnalogInput,
    DigitalInput,
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelKind::AnalogInput => write!(f, "AI"),
            ChannelKind::DigitalInput => write!(f, "DI"),
        }
    }
}

/// Immutable identifier for one input channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Channel {
    name: String,
    kind: ChannelKind,
    index: u16,
}

impl Channel {
    /// Parse a channel from its configuration name (`AI_7`, `DI_3`).
    pub fn parse(name: &str) -> Result<Self, DaqError> {
        let (kind, rest) = if let Some(rest) = name.strip_prefix("AI_") {
            (ChannelKind::AnalogInput, rest)
        } else if let Some(rest) = name.strip_prefix("DI_") {
            (ChannelKind::DigitalInput, rest)
        } else {
            return Err(DaqError::Configuration(format!(
                "Unrecognized channel name '{}' (expected AI_n or DI_n)",
                name
            )));
        };

        let index: u16 = rest.parse().map_err(|_| {
            DaqError::Configuration(format!("Invalid channel index in '{}'", name))
        })?;
        if index > MAX_CHANNEL_INDEX {
            return Err(DaqError::Configuration(format!(
                "Channel index {} out of range (max {})",
                index, MAX_CHANNEL_INDEX
            )));
        }

        Ok(Self {
            name: name.to_string(),
            kind,
            index,
        })
    }

    /// Logical configuration name (`AI_0`, ...).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// Hardware channel index within its kind.
    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn is_analog(&self) -> bool {
        self.kind == ChannelKind::AnalogInput
    }
}

/// Contiguous low/high analog index range covered by a channel set.
///
/// Used to validate a monitored-channel configuration: the set must
/// contain at least one analog channel and satisfy `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalogRange {
    pub low: u16,
    pub high: u16,
}

impl AnalogRange {
    /// Compute the analog range from a channel set.
    ///
    /// Returns a configuration error when the set holds no analog
    /// channels at all.
    pub fn from_channels(channels: &[Channel]) -> Result<Self, DaqError> {
        let mut range: Option<AnalogRange> = None;
        for ch in channels.iter().filter(|c| c.is_analog()) {
            range = Some(match range {
                None => AnalogRange {
                    low: ch.index(),
                    high: ch.index(),
                },
                Some(r) => AnalogRange {
                    low: r.low.min(ch.index()),
                    high: r.high.max(ch.index()),
                },
            });
        }
        range.ok_or_else(|| {
            DaqError::Configuration("No analog channels specified to monitor".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_analog_and_digital() {
        let ai = Channel::parse("AI_7").unwrap();
        assert_eq!(ai.kind(), ChannelKind::AnalogInput);
        assert_eq!(ai.index(), 7);
        assert!(ai.is_analog());

        let di = Channel::parse("DI_15").unwrap();
        assert_eq!(di.kind(), ChannelKind::DigitalInput);
        assert_eq!(di.index(), 15);
        assert!(!di.is_analog());
    }

    #[test]
    fn parse_rejects_bad_names() {
        assert!(Channel::parse("AO_0").is_err());
        assert!(Channel::parse("AI_16").is_err());
        assert!(Channel::parse("AI_x").is_err());
        assert!(Channel::parse("").is_err());
    }

    #[test]
    fn analog_range_spans_set() {
        let channels = vec![
            Channel::parse("AI_3").unwrap(),
            Channel::parse("DI_0").unwrap(),
            Channel::parse("AI_1").unwrap(),
            Channel::parse("AI_6").unwrap(),
        ];
        let range = AnalogRange::from_channels(&channels).unwrap();
        assert_eq!(range, AnalogRange { low: 1, high: 6 });
    }

    #[test]
    fn analog_range_requires_analog_channel() {
        let channels = vec![Channel::parse("DI_2").unwrap()];
        assert!(AnalogRange::from_channels(&channels).is_err());
    }
}
