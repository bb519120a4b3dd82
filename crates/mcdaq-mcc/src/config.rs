//! Device configuration and the validated scan plan derived from it.
//!
//! Configuration is deserialized from TOML and then validated into a
//! [`ScanPlan`]; construction fails fast on unsupported models, bad
//! channel names or an empty analog set, while everything past
//! validation can assume a consistent plan.

use crate::error::{McError, Result};
use mcdaq_core::{AnalogRange, Channel, Gain, ScanRequest, READ_CHANNELS_PER_GROUP};
use serde::{Deserialize, Serialize};

/// Default per-channel scan rate in Hz.
pub const DEFAULT_SCAN_FREQUENCY_HZ: u32 = 1000;

/// Supported Measurement Computing device models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DaqModel {
    #[serde(rename = "MC-USB-1208FS")]
    Usb1208Fs,
    #[serde(rename = "MC-USB-1616FS")]
    Usb1616Fs,
}

impl DaqModel {
    /// Vendor block-transfer size for this model, in sample groups.
    pub fn block_transfer_size(self) -> usize {
        match self {
            DaqModel::Usb1208Fs => 31,
            DaqModel::Usb1616Fs => 62,
        }
    }

    /// Circular scan-buffer capacity in samples
    /// (block transfer size x channels per group).
    pub fn sample_count(self) -> usize {
        self.block_transfer_size() * READ_CHANNELS_PER_GROUP
    }

    pub fn label(self) -> &'static str {
        match self {
            DaqModel::Usb1208Fs => "MC-USB-1208FS",
            DaqModel::Usb1616Fs => "MC-USB-1616FS",
        }
    }
}

/// How the device is sampled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadMethod {
    /// Continuous hardware background scan into the circular buffer.
    #[default]
    #[serde(rename = "SCAN")]
    Scan,
    /// One blocking read per channel per poll, with change detection.
    /// Roughly one time-unit per channel, a documented latency
    /// trade-off of this mode.
    #[serde(rename = "POLL")]
    Poll,
}

fn default_scan_frequency() -> u32 {
    DEFAULT_SCAN_FREQUENCY_HZ
}

/// Raw device configuration as it appears in TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McDaqConfig {
    /// Board number as enumerated by the vendor tooling.
    #[serde(default)]
    pub board_id: u32,
    pub daq_model: DaqModel,
    /// Channel names to monitor (`AI_0`..`AI_15`, `DI_0`..`DI_15`).
    pub input_channels: Vec<String>,
    #[serde(default)]
    pub gain: Gain,
    /// Requested scan rate in Hz; hardware may adjust it at start.
    #[serde(default = "default_scan_frequency")]
    pub input_scan_frequency: u32,
    #[serde(default)]
    pub input_read_method: ReadMethod,
}

impl McDaqConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| McError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Validate into a [`ScanPlan`].
    pub fn validate(&self) -> Result<ScanPlan> {
        if self.input_channels.is_empty() {
            return Err(McError::InvalidConfig {
                message: "At least one input channel is required".to_string(),
            });
        }
        if self.input_scan_frequency == 0 {
            return Err(McError::InvalidConfig {
                message: "Scan frequency must be greater than 0".to_string(),
            });
        }

        let mut channels = Vec::with_capacity(self.input_channels.len());
        for name in &self.input_channels {
            let channel = Channel::parse(name).map_err(|e| McError::InvalidConfig {
                message: e.to_string(),
            })?;
            channels.push(channel);
        }

        let save_channels: Vec<u16> = channels
            .iter()
            .filter(|c| c.is_analog())
            .map(|c| c.index())
            .collect();
        if save_channels.is_empty() {
            return Err(McError::NoAnalogChannels);
        }
        // Cannot fail past the emptiness check above.
        let analog_range =
            AnalogRange::from_channels(&channels).map_err(|e| McError::InvalidConfig {
                message: e.to_string(),
            })?;

        Ok(ScanPlan {
            board_id: self.board_id,
            model: self.daq_model,
            channels,
            save_channels,
            analog_range,
            gain: self.gain,
            scan_frequency_hz: self.input_scan_frequency,
            sample_count: self.daq_model.sample_count(),
            read_method: self.input_read_method,
        })
    }
}

/// Validated acquisition parameters.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    pub board_id: u32,
    pub model: DaqModel,
    /// Monitored channels, in configured order.
    pub channels: Vec<Channel>,
    /// Analog channel indices actually retained downstream, in
    /// configured order. The slot walk stores all channels of a group
    /// regardless; suppression by this subset is a downstream concern.
    pub save_channels: Vec<u16>,
    pub analog_range: AnalogRange,
    pub gain: Gain,
    pub scan_frequency_hz: u32,
    /// Circular buffer capacity in samples.
    pub sample_count: usize,
    pub read_method: ReadMethod,
}

impl ScanPlan {
    /// Background-scan start parameters.
    ///
    /// The scan always covers the full channel group 0..=7; the
    /// configured analog range is validated but does not narrow the
    /// scanned block.
    pub fn scan_request(&self) -> ScanRequest {
        ScanRequest {
            low_channel: 0,
            high_channel: (READ_CHANNELS_PER_GROUP - 1) as u16,
            sample_count: self.sample_count as u32,
            scan_frequency_hz: self.scan_frequency_hz,
            gain: self.gain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(model: DaqModel, channels: &[&str]) -> McDaqConfig {
        McDaqConfig {
            board_id: 0,
            daq_model: model,
            input_channels: channels.iter().map(|s| s.to_string()).collect(),
            gain: Gain::Bip10Volts,
            input_scan_frequency: 1000,
            input_read_method: ReadMethod::Scan,
        }
    }

    #[test]
    fn sample_count_follows_block_transfer_size() {
        assert_eq!(DaqModel::Usb1208Fs.sample_count(), 31 * 8);
        assert_eq!(DaqModel::Usb1616Fs.sample_count(), 62 * 8);
    }

    #[test]
    fn validate_builds_plan() {
        let plan = config(DaqModel::Usb1616Fs, &["AI_1", "AI_4", "DI_0"])
            .validate()
            .unwrap();
        assert_eq!(plan.save_channels, vec![1, 4]);
        assert_eq!(plan.analog_range.low, 1);
        assert_eq!(plan.analog_range.high, 4);
        assert_eq!(plan.sample_count, 496);
        let request = plan.scan_request();
        assert_eq!(request.low_channel, 0);
        assert_eq!(request.high_channel, 7);
        assert_eq!(request.sample_count, 496);
    }

    #[test]
    fn validate_rejects_empty_and_non_analog_sets() {
        assert!(matches!(
            config(DaqModel::Usb1208Fs, &[]).validate(),
            Err(McError::InvalidConfig { .. })
        ));
        assert!(matches!(
            config(DaqModel::Usb1208Fs, &["DI_0", "DI_1"]).validate(),
            Err(McError::NoAnalogChannels)
        ));
    }

    #[test]
    fn validate_rejects_bad_channel_name() {
        let result = config(DaqModel::Usb1208Fs, &["AI_0", "AX_2"]).validate();
        assert!(matches!(result, Err(McError::InvalidConfig { .. })));
    }

    #[test]
    fn from_toml_parses_model_and_defaults() {
        let cfg = McDaqConfig::from_toml(
            r#"
            daq_model = "MC-USB-1616FS"
            input_channels = ["AI_0", "AI_1"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.daq_model, DaqModel::Usb1616Fs);
        assert_eq!(cfg.board_id, 0);
        assert_eq!(cfg.input_scan_frequency, DEFAULT_SCAN_FREQUENCY_HZ);
        assert_eq!(cfg.input_read_method, ReadMethod::Scan);
    }

    #[test]
    fn from_toml_rejects_unknown_model() {
        let result = McDaqConfig::from_toml(
            r#"
            daq_model = "MC-USB-9999"
            input_channels = ["AI_0"]
            "#,
        );
        assert!(matches!(result, Err(McError::InvalidConfig { .. })));
    }
}
