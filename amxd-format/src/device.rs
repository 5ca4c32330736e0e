//! Device descriptors stored in the `ampf` chunk

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::constants::{DEVICE_AUDIO_EFFECT, DEVICE_INSTRUMENT, DEVICE_MIDI_EFFECT};
use crate::error::AmxdError;

/// Functional category of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    /// `aaaa`
    AudioEffect,
    /// `mmmm`
    MidiEffect,
    /// `iiii`
    Instrument,
    /// Any other payload
    Unknown,
}

impl DeviceType {
    /// Map an `ampf` payload to a device type; unrecognized payloads are `Unknown`
    pub fn from_code(code: &[u8]) -> Self {
        match code {
            c if c == DEVICE_AUDIO_EFFECT => DeviceType::AudioEffect,
            c if c == DEVICE_MIDI_EFFECT => DeviceType::MidiEffect,
            c if c == DEVICE_INSTRUMENT => DeviceType::Instrument,
            _ => DeviceType::Unknown,
        }
    }

    /// Four-byte code for this type, `None` for `Unknown`
    pub fn code(&self) -> Option<DeviceCode> {
        match self {
            DeviceType::AudioEffect => Some(DeviceCode(DEVICE_AUDIO_EFFECT)),
            DeviceType::MidiEffect => Some(DeviceCode(DEVICE_MIDI_EFFECT)),
            DeviceType::Instrument => Some(DeviceCode(DEVICE_INSTRUMENT)),
            DeviceType::Unknown => None,
        }
    }

    /// Label used in diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            DeviceType::AudioEffect => "audio_effect",
            DeviceType::MidiEffect => "midi_effect",
            DeviceType::Instrument => "instrument",
            DeviceType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Four ASCII bytes written into the `ampf` chunk.
///
/// Any ASCII code is accepted; only the reading side decides whether it is
/// recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceCode(pub [u8; 4]);

impl DeviceCode {
    /// Raw code bytes
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Device type this code maps to
    pub fn device_type(&self) -> DeviceType {
        DeviceType::from_code(&self.0)
    }
}

impl Default for DeviceCode {
    fn default() -> Self {
        DeviceCode(DEVICE_AUDIO_EFFECT)
    }
}

impl FromStr for DeviceCode {
    type Err = AmxdError;

    /// Accepts a raw four-character code or one of the device type labels
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio_effect" => return Ok(DeviceCode(DEVICE_AUDIO_EFFECT)),
            "midi_effect" => return Ok(DeviceCode(DEVICE_MIDI_EFFECT)),
            "instrument" => return Ok(DeviceCode(DEVICE_INSTRUMENT)),
            _ => {}
        }

        let code: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| AmxdError::InvalidDeviceCode(s.to_string()))?;
        if !code.is_ascii() {
            return Err(AmxdError::InvalidDeviceCode(s.to_string()));
        }
        Ok(DeviceCode(code))
    }
}

impl fmt::Display for DeviceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{}", std::ascii::escape_default(byte))?;
        }
        Ok(())
    }
}

impl Serialize for DeviceCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
