// src/engine/firewall.rs
//
// Image Firewall configuration and enforcement helpers.
// Limits are checked against the header before any pixel allocation.

use crate::error::ImgFlipError;
use std::str::FromStr;

const STRICT_MAX_PIXELS: u64 = 16_777_216; // 4096 x 4096
const LENIENT_MAX_PIXELS: u64 = 268_435_456; // 16384 x 16384
const STRICT_MAX_BYTES: u64 = 128 * 1024 * 1024; // 128MB input cap
const LENIENT_MAX_BYTES: u64 = 2 * 1024 * 1024 * 1024; // 2GB input cap

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FirewallPolicy {
    Disabled,
    Strict,
    Lenient,
    Custom,
}

impl FromStr for FirewallPolicy {
    type Err = ImgFlipError;

    fn from_str(policy: &str) -> Result<Self, Self::Err> {
        match policy.to_ascii_lowercase().as_str() {
            "disabled" | "off" => Ok(Self::Disabled),
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            "custom" => Ok(Self::Custom),
            _ => Err(ImgFlipError::invalid_firewall_policy(policy.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirewallConfig {
    pub enabled: bool,
    pub policy: FirewallPolicy,
    pub max_pixels: Option<u64>,
    pub max_bytes: Option<u64>,
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            policy: FirewallPolicy::Disabled,
            max_pixels: None,
            max_bytes: None,
        }
    }
}

impl FirewallConfig {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            enabled: true,
            policy: FirewallPolicy::Strict,
            max_pixels: Some(STRICT_MAX_PIXELS),
            max_bytes: Some(STRICT_MAX_BYTES),
        }
    }

    pub fn lenient() -> Self {
        Self {
            enabled: true,
            policy: FirewallPolicy::Lenient,
            max_pixels: Some(LENIENT_MAX_PIXELS),
            max_bytes: Some(LENIENT_MAX_BYTES),
        }
    }

    pub fn custom(max_bytes: Option<u64>, max_pixels: Option<u64>) -> Self {
        Self {
            enabled: true,
            policy: FirewallPolicy::Custom,
            max_pixels,
            max_bytes,
        }
    }

    pub fn apply_policy(policy: FirewallPolicy) -> Self {
        match policy {
            FirewallPolicy::Disabled => Self::disabled(),
            FirewallPolicy::Strict => Self::strict(),
            FirewallPolicy::Lenient => Self::lenient(),
            FirewallPolicy::Custom => Self::custom(None, None),
        }
    }

    pub fn enforce_source_len(&self, len: u64) -> Result<(), ImgFlipError> {
        if !self.enabled {
            return Ok(());
        }
        if let Some(limit) = self.max_bytes {
            if len > limit {
                return Err(ImgFlipError::firewall_violation(format!(
                    "input size {} bytes exceeds limit of {} bytes",
                    len, limit
                )));
            }
        }
        Ok(())
    }

    pub fn enforce_pixels(&self, width: u32, height: u32) -> Result<(), ImgFlipError> {
        if !self.enabled {
            return Ok(());
        }
        if let Some(limit) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > limit {
                return Err(ImgFlipError::firewall_violation(format!(
                    "{}x{} ({} pixels) exceeds limit of {} pixels",
                    width, height, pixels, limit
                )));
            }
        }
        Ok(())
    }
}
