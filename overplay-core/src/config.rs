//! Centralized configuration for Overplay.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

/// Central configuration for all Overplay components.
///
/// Groups related configuration settings into logical sections.
#[derive(Debug, Clone, Default)]
pub struct OverplayConfig {
    pub api: ApiConfig,
    pub player: PlayerConfig,
    pub polling: PollingConfig,
}

/// Remote API configuration.
///
/// A single base URL selects the remote host; both the overlay store and
/// the stream lifecycle endpoints live under it.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the remote overlay/stream API
    pub base_url: String,
    /// HTTP request timeout for API calls
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Playback engine and media sink configuration.
///
/// Controls live-stream buffering behavior and the default audible volume
/// restored after autoplay negotiation.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Manifest path relative to the API base URL
    pub manifest_path: &'static str,
    /// Default volume restored when unmuting (0.0 to 1.0)
    pub default_volume: f32,
    /// Engine tuning passed to each new attachment
    pub tuning: EngineTuning,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            manifest_path: "/stream/out.m3u8",
            default_volume: 0.5,
            tuning: EngineTuning::default(),
        }
    }
}

/// Buffering parameters for the segmented-stream playback engine.
///
/// Tuned for low-latency live playback: small buffers, no back buffer,
/// the engine's own retry handling left enabled for fragment loads.
#[derive(Debug, Clone)]
pub struct EngineTuning {
    /// Prefer low-latency live sync behavior
    pub low_latency: bool,
    /// Maximum forward buffer in seconds
    pub max_buffer_secs: u32,
    /// Segments kept behind the live edge (0 = drop old segments)
    pub back_buffer_secs: u32,
    /// Live-edge sync distance in segment counts
    pub live_sync_count: u32,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            low_latency: true,
            max_buffer_secs: 20,
            back_buffer_secs: 0,
            live_sync_count: 3,
        }
    }
}

/// Background polling configuration.
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// Interval between stream status reconciliation polls
    pub status_interval: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            status_interval: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_live_profile() {
        let config = OverplayConfig::default();
        assert_eq!(config.player.manifest_path, "/stream/out.m3u8");
        assert_eq!(config.player.default_volume, 0.5);
        assert_eq!(config.polling.status_interval, Duration::from_secs(5));
        assert!(config.player.tuning.low_latency);
        assert_eq!(config.player.tuning.back_buffer_secs, 0);
    }
}
