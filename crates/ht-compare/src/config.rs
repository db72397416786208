use std::time::Duration;

use ht_match::{DEFAULT_MATCH_THRESHOLD, MatchConfig};
use ht_morph::{InkThreshold, ThinConfig};
use ht_skeleton::SkeletonConfig;
use serde::{Deserialize, Serialize};

/// Comparison settings. Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Side of the square canvas both inputs are rendered onto.
    pub canvas_size: usize,
    /// Nearest-neighbor distance at which a point becomes unmatched.
    pub threshold: f32,
    /// Brightest channel value still counted as ink.
    pub ink_max_channel: u8,
    pub min_component_size: usize,
    pub mismatch_marker_ms: u64,
    pub success_marker_ms: u64,
    pub verdict_delay_ms: u64,
    /// Remove markers left over from the previous comparison before starting.
    pub clear_previous: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            canvas_size: 256,
            threshold: DEFAULT_MATCH_THRESHOLD,
            ink_max_channel: InkThreshold::default().max_channel,
            min_component_size: 1,
            mismatch_marker_ms: 2000,
            success_marker_ms: 1000,
            verdict_delay_ms: 2000,
            clear_previous: true,
        }
    }
}

impl CompareConfig {
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            threshold: self.threshold,
        }
    }

    pub fn ink_threshold(&self) -> InkThreshold {
        InkThreshold {
            max_channel: self.ink_max_channel,
        }
    }

    pub fn skeleton_config(&self) -> SkeletonConfig {
        SkeletonConfig {
            min_component_size: self.min_component_size,
            thin: ThinConfig::default(),
        }
    }

    pub fn mismatch_marker_lifetime(&self) -> Duration {
        Duration::from_millis(self.mismatch_marker_ms)
    }

    pub fn success_marker_lifetime(&self) -> Duration {
        Duration::from_millis(self.success_marker_ms)
    }

    pub fn verdict_delay(&self) -> Duration {
        Duration::from_millis(self.verdict_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::CompareConfig;

    #[test]
    fn defaults_match_practice_screen_timings() {
        let cfg = CompareConfig::default();
        assert_eq!(cfg.threshold, 20.0);
        assert_eq!(cfg.ink_max_channel, 10);
        assert_eq!(cfg.mismatch_marker_lifetime(), Duration::from_millis(2000));
        assert_eq!(cfg.success_marker_lifetime(), Duration::from_millis(1000));
        assert_eq!(cfg.verdict_delay(), Duration::from_millis(2000));
        assert_eq!(cfg.match_config().threshold, 20.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: CompareConfig =
            serde_json::from_str(r#"{ "canvas_size": 300, "threshold": 12.5 }"#)
                .expect("valid config json");

        assert_eq!(cfg.canvas_size, 300);
        assert_eq!(cfg.threshold, 12.5);
        assert_eq!(cfg.verdict_delay_ms, 2000);
        assert!(cfg.clear_previous);
    }
}
