//! Pipeline configuration.

use glidepad_core::{ChannelConfig, MotionConfig, ScrollConfig, gesture::GestureConfig};
use glidepad_proto::Framing;

/// Configuration for every stage of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Gesture thresholds, timings and sensitivity
    pub gesture: GestureConfig,
    /// Motion aggregation
    pub motion: MotionConfig,
    /// Scroll debouncing
    pub scroll: ScrollConfig,
    /// Reconnection policy
    pub channel: ChannelConfig,
    /// Wire framing
    pub framing: Framing,
}

impl PipelineConfig {
    /// Profile for a mouse-driven surface.
    #[must_use]
    pub fn desktop() -> Self {
        Self { gesture: GestureConfig::desktop(), ..Self::default() }
    }

    /// Profile for a touchpad surface.
    #[must_use]
    pub fn touch() -> Self {
        Self { gesture: GestureConfig::touch(), ..Self::default() }
    }
}
