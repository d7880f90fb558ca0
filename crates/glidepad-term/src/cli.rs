//! Command-line arguments.

use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};
use glidepad_app::PipelineConfig;
use glidepad_core::{ChannelConfig, ReconnectPolicy, gesture::Surface};
use glidepad_proto::Framing;

/// Default port of the remote host.
pub const DEFAULT_PORT: u16 = 9001;

/// Wire framing choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FramingArg {
    /// Fixed-size binary frames
    Binary,
    /// JSON records
    Text,
}

/// Gesture surface profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SurfaceArg {
    /// Drag to move, click on release
    Desktop,
    /// Left button emulates one finger: tap, double tap, long press
    Touch,
}

/// Behaviour when the connection closes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Reconnect and keep all gesture state
    Reconnect,
    /// Discard all state and start over
    Reload,
}

/// Remote pointer and touchpad client
#[derive(Parser, Debug)]
#[command(name = "glidepad")]
#[command(about = "Drive a remote pointer from the terminal over a WebSocket")]
#[command(version)]
pub struct Args {
    /// Remote host name or IP address
    #[arg(long)]
    pub host: String,

    /// Remote port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Wire framing expected by the remote host
    #[arg(long, value_enum, default_value = "binary")]
    pub framing: FramingArg,

    /// Gesture profile
    #[arg(long, value_enum, default_value = "desktop")]
    pub surface: SurfaceArg,

    /// Reconnection policy
    #[arg(long, value_enum, default_value = "reconnect")]
    pub policy: PolicyArg,

    /// Delay before reconnecting or restarting (ms)
    #[arg(long, default_value_t = 1000)]
    pub reconnect_delay_ms: u64,

    /// Motion flush interval (ms)
    #[arg(long, default_value_t = 16)]
    pub frame_interval_ms: u64,

    /// Scroll quiescence window (ms)
    #[arg(long, default_value_t = 50)]
    pub scroll_debounce_ms: u64,

    /// Delta multiplier; defaults to the surface profile's
    #[arg(long)]
    pub sensitivity: Option<f64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Gesture surface selected on the command line.
    #[must_use]
    pub fn surface(&self) -> Surface {
        match self.surface {
            SurfaceArg::Desktop => Surface::Desktop,
            SurfaceArg::Touch => Surface::Touch,
        }
    }

    /// Pipeline configuration for these arguments.
    #[must_use]
    pub fn pipeline_config(&self) -> PipelineConfig {
        let mut config = match self.surface() {
            Surface::Desktop => PipelineConfig::desktop(),
            Surface::Touch => PipelineConfig::touch(),
        };

        if let Some(sensitivity) = self.sensitivity {
            config.gesture.sensitivity = sensitivity;
        }
        config.motion.frame_interval = Duration::from_millis(self.frame_interval_ms);
        config.scroll.debounce_window = Duration::from_millis(self.scroll_debounce_ms);
        config.channel = ChannelConfig {
            policy: match self.policy {
                PolicyArg::Reconnect => ReconnectPolicy::ReconnectInPlace,
                PolicyArg::Reload => ReconnectPolicy::ReloadOnClose,
            },
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
        };
        config.framing = match self.framing {
            FramingArg::Binary => Framing::Binary,
            FramingArg::Text => Framing::Text,
        };

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["glidepad", "--host", "10.0.0.2"]);
        let config = args.pipeline_config();

        assert_eq!(args.port, 9001);
        assert_eq!(config.gesture.surface, Surface::Desktop);
        assert_eq!(config.gesture.sensitivity, 1.0);
        assert_eq!(config.motion.frame_interval, Duration::from_millis(16));
        assert!(!config.motion.carry_remainder);
        assert_eq!(config.scroll.debounce_window, Duration::from_millis(50));
        assert_eq!(config.channel.policy, ReconnectPolicy::ReconnectInPlace);
        assert_eq!(config.channel.reconnect_delay, Duration::from_secs(1));
        assert_eq!(config.framing, Framing::Binary);
        assert!(args.log_file.is_none());
    }

    #[test]
    fn overrides() {
        let args = Args::parse_from([
            "glidepad",
            "--host",
            "desk.local",
            "--port",
            "8080",
            "--framing",
            "text",
            "--surface",
            "touch",
            "--policy",
            "reload",
            "--reconnect-delay-ms",
            "250",
            "--sensitivity",
            "2.5",
        ]);
        let config = args.pipeline_config();

        assert_eq!(args.port, 8080);
        assert_eq!(config.gesture.surface, Surface::Touch);
        assert_eq!(config.gesture.sensitivity, 2.5);
        assert_eq!(config.channel.policy, ReconnectPolicy::ReloadOnClose);
        assert_eq!(config.channel.reconnect_delay, Duration::from_millis(250));
        assert_eq!(config.framing, Framing::Text);
    }

    #[test]
    fn touch_profile_sensitivity() {
        let args = Args::parse_from(["glidepad", "--host", "h", "--surface", "touch"]);
        assert_eq!(args.pipeline_config().gesture.sensitivity, 1.2);
    }

    #[test]
    fn host_is_required() {
        assert!(Args::try_parse_from(["glidepad"]).is_err());
    }
}
