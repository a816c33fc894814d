//! System status tracking
//!
//! Turns a stream of raw system events into icon requests. Only changes
//! are reported: a second "connected" while already connected shows
//! nothing new, and low battery is reported once per discharge.

use crate::config::StatusConfig;
use crate::icon::Icon;

/// Raw events from the rest of the system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemEvent {
    NetworkConnected,
    NetworkDisconnected,
    MicrophoneMuted,
    MicrophoneUnmuted,
    /// Battery level sample (%)
    Battery { percent: u8 },
}

/// Edge detector for system status
#[derive(Debug, Clone)]
pub struct StatusTracker {
    config: StatusConfig,
    /// Last reported connectivity, None until the first event
    network: Option<bool>,
    /// Last reported mute state, None until the first event
    muted: Option<bool>,
    /// Low battery already reported for this discharge
    battery_low: bool,
    /// Last battery sample (%)
    battery_percent: Option<u8>,
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new(StatusConfig::default())
    }
}

impl StatusTracker {
    pub fn new(config: StatusConfig) -> Self {
        Self {
            config,
            network: None,
            muted: None,
            battery_low: false,
            battery_percent: None,
        }
    }

    /// Process an event
    ///
    /// Returns the icon to show, or `None` if nothing changed.
    pub fn update(&mut self, event: SystemEvent) -> Option<Icon> {
        match event {
            SystemEvent::NetworkConnected => {
                Self::edge(&mut self.network, true).then_some(Icon::WifiConnected)
            }
            SystemEvent::NetworkDisconnected => {
                Self::edge(&mut self.network, false).then_some(Icon::WifiDisconnected)
            }
            SystemEvent::MicrophoneMuted => {
                Self::edge(&mut self.muted, true).then_some(Icon::MicrophoneMuted)
            }
            SystemEvent::MicrophoneUnmuted => {
                Self::edge(&mut self.muted, false).then_some(Icon::MicrophoneUnmuted)
            }
            SystemEvent::Battery { percent } => self.update_battery(percent),
        }
    }

    fn update_battery(&mut self, percent: u8) -> Option<Icon> {
        self.battery_percent = Some(percent);

        if self.battery_low {
            if percent >= self.config.battery_clear_percent {
                self.battery_low = false;
            }
            None
        } else if percent <= self.config.battery_low_percent {
            self.battery_low = true;
            Some(Icon::BatteryLow)
        } else {
            None
        }
    }

    /// Store `value`, returning true if it differs from the previous value
    fn edge(slot: &mut Option<bool>, value: bool) -> bool {
        let changed = *slot != Some(value);
        *slot = Some(value);
        changed
    }

    pub fn is_connected(&self) -> Option<bool> {
        self.network
    }

    pub fn is_muted(&self) -> Option<bool> {
        self.muted
    }

    /// Check if low battery has been reported and not yet cleared
    pub fn is_battery_low(&self) -> bool {
        self.battery_low
    }

    pub fn battery_percent(&self) -> Option<u8> {
        self.battery_percent
    }
}
