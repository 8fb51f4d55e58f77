//! Console configuration parameters.
//!
//! All tunable thresholds for the console HAT.  The owning host plugin
//! persists these; the core reads them at decision time and never writes
//! them back.

use serde::{Deserialize, Serialize};

/// Core console configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    // --- Dryer hysteresis ---
    /// Humidity (%) above which the dryer switches on.
    pub hum_high: f32,
    /// Humidity (%) below which the dryer switches off.
    pub hum_low: f32,

    // --- Filament change ---
    /// Length (mm) loaded after a swap (M603 L parameter).
    pub filament_load_length: u16,
    /// Length (mm) unloaded before a swap (M603 U parameter).
    pub filament_unload_length: u16,
    /// Nozzle temperature (°C) below which the hotend must be heated
    /// before an idle-state filament change.
    pub min_extrude_temp_c: f32,
    /// Temperature (°C) to heat to when the saved target is too cold.
    pub swap_heat_temp_c: f32,

    // --- Timing ---
    /// Button hold threshold (ms) before a press counts as held.
    pub hold_time_ms: u32,
    /// Environment sensor poll interval (seconds).
    pub env_poll_interval_secs: u32,
    /// Settle delay (ms) on each edge of a printer power-cycle.
    pub power_cycle_delay_ms: u32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            // Dryer
            hum_high: 40.0,
            hum_low: 30.0,

            // Filament
            filament_load_length: 120,
            filament_unload_length: 100,
            min_extrude_temp_c: 200.0,
            swap_heat_temp_c: 220.0,

            // Timing
            hold_time_ms: 3000,
            env_poll_interval_secs: 10,
            power_cycle_delay_ms: 3000,
        }
    }
}
