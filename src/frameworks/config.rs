use std::env;

// Runtime constants and env-derived launch configuration.

pub fn launch_height_m() -> f64 {
    env::var("LAUNCH_HEIGHT_M")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30.0)
}

pub fn launch_speed_mps() -> f64 {
    env::var("LAUNCH_SPEED_MPS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(40.0)
}

pub fn launch_angle_deg() -> f64 {
    env::var("LAUNCH_ANGLE_DEG")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(60.0)
}

/// Headless runs skip the terminal UI, start immediately, and emit
/// JSON-lines readouts on stdout.
pub fn headless() -> bool {
    matches!(
        env::var("FLIGHTDECK_HEADLESS").as_deref(),
        Ok("1") | Ok("true")
    )
}

pub const FRAME_CHANNEL_CAPACITY: usize = 128;

// Drawing surface geometry, in pixel space.
pub const SURFACE_WIDTH_PX: f64 = 800.0;
pub const SURFACE_HEIGHT_PX: f64 = 600.0;
pub const PX_PER_METER: f64 = 4.0;
