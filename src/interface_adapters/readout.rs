// Live kinematic readouts: display formatting and sink plumbing.

use crate::use_cases::FrameUpdate;
use serde::Serialize;
use std::io::{self, Write};
use tokio::sync::broadcast;
use tracing::warn;

/// Significant digits shown for every readout value.
pub const READOUT_SIG_DIGITS: i32 = 3;

/// Receives one readout per computed step.
pub trait ReadoutSink {
    fn publish(&mut self, frame: &FrameUpdate) -> io::Result<()>;
}

/// Rounds a value to `READOUT_SIG_DIGITS` significant digits for display.
pub fn format_sig(value: f64) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    if value == 0.0 {
        return "0.00".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (READOUT_SIG_DIGITS - 1 - magnitude).max(0) as usize;
    let scale = 10f64.powi(magnitude - (READOUT_SIG_DIGITS - 1));
    let rounded = (value / scale).round() * scale;
    format!("{rounded:.decimals$}")
}

/// Flattened frame record for JSON-lines output.
#[derive(Debug, Clone, Serialize)]
pub struct ReadoutRecord {
    pub step: u64,
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub speed: f64,
}

impl From<&FrameUpdate> for ReadoutRecord {
    fn from(frame: &FrameUpdate) -> Self {
        let s = frame.state;
        Self {
            step: frame.step,
            t: s.t,
            x: s.x,
            y: s.y,
            vx: s.vx,
            vy: s.vy,
            speed: s.net_speed(),
        }
    }
}

/// Writes one JSON object per frame; the readout surface for headless runs.
pub struct JsonLines<W: Write> {
    out: W,
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ReadoutSink for JsonLines<W> {
    fn publish(&mut self, frame: &FrameUpdate) -> io::Result<()> {
        let record = ReadoutRecord::from(frame);
        let line = serde_json::to_string(&record).map_err(io::Error::other)?;
        writeln!(self.out, "{line}")
    }
}

/// Forwards every broadcast frame to the readout sink.
///
/// Same discipline as the render side: lagged receivers skip ahead, a closed
/// channel ends the task.
pub async fn readout_task(
    mut frame_rx: broadcast::Receiver<FrameUpdate>,
    mut sink: impl ReadoutSink,
) {
    loop {
        match frame_rx.recv().await {
            Ok(frame) => {
                if let Err(e) = sink.publish(&frame) {
                    warn!(error = %e, "readout failed; sink exiting");
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "readout lagged; skipping to latest frame");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
