// Drawing-surface abstraction and meter-to-pixel projection.

use crate::use_cases::FrameUpdate;
use std::io;
use tokio::sync::broadcast;
use tracing::warn;

/// Radius of the rendered projectile dot, in pixels.
pub const POINT_RADIUS_PX: f64 = 8.0;

/// What the render path needs from a display: wipe to the background and
/// paint a filled circle of fixed radius in pixel space.
pub trait Surface {
    fn clear(&mut self) -> io::Result<()>;
    fn fill_circle(&mut self, x_px: f64, y_px: f64) -> io::Result<()>;
}

/// Fixed-scale projection from simulation meters to surface pixels.
///
/// Simulation y grows upward while surface y grows downward, so the vertical
/// axis is flipped against the surface height.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub px_per_meter: f64,
    pub surface_height_px: f64,
}

impl Projection {
    pub fn x_px(&self, x_m: f64) -> f64 {
        x_m * self.px_per_meter
    }

    pub fn y_px(&self, y_m: f64) -> f64 {
        self.surface_height_px - y_m * self.px_per_meter
    }
}

/// Repaints the surface for every frame the driver broadcasts.
///
/// A lagged receiver skips ahead to the latest frame; only the newest state
/// matters for the picture. The task ends when the frame channel closes.
pub async fn render_task(
    mut frame_rx: broadcast::Receiver<FrameUpdate>,
    mut surface: impl Surface,
    projection: Projection,
) {
    loop {
        match frame_rx.recv().await {
            Ok(frame) => {
                let x = projection.x_px(frame.state.x);
                let y = projection.y_px(frame.state.y);
                if let Err(e) = surface.clear().and_then(|_| surface.fill_circle(x, y)) {
                    warn!(error = %e, "render failed; sink exiting");
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "render lagged; skipping to latest frame");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// In-memory surface used by tests and anything without a real display.
pub struct FrameBuffer {
    width_px: usize,
    height_px: usize,
    cells: Vec<bool>,
}

impl FrameBuffer {
    pub fn new(width_px: usize, height_px: usize) -> Self {
        Self {
            width_px,
            height_px,
            cells: vec![false; width_px * height_px],
        }
    }

    pub fn is_set(&self, x_px: usize, y_px: usize) -> bool {
        self.cells[y_px * self.width_px + x_px]
    }
}

impl Surface for FrameBuffer {
    fn clear(&mut self) -> io::Result<()> {
        self.cells.fill(false);
        Ok(())
    }

    fn fill_circle(&mut self, x_px: f64, y_px: f64) -> io::Result<()> {
        // Rasterize over the bounding box; pixels outside the surface are
        // dropped, matching a canvas clipping the dot at its edges.
        let r = POINT_RADIUS_PX;
        let min_x = (x_px - r).floor() as i64;
        let max_x = (x_px + r).ceil() as i64;
        let min_y = (y_px - r).floor() as i64;
        let max_y = (y_px + r).ceil() as i64;
        for py in min_y..=max_y {
            for px in min_x..=max_x {
                if px < 0 || py < 0 {
                    continue;
                }
                let (px, py) = (px as usize, py as usize);
                if px >= self.width_px || py >= self.height_px {
                    continue;
                }
                let dx = px as f64 - x_px;
                let dy = py as f64 - y_px;
                if dx * dx + dy * dy <= r * r {
                    self.cells[py * self.width_px + px] = true;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> Projection {
        Projection {
            px_per_meter: 4.0,
            surface_height_px: 600.0,
        }
    }

    #[test]
    fn ground_level_maps_to_surface_bottom() {
        assert_eq!(projection().y_px(0.0), 600.0);
    }

    #[test]
    fn top_of_surface_maps_to_zero() {
        // 600 px / 4 px-per-meter puts 150 m at the top edge.
        assert_eq!(projection().y_px(150.0), 0.0);
    }

    #[test]
    fn horizontal_scale_is_linear() {
        assert_eq!(projection().x_px(0.0), 0.0);
        assert_eq!(projection().x_px(10.0), 40.0);
    }

    #[test]
    fn fill_circle_paints_inside_radius_only() {
        let mut fb = FrameBuffer::new(100, 100);
        fb.fill_circle(50.0, 50.0).unwrap();
        assert!(fb.is_set(50, 50));
        assert!(fb.is_set(50 + POINT_RADIUS_PX as usize, 50));
        // Corner of the bounding box lies outside the circle.
        assert!(!fb.is_set(58, 58));
        assert!(!fb.is_set(0, 0));
    }

    #[test]
    fn fill_circle_clips_at_surface_edges() {
        let mut fb = FrameBuffer::new(100, 100);
        fb.fill_circle(0.0, 99.0).unwrap();
        assert!(fb.is_set(0, 99));
    }

    #[test]
    fn clear_resets_every_pixel() {
        let mut fb = FrameBuffer::new(20, 20);
        fb.fill_circle(10.0, 10.0).unwrap();
        fb.clear().unwrap();
        assert!(!fb.is_set(10, 10));
    }
}
