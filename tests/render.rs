// End-to-end render path: broadcast frames through the projection onto a
// framebuffer surface.

use flightdeck::domain::{LaunchParams, StepTuning};
use flightdeck::interface_adapters::canvas::{FrameBuffer, Projection, Surface, render_task};
use flightdeck::use_cases::{RunLifecycle, Session, SessionSettings};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::timeout;

/// Shares a framebuffer with the render task so the test can inspect it.
#[derive(Clone)]
struct SharedSurface(Arc<Mutex<FrameBuffer>>);

impl Surface for SharedSurface {
    fn clear(&mut self) -> io::Result<()> {
        self.0.lock().unwrap().clear()
    }

    fn fill_circle(&mut self, x_px: f64, y_px: f64) -> io::Result<()> {
        self.0.lock().unwrap().fill_circle(x_px, y_px)
    }
}

#[tokio::test(start_paused = true)]
async fn landing_frame_is_painted_at_the_bottom_edge() {
    let session = Session::new(SessionSettings {
        frame_channel_capacity: 4096,
        tuning: StepTuning::default(),
    });
    let surface = SharedSurface(Arc::new(Mutex::new(FrameBuffer::new(800, 600))));
    let projection = Projection {
        px_per_meter: 4.0,
        surface_height_px: 600.0,
    };

    let render = tokio::spawn(render_task(
        session.subscribe_frames(),
        surface.clone(),
        projection,
    ));

    let mut rx = session.subscribe_frames();
    let mut lifecycle = session.lifecycle();
    let _ = session
        .start(LaunchParams {
            height_m: 30.0,
            speed_mps: 40.0,
            angle_deg: 60.0,
        })
        .expect("fresh session starts");

    timeout(Duration::from_secs(120), async {
        while *lifecycle.borrow_and_update() != RunLifecycle::Finished {
            lifecycle.changed().await.expect("lifecycle channel open");
        }
    })
    .await
    .expect("flight should land");

    // Closing the frame channel lets the render task drain and exit, which
    // guarantees the landing frame reached the surface.
    drop(session);
    timeout(Duration::from_secs(10), render)
        .await
        .expect("render task should exit")
        .expect("render task should not panic");

    let mut last_state = None;
    while let Ok(frame) = rx.try_recv() {
        last_state = Some(frame.state);
    }
    let state = last_state.expect("frames were broadcast");
    assert_eq!(state.y, 0.0);

    // Ground level projects to the bottom edge; the dot is clipped there but
    // its upper half must be visible.
    let fb = surface.0.lock().unwrap();
    let x_px = (state.x * 4.0).round() as usize;
    assert!(fb.is_set(x_px, 599));
    assert!(fb.is_set(x_px, 595));
}
