// Framework bootstrap for the visualizer runtime.

use crate::domain::{LaunchParams, StepTuning};
use crate::frameworks::config;
use crate::interface_adapters::canvas::Projection;
use crate::interface_adapters::readout::{JsonLines, readout_task};
use crate::interface_adapters::terminal::{self, TerminalView};
use crate::use_cases::{RunLifecycle, Session, SessionSettings};

use std::io::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Logs go to stderr so they never tear the terminal canvas or mix into
    // the headless JSON readout stream on stdout.
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let params = LaunchParams {
        height_m: config::launch_height_m(),
        speed_mps: config::launch_speed_mps(),
        angle_deg: config::launch_angle_deg(),
    };
    let session = Arc::new(Session::new(SessionSettings {
        frame_channel_capacity: config::FRAME_CHANNEL_CAPACITY,
        tuning: StepTuning::default(),
    }));

    if config::headless() {
        run_headless(session, params).await
    } else {
        terminal::setup()?;
        let result = run_terminal(Arc::clone(&session), params).await;
        let restored = terminal::teardown();
        result.and(restored)
    }
}

/// One unattended flight: start immediately, stream readouts, exit on
/// touchdown.
async fn run_headless(session: Arc<Session>, params: LaunchParams) -> Result<()> {
    let sink = tokio::spawn(readout_task(
        session.subscribe_frames(),
        JsonLines::new(std::io::stdout()),
    ));

    let mut lifecycle = session.lifecycle();
    let _flight = session
        .start(params)
        .map_err(|_| std::io::Error::other("a flight is already live"))?;

    while *lifecycle.borrow_and_update() != RunLifecycle::Finished {
        if lifecycle.changed().await.is_err() {
            break;
        }
    }

    // Dropping the session closes the frame channel once the finished
    // flight's sender is gone, which lets the sink drain and exit.
    drop(session);
    let _ = sink.await;
    Ok(())
}

/// Interactive mode: terminal canvas plus key-driven control flags.
async fn run_terminal(session: Arc<Session>, params: LaunchParams) -> Result<()> {
    let mut view = TerminalView::new(
        std::io::stdout(),
        config::SURFACE_WIDTH_PX,
        config::SURFACE_HEIGHT_PX,
    );
    view.draw_chrome(&params)?;

    let projection = Projection {
        px_per_meter: config::PX_PER_METER,
        surface_height_px: config::SURFACE_HEIGHT_PX,
    };
    let view_handle = tokio::spawn(terminal::view_task(
        session.subscribe_frames(),
        view,
        projection,
    ));

    let shutdown = Arc::new(Notify::new());
    let stop = Arc::new(AtomicBool::new(false));
    let input_handle = tokio::task::spawn_blocking({
        let session = Arc::clone(&session);
        let shutdown = Arc::clone(&shutdown);
        let stop = Arc::clone(&stop);
        move || {
            let result = terminal::input_loop(&session, params, &stop);
            shutdown.notify_one();
            result
        }
    });

    shutdown.notified().await;
    stop.store(true, Ordering::Relaxed);

    match input_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "input loop failed"),
        Err(e) => tracing::error!(error = %e, "input loop panicked"),
    }

    // End any live flight so the frame channel can close, then let the view
    // drain its final frames.
    session.request_restart();
    drop(session);
    let _ = view_handle.await;
    Ok(())
}
