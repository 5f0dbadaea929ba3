use std::{process, time::Instant};

use log::{info, warn};

use snap_tsp_core::{CancelToken, Result, RouteInput, RunOptions, logging, plan_route, write_route};

const EXIT_INTERRUPTED: i32 = 130;

fn main() -> Result<()> {
    let now = Instant::now();
    let options = RunOptions::from_args()?;
    logging::init_logger(&options)?;

    let input = RouteInput::load(&options)?;
    info!("input: {input}");
    info!("options: {options}");

    // Installed only once loading is done so Ctrl-C still aborts a blocked
    // stdin read. The first interrupt stops the search, the second exits.
    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    if let Err(err) = ctrlc::set_handler(move || {
        if on_interrupt.interrupt() {
            process::exit(EXIT_INTERRUPTED);
        }
    }) {
        warn!("solve: failed to install interrupt hook err={err}");
    }

    let report = plan_route(&input, &options, cancel)?;
    info!("report: {report}");

    write_route(
        options.output_path(),
        options.format,
        &report.nodes,
        &report.tour,
    )?;

    info!(
        "output: n={} length={:.6} time={:.2}s",
        report.nodes.len(),
        report.tour.length,
        now.elapsed().as_secs_f32()
    );

    Ok(())
}
