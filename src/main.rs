mod batch;
mod cli;
mod collection;
mod controller;
mod error;
mod files;
mod input;
mod loader;
mod report;
mod ui;
mod view;

use clap::Parser;
use std::process::ExitCode;
use winit::event_loop::EventLoop;

use crate::cli::Cli;
use crate::controller::ViewportController;
use crate::error::Result;
use crate::loader::ImageDecoder;
use crate::report::DialogReporter;
use crate::ui::App;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    env_logger::init();
    report::install_panic_hook();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report::fatal(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.config();
    log::debug!("{:?}", config);

    let event_loop = EventLoop::new()?;

    let mut controller = ViewportController::new(ImageDecoder, DialogReporter, config.clone());
    controller.load_initial(&cli.paths);

    let mut app = App::new(controller, &config);
    event_loop.run_app(&mut app)?;
    app.into_result()
}
