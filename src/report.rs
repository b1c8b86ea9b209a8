use rfd::{MessageButtons, MessageDialog, MessageLevel};

// ---------------------------------------------------------------------------
// User-visible problem reports
// ---------------------------------------------------------------------------

/// Receives non-fatal problems the user should hear about.
pub trait Reporter {
    fn warn(&mut self, title: &str, message: &str);
}

/// Logs, then shows a native warning box.
#[derive(Debug, Default)]
pub struct DialogReporter;

impl Reporter for DialogReporter {
    fn warn(&mut self, title: &str, message: &str) {
        log::warn!("{}", message);
        show(MessageLevel::Warning, title, message);
    }
}

/// Report an error that ends the process.
pub fn fatal(message: &str) {
    log::error!("{}", message);
    show(MessageLevel::Error, "Fatal error", message);
}

/// Route panics through the fatal report so they are not lost when there
/// is no console attached.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        default_hook(info);
        let detail = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned());
        match detail {
            Some(msg) => fatal(&format!("Unknown error: {}", msg)),
            None => fatal("Unknown error"),
        }
    }));
}

fn show(level: MessageLevel, title: &str, message: &str) {
    let _ = MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
