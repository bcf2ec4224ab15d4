use ember_engine::app::{App, AppConfig};
use ember_engine::logging::{init_logging, LoggingConfig};

fn main() {
    init_logging(LoggingConfig::default());

    let mut app = match App::new(AppConfig::default()) {
        Ok(app) => app,
        Err(err) => {
            log::error!("initialization failed: {err:#}");
            std::process::exit(1);
        }
    };

    while app.is_running() {
        app.tick();
    }

    app.terminate();
}
