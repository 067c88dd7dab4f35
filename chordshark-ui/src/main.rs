mod render;
mod runtime;
mod trainer;
mod ui;

use std::fs::File;

use ui::RatatuiBackend;

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = chordshark_core::paths::log_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = File::create(&log_path).unwrap_or_else(|_| {
        File::create(std::env::temp_dir().join("chordshark.log")).expect("Cannot create log file")
    });

    WriteLogger::init(log_level, Config::default(), log_file)
        .expect("Failed to initialize logger");

    log::info!("chordshark starting (log level: {:?})", log_level);
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    if args.iter().any(|a| a == "--list-ports") {
        runtime::list_ports();
        return Ok(());
    }

    let mut backend = RatatuiBackend::new()?;
    backend.start()?;

    let result = runtime::run(&mut backend);

    backend.stop()?;
    result
}
