use log::{LevelFilter, SetLoggerError};

/// Initialize logging for the CLI.
///
/// Uses `Debug` level if `debug_enabled` is set, otherwise `Info`. An explicit `RUST_LOG` overrides
/// both. Fails if a logger has already been installed for this process.
pub fn init_logger(debug_enabled: bool) -> Result<(), SetLoggerError> {
    let level = if debug_enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    builder.try_init()?;
    log::debug!("Logger initialized at {level:?} level");
    Ok(())
}
