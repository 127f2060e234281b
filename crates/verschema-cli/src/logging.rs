use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter, e.g. `verschema_core=debug`
pub const LOG_ENV: &str = "VERSCHEMA_LOG";

/// Install the stderr log subscriber.
///
/// `VERSCHEMA_LOG` wins when set. Otherwise `verbosity` picks the level:
/// warn by default, debug for `-v` and trace for `-vv`. Installing twice is
/// a no-op.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(match verbosity {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
