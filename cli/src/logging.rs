use tracing_subscriber::EnvFilter;

/// Logging setup chosen on the command line. `RUST_LOG` overrides it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub verbose: bool,
    pub quiet:   bool,
}

impl LogConfig {
    pub fn default_filter(&self) -> &'static str {
        if self.verbose {
            "grpc_gen=debug"
        } else if self.quiet {
            "warn"
        } else {
            "grpc_gen=info"
        }
    }
}

/// Installs a stderr subscriber for the rest of the process.
pub fn init_logging(config: LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
