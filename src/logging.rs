use log::LevelFilter;

/// How chatty the CLI is when `RUST_LOG` is not set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Trace,
}

impl Verbosity {
    pub fn from_flags(verbose: u64, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Normal,
            (false, 1) => Verbosity::Verbose,
            (false, _) => Verbosity::Trace,
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Error,
            Verbosity::Normal => LevelFilter::Info,
            Verbosity::Verbose => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

/// Install the pretty_env_logger backend. `RUST_LOG` wins over `verbosity`.
pub fn init_logging(verbosity: Verbosity) {
    let filters = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| format!("warn,nbashotchart={}", verbosity.level_filter()));
    let _ = pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .try_init();
}
