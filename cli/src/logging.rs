//! Ambient tracing setup for the CLI binary only — the codec kernel in
//! `abicodec-vm` never calls into `tracing` itself.

pub fn init(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).without_time().init();
}
