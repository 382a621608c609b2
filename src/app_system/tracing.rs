/// Configures `tracing` once for the whole process.
///
/// `RUST_LOG` controls verbosity (default `info`). Output goes to stderr so
/// the register screen on stdout is not interleaved with log lines.
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
