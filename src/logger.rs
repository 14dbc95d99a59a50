/// Initialises `env_logger`: Info by default, Debug when `verbose` is set.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .format_target(false)
        .format_timestamp(None)
        .init();
}
