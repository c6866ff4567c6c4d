use homework_notifier::config::environment::Config;
use homework_notifier::config::init_tracing;
use homework_notifier::MonitorEngine;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load configuration; the log sinks depend on it, so a refused start goes to stderr
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Refusing to start: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(config.log_file.as_deref()) {
        eprintln!("Failed to open log file: {}", e);
        std::process::exit(1);
    }
    tracing::debug!("config = {:?}", config);

    let engine = MonitorEngine::from_config(&config);

    tokio::select! {
        _ = engine.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }
}
