//! Minimal host: a three-service stack on plain shell commands.
//!
//! `api` requires `db` and `cache`; starting it brings the whole stack up in
//! dependency order. Ctrl-C drains everything and closes the stream.
//!
//! ```text
//! cargo run --example dev_stack
//! ```

use depvisor::{Config, ServiceSpec, Supervisor};
use regex::Regex;

fn backing_service(name: &str, boot_ms: u64) -> Result<ServiceSpec, regex::Error> {
    let script = format!(
        "trap 'exit 0' INT; echo booting; sleep {}; echo ready; while :; do sleep 0.2; done",
        boot_ms as f64 / 1000.0
    );
    Ok(ServiceSpec::new(name, "/bin/sh")
        .with_args(["-c", &script])
        .with_running_pattern(Regex::new("ready")?))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut supervisor = Supervisor::new(Config::default());
    supervisor.register(backing_service("db", 300)?)?;
    supervisor.register(backing_service("cache", 150)?)?;
    supervisor.register(
        ServiceSpec::new("api", "/bin/sh")
            .with_args([
                "-c",
                "trap 'exit 0' INT; echo serving on :8080; while :; do sleep 0.2; done",
            ])
            .with_running_pattern(Regex::new("serving")?)
            .with_requirements(["db", "cache"]),
    )?;

    let (handle, mut events, names) = supervisor.init()?;
    println!("supervising: {}", names.join(", "));

    handle.start("api").await?;

    let reader = tokio::spawn(async move {
        while let Some(message) = events.recv().await {
            println!("{message}");
        }
    });

    handle.close_on_signal().await;
    reader.await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        eprintln!("dev_stack: {err}");
        std::process::exit(1);
    }
}
