use hydrotracker::{
    load_reminders, load_tracker, resolve_reminders_path, resolve_tracker_path, router, scheduler,
    storage::persist_tracker, tracker, AppState,
};
use std::{env, net::SocketAddr};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let tracker_path = resolve_tracker_path();
    let reminders_path = resolve_reminders_path();
    for path in [&tracker_path, &reminders_path] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut data = load_tracker(&tracker_path).await;
    if tracker::rollover_if_new_day(&mut data) {
        info!("new day started, streak settled");
        persist_tracker(&tracker_path, &data)
            .await
            .map_err(|err| err.message)?;
    }
    let reminders = load_reminders(&reminders_path).await;

    let state = AppState::new(tracker_path, reminders_path, data, reminders);

    // Settings persisted as enabled restore the tick loop, catching up on
    // slots that already passed today.
    scheduler::restart(&state, true).await;

    let app = router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
