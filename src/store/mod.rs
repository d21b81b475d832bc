use mongodb::bson::doc;
use mongodb::event::sdam::SdamEvent;
use mongodb::event::EventHandler;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for StoreError {}

/// Logs post-connection lifecycle events for the lifetime of the process.
/// Heartbeat failures and closed servers are non-fatal; no reconnect logic
/// lives here, the driver multiplexes and recovers on its own.
fn lifecycle_event_handler() -> EventHandler<SdamEvent> {
    EventHandler::callback(|event: SdamEvent| match event {
        SdamEvent::ServerHeartbeatFailed(ev) => {
            error!(address = %ev.server_address, error = %ev.failure, "document store connection error");
        }
        SdamEvent::ServerClosed(ev) => {
            info!(address = %ev.address, "document store server disconnected");
        }
        SdamEvent::TopologyClosed(_) => {
            info!("document store topology closed");
        }
        _ => {}
    })
}

/// Establishes the single connection handle the repositories and the
/// scheduler share. A failed initial ping is returned as an error; the
/// caller terminates the process on it (fail-fast, no retry).
pub async fn connect(uri: &str, db_name: &str) -> Result<Database, StoreError> {
    let mut options = ClientOptions::parse(uri)
        .await
        .map_err(|e| StoreError(format!("invalid connection string: {e}")))?;
    options.app_name = Some("volunteer-hub".to_string());
    if options.server_selection_timeout.is_none() {
        options.server_selection_timeout = Some(Duration::from_secs(5));
    }
    options.sdam_event_handler = Some(lifecycle_event_handler());

    let client = Client::with_options(options).map_err(|e| StoreError(e.to_string()))?;
    let db = client.database(db_name);
    db.run_command(doc! {"ping": 1})
        .await
        .map_err(|e| StoreError(format!("initial ping failed: {e}")))?;
    info!(database = db_name, "connected to document store");
    Ok(db)
}
