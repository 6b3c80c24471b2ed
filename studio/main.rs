/// leafscan Studio
///
/// Browser front end for the leaf classifier: upload, drag-and-drop or webcam
/// capture, then ranked predictions with field advice.
/// Served by a synchronous tiny_http server; no JavaScript frameworks required.
///
/// Run with:
///   cargo run --bin studio --release -- [config.json]
/// Then open the bind address (default http://127.0.0.1:7878)

mod state;
mod render;
mod routes;
mod handlers;
mod util;

use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tiny_http::Server;
use tracing::{error, info};

use leafscan::{AppConfig, Session};
use state::StudioState;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let config_path = std::env::args().nth(1);
    let config = match AppConfig::load_or_default(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let addr = config.bind_addr.clone();
    let server = match Server::http(&addr) {
        Ok(server) => server,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind HTTP server");
            return ExitCode::FAILURE;
        }
    };

    let session = Session::load(config);
    info!(status = session.status_text(), "{}", session.model_info());
    let shared_state = Arc::new(Mutex::new(StudioState::new(session)));

    println!("leafscan studio listening on http://{}", addr);

    // One thread per request: a slow prediction must not stall page loads
    // or the status endpoint.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
    ExitCode::SUCCESS
}
