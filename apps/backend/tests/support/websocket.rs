// WebSocket test utilities

use std::net::TcpListener;

use actix_web::{web, App, HttpServer};
use fml_backend::routes;
use fml_backend::AppState;

/// Start a test HTTP server with the full route table on a random port.
///
/// Tests connect through real WebSocket clients (tokio-tungstenite), so the
/// handshake, the session actor, and the room all run exactly as they do in
/// production.
///
/// # Returns
/// Returns a tuple of (server_handle, socket_addr, join_handle) where:
/// - `server_handle` can be used to gracefully stop the server
/// - `socket_addr` is the address the server is listening on
/// - `join_handle` can be awaited to wait for server shutdown and check for errors
pub async fn start_test_server(
    state: AppState,
) -> Result<
    (
        actix_web::dev::ServerHandle,
        std::net::SocketAddr,
        tokio::task::JoinHandle<Result<(), std::io::Error>>,
    ),
    Box<dyn std::error::Error>,
> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let state_data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state_data.clone())
            .configure(routes::configure)
    })
    .workers(1)
    .listen(listener)?
    .run();

    let server_handle = server.handle();
    let join = tokio::spawn(server);

    Ok((server_handle, addr, join))
}
