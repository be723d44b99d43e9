// Connection module
// One task per accepted connection, served by hyper's HTTP/1 driver

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Spawn a task serving every request on `stream` until the peer hangs up
pub fn accept_connection(stream: TcpStream, peer: SocketAddr, state: &Arc<AppState>) {
    let state = Arc::clone(state);

    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let service = service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer));

        if let Err(err) = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(io, service)
            .await
        {
            // Clients dropping mid-request are routine
            if !err.is_incomplete_message() {
                logger::log_connection_error(&err);
            }
        }
    });
}
