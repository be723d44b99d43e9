// Server module
// Listener creation, the accept loop, per-connection tasks and shutdown signals

pub mod connection;
pub mod listener;
pub mod server_loop;
pub mod signal;

pub use listener::create_listener;
pub use server_loop::run;
pub use signal::shutdown_signal;
