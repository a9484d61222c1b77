mod server;

pub use server::{make_app, run_server, HealthResponse};
