//! Integration tests with mock HTTP server

mod errors;
mod mock_server;
mod mutations;
mod retry;
