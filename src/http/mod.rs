//! HTTP control surface: wire codec, route table and the async server.

pub mod codec;
pub mod routes;
pub mod server;
