//! Pull (REST) transport for snapshots and authoritative writes.

mod http;
mod transport;

pub use http::HttpPullClient;
pub use transport::PullTransport;
