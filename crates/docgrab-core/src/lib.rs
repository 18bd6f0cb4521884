pub mod config;
pub mod logging;

// Discovery
pub mod page;
pub mod resolver;

// Acting on a result
pub mod dispatch;
pub mod host;
pub mod notify;
pub mod poll;
pub mod session;

// HTTP and disk
pub mod fetch;
pub mod retry;
pub mod storage;
pub mod url_model;
