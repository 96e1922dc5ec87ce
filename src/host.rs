//! Host shell boundary
//!
//! The frame is embedded in a host application that only needs to hear one
//! thing from it: that the frame has finished loading and can be shown.

use tracing::info;

#[cfg(test)]
use mockall::automock;

/// Handle to the surrounding host shell
#[cfg_attr(test, automock)]
pub trait HostHandle: Send + Sync {
    /// Tell the host the frame is ready to render
    fn ready(&self);
}

/// Host that only logs the ready signal, for running the frame standalone
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHost;

impl HostHandle for LoggingHost {
    fn ready(&self) {
        info!("Frame ready, host notified");
    }
}
