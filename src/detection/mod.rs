//! Building detector runs and collecting what they print.

pub mod output;
pub mod request;
pub mod threshold;

pub use output::{OutputBuffer, OutputStream};
pub use request::{DetectionRequest, Invocation, local_now, project_name};
pub use threshold::Validity;
