//! Logging facilities for Stepwise.
//!
//! Stepwise uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("stepwise=debug,stepwise_core=info")
//!         .init();
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "stepwise_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "stepwise_core::signal";
    /// Shared form data target.
    pub const FORM_DATA: &str = "stepwise_core::form_data";
    /// Form engine target.
    pub const FORM: &str = "stepwise::form";
    /// Analytics emission target.
    pub const ANALYTICS: &str = "stepwise::analytics";
}
