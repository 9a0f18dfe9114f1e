//! Biological Research Database dashboard
//!
//! Facade over the workspace crates so integration tests and embedders can
//! depend on a single package.

pub use biodash_catalog as catalog;
pub use biodash_core as core;
pub use biodash_server as server;
pub use biodash_session as session;
pub use biodash_store as store;
pub use biodash_telemetry as telemetry;
