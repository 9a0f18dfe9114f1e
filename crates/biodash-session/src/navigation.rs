//! Connection state transitions and the gate in front of every view

use crate::Session;
use crate::types::ConnectionState;
use biodash_catalog::Dashboard;
use biodash_core::{ConnectError, ConnectionParameters, Error, Result};
use biodash_store::{QueryExecutor, Store, check_connection};
use std::sync::Arc;

pub const CONNECT_OK_MESSAGE: &str = "Connected to the database successfully!";
pub const CONNECT_FAILED_MESSAGE: &str =
    "Failed to connect to the database. Check your credentials.";

/// Try `params` against the store and move the session accordingly.
///
/// The check connection is closed straight away. A failure leaves the
/// session disconnected, whatever state it was in before.
pub async fn attempt_connect(
    session: &dyn Session,
    store: &dyn Store,
    params: ConnectionParameters,
) -> std::result::Result<(), ConnectError> {
    match check_connection(store, &params).await {
        Ok(()) => {
            tracing::info!(
                session = %session.id(),
                host = %params.hostname,
                database = %params.database,
                "{}",
                CONNECT_OK_MESSAGE
            );
            session.set_connection(ConnectionState::Connected(params));
            Ok(())
        }
        Err(e) => {
            tracing::warn!(session = %session.id(), error = %e, "{}", CONNECT_FAILED_MESSAGE);
            session.set_connection(ConnectionState::Disconnected);
            Err(e)
        }
    }
}

/// Dashboard bound to the session's connection parameters, or
/// `NotConnected` while the session is disconnected.
pub fn dashboard_for(session: &dyn Session, store: Arc<dyn Store>) -> Result<Dashboard> {
    match session.connection() {
        ConnectionState::Connected(params) => {
            Ok(Dashboard::new(QueryExecutor::new(store, params)))
        }
        ConnectionState::Disconnected => Err(Error::NotConnected),
    }
}
