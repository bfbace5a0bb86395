//! Connection and transaction lifecycle
//!
//! A [`Client`] is one connection reserved from the pool, optionally inside a
//! transaction. [`ConnectionManager`] hands clients out and takes them back;
//! [`ClientScope`] decides who is responsible for cleanup.

use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres};
use std::fmt;
use tracing::{debug, warn};

use crate::errors::HausError;

/// One reserved connection
pub struct Client {
    conn: PoolConnection<Postgres>,
    in_transaction: bool,
}

impl Client {
    /// Whether `begin` was issued without a matching `commit`/`rollback`
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    pub(crate) fn connection(&mut self) -> &mut PgConnection {
        &mut self.conn
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("in_transaction", &self.in_transaction)
            .finish_non_exhaustive()
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        // A connection with a transaction still open must never be handed to someone else
        if self.in_transaction {
            warn!("client dropped inside a transaction, closing its connection");
            self.conn.close_on_drop();
        }
    }
}

/// Hands out clients from a pool and drives their transactions
#[derive(Clone, Debug)]
pub struct ConnectionManager {
    pool: PgPool,
}

impl ConnectionManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Reserve a connection from the pool
    pub async fn acquire(&self) -> Result<Client, HausError> {
        let conn = self.pool.acquire().await.map_err(HausError::Pool)?;
        debug!(
            pool_size = self.pool.size(),
            idle = self.pool.num_idle(),
            "acquired connection"
        );
        Ok(Client {
            conn,
            in_transaction: false,
        })
    }

    /// Reserve a connection and open a transaction on it
    pub async fn client(&self) -> Result<Client, HausError> {
        let mut client = self.acquire().await?;
        if let Err(e) = self.begin(&mut client).await {
            self.release(client).await;
            return Err(e);
        }
        Ok(client)
    }

    pub async fn begin(&self, client: &mut Client) -> Result<(), HausError> {
        if client.in_transaction {
            return Err(HausError::client("begin called while a transaction is already open"));
        }
        sqlx::raw_sql("BEGIN")
            .execute(client.connection())
            .await
            .map_err(|e| HausError::driver("begin", e))?;
        client.in_transaction = true;
        debug!("transaction started");
        Ok(())
    }

    pub async fn commit(&self, client: &mut Client) -> Result<(), HausError> {
        if !client.in_transaction {
            return Err(HausError::client("commit called without an open transaction"));
        }
        sqlx::raw_sql("COMMIT")
            .execute(client.connection())
            .await
            .map_err(|e| HausError::driver("commit", e))?;
        client.in_transaction = false;
        debug!("transaction committed");
        Ok(())
    }

    pub async fn rollback(&self, client: &mut Client) -> Result<(), HausError> {
        if !client.in_transaction {
            return Err(HausError::client("rollback called without an open transaction"));
        }
        sqlx::raw_sql("ROLLBACK")
            .execute(client.connection())
            .await
            .map_err(|e| HausError::driver("rollback", e))?;
        client.in_transaction = false;
        debug!("transaction rolled back");
        Ok(())
    }

    /// Return the connection to the pool, rolling back a transaction left open.
    ///
    /// Consumes the client, so a client is released at most once.
    pub async fn release(&self, mut client: Client) {
        if client.in_transaction {
            if let Err(e) = self.rollback(&mut client).await {
                warn!(error = %e, "rollback on release failed, connection will be closed");
            }
        }
        drop(client);
        debug!(idle = self.pool.num_idle(), "released connection");
    }
}

/// Who owns the client a single operation runs on.
///
/// A caller-supplied client is only borrowed: its transaction stays under the caller's
/// control. An owned client was opened for this operation and is cleaned up by
/// [`ClientScope::finish`] on every exit path.
#[derive(Debug)]
pub enum ClientScope<'c> {
    Borrowed(&'c mut Client),
    Owned(Client),
}

impl<'c> ClientScope<'c> {
    /// Borrow the caller's client, or acquire one (inside a transaction when `transactional`)
    pub async fn open(
        manager: &ConnectionManager,
        client: Option<&'c mut Client>,
        transactional: bool,
    ) -> Result<Self, HausError> {
        match client {
            Some(client) => Ok(ClientScope::Borrowed(client)),
            None if transactional => Ok(ClientScope::Owned(manager.client().await?)),
            None => Ok(ClientScope::Owned(manager.acquire().await?)),
        }
    }

    pub fn client(&mut self) -> &mut Client {
        match self {
            ClientScope::Borrowed(client) => client,
            ClientScope::Owned(client) => client,
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, ClientScope::Owned(_))
    }

    /// Close the scope with the operation's outcome.
    ///
    /// Owned: commit on success, roll back on failure, then release. A commit failure
    /// replaces the success; a rollback failure is logged and the original error kept.
    /// Borrowed: the outcome passes through untouched.
    pub async fn finish<T>(
        self,
        manager: &ConnectionManager,
        outcome: Result<T, HausError>,
    ) -> Result<T, HausError> {
        let mut client = match self {
            ClientScope::Borrowed(_) => return outcome,
            ClientScope::Owned(client) => client,
        };

        let outcome = match outcome {
            Ok(value) if client.in_transaction() => {
                manager.commit(&mut client).await.map(|()| value)
            }
            Ok(value) => Ok(value),
            Err(e) => {
                if client.in_transaction() {
                    if let Err(rollback_err) = manager.rollback(&mut client).await {
                        warn!(error = %rollback_err, "rollback after failed operation did not complete");
                    }
                }
                Err(e)
            }
        };

        manager.release(client).await;
        outcome
    }
}
