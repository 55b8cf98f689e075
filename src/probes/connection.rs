// src/probes/connection.rs
use redis::aio::MultiplexedConnection;
use redis::Client;

use crate::probe::ProbeError;

/// Opens a connection to a `redis://[user:password@]host[:port][/db]` endpoint.
/// Credentials and database selection are handled by the client.
pub(crate) async fn connect(endpoint: &str) -> Result<MultiplexedConnection, ProbeError> {
    let client = Client::open(endpoint)?;
    Ok(client.get_multiplexed_async_connection().await?)
}

/// Writes `value` under `key`, reads it back and fails with the classic
/// `different values` message when the two disagree. A missing value reads as `false`.
pub(crate) async fn write_then_read(
    conn: &mut MultiplexedConnection,
    key: &str,
    value: &str,
    ttl_secs: Option<u64>,
) -> Result<(), ProbeError> {
    let mut set = redis::cmd("SET");
    set.arg(key).arg(value);
    if let Some(ttl) = ttl_secs {
        set.arg("EX").arg(ttl);
    }
    set.query_async::<_, ()>(conn).await?;

    let fetched: Option<String> = redis::cmd("GET").arg(key).query_async(conn).await?;
    if fetched.as_deref() != Some(value) {
        return Err(ProbeError::Failed(format!(
            "different values (now: {}, fetched: {})",
            value,
            fetched.as_deref().unwrap_or("false")
        )));
    }
    Ok(())
}

/// `PING` must answer `PONG`.
pub(crate) async fn ping(conn: &mut MultiplexedConnection) -> Result<(), ProbeError> {
    let pong: String = redis::cmd("PING").query_async(conn).await?;
    if pong != "PONG" {
        return Err(ProbeError::Failed(format!("unexpected ping reply: {pong}")));
    }
    Ok(())
}
