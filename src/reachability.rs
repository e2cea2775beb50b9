//! Pre-flight connectivity checks.
//!
//! A [`Reachability`] oracle is consulted before every call. It is an
//! optimization only: a reachable answer never hides a later transport
//! failure, and a probe that cannot run counts as unavailable.

/// Whether the network looks usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    Available,
    Unavailable,
}

/// Error returned when an oracle cannot determine connectivity.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Reachability probe failed: {0}")]
pub struct ProbeError(pub String);

/// Answers "is the network currently reachable".
///
/// Closures returning a [`ConnectionStatus`] implement this trait, which keeps
/// tests free of real network access:
///
/// ```
/// use lightnet::{Client, ConnectionStatus, Endpoint, Error, LogLevel};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder()
///     .base_url("https://api.example.com")
///     .reachability(|| ConnectionStatus::Unavailable)
///     .build()?;
///
/// assert!(matches!(client.request(&Endpoint::get("/")).await, Err(Error::NoNetwork)));
/// # Ok(())
/// # }
/// ```
pub trait Reachability: Send + Sync {
    /// Probes connectivity.
    fn probe(&self) -> Result<ConnectionStatus, ProbeError>;

    /// Probes connectivity, folding probe failures into `Unavailable`.
    fn connection_status(&self) -> ConnectionStatus {
        match self.probe() {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(error = %e, "Reachability probe failed, assuming no network");
                ConnectionStatus::Unavailable
            }
        }
    }
}

impl<F> Reachability for F
where
    F: Fn() -> ConnectionStatus + Send + Sync,
{
    fn probe(&self) -> Result<ConnectionStatus, ProbeError> {
        Ok(self())
    }
}

/// Oracle that always reports the network as available, leaving failure
/// detection to the transport. This is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReachable;

impl Reachability for AlwaysReachable {
    fn probe(&self) -> Result<ConnectionStatus, ProbeError> {
        Ok(ConnectionStatus::Available)
    }
}
