//! Game server endpoint lookup from the system TCP table.

mod table;

use std::collections::HashMap;
use std::net::Ipv4Addr;

use serde::Serialize;
use strum::{Display, FromRepr};
use tracing::debug;

use crate::error::{Error, Result};

pub use table::SystemConnectionTable;

/// `MIB_TCP_STATE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, FromRepr, Display)]
#[repr(u32)]
pub enum TcpState {
    Closed = 1,
    Listen = 2,
    SynSent = 3,
    SynReceived = 4,
    Established = 5,
    FinWait1 = 6,
    FinWait2 = 7,
    CloseWait = 8,
    Closing = 9,
    LastAck = 10,
    TimeWait = 11,
    DeleteTcb = 12,
}

/// One IPv4 row of the TCP table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpConnection {
    pub remote_address: Ipv4Addr,
    pub remote_port: u16,
    pub state: TcpState,
    pub owning_pid: u32,
}

/// The remote end of the game server connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkEndpoint {
    pub remote_address: Ipv4Addr,
    pub remote_port: u16,
    pub state: TcpState,
}

impl From<&TcpConnection> for NetworkEndpoint {
    fn from(connection: &TcpConnection) -> Self {
        Self {
            remote_address: connection.remote_address,
            remote_port: connection.remote_port,
            state: connection.state,
        }
    }
}

/// Source of the current TCP connections
pub trait ConnectionTable {
    fn tcp_connections(&self) -> Result<Vec<TcpConnection>>;
}

impl ConnectionTable for Vec<TcpConnection> {
    fn tcp_connections(&self) -> Result<Vec<TcpConnection>> {
        Ok(self.clone())
    }
}

/// Pick the game server connection of `pid`.
///
/// Established connections of the process are kept; every connection whose
/// remote address is shared with another one is discarded (those go to
/// lobby and chat services). The last remaining connection wins.
pub fn resolve_endpoint(connections: &[TcpConnection], pid: u32) -> Result<NetworkEndpoint> {
    let owned: Vec<&TcpConnection> = connections
        .iter()
        .filter(|c| c.state == TcpState::Established && c.owning_pid == pid)
        .collect();

    let mut counts: HashMap<Ipv4Addr, usize> = HashMap::new();
    for connection in &owned {
        *counts.entry(connection.remote_address).or_default() += 1;
    }

    let endpoint = owned
        .iter()
        .rev()
        .find(|c| counts.get(&c.remote_address) == Some(&1))
        .map(|c| NetworkEndpoint::from(*c))
        .ok_or_else(|| {
            Error::NotFound(format!("no unambiguous connection for PID {}", pid))
        })?;

    debug!(
        "Endpoint for PID {}: {}:{} ({} candidates)",
        pid,
        endpoint.remote_address,
        endpoint.remote_port,
        owned.len()
    );
    Ok(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(ip: [u8; 4], port: u16, state: TcpState, pid: u32) -> TcpConnection {
        TcpConnection {
            remote_address: Ipv4Addr::from(ip),
            remote_port: port,
            state,
            owning_pid: pid,
        }
    }

    #[test]
    fn test_duplicated_remote_addresses_are_excluded() {
        let table = vec![
            conn([1, 1, 1, 1], 443, TcpState::Established, 42),
            conn([2, 2, 2, 2], 443, TcpState::Established, 42),
            conn([1, 1, 1, 1], 1119, TcpState::Established, 42),
        ];
        let endpoint = resolve_endpoint(&table, 42).unwrap();
        assert_eq!(endpoint.remote_address, Ipv4Addr::new(2, 2, 2, 2));
        assert_eq!(endpoint.remote_port, 443);
    }

    #[test]
    fn test_last_survivor_wins() {
        let table = vec![
            conn([3, 3, 3, 3], 1, TcpState::Established, 42),
            conn([4, 4, 4, 4], 2, TcpState::Established, 42),
        ];
        assert_eq!(
            resolve_endpoint(&table, 42).unwrap().remote_address,
            Ipv4Addr::new(4, 4, 4, 4)
        );
    }

    #[test]
    fn test_filters_state_and_pid() {
        let table = vec![
            conn([5, 5, 5, 5], 1, TcpState::Established, 42),
            conn([6, 6, 6, 6], 1, TcpState::TimeWait, 42),
            conn([7, 7, 7, 7], 1, TcpState::Established, 7),
        ];
        assert_eq!(
            resolve_endpoint(&table, 42).unwrap().remote_address,
            Ipv4Addr::new(5, 5, 5, 5)
        );
    }

    #[test]
    fn test_other_process_does_not_make_address_ambiguous() {
        let table = vec![
            conn([1, 1, 1, 1], 1, TcpState::Established, 42),
            conn([1, 1, 1, 1], 1, TcpState::Established, 7),
        ];
        assert!(resolve_endpoint(&table, 42).is_ok());
    }

    #[test]
    fn test_nothing_unambiguous_is_not_found() {
        let table = vec![
            conn([1, 1, 1, 1], 1, TcpState::Established, 42),
            conn([1, 1, 1, 1], 2, TcpState::Established, 42),
        ];
        assert!(matches!(
            resolve_endpoint(&table, 42),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(resolve_endpoint(&[], 42), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_tcp_state_from_repr() {
        assert_eq!(TcpState::from_repr(5), Some(TcpState::Established));
        assert_eq!(TcpState::from_repr(12), Some(TcpState::DeleteTcb));
        assert_eq!(TcpState::from_repr(0), None);
    }
}
