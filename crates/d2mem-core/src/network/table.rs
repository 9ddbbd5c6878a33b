use std::net::Ipv4Addr;

use crate::error::Result;
use crate::network::{ConnectionTable, TcpConnection, TcpState};

/// `ConnectionTable` backed by the operating system's IPv4 TCP table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemConnectionTable;

/// Words per `MIB_TCPROW_OWNER_PID`
const ROW_WORDS: usize = 6;

/// Decode a `MIB_TCPTABLE_OWNER_PID` laid out as native-endian words.
///
/// Rows with an unknown state are dropped.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn parse_owner_pid_table(words: &[u32]) -> Vec<TcpConnection> {
    let Some((&count, rows)) = words.split_first() else {
        return Vec::new();
    };

    rows.chunks_exact(ROW_WORDS)
        .take(count as usize)
        .filter_map(|row| {
            // dwState, dwLocalAddr, dwLocalPort, dwRemoteAddr, dwRemotePort, dwOwningPid
            let state = TcpState::from_repr(row[0])?;
            Some(TcpConnection {
                remote_address: Ipv4Addr::from(row[3].to_ne_bytes()),
                remote_port: u16::from_be(row[4] as u16),
                state,
                owning_pid: row[5],
            })
        })
        .collect()
}

#[cfg(target_os = "windows")]
impl ConnectionTable for SystemConnectionTable {
    fn tcp_connections(&self) -> Result<Vec<TcpConnection>> {
        use windows::Win32::Foundation::{ERROR_INSUFFICIENT_BUFFER, FALSE, NO_ERROR};
        use windows::Win32::NetworkManagement::IpHelper::{
            GetExtendedTcpTable, TCP_TABLE_OWNER_PID_ALL,
        };

        use crate::error::Error;

        const AF_INET: u32 = 2;

        let mut size = 0u32;
        let mut words: Vec<u32> = Vec::new();

        // The table can grow between the size query and the read
        for _ in 0..4 {
            let buffer = if words.is_empty() {
                None
            } else {
                Some(words.as_mut_ptr() as *mut std::ffi::c_void)
            };
            // SAFETY: `size` reports the byte capacity of `words` (0 when no
            // buffer is passed); the API writes at most `size` bytes.
            let status = unsafe {
                GetExtendedTcpTable(buffer, &mut size, FALSE, AF_INET, TCP_TABLE_OWNER_PID_ALL, 0)
            };

            if status == NO_ERROR.0 && !words.is_empty() {
                return Ok(parse_owner_pid_table(&words));
            }
            if status != ERROR_INSUFFICIENT_BUFFER.0 && status != NO_ERROR.0 {
                return Err(Error::ConnectionTableUnavailable(format!(
                    "GetExtendedTcpTable failed with status {}",
                    status
                )));
            }
            words = vec![0u32; (size as usize).div_ceil(4)];
            size = (words.len() * 4) as u32;
        }

        Err(Error::ConnectionTableUnavailable(
            "TCP table kept growing while being read".to_string(),
        ))
    }
}

#[cfg(not(target_os = "windows"))]
impl ConnectionTable for SystemConnectionTable {
    fn tcp_connections(&self) -> Result<Vec<TcpConnection>> {
        tracing::debug!("TCP table lookup is only supported on Windows");
        Ok(Vec::new())
    }
}
