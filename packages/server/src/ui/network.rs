//! Discovery of the address other players should connect to.
//!
//! Pairing is manual: the host reads this address off the server log and
//! tells the other player out-of-band.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// The machine's outward-facing IPv4 address, if it has one.
///
/// Connecting a UDP socket only selects a route; no packet is sent.
pub fn local_ipv4_address() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(8, 8, 8, 8), 80)).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) if !ip.is_loopback() && !ip.is_unspecified() => Some(ip),
        _ => None,
    }
}

/// `<ip>:<port>` to share with the joining player, `localhost` when offline.
pub fn shareable_address(port: u16) -> String {
    match local_ipv4_address() {
        Some(ip) => format!("{}:{}", ip, port),
        None => format!("localhost:{}", port),
    }
}
