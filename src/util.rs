use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const DEFAULT_SSH_PORT: u16 = 22;

pub fn get_default_ssh_port() -> u16 {
    DEFAULT_SSH_PORT
}

const RXWATCH_PORT: &str = "RXWATCH_PORT";

const DEFAULT_PORT: u16 = 8080;

pub fn get_port() -> u16 {
    let port_from_env = std::env::var(RXWATCH_PORT);
    port_from_env.map_or(DEFAULT_PORT, |res| res.parse().unwrap_or(DEFAULT_PORT))
}

const RXWATCH_ADDR: &str = "RXWATCH_ADDR";

const DEFAULT_ADDR: Ipv4Addr = Ipv4Addr::new(0, 0, 0, 0);

pub fn get_addr() -> IpAddr {
    let addr_from_env = std::env::var(RXWATCH_ADDR);
    addr_from_env.map_or(IpAddr::V4(DEFAULT_ADDR), |res| {
        res.parse().unwrap_or(IpAddr::V4(DEFAULT_ADDR))
    })
}

/// Bind address for the HTTP surface when the config file doesn't name one
pub fn get_bind_addr() -> SocketAddr {
    SocketAddr::new(get_addr(), get_port())
}
