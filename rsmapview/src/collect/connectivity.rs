use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use crate::collect::global_variables::{CONNECTIVITY_HOST, CONNECTIVITY_URL};
use crate::commons::basic_functions::http_client;

/// True if any HTTP response comes back from `url` within `timeout`
pub fn http_probe(url: &str, timeout: Duration) -> bool {
    let client = match http_client(timeout) {
        Ok(client) => client,
        Err(e) => {
            log::debug!("Cannot build probe client: {}", e);
            return false;
        }
    };
    match client.get(url).send() {
        Ok(_) => true,
        Err(e) => {
            log::debug!("HTTP probe {} failed: {}", url, e);
            false
        }
    }
}

/// True if a TCP connection to `addr` opens within `timeout`
pub fn tcp_probe(addr: &str, timeout: Duration) -> bool {
    let addr: SocketAddr = match addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            log::debug!("Invalid probe address {}: {}", addr, e);
            return false;
        }
    };
    match TcpStream::connect_timeout(&addr, timeout) {
        Ok(_) => true,
        Err(e) => {
            log::debug!("TCP probe {} failed: {}", addr, e);
            false
        }
    }
}

/// HTTP probe first, raw TCP to a public DNS resolver as fallback
pub fn internet_connection() -> bool {
    http_probe(CONNECTIVITY_URL, Duration::from_secs(5))
        || tcp_probe(CONNECTIVITY_HOST, Duration::from_secs(3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_tcp_probe_local_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        assert!(tcp_probe(&addr, Duration::from_secs(1)));
    }

    #[test]
    fn test_tcp_probe_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);
        assert!(!tcp_probe(&addr, Duration::from_secs(1)));
    }

    #[test]
    fn test_probes_reject_bad_targets() {
        assert!(!tcp_probe("not an address", Duration::from_secs(1)));
        assert!(!http_probe("http://127.0.0.1:9/", Duration::from_secs(1)));
    }
}
