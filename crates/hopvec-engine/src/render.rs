//! Table rendering for the display layer
//!
//! The CLI layer above the engine dumps tables on demand; these functions
//! produce the text.

use std::fmt::Write as _;

use hopvec_core::{ForwardState, RouteStatus};

use crate::store::TableStore;

/// Render the routing table.
pub fn render_routing_table(store: &TableStore) -> String {
    if store.routes().is_empty() {
        return "routing table: no entries\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:>4}  {:<16} {:<8} {}",
        "destination", "hop", "next hop", "iface", "status"
    );
    for route in store.routes() {
        let next_hop = route
            .next_hop
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string());
        let status = match route.status {
            RouteStatus::Up => "up",
            RouteStatus::Down => "down",
        };
        let _ = writeln!(
            out,
            "{:<20} {:>4}  {:<16} {:<8} {}",
            route.subnet.to_string(),
            route.hop,
            next_hop,
            route.port_name,
            status
        );
    }
    out
}

/// Render the forwarding table.
pub fn render_forwarding_table(store: &TableStore) -> String {
    if store.forwarding().is_empty() {
        return "forwarding table: no entries\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:<16} {:<8} {}",
        "destination", "next hop", "iface", "state"
    );
    for fw in store.forwarding() {
        let next_hop = fw
            .next_hop
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string());
        let state = match fw.state {
            ForwardState::Active => "active",
            ForwardState::Inactive => "inactive",
        };
        let _ = writeln!(
            out,
            "{:<20} {:<16} {:<8} {}",
            fw.subnet.to_string(),
            next_hop,
            fw.port_name,
            state
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use hopvec_core::{LocalInterface, PortId};

    #[test]
    fn test_empty_tables_render_placeholder() {
        let store = TableStore::new(4);
        assert_eq!(render_routing_table(&store), "routing table: no entries\n");
        assert_eq!(
            render_forwarding_table(&store),
            "forwarding table: no entries\n"
        );
    }

    #[test]
    fn test_rendered_tables_contain_rows() {
        let mut store = TableStore::new(4);
        store
            .seed(&[LocalInterface {
                address: "10.0.0.1".parse().unwrap(),
                prefix_len: 8,
                port: PortId(0),
            }])
            .unwrap();

        let routing = render_routing_table(&store);
        assert!(routing.contains("10.0.0.0/8"));
        assert!(routing.contains("eth0"));
        assert!(routing.contains("up"));

        let forwarding = render_forwarding_table(&store);
        assert!(forwarding.contains("10.0.0.0/8"));
        assert!(forwarding.contains("active"));
    }
}
