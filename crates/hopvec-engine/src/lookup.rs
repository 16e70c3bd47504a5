//! Forwarding lookup
//!
//! The data-plane query: given a destination address, pick the egress
//! port. The scan takes the first active entry, in registration order,
//! whose subnet contains the destination. There is no longest-prefix
//! tie-break; attached subnets are registered before any learned route, so
//! first-match resolves overlaps in their favor.

use std::net::Ipv4Addr;

use hopvec_core::{ForwardState, PortId};

use crate::store::TableStore;

/// Result of a forwarding lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Egress {
    /// Port to transmit on.
    pub port: PortId,
    /// Interface name for display.
    pub port_name: String,
    /// Next-hop router, or `None` when the destination is on-link.
    pub gateway: Option<Ipv4Addr>,
}

impl Egress {
    /// The address the link layer should resolve to a hardware address:
    /// the gateway when the route goes through a neighbor, otherwise the
    /// destination itself.
    pub fn resolve_target(&self, dst: Ipv4Addr) -> Ipv4Addr {
        self.gateway.unwrap_or(dst)
    }
}

/// Find the egress for `dst`. `None` is the explicit no-route outcome; the
/// engine neither retries nor buffers undeliverable packets.
pub fn egress_for(store: &TableStore, dst: Ipv4Addr) -> Option<Egress> {
    store
        .forwarding()
        .iter()
        .find(|fw| fw.state == ForwardState::Active && fw.subnet.contains(dst))
        .map(|fw| Egress {
            port: fw.port,
            port_name: fw.port_name.clone(),
            gateway: fw.next_hop,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use hopvec_core::{DvEntry, LocalInterface, Subnet};

    use crate::breakage::apply_withdrawal;
    use crate::sync::reconcile_forwarding;
    use crate::update::apply_advertisement;

    fn addr(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    fn entry(net: &str, prefix: u8, hop: u32) -> DvEntry {
        DvEntry {
            subnet: Subnet::new(addr(net), prefix).unwrap(),
            hop,
        }
    }

    fn seeded() -> TableStore {
        let mut store = TableStore::new(16);
        store
            .seed(&[
                LocalInterface {
                    address: addr("10.0.0.1"),
                    prefix_len: 8,
                    port: PortId(0),
                },
                LocalInterface {
                    address: addr("192.168.1.1"),
                    prefix_len: 24,
                    port: PortId(1),
                },
            ])
            .unwrap();
        store
    }

    #[test]
    fn test_on_link_destination() {
        let store = seeded();
        let egress = egress_for(&store, addr("192.168.1.40")).unwrap();
        assert_eq!(egress.port, PortId(1));
        assert_eq!(egress.port_name, "eth1");
        assert_eq!(egress.gateway, None);
        // On-link: resolve the destination itself.
        assert_eq!(egress.resolve_target(addr("192.168.1.40")), addr("192.168.1.40"));
    }

    #[test]
    fn test_learned_destination_resolves_gateway() {
        let mut store = seeded();
        apply_advertisement(&mut store, addr("10.0.0.2"), PortId(0), &[entry("172.16.0.0", 16, 1)], Instant::now())
            .unwrap();
        reconcile_forwarding(&mut store).unwrap();

        let egress = egress_for(&store, addr("172.16.5.5")).unwrap();
        assert_eq!(egress.port, PortId(0));
        assert_eq!(egress.gateway, Some(addr("10.0.0.2")));
        assert_eq!(egress.resolve_target(addr("172.16.5.5")), addr("10.0.0.2"));
    }

    #[test]
    fn test_no_route_outcome() {
        let store = seeded();
        assert_eq!(egress_for(&store, addr("203.0.113.1")), None);
    }

    #[test]
    fn test_inactive_entries_are_skipped() {
        let mut store = seeded();
        // 10.1.0.0/16 learned inside the wider attached 10.0.0.0/8 -- but
        // attached subnets are registered first, so it could only win if
        // the /8 went inactive. Here it is inactive itself and must be
        // skipped even for addresses it contains.
        apply_advertisement(&mut store, addr("10.0.0.2"), PortId(0), &[entry("10.1.0.0", 16, 1)], Instant::now())
            .unwrap();
        reconcile_forwarding(&mut store).unwrap();
        apply_withdrawal(&mut store, &[entry("10.1.0.0", 16, 2)]);

        let egress = egress_for(&store, addr("10.1.2.3")).unwrap();
        // First active match is the attached /8, not the more specific
        // inactive /16.
        assert_eq!(egress.port, PortId(0));
        assert_eq!(egress.gateway, None);
    }

    #[test]
    fn test_first_match_is_registration_order() {
        let mut store = seeded();
        apply_advertisement(&mut store, addr("10.0.0.2"), PortId(0), &[entry("10.1.0.0", 16, 1)], Instant::now())
            .unwrap();
        reconcile_forwarding(&mut store).unwrap();

        // Both the attached /8 and the learned /16 contain 10.1.2.3; the
        // attached subnet was registered first and wins.
        let egress = egress_for(&store, addr("10.1.2.3")).unwrap();
        assert_eq!(egress.gateway, None);
    }
}
