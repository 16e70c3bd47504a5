//! Convergence scenarios across simulated routers
//!
//! Three routers in a chain, exchanging real wire-encoded messages between
//! their table stores:
//!
//! ```text
//!   LAN-A --- A ===(10.0.12.0/24)=== B ===(10.0.23.0/24)=== C --- LAN-C
//! ```
//!
//! Every exchange round-trips through the codec so these tests cover the
//! full decode -> update -> reconcile path, not just the table math.

use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use hopvec_core::{DvCommand, DvMessage, ForwardState, LocalInterface, PortId, RouteStatus};
use hopvec_engine::{
    TableStore, advertisement, apply_advertisement, apply_withdrawal, egress_for, expire_stale,
    mark_link_down, reconcile_forwarding,
};

fn addr(s: &str) -> Ipv4Addr {
    s.parse().unwrap()
}

fn seeded(interfaces: &[(&str, u8, u32)]) -> TableStore {
    let mut store = TableStore::new(32);
    let interfaces: Vec<LocalInterface> = interfaces
        .iter()
        .map(|(address, prefix_len, port)| LocalInterface {
            address: addr(address),
            prefix_len: *prefix_len,
            port: PortId(*port),
        })
        .collect();
    store.seed(&interfaces).unwrap();
    store
}

/// Encode `from`'s advertisement, push it through the wire codec, and apply
/// it to `to` as if it arrived from `neighbor` on `port`.
fn exchange(from: &TableStore, to: &mut TableStore, neighbor: Ipv4Addr, port: PortId, now: Instant) {
    let wire = advertisement(from).encode_bytes();
    let message = DvMessage::decode(&wire).unwrap();
    assert_eq!(message.command, DvCommand::Advertise);
    apply_advertisement(to, neighbor, port, &message.entries, now).unwrap();
    reconcile_forwarding(to).unwrap();
}

fn route_status(store: &TableStore, subnet: &str) -> RouteStatus {
    store
        .routes()
        .iter()
        .find(|r| r.subnet.to_string() == subnet)
        .unwrap_or_else(|| panic!("no route for {subnet}"))
        .status
}

#[test]
fn test_three_router_chain_converges() {
    let now = Instant::now();
    let mut a = seeded(&[("10.0.1.1", 24, 0), ("10.0.12.1", 24, 1)]);
    let mut b = seeded(&[("10.0.12.2", 24, 0), ("10.0.23.2", 24, 1)]);
    let mut c = seeded(&[("10.0.23.3", 24, 0), ("10.0.3.1", 24, 1)]);

    // One advertisement round in each direction along the chain.
    exchange(&a, &mut b, addr("10.0.12.1"), PortId(0), now);
    exchange(&b, &mut c, addr("10.0.23.2"), PortId(0), now);
    exchange(&c, &mut b, addr("10.0.23.3"), PortId(1), now);
    exchange(&b, &mut a, addr("10.0.12.2"), PortId(1), now);

    // B learned both LANs at hop 2.
    let lan_a = b
        .routes()
        .iter()
        .find(|r| r.subnet.to_string() == "10.0.1.0/24")
        .unwrap();
    assert_eq!(lan_a.hop, 2);
    assert_eq!(lan_a.next_hop, Some(addr("10.0.12.1")));

    // C learned LAN-A at hop 3 through B.
    let lan_a_at_c = c
        .routes()
        .iter()
        .find(|r| r.subnet.to_string() == "10.0.1.0/24")
        .unwrap();
    assert_eq!(lan_a_at_c.hop, 3);
    assert_eq!(lan_a_at_c.next_hop, Some(addr("10.0.23.2")));

    // A learned LAN-C at hop 3 through B.
    let lan_c_at_a = a
        .routes()
        .iter()
        .find(|r| r.subnet.to_string() == "10.0.3.0/24")
        .unwrap();
    assert_eq!(lan_c_at_a.hop, 3);

    // Data-plane check: C forwards LAN-A traffic toward B.
    let egress = egress_for(&c, addr("10.0.1.50")).unwrap();
    assert_eq!(egress.port, PortId(0));
    assert_eq!(egress.gateway, Some(addr("10.0.23.2")));
    assert_eq!(egress.resolve_target(addr("10.0.1.50")), addr("10.0.23.2"));
}

#[test]
fn test_breakage_propagates_through_the_chain() {
    let now = Instant::now();
    let mut a = seeded(&[("10.0.1.1", 24, 0), ("10.0.12.1", 24, 1)]);
    let mut b = seeded(&[("10.0.12.2", 24, 0), ("10.0.23.2", 24, 1)]);
    let mut c = seeded(&[("10.0.23.3", 24, 0), ("10.0.3.1", 24, 1)]);

    exchange(&a, &mut b, addr("10.0.12.1"), PortId(0), now);
    exchange(&b, &mut c, addr("10.0.23.2"), PortId(0), now);

    // The A-B link dies at B. B withdraws everything bound to port 0.
    let withdrawn = mark_link_down(&mut b, PortId(0));
    reconcile_forwarding(&mut b).unwrap();
    assert_eq!(route_status(&b, "10.0.1.0/24"), RouteStatus::Down);
    assert_eq!(route_status(&b, "10.0.12.0/24"), RouteStatus::Down);

    // The withdrawal travels to C as a wire message.
    let wire = DvMessage::breakage(withdrawn).encode_bytes();
    let message = DvMessage::decode(&wire).unwrap();
    assert_eq!(message.command, DvCommand::Breakage);
    apply_withdrawal(&mut c, &message.entries);
    reconcile_forwarding(&mut c).unwrap();

    assert_eq!(route_status(&c, "10.0.1.0/24"), RouteStatus::Down);
    assert_eq!(route_status(&c, "10.0.12.0/24"), RouteStatus::Down);
    assert_eq!(egress_for(&c, addr("10.0.1.50")), None);

    // C's own subnets are unaffected.
    assert_eq!(route_status(&c, "10.0.3.0/24"), RouteStatus::Up);

    // A Down route is omitted from C's next advertisement, which is how
    // the withdrawal reaches routers past C.
    let next = advertisement(&c);
    assert!(
        next.entries
            .iter()
            .all(|e| e.subnet.to_string() != "10.0.1.0/24")
    );
}

#[test]
fn test_expiry_and_recovery() {
    let start = Instant::now();
    let a = seeded(&[("10.0.1.1", 24, 0), ("10.0.12.1", 24, 1)]);
    let mut b = seeded(&[("10.0.12.2", 24, 0), ("10.0.23.2", 24, 1)]);

    exchange(&a, &mut b, addr("10.0.12.1"), PortId(0), start);

    // A goes silent; the route outlives the threshold and expires.
    let timeout = Duration::from_secs(30);
    let expired = expire_stale(&mut b, start + Duration::from_secs(31), timeout);
    reconcile_forwarding(&mut b).unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(route_status(&b, "10.0.1.0/24"), RouteStatus::Down);
    assert_eq!(egress_for(&b, addr("10.0.1.50")), None);

    // Attached subnets never expire.
    assert_eq!(route_status(&b, "10.0.12.0/24"), RouteStatus::Up);

    // A comes back. The Down route revives on the next advertisement and
    // the forwarding entry is active again.
    let revived_at = start + Duration::from_secs(60);
    exchange(&a, &mut b, addr("10.0.12.1"), PortId(0), revived_at);
    assert_eq!(route_status(&b, "10.0.1.0/24"), RouteStatus::Up);
    let fw = b
        .forwarding()
        .iter()
        .find(|f| f.subnet.to_string() == "10.0.1.0/24")
        .unwrap();
    assert_eq!(fw.state, ForwardState::Active);

    // And a sweep right after the revival finds nothing stale.
    let expired = expire_stale(&mut b, revived_at + Duration::from_secs(10), timeout);
    assert!(expired.is_empty());
}

#[test]
fn test_keep_alive_rounds_prevent_expiry() {
    let start = Instant::now();
    let a = seeded(&[("10.0.1.1", 24, 0), ("10.0.12.1", 24, 1)]);
    let mut b = seeded(&[("10.0.12.2", 24, 0), ("10.0.23.2", 24, 1)]);

    let timeout = Duration::from_secs(30);
    exchange(&a, &mut b, addr("10.0.12.1"), PortId(0), start);

    // Periodic re-advertisements keep refreshing the timestamp.
    for round in 1..=4 {
        let at = start + Duration::from_secs(20 * round);
        exchange(&a, &mut b, addr("10.0.12.1"), PortId(0), at);
        let expired = expire_stale(&mut b, at + Duration::from_secs(1), timeout);
        assert!(expired.is_empty(), "round {round} expired unexpectedly");
    }

    // The route never flapped.
    let route = b
        .routes()
        .iter()
        .find(|r| r.subnet.to_string() == "10.0.1.0/24")
        .unwrap();
    assert_eq!(route.hop, 2);
    assert_eq!(route.next_hop, Some(addr("10.0.12.1")));
}
