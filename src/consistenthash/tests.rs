//! Consistent Hashing Tests
//!
//! ## Test Scopes
//! - **Placement**: Exact owners for hand-computable and CRC-32 rings, including wrap-around.
//! - **Membership**: Empty rings, single peers and wholesale replacement.
//! - **Churn**: Adding a peer only moves keys onto that peer.

#[cfg(test)]
mod tests {
    use crate::consistenthash::{HashFn, Ring, crc32_hash};
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Hashes decimal strings to their numeric value so positions can be read off directly.
    fn numeric_hash() -> HashFn {
        Arc::new(|data: &[u8]| {
            std::str::from_utf8(data)
                .unwrap()
                .parse::<u32>()
                .unwrap()
        })
    }

    // ============================================================
    // PLACEMENT TESTS
    // ============================================================

    #[test]
    fn test_numeric_ring_placement() {
        let mut ring = Ring::new(3, Some(numeric_hash()));

        // Positions: 2, 4, 6, 12, 14, 16, 22, 24, 26
        ring.add(["6", "4", "2"]);
        assert_eq!(ring.len(), 9);

        let cases = [("2", "2"), ("11", "2"), ("23", "4"), ("27", "2")];
        for (key, peer) in cases {
            assert_eq!(ring.get(key), Some(peer), "key {} should map to {}", key, peer);
        }

        // Adds 8, 18, 28: 27 now lands on 28 instead of wrapping to 2
        ring.add(["8"]);
        assert_eq!(ring.get("27"), Some("8"));
        assert_eq!(ring.get("11"), Some("2"));
    }

    #[test]
    fn test_crc32_two_peer_assignment() {
        // replicas = 3, peers A and B, CRC-32 (IEEE) over "<index><peer>":
        //   B: 105710768, 525743601, 880502322
        //   A: 2254398539, 2672055562, 2909943688
        // Key hashes:
        //   Tom   1167209971 -> 2254398539 (A)
        //   Jack   138954470 -> 525743601  (B)
        //   Sam   3730706168 -> wraps to 105710768 (B)
        //   apple 2838417488 -> 2909943688 (A)
        //   banana  59467727 -> 105710768  (B)
        //   cherry 4189948216 -> wraps to 105710768 (B)
        //   k1    2517541033 -> 2672055562 (A)
        //   k2     252178707 -> 525743601  (B)
        assert_eq!(crc32_hash(b"Tom"), 1167209971);
        assert_eq!(crc32_hash(b"0A"), 2672055562);

        let mut ring = Ring::new(3, None);
        ring.set_peers(["A", "B"]);

        let expected = [
            ("Tom", "A"),
            ("Jack", "B"),
            ("Sam", "B"),
            ("apple", "A"),
            ("banana", "B"),
            ("cherry", "B"),
            ("k1", "A"),
            ("k2", "B"),
        ];
        for (key, peer) in expected {
            assert_eq!(ring.get(key), Some(peer), "key {}", key);
        }
    }

    #[test]
    fn test_placement_is_deterministic() {
        let peers = ["http://10.0.0.1:8001", "http://10.0.0.2:8001", "http://10.0.0.3:8001"];
        let mut first = Ring::default();
        let mut second = Ring::default();
        first.set_peers(peers);
        second.set_peers(peers.iter().rev());

        for i in 0..1000 {
            let key = format!("key-{}", i);
            assert_eq!(first.get(&key), second.get(&key));
        }
    }

    // ============================================================
    // MEMBERSHIP TESTS
    // ============================================================

    #[test]
    fn test_empty_ring_has_no_owner() {
        let ring = Ring::default();
        assert!(ring.is_empty());
        assert_eq!(ring.get("anything"), None);
    }

    #[test]
    fn test_single_peer_owns_everything() {
        let mut ring = Ring::default();
        ring.set_peers(["http://10.0.0.1:8001"]);

        for i in 0..500 {
            assert_eq!(ring.get(&format!("key-{}", i)), Some("http://10.0.0.1:8001"));
        }
    }

    #[test]
    fn test_set_peers_replaces_wholesale() {
        let mut ring = Ring::new(10, None);
        ring.set_peers(["A", "B"]);
        ring.set_peers(["C"]);

        assert_eq!(ring.len(), 10);
        for i in 0..200 {
            assert_eq!(ring.get(&format!("key-{}", i)), Some("C"));
        }
    }

    // ============================================================
    // CHURN TESTS
    // ============================================================

    #[test]
    fn test_adding_peer_moves_bounded_share() {
        let before_peers = [
            "http://10.0.0.1:8001",
            "http://10.0.0.2:8001",
            "http://10.0.0.3:8001",
        ];
        let newcomer = "http://10.0.0.4:8001";

        let mut before = Ring::default();
        before.set_peers(before_peers);
        let mut after = Ring::default();
        after.set_peers(before_peers.iter().copied().chain([newcomer]));

        let total = 10_000;
        let mut moved = 0;
        let mut load: HashMap<String, usize> = HashMap::new();

        for i in 0..total {
            let key = format!("key-{}", i);
            let old_owner = before.get(&key).unwrap();
            let new_owner = after.get(&key).unwrap();
            *load.entry(new_owner.to_string()).or_default() += 1;

            if old_owner != new_owner {
                moved += 1;
                assert_eq!(new_owner, newcomer, "keys may only move to the new peer");
            }
        }

        // Roughly 1/4 of the keyspace should move (sampled ~0.28)
        let share = moved as f64 / total as f64;
        assert!(share > 0.1 && share < 0.4, "moved share was {}", share);

        // Every peer should carry a meaningful share of the keys
        assert_eq!(load.len(), 4);
        assert!(load.values().all(|&count| count > 1500), "load: {:?}", load);
    }
}
