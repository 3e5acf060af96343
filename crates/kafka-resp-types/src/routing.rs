//! Routing keys and ack records.
//!
//! Producers address a topic through a list key. The proxy hashes whatever
//! follows the topic name to pick a partition, so two messages produced with
//! the same key always land in the same partition.

/// Prefix shared by every topic-bound list key.
pub const TOPIC_PREFIX: &str = "topics";

/// Well-known list key that receives ack records.
pub const ACK_CHANNEL: &str = "acks";

/// Build the routing key for a produce request.
///
/// Without a key the proxy chooses the partition itself.
pub fn routing_key(topic: &str, key: Option<&str>) -> String {
    match key {
        Some(key) => format!("{TOPIC_PREFIX}:{topic}:{key}"),
        None => topic_queue(topic),
    }
}

/// List key a consumer bound to `topic` blocks on.
pub fn topic_queue(topic: &str) -> String {
    format!("{TOPIC_PREFIX}:{topic}")
}

/// Encode the ack record for a delivered message.
pub fn ack_record(topic: &str, partition: u32, offset: u64) -> String {
    format!("{topic}:{partition}:{offset}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_key_without_key() {
        assert_eq!(routing_key("orders", None), "topics:orders");
    }

    #[test]
    fn test_routing_key_with_key() {
        assert_eq!(routing_key("orders", Some("user_001")), "topics:orders:user_001");
    }

    #[test]
    fn test_routing_key_is_deterministic() {
        let pairs = [
            ("orders", Some("a")),
            ("orders", Some("b")),
            ("payments", None),
            ("payments", Some("")),
        ];

        for (topic, key) in pairs {
            assert_eq!(routing_key(topic, key), routing_key(topic, key));
        }

        // Distinct keys on the same topic must not collide
        assert_ne!(routing_key("orders", Some("a")), routing_key("orders", Some("b")));
    }

    #[test]
    fn test_routing_key_without_key_has_no_suffix() {
        let key = routing_key("orders", None);
        assert_eq!(key.matches(':').count(), 1);
        assert!(key.ends_with("orders"));
    }

    #[test]
    fn test_topic_queue_matches_unkeyed_routing_key() {
        assert_eq!(topic_queue("events"), routing_key("events", None));
    }

    #[test]
    fn test_ack_record_format() {
        assert_eq!(ack_record("orders", 3, 42), "orders:3:42");
        assert_eq!(ack_record("orders", 0, 0), "orders:0:0");
    }
}
