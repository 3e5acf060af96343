//! Producer and consumer configuration.

use kafka_resp_transport::ConnectionOptions;
use kafka_resp_types::TOPIC_PREFIX;

use crate::error::{Error, Result};

/// Configuration for [`crate::Producer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProducerConfig {
    pub connection: ConnectionOptions,
}

/// Configuration for [`crate::Consumer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsumerConfig {
    pub connection: ConnectionOptions,
    /// Topic to consume from (required)
    pub topic: String,
    /// Consumer group (required)
    pub group: String,
    /// Consumer id within the group, a random UUID when unset or blank
    pub id: Option<String>,
}

impl ConsumerConfig {
    /// Check required options.
    ///
    /// The topic may not contain `:`, since deliveries are tagged
    /// `topics:<topic>:<partition>` and a colon would make the tag ambiguous.
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(Error::Config("consumer requires a topic".to_string()));
        }
        if self.topic.contains(':') {
            return Err(Error::Config(format!(
                "topic {:?} must not contain ':' (queue is {TOPIC_PREFIX}:<topic>)",
                self.topic
            )));
        }
        if self.group.trim().is_empty() {
            return Err(Error::Config("consumer requires a group".to_string()));
        }
        Ok(())
    }

    /// Consumer name announced to the proxy: `<group>:<id>`.
    pub fn consumer_name(&self) -> String {
        let id = self
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_string);
        format!("{}:{}", self.group, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(topic: &str, group: &str) -> ConsumerConfig {
        ConsumerConfig {
            topic: topic.to_string(),
            group: group.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_requires_topic() {
        let err = config("", "billing").validate().unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("topic")));
    }

    #[test]
    fn test_validate_rejects_colon_in_topic() {
        let err = config("orders:eu", "billing").validate().unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("orders:eu")));

        config("orders-eu", "billing").validate().unwrap();
    }

    #[test]
    fn test_validate_requires_group() {
        let err = config("orders", "  ").validate().unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("group")));
    }

    #[test]
    fn test_consumer_name_with_explicit_id() {
        let config = ConsumerConfig {
            id: Some("worker-1".to_string()),
            ..config("orders", "billing")
        };
        assert_eq!(config.consumer_name(), "billing:worker-1");
    }

    #[test]
    fn test_consumer_name_random_id() {
        let config = config("orders", "billing");
        let first = config.consumer_name();
        let second = config.consumer_name();

        assert!(first.starts_with("billing:"));
        let id = first.strip_prefix("billing:").unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
        assert_ne!(first, second);
    }

    #[test]
    fn test_consumer_name_blank_id_is_random() {
        for blank in ["", "   "] {
            let config = ConsumerConfig {
                id: Some(blank.to_string()),
                ..config("orders", "billing")
            };
            let name = config.consumer_name();

            let id = name.strip_prefix("billing:").unwrap();
            assert!(uuid::Uuid::parse_str(id).is_ok(), "{name}");
        }
    }
}
