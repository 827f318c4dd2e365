//! Redis pub/sub bridge for multi-node deployments.

#[cfg(feature = "redis-pubsub")]
pub mod implementation {
    use parlor_core::error::AppError;

    /// Redis pub/sub bridge for cross-node event relay.
    ///
    /// Publish-only: each node publishes channel events it originates;
    /// the subscribing side re-injects them into the local router.
    #[derive(Debug, Clone)]
    pub struct RedisPubSubBridge {
        /// Redis client (connections are established per publish by
        /// the driver's multiplexed connection).
        client: redis::Client,
    }

    impl RedisPubSubBridge {
        /// Creates a new Redis pub/sub bridge.
        pub fn new(url: &str) -> Result<Self, AppError> {
            let client = redis::Client::open(url)
                .map_err(|e| AppError::cache(format!("Redis pub/sub client failed: {e}")))?;
            Ok(Self { client })
        }

        /// Publishes a serialized event to a channel.
        pub async fn publish(&self, channel: &str, payload: &str) -> Result<(), AppError> {
            let mut conn = self
                .client
                .get_multiplexed_async_connection()
                .await
                .map_err(|e| AppError::cache(format!("Redis connection failed: {e}")))?;

            redis::cmd("PUBLISH")
                .arg(channel)
                .arg(payload)
                .query_async::<i64>(&mut conn)
                .await
                .map_err(|e| AppError::cache(format!("Redis PUBLISH failed: {e}")))?;

            Ok(())
        }
    }
}

#[cfg(not(feature = "redis-pubsub"))]
pub mod implementation {
    use parlor_core::error::AppError;

    /// Stub pub/sub bridge when the redis feature is disabled.
    #[derive(Debug, Clone)]
    pub struct RedisPubSubBridge;

    impl RedisPubSubBridge {
        /// Creates a stub bridge.
        pub fn new(_url: &str) -> Result<Self, AppError> {
            Ok(Self)
        }

        /// No-op publish.
        pub async fn publish(&self, _channel: &str, _payload: &str) -> Result<(), AppError> {
            Ok(())
        }
    }
}

pub use implementation::RedisPubSubBridge;
