//! Cache adapters.

mod redis_invalidator;

pub use redis_invalidator::RedisCacheInvalidator;
