// src/probes/mod.rs
mod cache;
mod connection;
mod database;
mod http;
mod redis;
mod resque;
mod sidekiq;

pub use cache::CacheProbe;
pub use database::DatabaseProbe;
pub use http::HttpProbe;
pub use redis::RedisProbe;
pub use resque::ResqueProbe;
pub use sidekiq::SidekiqProbe;
