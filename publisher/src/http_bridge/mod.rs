pub mod bridge;

pub use bridge::HttpBridge;
