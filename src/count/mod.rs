pub mod aggregate;
pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod limiter;
pub mod partition;
pub mod worker;


pub use self::aggregate::*;
pub use self::config::*;
pub use self::core::*;
pub use self::error::*;
pub use self::events::*;
pub use self::limiter::*;
pub use self::partition::*;
pub use self::worker::*;
