pub mod health;
pub mod create;
pub mod retrieve;
pub mod unsupported;

pub use health::health_handler;
pub use create::create_handler;
pub use retrieve::retrieve_handler;
pub use unsupported::method_not_supported_handler;
