// Transport layer: the chat backend consumed through the ChatGateway trait.

pub mod error;
pub mod gateway;
pub mod http;

pub use error::GatewayError;
pub use gateway::{ChatGateway, MessageRecord, SendReceipt, SendRequest};
pub use http::HttpGateway;
