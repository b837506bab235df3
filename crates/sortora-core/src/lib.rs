pub mod config;
pub mod logging;

pub mod compiler;
pub mod form_fill;
pub mod http;
pub mod intent;
pub mod parse_client;
pub mod popup;
pub mod relay;
