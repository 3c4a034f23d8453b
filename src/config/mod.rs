mod server;

pub use server::{OPENWEATHER_KEY_ENV, ServerConfig};
