//! Tab redirect sink implementations.

mod channel_redirect_sink;

pub use channel_redirect_sink::ChannelRedirectSink;
