pub(crate) mod client;
pub(crate) mod http;
pub(crate) mod local;
