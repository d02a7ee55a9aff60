mod catalog;
mod check;
mod client;
mod pacing;
mod poller;
mod validator;

pub use check::WebApiProbe;
pub use client::WebApiClient;
