pub mod barrier;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod gateway;
pub mod ingress;
pub mod logging;
pub mod notifier;
pub mod store;
