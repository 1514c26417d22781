
mod gateway;
mod store;
