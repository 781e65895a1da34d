pub mod builders;
pub mod bus;
pub mod models;
pub mod payload;
pub mod provisioner;
pub mod session;
