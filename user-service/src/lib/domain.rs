pub mod authz;
pub mod user;
