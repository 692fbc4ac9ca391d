pub mod decision;
pub mod engine;
pub mod errors;
pub mod guard;
pub mod login;
