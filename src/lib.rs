#![doc = "The `authforge` library crate."]
#![doc = ""]
#![doc = "Contains the credential store, token codec, password hashing, reset-code"]
#![doc = "flows, HTTP routes and error handling for the AuthForge service."]
#![doc = "The binary (`main.rs`) wires these together and runs the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod mail;
pub mod models;
pub mod routes;
