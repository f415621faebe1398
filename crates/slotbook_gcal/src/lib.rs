// --- File: crates/slotbook_gcal/src/lib.rs ---
pub mod auth;
pub mod booking;
pub mod doc;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod memory;
pub mod routes;
pub mod service;
#[cfg(test)]
mod service_test;
