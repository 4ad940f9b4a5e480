//! Domain types, ports and services

pub mod communication;
