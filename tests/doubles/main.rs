//! Integration tests for entity doubles: resolution order, identity
//! caching, references, mutability, context, behaviors and configuration.

mod common;

mod behaviors;
mod config;
mod context;
mod identity_caching;
mod mutability;
mod references;
mod resolution_order;
