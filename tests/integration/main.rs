//! Integration tests for the public simulator API.

mod api;
mod simulation;
