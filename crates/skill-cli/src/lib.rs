//! Skill CLI library - command implementations and utilities.
//!
//! This crate provides the core functionality for the Skill Engine CLI.
//! The binary (`skill`) is a thin wrapper around this library.

pub mod auth;
pub mod commands;
pub mod config;
