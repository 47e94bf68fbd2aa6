//! apiscan Engine - Orchestration layer
//!
//! Provides high-level operations over many artifacts: parallel snapshot
//! builds, partitioned parallel comparison, and dependency classification.
//! Every public operation owns its lifecycle logging.

pub mod commands;
