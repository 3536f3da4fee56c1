//! # govsim - Devnet Account Pool & Governance-Voting Simulation
//!
//! Builds the deterministic account pool of a local test network from a
//! deployer key, a pre-generated account corpus and governance keys. It then
//! exposes that pool through a fixed set of network profiles and drives a
//! governance-voting round on the in-process chain.

pub mod accounts;
pub mod cli;
pub mod config;
pub mod constants;
pub mod devnet;
pub mod errors;
pub mod network;
pub mod output;
pub mod simulation;
