//! Operator scripts for deploying, configuring and administering the
//! protocol's smart contracts across development, testnet and mainnet.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod commands;
pub mod constants;
pub mod context;
pub mod contracts;
pub mod credentials;
pub mod csv_input;
pub mod errors;
pub mod multisig;
pub mod network;
pub mod preconditions;
pub mod registry;
mod solidity;
pub mod transactions;
pub mod utils;
