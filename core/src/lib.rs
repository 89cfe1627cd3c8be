//! Monte-Carlo simulation of a martingale betting strategy on a
//! fixed-odds dice game.
//!
//! A batch runs many independent trials. Each trial bets from a fresh
//! copy of the starting account until it can no longer cover the
//! current bet, and the batch is summarised as average rounds to ruin
//! plus mean and median balance curves.

pub mod account;
pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod odds;
pub mod results;
pub mod rng;
pub mod strategy;
pub mod types;
