#![no_std]

pub mod config;
pub mod sampler;
pub mod strip;
