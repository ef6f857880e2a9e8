// error_chain macro can recurse deeply
#![recursion_limit = "1024"]

#[macro_use]
extern crate error_chain;
#[macro_use(lazy_static)]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod args;
pub mod commands;
pub mod constants;
pub mod divergence;
pub mod errors;
pub mod generator;
pub mod indel;
pub mod model;
pub mod profile;
pub mod progress;
pub mod table;
pub mod target;
