#![deny(
    clippy::mutable_key_type,
    clippy::map_entry,
    clippy::boxed_local,
    clippy::let_unit_value,
    clippy::redundant_allocation,
    clippy::bool_comparison,
    clippy::bind_instead_of_map,
    clippy::vec_box,
    clippy::while_let_loop,
    clippy::useless_asref,
    clippy::repeat_once,
    clippy::deref_addrof,
    clippy::suspicious_map,
    clippy::single_char_pattern,
    clippy::for_kv_map,
    clippy::let_and_return,
    clippy::iter_nth,
    clippy::iter_cloned_collect,
    clippy::match_result_ok,
    clippy::cmp_owned,
    clippy::cmp_null,
    clippy::op_ref
)]

pub mod chokepoints;
pub mod config;
pub mod connectivity;
pub mod coord_conversion;
pub mod dead_ends;
pub mod error;
pub mod graph;
pub mod graph_formats;
pub mod input;
pub mod lane_builder;
pub mod lane_split;
pub mod node_registry;
pub mod pipeline;
pub mod ports;

#[cfg(test)]
mod pipeline_test;

pub use config::GraphConfig;
pub use error::GraphBuildError;
pub use pipeline::{AssembledGraph, assemble_graph};
