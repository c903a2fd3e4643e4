pub mod api;
pub mod attack;
pub mod config;
pub mod consts;
pub mod core_types;
pub mod error;
pub mod hold;
pub mod keyspace;
pub mod machine;
pub mod optimizer;
pub mod scorer;
// cmd and reports are modules of the binary crate (main.rs).
