//! # Cinematch
//!
//! A content-based movie recommender: TF-IDF over merged metadata, ranked
//! by cosine similarity.
//!
//! This crate owns everything around the pure engine in `cinematch-core`:
//! configuration, CSV ingestion, the `cine` CLI, and the HTTP server.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────────────────┐   ┌──────────┐
//! │  CSV files  │──▶│ cinematch-core            │──▶│   CLI    │
//! │ movies +    │   │ tags → TF-IDF → cosine    │   │  (cine)  │
//! │ credits     │   │ → ranked recommendations  │   ├──────────┤
//! └─────────────┘   └──────────────────────────┘   │   HTTP   │
//!                                                   └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`loader`] | CSV ingestion and title join |
//! | [`engine`] | Index construction with logging |
//! | [`recommend`] | `recommend` and `terms` commands |
//! | [`stats`] | `stats` command |
//! | [`server`] | HTTP server |

pub mod config;
pub mod engine;
pub mod loader;
pub mod recommend;
pub mod server;
pub mod stats;
