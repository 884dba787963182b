//! examkit-core: deterministic paper shuffling, exam analytics and leaderboards.
//!
//! This crate holds the pure computations of the exam platform. Callers pass
//! rows already fetched from storage; every function returns fresh in-memory
//! output and keeps no state between calls.

pub mod analytics;
pub mod config;
pub mod dataset;
pub mod error;
pub mod model;
pub mod ranking;
pub mod report;
pub mod rng;
pub mod seed;
pub mod shuffle;

pub use error::ShuffleError;
pub use rng::SeededRng;
pub use seed::{build_question_seed, build_student_exam_seed, hash_string_to_seed};
pub use shuffle::{shuffle_options_json, shuffled_copy};
