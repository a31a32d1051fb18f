// src/lib.rs

//! Client for a project-generation service: submit a brief, track the
//! request, render the returned plan, fetch the generated archive.

pub mod artifact;
pub mod config;
pub mod controller;
pub mod decoder;
pub mod error;
pub mod presentation;
pub mod protocol;
pub mod resolver;
pub mod transport;
pub mod validation;

pub use config::ClientConfig;
pub use controller::{Admission, SubmissionController};
pub use error::ClientError;
pub use protocol::{ProjectResult, ResponseShape, SubmissionState, Task};
pub use validation::Brief;
