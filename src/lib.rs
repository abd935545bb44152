//! Rotator - rotate credentials and publish them to the systems that use them.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── plan          # Print the rotation plan
//! │   ├── rotate        # Confirm and run a rotation
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # rotator.toml parsing and job construction
//!     ├── context       # Cancellation and deadline
//!     ├── rotator       # Orchestrator
//!     ├── retry         # Retry with jitter for network sinks
//!     ├── source/       # Where credentials come from
//!     │   ├── aws_iam   # Two-key IAM access key rotation
//!     │   ├── env       # Environment variable
//!     │   └── dummy     # Random value
//!     └── sink/         # Where credentials go
//!         ├── circleci, travis, github, heroku
//!         ├── aws_param, aws_secrets
//!         └── buffer, stdout
//! ```
//!
//! # Example
//!
//! ```
//! use rotator::core::sink::BufferSink;
//! use rotator::core::source::Dummy;
//! use rotator::core::{rotate_secrets, Context, KeyToName, RotationJob};
//!
//! let mut key_to_name = KeyToName::new();
//! key_to_name.insert("secret".to_string(), "API_TOKEN".to_string());
//! let sink = BufferSink::new(key_to_name);
//! let buffer = sink.buffer();
//!
//! let jobs = vec![RotationJob::new("api-token", Box::new(Dummy)).with_sink(Box::new(sink))];
//! rotate_secrets(&Context::new(), &jobs).unwrap();
//! assert!(buffer.get("API_TOKEN").is_some());
//! ```

pub mod cli;
pub mod core;
pub mod error;
