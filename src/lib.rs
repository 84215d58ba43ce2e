#![doc(html_root_url = "https://docs.rs/keep-alive-router/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::mutable_key_type)] // `Value` hashes by identity, not by contents.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod clone;
pub mod guards;
pub mod keep_alive;
pub mod loader;
pub mod lock;
pub mod reset_state;
pub mod route;
pub mod routes;
pub mod value;
pub mod web;

pub use clone::{deep_clone, DeepClone};
pub use guards::{GuardConfig, RouterGuards};
pub use keep_alive::KeepAliveRegistry;
pub use loader::{LoaderConfig, PageLoader};
pub use value::Value;
