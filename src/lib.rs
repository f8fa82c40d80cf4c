/// Amora - dating app backend
///
/// Member flows (sign-up, onboarding, discovery, matches, chat, safety,
/// premium) and the admin console (users, verification, moderation, premium,
/// platform settings, activity log) over a single JSON document store.

pub mod activity;
pub mod admin;
pub mod api;
pub mod auth;
pub mod billing;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod matching;
pub mod member;
pub mod server;
pub mod store;
pub mod validation;

pub use context::AppContext;
pub use error::{AmoraError, AmoraResult};
