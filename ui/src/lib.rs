#![warn(clippy::all, rust_2018_idioms)]
//! Desktop front end of the roster console.
//!
//! Renders the users administration screen. All state lives in the
//! [`roster_states::StateCtx`] owned by [`state::State`]; widgets read it and
//! push changes back through `roster_business::users::workflow`.

pub mod app;
pub mod state;
pub mod utils;
pub mod widgets;

pub use app::RosterApp;
