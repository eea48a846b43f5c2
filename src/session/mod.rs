//! Wizard sessions
//!
//! A session is one user's typed wizard state. It changes only by applying
//! `Command`s through a `Wizard`, which returns the new state together with
//! the `DomainEvent`s the command caused.

pub mod command;
pub mod event;
pub mod state;
pub mod wizard;

pub use command::{Command, NewProject, TermsKind};
pub use event::DomainEvent;
pub use state::SessionState;
pub use wizard::{Applied, Wizard, ORIGIN_MARKER};
