//! # Core Application Logic
//!
//! The study tool's data and rules. Nothing here knows about the terminal.
//!
//! ```text
//!     ┌──────────────────────────┐
//!     │          CORE            │
//!     │  (this module)           │
//!     │                          │
//!     │  • deck   (card records) │
//!     │  • study  (session)      │
//!     │  • config (settings)     │
//!     └────────────┬─────────────┘
//!                  │ in-memory Decks, StudySettings
//!                  ▼
//!     ┌──────────────────────────┐
//!     │   TUI scene framework    │
//!     └──────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`deck`]: `Deck`/`FlashCard` and the `.deck` file format
//! - [`study`]: `StudySession`, ordering cards and tallying ratings
//! - [`config`]: config file, `StudySettings`, override resolution

pub mod config;
pub mod deck;
pub mod study;
