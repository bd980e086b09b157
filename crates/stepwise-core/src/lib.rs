//! Core primitives for Stepwise.
//!
//! This crate provides the foundational pieces the form engine is built on:
//!
//! - **Signal/Slot System**: Type-safe change notification
//! - **Form Data**: The shared answer sheet and its change signal
//! - **Render Tree**: Step content nodes and the capability trait visitors use
//! - **Errors**: The error type for configuration and data surfaces
//!
//! # Signal/Slot Example
//!
//! ```
//! use stepwise_core::Signal;
//!
//! let completed = Signal::<()>::new();
//! completed.connect(|_| println!("form complete"));
//! completed.emit(());
//! ```
//!
//! # Form Data Example
//!
//! ```
//! use stepwise_core::FormDataStore;
//!
//! let store = FormDataStore::new();
//! store.changed.connect(|change| println!("{} changed", change.key));
//! store.set("wantsExtra", true);
//! assert!(store.snapshot().is_true("wantsExtra"));
//! ```

mod error;
pub mod form_data;
pub mod logging;
pub mod node;
pub mod signal;

pub use error::{Error, Result};
pub use form_data::{FormData, FormDataChange, FormDataStore};
pub use node::{Element, EventHandlers, FieldEvent, FieldEventKind, Handler, Node, RenderNode};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
