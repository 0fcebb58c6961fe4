//! dct-core - Core library for DCT bookings
//!
//! This crate contains the booking model, the local cache and remote store
//! backends, the connectivity monitor and the synchronization manager that
//! every DCT front end (calendar, list, search, CLI) reads bookings through.

pub mod cache;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod models;
pub mod remote;
pub mod search;
pub mod state;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{Booking, BookingId, NewBooking};
