//! Data models for DCT

mod booking;

pub use booking::{
    parse_wall_time, validate_time_span, Booking, BookingId, BookingPatch, NewBooking,
};
