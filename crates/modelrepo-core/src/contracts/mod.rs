//! Wire contracts.
//!
//! These types define the stable request/response contract with explicit
//! serialization control. They decouple domain types from their external
//! representation; the `From` conversions between the two live in
//! `convert`.

mod convert;
mod envelope;
mod system;

pub use envelope::{Envelope, Outcome, Pagination, ResponseCode};
pub use system::{
    GeoRequestDto, GeoResponseDto, LocationRequestDto, LocationResponseDto, SystemPatchDto,
    SystemRequestDto, SystemResponseDto,
};
