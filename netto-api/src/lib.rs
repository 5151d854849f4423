//! The request/response contract the presentation layer computes against.
//!
//! This crate owns the wire-shaped DTOs (amounts in DKK, percentages as
//! plain numbers: `8` means 8 %), converts them into the engine's types at
//! the boundary, and assembles the itemized responses. There is no transport
//! here; the functions in [`service`] are the endpoints' bodies.

pub mod error;
pub mod requests;
pub mod responses;
pub mod service;

pub use error::ComputeError;
pub use requests::{
    CurveRequest, EducationRequest, FullTimeRequest, HoursCurveRequest, PartTimeRequest,
    PayExtras, StudentHoursCurveRequest, StudentRequest, WorkIncomeRequest,
};
pub use responses::{MetaConstants, MetaResponse, MunicipalityRates, StudentResponse, TaxResponse};
pub use service::Service;
