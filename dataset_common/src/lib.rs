//! Shared types and rules for the WLASL frame-dataset preparation pipeline:
//! catalog model + loader, crop geometry, frame naming, run summary.

pub mod catalog;
pub mod crop;
pub mod naming;
pub mod summary;
