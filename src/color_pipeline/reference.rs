//! Reference model module
//!
//! Real-valued evaluation of the canonical equations, used as ground truth.

mod reference_model;

pub use reference_model::ReferenceModel;
