pub mod controller;
pub mod form;
pub mod step;

pub use controller::{Candidate, CandidatePair, WizardController, SAMPLE_A, SAMPLE_B};
pub use form::{FormAttributes, FormUpdate, Gender};
pub use step::Step;
