//! Enrollment numbers (matrículas): issuance, the available pool, and the guard
//! that consumes pool entries once a profile carries them.

pub mod domain;
pub mod guard;
pub mod issuance;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{EnrollmentId, EnrollmentPrefix, EnrollmentRecord};
pub use guard::{AssignmentCheck, AssignmentError};
pub use issuance::{next_identifier, next_sequence, sequence_number, IssuanceError};
pub use repository::EnrollmentRepository;
pub use router::enrollment_router;
pub use service::{AdministratorProfileEdit, EnrollmentService, EnrollmentServiceError};
