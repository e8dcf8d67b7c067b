pub mod calendar;
pub mod enrollment;
pub mod members;
pub mod training;
pub mod validation;
