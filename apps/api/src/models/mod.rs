pub mod application;
pub mod candidate;
pub mod job;

pub use application::{
    Application, ApplicationPatch, ApplicationRow, ApplicationStatus, ApplicationWithJob,
    NewApplication,
};
pub use candidate::{Candidate, CandidateWithApplication, NewCandidate};
pub use job::{Job, NewJob};
