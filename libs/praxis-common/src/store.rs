// Collaborator boundaries - the judge itself is stateless.
//
// Persistent storage of problems, users and submissions lives outside
// this repository; these traits define only the surface the judge's
// serving layer consumes.

use uuid::Uuid;

use crate::types::{Problem, SubmissionRecord};

/// Read access to the problem catalog.
pub trait ProblemStore: Send + Sync {
    fn get(&self, id: &str) -> Option<Problem>;
}

/// Write access for accepted submissions. Only the summary (status,
/// runtime) travels with the record; verdict details are returned to the
/// caller and discarded.
pub trait SubmissionStore: Send + Sync {
    fn persist(&self, record: SubmissionRecord) -> Uuid;
}
