mod inputs;
mod repositories;

pub use inputs::{CreateFormInput, SubmissionListQuery, SubmitFormInput, UpdateFormInput};
pub use repositories::{FormRepository, FormSubmissionRepository};
