mod conversions;
mod types;

pub use types::{
    CreateFormRequest, FormResponse, FormSubmissionResponse, SubmissionListParams,
    SubmitFormRequest, UpdateFormRequest,
};
