pub mod error_details;
pub mod request_id;

pub use error_details::{redact_error_details, ErrorDetailPolicy};
pub use request_id::{request_id_middleware, RequestId};
