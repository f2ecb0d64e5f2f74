pub mod counter;
pub mod dashboard;
pub mod message;
pub mod pagination;
pub mod project;
pub mod service_request;
pub mod service_type;
pub mod user;
