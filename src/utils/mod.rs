pub mod api_response;
pub mod password;
pub mod validate;
