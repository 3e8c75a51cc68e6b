pub mod analyze_request;
pub mod analyze_response;
pub mod analyze_route;
