pub mod report_response;
pub mod report_route;
