//! Exception resolvers.

pub mod response_status;
pub mod simple_mapping;

pub use response_status::ResponseStatusExceptionResolver;
pub use simple_mapping::SimpleMappingExceptionResolver;
