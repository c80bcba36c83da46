//! Request description and normalization.

pub mod builder;
pub mod spec;

pub use builder::{build_request, NormalizedRequest};
pub use spec::{HttpVersion, Method, RequestSpec, RequestTemplate};
