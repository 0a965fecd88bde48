//! Auth decorators for [`HttpClient`](crate::fetch::HttpClient) stacks.

mod api_key;
mod url_param;

pub use api_key::ApiKey;
pub use url_param::UrlParam;
