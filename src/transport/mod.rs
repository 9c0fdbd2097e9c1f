//! HTTP transport layer for the Gemini API client.

mod http;
mod error;
mod reqwest;
pub mod endpoints;
mod request;
mod response;

pub use http::{
    ChunkedStream, HttpMethod, HttpRequest, HttpResponse, HttpTransport, StreamingResponse,
    TransportInfo,
};
pub use error::TransportError;
pub use self::reqwest::ReqwestTransport;
pub use endpoints::GenerateMethod;
pub use request::RequestBuilder;
pub use response::ResponseParser;
