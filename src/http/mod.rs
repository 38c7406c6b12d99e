//! Request and response values.
//!
//! # Data Flow
//! ```text
//! MockRequest chain
//!     → request.rs (RequestDescriptor, resolved into a Target)
//!     → body.rs (payload bytes + inferred content type)
//!     → [dispatcher runs the handler]
//!     → response.rs (buffered MockResponse)
//!       or stream.rs (StreamedResponse + ChunkStream)
//! ```

pub mod body;
pub mod request;
pub mod response;
pub mod stream;

pub use body::RequestBody;
pub use request::{Auth, AuthScheme, RequestDescriptor, RequestSigner, Target};
pub use response::MockResponse;
pub use stream::{ChunkStream, StreamedResponse};
