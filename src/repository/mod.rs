//! Model repository collaborators.
//!
//! URL construction, raw downloads, and attachment lookups against the model
//! repository's HTTP API. Every network failure here is reported as absence;
//! deciding whether absence is fatal is left to the resolvers.

pub mod attachment;
pub mod fetch;
pub mod urls;

pub use attachment::{Attachment, AttachmentClient, HttpAttachmentClient, Tag};
pub use fetch::{build_http_client, HttpFetcher, RemoteFetcher};
pub use urls::RepositoryUrls;
