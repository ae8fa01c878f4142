mod attributor;
mod base;
mod error;
mod query;
mod serp;
mod source;
mod wikipedia;

pub use attributor::{failure_record, Attributor};
pub use base::{AbstractLookup, SearchHit, WebSearch};
pub use error::RetrievalError;
pub use query::{clean_title, format_query, CREDIBLE_DOMAINS, WIKIPEDIA_DOMAIN};
pub use serp::{SerpApiClient, SERP_BASE_URL};
pub use source::AttributionSource;
pub use wikipedia::{WikipediaClient, WIKIPEDIA_BASE_URL};
