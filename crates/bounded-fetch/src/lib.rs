//! Bounded HTTP fetcher
//!
//! Issues one request per call and fails it if the response, body included,
//! does not arrive in time.
//! Dropping the request future on timeout cancels the in-flight connection.
//! There is no retry at this layer.
//!
//! # Example
//!
//! ```no_run
//! use bounded_fetch::{BoundedFetcher, FetchOptions};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), bounded_fetch::FetchError> {
//! let fetcher = BoundedFetcher::new();
//! let response = fetcher
//!     .fetch(
//!         "https://www.reddit.com/r/gaming/hot.json?limit=8",
//!         &FetchOptions::default(),
//!         Duration::from_millis(9000),
//!     )
//!     .await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

mod error;
mod fetcher;

pub use error::{FetchError, Result};
pub use fetcher::{BoundedFetcher, FetchOptions, DEFAULT_TIMEOUT};
