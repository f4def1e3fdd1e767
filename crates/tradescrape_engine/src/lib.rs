//! Tradescrape engine: decoding, the markup event source and the page driver.
mod decode;
mod engine;
mod error;
mod events;
mod settings;

pub use decode::{decode_page, DecodeError, DecodedPage, SiteEncoding};
pub use engine::{parse_page, run_program};
pub use error::EngineError;
pub use events::{collect_events, walk_events};
pub use settings::{load_settings, EngineSettings};
