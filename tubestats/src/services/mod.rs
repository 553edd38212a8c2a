pub mod assembler;
pub mod emitter;
pub mod record_set;
pub mod result_index;
pub mod traits;
pub mod youtube_api;

pub use emitter::{CsvEmitter, RecordEmitter};
pub use record_set::RecordSetBuilder;
pub use traits::{ChannelStatsFetcher, Clock, Searcher, SystemClock, VideoStatsFetcher};
pub use youtube_api::YouTubeClient;
