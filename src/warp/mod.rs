//! Chunk warping: kernel configuration, scan driver and array front end.

pub mod array;
pub mod chunk;
mod engine;
pub mod kernel;
pub mod progress;

pub use array::warp_array;
pub use chunk::{DestChunk, SourceChunk};
pub use kernel::WarpKernel;
pub use progress::{NoProgress, Progress, ProgressRange};
