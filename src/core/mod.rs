pub mod block_height;
pub mod errors;

pub use block_height::BlockHeight;
pub use errors::CheckError;
