//! Audiotrack binary storage

mod fs;
mod memory;

pub use fs::FsAudioFileStore;
pub use memory::InMemoryAudioFileStore;
