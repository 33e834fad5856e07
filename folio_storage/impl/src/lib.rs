pub use file::{FileStorageService, FileStorageServiceConfig};
pub use memory::MemoryStorageService;

mod file;
mod memory;
