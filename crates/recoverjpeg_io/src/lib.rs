mod mmap_reader;
mod naming;
mod writer;

pub use mmap_reader::MmapReader;
pub use naming::{NameFormat, OutputLayout, DEFAULT_FILE_FORMAT};
pub use writer::FileWriter;
