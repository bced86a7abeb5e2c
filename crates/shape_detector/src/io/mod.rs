pub mod preview;
pub mod snapshot;
pub mod source;

pub use preview::{to_data_uri, encode_jpeg, DATA_URI_PREFIX};
pub use snapshot::{DirectorySnapshots, NoSnapshots};
pub use source::{FileImageSource, HttpImageSource};
