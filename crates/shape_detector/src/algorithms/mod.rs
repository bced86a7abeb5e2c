pub mod brightness;
pub mod grayscale;
pub mod contrast;
pub mod compose;
pub mod classification;

pub use brightness::*;
pub use grayscale::*;
pub use contrast::*;
pub use compose::*;
pub use classification::*;
