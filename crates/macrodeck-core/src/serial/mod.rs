mod link;

pub use link::{LineCallback, SerialLink, SerialSettings};
