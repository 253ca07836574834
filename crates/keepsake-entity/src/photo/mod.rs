//! Photos and their comment threads.

pub mod comment;
pub mod model;

pub use comment::{Comment, CommentView, CreateComment};
pub use model::{CreatePhoto, Photo};
