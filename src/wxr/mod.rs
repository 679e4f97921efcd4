pub mod extract;
pub mod write;

pub use extract::{find_meta, meta_pairs, MetaPair};
pub use write::QuizDocument;
