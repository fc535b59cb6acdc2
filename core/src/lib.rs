pub mod corpus;
pub mod encoder;
pub mod persist;
pub mod sparse;
pub mod tokenizer;

pub use corpus::Document;
pub use encoder::{Bm25Encoder, Bm25Params, EncoderError, TermId};
pub use sparse::SparseVector;
pub use tokenizer::{Tokenizer, TokenizerConfig};
