#[cfg(feature = "fastembed")]
mod fast_embed;
mod openai;

#[cfg(feature = "fastembed")]
pub use fast_embed::FastEmbedEmbedding;
pub use openai::OpenAIEmbedding;
