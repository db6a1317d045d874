//! Analysis backends
//!
//! Text polarity estimators and the facial-emotion service client.

pub mod emotion_client;
pub mod lexicon_polarity;
pub mod valence_polarity;

pub use emotion_client::HttpEmotionClassifier;
pub use lexicon_polarity::LexiconPolarity;
pub use valence_polarity::ValencePolarity;
