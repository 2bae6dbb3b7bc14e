pub mod vocab;

pub use vocab::JapaneseVocab;
