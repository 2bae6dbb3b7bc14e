pub mod types;

pub use types::{
    ApiResponse, AppEvent, GenerateRequest, ResponseBody, VocabItem, VocabList, VocabPart, wire,
};
