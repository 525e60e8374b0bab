pub mod loaders;
pub mod response;
pub mod result_row;
pub mod work_item;

pub use loaders::load_work_items;
pub use response::{ConversationContent, GenerateContentResponse};
pub use result_row::{ResultRow, HEADER, NO_SELECTED_OPTION};
pub use work_item::{extract_grade, AnswerOption, ConversationContext, ItemContent, WorkItem};
