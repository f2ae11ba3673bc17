pub mod binary_logit;
mod choice_result;
mod select_link;

pub use choice_result::{compute as compute_choice_result, ChoiceResult};
pub use select_link::{SelectLinkQuery, SelectLinkSet};
