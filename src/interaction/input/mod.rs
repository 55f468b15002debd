pub mod input_interaction;

pub use input_interaction::{InputInteractionPlugin, PointerInput};
