pub mod compose;
pub mod context;
pub mod lookup;
pub mod numeric;
pub mod pipeline;
pub mod render;
pub mod shape;
