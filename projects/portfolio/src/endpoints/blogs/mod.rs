pub mod read_index;
pub mod read_post;
pub mod save;
