pub mod labels;
pub mod authors;

pub use labels::{is_valid_label, tag_nicename};
pub use authors::{author_id, author_login, split_name};
