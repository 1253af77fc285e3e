//! Path normalization and resolution against a [`Tree`](crate::filesystem::Tree).

mod absolute;
mod resolver;

pub use absolute::{
    HOME_TOKEN, PARENT_TOKEN, ROOT_PATH, file_name, normalize, parent_path, prefixes, segments,
    to_absolute,
};
pub use resolver::{ROOT_NAME, ResolvedNode, is_directory, is_empty, is_file, resolve};
