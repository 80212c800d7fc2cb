pub mod helpers;

pub use helpers::{
    camel_to_snake,
    display_path,
    ensure_directory_exists,
    first_to_upper,
    get_relative_path,
    letters_only,
    pluralize,
    singularize,
    to_pascal_case,
    write_to_file,
};
