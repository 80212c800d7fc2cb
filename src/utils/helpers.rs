// Helper functions shared by the model builder, the renderers and the artifact sink.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Creates a directory if it doesn't exist
pub fn ensure_directory_exists<P: AsRef<Path>>(path: P) -> io::Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Gets a relative path between two absolute paths
pub fn get_relative_path<P: AsRef<Path>, B: AsRef<Path>>(path: P, base: B) -> PathBuf {
    let path = path.as_ref();
    let base = base.as_ref();

    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Path relative to the current working directory, for log lines.
pub fn display_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    match std::env::current_dir() {
        Ok(cwd) if path.is_absolute() => get_relative_path(path, cwd).display().to_string(),
        _ => path.display().to_string(),
    }
}

/// Writes content to a file, creating parent directories if needed.
///
/// The file handle is dropped before returning, so callers writing a batch
/// never hold two destinations open at once.
pub fn write_to_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, content: C) -> io::Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory_exists(parent)?;
        }
    }

    let mut file = File::create(path)?;
    file.write_all(content.as_ref())?;
    file.flush()?;
    Ok(())
}

/// Converts CamelCase to snake_case
pub fn camel_to_snake(camel: &str) -> String {
    let mut snake = String::new();

    for c in camel.chars() {
        if c.is_uppercase() {
            if !snake.is_empty() && !snake.ends_with('_') {
                snake.push('_');
            }
            snake.extend(c.to_lowercase());
        } else {
            snake.push(c);
        }
    }

    snake
}

/// Converts snake_case (or space separated words) to PascalCase
pub fn to_pascal_case(snake: &str) -> String {
    let mut camel = String::new();
    let mut capitalize_next = true;

    for c in snake.chars() {
        if c == '_' || c == ' ' || c == '-' {
            capitalize_next = true;
        } else if capitalize_next {
            camel.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            camel.push(c);
        }
    }

    camel
}

/// Uppercases the first character and leaves the rest untouched.
pub fn first_to_upper(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Keeps alphabetic characters only.
pub fn letters_only(input: &str) -> String {
    input.chars().filter(|c| c.is_alphabetic()).collect()
}

/// Drops a single trailing `s`.
pub fn singularize(word: &str) -> &str {
    word.strip_suffix('s').unwrap_or(word)
}

/// Appends an `s` unless the word already ends in one.
pub fn pluralize(word: &str) -> String {
    if word.ends_with('s') {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
