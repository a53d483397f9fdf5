// File Operations for RSA Encryption/Decryption
// Opening the plaintext and ciphertext files, with errors that name the path

use std::fs::File;
use std::path::Path;

use crate::error::{Rsa64Error, Rsa64Result};

/// Open a file for reading
pub fn open_input(path: &Path) -> Rsa64Result<File> {
    File::open(path).map_err(|source| Rsa64Error::OpenInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Create (or truncate) a file for writing
pub fn create_output(path: &Path) -> Rsa64Result<File> {
    File::create(path).map_err(|source| Rsa64Error::OpenOutput {
        path: path.to_path_buf(),
        source,
    })
}

/// Size in bytes of an already opened file
pub fn get_file_size(file: &File) -> Rsa64Result<u64> {
    Ok(file.metadata()?.len())
}

/// Format file size for display
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
