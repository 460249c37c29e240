pub mod find;
pub mod generate;
pub mod repos;

use crate::error::{CliError, Result};
use std::io::Read;
use std::path::PathBuf;

/// Reads the request JSON from a file path, or from stdin when the
/// argument is `-`.
pub fn read_request(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        let path = PathBuf::from(arg);
        std::fs::read_to_string(&path).map_err(|source| CliError::RequestRead { path, source })
    }
}
