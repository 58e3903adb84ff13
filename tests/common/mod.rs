#![allow(dead_code)]

pub mod command;
pub mod file;

/// Decode a hex object ID into its 20 raw bytes
pub fn hex_to_raw(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("Invalid hex digit"))
        .collect()
}
