//! Field path composition shared by the analyzer and the transformer.
//!
//! Both stages must agree byte-for-byte on every path, so neither builds one
//! by hand.

/// Object keys are joined with `.`; array element keys already carry their
/// `[i]` brackets and are appended directly.
pub fn compose(parent: Option<&str>, key: &str, parent_is_array: bool) -> String {
    match parent {
        None => key.to_string(),
        Some(parent) if parent_is_array => format!("{parent}{key}"),
        Some(parent) => format!("{parent}.{key}"),
    }
}

/// Key used for the `index`-th element of an array.
pub fn index_key(index: usize) -> String {
    format!("[{index}]")
}
