//! Encode command - print credentials for use with --credentials.

use anyhow::Result;

/// Print the encoded form of a `user:password` string.
pub fn run(plain: &str) -> Result<()> {
    println!("{}", flowinvoke_client::auth::encode(plain));
    Ok(())
}
