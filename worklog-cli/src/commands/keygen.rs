//! Encryption key generation

use clap::Parser;
use worklog_server::crypto::generate_key;

/// Arguments for the keygen command
#[derive(Parser, Debug)]
pub struct KeygenArgs {
    /// Print `ENCRYPTION_KEY=<key>` for pasting into a .env file
    #[arg(long)]
    pub env: bool,
}

/// Print a fresh 256-bit key, base64 encoded.
pub fn run_keygen(args: KeygenArgs) {
    let key = generate_key();
    if args.env {
        println!("ENCRYPTION_KEY={}", key);
    } else {
        println!("{}", key);
    }
}
