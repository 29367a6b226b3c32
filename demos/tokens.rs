//! Prints tokens for the current time and row 42 in every prefix/suffix combination.

use randomish::generate_token;
use std::time::SystemTime;

fn main() {
    let t = SystemTime::now();
    let row_id = 42;

    for (label, prefix, suffix) in [
        ("bare", "", ""),
        ("prefix", "img_", ""),
        ("suffix", "", "_2026"),
        ("both", "img_", "_2026"),
    ] {
        println!("{:>6}: {}", label, generate_token(t, row_id, prefix, suffix));
    }
}
