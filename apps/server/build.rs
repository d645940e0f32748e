use std::env::vars;

use dotenvy::dotenv;

fn main() {
    dotenv().ok();

    // Only REACHUP_* settings become compile-time env vars.
    for (k, v) in vars() {
        if k.starts_with("REACHUP_") {
            println!("cargo:rustc-env={k}={v}");
        }
    }
}
