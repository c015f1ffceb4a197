//! mig3 CLI entry point.

fn main() {
    std::process::exit(mig3_cli::run());
}
