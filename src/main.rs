use std::process;

fn main() {
    process::exit(toolkit_program::cli::run());
}
