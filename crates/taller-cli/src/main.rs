#![forbid(unsafe_code)]

fn main() -> std::process::ExitCode {
    taller_cli::main_entry()
}
