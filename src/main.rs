use std::path::Path;

mod output;

use testshift::migrate;

fn main() -> std::process::ExitCode {
    let result = migrate::run(Path::new(migrate::MIGRATION_ROOT));
    std::process::ExitCode::from(output::print_result(result))
}
