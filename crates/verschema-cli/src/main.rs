use anyhow::Result;
use verschema_cli::VerschemaCli;

fn main() -> Result<()> {
    VerschemaCli::new().parse_and_run()
}
