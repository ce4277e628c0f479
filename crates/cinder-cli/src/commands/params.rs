//! Parameter listing command.

use clap::Args;
use cinder_engine::{ParamId, ParamSnapshot};

/// Arguments for `cinder params`.
#[derive(Args)]
pub struct ParamsArgs {
    /// Show a single parameter by id
    #[arg(value_name = "NAME")]
    name: Option<String>,

    /// Print the default state as JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// Run the params command.
pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    if args.json {
        println!("{}", ParamSnapshot::default().to_json()?);
        return Ok(());
    }

    if let Some(name) = &args.name {
        let Some(id) = ParamId::from_string_id(name) else {
            anyhow::bail!("unknown parameter '{name}'");
        };
        print_row(id);
        return Ok(());
    }

    println!("Parameters");
    println!("{:<10} {:<10} {:>8} {:>8} {:>8}", "id", "name", "min", "max", "default");
    for id in ParamId::ALL {
        print_row(id);
    }
    Ok(())
}

fn print_row(id: ParamId) {
    let d = id.descriptor();
    println!(
        "{:<10} {:<10} {:>8.2} {:>8.2} {:>8.2}",
        d.string_id, d.name, d.min, d.max, d.default
    );
}
