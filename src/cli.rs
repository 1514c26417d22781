use std::{env, path::PathBuf};

use anyhow::{Result, anyhow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: PathBuf,
    pub probe: bool,
}

pub fn options_from_env() -> Result<CliOptions> {
    parse_args(env::args().skip(1))
}

pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliOptions> {
    let mut args = args.into_iter();
    let mut config_path = None;
    let mut probe = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                config_path = Some(PathBuf::from(value));
            }
            "--probe" => {
                probe = true;
            }
            other => {
                return Err(anyhow!(
                    "unknown argument: {other}. usage: harvestd [--config <path>] [--probe]"
                ));
            }
        }
    }

    Ok(CliOptions {
        config_path: config_path.unwrap_or_else(|| PathBuf::from("./harvestd.jsonc")),
        probe,
    })
}
