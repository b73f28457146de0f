//! # rez-bill
//!
//! Prices a cart file and prints the itemized bill as JSON.
//!
//! ## Usage
//! ```bash
//! # Price a cart exactly as the checkout screen would display it
//! cargo run -p rez-checkout --bin rez-bill -- cart.json
//!
//! # Enforce minimum order, promo applicability and coin caps
//! cargo run -p rez-checkout --bin rez-bill -- cart.json --validate
//!
//! # Use a specific config file
//! cargo run -p rez-checkout --bin rez-bill -- cart.json --config ./checkout.toml
//! ```
//!
//! Logs go to stderr (`RUST_LOG=debug` for more), the bill to stdout.

use chrono::Utc;
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

use rez_checkout::{CartFile, CheckoutConfig, CheckoutError};

/// Parsed command line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Price {
        cart_path: PathBuf,
        config_path: Option<PathBuf>,
        validate: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();

    let (cart_path, config_path, validate) = match parse_args(&args) {
        Ok(Command::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Ok(Command::Price {
            cart_path,
            config_path,
            validate,
        }) => (cart_path, config_path, validate),
        Err(message) => {
            error!(%message, "Invalid arguments");
            print_help();
            return ExitCode::from(2);
        }
    };

    match run(&cart_path, config_path, validate) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(CheckoutError::Validation(e)) => {
            error!(error = %e, "Cart failed validation");
            ExitCode::from(3)
        }
        Err(e) => {
            error!(error = %e, "Failed to price cart");
            ExitCode::FAILURE
        }
    }
}

/// Parses the arguments after the program name.
fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut cart_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut validate = false;

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => match args.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => return Err(format!("{arg} requires a path")),
            },
            "--validate" | "-v" => validate = true,
            "--help" | "-h" => return Ok(Command::Help),
            flag if flag.starts_with('-') => return Err(format!("unknown option: {flag}")),
            path => {
                if cart_path.is_some() {
                    return Err(format!("unexpected argument: {path}"));
                }
                cart_path = Some(PathBuf::from(path));
            }
        }
    }

    let cart_path = cart_path.ok_or_else(|| "missing cart file".to_string())?;
    Ok(Command::Price {
        cart_path,
        config_path,
        validate,
    })
}

fn run(cart_path: &Path, config_path: Option<PathBuf>, validate: bool) -> Result<String, CheckoutError> {
    let config = CheckoutConfig::load(config_path)?;
    let cart = CartFile::read(cart_path)?;
    let bill = cart.price(&config.billing_config(), validate, Utc::now())?;

    serde_json::to_string_pretty(&bill).map_err(|e| CheckoutError::SerializationFailed(e.to_string()))
}

fn print_help() {
    println!("ReZ bill calculator");
    println!();
    println!("Usage: rez-bill <CART.json> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>  Checkout config file (default: platform config dir)");
    println!("  -v, --validate       Check minimum order, promo and coin rules first");
    println!("  -h, --help           Show this help message");
}

/// Log levels via `RUST_LOG`; default shows info, and debug for rez-checkout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,rez_checkout=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_cart_with_options() {
        let command = parse_args(&args(&["cart.json", "-c", "checkout.toml", "--validate"])).unwrap();
        assert_eq!(
            command,
            Command::Price {
                cart_path: PathBuf::from("cart.json"),
                config_path: Some(PathBuf::from("checkout.toml")),
                validate: true,
            }
        );

        assert_eq!(parse_args(&args(&["cart.json", "--help"])), Ok(Command::Help));
    }

    #[test]
    fn test_config_flag_without_value_is_an_error() {
        assert!(parse_args(&args(&["cart.json", "--config"])).is_err());
    }

    #[test]
    fn test_unknown_flag_is_not_taken_as_cart_path() {
        assert!(parse_args(&args(&["--verbose", "cart.json"])).is_err());
        assert!(parse_args(&args(&["cart.json", "--vaildate"])).is_err());
    }

    #[test]
    fn test_missing_or_extra_cart_path() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["a.json", "b.json"])).is_err());
    }
}
