// Command Line Front End
// Parses `-k`, `-e n e in out` and `-d n d in out`, sets up logging and
// dispatches to key generation or the file cipher pipeline

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, ArgGroup, CommandFactory, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::CipherConfig;
use crate::rsa::{decrypt_file, encrypt_file, generate_keypair, RsaPrivateKey, RsaPublicKey};
use crate::util::format_file_size;

#[derive(Parser, Debug)]
#[command(name = "rsa64", version)]
#[command(about = "Generate toy RSA keys and encrypt or decrypt files as radix-64 text")]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["keygen", "encrypt", "decrypt"])
))]
pub struct Cli {
    /// Generate a key pair and print it
    #[arg(short = 'k')]
    pub keygen: bool,

    /// Encrypt INPUT into OUTPUT with the public key (N, E)
    #[arg(short = 'e', num_args = 4, value_names = ["N", "E", "INPUT", "OUTPUT"])]
    pub encrypt: Option<Vec<String>>,

    /// Decrypt INPUT into OUTPUT with the private key (N, D)
    #[arg(short = 'd', num_args = 4, value_names = ["N", "D", "INPUT", "OUTPUT"])]
    pub decrypt: Option<Vec<String>>,

    /// Refuse plaintext blocks that are not below the modulus (encryption only)
    #[arg(long, requires = "encrypt")]
    pub strict: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides it.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// What a parsed command line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    KeyGen,
    Encrypt {
        key: RsaPublicKey,
        input: PathBuf,
        output: PathBuf,
    },
    Decrypt {
        key: RsaPrivateKey,
        input: PathBuf,
        output: PathBuf,
    },
}

fn parse_number(name: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .with_context(|| format!("{} must be a non-negative integer, got {:?}", name, value))
}

impl Cli {
    /// Turn the raw flag values into a typed action
    pub fn action(&self) -> Result<Action> {
        if let Some(values) = &self.encrypt {
            let [n, e, input, output] = values.as_slice() else {
                anyhow::bail!("-e takes exactly four values");
            };
            let key = RsaPublicKey::new(parse_number("n", n)?, parse_number("e", e)?)?;
            return Ok(Action::Encrypt {
                key,
                input: PathBuf::from(input),
                output: PathBuf::from(output),
            });
        }

        if let Some(values) = &self.decrypt {
            let [n, d, input, output] = values.as_slice() else {
                anyhow::bail!("-d takes exactly four values");
            };
            let key = RsaPrivateKey::new(parse_number("n", n)?, parse_number("d", d)?)?;
            return Ok(Action::Decrypt {
                key,
                input: PathBuf::from(input),
                output: PathBuf::from(output),
            });
        }

        Ok(Action::KeyGen)
    }

    pub fn cipher_config(&self) -> CipherConfig {
        CipherConfig::default().with_strict_block_range(self.strict)
    }
}

/// Install a stderr subscriber so stdout stays clean for key reports
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A second init (e.g. from tests) is not an error worth reporting
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Carry out `action`, writing any report to `out`
pub fn execute<W: Write>(action: Action, config: &CipherConfig, out: &mut W) -> Result<()> {
    match action {
        Action::KeyGen => {
            let keypair = generate_keypair().context("key generation failed")?;
            writeln!(out, "{}", keypair)?;
        }
        Action::Encrypt { key, input, output } => {
            let length = encrypt_file(&input, &output, &key, config)
                .with_context(|| format!("failed to encrypt {}", input.display()))?;
            info!(
                "encrypted {} ({}) into {}",
                input.display(),
                format_file_size(length),
                output.display()
            );
        }
        Action::Decrypt { key, input, output } => {
            let length = decrypt_file(&input, &output, &key)
                .with_context(|| format!("failed to decrypt {}", input.display()))?;
            info!(
                "decrypted {} into {} ({})",
                input.display(),
                output.display(),
                format_file_size(length)
            );
        }
    }
    Ok(())
}

/// Entry point for the `rsa64` binary
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let action = match cli.action() {
        Ok(action) => action,
        Err(e) => Cli::command()
            .error(ErrorKind::ValueValidation, format!("{:#}", e))
            .exit(),
    };

    let stdout = io::stdout();
    execute(action, &cli.cipher_config(), &mut stdout.lock())
}
