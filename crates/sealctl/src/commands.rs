//! Subcommand implementations. Each reads its input from a reader and writes
//! its result to a writer so it can be driven without a terminal.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Args, Subcommand};
use envelope::kdf::{self, HashPrimitive};
use envelope::{KeySizes, Sealer};
use tracing::info;

use crate::config::Config;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encrypt JSON read from stdin into an envelope.
    Seal(SealArgs),
    /// Verify and decrypt an envelope read from stdin.
    Open,
    /// Run PBKDF2 and print the derived key as base64.
    Derive(DeriveArgs),
    /// List the available ciphers.
    Ciphers,
}

#[derive(Debug, Args)]
pub struct SealArgs {
    /// Cipher algorithm, overriding DEFAULT_ALGO.
    #[arg(long, requires = "mode")]
    pub algo: Option<String>,
    /// Cipher mode, overriding DEFAULT_MODE.
    #[arg(long, requires = "algo")]
    pub mode: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeriveArgs {
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub salt: String,
    #[arg(long, default_value_t = 1000)]
    pub iterations: u32,
    /// Derived key length in bytes.
    #[arg(long, default_value_t = 32)]
    pub length: usize,
    /// sha1, sha256 or sha512.
    #[arg(long, default_value_t = HashPrimitive::Sha256)]
    pub hash: HashPrimitive,
}

/// Dispatch `command`.
pub fn run(
    command: &Command,
    cfg: &Config,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Seal(args) => seal(args, cfg, input, output),
        Command::Open => open(cfg, input, output),
        Command::Derive(args) => derive_key(args, output),
        Command::Ciphers => ciphers(cfg, output),
    }
}

fn seal(args: &SealArgs, cfg: &Config, input: &mut dyn Read, output: &mut dyn Write) -> Result<()> {
    let sealer = Sealer::new(cfg.sealer()).context("invalid default cipher")?;
    let key = cfg.key()?;

    let data: serde_json::Value =
        serde_json::from_reader(input).context("stdin must contain a JSON document")?;

    let envelope = match (&args.algo, &args.mode) {
        (Some(algo), Some(mode)) => sealer.encrypt_with(&data, key.as_bytes(), algo, mode),
        _ => sealer.encrypt(&data, key.as_bytes()),
    }
    .context("failed to seal input")?;

    info!(algo = %envelope.algo, mode = %envelope.mode, "sealed");
    writeln!(output, "{}", envelope.to_json()?)?;
    Ok(())
}

fn open(cfg: &Config, input: &mut dyn Read, output: &mut dyn Write) -> Result<()> {
    let sealer = Sealer::new(cfg.sealer()).context("invalid default cipher")?;
    let key = cfg.key()?;

    let mut wire = String::new();
    input
        .read_to_string(&mut wire)
        .context("failed to read envelope from stdin")?;

    let data: serde_json::Value = sealer
        .open(wire.trim(), key.as_bytes())
        .context("failed to open envelope")?;

    info!("opened");
    writeln!(output, "{}", serde_json::to_string(&data)?)?;
    Ok(())
}

fn derive_key(args: &DeriveArgs, output: &mut dyn Write) -> Result<()> {
    let dk = kdf::derive(
        args.password.as_bytes(),
        args.salt.as_bytes(),
        args.iterations,
        args.length,
        args.hash,
    )
    .context("key derivation failed")?;

    writeln!(output, "{}", STANDARD.encode(dk))?;
    Ok(())
}

fn ciphers(cfg: &Config, output: &mut dyn Write) -> Result<()> {
    let sealer = Sealer::new(cfg.sealer()).context("invalid default cipher")?;
    for cipher in sealer.ciphers().iter() {
        let sizes = match cipher.key_sizes() {
            KeySizes::OneOf(sizes) => sizes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
            KeySizes::UpTo(max) => format!("1-{max}"),
        };
        let default = cipher.algorithm() == cfg.default_algo && cipher.mode() == cfg.default_mode;
        writeln!(
            output,
            "{}/{}\tkey={}\tiv={}{}",
            cipher.algorithm(),
            cipher.mode(),
            sizes,
            cipher.iv_size(),
            if default { "\t(default)" } else { "" }
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyMaterial;

    fn cfg() -> Config {
        Config {
            default_algo: "rijndael-128".into(),
            default_mode: "ctr".into(),
            seal_key: Some(KeyMaterial::new(vec![3u8; 16])),
            log_level: "info".into(),
        }
    }

    fn exec(command: Command, cfg: &Config, input: &str) -> Result<String> {
        let mut out = Vec::new();
        run(&command, cfg, &mut input.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn seal_then_open() {
        let cfg = cfg();
        let sealed = exec(
            Command::Seal(SealArgs {
                algo: None,
                mode: None,
            }),
            &cfg,
            r#"{"ssn":"123-45-6789"}"#,
        )
        .unwrap();
        let opened = exec(Command::Open, &cfg, &sealed).unwrap();
        assert_eq!(opened.trim(), r#"{"ssn":"123-45-6789"}"#);
    }

    #[test]
    fn seal_with_override() {
        let sealed = exec(
            Command::Seal(SealArgs {
                algo: Some("aes-gcm-siv".into()),
                mode: Some("siv".into()),
            }),
            &cfg(),
            "[1,2,3]",
        )
        .unwrap();
        assert!(sealed.contains("\"aes-gcm-siv\""));
    }

    #[test]
    fn open_requires_key() {
        let cfg = Config {
            seal_key: None,
            ..cfg()
        };
        let err = exec(Command::Open, &cfg, "{}").unwrap_err();
        assert!(err.to_string().contains("SEAL_KEY"));
    }

    #[test]
    fn open_rejects_tampered_envelope() {
        let cfg = cfg();
        let sealed = exec(
            Command::Seal(SealArgs {
                algo: None,
                mode: None,
            }),
            &cfg,
            "\"hello\"",
        )
        .unwrap();
        let mut env: serde_json::Value = serde_json::from_str(&sealed).unwrap();
        env["mac"] = serde_json::json!(STANDARD.encode([0u8; 32]));
        let err = exec(Command::Open, &cfg, &env.to_string()).unwrap_err();
        let root = err.downcast_ref::<envelope::CryptError>();
        assert_eq!(root, Some(&envelope::CryptError::MacMismatch));
    }

    #[test]
    fn derive_prints_base64() {
        let out = exec(
            Command::Derive(DeriveArgs {
                password: "password".into(),
                salt: "salt".into(),
                iterations: 1,
                length: 20,
                hash: HashPrimitive::Sha1,
            }),
            &cfg(),
            "",
        )
        .unwrap();
        let dk = STANDARD.decode(out.trim()).unwrap();
        assert_eq!(
            dk,
            [
                0x0c, 0x60, 0xc8, 0x0f, 0x96, 0x1f, 0x0e, 0x71, 0xf3, 0xa9, 0xb5, 0x24, 0xaf,
                0x60, 0x12, 0x06, 0x2f, 0xe0, 0x37, 0xa6
            ]
        );
    }

    #[test]
    fn ciphers_marks_default() {
        let out = exec(Command::Ciphers, &cfg(), "").unwrap();
        assert!(out.contains("rijndael-128/ctr\tkey=16,24,32\tiv=16\t(default)"));
        assert!(out.contains("aes-gcm-siv/siv\tkey=16,32\tiv=12"));
    }
}
