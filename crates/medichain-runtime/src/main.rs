//! MediChain command line.
//!
//! Configuration comes from `MEDICHAIN_*` environment variables; signing
//! commands need `MEDICHAIN_PRIVATE_KEY`.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use mc_01_wallet::{network_name, WalletSession};
use mc_02_encryption::EncryptedPayload;
use medichain_runtime::screens::{PatientDashboard, PharmacyDashboard, Screen};
use medichain_runtime::{AppConfig, AppContainer, PrescriptionCode, RecordFile};
use shared_types::Cid;

/// MediChain: encrypted medical records on an EVM chain
#[derive(Parser, Debug)]
#[command(name = "medichain")]
#[command(about = "Patient records, prescriptions and registries from the command line")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show configuration, chain and session status
    Status,

    /// Encrypt a file with the configured account's key
    Encrypt { input: PathBuf, output: PathBuf },

    /// Decrypt an envelope produced by `encrypt`
    Decrypt { input: PathBuf, output: PathBuf },

    /// Upload a file to IPFS
    Upload {
        file: PathBuf,

        /// Encrypt before uploading
        #[arg(short, long)]
        encrypt: bool,
    },

    /// Download content from IPFS
    Download {
        cid: String,
        output: PathBuf,

        /// Treat the content as an envelope and decrypt it
        #[arg(short, long)]
        decrypt: bool,
    },

    /// Check a prescription by id or scanned QR payload
    VerifyPrescription { code: String },

    /// Print the health passport QR payload of the configured account
    Passport,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    mc_telemetry::init_logging(&config.telemetry).context("Failed to initialise logging")?;
    let app = Arc::new(AppContainer::from_config(config).context("Failed to start")?);

    match args.command {
        Command::Status => status(&app).await,
        Command::Encrypt { input, output } => {
            connect(&app).await?;
            let data =
                fs::read(&input).with_context(|| format!("Cannot read {}", input.display()))?;
            let payload = app.encryptor()?.encrypt_bytes(&data).await?;
            fs::write(&output, payload.to_json()?)?;
            println!("Encrypted {} bytes into {}", data.len(), output.display());
            Ok(())
        }
        Command::Decrypt { input, output } => {
            connect(&app).await?;
            let bytes =
                fs::read(&input).with_context(|| format!("Cannot read {}", input.display()))?;
            let payload = EncryptedPayload::from_slice(&bytes)?;
            let data = app.encryptor()?.decrypt_bytes(&payload).await?;
            fs::write(&output, &data)?;
            println!("Decrypted {} bytes into {}", data.len(), output.display());
            Ok(())
        }
        Command::Upload { file, encrypt } => {
            let record = RecordFile::read(&file).map_err(|e| anyhow::anyhow!(e.message()))?;
            let uploaded = if encrypt {
                connect(&app).await?;
                let payload = app.encryptor()?.encrypt_bytes(&record.data).await?;
                app.ipfs().upload_encrypted(&payload, &record.name).await?
            } else {
                app.ipfs()
                    .upload(record.data, &record.name, &record.content_type)
                    .await?
            };
            println!("{}\n{}", uploaded.cid, uploaded.url);
            Ok(())
        }
        Command::Download {
            cid,
            output,
            decrypt,
        } => {
            let cid = Cid::parse(&cid)?;
            let mut data = app.ipfs().download(&cid).await?;
            if decrypt {
                connect(&app).await?;
                let payload = EncryptedPayload::from_slice(&data)?;
                data = app.encryptor()?.decrypt_bytes(&payload).await?;
            }
            fs::write(&output, &data)?;
            println!("Saved {} bytes to {}", data.len(), output.display());
            Ok(())
        }
        Command::VerifyPrescription { code } => {
            let id = PrescriptionCode::scan(&code).map_err(|e| anyhow::anyhow!(e.message()))?;
            let check = PharmacyDashboard::new(Arc::clone(&app))
                .verify(id)
                .await
                .map_err(|e| anyhow::anyhow!(e.message()))?;
            println!("{}", serde_json::to_string_pretty(&check)?);
            Ok(())
        }
        Command::Passport => {
            connect(&app).await?;
            let screen = PatientDashboard::new(Arc::clone(&app));
            screen.refresh().await.map_err(|e| anyhow::anyhow!(e.message()))?;
            let passport = screen
                .health_passport()
                .map_err(|e| anyhow::anyhow!(e.message()))?;
            println!("{}", passport.to_json().map_err(|e| anyhow::anyhow!(e.message()))?);
            Ok(())
        }
    }
}

async fn connect(app: &AppContainer) -> Result<WalletSession> {
    if app.config().private_key.is_none() {
        bail!("MEDICHAIN_PRIVATE_KEY is required for this command");
    }
    let session = app.wallet().connect().await?;
    info!(address = %session.address, "Using account");
    Ok(session)
}

async fn status(app: &AppContainer) -> Result<()> {
    let config = app.config();
    println!("MediChain {}", medichain_runtime::VERSION);
    println!(
        "Network:  {} ({})",
        network_name(config.chain_id),
        config.chain_id
    );
    println!("RPC:      {}", config.rpc_url);
    match app.provider().block_number().await {
        Ok(block) => println!("Block:    {block}"),
        Err(e) => println!("Block:    unavailable ({e})"),
    }

    let missing = config.contracts.missing();
    if missing.is_empty() {
        println!("Contracts: all configured");
    } else {
        let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
        println!("Contracts: missing {}", names.join(", "));
    }
    println!(
        "IPFS:     {}",
        if app.ipfs().is_configured() {
            "configured"
        } else {
            "not configured"
        }
    );
    println!("Backend:  {}", config.backend_url);

    if config.private_key.is_some() {
        let session = connect(app).await?;
        println!("Account:  {}", session.address);
    } else {
        println!("Account:  none");
    }
    Ok(())
}
