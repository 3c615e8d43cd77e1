use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use ark_bn254::Bn254;
use circom_types::{KeyLoader, PublicInput, VerificationError};
use clap::{Args, Parser, Subcommand};
use eyre::{Context, bail};
use groth16::Groth16Verifier;
use plonk::PlonkVerifier;
use tracing_subscriber::EnvFilter;
use zkcheck_calldata::{
    CalldataError, EnvelopeProof, Groth16Calldata, PlonkCalldata, ProofEnvelope,
};

/// Verifies BN254 Groth16 and PLONK proofs produced by snarkjs and converts them into
/// Solidity calldata or versioned envelopes.
///
/// `verify` exits with 0 for a valid proof, 1 for an invalid one and 2 if the request
/// could not be evaluated at all.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Config {
    /// Log filter, e.g. `debug` or `zkcheck_plonk=trace`.
    #[clap(long, env = "ZKCHECK_LOG", default_value = "warn")]
    log: String,
    #[clap(subcommand)]
    subcommand: SubCommand,
}

#[derive(Debug, Subcommand)]
enum SubCommand {
    Verify(VerifyConfig),
    GenerateCall(ProofConfig),
    Envelope(ProofConfig),
}

/// Verify a proof against a verification key.
#[derive(Debug, Args)]
struct VerifyConfig {
    /// Path to the snarkjs verification key. The protocol is taken from the key.
    #[clap(long)]
    pub vk: PathBuf,
    /// Path to the snarkjs proof.
    #[clap(long)]
    pub proof: PathBuf,
    /// Path to the public signals.
    #[clap(long)]
    pub public: PathBuf,
    /// Expected hex SHA-256 of the verification key file.
    #[clap(long)]
    pub fingerprint: Option<String>,
}

/// Convert a proof and its public signals.
#[derive(Debug, Args)]
struct ProofConfig {
    /// Path to the snarkjs proof. The protocol is taken from the proof.
    #[clap(long)]
    pub proof: PathBuf,
    /// Path to the public signals.
    #[clap(long)]
    pub public: PathBuf,
    /// Location of the output file. Write to stdout if omitted.
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

fn read(path: &Path) -> eyre::Result<Vec<u8>> {
    fs::read(path).wrap_err_with(|| format!("while reading {}", path.display()))
}

fn protocol_of(json: &[u8], what: &str) -> eyre::Result<String> {
    let value: serde_json::Value =
        serde_json::from_slice(json).wrap_err_with(|| format!("while parsing {what}"))?;
    match value.get("protocol").and_then(|p| p.as_str()) {
        Some(protocol) => Ok(protocol.to_owned()),
        None => bail!("{what} does not name its protocol"),
    }
}

/// Rejected points and numbers come back as the inner error so that they are reported
/// like every other malformed proof.
fn load_proof(path: &Path) -> eyre::Result<Result<EnvelopeProof<Bn254>, VerificationError>> {
    match EnvelopeProof::from_json(&read(path)?) {
        Ok(proof) => Ok(Ok(proof)),
        Err(CalldataError::Verification(err)) => Ok(Err(err)),
        Err(err) => Err(err).wrap_err_with(|| format!("while parsing {}", path.display())),
    }
}

/// Public signals are read as strings first so that out-of-range values are reported
/// with their index.
fn load_public(path: &Path) -> eyre::Result<Result<Vec<ark_bn254::Fr>, VerificationError>> {
    let signals: Vec<String> =
        serde_json::from_slice(&read(path)?).wrap_err("while parsing public signals")?;
    Ok(PublicInput::from_decimal(&signals).map(PublicInput::into_inner))
}

fn write_output(output: Option<PathBuf>, result: String) -> eyre::Result<ExitCode> {
    if let Some(output) = output {
        fs::write(output, result).wrap_err("while writing output")?;
    } else {
        println!("{result}");
    }
    Ok(ExitCode::SUCCESS)
}

fn rejected(err: VerificationError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(2)
}

fn verify(config: VerifyConfig) -> eyre::Result<ExitCode> {
    let VerifyConfig {
        vk,
        proof,
        public,
        fingerprint,
    } = config;
    let vk = read(&vk)?;
    let mut loader = KeyLoader::new();
    if let Some(fingerprint) = fingerprint {
        loader = loader.fingerprint(fingerprint);
    }
    let proof = match load_proof(&proof)? {
        Ok(proof) => proof,
        Err(err) => return Ok(rejected(err)),
    };
    let public_inputs = match load_public(&public)? {
        Ok(inputs) => inputs,
        Err(err) => return Ok(rejected(err)),
    };

    let result = match (protocol_of(&vk, "verification key")?.as_str(), proof) {
        ("groth16", EnvelopeProof::Groth16(proof)) => {
            let vk = loader
                .load_from_bytes(&vk)
                .wrap_err("while loading verification key")?;
            let verifier = Groth16Verifier::<Bn254>::new(vk)
                .wrap_err("while preparing verification key")?;
            verifier.verify(&proof, &public_inputs)
        }
        ("plonk", EnvelopeProof::Plonk(proof)) => {
            let vk = loader
                .load_from_bytes(&vk)
                .wrap_err("while loading verification key")?;
            let verifier =
                PlonkVerifier::<Bn254>::new(vk).wrap_err("while preparing verification key")?;
            verifier.verify(&proof, &public_inputs)
        }
        (key, proof) => bail!(
            "verification key is for {key} but the proof is {}",
            proof.protocol()
        ),
    };
    match result {
        Ok(accepted) => {
            println!("{accepted}");
            Ok(if accepted {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(err) => Ok(rejected(err)),
    }
}

fn generate_call(config: ProofConfig) -> eyre::Result<ExitCode> {
    let ProofConfig {
        proof,
        public,
        output,
    } = config;
    let proof = load_proof(&proof)?.wrap_err("invalid proof")?;
    let public_inputs = load_public(&public)?.wrap_err("invalid public signals")?;
    let result = match proof {
        EnvelopeProof::Groth16(proof) => Groth16Calldata::new(proof, public_inputs).to_string(),
        EnvelopeProof::Plonk(proof) => PlonkCalldata::new(proof, public_inputs).to_string(),
    };
    write_output(output, result)
}

fn envelope(config: ProofConfig) -> eyre::Result<ExitCode> {
    let ProofConfig {
        proof,
        public,
        output,
    } = config;
    let proof = load_proof(&proof)?.wrap_err("invalid proof")?;
    let public_inputs = load_public(&public)?.wrap_err("invalid public signals")?;
    let result = ProofEnvelope::new(proof, public_inputs)
        .to_json()
        .wrap_err("while writing envelope")?;
    write_output(output, result)
}

fn run(config: Config) -> eyre::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log).wrap_err("invalid log filter")?)
        .with_writer(std::io::stderr)
        .init();
    match config.subcommand {
        SubCommand::Verify(config) => verify(config),
        SubCommand::GenerateCall(config) => generate_call(config),
        SubCommand::Envelope(config) => envelope(config),
    }
}

fn main() -> ExitCode {
    // exit code 1 means "proof rejected", so any other failure maps to 2
    match run(Config::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:?}");
            ExitCode::from(2)
        }
    }
}
