//! paydoc CLI - payout-receipt PDF assembly tool

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use paydoc::{
    assemble_with_options, AssembleOptions, AssemblyInput, Attachment, Error, FieldSet,
    FormRecord, SignatureImage, Signatures,
};

#[derive(Parser)]
#[command(name = "paydoc")]
#[command(version)]
#[command(about = "Assemble a payout-receipt PDF from a form record, signatures, and receipts", long_about = None)]
struct Cli {
    /// Form record JSON file ({"date": "...", "amount": "...", ...})
    #[arg(short, long, value_name = "FILE")]
    form: PathBuf,

    /// Custom field-set definition JSON (defaults to the built-in voucher)
    #[arg(long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Drop the recipient signature slot from the layout
    #[arg(long)]
    single_signature: bool,

    /// Cashier signature image (raster file or a data-URI text file)
    #[arg(long, value_name = "FILE")]
    cashier_signature: Option<PathBuf>,

    /// Recipient signature image (raster file or a data-URI text file)
    #[arg(long, value_name = "FILE")]
    recipient_signature: Option<PathBuf>,

    /// Receipt attachment (image or PDF); repeatable, order is kept
    #[arg(short, long = "attach", value_name = "FILE")]
    attachments: Vec<PathBuf>,

    /// Output PDF path
    #[arg(short, long, value_name = "FILE", default_value = "payout.pdf")]
    output: PathBuf,

    /// Disable parallel attachment processing
    #[arg(long)]
    sequential: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match generate(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn generate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let record: FormRecord = serde_json::from_slice(&fs::read(&cli.form)?)?;

    let mut schema = match &cli.schema {
        Some(path) => serde_json::from_slice::<FieldSet>(&fs::read(path)?)?,
        None => FieldSet::payout_voucher(),
    };
    if cli.single_signature {
        schema = schema.single_signature();
    }

    let signatures = Signatures {
        cashier: load_signature(cli.cashier_signature.as_deref())?,
        recipient: load_signature(cli.recipient_signature.as_deref())?,
    };

    let mut input = AssemblyInput::new(record).with_signatures(signatures);
    for path in &cli.attachments {
        match load_attachment(path) {
            Ok(attachment) => input.attachments.push(attachment),
            Err(e) => {
                // Intake-side rejection: unsupported files never reach the core.
                eprintln!("{} {}", "rejected:".yellow().bold(), e);
            }
        }
    }

    let mut options = AssembleOptions::new().with_schema(schema);
    if cli.sequential {
        options = options.sequential();
    }

    let document = assemble_with_options(&input, &options)?;

    for warning in &document.warnings {
        eprintln!(
            "{} {}: {}",
            "skipped".yellow().bold(),
            warning.name,
            warning.reason
        );
    }

    fs::write(&cli.output, &document.bytes)?;
    println!(
        "{} {} ({} pages, {} bytes)",
        "wrote".green().bold(),
        cli.output.display(),
        document.page_count,
        document.bytes.len()
    );
    Ok(())
}

/// Read a signature from a raster file or a text file holding a data URI.
fn load_signature(path: Option<&Path>) -> Result<SignatureImage, Error> {
    let Some(path) = path else {
        return Ok(SignatureImage::empty());
    };
    let data = fs::read(path)?;
    if data.starts_with(b"data:") {
        SignatureImage::from_data_uri(&String::from_utf8_lossy(&data))
    } else {
        Ok(SignatureImage::from_bytes(data))
    }
}

fn load_attachment(path: &Path) -> Result<Attachment, Box<dyn std::error::Error>> {
    let mime = mime_for_path(path)
        .ok_or_else(|| format!("{}: only images and PDFs are accepted", path.display()))?;
    let data = fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Attachment::new(name, mime, data))
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "webp" => Some("image/webp"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_path() {
        assert_eq!(
            mime_for_path(Path::new("scan.PDF")),
            Some("application/pdf")
        );
        assert_eq!(mime_for_path(Path::new("r.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("no_extension")), None);
    }

    #[test]
    fn test_load_signature_absent() {
        let sig = load_signature(None).unwrap();
        assert!(sig.is_empty());
    }

    #[test]
    fn test_load_signature_data_uri_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "data:image/png;base64,cGF5ZG9j").unwrap();
        let sig = load_signature(Some(file.path())).unwrap();
        assert_eq!(sig.as_bytes(), b"paydoc");
    }
}
