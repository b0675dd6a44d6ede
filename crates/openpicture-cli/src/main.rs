//! `openpicture` — convert and replay recorded picture streams.
//!
//! Binary streams decode to JSON or YAML, textual documents encode back to
//! the binary format or rewrite to a normalized textual form, and `replay`
//! renders a stream into a captured display frame. Any failure exits
//! non-zero with the error on stderr.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use openpicture_core::{Picture, ScopeValidator};
use openpicture_io::{binary, text};
use openpicture_replay::{FrameSurface, SurfacePlayer};

#[derive(Parser)]
#[command(name = "openpicture", version, about = "Picture stream converter and replay tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TextFormat {
    Json,
    Yaml,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a binary stream to a textual document.
    Decode {
        /// Input file, or `-` for stdin.
        input: PathBuf,
        /// Output file, or `-` for stdout.
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
        /// Textual rendition to emit.
        #[arg(short, long, value_enum, default_value_t = TextFormat::Json)]
        format: TextFormat,
    },
    /// Encode a textual document to a binary stream.
    Encode {
        /// Input file, or `-` for stdin.
        input: PathBuf,
        /// Output file, or `-` for stdout.
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
        /// Textual rendition of the input.
        #[arg(short, long, value_enum, default_value_t = TextFormat::Json)]
        format: TextFormat,
    },
    /// Parse a textual document and re-emit it normalized.
    Rewrite {
        /// Input file, or `-` for stdin.
        input: PathBuf,
        /// Output file, or `-` for stdout.
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
        /// Textual rendition of the input.
        #[arg(short, long, value_enum, default_value_t = TextFormat::Json)]
        format: TextFormat,
        /// Textual rendition to emit; defaults to the input rendition.
        #[arg(short = 't', long, value_enum)]
        to: Option<TextFormat>,
    },
    /// Replay a binary stream and emit the captured display frame as JSON.
    Replay {
        /// Input file, or `-` for stdin.
        input: PathBuf,
        /// Output file, or `-` for stdout.
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Decode {
            input,
            output,
            format,
        } => decode(&input, &output, format),
        Command::Encode {
            input,
            output,
            format,
        } => encode(&input, &output, format),
        Command::Rewrite {
            input,
            output,
            format,
            to,
        } => rewrite(&input, &output, format, to.unwrap_or(format)),
        Command::Replay { input, output } => replay(&input, &output),
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .context("reading stdin")?;
        Ok(bytes)
    } else {
        fs::read(path).with_context(|| format!("reading {}", path.display()))
    }
}

fn read_input_text(path: &Path) -> Result<String> {
    let bytes = read_input(path)?;
    String::from_utf8(bytes).context("input is not valid UTF-8")
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if path.as_os_str() == "-" {
        io::stdout().write_all(bytes).context("writing stdout")
    } else {
        fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
    }
}

fn parse_text(document: &str, format: TextFormat) -> Result<Picture> {
    let picture = match format {
        TextFormat::Json => text::picture_from_json_str(document)?,
        TextFormat::Yaml => text::picture_from_yaml_str(document)?,
    };
    // Reject streams with unbalanced scope markers before they propagate.
    let mut validator = ScopeValidator::new();
    picture.play(&mut validator)?;
    Ok(picture)
}

fn emit_text(picture: &Picture, format: TextFormat) -> Result<String> {
    Ok(match format {
        TextFormat::Json => text::to_json_string(picture)?,
        TextFormat::Yaml => text::to_yaml_string(picture)?,
    })
}

fn decode(input: &Path, output: &Path, format: TextFormat) -> Result<()> {
    let bytes = read_input(input)?;
    let picture = binary::decode_picture(&bytes).context("decoding binary stream")?;
    log::debug!(
        "decoded {} bytes into {} op(s)",
        bytes.len(),
        picture.total_op_count()
    );
    let mut document = emit_text(&picture, format)?;
    document.push('\n');
    write_output(output, document.as_bytes())
}

fn encode(input: &Path, output: &Path, format: TextFormat) -> Result<()> {
    let document = read_input_text(input)?;
    let picture = parse_text(&document, format).context("parsing textual document")?;
    let bytes = binary::encode_picture(&picture).context("encoding binary stream")?;
    log::debug!(
        "encoded {} op(s) into {} bytes",
        picture.total_op_count(),
        bytes.len()
    );
    write_output(output, &bytes)
}

fn rewrite(input: &Path, output: &Path, from: TextFormat, to: TextFormat) -> Result<()> {
    let document = read_input_text(input)?;
    let picture = parse_text(&document, from).context("parsing textual document")?;
    let mut normalized = emit_text(&picture, to)?;
    normalized.push('\n');
    write_output(output, normalized.as_bytes())
}

fn replay(input: &Path, output: &Path) -> Result<()> {
    let bytes = read_input(input)?;
    let picture = binary::decode_picture(&bytes).context("decoding binary stream")?;
    let mut player = SurfacePlayer::new(FrameSurface::new());
    picture.play(&mut player).context("replaying stream")?;
    let frame = player.into_surface().into_frame();
    let mut json = serde_json::to_string_pretty(&frame).context("serializing frame")?;
    json.push('\n');
    write_output(output, json.as_bytes())
}
