//! `protolist` command-line tool.
//!
//! Encodes records for ClickHouse `Protobuf` / `ProtobufList` input and either
//! writes them to a file or inserts them into a table.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use protolist::config::{
    DEFAULT_CLICKHOUSE_URL, DEFAULT_DATABASE, DEFAULT_OUTPUT_FILE, DEFAULT_TABLE,
};
use protolist::inspect::{inspect, BufferReport};
use protolist::sink::{open_sink, FileSink, Sink};
use protolist::{
    ClickHouseConfig, Config, Encoder, EncoderConfig, Mode, OutputTarget, ProtolistError,
    Record, RecordSource, Result,
};

#[derive(Debug, Parser)]
#[command(name = "protolist", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encode records and write them to a file or a ClickHouse table.
    Encode(EncodeArgs),
    /// Decode a file produced by `encode` and print its frames.
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
struct EncodeArgs {
    /// Value of the record's my_uint32 field; repeat for a list batch.
    #[arg(long = "value", default_value = "1", num_args = 1)]
    values: Vec<u32>,

    /// Wrap records in a ProtobufList envelope.
    #[arg(long)]
    list: bool,

    /// Output file (ignored with --clickhouse).
    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Insert into ClickHouse instead of writing a file.
    #[arg(long)]
    clickhouse: bool,

    #[arg(long, default_value = DEFAULT_CLICKHOUSE_URL)]
    url: String,

    #[arg(long, default_value = DEFAULT_DATABASE)]
    database: String,

    #[arg(long, default_value = DEFAULT_TABLE)]
    table: String,

    /// format_schema setting (`file.proto:Message`).
    #[arg(long)]
    format_schema: Option<String>,

    #[arg(long, default_value = "default")]
    user: String,

    #[arg(long, default_value = "")]
    password: String,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Also write the encoded buffer to this file.
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Largest accepted encoded record, in bytes.
    #[arg(long)]
    max_message_size: Option<usize>,
}

#[derive(Debug, Args)]
struct InspectArgs {
    /// File to decode.
    path: PathBuf,

    /// Treat the file as a ProtobufList envelope.
    #[arg(long)]
    list: bool,

    /// Print a JSON report instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Encode(args) => run_encode(args),
        Command::Inspect(args) => run_inspect(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let stage = e.stage();
            tracing::error!(%stage, "{}", e);
            ExitCode::from(stage.exit_code() as u8)
        }
    }
}

fn build_config(args: &EncodeArgs) -> Config {
    let mut encoder = EncoderConfig::new(Mode::from_list_flag(args.list));
    if let Some(limit) = args.max_message_size {
        encoder = encoder.max_message_size(limit);
    }

    let target = if args.clickhouse {
        let mut ch = ClickHouseConfig::new(&args.url)
            .database(&args.database)
            .table(&args.table)
            .credentials(&args.user, &args.password)
            .timeout(Duration::from_secs(args.timeout_secs));
        if let Some(schema) = &args.format_schema {
            ch = ch.format_schema(schema);
        }
        OutputTarget::ClickHouse(ch)
    } else {
        OutputTarget::File(args.output.clone())
    };

    Config {
        encoder,
        target,
        dump_path: args.dump.clone(),
    }
}

fn run_encode(args: EncodeArgs) -> Result<()> {
    let config = build_config(&args);

    let records: Vec<Record> = args.values.iter().copied().map(Record::new).collect();
    if records.len() > 1 && config.encoder.mode == Mode::Single {
        return Err(ProtolistError::Config(
            "more than one --value requires --list".to_string(),
        ));
    }
    let source = match config.encoder.mode {
        Mode::Single => RecordSource::One(*records.first().ok_or(ProtolistError::EmptyBatch)?),
        Mode::List => RecordSource::Batch(records),
    };

    // Open the sink first so a bad target fails before any bytes exist.
    let sink = open_sink(&config.target)?;

    let buffer = Encoder::new(config.encoder).encode(&source)?;

    if let Some(path) = &config.dump_path {
        FileSink::new(path).deliver(&buffer)?;
    }

    sink.deliver(&buffer)
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    print!("{}", inspect_file(&args)?);
    Ok(())
}

fn inspect_file(args: &InspectArgs) -> Result<String> {
    let data = std::fs::read(&args.path).map_err(|source| ProtolistError::Input {
        path: args.path.clone(),
        source,
    })?;
    let report = inspect(&data, Mode::from_list_flag(args.list))?;
    render_report(&report, args.json)
}

fn render_report(report: &BufferReport, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(report)? + "\n");
    }

    let mut lines = vec![format!(
        "{} bytes, mode {} ({})",
        report.total_len,
        report.mode,
        report.mode.format_name()
    )];
    if let Some(len) = report.envelope_len {
        lines.push(format!("envelope payload: {} bytes", len));
    }
    for message in &report.messages {
        let value = message
            .my_uint32
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "  [{}] len={} my_uint32={} hex={}",
            message.index, message.payload_len, value, message.payload_hex
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use protolist::Stage;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_encode_defaults() {
        let cli = Cli::parse_from(["protolist", "encode"]);
        let Command::Encode(args) = cli.command else {
            panic!("expected encode");
        };

        assert_eq!(args.values, [1]);
        let config = build_config(&args);
        assert_eq!(config.encoder.mode, Mode::Single);
        assert_eq!(
            config.target,
            OutputTarget::File(PathBuf::from("protoBytes.bin"))
        );
    }

    #[test]
    fn test_encode_list_clickhouse() {
        let cli = Cli::parse_from([
            "protolist", "encode", "--value", "1", "--value", "2", "--list", "--clickhouse",
            "--table", "events",
        ]);
        let Command::Encode(args) = cli.command else {
            panic!("expected encode");
        };

        assert_eq!(args.values, [1, 2]);
        let config = build_config(&args);
        assert_eq!(config.encoder.mode, Mode::List);
        match config.target {
            OutputTarget::ClickHouse(ch) => assert_eq!(ch.table, "events"),
            other => panic!("unexpected target {:?}", other),
        }
    }

    #[test]
    fn test_value_out_of_range_rejected() {
        let result = Cli::try_parse_from(["protolist", "encode", "--value", "4294967296"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_many_values_need_list() {
        let cli = Cli::parse_from(["protolist", "encode", "--value", "1", "--value", "2"]);
        let Command::Encode(args) = cli.command else {
            panic!("expected encode");
        };

        let err = run_encode(args).unwrap_err();
        assert_eq!(err.stage(), Stage::Config);
    }

    fn encode_args(argv: &[&str]) -> EncodeArgs {
        let cli = Cli::parse_from(argv);
        let Command::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        args
    }

    fn inspect_args(argv: &[&str]) -> InspectArgs {
        let cli = Cli::parse_from(argv);
        let Command::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        args
    }

    #[test]
    fn test_encode_list_writes_output_and_dump() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.bin");
        let dump = dir.path().join("dump.bin");

        let args = encode_args(&[
            "protolist",
            "encode",
            "--value",
            "1",
            "--value",
            "2",
            "--list",
            "--output",
            out.to_str().unwrap(),
            "--dump",
            dump.to_str().unwrap(),
        ]);
        run_encode(args).unwrap();

        let expected = [0x06, 0x02, 0x08, 0x01, 0x02, 0x08, 0x02];
        assert_eq!(std::fs::read(&out).unwrap(), expected);
        assert_eq!(std::fs::read(&dump).unwrap(), expected);
    }

    #[test]
    fn test_encode_single_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.bin");

        let args = encode_args(&[
            "protolist",
            "encode",
            "--value",
            "1",
            "--output",
            out.to_str().unwrap(),
        ]);
        run_encode(args).unwrap();

        assert_eq!(std::fs::read(&out).unwrap(), [0x02, 0x08, 0x01]);
    }

    #[test]
    fn test_render_list_report_text() {
        let report = inspect(&[0x06, 0x02, 0x08, 0x01, 0x02, 0x08, 0x02], Mode::List).unwrap();
        let text = render_report(&report, false).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "7 bytes, mode list (ProtobufList)",
                "envelope payload: 6 bytes",
                "  [0] len=2 my_uint32=1 hex=0801",
                "  [1] len=2 my_uint32=2 hex=0802",
            ]
        );
    }

    #[test]
    fn test_inspect_file_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.bin");
        std::fs::write(&path, [0x06, 0x02, 0x08, 0x01, 0x02, 0x08, 0x02]).unwrap();

        let args = inspect_args(&["protolist", "inspect", path.to_str().unwrap(), "--list", "--json"]);
        let output = inspect_file(&args).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["mode"], "list");
        assert_eq!(value["envelope_len"], 6);
        assert_eq!(value["total_len"], 7);
        assert_eq!(value["messages"][1]["my_uint32"], 2);
    }

    #[test]
    fn test_inspect_single_file_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.bin");
        std::fs::write(&path, [0x02, 0x08, 0x01]).unwrap();

        let args = inspect_args(&["protolist", "inspect", path.to_str().unwrap()]);
        let output = inspect_file(&args).unwrap();

        assert_eq!(
            output,
            "3 bytes, mode single (Protobuf)\n  [0] len=2 my_uint32=1 hex=0801\n"
        );
    }

    #[test]
    fn test_inspect_missing_file_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.bin");

        let args = inspect_args(&["protolist", "inspect", path.to_str().unwrap()]);
        let err = run_inspect(args).unwrap_err();

        assert!(matches!(err, ProtolistError::Input { .. }));
        assert_eq!(err.stage(), Stage::Input);
        assert_eq!(err.stage().exit_code(), 6);
    }
}
