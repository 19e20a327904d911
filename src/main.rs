use catg_edit::{
    EditOptions, EditResponse, EditSummary, FieldEdit, RunError, RunOptions, Section, SpanMode,
    edit_file, generate_execution_id,
};
use clap::Parser;
use log::info;

const FIELD_HELP: &str = "\
Field names for NODES:
  NodeNo, X, Y, Size, NodeType, PrintFlag, DownstreamNode, Name, Area, Imp1

Field names for REACHES:
  ReachNo, ReachName, FromNode, ToNode, TransFlag, ReachType, PrintFlag,
  Length, SlopeOrTrans, Ncoords, Reserved

Examples:
  catg-edit input.catg output.catg --section REACHES --field PrintFlag --value 1
  catg-edit input.catg output.catg --section NODES --field 6 --value 1";

/// Edit one field of every record in a RORB .catg section, keeping exact spacing
#[derive(Parser, Debug)]
#[command(name = "catg-edit")]
#[command(version)]
#[command(about = "Fixed-span field editor for RORB catchment files", long_about = None)]
#[command(after_help = FIELD_HELP)]
struct Args {
    /// Catchment file to read
    input: String,

    /// File to write the edited catchment to
    output: String,

    /// Section to edit (NODES or REACHES)
    #[arg(short, long)]
    section: String,

    /// Field name or token index (1-based, after the leading C)
    #[arg(short, long)]
    field: String,

    /// New value to set (no whitespace allowed)
    #[arg(long)]
    value: String,

    /// Editable span: the current value only, or up to the next column
    #[arg(long, default_value_t = SpanMode::Token)]
    span: SpanMode,

    /// Match section and field names regardless of case
    #[arg(long)]
    ignore_case: bool,

    /// Refuse to edit unless the input has this BLAKE3 checksum
    #[arg(long)]
    expect_checksum: Option<String>,

    /// Report what would change without writing the output
    #[arg(long)]
    dry_run: bool,

    /// Output structured JSON instead of human-readable
    #[arg(short, long)]
    json: bool,

    /// Execution id reported in JSON output ("auto" generates one)
    #[arg(long, default_value = "auto")]
    execution_id: String,

    /// Verbose mode - sets the log level to info, defaults to warning level
    #[arg(short, long)]
    verbose: bool,

    /// Debug mode - sets the log level to debug, defaults to warning level
    #[arg(long)]
    debug: bool,
}

fn run(args: &Args) -> Result<EditSummary, RunError> {
    let options = EditOptions {
        span_mode: args.span,
        ignore_case: args.ignore_case,
    };
    let section = Section::parse(&args.section, options.ignore_case)?;
    let edit = FieldEdit::new(section, &args.field, &args.value, options)?;
    info!(
        "Editing {} {} (token {}) to '{}'",
        edit.section, edit.field.label, edit.field.index, edit.value
    );

    let run_options = RunOptions {
        expected_checksum: args.expect_checksum.clone(),
        dry_run: args.dry_run,
    };
    edit_file(&args.input, &args.output, &edit, &run_options)
}

fn main() {
    let args = Args::parse();

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let execution_id = if args.execution_id == "auto" {
        generate_execution_id()
    } else {
        args.execution_id.clone()
    };

    match run(&args) {
        Ok(summary) => {
            if args.json {
                print_json(&EditResponse::success(execution_id, &summary));
            } else {
                println!(
                    "Successfully modified {} lines in {} section.",
                    summary.modified_count, summary.section
                );
                match &summary.output_path {
                    Some(path) => println!("Output written to: {}", path),
                    None => println!("Dry run: no output written."),
                }
            }
        }
        Err(e) => {
            let code = e.exit_code();
            if args.json {
                print_json(&EditResponse::failure(execution_id, e.to_string(), code));
            } else {
                eprintln!("Error: {}", e);
            }
            std::process::exit(code);
        }
    }
}

fn print_json(response: &EditResponse) {
    let output = serde_json::to_string_pretty(response)
        .unwrap_or_else(|_| r#"{"error": "Failed to serialize response"}"#.to_string());
    println!("{}", output);
}
