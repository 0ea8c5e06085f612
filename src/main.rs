use anyhow::{bail, Context as _, Result};
use clap::Parser as ClapParser;
use remote_layout::context::{Context, Options};
use remote_layout::script::{describe_line, query_line, report, run_script, Lookup};
use remote_layout::target::{PointerWidth, Target};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Report the byte offset of a tuple element or struct field.
#[derive(ClapParser, Debug)]
#[command(version, about)]
struct Args {
    /// Type expression, e.g. `(Int, Bool)` or `B<Float>`.
    ty: Option<String>,

    /// Field name or tuple index.
    key: Option<String>,

    /// File with one `<type> <key>` query per line.
    #[arg(short, long, conflicts_with_all = ["ty", "key"])]
    batch: Option<PathBuf>,

    /// RON file with struct declarations.
    #[arg(short, long)]
    decls: Option<PathBuf>,

    #[arg(long, default_value = "64")]
    pointer_width: PointerWidth,

    /// Answer from already-resolved type metadata instead of the type itself.
    #[arg(long, default_value_t = false)]
    via_metadata: bool,

    /// Print the full layout of the type instead of one member offset.
    #[arg(long, default_value_t = false, conflicts_with = "batch")]
    describe: bool,
}

// Only installed when RUST_LOG is set, so normal output stays clean.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> Result<ExitCode> {
    init_tracing();

    let Args {
        ty,
        key,
        batch,
        decls,
        pointer_width,
        via_metadata,
        describe,
    } = Args::parse();

    let mut context = Context::with_options(&Options {
        target: Target::new(pointer_width),
    });

    if let Some(path) = decls {
        let source = fs::read_to_string(&path)
            .with_context(|| format!("reading declarations from {}", path.display()))?;
        context.load_declarations(&source)?;
    }

    let lookup = if via_metadata {
        Lookup::Metadata
    } else {
        Lookup::Type
    };

    let lines = if let Some(path) = batch {
        let source = fs::read_to_string(&path)
            .with_context(|| format!("reading queries from {}", path.display()))?;

        run_script(&mut context, &source, lookup)
    } else {
        let Some(ty) = ty else {
            bail!("expected a type expression or --batch <FILE>");
        };

        if describe {
            vec![describe_line(&mut context, &ty)]
        } else {
            let Some(key) = key else {
                bail!("expected a member key after the type expression");
            };

            vec![query_line(&mut context, &ty, &key, lookup, None)]
        }
    };

    let answered = report(&lines, &mut io::stdout().lock(), &mut io::stderr().lock())?;

    Ok(if answered {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
