mod list;
mod scan;

use clap::{Args, Parser, Subcommand, ValueEnum};
use jscan_core::{ClassPathLoader, UNBOUNDED};
use std::ffi::OsString;

#[derive(Parser)]
#[command(
    name = "jscan",
    version,
    about = "Find compiled Java classes by annotation or supertype",
    long_about = "jscan walks one package of a class path, either a class directory or a jar, \
                  and reports the classes that carry an annotation or extend a given type."
)]
pub struct Cli {
    /// Also print logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report classes under a package matching a condition type
    #[command(
        long_about = "Resolves the package on the class path, enumerates its classes and reports \
                      those carrying the annotation (--annotated) or extending the type (--subtype-of)."
    )]
    Scan {
        /// Root package, e.g. com.example.app
        #[arg(value_name = "PACKAGE")]
        root: String,

        #[command(flatten)]
        condition: Condition,

        #[command(flatten)]
        class_path: ClassPathArgs,

        /// Maximum number of classes to report
        #[arg(long, value_name = "N")]
        limit: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List the class names stored under a package without loading them
    List {
        /// Root package, e.g. com.example.app
        #[arg(value_name = "PACKAGE")]
        root: String,

        #[command(flatten)]
        class_path: ClassPathArgs,

        /// Maximum number of names to list
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct Condition {
    /// Match classes carrying this annotation type
    #[arg(long, value_name = "ANNOTATION")]
    pub annotated: Option<String>,

    /// Match proper subtypes of this class or interface
    #[arg(long, value_name = "TYPE")]
    pub subtype_of: Option<String>,
}

#[derive(Args, Debug)]
pub struct ClassPathArgs {
    /// Class path entries (platform path list, repeatable). Defaults to CLASSPATH.
    #[arg(long = "classpath", visible_alias = "cp", value_name = "PATHS")]
    pub class_path: Vec<OsString>,
}

impl ClassPathArgs {
    pub fn loader(&self) -> ClassPathLoader {
        if self.class_path.is_empty() {
            return ClassPathLoader::from_env();
        }
        ClassPathLoader::new(
            self.class_path
                .iter()
                .flat_map(|paths| std::env::split_paths(paths))
                .filter(|p| !p.as_os_str().is_empty()),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
    Plain,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = jscan_core::logging::init_logging("cli", cli.verbose);

    match cli.command {
        Commands::Scan {
            root,
            condition,
            class_path,
            limit,
            format,
        } => scan::run(
            &root,
            &condition,
            &class_path.loader(),
            limit.unwrap_or(UNBOUNDED),
            format,
        ),
        Commands::List {
            root,
            class_path,
            limit,
        } => list::run(&root, &class_path.loader(), limit.unwrap_or(UNBOUNDED)),
    }
}
