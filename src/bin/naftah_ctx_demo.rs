use std::sync::Arc;

use clap::Parser;

use naftah_context::config::BootstrapConfig;
use naftah_context::host::source::FilesystemClassSource;
use naftah_context::interpreter::declarations::{DeclaredVariable, RuntimeValue};
use naftah_context::Interpreter;

#[derive(Parser)]
#[command(name = "naftah-ctx-demo")]
#[command(about = "Exercises the execution context: bootstrap plus a few scope operations")]
#[command(version)]
struct Cli {
    /// Directory of `.classdescriptor` stub files to scan as the classpath
    #[arg(long = "classpath")]
    classpath: Option<String>,

    /// Force a classpath scan even without `--classpath`
    #[arg(long = "scan")]
    scan: bool,

    /// Output the bootstrap + scope result as JSON
    #[arg(long = "json")]
    json: bool,

    /// Run the classpath scan in the background instead of awaiting it inline
    #[arg(long = "async")]
    async_scan: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = BootstrapConfig { scan_classpath: cli.scan || cli.classpath.is_some(), ..BootstrapConfig::from_env() };

    let mut interpreter = match Interpreter::new(config) {
        Ok(interp) => interp,
        Err(err) => {
            eprintln!("failed to initialize execution context: {err}");
            std::process::exit(1);
        }
    };

    interpreter.define_variable("greeting", DeclaredVariable::new(Some(RuntimeValue::new("hello", None)), None), false).unwrap();

    if let Some(classpath) = &cli.classpath {
        let source: Arc<dyn naftah_context::host::source::ClassSource> = Arc::new(FilesystemClassSource::new(classpath));
        let working_dir = std::path::PathBuf::from(classpath);
        if let Err(err) = interpreter.bootstrap(cli.async_scan, source, classpath, &working_dir).await {
            eprintln!("classpath scan failed: {err}");
            std::process::exit(1);
        }
    } else {
        let working_dir = naftah_context::host::bootstrap::default_cache_dir();
        interpreter.bootstrap(cli.async_scan, Arc::new(naftah_context::host::source::NullClassSource), "", &working_dir).await.ok();
    }

    let greeting = interpreter.resolve_variable("greeting").map(|v| v.raw).unwrap_or_default();
    let completions = interpreter.get_completions().await;

    if cli.json {
        println!("{}", serde_json::json!({ "greeting": greeting, "completions": completions }));
    } else {
        println!("greeting = {greeting}");
        println!("completions = {completions:?}");
    }
}
