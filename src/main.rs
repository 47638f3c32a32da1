use clap::Parser;
use folio_site::{
    cli::{check_content, Cli, Command},
    logger, start_server,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    let args = cli.command.args().clone();
    logger::init_logger(args.verbose);

    let settings = match args.settings() {
        Ok(settings) => settings,
        Err(error) => {
            tracing::error!("Settings load error: {}", error);
            std::process::exit(1);
        }
    };

    match cli.command {
        Command::Serve(_) => start_server(settings).await,
        Command::Check(_) => {
            let report = check_content(&settings).await;
            println!(
                "Checked {} posts, {} failed",
                report.checked,
                report.failures.len()
            );
            for failure in &report.failures {
                eprintln!("  {}", failure);
            }
            if !report.failures.is_empty() {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
