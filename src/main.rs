use clap::Parser;
use cocktail_etl::config::cli::CliArgs;
use cocktail_etl::domain::ports::ModelLoader;
use cocktail_etl::utils::{logger, validation::Validate};
use cocktail_etl::{
    CocktailExtractor, EtlError, JobConfig, LocalModelStore, ModelProvisioner, PatternModelLoader,
};
use std::path::PathBuf;

async fn resolve_model_dir(args: &CliArgs) -> cocktail_etl::Result<PathBuf> {
    if let Some(model_dir) = &args.model_dir {
        return Ok(model_dir.clone());
    }

    let (Some(config_path), Some(models_root)) = (&args.config, &args.models_root) else {
        return Err(EtlError::ConfigError {
            message: "either --model-dir or --config with --models-root is required".to_string(),
        });
    };

    let config = JobConfig::from_file(config_path)?;
    config.validate()?;
    tracing::debug!("Job config: {:?}", config);

    let provisioner = ModelProvisioner::new(LocalModelStore::new(models_root), &config);
    Ok(provisioner.provision().await?.model_dir)
}

async fn run(args: &CliArgs) -> cocktail_etl::Result<String> {
    let model_dir = resolve_model_dir(args).await?;
    let model = PatternModelLoader.load(&model_dir)?;

    let description = std::fs::read_to_string(&args.input)?;
    let cocktails = CocktailExtractor::new(&model).extract(&description)?;
    tracing::info!(
        "Extracted {} cocktails from {}",
        cocktails.len(),
        args.input.display()
    );

    let output = if args.pretty {
        serde_json::to_string_pretty(&cocktails)?
    } else {
        serde_json::to_string(&cocktails)?
    };
    Ok(output)
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    logger::init_cli_logger(args.verbose);
    tracing::info!("Starting cocktail-etl CLI");

    match run(&args).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            tracing::error!("❌ Extraction failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}
