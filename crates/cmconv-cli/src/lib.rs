//! Headless front end for cmconv.

pub mod cli_args;

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use cli_args::{Cli, Command, ConfigCommand, ConfigSetArgs, ConvertArgs, ModelsArgs};
use cmconv_core::logging::{LoggingDestination, init_logging};
use cmconv_core::{
    ColorModelRegistry, ConversionClient, ConversionController, ConversionTrigger, ConvertError,
    FileConfig, ImageFile, RenderedImage, UiState, config_path, effective_client_preferences,
    effective_config, load_config, save_config,
};

/// CLI mode whenever any argument was passed; a bare launch opens the GUI.
pub fn should_run_cli_mode() -> bool {
    std::env::args_os().len() > 1
}

/// Parse process arguments and run the selected command.
pub async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    if let Err(err) = init_logging(LoggingDestination::FileAndStderr) {
        eprintln!("Warning: logging disabled: {err}");
    }
    dispatch(cli).await
}

pub async fn dispatch(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Models(args) => list_models(&args),
        Command::Convert(args) => convert(args).await,
        Command::Config(cmd) => handle_config_command(cmd),
    }
}

fn load_config_with_warnings() -> FileConfig {
    let load = load_config();
    for warning in load.warnings {
        eprintln!("Warning: {warning}");
    }
    load.config
}

fn list_models(args: &ModelsArgs) -> Result<(), String> {
    let models = ColorModelRegistry::builtin().list_models();

    if args.json {
        let json = serde_json::to_string_pretty(models).map_err(|err| err.to_string())?;
        println!("{json}");
        return Ok(());
    }

    for model in models {
        println!("{:<10}  {}", model.id, model.display_name);
        if args.verbose {
            println!("            {}", model.description);
        }
        for spec in model.parameters {
            let precision = spec.display_precision();
            println!(
                "            {key}  {label:<20} default {default:.p$}  range [{min:.p$}, {max:.p$}]  step {step}",
                key = spec.key,
                label = spec.label,
                default = spec.default,
                min = spec.min,
                max = spec.max,
                step = spec.step,
                p = precision,
            );
        }
    }
    Ok(())
}

/// Apply the command line to a fresh controller and return it with a file selected.
pub fn prepare_controller(
    args: &ConvertArgs,
    config: &FileConfig,
) -> Result<ConversionController, ConvertError> {
    let registry = ColorModelRegistry::builtin();
    let mut controller = ConversionController::with_registry(registry, &config.ui.default_model);

    if let Some(model) = args.model.as_deref() {
        controller.select_model(model)?;
    }
    for (key, value) in &args.params {
        controller.set_parameter(key, *value)?;
    }
    controller.select_file(ImageFile::from_path(expand_input_path(&args.file))?);
    Ok(controller)
}

async fn convert(args: ConvertArgs) -> Result<(), String> {
    let config = load_config_with_warnings();
    let preferences = effective_client_preferences(&config, &args.client.to_overrides());
    let client = ConversionClient::new(&preferences).map_err(|err| err.to_string())?;
    let mut controller = prepare_controller(&args, &config).map_err(|err| err.to_string())?;

    let model_id = controller.active_model().id;
    eprintln!(
        "Converting {} with {} via {} ...",
        args.file.display(),
        model_id,
        client.endpoint()
    );

    let state = controller
        .convert_with(&client, ConversionTrigger::Upload)
        .await
        .map_err(|err| err.to_string())?;

    if state == UiState::Errored {
        let message = controller
            .notification()
            .map(|notification| notification.message.clone())
            .unwrap_or_else(|| "Error processing image".to_string());
        return Err(message);
    }

    let displayed = controller.displayed();
    let (Some(original), Some(converted)) =
        (displayed.original.as_ref(), displayed.converted.as_ref())
    else {
        return Err("Conversion finished without images".to_string());
    };

    if args.data_uri {
        println!("original:  {}", original.data_uri());
        println!("converted: {}", converted.data_uri());
        return Ok(());
    }

    let (original_path, converted_path) = output_paths(&args.file, &args.out_dir, model_id);
    fs::create_dir_all(&args.out_dir)
        .map_err(|err| format!("Failed to create {}: {err}", args.out_dir.display()))?;
    write_image(&original_path, original)?;
    write_image(&converted_path, converted)?;
    println!("Wrote {}", original_path.display());
    println!("Wrote {}", converted_path.display());
    Ok(())
}

/// Expand a leading `~` in the `FILE` argument. Anything else is left alone.
pub fn expand_input_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(raw) => PathBuf::from(shellexpand::tilde(raw).into_owned()),
        None => path.to_path_buf(),
    }
}

/// `<stem>_original.png` and `<stem>_<model>.png` inside `out_dir`.
pub fn output_paths(input: &Path, out_dir: &Path, model_id: &str) -> (PathBuf, PathBuf) {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "image".to_string());
    (
        out_dir.join(format!("{stem}_original.png")),
        out_dir.join(format!("{stem}_{model_id}.png")),
    )
}

fn write_image(path: &Path, image: &RenderedImage) -> Result<(), String> {
    fs::write(path, image.bytes()).map_err(|err| format!("Failed to write {}: {err}", path.display()))
}

fn handle_config_command(command: ConfigCommand) -> Result<(), String> {
    match command {
        ConfigCommand::Path => {
            println!("{}", config_path().display());
            Ok(())
        }
        ConfigCommand::Show => {
            let config = effective_config(&load_config_with_warnings());
            let rendered = toml::to_string_pretty(&config).map_err(|err| err.to_string())?;
            print!("{rendered}");
            Ok(())
        }
        ConfigCommand::Set(args) => {
            if args.is_empty() {
                return Err("Nothing to set; pass --endpoint, --timeout or --default-model.".into());
            }
            let mut config = load_config_with_warnings();
            apply_config_set(&mut config, &args)?;
            save_config(&config).map_err(|err| err.to_string())?;
            println!("Updated {}", config_path().display());
            Ok(())
        }
    }
}

/// Validate and apply `config set` flags.
pub fn apply_config_set(config: &mut FileConfig, args: &ConfigSetArgs) -> Result<(), String> {
    if let Some(endpoint) = args.endpoint.as_ref() {
        let mut candidate = config.client.clone();
        candidate.endpoint = endpoint.trim().to_string();
        ConversionClient::new(&candidate).map_err(|err| err.to_string())?;
        config.client = candidate;
    }
    if let Some(timeout) = args.timeout {
        config.client.timeout_secs = timeout;
    }
    if let Some(model) = args.default_model.as_ref() {
        let registry = ColorModelRegistry::builtin();
        registry.get_model(model).map_err(|err| err.to_string())?;
        config.ui.default_model = model.clone();
    }
    Ok(())
}
