use anyhow::Result;
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

use terrain_classifiers::config::ModelType;
use terrain_cli::classifiers::demo::{describe_demo, run_demo};
use terrain_cli::classifiers::fit::{load_fit_config, run_fit, FitConfig};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("TERRAIN_LOG", "error,terrain=info"))
        .init();

    let model_types = ["gnb", "svm", "svm-rbf", "svm-poly"];

    let matches = Command::new("terrain")
        .version(clap::crate_version!())
        .author("Justin Sing <justincsing@gmail.com>")
        .about("Fit toy classifiers on 2-D terrain data and draw their decision boundaries")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("fit")
                .about("Fit a classifier, report test accuracy and render the decision boundary")
                .arg(
                    Arg::new("config")
                        .help("Path to fit JSON configuration file")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("train_data")
                        .short('d')
                        .long("train_data")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help(
                            "Path to training data. Overrides the training data file \
                             specified in the configuration file.",
                        )
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("test_data")
                        .short('t')
                        .long("test_data")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help(
                            "Path to test data. Overrides the test data file \
                             specified in the configuration file.",
                        )
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path of the decision boundary image (default: test.png)")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .help("Also write an interactive HTML report to this path")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("model_type")
                        .long("model-type")
                        .help("Override the model type from the JSON config.")
                        .value_parser(model_types)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("demo")
                .about("Fit on a few hard-coded points and classify [-0.8, -1]")
                .arg(
                    Arg::new("model_type")
                        .long("model-type")
                        .help("Model to demonstrate")
                        .default_value("gnb")
                        .value_parser(model_types)
                        .value_hint(ValueHint::Other),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("fit", sub_m)) => handle_fit(sub_m),
        Some(("demo", sub_m)) => handle_demo(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_fit(matches: &ArgMatches) -> Result<()> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(config_path) => {
            log::info!("[Terrain::Classifiers] Fitting from config: {:?}", config_path);
            load_fit_config(config_path)?
        }
        None => FitConfig::default(),
    };

    if let Some(train_data) = matches.get_one::<String>("train_data") {
        config.train_data = train_data.clone();
    }
    if let Some(test_data) = matches.get_one::<String>("test_data") {
        config.test_data = Some(test_data.clone());
    }
    if let Some(output) = matches.get_one::<PathBuf>("output_file") {
        config.render.output = output.clone();
    }
    if let Some(report) = matches.get_one::<PathBuf>("report") {
        config.report = Some(report.clone());
    }
    if let Some(model_type) = matches.get_one::<String>("model_type") {
        config.model.model_type = ModelType::from_str(model_type).map_err(anyhow::Error::msg)?;
    }

    if config.train_data.is_empty() {
        eprintln!("[Terrain::Classifiers] No config file provided and no training data given. Template:");
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    match run_fit(&config) {
        Ok(result) => {
            if let Some(acc) = result.accuracy {
                println!("Accuracy= {}", acc);
            }
            eprintln!(
                "[Terrain::Classifiers] Wrote {} decision boundary to {}",
                result.model_name,
                config.render.output.display()
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Fit failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_demo(matches: &ArgMatches) -> Result<()> {
    let name = matches
        .get_one::<String>("model_type")
        .map(String::as_str)
        .unwrap_or("gnb");
    let model_type = ModelType::from_str(name).map_err(anyhow::Error::msg)?;
    eprintln!("[Terrain::Classifiers] Demo model: {}", describe_demo(&model_type));

    for line in run_demo(&model_type)? {
        println!("{}", line);
    }
    Ok(())
}
