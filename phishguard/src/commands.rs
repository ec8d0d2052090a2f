use crate::CLAP_STYLING;
use clap::{arg, command};
use std::path::PathBuf;

/// Flags shared by every subcommand that loads artifacts.
fn artifact_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        arg!(-c --"config" <PATH>)
            .required(false)
            .help("Path to a TOML configuration file")
            .value_parser(clap::value_parser!(PathBuf)),
    )
    .arg(
        arg!(--"schema" <PATH>)
            .required(false)
            .help("Schema artifact (default: models/schema.json)")
            .value_parser(clap::value_parser!(PathBuf)),
    )
}

fn model_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        arg!(--"model" <PATH>)
            .required(false)
            .help("Classifier artifact (default: models/model.json)")
            .value_parser(clap::value_parser!(PathBuf)),
    )
    .arg(
        arg!(-t --"threshold" <PROBABILITY>)
            .required(false)
            .help("High recall decision threshold in [0, 1] (default: 0.20)")
            .value_parser(clap::value_parser!(f64)),
    )
}

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("phishguard")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("phishguard")
        .about("Lexical phishing URL scoring")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Only log warnings and errors").required(false))
        .subcommand_required(true)
        .subcommand(model_args(artifact_args(
            command!("serve")
                .about("Run the scoring API and serve the static front end")
                .arg(
                    arg!(-b --"bind" <ADDR>)
                        .required(false)
                        .help("Address to listen on (default: 127.0.0.1:8000)"),
                )
                .arg(
                    arg!(--"static-dir" <PATH>)
                        .required(false)
                        .help("Directory of static front-end files (default: static)")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )))
        .subcommand(artifact_args(
            command!("features")
                .about("Print the schema-aligned feature vector of a URL")
                .arg(arg!(<URL>).required(true).help("The URL to featurize"))
                .arg(arg!(--"json" "Print the vector as a JSON object").required(false)),
        ))
        .subcommand(model_args(artifact_args(
            command!("check")
                .about("Score a list of URLs and print both verdicts for each")
                .arg(
                    arg!([URL] ...)
                        .required(false)
                        .help("URLs to score (default: a built-in sample set)")
                        .conflicts_with("hosts-file"),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of URLs to score")
                        .value_parser(clap::value_parser!(PathBuf))
                        .conflicts_with("URL"),
                ),
        )))
}
