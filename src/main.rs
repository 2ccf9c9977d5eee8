use anyhow::{Context, Result};
use cardtemplate::{config::RenderSettings, Renderer};
use clap::{Arg, ArgAction};
use tracing_subscriber::EnvFilter;

fn read_file(path: &str, what: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {} file {}", what, path))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = clap::Command::new("cardtemplate")
        .about("Render a card template against a JSON data context")
        .arg(
            Arg::new("template")
                .short('t')
                .long("template")
                .value_name("TEMPLATE")
                .required(true)
                .help("Path to the JSON card template"),
        )
        .arg(
            Arg::new("data")
                .short('d')
                .long("data")
                .value_name("DATA")
                .required(true)
                .help("Path to the JSON data context"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("CONFIG")
                .help("Path to a YAML file containing render settings"),
        )
        .arg(
            Arg::new("pretty")
                .short('p')
                .long("pretty")
                .action(ArgAction::SetTrue)
                .help("Pretty-print the rendered card"),
        )
        .get_matches();

    let mut settings = match matches.get_one::<String>("config") {
        Some(path) => RenderSettings::load(path)?,
        None => RenderSettings::default(),
    };
    if matches.get_flag("pretty") {
        settings.pretty = true;
    }

    // Both are required, clap rejects the invocation otherwise
    let template_path = matches.get_one::<String>("template").map(String::as_str).unwrap_or_default();
    let data_path = matches.get_one::<String>("data").map(String::as_str).unwrap_or_default();

    let template = read_file(template_path, "template")?;
    let data = read_file(data_path, "data")?;

    println!("{}", Renderer::new(settings).render(&template, &data));
    Ok(())
}
