//! Sends one prompt to a configured model handler and prints the reply.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use model_handler::config::{AppConfig, HandlerConfig, HandlerKind, build_handler, build_registry};
use model_handler::{HandlerContext, LLMError};

#[derive(Parser, Debug)]
#[command(version, about)]
struct CliArgs {
    /// Prompt sent to the model.
    prompt: String,

    /// TOML file with `[logging]` and `[[handlers]]` sections.
    #[arg(long, env = "MODEL_HANDLER_CONFIG")]
    config: Option<PathBuf>,

    /// Handle to use from the config file.
    #[arg(long, requires = "config")]
    handle: Option<String>,

    /// Provider to use when no config file is given.
    #[arg(long, default_value = "groq", value_parser = parse_kind, conflicts_with = "config")]
    provider: HandlerKind,

    /// Overrides the provider's default model; set `model` per handle in a config file.
    #[arg(long, conflicts_with = "config")]
    model: Option<String>,
}

fn parse_kind(value: &str) -> Result<HandlerKind, String> {
    value.parse::<HandlerKind>().map_err(|err| err.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();

    match run(args).await {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> Result<String, LLMError> {
    let context = HandlerContext::from_env()?;

    match args.config {
        Some(path) => {
            let config = AppConfig::from_file(&path)?;
            let context = context.with_logging(config.logging.clone());
            let registry = build_registry(&config.handlers, &context)?;
            let handle = match args.handle {
                Some(handle) => handle,
                None => config
                    .handlers
                    .first()
                    .map(|handler| handler.handle.clone())
                    .ok_or_else(|| {
                        LLMError::invalid_config("handlers", "no handler configured")
                    })?,
            };
            registry.generate_text(&handle, &args.prompt).await
        }
        None => {
            let config = HandlerConfig {
                handle: "cli".to_string(),
                kind: args.provider,
                model: args.model,
                base_url: None,
            };
            let handler = build_handler(&config, &context)?;
            handler.generate_text(&args.prompt).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn command_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn provider_flags_default_to_groq() {
        let args = CliArgs::try_parse_from(["generate-text", "hello"]).expect("args");
        assert_eq!(args.provider, HandlerKind::Groq);
        assert_eq!(args.model, None);

        let args = CliArgs::try_parse_from([
            "generate-text",
            "--provider",
            "anthropic",
            "--model",
            "claude-3-5-haiku-latest",
            "hello",
        ])
        .expect("args");
        assert_eq!(args.provider, HandlerKind::Anthropic);
        assert_eq!(args.model.as_deref(), Some("claude-3-5-haiku-latest"));
    }

    #[test]
    fn model_and_provider_conflict_with_config() {
        for flag in [["--model", "gpt-4.1"], ["--provider", "openai"]] {
            let err = CliArgs::try_parse_from([
                "generate-text",
                "--config",
                "handlers.toml",
                flag[0],
                flag[1],
                "hello",
            ])
            .expect_err("conflicting flags");
            assert_eq!(err.kind(), ErrorKind::ArgumentConflict, "{flag:?}");
        }
    }

    #[test]
    fn handle_requires_config() {
        let err = CliArgs::try_parse_from(["generate-text", "--handle", "default-groq", "hello"])
            .expect_err("missing config");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
