#![deny(warnings)]

//! Headless tool for inspecting and normalizing stored Real Time configurations.

use anyhow::{bail, Context, Result};
use persistence::Format;
use realtime_config::{schema, ConfigField, RealTimeConfig, STORAGE_ID};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: rtconfig <command>
  defaults [--format json|yaml|bin]       print the default configuration
  normalize <path> [--out <path>]         migrate and validate a stored configuration
  schema                                  print the settings schema as JSON
  show <path>                             print every setting with its formatted value
  --version                               print version information";

#[derive(Debug, PartialEq)]
enum Command {
    Defaults { format: Format },
    Normalize { path: PathBuf, out: Option<PathBuf> },
    Schema,
    Show { path: PathBuf },
    Version,
}

fn parse_args<I: Iterator<Item = String>>(mut it: I) -> Result<Command> {
    let Some(cmd) = it.next() else {
        bail!(USAGE);
    };
    let mut path: Option<PathBuf> = None;
    let mut out: Option<PathBuf> = None;
    let mut format = Format::Json;
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--out" => {
                let Some(target) = it.next() else {
                    bail!("--out: missing <path>\n{USAGE}");
                };
                out = Some(target.into());
            }
            "--format" => {
                let name = it.next().unwrap_or_default();
                format = Format::from_name(&name)
                    .with_context(|| format!("unknown format: {name:?}"))?;
            }
            other if path.is_none() && !other.starts_with("--") => path = Some(other.into()),
            other => bail!("unexpected argument: {other}\n{USAGE}"),
        }
    }
    let need_path =
        |path: Option<PathBuf>| path.with_context(|| format!("{cmd}: missing <path>\n{USAGE}"));
    Ok(match cmd.as_str() {
        "defaults" | "schema" | "--version" | "version" if path.is_some() => {
            bail!("{cmd}: takes no <path>\n{USAGE}")
        }
        "defaults" | "schema" | "show" | "--version" | "version" if out.is_some() => {
            bail!("{cmd}: takes no --out\n{USAGE}")
        }
        "defaults" => Command::Defaults { format },
        "normalize" => Command::Normalize {
            path: need_path(path)?,
            out,
        },
        "schema" => Command::Schema,
        "show" => Command::Show {
            path: need_path(path)?,
        },
        "--version" | "version" => Command::Version,
        other => bail!("unknown command: {other}\n{USAGE}"),
    })
}

fn load(path: &Path) -> Result<RealTimeConfig> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let config = persistence::decode(&bytes, Format::from_path(path))
        .with_context(|| format!("decoding {}", path.display()))?;
    info!(path = %path.display(), version = config.version, "loaded configuration");
    Ok(config)
}

fn render(config: &RealTimeConfig) -> String {
    let mut lines = Vec::with_capacity(ConfigField::ALL.len() + 1);
    lines.push(format!("{STORAGE_ID} v{}", config.version));
    let mut entries: Vec<_> = schema().iter().collect();
    entries.sort_by_key(|s| (s.group, s.subgroup, s.order));
    for s in entries {
        let section = match s.subgroup {
            Some(sub) => format!("{}/{}", s.group, sub),
            None => s.group.to_string(),
        };
        let value = s.format(config.get(s.field), config.use_english_us_formats);
        lines.push(format!("{section:<18} {:>2}  {:<36} {value}", s.order, s.field.name()));
    }
    lines.join("\n")
}

fn run(cmd: Command, stdout: &mut impl Write) -> Result<()> {
    match cmd {
        Command::Defaults { format } => {
            let config = RealTimeConfig::with_latest_version();
            stdout.write_all(&persistence::encode(&config, format)?)?;
        }
        Command::Normalize { path, out } => {
            let config = load(&path)?;
            let format = Format::from_path(out.as_ref().unwrap_or(&path));
            let bytes = persistence::encode(&config, format)?;
            match out {
                Some(out) => {
                    std::fs::write(&out, bytes)
                        .with_context(|| format!("writing {}", out.display()))?;
                    info!(path = %out.display(), "wrote normalized configuration");
                }
                None => stdout.write_all(&bytes)?,
            }
        }
        Command::Schema => {
            serde_json::to_writer_pretty(&mut *stdout, schema())?;
        }
        Command::Show { path } => {
            let config = load(&path)?;
            stdout.write_all(render(&config).as_bytes())?;
        }
        Command::Version => {
            write!(
                stdout,
                "rtconfig {} ({} {})",
                env!("CARGO_PKG_VERSION"),
                env!("GIT_SHA"),
                env!("BUILD_DATE")
            )?;
        }
    }
    writeln!(stdout)?;
    Ok(())
}

/// Log filter from a `RUST_LOG`-style directive, `info` when unset or invalid.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    // Logging setup
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cmd = parse_args(std::env::args().skip(1))?;
    run(cmd, &mut std::io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    fn args(s: &str) -> impl Iterator<Item = String> + '_ {
        s.split_whitespace().map(String::from)
    }

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("rtconfig-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse_args(args("defaults --format yaml")).unwrap(),
            Command::Defaults {
                format: Format::Yaml
            }
        );
        assert_eq!(
            parse_args(args("normalize old.json --out new.yaml")).unwrap(),
            Command::Normalize {
                path: "old.json".into(),
                out: Some("new.yaml".into())
            }
        );
        assert_eq!(parse_args(args("schema")).unwrap(), Command::Schema);
        assert!(parse_args(args("show")).is_err());
        assert!(parse_args(args("defaults --format toml")).is_err());
        assert!(parse_args(args("launch")).is_err());
        assert!(parse_args(args("")).is_err());
    }

    #[test]
    fn rejects_dangling_and_stray_arguments() {
        assert!(parse_args(args("normalize a.json --out")).is_err());
        assert!(parse_args(args("schema extra_arg")).is_err());
        assert!(parse_args(args("defaults extra_arg")).is_err());
        assert!(parse_args(args("--version extra_arg")).is_err());
        assert!(parse_args(args("show a.json b.json")).is_err());
        assert!(parse_args(args("show a.json --out b.json")).is_err());
    }

    #[test]
    fn log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            log_filter(Some("warn")).max_level_hint(),
            Some(LevelFilter::WARN)
        );
        assert_eq!(
            log_filter(Some("realtime_config=loud")).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }

    #[test]
    fn defaults_print_latest_version() {
        let mut out = Vec::new();
        run(
            Command::Defaults {
                format: Format::Json,
            },
            &mut out,
        )
        .unwrap();
        let back: RealTimeConfig = serde_json::from_slice(&out).unwrap();
        assert_eq!(back, RealTimeConfig::with_latest_version());
    }

    #[test]
    fn normalize_writes_migrated_record() {
        let input = temp_file("legacy.json", br#"{"second_shift_quota": 8}"#);
        let output = input.with_extension("yaml");
        run(
            Command::Normalize {
                path: input.clone(),
                out: Some(output.clone()),
            },
            &mut Vec::new(),
        )
        .unwrap();
        let written = std::fs::read(&output).unwrap();
        let config = persistence::decode_raw(&written, Format::Yaml).unwrap();
        assert_eq!(config.version, 2);
        assert_eq!(config.second_shift_quota, 25);
        std::fs::remove_file(input).unwrap();
        std::fs::remove_file(output).unwrap();
    }

    #[test]
    fn show_renders_every_field() {
        let mut config = RealTimeConfig::with_latest_version();
        config.use_english_us_formats = true;
        let text = render(&config);
        assert!(text.starts_with("RealTimeConfiguration v2"));
        assert_eq!(text.lines().count(), ConfigField::ALL.len() + 1);
        assert!(text.contains("10:00 PM"));
        assert!(text.contains("2h"));
    }

    #[test]
    fn schema_is_json_array() {
        let mut out = Vec::new();
        run(Command::Schema, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), ConfigField::ALL.len());
    }
}
