use clap::{Parser, Subcommand};
use picture_presets::binding::{ImageArgs, ImageBinding, PictureArgs, PictureBinding, Unbound};
use picture_presets::config::{self, MediaConfig};
use picture_presets::html;
use picture_presets::output;
use picture_presets::preset::{PresetOverrides, resolve};
use picture_presets::srcset::{PathMediaUrl, build_srcsets};
use picture_presets::types::{CropMode, RenderMode, SizeInput};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Geometry overrides shared by commands that resolve a preset.
#[derive(clap::Args, Clone)]
struct OverrideArgs {
    /// Size override: `WxH`, or a single number for a square
    #[arg(long)]
    size: Option<String>,

    /// Crop mode override (o, fill, e, rc, p, l, a, c)
    #[arg(long)]
    mode: Option<CropMode>,

    /// Fill colour override
    #[arg(long)]
    fill: Option<String>,
}

impl OverrideArgs {
    fn to_overrides(&self) -> PresetOverrides {
        PresetOverrides {
            size: self.size.as_deref().map(SizeInput::from),
            mode: self.mode,
            fill: self.fill.clone(),
        }
    }
}

#[derive(Parser)]
#[command(name = "picture-presets")]
#[command(about = "Resolve responsive image presets into srcsets and markup")]
#[command(long_about = "\
Resolve responsive image presets into srcsets and markup

Presets and breakpoints live in config.toml, layered over built-in defaults:

  [breakpoints]
  sm = 480
  md = 768

  [presets.default]
  mode = \"rc\"
  resolutions = [\"1x\", \"2x\"]

  [presets.hero]
  size = \"800x400\"

  [presets.hero.breakpoints]
  sm = { size = \"400x400\", mode = \"c\" }
  md = \"sm\"

Run 'picture-presets gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Rendering mode (edit, live, preview)
    #[arg(long, default_value = "live", global = true)]
    render_mode: RenderMode,

    /// Log resolver decisions to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a preset into root and per-breakpoint descriptors
    Resolve {
        /// Preset name
        preset: String,
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Print the resolved preset as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build the srcset URLs for an image path
    Srcset {
        /// Image path handed to the media service
        path: String,
        #[arg(long, default_value = "default")]
        preset: String,
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Print the full <picture> markup instead of the URL listing
        #[arg(long)]
        html: bool,
    },
    /// Normalize geometry for a single image and print its URL
    Image {
        /// Image path
        #[arg(long)]
        src: Option<String>,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long)]
        mode: Option<CropMode>,
        /// Background colour for padded modes
        #[arg(long)]
        color: Option<String>,
        /// Print the <img> markup instead of the geometry listing
        #[arg(long)]
        html: bool,
    },
    /// Resolve every configured preset and report problems
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Resolve {
            preset,
            overrides,
            json,
        } => {
            let (media_config, _) = load(&cli.config_dir)?;
            let resolved = resolve(
                &preset,
                &overrides.to_overrides(),
                &media_config.presets,
                &media_config.breakpoints,
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                output::print_resolved(&preset, &resolved);
            }
        }
        Command::Srcset {
            path,
            preset,
            overrides,
            html,
        } => {
            let (media_config, media) = load(&cli.config_dir)?;
            let picture = PictureBinding::new(
                PictureArgs {
                    src: Some(path.as_str().into()),
                    mode: overrides.mode,
                    size: overrides.size.as_deref().map(SizeInput::from),
                    fill: overrides.fill.clone(),
                    preset,
                    ..PictureArgs::default()
                },
                cli.render_mode,
                &Unbound,
            );
            if html {
                if let Some(markup) = html::render_picture(&picture, &media_config, &media)? {
                    println!("{}", markup.into_string());
                }
            } else {
                let resolved = picture.preset(&media_config.presets, &media_config.breakpoints)?;
                output::print_srcsets(&build_srcsets(&path, &resolved, &media));
            }
        }
        Command::Image {
            src,
            size,
            width,
            height,
            mode,
            color,
            html,
        } => {
            let (media_config, media) = load(&cli.config_dir)?;
            let mut args = ImageArgs {
                src: src.as_deref().map(Into::into),
                size: size.as_deref().map(SizeInput::from),
                width,
                height,
                mode,
                ..ImageArgs::default()
            };
            if color.is_some() {
                args.color = color;
            }
            let image = ImageBinding::new(args, cli.render_mode, &Unbound);
            if html {
                if let Some(markup) = html::render_image(&image, &media_config, &media) {
                    println!("{}", markup.into_string());
                }
            } else {
                let src = image.src(&media, &media_config.placeholder.base_url);
                output::print_image(&image, src.as_deref());
            }
        }
        Command::Check => {
            let (media_config, _) = load(&cli.config_dir)?;
            run_check(&media_config)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load `config.toml` from `dir` and build the media URL scheme it names.
fn load(dir: &Path) -> Result<(MediaConfig, PathMediaUrl), config::ConfigError> {
    let media_config = config::load_config(dir)?;
    let media = PathMediaUrl::new(media_config.media.base_url.clone());
    Ok((media_config, media))
}

/// Resolve every preset against the loaded table. Fails if any preset does.
fn run_check(media_config: &MediaConfig) -> Result<(), Box<dyn std::error::Error>> {
    let results: Vec<_> = media_config
        .presets
        .names()
        .map(|name| {
            let result = resolve(
                name,
                &PresetOverrides::default(),
                &media_config.presets,
                &media_config.breakpoints,
            );
            (name.to_string(), result)
        })
        .collect();
    output::print_check(media_config, &results);

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    if failed > 0 {
        return Err(format!("{failed} preset(s) failed to resolve").into());
    }
    println!("==> Config is valid");
    Ok(())
}

/// Install the stderr fmt subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("picture_presets={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
